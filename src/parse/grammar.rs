use winnow::ascii::{digit1, multispace0, till_line_ending};
use winnow::combinator::{alt, cut_err, delimited, opt, preceded, repeat, separated, terminated};
use winnow::error::{ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, take_while};

use crate::{CallSite, CompareOp, Expr, Pattern, Rule, Value};

use super::parser::ParsedSites;

// -- Whitespace & comments --------------------------------------------------

/// Whitespace inside an expression. No comments: `#` may appear in regexes.
fn sp(input: &mut &str) -> ModalResult<()> {
    multispace0.void().parse_next(input)
}

/// Whitespace and full-line `#` comments between declarations.
fn ws(input: &mut &str) -> ModalResult<()> {
    let _: () = repeat(
        0..,
        alt((
            take_while(1.., |c: char| c.is_ascii_whitespace()).void(),
            ('#', till_line_ending).void(),
        )),
    )
    .parse_next(input)?;
    Ok(())
}

fn blanks(input: &mut &str) -> ModalResult<()> {
    take_while(1.., [' ', '\t']).void().parse_next(input)
}

// -- Identifiers ------------------------------------------------------------

fn segment<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1, |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

/// A dotted name such as `user.profile.age` or `string.startsWith`.
fn path<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    let start = *input;
    segment.parse_next(input)?;
    let _: () = repeat(0.., ('.', segment).void()).parse_next(input)?;
    Ok(&start[..start.len() - input.len()])
}

// -- Literals ---------------------------------------------------------------

fn string_literal(input: &mut &str) -> ModalResult<String> {
    let quote = alt(('"', '\'')).parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = cut_err(any).parse_next(input)?;
        match ch {
            c if c == quote => return Ok(s),
            '\\' => {
                let esc = cut_err(any).parse_next(input)?;
                match esc {
                    '"' | '\'' | '\\' => s.push(esc),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

/// `/.../`, where `\/` stands for a slash and every other escape is kept
/// for the regex engine.
fn regex_literal(input: &mut &str) -> ModalResult<String> {
    '/'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = cut_err(any).parse_next(input)?;
        match ch {
            '/' => return Ok(s),
            '\\' => {
                let esc = cut_err(any).parse_next(input)?;
                if esc != '/' {
                    s.push('\\');
                }
                s.push(esc);
            }
            c => s.push(c),
        }
    }
}

fn number(input: &mut &str) -> ModalResult<Value> {
    let text = (opt('-'), digit1, opt(('.', digit1)))
        .take()
        .parse_next(input)?;
    if text.contains('.') {
        text.parse::<f64>()
            .map(Value::Float)
            .map_err(|_| ErrMode::from_input(input).cut())
    } else {
        text.parse::<i64>()
            .map(Value::Int)
            .map_err(|_| ErrMode::from_input(input).cut())
    }
}

// -- Operators --------------------------------------------------------------

#[derive(Clone, Copy)]
enum CompareToken {
    Op(CompareOp),
    Match,
}

fn compare_token(input: &mut &str) -> ModalResult<CompareToken> {
    sp.parse_next(input)?;
    alt((
        ">=".value(CompareToken::Op(CompareOp::Gte)),
        ">".value(CompareToken::Op(CompareOp::Gt)),
        "<=".value(CompareToken::Op(CompareOp::Lte)),
        "<".value(CompareToken::Op(CompareOp::Lt)),
        "==".value(CompareToken::Op(CompareOp::Eq)),
        "!=".value(CompareToken::Op(CompareOp::Neq)),
        "=~".value(CompareToken::Match),
    ))
    .parse_next(input)
}

// -- Expressions (precedence: || < && < comparison < ! < primary) -----------

fn primary(input: &mut &str) -> ModalResult<Expr> {
    sp.parse_next(input)?;
    alt((
        delimited('(', cut_err(expr), (sp, cut_err(')'))),
        string_literal.map(|s| Expr::Literal(Value::String(s))),
        number.map(Expr::Literal),
        call_or_var,
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "expression",
    )))
    .parse_next(input)
}

fn call_or_var(input: &mut &str) -> ModalResult<Expr> {
    let name = path.parse_next(input)?;
    let checkpoint = input.checkpoint();
    sp.parse_next(input)?;
    if opt('(').parse_next(input)?.is_some() {
        let args: Vec<Expr> = separated(0.., expr, (sp, ',')).parse_next(input)?;
        (sp, cut_err(')')).void().parse_next(input)?;
        return Ok(Expr::Call {
            function: name.to_owned(),
            args,
        });
    }
    input.reset(&checkpoint);
    Ok(match name {
        "true" => Expr::Literal(Value::Bool(true)),
        "false" => Expr::Literal(Value::Bool(false)),
        "nil" => Expr::Literal(Value::Nil),
        _ => Expr::Var(name.to_owned()),
    })
}

fn unary(input: &mut &str) -> ModalResult<Expr> {
    sp.parse_next(input)?;
    if opt('!').parse_next(input)?.is_some() {
        let inner = cut_err(unary).parse_next(input)?;
        Ok(Expr::Not(Box::new(inner)))
    } else {
        primary(input)
    }
}

fn pattern(input: &mut &str) -> ModalResult<Pattern> {
    sp.parse_next(input)?;
    alt((
        regex_literal.map(Pattern::Literal),
        unary.map(|e| Pattern::Dynamic(Box::new(e))),
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "regex pattern",
    )))
    .parse_next(input)
}

fn comparison(input: &mut &str) -> ModalResult<Expr> {
    let left = unary(input)?;
    match opt(compare_token).parse_next(input)? {
        Some(CompareToken::Op(op)) => {
            let right = cut_err(unary).parse_next(input)?;
            Ok(Expr::Compare {
                left: Box::new(left),
                op,
                right: Box::new(right),
            })
        }
        Some(CompareToken::Match) => {
            let pattern = cut_err(pattern).parse_next(input)?;
            Ok(Expr::Match {
                subject: Box::new(left),
                pattern,
            })
        }
        None => Ok(left),
    }
}

fn and_expr(input: &mut &str) -> ModalResult<Expr> {
    let first = comparison(input)?;
    let rest: Vec<Expr> =
        repeat(0.., preceded((sp, "&&"), cut_err(comparison))).parse_next(input)?;
    Ok(rest
        .into_iter()
        .fold(first, |acc, r| Expr::And(Box::new(acc), Box::new(r))))
}

fn or_expr(input: &mut &str) -> ModalResult<Expr> {
    let first = and_expr(input)?;
    let rest: Vec<Expr> =
        repeat(0.., preceded((sp, "||"), cut_err(and_expr))).parse_next(input)?;
    Ok(rest
        .into_iter()
        .fold(first, |acc, r| Expr::Or(Box::new(acc), Box::new(r))))
}

fn expr(input: &mut &str) -> ModalResult<Expr> {
    sp.parse_next(input)?;
    or_expr(input)
}

pub fn full_expression(input: &mut &str) -> ModalResult<Expr> {
    terminated(expr, sp).parse_next(input)
}

// -- Call site declarations -------------------------------------------------

fn params<'i>(input: &mut &'i str) -> ModalResult<Vec<&'i str>> {
    delimited(
        ('(', sp),
        separated(0.., segment, (sp, ',', sp)),
        (sp, cut_err(')')),
    )
    .parse_next(input)
}

/// The message part of a `check` line: one string literal, optionally
/// followed by a `#` comment.
fn trailing_message(input: &mut &str) -> ModalResult<String> {
    let message = delimited(sp, string_literal, sp).parse_next(input)?;
    opt(('#', till_line_ending)).void().parse_next(input)?;
    Ok(message)
}

/// Split a `check` line at the first `=>` that is followed by nothing but
/// the message, so `=>` may appear inside a regex or the message itself.
fn split_check(line: &str) -> Option<Rule> {
    let line = line.trim();
    for (pos, _) in line.match_indices("=>") {
        if let Ok(message) = trailing_message.parse(&line[pos + 2..]) {
            let expression = line[..pos].trim_end();
            return (!expression.is_empty()).then(|| Rule::new(expression, message));
        }
    }
    (!line.is_empty()).then(|| Rule::new(line, ""))
}

fn check_line(input: &mut &str) -> ModalResult<Rule> {
    ws.parse_next(input)?;
    "check".parse_next(input)?;
    blanks.parse_next(input)?;
    let line = till_line_ending.parse_next(input)?;
    split_check(line).ok_or_else(|| ErrMode::from_input(input).cut())
}

fn site_def(input: &mut &str) -> ModalResult<CallSite> {
    ws.parse_next(input)?;
    "site".parse_next(input)?;
    blanks.parse_next(input)?;

    let name = cut_err(path)
        .context(StrContext::Expected(StrContextValue::Description(
            "call site name",
        )))
        .parse_next(input)?;

    sp.parse_next(input)?;
    let params = cut_err(params)
        .context(StrContext::Expected(StrContextValue::Description(
            "parameter list",
        )))
        .parse_next(input)?;

    sp.parse_next(input)?;
    cut_err(':').parse_next(input)?;

    let rules: Vec<Rule> = cut_err(repeat(1.., check_line))
        .context(StrContext::Expected(StrContextValue::Description("check")))
        .parse_next(input)?;

    Ok(CallSite::new(name, params).with_rules(rules))
}

// -- Top-level parser -------------------------------------------------------

pub fn parse_sites(input: &mut &str) -> ModalResult<ParsedSites> {
    let sites: Vec<CallSite> = repeat(0.., site_def).parse_next(input)?;
    ws.parse_next(input)?;
    Ok(ParsedSites { sites })
}
