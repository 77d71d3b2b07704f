use std::borrow::Cow;

/// How rule authors spell the null literal.
pub const HOST_NULL: &str = "null";

/// How the expression language spells it.
pub const EVALUATOR_NULL: &str = "nil";

/// Rewrite every standalone `null` token in `expression` to `nil`.
///
/// Only whole identifiers are replaced: `nullable`, `is_null` and a field
/// access such as `user.null` are left alone, as is anything inside a string
/// or regex literal. Expressions without the word `null` are returned
/// borrowed and untouched.
#[must_use]
pub fn normalize(expression: &str) -> Cow<'_, str> {
    if !expression.contains(HOST_NULL) {
        return Cow::Borrowed(expression);
    }

    let bytes = expression.as_bytes();
    let mut out = String::with_capacity(expression.len());
    let mut last = 0;
    let mut i = 0;
    let mut quote: Option<u8> = None;
    let mut prev_significant: Option<u8> = None;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
                prev_significant = Some(b);
            }
            i += 1;
            continue;
        }
        match b {
            b'"' | b'\'' => {
                quote = Some(b);
                i += 1;
            }
            // A slash after an operand would be division; the language has
            // none, so every slash outside a string opens a regex literal.
            b'/' => {
                quote = Some(b'/');
                i += 1;
            }
            b if is_ident_start(b) => {
                let start = i;
                while i < bytes.len() && is_ident_continue(bytes[i]) {
                    i += 1;
                }
                let word = &expression[start..i];
                if word == HOST_NULL && prev_significant != Some(b'.') {
                    out.push_str(&expression[last..start]);
                    out.push_str(EVALUATOR_NULL);
                    last = i;
                }
                prev_significant = Some(bytes[i - 1]);
            }
            b if b.is_ascii_whitespace() => i += 1,
            _ => {
                prev_significant = Some(b);
                i += 1;
            }
        }
    }

    if last == 0 {
        return Cow::Borrowed(expression);
    }
    out.push_str(&expression[last..]);
    Cow::Owned(out)
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
