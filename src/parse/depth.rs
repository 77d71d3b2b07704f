/// Upper bound on how deeply parsing and evaluating `input` recurses.
///
/// Counts open parentheses, pending `!` prefixes and `&&`/`||` chains
/// outside string and regex literals in one linear pass, so an expression
/// can be rejected before the recursive parser ever sees it.
#[must_use]
pub fn nesting_depth(input: &str) -> usize {
    let bytes = input.as_bytes();
    // (operators, negations) per open parenthesis; index 0 is the top level
    let mut levels: Vec<(usize, usize)> = vec![(0, 0)];
    let mut depth = 0;
    let mut max = 0;
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        let next = bytes.get(i + 1).copied();
        let mut step = 1;
        match b {
            b'"' | b'\'' | b'/' => quote = Some(b),
            b'(' => {
                levels.push((0, 0));
                depth += 1;
            }
            b')' => {
                if levels.len() > 1 {
                    if let Some((ops, bangs)) = levels.pop() {
                        depth -= 1 + ops + bangs;
                    }
                }
            }
            b'!' if next != Some(b'=') => {
                if let Some(level) = levels.last_mut() {
                    level.1 += 1;
                    depth += 1;
                }
            }
            b'&' | b'|' if next == Some(b) => {
                if let Some(level) = levels.last_mut() {
                    depth -= level.1;
                    level.1 = 0;
                    level.0 += 1;
                    depth += 1;
                }
                step = 2;
            }
            b'!' | b'=' | b'<' | b'>' | b',' => {
                if let Some(level) = levels.last_mut() {
                    depth -= level.1;
                    level.1 = 0;
                }
            }
            _ => {}
        }
        max = max.max(depth);
        i += step;
    }
    max
}
