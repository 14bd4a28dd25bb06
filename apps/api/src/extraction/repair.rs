//! Character-level JSON repair passes.
//!
//! All three passes share the same discipline: a linear scan with an
//! "inside string" flag and escape passthrough, plus (for truncation) an
//! explicit bracket stack. Brackets and commas that occur inside strings are
//! never treated as structure.

/// Rewrites unescaped `"` characters inside string values as `\"`.
///
/// A quote met while inside a string only counts as the closing quote when
/// the next non-whitespace character is structural (`,` `}` `]` `:`) or the
/// input ends there; anything else means the model emitted a literal quote
/// without escaping it. Escape sequences pass through untouched.
pub fn repair_quotes(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if in_string && c == '\\' {
            out.push(c);
            if i + 1 < chars.len() {
                out.push(chars[i + 1]);
                i += 2;
                continue;
            }
            i += 1;
            continue;
        }

        if c == '"' {
            if !in_string {
                in_string = true;
                out.push(c);
            } else {
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                let closes = j >= chars.len() || matches!(chars[j], ',' | '}' | ']' | ':');
                if closes {
                    in_string = false;
                    out.push(c);
                } else {
                    out.push('\\');
                    out.push('"');
                }
            }
        } else {
            out.push(c);
        }
        i += 1;
    }

    out
}

/// Removes commas whose next non-whitespace character is `}` or `]`.
pub fn strip_trailing_commas(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if in_string {
            out.push(c);
            if c == '\\' && i + 1 < chars.len() {
                out.push(chars[i + 1]);
                i += 2;
                continue;
            }
            if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                if !(j < chars.len() && matches!(chars[j], '}' | ']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
        i += 1;
    }

    out
}

/// One open container on the bracket stack, with enough position state to
/// drop a trailing incomplete fragment instead of inventing a value for it.
enum Frame {
    Object {
        /// Where the current unfinished `"key": value` pair begins.
        pair_start: Option<usize>,
        seen_colon: bool,
        value_start: Option<usize>,
    },
    Array {
        elem_start: Option<usize>,
    },
}

/// Closes a truncated JSON document.
///
/// Scans with a bracket stack (ignoring brackets inside strings), then:
/// an unterminated string value is closed; an unterminated or dangling
/// `"key"` / `"key":` / `"key": <partial>` fragment is dropped back to where
/// the pair began; a trailing comma is trimmed; every container still open
/// is closed in stack order. A key that was never present in the input can
/// never appear in the output — fragments are only ever dropped.
pub fn repair_truncation(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut stack: Vec<Frame> = Vec::new();
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if in_string {
            match c {
                '\\' => {
                    i += 2;
                    continue;
                }
                '"' => in_string = false,
                _ => {}
            }
            i += 1;
            continue;
        }

        match c {
            '"' => {
                mark_value_start(&mut stack, i);
                in_string = true;
            }
            '{' | '[' => {
                mark_value_start(&mut stack, i);
                stack.push(if c == '{' {
                    Frame::Object {
                        pair_start: None,
                        seen_colon: false,
                        value_start: None,
                    }
                } else {
                    Frame::Array { elem_start: None }
                });
            }
            '}' | ']' => {
                stack.pop();
                // The popped container was a complete value in its parent.
                clear_current(&mut stack);
            }
            ',' => clear_current(&mut stack),
            ':' => {
                if let Some(Frame::Object { seen_colon, .. }) = stack.last_mut() {
                    *seen_colon = true;
                }
            }
            c if c.is_whitespace() => {}
            _ => mark_value_start(&mut stack, i),
        }
        i += 1;
    }

    // Decide where the usable input ends.
    let mut cut = chars.len();
    let mut close_string = false;

    if in_string {
        match stack.last() {
            Some(Frame::Object {
                pair_start,
                seen_colon: false,
                ..
            }) => {
                // Unterminated key: drop the fragment entirely.
                cut = pair_start.unwrap_or(cut);
            }
            _ => close_string = true,
        }
    } else {
        match stack.last() {
            Some(Frame::Object {
                pair_start: Some(start),
                seen_colon,
                value_start,
            }) => {
                let incomplete = match (seen_colon, value_start) {
                    (false, _) => true,
                    (true, None) => true,
                    (true, Some(vs)) => !token_is_complete(&chars[*vs..]),
                };
                if incomplete {
                    cut = *start;
                }
            }
            Some(Frame::Array {
                elem_start: Some(es),
            }) => {
                if !token_is_complete(&chars[*es..]) {
                    cut = *es;
                }
            }
            _ => {}
        }
    }

    let mut out: String = chars[..cut].iter().collect();
    if close_string {
        out.push('"');
    }

    let len = out.trim_end().len();
    out.truncate(len);
    if out.ends_with(',') {
        out.pop();
        let len = out.trim_end().len();
        out.truncate(len);
    }

    for frame in stack.iter().rev() {
        out.push(match frame {
            Frame::Object { .. } => '}',
            Frame::Array { .. } => ']',
        });
    }

    out
}

/// Records where the current key/value/element token begins, if not already
/// inside one.
fn mark_value_start(stack: &mut [Frame], i: usize) {
    match stack.last_mut() {
        Some(Frame::Object {
            pair_start,
            seen_colon,
            value_start,
        }) => {
            if !*seen_colon {
                if pair_start.is_none() {
                    *pair_start = Some(i);
                }
            } else if value_start.is_none() {
                *value_start = Some(i);
            }
        }
        Some(Frame::Array { elem_start }) => {
            if elem_start.is_none() {
                *elem_start = Some(i);
            }
        }
        None => {}
    }
}

fn clear_current(stack: &mut [Frame]) {
    match stack.last_mut() {
        Some(Frame::Object {
            pair_start,
            seen_colon,
            value_start,
        }) => {
            *pair_start = None;
            *seen_colon = false;
            *value_start = None;
        }
        Some(Frame::Array { elem_start }) => *elem_start = None,
        None => {}
    }
}

/// Whether the trailing scalar token starting here survived truncation.
/// Closed strings are complete; numbers are complete when they end on a
/// digit; bare words only when they are exactly `true`/`false`/`null`.
fn token_is_complete(token: &[char]) -> bool {
    let trimmed: Vec<&char> = {
        let mut t: Vec<&char> = token.iter().collect();
        while t.last().is_some_and(|c| c.is_whitespace()) {
            t.pop();
        }
        t
    };
    match trimmed.first() {
        None => false,
        Some('"') => true,
        Some(c) if c.is_ascii_digit() || **c == '-' => {
            trimmed.last().is_some_and(|c| c.is_ascii_digit())
        }
        _ => {
            let s: String = trimmed.iter().copied().collect();
            matches!(s.as_str(), "true" | "false" | "null")
        }
    }
}
