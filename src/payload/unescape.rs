use std::borrow::Cow;
use std::str::Chars;

/// Decodes backslash escapes left behind when a JSON document was serialized twice.
///
/// Recognised escapes: `\" \\ \/ \' \n \r \t \b \f \a \v`, octal `\ooo`,
/// `\xHH`, `\uXXXX` (surrogate pairs are combined) and `\UXXXXXXXX`.
/// Anything else, including malformed hex escapes, is copied through verbatim.
pub fn unescape(input: &str) -> Cow<'_, str> {
    if !input.contains('\\') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escape) = chars.next() else {
            out.push('\\');
            break;
        };
        match escape {
            '"' | '\\' | '/' | '\'' => out.push(escape),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'a' => out.push('\u{7}'),
            'v' => out.push('\u{b}'),
            '0'..='7' => {
                let mut code = escape.to_digit(8).unwrap_or_default();
                for _ in 0..2 {
                    match take_digits(&mut chars, 1, 8) {
                        Some(d) => code = code * 8 + d,
                        None => break,
                    }
                }
                push_code(&mut out, code);
            }
            'x' => push_or_verbatim(&mut out, &mut chars, escape, 2),
            'U' => push_or_verbatim(&mut out, &mut chars, escape, 8),
            'u' => match take_digits(&mut chars, 4, 16) {
                Some(high @ 0xD800..=0xDBFF) => match take_low_surrogate(&mut chars) {
                    Some(low) => push_code(&mut out, 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)),
                    None => out.push(char::REPLACEMENT_CHARACTER),
                },
                Some(code) => push_code(&mut out, code),
                None => {
                    out.push('\\');
                    out.push('u');
                }
            },
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    Cow::Owned(out)
}

/// Removes one leading and one trailing `"`, each only if present.
pub fn strip_quote_layer(input: &str) -> &str {
    let input = input.strip_prefix('"').unwrap_or(input);
    input.strip_suffix('"').unwrap_or(input)
}

fn push_or_verbatim(out: &mut String, chars: &mut Chars<'_>, escape: char, digits: usize) {
    match take_digits(chars, digits, 16) {
        Some(code) => push_code(out, code),
        None => {
            out.push('\\');
            out.push(escape);
        }
    }
}

fn push_code(out: &mut String, code: u32) {
    out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
}

/// Consumes exactly `count` digits in `radix`, or nothing at all.
fn take_digits(chars: &mut Chars<'_>, count: usize, radix: u32) -> Option<u32> {
    let mut probe = chars.clone();
    let mut code = 0u32;
    for _ in 0..count {
        code = code * radix + probe.next()?.to_digit(radix)?;
    }
    *chars = probe;
    Some(code)
}

fn take_low_surrogate(chars: &mut Chars<'_>) -> Option<u32> {
    let mut probe = chars.clone();
    if probe.next()? != '\\' || probe.next()? != 'u' {
        return None;
    }
    let low = take_digits(&mut probe, 4, 16)?;
    if !(0xDC00..=0xDFFF).contains(&low) {
        return None;
    }
    *chars = probe;
    Some(low)
}
