//! Escape decoding for string literal bodies.
//!
//! Single-quoted strings only recognise `\\` and `\'`. Double-quoted strings
//! recognise the usual C-style set plus octal, `\xHH` and `\u{...}`; unknown
//! sequences are kept verbatim, backslash included.
//!
//! This is not `stripcslashes`, which applies the C-style set to both quote
//! styles and turns `'a\nb'` into a newline-separated name. Single-quoted
//! bodies decode to the runtime value, so `'a\nb'` stays `a\nb`.

/// Decode the body of a single-quoted literal (quotes already stripped).
pub fn unescape_single(body: &str) -> String {
    if !body.contains('\\') {
        return body.to_string();
    }
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('\\') | Some('\'') => {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                }
                _ => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Decode the body of a double-quoted literal (quotes already stripped).
///
/// Octal and hex escapes may produce bytes that are not valid UTF-8; those
/// are replaced with U+FFFD.
pub fn unescape_double(body: &str) -> String {
    if !body.contains('\\') {
        return body.to_string();
    }
    let bytes = body.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b != b'\\' || i + 1 >= bytes.len() {
            out.push(b);
            i += 1;
            continue;
        }
        let next = bytes[i + 1];
        let simple = match next {
            b'n' => Some(b'\n'),
            b't' => Some(b'\t'),
            b'r' => Some(b'\r'),
            b'v' => Some(0x0b),
            b'e' => Some(0x1b),
            b'f' => Some(0x0c),
            b'\\' => Some(b'\\'),
            b'$' => Some(b'$'),
            b'"' => Some(b'"'),
            _ => None,
        };
        if let Some(decoded) = simple {
            out.push(decoded);
            i += 2;
            continue;
        }

        match next {
            b'0'..=b'7' => {
                let digits = take_while(&bytes[i + 1..], 3, |c| (b'0'..=b'7').contains(&c));
                let value = digits
                    .iter()
                    .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
                out.push((value & 0xff) as u8);
                i += 1 + digits.len();
            }
            b'x' => {
                let digits = take_while(&bytes[i + 2..], 2, |c| c.is_ascii_hexdigit());
                if digits.is_empty() {
                    out.extend_from_slice(b"\\x");
                    i += 2;
                } else {
                    let value = digits.iter().fold(0u32, |acc, d| acc * 16 + hex_value(*d));
                    out.push(value as u8);
                    i += 2 + digits.len();
                }
            }
            b'u' => match decode_unicode(&bytes[i + 2..]) {
                Some((ch, consumed)) => {
                    let mut buf = [0u8; 4];
                    out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                    i += 2 + consumed;
                }
                None => {
                    out.extend_from_slice(b"\\u");
                    i += 2;
                }
            },
            _ => {
                out.push(b'\\');
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn take_while(bytes: &[u8], max: usize, pred: impl Fn(u8) -> bool) -> &[u8] {
    let n = bytes.iter().take(max).take_while(|b| pred(**b)).count();
    &bytes[..n]
}

fn hex_value(d: u8) -> u32 {
    match d {
        b'0'..=b'9' => u32::from(d - b'0'),
        b'a'..=b'f' => u32::from(d - b'a' + 10),
        b'A'..=b'F' => u32::from(d - b'A' + 10),
        _ => 0,
    }
}

/// Parse `{HEX+}` at the start of `bytes`. Returns the char and bytes consumed.
fn decode_unicode(bytes: &[u8]) -> Option<(char, usize)> {
    if bytes.first() != Some(&b'{') {
        return None;
    }
    let close = bytes.iter().position(|b| *b == b'}')?;
    let digits = &bytes[1..close];
    if digits.is_empty() || digits.len() > 6 || !digits.iter().all(|d| d.is_ascii_hexdigit()) {
        return None;
    }
    let value = digits.iter().fold(0u32, |acc, d| acc * 16 + hex_value(*d));
    char::from_u32(value).map(|ch| (ch, close + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_quoted_keeps_unknown_escapes() {
        assert_eq!(unescape_single(r"it\'s"), "it's");
        assert_eq!(unescape_single(r"a\\b"), r"a\b");
        assert_eq!(unescape_single(r"line\n"), r"line\n");
    }

    #[test]
    fn double_quoted_decodes_c_style_set() {
        assert_eq!(unescape_double(r"a\tb\nc"), "a\tb\nc");
        assert_eq!(unescape_double(r#"say \"hi\""#), "say \"hi\"");
        assert_eq!(unescape_double(r"cost \$5"), "cost $5");
        assert_eq!(unescape_double(r"\q"), r"\q");
    }

    #[test]
    fn double_quoted_numeric_escapes() {
        assert_eq!(unescape_double(r"\101\x42"), "AB");
        assert_eq!(unescape_double(r"\u{e9}t\u{E9}"), "été");
        assert_eq!(unescape_double(r"\xZZ"), r"\xZZ");
        assert_eq!(unescape_double(r"\u{zz}"), r"\u{zz}");
    }

    #[test]
    fn trailing_backslash_is_kept() {
        assert_eq!(unescape_double("end\\"), "end\\");
    }
}
