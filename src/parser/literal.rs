//! Conversion of literal lexemes into values, with the range and escape checks javac applies

use crate::ast::Literal;
use crate::diagnostics::DiagnosticCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    IntTooLarge,
    FpTooLarge,
    FpTooSmall,
    MalformedFp,
    /// Byte offset of the offending backslash within the lexeme
    IllegalEscape(usize),
    /// Byte offset of an `_` that is not between two digits
    IllegalUnderscore(usize),
    UnclosedChar,
}

impl LiteralError {
    pub fn describe(&self) -> (DiagnosticCode, &'static str) {
        match self {
            LiteralError::IntTooLarge => (DiagnosticCode::IntNumberTooLarge, "integer number too large"),
            LiteralError::FpTooLarge => (DiagnosticCode::FpNumberTooLarge, "floating-point number too large"),
            LiteralError::FpTooSmall => (DiagnosticCode::FpNumberTooSmall, "floating-point number too small"),
            LiteralError::MalformedFp => (DiagnosticCode::MalformedFpLit, "malformed floating-point literal"),
            LiteralError::IllegalEscape(_) => (DiagnosticCode::IllegalEscChar, "illegal escape character"),
            LiteralError::IllegalUnderscore(_) => (DiagnosticCode::IllegalUnderscore, "illegal underscore"),
            LiteralError::UnclosedChar => (DiagnosticCode::UnclosedCharLit, "unclosed character literal"),
        }
    }
}

/// Integer or long literal; `negated` folds a preceding unary minus into the value
pub fn integer(lexeme: &str, negated: bool) -> Result<Literal, LiteralError> {
    check_underscores(lexeme)?;
    let (body, is_long) = match lexeme.strip_suffix(['l', 'L']) {
        Some(body) => (body, true),
        None => (lexeme, false),
    };
    let digits: String = body.chars().filter(|&c| c != '_').collect();
    let (radix, digits, decimal) = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        (16, hex, false)
    } else if let Some(bin) = digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")) {
        (2, bin, false)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..], false)
    } else {
        (10, digits.as_str(), true)
    };
    let value = u128::from_str_radix(digits, radix).map_err(|_| LiteralError::IntTooLarge)?;

    if is_long {
        let limit = match (decimal, negated) {
            (true, true) => 1u128 << 63,
            (true, false) => (1u128 << 63) - 1,
            (false, _) => u64::MAX as u128,
        };
        if value > limit {
            return Err(LiteralError::IntTooLarge);
        }
        let v = if decimal { value as i128 as i64 } else { value as u64 as i64 };
        let v = if decimal && negated { (-(value as i128)) as i64 } else if negated { v.wrapping_neg() } else { v };
        Ok(Literal::Long(v))
    } else {
        let limit = match (decimal, negated) {
            (true, true) => 1u128 << 31,
            (true, false) => (1u128 << 31) - 1,
            (false, _) => u32::MAX as u128,
        };
        if value > limit {
            return Err(LiteralError::IntTooLarge);
        }
        let v = if decimal {
            if negated { -(value as i64) } else { value as i64 }
        } else {
            let v = value as u32 as i32;
            (if negated { v.wrapping_neg() } else { v }) as i64
        };
        Ok(Literal::Int(v))
    }
}

/// Float or double literal, decimal or hexadecimal
pub fn floating(lexeme: &str, negated: bool) -> Result<Literal, LiteralError> {
    check_underscores(lexeme)?;
    let text: String = lexeme.chars().filter(|&c| c != '_').collect();
    let (text, is_float) = match text.chars().last() {
        Some('f' | 'F') => (&text[..text.len() - 1], true),
        Some('d' | 'D') if !is_hex(&text) || text.contains(['p', 'P']) => (&text[..text.len() - 1], false),
        _ => (text.as_str(), false),
    };

    let value = if is_hex(text) {
        hex_float(&text[2..]).ok_or(LiteralError::MalformedFp)?
    } else {
        text.parse::<f64>().map_err(|_| LiteralError::MalformedFp)?
    };
    let value = if is_float {
        let narrowed = if is_hex(text) { value as f32 } else { text.parse::<f32>().map_err(|_| LiteralError::MalformedFp)? };
        if narrowed.is_infinite() {
            return Err(LiteralError::FpTooLarge);
        }
        if narrowed == 0.0 && has_nonzero_mantissa(text) {
            return Err(LiteralError::FpTooSmall);
        }
        narrowed as f64
    } else {
        if value.is_infinite() {
            return Err(LiteralError::FpTooLarge);
        }
        if value == 0.0 && has_nonzero_mantissa(text) {
            return Err(LiteralError::FpTooSmall);
        }
        value
    };

    let value = if negated { -value } else { value };
    Ok(if is_float { Literal::Float(value) } else { Literal::Double(value) })
}

/// Underscores may only separate digits: not next to a prefix, point, exponent or suffix
fn check_underscores(lexeme: &str) -> Result<(), LiteralError> {
    let hex = is_hex(lexeme);
    let is_digit = |c: char| if hex { c.is_ascii_hexdigit() } else { c.is_ascii_digit() };
    let bytes = lexeme.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'_' {
            continue;
        }
        let before = lexeme[..i].trim_end_matches('_').chars().last();
        let after = lexeme[i..].trim_start_matches('_').chars().next();
        if !before.map_or(false, is_digit) || !after.map_or(false, is_digit) {
            return Err(LiteralError::IllegalUnderscore(i));
        }
    }
    Ok(())
}

fn is_hex(text: &str) -> bool {
    text.starts_with("0x") || text.starts_with("0X")
}

fn has_nonzero_mantissa(text: &str) -> bool {
    let hex = is_hex(text);
    let mantissa = if hex { &text[2..] } else { text };
    let end = mantissa
        .find(|c: char| if hex { c == 'p' || c == 'P' } else { c == 'e' || c == 'E' })
        .unwrap_or(mantissa.len());
    mantissa[..end].chars().any(|c| c.is_ascii_hexdigit() && c != '0')
}

/// `1.8p1` style hexadecimal significand and binary exponent, without the `0x` prefix
fn hex_float(text: &str) -> Option<f64> {
    let p = text.find(['p', 'P'])?;
    let (mantissa, exponent) = (&text[..p], &text[p + 1..]);
    let exponent: i32 = exponent.parse().ok()?;
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    let mut value = 0f64;
    for c in int_part.chars().chain(frac_part.chars()) {
        value = value * 16.0 + c.to_digit(16)? as f64;
    }
    let scale = exponent - 4 * frac_part.len() as i32;
    Some(value * 2f64.powi(scale))
}

/// Value of a `"..."` literal
pub fn string(lexeme: &str) -> Result<String, LiteralError> {
    let inner = lexeme
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(lexeme);
    unescape(inner, false).map_err(|offset| LiteralError::IllegalEscape(offset + 1))
}

/// Value of a `'.'` literal
pub fn character(lexeme: &str) -> Result<char, LiteralError> {
    let inner = lexeme
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(lexeme);
    let value = unescape(inner, false).map_err(|offset| LiteralError::IllegalEscape(offset + 1))?;
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(LiteralError::UnclosedChar),
    }
}

/// Value of a text block: incidental indentation and trailing blanks stripped, then escapes
pub fn text_block(lexeme: &str) -> Result<String, LiteralError> {
    let inner = lexeme
        .strip_prefix("\"\"\"")
        .and_then(|s| s.strip_suffix("\"\"\""))
        .unwrap_or("");
    let normalized = inner.replace("\r\n", "\n").replace('\r', "\n");
    let content = match normalized.split_once('\n') {
        Some((_, rest)) => rest,
        None => "",
    };

    let lines: Vec<&str> = content.split('\n').collect();
    let is_blank = |line: &str| line.chars().all(char::is_whitespace);
    let indent = |line: &str| line.chars().take_while(|c| c.is_whitespace()).count();
    let last = lines.len() - 1;
    let min_indent = lines
        .iter()
        .enumerate()
        .filter(|(i, line)| *i == last || !is_blank(line))
        .map(|(i, line)| if i == last && is_blank(line) { line.chars().count() } else { indent(line) })
        .min()
        .unwrap_or(0);

    let stripped: Vec<String> = lines
        .iter()
        .map(|line| {
            if is_blank(line) {
                String::new()
            } else {
                line.chars().skip(min_indent).collect::<String>().trim_end().to_string()
            }
        })
        .collect();

    // Offsets after stripping no longer match the lexeme; point at the opening delimiter
    unescape(&stripped.join("\n"), true).map_err(|_| LiteralError::IllegalEscape(0))
}

/// Interpret escape sequences; the error is the byte offset of the bad backslash
pub fn unescape(body: &str, text_block: bool) -> Result<String, usize> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some((_, e)) = chars.next() else {
            return Err(i);
        };
        match e {
            'b' => out.push('\u{8}'),
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'f' => out.push('\u{c}'),
            'r' => out.push('\r'),
            's' => out.push(' '),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            '\\' => out.push('\\'),
            '\n' if text_block => {}
            '0'..='7' => {
                let max_len = if e <= '3' { 3 } else { 2 };
                let mut value = e.to_digit(8).unwrap_or(0);
                for _ in 1..max_len {
                    match chars.peek() {
                        Some(&(_, d @ '0'..='7')) => {
                            value = value * 8 + d.to_digit(8).unwrap_or(0);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                out.push(char::from_u32(value).ok_or(i)?);
            }
            'u' => {
                while let Some(&(_, 'u')) = chars.peek() {
                    chars.next();
                }
                let mut code = 0u32;
                for _ in 0..4 {
                    let digit = chars.next().and_then(|(_, d)| d.to_digit(16)).ok_or(i)?;
                    code = code * 16 + digit;
                }
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            _ => return Err(i),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_range_allows_negated_minimum() {
        assert_eq!(integer("2147483647", false), Ok(Literal::Int(2147483647)));
        assert_eq!(integer("2147483648", false), Err(LiteralError::IntTooLarge));
        assert_eq!(integer("2147483648", true), Ok(Literal::Int(-2147483648)));
        assert_eq!(integer("0xFFFFFFFF", false), Ok(Literal::Int(-1)));
        assert_eq!(integer("0x1_0000_0000", false), Err(LiteralError::IntTooLarge));
    }

    #[test]
    fn long_and_radix_forms() {
        assert_eq!(integer("9223372036854775808L", true), Ok(Literal::Long(i64::MIN)));
        assert_eq!(integer("9223372036854775808L", false), Err(LiteralError::IntTooLarge));
        assert_eq!(integer("0b1010", false), Ok(Literal::Int(10)));
        assert_eq!(integer("017", false), Ok(Literal::Int(15)));
        assert_eq!(integer("1_000_000", false), Ok(Literal::Int(1_000_000)));
        assert_eq!(integer("0", false), Ok(Literal::Int(0)));
    }

    #[test]
    fn underscores_only_between_digits() {
        assert_eq!(integer("1_000", false), Ok(Literal::Int(1000)));
        assert_eq!(integer("0xFF__FF", false), Ok(Literal::Int(0xFFFF)));
        assert_eq!(integer("1000_", false), Err(LiteralError::IllegalUnderscore(4)));
        assert_eq!(integer("0x_1", false), Err(LiteralError::IllegalUnderscore(2)));
        assert_eq!(integer("0b1_L", false), Err(LiteralError::IllegalUnderscore(3)));
        assert_eq!(floating("1_.5", false), Err(LiteralError::IllegalUnderscore(1)));
        assert_eq!(floating("1._5", false), Err(LiteralError::IllegalUnderscore(2)));
        assert_eq!(floating("1e1_0", false), Ok(Literal::Double(1e10)));
        assert_eq!(floating("3.141_592", false), Ok(Literal::Double(3.141592)));
    }

    #[test]
    fn floating_forms() {
        assert_eq!(floating("1.5", false), Ok(Literal::Double(1.5)));
        assert_eq!(floating("2.5f", true), Ok(Literal::Float(-2.5)));
        assert_eq!(floating("1e3", false), Ok(Literal::Double(1000.0)));
        assert_eq!(floating("0x1.8p1", false), Ok(Literal::Double(3.0)));
        assert_eq!(floating("1e400", false), Err(LiteralError::FpTooLarge));
        assert_eq!(floating("1e-400", false), Err(LiteralError::FpTooSmall));
        assert_eq!(floating("0.0", false), Ok(Literal::Double(0.0)));
    }

    #[test]
    fn escapes() {
        assert_eq!(string(r#""a\tbA\101\"""#), Ok("a\tbAA\"".to_string()));
        assert_eq!(string(r#""bad \q""#), Err(LiteralError::IllegalEscape(5)));
        assert_eq!(character(r"'\n'"), Ok('\n'));
        assert_eq!(character("'ab'"), Err(LiteralError::UnclosedChar));
    }

    #[test]
    fn text_block_strips_incidental_indentation() {
        let lexeme = "\"\"\"\n    <p>\n      hi\n    </p>\n    \"\"\"";
        assert_eq!(text_block(lexeme), Ok("<p>\n  hi\n</p>\n".to_string()));

        let same_line = "\"\"\"\n  one\\\n  two\"\"\"";
        assert_eq!(text_block(same_line), Ok("onetwo".to_string()));
    }
}
