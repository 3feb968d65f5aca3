//! Line codec for history records.
//!
//! A line holds an ordered list of fields separated by commas. Fields that
//! would be ambiguous on their own (delimiters, quotes, whitespace) are wrapped
//! in double quotes, with embedded quotes doubled.

use crate::error::{HistoryError, Result};

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Encode fields into a single line.
pub fn encode<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push(DELIMITER);
        }
        let field = field.as_ref();
        if needs_quoting(field) {
            line.push(QUOTE);
            for c in field.chars() {
                if c == QUOTE {
                    line.push(QUOTE);
                }
                line.push(c);
            }
            line.push(QUOTE);
        } else {
            line.push_str(field);
        }
    }
    line
}

fn needs_quoting(field: &str) -> bool {
    if field.is_empty() || field.trim() != field {
        return true;
    }
    field
        .chars()
        .any(|c| matches!(c, DELIMITER | QUOTE | '\n' | '\r' | '\t' | ' '))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    FieldStart,
    InQuotes,
    Bare,
    FieldEnd,
}

/// Decode a line into its fields.
///
/// Empty and whitespace-only lines yield no fields. A line that decodes to a
/// single empty field although it has visible content (a stray or unbalanced
/// quote) is reported as malformed.
pub fn decode(line: &str) -> Result<Vec<String>> {
    if line.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut fields = Vec::new();
    let mut field = String::new();
    let mut state = State::FieldStart;
    let mut chars = line.chars().peekable();

    // Each arm consumes at most what belongs to its state; `None` ends the scan.
    loop {
        match state {
            State::FieldStart => match chars.peek() {
                Some(&QUOTE) => {
                    chars.next();
                    state = State::InQuotes;
                }
                _ => state = State::Bare,
            },
            State::InQuotes => match chars.next() {
                Some(QUOTE) => {
                    if chars.peek() == Some(&QUOTE) {
                        chars.next();
                        field.push(QUOTE);
                    } else {
                        fields.push(std::mem::take(&mut field));
                        state = State::FieldEnd;
                    }
                }
                Some(c) => field.push(c),
                None => {
                    // Unterminated quote: the field carries nothing.
                    fields.push(String::new());
                    break;
                }
            },
            State::Bare => match chars.next() {
                Some(DELIMITER) => {
                    fields.push(field.trim().to_string());
                    field.clear();
                    state = State::FieldStart;
                }
                // A quote cannot appear inside a bare field; the scan stops there.
                Some(QUOTE) | None => {
                    fields.push(field.trim().to_string());
                    break;
                }
                Some(c) => field.push(c),
            },
            State::FieldEnd => match chars.next() {
                Some(DELIMITER) => state = State::FieldStart,
                // Anything else after a closing quote ends the scan.
                _ => break,
            },
        }
    }

    if fields.len() == 1 && fields[0].is_empty() {
        return Err(HistoryError::malformed(format!(
            "no field could be decoded from {line:?}"
        )));
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_plain_fields() {
        assert_eq!(encode(&["ls", "-la"]), "ls,-la");
        assert_eq!(encode::<&str>(&[]), "");
    }

    #[test]
    fn test_encode_quotes_special_fields() {
        assert_eq!(encode(&["a,b", "plain"]), "\"a,b\",plain");
        assert_eq!(encode(&["git status"]), "\"git status\"");
        assert_eq!(encode(&["say \"hi\""]), "\"say \"\"hi\"\"\"");
        assert_eq!(encode(&["", "x"]), "\"\",x");
        assert_eq!(encode(&[" lead"]), "\" lead\"");
        assert_eq!(encode(&["tab\there"]), "\"tab\there\"");
    }

    #[test]
    fn test_decode_quoted_and_bare() {
        assert_eq!(decode("\"a,b\",plain").unwrap(), vec!["a,b", "plain"]);
        assert_eq!(decode(" x , y ").unwrap(), vec!["x", "y"]);
        assert_eq!(
            decode("\"say \"\"hi\"\"\",2").unwrap(),
            vec!["say \"hi\"", "2"]
        );
        assert_eq!(decode("\"multi\nline\",z").unwrap(), vec!["multi\nline", "z"]);
    }

    #[test]
    fn test_decode_empty_lines() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode("   ").unwrap().is_empty());
        assert!(decode("\t").unwrap().is_empty());
    }

    #[test]
    fn test_decode_empty_fields() {
        assert_eq!(decode(",,").unwrap(), vec!["", "", ""]);
        assert_eq!(decode("a,").unwrap(), vec!["a", ""]);
        assert_eq!(decode("\"\",x").unwrap(), vec!["", "x"]);
    }

    #[test]
    fn test_decode_malformed() {
        let err = decode("\"unterminated").unwrap_err();
        assert!(err.is_malformed());
        assert!(decode("\"").unwrap_err().is_malformed());
        assert!(decode("\"\"").unwrap_err().is_malformed());
    }

    #[test]
    fn test_decode_unterminated_after_first_field() {
        assert_eq!(decode("a,\"open").unwrap(), vec!["a", ""]);
    }

    #[test]
    fn test_decode_whitespace_around_quotes() {
        assert_eq!(decode("\"a\" , b").unwrap(), vec!["a"]);
        assert_eq!(decode("\"a\",  \"b\"").unwrap(), vec!["a", ""]);
        assert!(decode("  \"a b\" , c").unwrap_err().is_malformed());
    }

    #[test]
    fn test_decode_leading_space_before_quote_is_malformed() {
        assert!(decode("  \"x\"").unwrap_err().is_malformed());
        assert!(decode("\t\"x\"").unwrap_err().is_malformed());
    }

    #[test]
    fn test_decode_quote_inside_bare_field_stops() {
        assert_eq!(decode("ab\"c,d").unwrap(), vec!["ab"]);
        assert_eq!(decode("x, y\"z").unwrap(), vec!["x", "y"]);
    }

    #[test]
    fn test_decode_garbage_after_quote_stops() {
        assert_eq!(decode("\"ab\"x,y").unwrap(), vec!["ab"]);
    }

    #[test]
    fn test_round_trip() {
        let samples: Vec<Vec<&str>> = vec![
            vec!["2024-01-01T00:00:00", "ls -la"],
            vec!["a,b", "\"quoted\"", "  spaced  "],
            vec!["", "", ""],
            vec!["tab\tand\nnewline", "plain"],
            vec!["single"],
            vec!["unicode ✓", "日本語"],
        ];
        for fields in samples {
            let line = encode(&fields);
            assert_eq!(decode(&line).unwrap(), fields, "line was {line:?}");
        }
    }
}
