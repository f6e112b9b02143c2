//! Operator console input.

use rustyline::DefaultEditor;

use crate::domain::PortParseError;

const PORT_PROMPT: &str = "Listen port: ";

/// Ask the operator for the listen port on the console.
pub fn prompt_listen_port() -> Result<u16, PortParseError> {
    let mut editor = DefaultEditor::new()?;
    let line = editor.readline(PORT_PROMPT)?;
    parse_listen_port(&line)
}

/// Parse a listen port: a positive integer that fits in a TCP port.
pub fn parse_listen_port(input: &str) -> Result<u16, PortParseError> {
    let trimmed = input.trim();
    match trimmed.parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(PortParseError::Invalid(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_port() {
        // テスト項目: 前後の空白を含む正の整数がポートとして解釈される
        // then (期待する結果):
        assert_eq!(parse_listen_port("8080").unwrap(), 8080);
        assert_eq!(parse_listen_port("  65535\n").unwrap(), 65535);
        assert_eq!(parse_listen_port("1").unwrap(), 1);
    }

    #[test]
    fn test_parse_rejects_zero_and_out_of_range() {
        // テスト項目: 0 と範囲外の値は拒否される
        // then (期待する結果):
        assert!(matches!(
            parse_listen_port("0"),
            Err(PortParseError::Invalid(_))
        ));
        assert!(matches!(
            parse_listen_port("65536"),
            Err(PortParseError::Invalid(_))
        ));
        assert!(matches!(
            parse_listen_port("-1"),
            Err(PortParseError::Invalid(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_numeric_input() {
        // テスト項目: 数値以外の入力は拒否され、入力内容がエラーに含まれる
        // when (操作):
        let result = parse_listen_port("http");

        // then (期待する結果):
        match result {
            Err(PortParseError::Invalid(input)) => assert_eq!(input, "http"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
