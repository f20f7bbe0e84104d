use winnow::{ascii::digit1, combinator::opt, token::one_of, PResult, Parser};

use crate::RespError;

// magnitude only, so i64::MIN is reachable once the sign is applied
fn digits(input: &mut &[u8]) -> PResult<u64> {
    digit1.parse_to().parse_next(input)
}

// [<+|->]<value>
fn integer(input: &mut &[u8]) -> PResult<i64> {
    (opt(one_of([b'+', b'-'])), digits)
        .verify_map(|(sign, v): (Option<u8>, u64)| {
            if sign == Some(b'-') {
                0i64.checked_sub_unsigned(v)
            } else {
                i64::try_from(v).ok()
            }
        })
        .parse_next(input)
}

fn invalid(line: &[u8]) -> RespError {
    RespError::InvalidLiteral(String::from_utf8_lossy(line).into_owned())
}

/// Parses a terminator-stripped integer line, e.g. the payload of `:-42\r\n`.
pub fn parse_integer(line: &[u8]) -> Result<i64, RespError> {
    integer.parse(line).map_err(|_| invalid(line))
}

/// Parses a run of decimal digits with no sign.
pub fn parse_unsigned(line: &[u8]) -> Result<i64, RespError> {
    digits
        .verify_map(|v| i64::try_from(v).ok())
        .parse(line)
        .map_err(|_| invalid(line))
}

/// Parses a length field. `-1` is the null marker, any other negative is rejected.
pub fn parse_length(line: &[u8]) -> Result<i64, RespError> {
    check_length(parse_integer(line)?)
}

pub(crate) fn check_length(len: i64) -> Result<i64, RespError> {
    if len < -1 {
        return Err(RespError::InvalidLength(len));
    }
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer() -> anyhow::Result<()> {
        assert_eq!(parse_integer(b"10")?, 10);
        assert_eq!(parse_integer(b"-10")?, -10);
        assert_eq!(parse_integer(b"+7")?, 7);
        assert_eq!(parse_integer(b"0")?, 0);
        assert_eq!(parse_integer(b"9223372036854775807")?, i64::MAX);

        assert!(matches!(
            parse_integer(b"xxx"),
            Err(RespError::InvalidLiteral(s)) if s == "xxx"
        ));
        assert!(parse_integer(b"").is_err());
        assert!(parse_integer(b"12a").is_err());
        assert!(parse_integer(b"-").is_err());
        assert!(parse_integer(b"99999999999999999999").is_err());

        assert_eq!(parse_integer(b"-9223372036854775808")?, i64::MIN);
        assert!(parse_integer(b"9223372036854775808").is_err());
        assert!(parse_integer(b"-9223372036854775809").is_err());
        Ok(())
    }

    #[test]
    fn test_parse_unsigned() -> anyhow::Result<()> {
        assert_eq!(parse_unsigned(b"0011")?, 11);
        assert!(parse_unsigned(b"-1").is_err());
        assert!(parse_unsigned(b"+1").is_err());
        assert!(parse_unsigned(b"9223372036854775808").is_err());
        Ok(())
    }

    #[test]
    fn test_parse_length() -> anyhow::Result<()> {
        assert_eq!(parse_length(b"3")?, 3);
        assert_eq!(parse_length(b"-1")?, -1);
        assert!(matches!(
            parse_length(b"-2"),
            Err(RespError::InvalidLength(-2))
        ));
        Ok(())
    }
}
