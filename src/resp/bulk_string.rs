use std::ops::Deref;

use crate::RespEncode;

pub const NULL_BULK_STRING: &[u8] = b"$-1\r\n";

/// A length-prefixed binary string. `None` is the null bulk string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd)]
pub struct BulkString(pub(crate) Option<Vec<u8>>);

/// A bulk string represents a single binary string.
/// The string can be of any size, but by default,
/// Redis limits it to 512 MB (see the proto-max-bulk-len configuration directive).
///
/// Format:
///     $<length>\r\n<data>\r\n
///
/// - The dollar sign ($) as the first byte.
/// - One or more decimal digits (0..9) as the string's length, in bytes, as an unsigned, base-10 value.
/// - The CRLF terminator.
/// - The data.
/// - A final CRLF.
///
/// The null bulk string is `$-1\r\n`.
impl RespEncode for BulkString {
    fn encode(self) -> Vec<u8> {
        match self.0 {
            None => NULL_BULK_STRING.to_vec(),
            Some(data) => {
                let mut buf = Vec::with_capacity(data.len() + 16);
                buf.extend_from_slice(&format!("${}\r\n", data.len()).into_bytes());
                buf.extend_from_slice(&data);
                buf.extend_from_slice(b"\r\n");
                buf
            }
        }
    }
}

impl BulkString {
    pub fn new(s: impl Into<Vec<u8>>) -> Self {
        BulkString(Some(s.into()))
    }

    pub fn null() -> Self {
        BulkString(None)
    }

    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }
}

impl Deref for BulkString {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        self.0.as_deref().unwrap_or_default()
    }
}

impl From<&str> for BulkString {
    fn from(value: &str) -> Self {
        BulkString::new(value)
    }
}

#[cfg(test)]
mod tests {
    use crate::RespFrame;

    use super::*;

    #[test]
    fn test_bulk_string_encode() {
        let frame: RespFrame = BulkString::new(b"hello".to_vec()).into();
        assert_eq!(frame.encode(), b"$5\r\nhello\r\n");

        let frame: RespFrame = BulkString::new(vec![]).into();
        assert_eq!(frame.encode(), b"$0\r\n\r\n");

        let frame: RespFrame = BulkString::null().into();
        assert_eq!(frame.encode(), b"$-1\r\n");
    }

    #[test]
    fn test_bulk_string_binary_content() {
        let frame: RespFrame = BulkString::new(b"a\r\nb".to_vec()).into();
        assert_eq!(frame.encode(), b"$4\r\na\r\nb\r\n");
    }

    #[test]
    fn test_null_bulk_string_derefs_empty() {
        let s = BulkString::null();
        assert!(s.is_null());
        assert!(s.is_empty());
        assert_ne!(s, BulkString::new(""));
    }
}
