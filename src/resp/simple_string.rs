use std::{fmt, ops::Deref};

use crate::{RespEncode, CRLF};

/// The raw line is kept as sent, so a reply that is not valid UTF-8 still
/// encodes back to the same bytes.
#[derive(Clone, PartialEq, Eq, PartialOrd)]
pub struct SimpleString(pub(crate) Vec<u8>);

/// Simple strings are encoded as a plus (+) character, followed by a string.
/// The string mustn't contain a CR (\r) or LF (\n) character and is terminated by CRLF (i.e., \r\n).
///
/// Examples: +OK\r\n, +FULLRESYNC <replid> <offset>\r\n
impl RespEncode for SimpleString {
    fn encode(self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.0.len() + 3);
        buf.push(b'+');
        buf.extend_from_slice(&self.0);
        buf.extend_from_slice(CRLF);
        buf
    }
}

impl SimpleString {
    pub fn new(s: impl Into<Vec<u8>>) -> Self {
        SimpleString(s.into())
    }

    /// Builds the value from a terminator-stripped line.
    pub(crate) fn from_line(line: &[u8]) -> Self {
        SimpleString(line.to_vec())
    }

    /// The line as text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }
}

impl Deref for SimpleString {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for SimpleString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for SimpleString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SimpleString")
            .field(&String::from_utf8_lossy(&self.0))
            .finish()
    }
}

impl From<&str> for SimpleString {
    fn from(value: &str) -> Self {
        SimpleString::new(value)
    }
}
