use std::{borrow::Cow, fmt, ops::Deref};

use crate::{RespEncode, CRLF};

#[derive(Clone, PartialEq, Eq, PartialOrd)]
pub struct SimpleError(pub(crate) Vec<u8>);

/// Simple errors, or simply just errors, are similar to simple strings,
/// but their first character is the minus (-) character.
///
/// The difference between simple strings and errors in RESP is
/// that clients should treat errors as exceptions,
/// whereas the string encoded in the error type is the error message itself.
///
/// Examples: -Error message\r\n
impl RespEncode for SimpleError {
    fn encode(self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.0.len() + 3);
        buf.push(b'-');
        buf.extend_from_slice(&self.0);
        buf.extend_from_slice(CRLF);
        buf
    }
}

impl SimpleError {
    pub fn new(s: impl Into<Vec<u8>>) -> Self {
        SimpleError(s.into())
    }

    pub(crate) fn from_line(line: &[u8]) -> Self {
        SimpleError(line.to_vec())
    }

    /// The leading upper-case word of the message, e.g. `ERR` or `NOAUTH`.
    pub fn kind(&self) -> Cow<'_, str> {
        let word = self.0.split(|b| *b == b' ').next().unwrap_or_default();
        String::from_utf8_lossy(word)
    }
}

impl Deref for SimpleError {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for SimpleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for SimpleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SimpleError")
            .field(&String::from_utf8_lossy(&self.0))
            .finish()
    }
}

impl From<&str> for SimpleError {
    fn from(value: &str) -> Self {
        SimpleError::new(value)
    }
}

impl From<String> for SimpleError {
    fn from(value: String) -> Self {
        SimpleError::new(value)
    }
}
