use std::ops::Deref;

use crate::{resp::BUF_CAP, BulkString, RespEncode, RespFrame};

pub const NULL_ARRAY: &[u8] = b"*-1\r\n";

/// An ordered sequence of frames. `None` is the null array.
#[derive(Debug, Clone, PartialEq)]
pub struct RespArray(pub(crate) Option<Vec<RespFrame>>);

/// Clients send commands to the Redis server as RESP arrays.
/// Similarly, some Redis commands that return collections of
/// elements use arrays as their replies, and a master propagates
/// every write to its replicas as an array of bulk strings.
///
/// Format:
///     *<number-of-elements>\r\n<element-1>...<element-n>
///
/// - An asterisk (*) as the first byte.
/// - One or more decimal digits (0..9) as the number of elements in the array as an unsigned, base-10 value.
/// - The CRLF terminator.
/// - An additional RESP type for every element of the array.
impl RespEncode for RespArray {
    fn encode(self) -> Vec<u8> {
        match self.0 {
            None => NULL_ARRAY.to_vec(),
            Some(v) => {
                let mut buf = Vec::with_capacity(BUF_CAP);
                buf.extend_from_slice(format!("*{}\r\n", v.len()).as_bytes());
                for frame in v {
                    buf.extend_from_slice(&frame.encode())
                }
                buf
            }
        }
    }
}

impl RespArray {
    pub fn new(s: impl Into<Vec<RespFrame>>) -> Self {
        RespArray(Some(s.into()))
    }

    pub fn null() -> Self {
        RespArray(None)
    }

    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// Builds a command as an array of bulk strings, e.g. `["REPLCONF", "ACK", "0"]`.
    pub fn command<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        RespArray::new(
            args.into_iter()
                .map(|arg| BulkString::new(arg.as_ref()).into())
                .collect::<Vec<RespFrame>>(),
        )
    }
}

impl Deref for RespArray {
    type Target = [RespFrame];
    fn deref(&self) -> &Self::Target {
        self.0.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use crate::{SimpleError, SimpleString};

    use super::*;

    #[test]
    fn test_array_encode() {
        let frame: RespFrame = RespArray::new(vec![
            SimpleString::new("hello").into(),
            SimpleError::new("Err").into(),
            123.into(),
        ])
        .into();
        assert_eq!(frame.encode(), b"*3\r\n+hello\r\n-Err\r\n:123\r\n");

        let frame: RespFrame = RespArray::null().into();
        assert_eq!(frame.encode(), b"*-1\r\n");

        let frame: RespFrame = RespArray::new(vec![]).into();
        assert_eq!(frame.encode(), b"*0\r\n");
    }

    #[test]
    fn test_nested_array_encode() {
        let frame: RespFrame = RespArray::new(vec![
            RespArray::new(vec![1.into(), 2.into()]).into(),
            RespArray::null().into(),
        ])
        .into();
        assert_eq!(frame.encode(), b"*2\r\n*2\r\n:1\r\n:2\r\n*-1\r\n");
    }

    #[test]
    fn test_command() {
        let cmd = RespArray::command(["SYNC"]);
        assert_eq!(cmd.encode(), b"*1\r\n$4\r\nSYNC\r\n");

        let cmd = RespArray::command(["REPLCONF", "listening-port", "6380"]);
        assert_eq!(cmd.len(), 3);
        assert_eq!(
            cmd.encode(),
            b"*3\r\n$8\r\nREPLCONF\r\n$14\r\nlistening-port\r\n$4\r\n6380\r\n"
        );
    }
}
