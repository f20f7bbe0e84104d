mod array;
mod bulk_string;
mod err;
mod integer;
mod literal;
mod simple_error;
mod simple_string;
mod transfer;

use enum_dispatch::enum_dispatch;

pub use array::RespArray;
pub use bulk_string::BulkString;
pub use err::RespError;
pub use literal::{parse_integer, parse_length, parse_unsigned};
pub(crate) use literal::check_length;
pub use simple_error::SimpleError;
pub use simple_string::SimpleString;
pub use transfer::{DatabaseTransfer, RdbHeader, RDB_MAGIC};

pub const CRLF: &[u8] = b"\r\n";
pub const CRLF_LEN: usize = CRLF.len();
pub(crate) const BUF_CAP: usize = 4096;

#[enum_dispatch]
pub trait RespEncode {
    fn encode(self) -> Vec<u8>;
}

/// Every value a Redis master can put on an established replication stream.
///
/// The wire alphabet is the RESP2 subset a master actually sends to a replica,
/// plus [`DatabaseTransfer`] for the RDB image shipped during a full resync.
/// According to https://redis.io/docs/latest/develop/reference/protocol-spec/.
#[enum_dispatch(RespEncode)]
#[derive(Debug, Clone, PartialEq)]
pub enum RespFrame {
    SimpleString(SimpleString),
    Error(SimpleError),
    Integer(i64),
    BulkString(BulkString),
    Array(RespArray),
    DatabaseTransfer(DatabaseTransfer),
}

impl RespFrame {
    /// Whether this frame is an error reply.
    pub fn is_error(&self) -> bool {
        matches!(self, RespFrame::Error(_))
    }
}

impl From<&[u8]> for RespFrame {
    fn from(value: &[u8]) -> Self {
        BulkString::new(value).into()
    }
}

impl<const N: usize> From<&[u8; N]> for RespFrame {
    fn from(value: &[u8; N]) -> Self {
        BulkString::new(value.to_vec()).into()
    }
}
