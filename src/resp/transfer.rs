use std::{
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
};

use crate::{RespEncode, RespError};

/// The first bytes of every RDB image.
pub const RDB_MAGIC: &[u8; 5] = b"REDIS";
const RDB_VERSION_LEN: usize = 4;

/// A full-resync payload that was streamed to disk instead of memory.
///
/// The file belongs to whoever receives this value. Nothing deletes it
/// automatically: call [`DatabaseTransfer::remove`] once it has been consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseTransfer {
    path: PathBuf,
    len: u64,
}

/// Only the `$<length>\r\n` preamble is produced, the payload stays on disk.
/// A master sends the same preamble and then streams the file after it.
impl RespEncode for DatabaseTransfer {
    fn encode(self) -> Vec<u8> {
        format!("${}\r\n", self.len).into_bytes()
    }
}

impl DatabaseTransfer {
    pub(crate) fn new(path: PathBuf, len: u64) -> Self {
        DatabaseTransfer { path, len }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the persisted image in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn open(&self) -> io::Result<File> {
        File::open(&self.path)
    }

    /// Reads and validates the RDB header at the start of the file.
    pub fn header(&self) -> Result<RdbHeader, RespError> {
        let mut buf = [0u8; RDB_MAGIC.len() + RDB_VERSION_LEN];
        self.open()?.read_exact(&mut buf)?;
        RdbHeader::parse(&buf)
    }

    pub fn remove(self) -> io::Result<()> {
        std::fs::remove_file(&self.path)
    }
}

/// `REDIS` followed by a four digit, zero padded format version, e.g. `REDIS0011`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RdbHeader {
    pub version: u32,
}

impl RdbHeader {
    pub fn parse(buf: &[u8]) -> Result<Self, RespError> {
        let invalid = || RespError::InvalidRdbHeader(String::from_utf8_lossy(buf).into_owned());
        let Some(version) = buf.strip_prefix(RDB_MAGIC.as_slice()) else {
            return Err(invalid());
        };
        if version.len() < RDB_VERSION_LEN {
            return Err(invalid());
        }
        let version = &version[..RDB_VERSION_LEN];
        if !version.iter().all(u8::is_ascii_digit) {
            return Err(invalid());
        }
        let version = version
            .iter()
            .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));
        Ok(RdbHeader { version })
    }
}
