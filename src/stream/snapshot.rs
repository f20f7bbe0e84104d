use std::{
    io::{BufWriter, Write},
    path::Path,
};

use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::{DatabaseTransfer, RespError};

/// Append-only file that receives the bytes of an RDB payload while it streams in.
///
/// Dropping an unfinished sink closes and deletes its file.
#[derive(Debug)]
pub struct SnapshotSink {
    writer: BufWriter<NamedTempFile>,
    written: u64,
}

impl SnapshotSink {
    pub fn create(dir: &Path) -> Result<Self, RespError> {
        let file = tempfile::Builder::new()
            .prefix("rreplica-")
            .suffix(".rdb")
            .tempfile_in(dir)?;
        info!(path = %file.path().display(), "snapshot transfer started");
        Ok(SnapshotSink {
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn write(&mut self, data: &[u8]) -> Result<(), RespError> {
        self.writer.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn path(&self) -> &Path {
        self.writer.get_ref().path()
    }

    /// Flushes and closes the file, handing ownership of it to the returned value.
    pub fn finish(self) -> Result<DatabaseTransfer, RespError> {
        let written = self.written;
        let file = self.writer.into_inner().map_err(|e| e.into_error())?;
        file.as_file().sync_data()?;
        let path = file.into_temp_path().keep().map_err(|e| e.error)?;
        info!(path = %path.display(), bytes = written, "snapshot transfer persisted");
        Ok(DatabaseTransfer::new(path, written))
    }

    /// Closes the file and removes it from disk.
    pub fn discard(self) {
        warn!(
            path = %self.path().display(),
            bytes = self.written,
            "discarding partial snapshot"
        );
    }
}
