//! Decoder tuning and the agent's command-line arguments.

use std::{path::PathBuf, time::Duration};

use clap::Parser;

/// Default ring-buffer size, 1 MiB.
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024 * 1024;
/// Initial size of the per-value scratch buffer.
pub const DEFAULT_ASSEMBLY_CAPACITY: usize = 512;

/// Knobs for a [`RespStreamDecoder`](crate::RespStreamDecoder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Size the ring buffer starts at and shrinks back to once drained.
    pub buffer_capacity: usize,
    /// Size the assembly buffer starts at and shrinks back to once drained.
    pub assembly_capacity: usize,
    /// Where snapshot temp files are created.
    pub snapshot_dir: PathBuf,
    /// Whether a snapshot payload is followed by `\r\n` like any other bulk string.
    /// Masters that stream the RDB file straight after the `$<len>\r\n` preamble
    /// send no terminator, set this to `false` for them.
    pub snapshot_terminator: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            assembly_capacity: DEFAULT_ASSEMBLY_CAPACITY,
            snapshot_dir: std::env::temp_dir(),
            snapshot_terminator: true,
        }
    }
}

impl DecoderConfig {
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity.max(1);
        self
    }

    pub fn with_assembly_capacity(mut self, capacity: usize) -> Self {
        self.assembly_capacity = capacity;
        self
    }

    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = dir.into();
        self
    }

    pub fn with_snapshot_terminator(mut self, terminator: bool) -> Self {
        self.snapshot_terminator = terminator;
        self
    }
}

/// Command-line arguments for the replica agent
#[derive(Parser, Debug)]
#[command(name = "rreplica")]
#[command(version = "0.1.0")]
#[command(about = "Attach to a Redis master as a replica and decode its stream", long_about = None)]
pub struct AgentArgs {
    /// Master host
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Master port
    #[arg(short, long, default_value_t = 6379)]
    pub port: u16,

    /// Password sent with AUTH before syncing
    #[arg(short = 'a', long)]
    pub password: Option<String>,

    /// Directory to keep received snapshots in. Without it snapshots go to the
    /// system temp dir and are deleted once their header has been checked
    #[arg(long)]
    pub snapshot_dir: Option<PathBuf>,

    /// Ring buffer size in bytes
    #[arg(long, default_value_t = DEFAULT_BUFFER_CAPACITY)]
    pub buffer_capacity: usize,

    /// The master streams the RDB payload without a trailing CRLF
    #[arg(long)]
    pub no_snapshot_terminator: bool,

    /// Reply timeout for handshake commands, in milliseconds
    #[arg(long, default_value_t = 5000)]
    pub timeout_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl AgentArgs {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Received snapshots outlive the agent only when a directory was asked for.
    pub fn keep_snapshots(&self) -> bool {
        self.snapshot_dir.is_some()
    }

    pub fn decoder_config(&self) -> DecoderConfig {
        let config = DecoderConfig::default()
            .with_buffer_capacity(self.buffer_capacity)
            .with_snapshot_terminator(!self.no_snapshot_terminator);
        match &self.snapshot_dir {
            Some(dir) => config.with_snapshot_dir(dir),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DecoderConfig::default();
        assert_eq!(config.buffer_capacity, 1024 * 1024);
        assert_eq!(config.assembly_capacity, 512);
        assert!(config.snapshot_terminator);
        assert_eq!(config.snapshot_dir, std::env::temp_dir());
    }

    #[test]
    fn test_zero_buffer_capacity_is_clamped() {
        let config = DecoderConfig::default().with_buffer_capacity(0);
        assert_eq!(config.buffer_capacity, 1);
    }

    #[test]
    fn test_agent_args() -> anyhow::Result<()> {
        let args = AgentArgs::try_parse_from([
            "rreplica",
            "--host",
            "10.0.0.2",
            "-p",
            "6380",
            "--snapshot-dir",
            "/var/tmp",
            "--no-snapshot-terminator",
        ])?;
        assert_eq!(args.addr(), "10.0.0.2:6380");
        assert_eq!(args.timeout(), Duration::from_millis(5000));

        let config = args.decoder_config();
        assert_eq!(config.snapshot_dir, PathBuf::from("/var/tmp"));
        assert!(!config.snapshot_terminator);
        assert_eq!(config.buffer_capacity, DEFAULT_BUFFER_CAPACITY);
        assert!(args.keep_snapshots());

        let args = AgentArgs::try_parse_from(["rreplica"])?;
        assert!(!args.keep_snapshots());
        assert_eq!(args.decoder_config().snapshot_dir, std::env::temp_dir());
        Ok(())
    }
}
