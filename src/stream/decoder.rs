use std::mem;

use bytes::{BufMut, BytesMut};
use tracing::{debug, trace};

use crate::{
    parse_integer, parse_length, parse_unsigned, resp::check_length, BulkString, DecoderConfig,
    RespArray, RespError, RespFrame, SimpleError, SimpleString, CRLF, CRLF_LEN, RDB_MAGIC,
};

use super::{ring_buffer::RingBuffer, snapshot::SnapshotSink};

/// Resumable RESP decoder for the stream a master sends to its replica.
///
/// Bytes go in through [`feed`](Self::feed) in whatever chunks the transport
/// delivers, complete frames come out of [`drain`](Self::drain). Only the value
/// currently in progress is held in memory; a bulk string that turns out to be
/// an RDB image is streamed to a temp file instead.
///
/// One instance per connection. After `feed` returns an error the decoder is
/// left as it was at the failure and should be dropped with the connection.
#[derive(Debug)]
pub struct RespStreamDecoder {
    config: DecoderConfig,
    ring: RingBuffer,
    // scratch for the value in progress: type line, length digits or bulk content
    assembly: BytesMut,
    pending: Option<Pending>,
    // open arrays, innermost last
    aggregates: Vec<Aggregate>,
    output: Vec<RespFrame>,
}

#[derive(Debug)]
enum Pending {
    SimpleString,
    Error,
    Integer,
    // `None` until the first length byte has been checked for a sign
    BulkLength { negative: Option<bool> },
    BulkContent(BulkContent),
    ArrayLength,
}

#[derive(Debug)]
struct BulkContent {
    declared: usize,
    read: usize,
    snapshot: Snapshot,
    // how many bytes of the trailing CRLF have been verified
    terminator: usize,
}

#[derive(Debug)]
enum Snapshot {
    Unchecked,
    Plain,
    Streaming(SnapshotSink),
}

#[derive(Debug)]
struct Aggregate {
    declared: usize,
    items: Vec<RespFrame>,
}

enum Step {
    Frame(RespFrame),
    Open(usize),
    Continue,
    NeedMore,
}

impl Default for RespStreamDecoder {
    fn default() -> Self {
        RespStreamDecoder::new(DecoderConfig::default())
    }
}

impl RespStreamDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        RespStreamDecoder {
            ring: RingBuffer::with_capacity(config.buffer_capacity),
            assembly: BytesMut::with_capacity(config.assembly_capacity),
            pending: None,
            aggregates: Vec::new(),
            output: Vec::new(),
            config,
        }
    }

    /// Buffers `data` and decodes as many complete frames as it allows.
    pub fn feed(&mut self, data: &[u8]) -> Result<(), RespError> {
        debug!("Recv {} bytes", data.len());
        self.ring.write(data);
        while self.ring.has_remaining() {
            match self.decode_one()? {
                Some(frame) => self.output.push(frame),
                None => break,
            }
        }
        Ok(())
    }

    /// Takes every frame completed since the last call.
    pub fn drain(&mut self) -> Vec<RespFrame> {
        let frames = mem::take(&mut self.output);
        self.ring.reclaim();
        if self.assembly.is_empty() && self.assembly.capacity() > self.config.assembly_capacity {
            self.assembly = BytesMut::with_capacity(self.config.assembly_capacity);
        }
        frames
    }

    /// Feeds `data` and drains in one go.
    pub fn decode(&mut self, data: &[u8]) -> Result<Vec<RespFrame>, RespError> {
        self.feed(data)?;
        Ok(self.drain())
    }

    /// Decodes the next top-level frame from buffered bytes.
    /// `None` means the buffer ran dry before one was complete.
    pub fn decode_one(&mut self) -> Result<Option<RespFrame>, RespError> {
        loop {
            let step = match self.step() {
                Ok(step) => step,
                Err(e) => {
                    self.abort_snapshot();
                    return Err(e);
                }
            };
            match step {
                Step::NeedMore => return Ok(None),
                Step::Continue => {}
                Step::Open(len) => {
                    self.pending = None;
                    self.aggregates.push(Aggregate {
                        declared: len,
                        items: Vec::with_capacity(len.min(1024)),
                    });
                    trace!(len, depth = self.aggregates.len(), "array opened");
                }
                Step::Frame(frame) => {
                    self.pending = None;
                    self.assembly.clear();
                    if let Some(frame) = self.complete(frame) {
                        return Ok(Some(frame));
                    }
                }
            }
        }
    }

    /// Unread bytes waiting in the ring buffer.
    pub fn buffered(&self) -> usize {
        self.ring.len()
    }

    /// Current ring buffer capacity.
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Whether no value, and no array, is partially decoded.
    pub fn is_idle(&self) -> bool {
        self.pending.is_none() && self.aggregates.is_empty()
    }

    fn step(&mut self) -> Result<Step, RespError> {
        if self.pending.is_none() {
            let Some(tag) = self.ring.read_byte() else {
                return Ok(Step::NeedMore);
            };
            self.pending = Some(match tag {
                b'+' => Pending::SimpleString,
                b'-' => Pending::Error,
                b':' => Pending::Integer,
                b'$' => Pending::BulkLength { negative: None },
                b'*' => Pending::ArrayLength,
                // masters emit bare newlines as keepalives around a snapshot transfer
                b'\n' => {
                    trace!("skipping stray line feed");
                    return Ok(Step::Continue);
                }
                other => return Err(RespError::InvalidFrameType(other)),
            });
        }

        let Self {
            config,
            ring,
            assembly,
            pending,
            ..
        } = self;
        let Some(pending) = pending.as_mut() else {
            return Ok(Step::Continue);
        };

        let step = match pending {
            Pending::SimpleString => match read_line(ring, assembly) {
                Some(line) => Step::Frame(SimpleString::from_line(line).into()),
                None => Step::NeedMore,
            },
            Pending::Error => match read_line(ring, assembly) {
                Some(line) => Step::Frame(SimpleError::from_line(line).into()),
                None => Step::NeedMore,
            },
            Pending::Integer => match read_line(ring, assembly) {
                Some(line) => Step::Frame(parse_integer(line)?.into()),
                None => Step::NeedMore,
            },
            Pending::BulkLength { negative } => {
                if negative.is_none() {
                    let Some(b) = ring.read_byte() else {
                        return Ok(Step::NeedMore);
                    };
                    if b == b'-' {
                        *negative = Some(true);
                    } else {
                        *negative = Some(false);
                        assembly.put_u8(b);
                    }
                }
                let negative = *negative == Some(true);
                let Some(line) = read_line(ring, assembly) else {
                    return Ok(Step::NeedMore);
                };
                let len = parse_unsigned(line)?;
                let len = check_length(if negative { -len } else { len })?;
                assembly.clear();

                if len == -1 {
                    Step::Frame(BulkString::null().into())
                } else {
                    let declared = len as usize;
                    *pending = Pending::BulkContent(BulkContent {
                        declared,
                        read: 0,
                        // too short to carry the magic
                        snapshot: if declared < RDB_MAGIC.len() {
                            Snapshot::Plain
                        } else {
                            Snapshot::Unchecked
                        },
                        terminator: 0,
                    });
                    Step::Continue
                }
            }
            Pending::BulkContent(content) => match read_bulk(config, ring, assembly, content)? {
                Some(frame) => Step::Frame(frame),
                None => Step::NeedMore,
            },
            Pending::ArrayLength => {
                let Some(line) = read_line(ring, assembly) else {
                    return Ok(Step::NeedMore);
                };
                let len = parse_length(line)?;
                assembly.clear();
                match len {
                    -1 => Step::Frame(RespArray::null().into()),
                    0 => Step::Frame(RespArray::new(vec![]).into()),
                    n => Step::Open(n as usize),
                }
            }
        };
        Ok(step)
    }

    // Folds a finished frame into the open arrays. Returns the frame that
    // completes at top level, if any.
    fn complete(&mut self, mut frame: RespFrame) -> Option<RespFrame> {
        while let Some(top) = self.aggregates.last_mut() {
            top.items.push(frame);
            if top.items.len() < top.declared {
                return None;
            }
            let done = self.aggregates.pop()?;
            trace!(len = done.declared, depth = self.aggregates.len(), "array closed");
            frame = RespArray::new(done.items).into();
        }
        Some(frame)
    }

    fn abort_snapshot(&mut self) {
        if let Some(Pending::BulkContent(content)) = &mut self.pending {
            if let Snapshot::Streaming(sink) = mem::replace(&mut content.snapshot, Snapshot::Plain)
            {
                sink.discard();
            }
        }
    }
}

// Moves bytes into `assembly` until its last two bytes are CRLF, then returns
// the line without the terminator. Only the tail is checked.
fn read_line<'a>(ring: &mut RingBuffer, assembly: &'a mut BytesMut) -> Option<&'a [u8]> {
    while let Some(b) = ring.read_byte() {
        assembly.put_u8(b);
        if b == b'\n' && assembly.ends_with(CRLF) {
            return Some(&assembly[..assembly.len() - CRLF_LEN]);
        }
    }
    None
}

fn read_bulk(
    config: &DecoderConfig,
    ring: &mut RingBuffer,
    assembly: &mut BytesMut,
    content: &mut BulkContent,
) -> Result<Option<RespFrame>, RespError> {
    while content.read < content.declared {
        // stop at the magic's length so the check happens before more is buffered
        let want = match content.snapshot {
            Snapshot::Unchecked => RDB_MAGIC.len() - content.read,
            _ => content.declared - content.read,
        };
        let chunk = ring.read_chunk(want);
        if chunk.is_empty() {
            return Ok(None);
        }
        content.read += chunk.len();
        match &mut content.snapshot {
            Snapshot::Streaming(sink) => sink.write(chunk)?,
            _ => assembly.extend_from_slice(chunk),
        }

        if matches!(content.snapshot, Snapshot::Unchecked) && content.read == RDB_MAGIC.len() {
            content.snapshot = if assembly.starts_with(RDB_MAGIC) {
                let mut sink = SnapshotSink::create(&config.snapshot_dir)?;
                sink.write(assembly)?;
                assembly.clear();
                Snapshot::Streaming(sink)
            } else {
                Snapshot::Plain
            };
        }
    }

    let terminated = match content.snapshot {
        Snapshot::Streaming(_) => config.snapshot_terminator,
        _ => true,
    };
    if terminated {
        while content.terminator < CRLF_LEN {
            let Some(b) = ring.read_byte() else {
                return Ok(None);
            };
            let expected = CRLF[content.terminator];
            if b != expected {
                return Err(RespError::InvalidTerminator { expected, got: b });
            }
            content.terminator += 1;
        }
    }

    let frame = match mem::replace(&mut content.snapshot, Snapshot::Plain) {
        Snapshot::Streaming(sink) => sink.finish()?.into(),
        _ => BulkString::new(assembly.to_vec()).into(),
    };
    Ok(Some(frame))
}
