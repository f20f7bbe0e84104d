mod codec;
mod decoder;
mod ring_buffer;
mod snapshot;

pub use codec::RespCodec;
pub use decoder::RespStreamDecoder;
pub use ring_buffer::RingBuffer;
pub use snapshot::SnapshotSink;
