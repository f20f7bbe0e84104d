use std::collections::VecDeque;

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

use crate::{DecoderConfig, RespEncode, RespError, RespFrame, RespStreamDecoder};

/// Adapts [`RespStreamDecoder`] to `tokio_util`'s framing.
///
/// Every chunk the transport reads is handed to the stream decoder in full;
/// frames are then yielded one per `decode` call. A decode error is held back
/// until the frames completed before it have been yielded.
#[derive(Debug, Default)]
pub struct RespCodec {
    decoder: RespStreamDecoder,
    ready: VecDeque<RespFrame>,
    failure: Option<RespError>,
}

impl RespCodec {
    pub fn new(config: DecoderConfig) -> Self {
        RespCodec {
            decoder: RespStreamDecoder::new(config),
            ready: VecDeque::new(),
            failure: None,
        }
    }
}

impl Decoder for RespCodec {
    type Item = RespFrame;
    type Error = RespError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if !src.is_empty() && self.failure.is_none() {
            let chunk = src.split();
            if let Err(e) = self.decoder.feed(&chunk) {
                self.failure = Some(e);
            }
            self.ready.extend(self.decoder.drain());
        }
        match self.ready.pop_front() {
            Some(frame) => Ok(Some(frame)),
            None => match self.failure.take() {
                Some(e) => Err(e),
                None => Ok(None),
            },
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let frame = self.decode(src)?;
        if frame.is_none() && !self.decoder.is_idle() {
            warn!("stream closed in the middle of a frame");
        }
        Ok(frame)
    }
}

impl Encoder<RespFrame> for RespCodec {
    type Error = RespError;

    fn encode(&mut self, item: RespFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(&item.encode());
        Ok(())
    }
}
