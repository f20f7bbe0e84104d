use std::time::Duration;

use anyhow::{anyhow, bail};
use futures::{SinkExt, StreamExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio_util::codec::Framed;
use tracing::{debug, info};

use crate::{DecoderConfig, RespArray, RespCodec, RespFrame};

/// A connection to a Redis master, decoding everything it sends.
pub struct ReplicaConnection {
    framed: Framed<TcpStream, RespCodec>,
    timeout: Duration,
}

impl ReplicaConnection {
    pub async fn connect(
        addr: impl ToSocketAddrs,
        config: DecoderConfig,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| anyhow!("connect timed out after {:?}", timeout))??;
        info!("Connected to {}", stream.peer_addr()?);
        Ok(Self::from_stream(stream, config, timeout))
    }

    pub fn from_stream(stream: TcpStream, config: DecoderConfig, timeout: Duration) -> Self {
        ReplicaConnection {
            framed: Framed::new(stream, RespCodec::new(config)),
            timeout,
        }
    }

    /// Writes a command without waiting for a reply.
    pub async fn send<I, S>(&mut self, args: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let cmd = RespArray::command(args);
        debug!("Send {:?}", cmd);
        self.framed.send(RespFrame::from(cmd)).await?;
        Ok(())
    }

    /// Writes a command and waits for the next frame as its reply.
    pub async fn send_command<I, S>(&mut self, args: I) -> anyhow::Result<RespFrame>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        self.send(args).await?;
        match tokio::time::timeout(self.timeout, self.next_frame()).await {
            Ok(Ok(Some(frame))) => Ok(frame),
            Ok(Ok(None)) => Err(anyhow!("connection closed")),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(anyhow!("no reply within {:?}", self.timeout)),
        }
    }

    pub async fn authenticate(&mut self, password: &str) -> anyhow::Result<()> {
        match self.send_command(["AUTH", password]).await? {
            RespFrame::Error(e) => bail!("authentication failed: {}", e),
            _ => Ok(()),
        }
    }

    /// The next decoded frame, or `None` once the master closed the stream.
    pub async fn next_frame(&mut self) -> anyhow::Result<Option<RespFrame>> {
        match self.framed.next().await {
            Some(frame) => Ok(Some(frame?)),
            None => Ok(None),
        }
    }
}
