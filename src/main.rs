use clap::Parser;
use rreplica::{network::ReplicaConnection, AgentArgs, DatabaseTransfer, RespFrame};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = AgentArgs::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let addr = args.addr();
    info!("R-Replica is attaching to {}", addr);
    let mut conn = ReplicaConnection::connect(&addr, args.decoder_config(), args.timeout()).await?;

    if let Some(password) = &args.password {
        conn.authenticate(password).await?;
        info!("Authenticated with {}", addr);
    }

    let pong = conn.send_command(["PING"]).await?;
    if pong.is_error() {
        warn!("PING rejected: {:?}", pong);
    }

    conn.send(["SYNC"]).await?;
    loop {
        match conn.next_frame().await {
            Ok(Some(RespFrame::DatabaseTransfer(transfer))) => {
                settle_snapshot(transfer, args.keep_snapshots())?
            }
            Ok(Some(frame)) => info!("{:?}", frame),
            Ok(None) => {
                info!("Master {} closed the replication stream", addr);
                return Ok(());
            }
            Err(e) => {
                error!("Error decoding stream from {}: {}", addr, e);
                return Err(e);
            }
        }
    }
}

// Logs the snapshot header, then deletes the file unless it is to be kept.
fn settle_snapshot(transfer: DatabaseTransfer, keep: bool) -> anyhow::Result<()> {
    match transfer.header() {
        Ok(header) => info!(
            path = %transfer.path().display(),
            bytes = transfer.len(),
            version = header.version,
            "Received snapshot"
        ),
        Err(e) => warn!(path = %transfer.path().display(), "Invalid snapshot: {}", e),
    }
    if !keep {
        transfer.remove()?;
    }
    Ok(())
}
