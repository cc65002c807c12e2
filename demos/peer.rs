//! Two-peer demo: one side listens and answers queries, the other joins and asks.
//!
//! ```text
//! cargo run --example peer -- listen --port 8601
//! cargo run --example peer -- connect --host 127.0.0.1 --port 8601 --key songs/blue
//! ```

use clap::{Parser, Subcommand};
use peerwire::protocol::{MessageType, PeerAdvert, decode_pong};
use peerwire::transport::FrameError;
use peerwire::{DEFAULT_PORT, JOIN_ACCEPTED, QueryHit, ResourceEntry, Session, join, listen};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "peer", about = "Overlay wire protocol demo peer")]
struct Args {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Accept one peer and answer its messages until it says BYE
    Listen {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Join a listening peer, ping it and run one query
    Connect {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        #[arg(long, default_value = "demo")]
        key: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Args::parse().mode {
        Mode::Listen { host, port } => serve(&host, port),
        Mode::Connect { host, port, key } => ask(&host, port, &key),
    }
}

fn serve(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let handle = listen(host, port)?;
    info!(local = %handle.local_addr(), "waiting for a peer");

    let mut session = handle.accept()?;
    let request = session.expect_join_request()?;
    info!(msg_id = request.header().msg_id(), "join request");
    session.send_join_response(JOIN_ACCEPTED)?;

    loop {
        let message = match session.read_message() {
            Ok(message) => message,
            Err(FrameError::ConnectionClosed { .. }) => break,
            Err(err) => return Err(err.into()),
        };
        match message.message_type() {
            Some(MessageType::Ping) => {
                session.send_pong(&[PeerAdvert::from(handle.local_addr())])?;
            }
            Some(MessageType::Query) => {
                let key = String::from_utf8_lossy(message.body());
                info!(%key, "query");
                let hit = QueryHit::new(
                    key.bytes()
                        .zip(0u16..)
                        .map(|(byte, id)| ResourceEntry::new(id, u32::from(byte)))
                        .collect(),
                );
                session.send_query_hit(&hit)?;
            }
            Some(MessageType::Bye) => {
                info!("peer said bye");
                break;
            }
            other => warn!(?other, "ignoring message"),
        }
    }

    session.close()?;
    Ok(())
}

fn ask(host: &str, port: u16, key: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut session: Session = join(host, port)?;
    info!(local = %session.local_addr(), "joined");

    session.send_ping()?;
    let pong = session.read_message()?;
    for peer in decode_pong(&pong)? {
        info!(peer = %peer.socket_addr(), "advertised");
    }

    session.send_query(key.to_owned())?;
    let hit = session.read_query_hit()?;
    for entry in hit.entries() {
        info!(id = entry.id, value = entry.value, "result");
    }

    session.send_bye()?;
    session.close()?;
    Ok(())
}
