//! Mock Interview - terminal client for an AI interviewer service
//!
//! Coordinates one mock-interview session over a named-event channel and
//! renders it in the terminal.

mod channel;
mod config;
mod render;
mod runtime;
mod session;
mod state_machine;
mod terminal;

use channel::TcpEventChannel;
use config::Config;
use runtime::SessionRuntime;
use state_machine::SessionContext;
use terminal::Terminal;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging; stdout belongs to the interview
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mock_interview=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = Config::from_env()?;

    let (input_tx, input_rx) = mpsc::channel(config.event_buffer);

    tracing::info!(addr = %config.server_addr, "Connecting to interviewer service");
    let channel = TcpEventChannel::connect(config.server_addr.as_str(), input_tx.clone()).await?;
    tracing::info!(
        peer = %channel.peer(),
        accepts = ?state_machine::inbound_event_names().collect::<Vec<_>>(),
        "Event channel ready"
    );

    let (runtime, handle) = SessionRuntime::new(
        SessionContext::new(),
        channel,
        input_rx,
        input_tx,
        config.reply_timeout,
    );
    tracing::info!(
        session_id = %runtime.context().session_id,
        created_at = %runtime.context().created_at,
        "Session created"
    );

    // Subscribed before spawning so the landing snapshot is not missed
    let terminal = Terminal::new(handle);
    let updates = terminal.subscribe_updates();
    tokio::spawn(runtime.run());

    terminal.run(updates).await?;
    tracing::info!("Goodbye");
    Ok(())
}
