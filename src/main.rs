//! zilrpc - one-shot JSON-RPC caller for the zilpool web API.
//!
//! Sends a single request, records the outcome on a status board and
//! renders the board inline in the terminal.
//!
//! ```text
//! zilrpc <endpoint> <method> [params-json]
//! zilrpc http://localhost:4202/api stats_current '[]'
//! ZILRPC_BASE_URL=http://localhost:4202/ zilrpc /api miner_stats '["0x1234..."]'
//! ```

use std::io::{self, IsTerminal};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use ratatui::prelude::*;
use ratatui::{TerminalOptions, Viewport};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zilpool_rpc::config::ClientConfig;
use zilpool_rpc::rpc::{display_value, HttpTransport, RpcClient};
use zilpool_rpc::status::{report_error, report_success, MessageBoard, Severity};

/// Status board target for the call outcome.
const TARGET: &str = "rpc";

const USAGE: &str = "usage: zilrpc <endpoint> <method> [params-json]";

/// Parsed command line.
#[derive(Debug, PartialEq)]
struct Invocation {
    endpoint: String,
    method: String,
    params: Value,
}

impl Invocation {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut args = args.into_iter();
        let endpoint = args.next().ok_or_else(|| anyhow!("missing <endpoint>"))?;
        let method = args.next().ok_or_else(|| anyhow!("missing <method>"))?;
        let params = match args.next() {
            Some(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("params are not valid JSON: {}", raw))?,
            None => Value::Array(Vec::new()),
        };
        if let Some(extra) = args.next() {
            return Err(anyhow!("unexpected argument: {}", extra));
        }

        Ok(Self {
            endpoint,
            method,
            params,
        })
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "zilrpc=info,zilpool_rpc=info".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let invocation = match Invocation::parse(std::env::args().skip(1)) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("Error: {:#}\n{}", e, USAGE);
            return Ok(ExitCode::from(2));
        }
    };

    let config = ClientConfig::load().context("Failed to load configuration")?;
    let transport = HttpTransport::new(&config).context("Failed to create HTTP transport")?;
    let client = RpcClient::new(transport);

    tracing::info!(
        "Calling {} on {} (zilrpc v{})",
        invocation.method,
        invocation.endpoint,
        env!("CARGO_PKG_VERSION")
    );

    let board = Arc::new(Mutex::new(MessageBoard::new()));

    client
        .dispatch(
            &invocation.endpoint,
            &invocation.method,
            invocation.params,
            report_success(Arc::clone(&board), TARGET, display_value),
            report_error(Arc::clone(&board), TARGET),
        )
        .await;

    let board = board
        .lock()
        .map_err(|_| anyhow!("status board lock poisoned"))?;
    let succeeded = outcome_severity(&board) == Some(Severity::Success);

    if io::stdout().is_terminal() {
        render_inline(&board).context("Failed to render status board")?;
    } else {
        print_plain(&board, succeeded);
    }

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn outcome_severity(board: &MessageBoard) -> Option<Severity> {
    board.primary(TARGET).and_then(|message| message.severity)
}

/// Draw the board into an inline viewport below the cursor.
fn render_inline(board: &MessageBoard) -> Result<()> {
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::with_options(
        backend,
        TerminalOptions {
            viewport: Viewport::Inline(board.height()),
        },
    )?;

    terminal.draw(|frame| frame.render_widget(board, frame.area()))?;
    println!();
    Ok(())
}

/// Pipe-friendly output: result on stdout, error on stderr.
fn print_plain(board: &MessageBoard, succeeded: bool) {
    for (_, message) in board.visible() {
        if succeeded {
            println!("{}", message.text);
        } else {
            eprintln!("{}", message.text);
        }
    }
}
