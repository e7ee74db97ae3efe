use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use console_relay::capture::{CaptureSession, ConsoleHost};
use console_relay::config::CaptureConfig;
use console_relay::event::ConsoleMethod;
use console_relay::value::Value;

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Send console calls to a running console-relay", long_about = None)]
struct Cli {
    /// Full URL of the relay endpoint
    #[arg(short, long, default_value = "http://127.0.0.1:5174/__log")]
    url: String,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,

    /// Reported as the page URL of every event
    #[arg(long)]
    page_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one call; each argument is parsed as JSON, falling back to a string
    Send {
        /// log, info, warn, error, debug or table
        method: ConsoleMethod,
        args: Vec<String>,
    },
    /// Send every stdin line as its own call
    Pipe {
        #[arg(short, long, default_value = "log")]
        method: ConsoleMethod,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = CaptureConfig {
        endpoint_url: cli.url,
        request_timeout_ms: cli.timeout_ms,
        page_url: cli.page_url,
        ..CaptureConfig::default()
    };

    let host = ConsoleHost::global();
    let session = CaptureSession::install(host, &config)?;

    match cli.command {
        Commands::Send { method, args } => {
            let values: Vec<Value> = args.iter().map(String::as_str).map(parse_arg).collect();
            host.call(method, &values);
        }
        Commands::Pipe { method } => {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                host.call(method, &[Value::from(line)]);
            }
        }
    }

    let dropped = session.dropped();
    session.shutdown().await;
    if dropped > 0 {
        eprintln!("{dropped} event(s) dropped: queue full");
    }
    Ok(())
}

fn parse_arg(raw: &str) -> Value {
    serde_json::from_str::<serde_json::Value>(raw)
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(raw))
}
