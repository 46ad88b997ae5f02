use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use rust_poll_chat::config::{self, AppConfig, ClientConfig, StorageConfig};
use rust_poll_chat::network::{ApiClient, PollingClient};
use rust_poll_chat::server;
use rust_poll_chat::storage::UnknownCursorPolicy;
use rust_poll_chat::ui::ChatApp;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(
    name = "rust_poll_chat",
    version,
    about = "Polling chat server and desktop client"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, env = "CHAT_CONFIG", default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Clone, PartialEq, Eq)]
enum Mode {
    /// Run the HTTP chat server (no UI)
    Server {
        /// Address to listen on, e.g. 127.0.0.1:3000
        #[arg(long, env = "CHAT_BIND")]
        bind: Option<String>,
        /// Keep messages in a SQLite file instead of process memory
        #[arg(long, value_name = "PATH")]
        sqlite: Option<PathBuf>,
        /// Messages returned to clients without a cursor
        #[arg(long)]
        history_limit: Option<usize>,
        /// Answer unknown cursors with 400 instead of replaying the whole log
        #[arg(long)]
        reject_unknown_cursor: bool,
    },
    /// Open the chat window (default)
    Client {
        /// Base URL of the chat server
        #[arg(long, env = "CHAT_SERVER_URL")]
        url: Option<String>,
        /// Polling period in milliseconds
        #[arg(long)]
        poll_ms: Option<u64>,
        /// Join immediately with this display name
        #[arg(long)]
        username: Option<String>,
    },
    /// Write the effective configuration to the config path
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let mut app_config = config::load_config(&cli.config);

    match cli.mode {
        Some(Mode::Server {
            bind,
            sqlite,
            history_limit,
            reject_unknown_cursor,
        }) => {
            let server_config = &mut app_config.server;
            if let Some(bind) = bind {
                server_config.bind_addr = bind;
            }
            if let Some(path) = sqlite {
                server_config.storage = StorageConfig::Sqlite { path };
            }
            if let Some(limit) = history_limit {
                server_config.history_limit = limit;
            }
            if reject_unknown_cursor {
                server_config.unknown_cursor = UnknownCursorPolicy::Reject;
            }
            server::serve(server_config).await
        }
        Some(Mode::Client {
            url,
            poll_ms,
            username,
        }) => {
            let client_config = &mut app_config.client;
            if let Some(url) = url {
                client_config.base_url = url;
            }
            if let Some(ms) = poll_ms {
                client_config.poll_interval_ms = ms;
            }
            run_full_client(client_config.clone(), username)
        }
        Some(Mode::InitConfig) => write_config(&cli.config, &app_config),
        None => run_full_client(app_config.client, None),
    }
}

fn write_config(path: &str, app_config: &AppConfig) -> Result<(), Box<dyn Error>> {
    config::save_config(path, app_config)?;
    log::info!("Wrote configuration to {path}");
    Ok(())
}

fn run_full_client(
    client_config: ClientConfig,
    username: Option<String>,
) -> Result<(), Box<dyn Error>> {
    // 1. Tạo các kênh giao tiếp (Channels)
    // UI -> polling loop
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // polling loop -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    // 2. Khởi chạy polling loop (Chạy ngầm)
    let api = ApiClient::new(&client_config.base_url, client_config.request_timeout())?;
    let poller = PollingClient::new(api, client_config.poll_interval(), event_tx, cmd_rx);
    tokio::spawn(poller.run());

    // 3. Khởi chạy UI (Chạy trên Main Thread)
    let options = eframe::NativeOptions::default();
    let mut event_rx = Some(event_rx);
    let base_url = client_config.base_url.clone();

    eframe::run_native(
        "Rust Poll Chat",
        options,
        Box::new(move |cc| {
            let event_receiver = event_rx
                .take()
                .ok_or("chat window initialised twice")?;

            log::info!("Client started against {base_url}");

            Ok(Box::new(ChatApp::new(
                cc,
                cmd_tx.clone(),
                event_receiver,
                username.clone(),
            )))
        }),
    )?;
    Ok(())
}
