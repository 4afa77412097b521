use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use http::Method;
use serde_json::Value;
use tracing::info;
use wechat_sdk::client::execute::{RequestOptions, Scope};
use wechat_sdk::config::loader::file_to_config;
use wechat_sdk::server;
use wechat_sdk::utils::logging::{self, LogLevel};
use wechat_sdk::WechatClient;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "wechat-sdk.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the access token of the configured application
    Token,
    /// Print the JS-API ticket of the configured application
    Ticket,
    /// Call an API path signed with the access token
    Execute {
        /// Path below base_url, e.g. /user/get
        api: String,
        #[arg(short, long, default_value = "GET")]
        method: Method,
        /// Query parameter as key=value, repeatable
        #[arg(short, long = "param", value_parser = parse_key_value)]
        params: Vec<(String, String)>,
        /// JSON request body
        #[arg(short, long)]
        body: Option<String>,
    },
    /// Exchange a mini-program login code
    Code2session { js_code: String },
    /// Exchange an official-account OAuth code
    Code2token { code: String },
    /// Serve the callback endpoint (and metrics when enabled)
    Serve,
}

fn parse_key_value(raw: &str) -> Result<(String, String)> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .ok_or_else(|| anyhow!("expected key=value, got '{}'", raw))
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config
    // -------------------------------

    let args = Args::parse();
    let config = file_to_config(Path::new(&args.config)).await?;
    logging::run(&config, args.log_level);

    // -------------------------------
    // 2. Build client
    // -------------------------------

    let client = WechatClient::new(config)?;

    // -------------------------------
    // 3. Run command
    // -------------------------------

    match args.command {
        Command::Token => println!("{}", client.access_token().await?),
        Command::Ticket => println!("{}", client.get_ticket().await?),
        Command::Execute { api, method, params, body } => {
            let body = body
                .map(|raw| serde_json::from_str::<Value>(&raw))
                .transpose()
                .context("--body must be valid JSON")?;
            let request = RequestOptions {
                method,
                params: params.into_iter().collect(),
                body,
                ..RequestOptions::default()
            };
            let response = client.execute(&api, request, Scope::default()).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Code2session { js_code } => {
            let session = client.code2session(&js_code).await?;
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
        Command::Code2token { code } => {
            let token = client.code2token(&code).await?;
            println!("{}", serde_json::to_string_pretty(&token)?);
        }
        Command::Serve => {
            info!("Service starting...");
            tokio::select! {
                res = server::server::start(client) => res?,
                _ = tokio::signal::ctrl_c() => info!("shutting down"),
            }
        }
    }

    Ok(())
}
