use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "doctor-config-cli")]
#[command(about = "Management CLI for the configuration service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    /// API key, required when the service has api_key_enabled set.
    #[arg(short, long, env = "DOCTOR_API_KEY")]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current settings snapshot
    Show,
    /// Set section.key to a value and persist it
    Set {
        section: String,
        key: String,
        /// Parsed as JSON when valid (42, true, ["a"]), otherwise sent as a string
        value: String,
    },
    /// Reload the config file on the server
    Reload,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(key) = &cli.key {
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", key))?);
    }

    let res = match cli.command {
        Commands::Show => {
            client
                .get(format!("{}/config/", cli.url))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Set {
            section,
            key,
            value,
        } => {
            client
                .post(format!("{}/config/{}/{}", cli.url, section, key))
                .headers(headers)
                .json(&json!({ "value": parse_value(&value) }))
                .send()
                .await?
        }
        Commands::Reload => {
            client
                .post(format!("{}/config/reload", cli.url))
                .headers(headers)
                .send()
                .await?
        }
    };
    print_response(res).await
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: config API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
