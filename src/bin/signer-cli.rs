use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;
use std::path::PathBuf;

use price_signer::keys::{KeyDerivationService, DEFAULT_ACCOUNT_COUNT};

#[derive(Parser)]
#[command(name = "signer-cli")]
#[command(about = "Management CLI for the price signer", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[arg(short, long, env = "SIGNER_ADMIN_KEY", default_value = "")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive and print relayer addresses from SIGNER_MNEMONIC
    Addresses {
        /// SS58 address format
        #[arg(short, long, default_value_t = 42)]
        format: u16,
        #[arg(short, long, default_value_t = DEFAULT_ACCOUNT_COUNT)]
        count: usize,
    },
    /// Check service readiness
    Health,
    /// Submit a signing request read from a JSON file
    Sign {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Fetch one audit record
    Record { id: i64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Addresses { format, count } => {
            let keys = KeyDerivationService::from_env(Some(format), count)?;
            for (index, address) in keys.addresses().enumerate() {
                println!("{:>3}  {}", index, address);
            }
        }
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Sign { file } => {
            let body: Value = serde_json::from_str(&std::fs::read_to_string(&file)?)?;
            let res = client.post(&cli.url).json(&body).send().await?;
            print_response(res).await?;
        }
        Commands::Record { id } => {
            let mut headers = HeaderMap::new();
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
            );
            let res = client
                .get(format!("{}/admin/requests/{}", cli.url, id))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    let rendered = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if status.is_success() {
        println!("{}", rendered);
    } else {
        eprintln!("Error: signer returned status {}", status);
        eprintln!("{}", rendered);
    }
    Ok(())
}
