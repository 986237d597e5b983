use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "checkout-cli")]
#[command(about = "Smoke-test client for the NRS checkout proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    /// Origin header to send, for proxies with strict CORS.
    #[arg(long)]
    origin: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the proxy is up
    Health,
    /// Request a hosted fields token
    Token {
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        external_id: Option<String>,
    },
    /// Run a sale with a hosted fields token
    Pay {
        #[arg(long)]
        token: String,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        external_id: Option<String>,
    },
    /// Create a hosted payment session from a JSON file ({cart, shipping, total})
    Session {
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let (path, body) = match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/", base)).send().await?;
            println!("{} {}", res.status(), res.text().await?);
            return Ok(());
        }
        Commands::Token { amount, external_id } => (
            "/api/nrs/create-token",
            json!({ "amount": amount, "externalId": external_id }),
        ),
        Commands::Pay {
            token,
            amount,
            external_id,
        } => (
            "/api/nrs/pay",
            json!({ "hostedFieldsToken": token, "amount": amount, "externalId": external_id }),
        ),
        Commands::Session { file } => {
            let content = std::fs::read_to_string(&file)?;
            let body: Value = serde_json::from_str(&content)?;
            ("/api/nrs/create-payment", body)
        }
    };

    let mut request = client.post(format!("{}{}", base, path)).json(&body);
    if let Some(origin) = &cli.origin {
        request = request.header(reqwest::header::ORIGIN, origin);
    }
    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    match serde_json::from_str::<Value>(&text) {
        Ok(json) if status.is_success() => println!("{}", serde_json::to_string_pretty(&json)?),
        Ok(json) => {
            eprintln!("Error: proxy returned status {}", status);
            eprintln!("{}", serde_json::to_string_pretty(&json)?);
        }
        Err(_) => {
            eprintln!("Error: proxy returned status {} with non-JSON body", status);
            eprintln!("{}", text);
        }
    }
    Ok(())
}
