use clap::{Parser, Subcommand, ValueEnum};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "switch-cli")]
#[command(about = "Admin CLI for LMS waffle switches and code owners", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8081")]
    url: String,

    #[arg(short, long, env = "LMS_ADMIN_API_KEY", default_value = "CHANGE_ME_IN_PRODUCTION")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service status
    Status,
    /// List waffle switches and their state
    Switches,
    /// Turn a waffle switch on or off
    Set {
        /// Fully namespaced switch name, e.g. course_detail.course_detail_update_certificate_date
        name: String,
        state: SwitchArg,
    },
    /// Show the processed code owner table
    CodeOwners,
}

#[derive(Clone, Copy, ValueEnum)]
enum SwitchArg {
    On,
    Off,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    let request = match cli.command {
        Commands::Status => client.get(format!("{}/admin/status", cli.url)),
        Commands::Switches => client.get(format!("{}/admin/switches", cli.url)),
        Commands::Set { name, state } => client
            .put(format!("{}/admin/switches/{}", cli.url, name))
            .json(&json!({ "active": matches!(state, SwitchArg::On) })),
        Commands::CodeOwners => client.get(format!("{}/admin/code-owners", cli.url)),
    };

    let res = request.headers(headers).send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
