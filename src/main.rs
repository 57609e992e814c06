use std::path::PathBuf;

use clap::Parser;
use dotenvy::dotenv;
use expires::{constants::defaults, run};

#[derive(Debug, Parser)]
#[command(name = "expires-gateway", about = "Annotates responses with Expires headers from ordered rules")]
struct Cli {
    /// Path to the gateway configuration file
    #[arg(short, long, env = "EXPIRES_CONFIG", default_value = defaults::CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();
    let cli = Cli::parse();
    run(cli.config).await
}
