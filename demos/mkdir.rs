mod cli;

use cli::{init_logging, parse_credentials, usage_and_exit};
use mailrulib::Result;

const USAGE: &str =
    "Usage: cargo run --example mkdir -- --email EMAIL --password PASSWORD [--proxy PROXY] <PATH>";

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let creds = parse_credentials(USAGE);
    if creds.positionals.len() != 1 {
        usage_and_exit(USAGE);
    }
    let target = creds.positionals[0].clone();

    println!("Logging in...");
    let client = creds.login().await?;

    println!("Creating directory: {}", target);
    match client.create_folder(&target).await {
        Ok(folder) => {
            println!("Directory created successfully!");
            println!("Name: {}", folder.name());
            println!("Path: {}", folder.full_path());
        }
        Err(e) => {
            eprintln!("Failed to create directory: {}", e);
        }
    }

    Ok(())
}
