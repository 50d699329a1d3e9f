//! Demo: List a folder of a Mail.ru Cloud account
//!
//! Usage:
//!   cargo run --example ls -- --email YOUR_EMAIL --password YOUR_PASSWORD [--proxy PROXY] [PATH]

mod cli;

use cli::{init_logging, parse_credentials, usage_and_exit};
use mailrulib::Result;

const USAGE: &str =
    "Usage: cargo run --example ls -- --email EMAIL --password PASSWORD [--proxy PROXY] [PATH]";

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let creds = parse_credentials(USAGE);
    if creds.positionals.len() > 1 {
        usage_and_exit(USAGE);
    }
    let path = creds
        .positionals
        .first()
        .cloned()
        .unwrap_or_else(|| "/".to_string());

    println!("Logging in...");
    let client = creds.login().await?;

    let usage = client.session().disk_usage().await?;
    println!(
        "\nStorage: {} used of {} ({} free)",
        usage.used, usage.total, usage.free
    );

    println!("\nListing: {}\n", path);
    let Some(mut folder) = client.get_folder(&path).await? else {
        eprintln!("No folder at {}", path);
        return Ok(());
    };

    let folders = folder.folders().await;
    let files = folder.files().await;
    if folders.is_empty() && files.is_empty() {
        println!("  (empty)");
    }
    for sub in &folders {
        let shared = if sub.public_link().is_some() { " [public]" } else { "" };
        println!("  [dir]  {}{}", sub.name(), shared);
    }
    for file in &files {
        let shared = if file.public_link().is_some() { " [public]" } else { "" };
        println!(
            "  [file] {} {} {}{}",
            file.name(),
            file.size(),
            file.last_modified().format("%Y-%m-%d %H:%M"),
            shared
        );
    }
    println!(
        "\n{} folders, {} files, {} total",
        folder.folders_count(),
        folder.files_count(),
        folder.size()
    );

    Ok(())
}
