//! Demo: Publish an item and print its links
//!
//! Usage:
//!   cargo run --example share -- --email <EMAIL> --password <PASSWORD> [--proxy PROXY] [--unpublish] <PATH>

mod cli;

use cli::{ArgParser, credentials_from_parser, init_logging, usage_and_exit};
use mailrulib::Entry;

const USAGE: &str = "Usage: cargo run --example share -- --email EMAIL --password PASSWORD [--proxy PROXY] [--unpublish] <PATH>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let mut parser = ArgParser::new(USAGE);
    let mut creds = credentials_from_parser(&mut parser, USAGE);
    let mut positionals = parser.remaining();
    let unpublish = positionals.iter().any(|a| a == "--unpublish");
    positionals.retain(|a| a != "--unpublish");
    creds.positionals = positionals;
    if creds.positionals.len() != 1 {
        usage_and_exit(USAGE);
    }
    let path = &creds.positionals[0];

    println!("Logging in...");
    let client = creds.login().await?;

    if unpublish {
        let entry = client.resolve_existing(path).await?;
        match entry.public_link() {
            Some(link) => {
                client.unpublish(link).await?;
                println!("Unpublished {}", path);
            }
            None => println!("{} is not published", path),
        }
        return Ok(());
    }

    match client.publish(path).await? {
        Entry::File(file) => {
            println!("Public link: {}", file.public_link().unwrap_or_default());
            let direct = file.one_time_direct_link().await?;
            println!("One-time download link: {}", direct);
        }
        Entry::Folder(folder) => {
            println!("Public link: {}", folder.public_link().unwrap_or_default());
        }
    }

    Ok(())
}
