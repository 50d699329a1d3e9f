//! Demo: Download sibling items as one zip archive
//!
//! Usage:
//!   cargo run --example zip -- --email EMAIL --password PASSWORD [--proxy PROXY] [--out FILE] <PATH>...

mod cli;

use cli::{ArgParser, credentials_from_parser, init_logging, usage_and_exit};
use mailrulib::Result;

const USAGE: &str = "Usage: cargo run --example zip -- --email EMAIL --password PASSWORD [--proxy PROXY] [--out FILE] <PATH>...";

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let mut parser = ArgParser::new(USAGE);
    let mut creds = credentials_from_parser(&mut parser, USAGE);
    let out = parser
        .take_value(&["--out"])
        .unwrap_or_else(|| "archive.zip".to_string());
    creds.positionals = parser.remaining();
    if creds.positionals.is_empty() {
        usage_and_exit(USAGE);
    }

    println!("Logging in...");
    let client = creds.login().await?;

    let link = client
        .get_direct_link_zip_archive(&creds.positionals, None)
        .await?;
    println!("Direct link: {}", link);

    let mut file = tokio::fs::File::create(&out).await?;
    let written = client
        .download_items_as_zip_archive_to_writer(&creds.positionals, &mut file)
        .await?;
    println!("Wrote {} bytes to {}", written, out);

    Ok(())
}
