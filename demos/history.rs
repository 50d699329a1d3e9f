//! Demo: Show the revisions of a file, optionally restoring one
//!
//! Usage:
//!   cargo run --example history -- --email EMAIL --password PASSWORD [--proxy PROXY] [--restore REV [--as NAME]] <PATH>

mod cli;

use cli::{ArgParser, credentials_from_parser, init_logging, usage_and_exit};
use mailrulib::Result;

const USAGE: &str = "Usage: cargo run --example history -- --email EMAIL --password PASSWORD [--proxy PROXY] [--restore REV [--as NAME]] <PATH>";

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let mut parser = ArgParser::new(USAGE);
    let mut creds = credentials_from_parser(&mut parser, USAGE);
    let restore: Option<i64> = parser
        .take_value(&["--restore"])
        .map(|rev| rev.parse().unwrap_or_else(|_| usage_and_exit(USAGE)));
    let new_name = parser.take_value(&["--as"]);
    creds.positionals = parser.remaining();
    if creds.positionals.len() != 1 {
        usage_and_exit(USAGE);
    }
    let path = creds.positionals[0].clone();

    println!("Logging in...");
    let client = creds.login().await?;

    let history = client.get_file_history(&path).await?;
    println!("\n{} revisions of {}\n", history.len(), path);
    for revision in &history {
        let marker = if revision.is_current_version { "*" } else { " " };
        println!(
            " {} rev {:>6}  {}  {:>10}  {}",
            marker,
            revision.revision,
            revision.last_modified.format("%Y-%m-%d %H:%M:%S"),
            revision.size.to_string(),
            revision.hash
        );
    }

    if let Some(rev) = restore {
        // Without a new name the revision replaces the current file.
        let rewrite = new_name.is_none();
        let restored = client
            .restore_file_from_history(&path, rev, rewrite, new_name.as_deref().unwrap_or(""))
            .await?;
        println!("\nRestored revision {} to {}", rev, restored.full_path());
    }

    Ok(())
}
