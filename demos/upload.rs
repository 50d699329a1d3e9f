mod cli;

use cli::{ArgParser, credentials_from_parser, init_logging, usage_and_exit};
use mailrulib::progress::make_progress_printer;
use std::process;

const USAGE: &str = "Usage: cargo run --example upload -- --email EMAIL --password PASSWORD [--proxy PROXY] [--name NAME] <LOCAL_FILE> <REMOTE_FOLDER>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let mut parser = ArgParser::new(USAGE);
    let mut creds = credentials_from_parser(&mut parser, USAGE);
    let name = parser.take_value(&["--name"]).unwrap_or_default();
    creds.positionals = parser.remaining();
    if creds.positionals.len() != 2 {
        usage_and_exit(USAGE);
    }
    let local_file = &creds.positionals[0];
    let remote_folder = &creds.positionals[1];

    println!("Logging in...");
    let client = creds.login().await?;
    client.on_progress(make_progress_printer());

    println!("Uploading {} to {}...", local_file, remote_folder);
    match client.upload_file(&name, local_file, remote_folder).await {
        Ok(file) => {
            println!("Upload complete!");
            println!("Created: {} ({})", file.full_path(), file.size());
            println!("Hash: {}", file.hash());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }

    Ok(())
}
