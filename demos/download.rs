//! Demo: Download a file
//!
//! Usage:
//!   cargo run --example download -- --email YOUR_EMAIL --password YOUR_PASSWORD [--proxy PROXY] <REMOTE_PATH> <LOCAL_PATH>

mod cli;

use cli::{init_logging, parse_credentials, usage_and_exit};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use mailrulib::Result;
use tokio::io::AsyncWriteExt;

const USAGE: &str = "Usage: cargo run --example download -- --email EMAIL --password PASSWORD [--proxy PROXY] <REMOTE_PATH> <LOCAL_PATH>";

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let creds = parse_credentials(USAGE);
    if creds.positionals.len() != 2 {
        usage_and_exit(USAGE);
    }
    let remote_path = creds.positionals[0].clone();
    let local_path = creds.positionals[1].clone();

    println!("Logging in...");
    let client = creds.login().await?;

    println!("Looking for: {}", remote_path);
    let entry = client.resolve_existing(&remote_path).await?;
    let Some(file) = entry.into_file() else {
        return Err(mailrulib::CloudError::Custom(format!(
            "{} is a folder",
            remote_path
        )));
    };
    println!("Found file: {} ({})", file.name(), file.size());

    let download = file.download().await?;
    let progress_bar = ProgressBar::new(download.content_length());
    progress_bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );
    progress_bar.set_message(file.name().to_string());

    // Ctrl-C stops the transfer through the client's cancellation signal.
    let aborter = client.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            aborter.abort_all_async_tasks();
        }
    });

    println!("Downloading to: {}", local_path);
    let mut out = tokio::fs::File::create(&local_path).await?;
    let mut body = download.into_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        out.write_all(&chunk).await?;
        progress_bar.inc(chunk.len() as u64);
    }
    out.flush().await?;
    progress_bar.finish_with_message(format!("{} complete", file.name()));

    println!("Download complete!");
    Ok(())
}
