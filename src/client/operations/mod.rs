//! Cloud operations split into focused modules.

mod browse;
mod dir_ops;
mod download;
mod export;
mod history;
mod upload;
mod utils;
mod zip;

pub use download::Download;
