//! Session management: login, authorization checks and account data.

pub mod account;
mod auth;
mod handle;

pub use account::{DiskUsage, Rate, is_capacity_limited, upload_ceiling};
pub use handle::SessionHandle;
