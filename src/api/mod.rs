//! Cloud API client and response types.

pub mod client;
pub mod endpoints;
mod envelope;
pub mod shard;
pub mod types;

pub use client::{ApiClient, ConflictPolicy, FormData};
pub use envelope::decode_envelope;
pub use shard::{ShardInfo, ShardKind, ShardMap};
pub use types::{
    BillingDuration, CloudItem, CostItem, HistoryRecord, ItemCount, ItemSort, RateRecord,
    SpaceRecord, TokenRecord,
};
