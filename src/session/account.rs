//! Account data: disk usage and tariffs.

use tracing::debug;

use super::SessionHandle;
use crate::api::endpoints::{API_VERSION, BILLING_RATES, DISK_SPACE};
use crate::api::{CostItem, RateRecord, SpaceRecord, decode_envelope};
use crate::error::{CloudError, Result};
use crate::fs::Size;

/// Identifier of the free base tariff.
pub const BASE_TARIFF_ID: &str = "ZERO";

/// Single-file upload ceiling of a capacity-limited account.
pub const LIMITED_UPLOAD_CEILING: i64 = 2048 * 1024 * 1024;
/// Single-file upload ceiling of a paid account.
pub const EXTENDED_UPLOAD_CEILING: i64 = 32768 * 1024 * 1024;

const MEGABYTE: i64 = 1024 * 1024;

/// Cloud disk usage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiskUsage {
    pub total: Size,
    pub used: Size,
    pub free: Size,
}

impl From<SpaceRecord> for DiskUsage {
    fn from(record: SpaceRecord) -> Self {
        // The server reports megabytes.
        Self {
            total: Size::new(record.bytes_total as i64 * MEGABYTE),
            used: Size::new(record.bytes_used as i64 * MEGABYTE),
            free: Size::new((record.bytes_total - record.bytes_used) as i64 * MEGABYTE),
        }
    }
}

/// A tariff of the account.
#[derive(Debug, Clone, PartialEq)]
pub struct Rate {
    pub id: String,
    /// Display name; the id when the server sends none
    pub name: String,
    pub is_active: bool,
    pub is_available: bool,
    /// Storage granted by the tariff
    pub size: Size,
    pub cost: Vec<CostItem>,
}

impl From<RateRecord> for Rate {
    fn from(record: RateRecord) -> Self {
        let name = if record.name.is_empty() {
            record.id.clone()
        } else {
            record.name
        };
        Self {
            id: record.id,
            name,
            is_active: record.active,
            is_available: record.available,
            size: Size::new(record.size),
            cost: record.cost,
        }
    }
}

/// An account is capacity-limited when every activated tariff is the base one.
///
/// No activated tariffs at all also counts as limited.
pub fn is_capacity_limited(activated: &[Rate]) -> bool {
    activated.iter().all(|rate| rate.id == BASE_TARIFF_ID)
}

/// Largest single upload the tariffs allow, in bytes.
pub fn upload_ceiling(activated: &[Rate]) -> i64 {
    if is_capacity_limited(activated) {
        LIMITED_UPLOAD_CEILING
    } else {
        EXTENDED_UPLOAD_CEILING
    }
}

impl SessionHandle {
    /// Get disk usage of the account.
    pub async fn disk_usage(&self) -> Result<DiskUsage> {
        self.check_local_authorization()?;
        self.fetch_disk_usage().await
    }

    /// Disk usage request without the local precondition check.
    ///
    /// A non-200 answer means the server no longer accepts the session.
    pub(crate) async fn fetch_disk_usage(&self) -> Result<DiskUsage> {
        let api = self.api();
        let url = api.url(
            DISK_SPACE,
            &[
                ("api", API_VERSION),
                ("email", api.email()),
                ("token", api.token_or_empty()),
            ],
        )?;
        let response = api.get(&url).await?;
        if response.status != 200 {
            return Err(CloudError::not_authorized("Client is not authorized", None));
        }
        let record: SpaceRecord = decode_envelope(&response.body)?;
        Ok(record.into())
    }

    /// Get every tariff known for the account.
    pub async fn rates(&self) -> Result<Vec<Rate>> {
        self.check_authorization().await?;
        self.fetch_rates().await
    }

    pub(crate) async fn fetch_rates(&self) -> Result<Vec<Rate>> {
        let api = self.api();
        let url = api.url(
            BILLING_RATES,
            &[
                ("api", API_VERSION),
                ("email", api.email()),
                ("x-email", api.email()),
                ("token", api.token_or_empty()),
            ],
        )?;
        let response = api.get(&url).await?;
        if !response.is_success() {
            return Err(CloudError::HttpError(response.status));
        }
        let records: Vec<RateRecord> = decode_envelope(&response.body)?;
        debug!("Fetched {} tariffs", records.len());
        Ok(records.into_iter().map(Rate::from).collect())
    }

    /// Check whether the account has the 2 GiB single-upload ceiling.
    pub fn has_size_limit(&self) -> bool {
        is_capacity_limited(self.activated_tariffs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(id: &str) -> Rate {
        Rate::from(RateRecord {
            id: id.to_string(),
            active: true,
            ..Default::default()
        })
    }

    #[test]
    fn test_capacity_gating() {
        assert!(is_capacity_limited(&[rate("ZERO")]));
        assert!(!is_capacity_limited(&[rate("ZERO"), rate("PRO")]));
        assert!(is_capacity_limited(&[]));
    }

    #[test]
    fn test_upload_ceiling_tiers() {
        assert_eq!(upload_ceiling(&[]), 2 * 1024 * 1024 * 1024);
        assert_eq!(upload_ceiling(&[rate("W1T")]), 32 * 1024 * 1024 * 1024);
    }

    #[test]
    fn test_rate_name_defaults_to_id() {
        let r = rate("ZERO");
        assert_eq!(r.name, "ZERO");
        let named = Rate::from(RateRecord {
            id: "W1T".into(),
            name: "1 TB".into(),
            ..Default::default()
        });
        assert_eq!(named.name, "1 TB");
    }

    #[test]
    fn test_disk_usage_from_megabytes() {
        let usage = DiskUsage::from(SpaceRecord {
            bytes_total: 8192.0,
            bytes_used: 1024.0,
            overquota: false,
        });
        assert_eq!(usage.total.bytes(), 8192 * MEGABYTE);
        assert_eq!(usage.used.bytes(), 1024 * MEGABYTE);
        assert_eq!(usage.free.bytes(), 7168 * MEGABYTE);
    }
}
