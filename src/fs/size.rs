//! Byte counts with a human-readable unit.

use std::fmt;

const KB: i64 = 1024;
const MB: i64 = KB * 1024;
const GB: i64 = MB * 1024;
const TB: i64 = GB * 1024;

/// Storage unit picked for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StorageUnit {
    Byte,
    KB,
    MB,
    GB,
    TB,
}

impl StorageUnit {
    fn divisor(&self) -> i64 {
        match self {
            StorageUnit::Byte => 1,
            StorageUnit::KB => KB,
            StorageUnit::MB => MB,
            StorageUnit::GB => GB,
            StorageUnit::TB => TB,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageUnit::Byte => "B",
            StorageUnit::KB => "KB",
            StorageUnit::MB => "MB",
            StorageUnit::GB => "GB",
            StorageUnit::TB => "TB",
        }
    }
}

/// Immutable size of a cloud item.
///
/// The normalized value and unit are derived from the byte count once, at
/// construction; the value is truncated (not rounded) to two decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    bytes: i64,
    normalized_value: f64,
    normalized_unit: StorageUnit,
}

impl Size {
    pub fn new(bytes: i64) -> Self {
        let unit = if bytes < KB {
            StorageUnit::Byte
        } else if bytes < MB {
            StorageUnit::KB
        } else if bytes < GB {
            StorageUnit::MB
        } else if bytes < TB {
            StorageUnit::GB
        } else {
            StorageUnit::TB
        };
        let value = bytes as f64 / unit.divisor() as f64;
        Self {
            bytes,
            normalized_value: (value * 100.0).trunc() / 100.0,
            normalized_unit: unit,
        }
    }

    /// Raw byte count.
    pub fn bytes(&self) -> i64 {
        self.bytes
    }

    /// Magnitude expressed in [`Size::normalized_unit`].
    pub fn normalized_value(&self) -> f64 {
        self.normalized_value
    }

    pub fn normalized_unit(&self) -> StorageUnit {
        self.normalized_unit
    }
}

impl Default for Size {
    fn default() -> Self {
        Size::new(0)
    }
}

impl From<i64> for Size {
    fn from(bytes: i64) -> Self {
        Size::new(bytes)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.normalized_value, self.normalized_unit.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_boundaries() {
        assert_eq!(Size::new(1023).normalized_unit(), StorageUnit::Byte);
        assert_eq!(Size::new(1024).normalized_unit(), StorageUnit::KB);
        assert_eq!(Size::new(1024).normalized_value(), 1.0);
        assert_eq!(Size::new(1_048_575).normalized_unit(), StorageUnit::KB);
        assert_eq!(Size::new(1_048_576).normalized_unit(), StorageUnit::MB);
        assert_eq!(Size::new(GB).normalized_unit(), StorageUnit::GB);
        assert_eq!(Size::new(TB * 3).normalized_unit(), StorageUnit::TB);
    }

    #[test]
    fn test_value_is_truncated() {
        // 1535 / 1024 = 1.499...
        assert_eq!(Size::new(1535).normalized_value(), 1.49);
        // 1048575 / 1024 = 1023.999...
        assert_eq!(Size::new(1_048_575).normalized_value(), 1023.99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Size::new(10).to_string(), "10 B");
        assert_eq!(Size::new(1536).to_string(), "1.5 KB");
    }
}
