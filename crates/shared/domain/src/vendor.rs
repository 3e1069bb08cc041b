//! POS vendor identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported point-of-sale vendors whose webhooks we ingest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PosVendor {
    Square,
    Toast,
    Clover,
}

impl PosVendor {
    pub const ALL: &[Self] = &[Self::Square, Self::Toast, Self::Clover];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Toast => "toast",
            Self::Clover => "clover",
        }
    }
}

impl fmt::Display for PosVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PosVendor {
    type Err = UnknownVendor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "square" => Ok(Self::Square),
            "toast" => Ok(Self::Toast),
            "clover" => Ok(Self::Clover),
            other => Err(UnknownVendor(other.to_owned())),
        }
    }
}

/// Returned when a webhook path names a vendor we do not integrate with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVendor(pub String);

impl fmt::Display for UnknownVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown POS vendor '{}'", self.0)
    }
}

impl std::error::Error for UnknownVendor {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_vendors() {
        for vendor in PosVendor::ALL {
            assert_eq!(vendor.as_str().parse::<PosVendor>().unwrap(), *vendor);
        }
        assert!("aloha".parse::<PosVendor>().is_err());
    }
}
