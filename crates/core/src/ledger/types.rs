//! Package data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Delivery status of a package.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PackageStatus {
    Pending,
    InTransit,
    Delivered,
}

impl PackageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageStatus::Pending => "pending",
            PackageStatus::InTransit => "in-transit",
            PackageStatus::Delivered => "delivered",
        }
    }
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown package status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for PackageStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PackageStatus::Pending),
            "in-transit" => Ok(PackageStatus::InTransit),
            "delivered" => Ok(PackageStatus::Delivered),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// A package record owned by the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Package {
    /// Opaque identifier generated by the ledger.
    pub id: String,
    pub recipient: String,
    pub address: String,
    pub contents: String,
    pub status: PackageStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when a package is created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPackage {
    pub recipient: String,
    pub address: String,
    pub contents: String,
}

impl NewPackage {
    /// Reject a blank recipient, address or contents.
    pub fn validate(&self) -> Result<(), MissingFieldsError> {
        let missing: Vec<&'static str> = [
            ("recipient", &self.recipient),
            ("address", &self.address),
            ("contents", &self.contents),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(MissingFieldsError(missing))
        }
    }
}

/// Required package fields that were absent or blank.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("missing required field(s): {}", .0.join(", "))]
pub struct MissingFieldsError(pub Vec<&'static str>);

/// Errors returned by ledger operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("package not found: {0}")]
    NotFound(String),
}
