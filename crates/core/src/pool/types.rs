//! Resource pool data types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::{CrewMemberConfig, ShipEntryConfig};

/// Class of a pooled resource.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Crew,
    Ship,
}

impl ResourceKind {
    /// Label used in logs, metrics and URL paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Crew => "crew",
            ResourceKind::Ship => "ship",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A crew member or ship, as seen by callers.
///
/// Values handed out by a pool are snapshots; the pool keeps the live record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
    /// Job title. Only crew members have one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub available: bool,
}

/// Provisioning entry for a pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSpec {
    pub name: String,
    pub role: Option<String>,
}

impl ResourceSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

impl From<&CrewMemberConfig> for ResourceSpec {
    fn from(member: &CrewMemberConfig) -> Self {
        ResourceSpec::new(&member.name).with_role(&member.role)
    }
}

impl From<&ShipEntryConfig> for ResourceSpec {
    fn from(ship: &ShipEntryConfig) -> Self {
        ResourceSpec::new(&ship.name)
    }
}

/// Errors returned by pool operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PoolError {
    /// Every resource is claimed or being examined by another caller.
    #[error("no {0} available")]
    Exhausted(ResourceKind),

    /// No resource with this name exists in the pool.
    #[error("{kind} not found: {name}")]
    NotFound { kind: ResourceKind, name: String },

    /// Release without a name is only defined for single-resource pools.
    #[error("{0} pool does not hold exactly one resource; a name is required")]
    IdentityRequired(ResourceKind),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_serialization_omits_missing_role() {
        let ship = Resource {
            name: "Planet Express Ship".to_string(),
            role: None,
            available: true,
        };
        let json = serde_json::to_value(&ship).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "Planet Express Ship", "available": true})
        );
    }

    #[test]
    fn test_resource_deserializes_name_only() {
        // The crew return boundary only sends a name
        let crew: Resource = serde_json::from_str(r#"{"name": "Fry"}"#).unwrap();
        assert_eq!(crew.name, "Fry");
        assert!(crew.role.is_none());
        assert!(!crew.available);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            PoolError::Exhausted(ResourceKind::Crew).to_string(),
            "no crew available"
        );
        let err = PoolError::NotFound {
            kind: ResourceKind::Crew,
            name: "Zapp".to_string(),
        };
        assert_eq!(err.to_string(), "crew not found: Zapp");
    }
}
