use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

use crate::dispatch::DispatchConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub crew: CrewConfig,
    #[serde(default)]
    pub ship: ShipConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub traffic: TrafficConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// A single crew member provisioned at startup.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CrewMemberConfig {
    pub name: String,
    pub role: String,
}

/// Crew roster configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrewConfig {
    #[serde(default = "default_crew")]
    pub members: Vec<CrewMemberConfig>,
}

impl Default for CrewConfig {
    fn default() -> Self {
        Self {
            members: default_crew(),
        }
    }
}

fn default_crew() -> Vec<CrewMemberConfig> {
    [
        ("Fry", "Delivery Boy"),
        ("Leela", "Captain"),
        ("Bender", "Bending Unit"),
    ]
    .into_iter()
    .map(|(name, role)| CrewMemberConfig {
        name: name.to_string(),
        role: role.to_string(),
    })
    .collect()
}

/// A single ship provisioned at startup.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ShipEntryConfig {
    pub name: String,
}

/// Fleet configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShipConfig {
    #[serde(default = "default_fleet")]
    pub fleet: Vec<ShipEntryConfig>,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            fleet: default_fleet(),
        }
    }
}

fn default_fleet() -> Vec<ShipEntryConfig> {
    vec![ShipEntryConfig {
        name: "Planet Express Ship".to_string(),
    }]
}

/// Remote collaborator endpoints.
///
/// Any URL left unset is served in-process by this instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServicesConfig {
    /// Base URL of the crew service (e.g. "http://crew-service:8080")
    #[serde(default)]
    pub crew_url: Option<String>,
    /// Base URL of the ship service
    #[serde(default)]
    pub ship_url: Option<String>,
    /// Base URL of the package service
    #[serde(default)]
    pub package_url: Option<String>,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            crew_url: None,
            ship_url: None,
            package_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

/// Synthetic traffic generator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrafficConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Delivery endpoint the generator posts to
    #[serde(default = "default_target_url")]
    pub target_url: String,
    /// Delay between requests (milliseconds)
    #[serde(default = "default_interval")]
    pub interval_ms: u64,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            target_url: default_target_url(),
            interval_ms: default_interval(),
        }
    }
}

fn default_target_url() -> String {
    "http://127.0.0.1:8080/api/v1/deliveries".to_string()
}

fn default_interval() -> u64 {
    5000
}
