use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const REPORT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub report_version: String,
    pub generated_at: String,
    #[serde(default = "default_scan_id")]
    pub scan_id: String,
    pub scan: ScanMetadata,
    #[serde(default)]
    pub scan_metrics: ScanMetrics,
    /// True when no SAS controllers were visible and the scan stopped
    /// before walking any ports.
    #[serde(default)]
    pub skipped: bool,
    #[serde(default)]
    pub skip_reason: Option<String>,
    /// Qualifying adapters keyed by their device path.
    pub controllers: BTreeMap<String, Controller>,
    /// Discovered enclosures keyed by normalized WWID.
    pub enclosures: BTreeMap<String, Enclosure>,
}

fn default_scan_id() -> String {
    "unknown".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanMetadata {
    pub device_root: String,
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub secondary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ScanMetrics {
    #[serde(default)]
    pub elapsed_ms: u64,
    #[serde(default)]
    pub controllers: u64,
    #[serde(default)]
    pub ports: u64,
    #[serde(default)]
    pub enclosures: u64,
    #[serde(default)]
    pub disks: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Controller {
    /// Ports beneath the adapter, keyed by port path. A port left without
    /// an enclosure identity is an empty or unresolvable slot.
    #[serde(default)]
    pub ports: BTreeMap<String, Port>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Port {
    pub enclosure: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Enclosure {
    #[serde(default)]
    pub role: Role,
    /// Target-chain paths through which this identity was read. One
    /// enclosure reachable over several ports accumulates one entry per
    /// chain; the first entry anchors disk mapping.
    #[serde(default)]
    pub ports: Vec<String>,
    #[serde(default)]
    pub disks: Vec<Disk>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Disk {
    pub wwid: String,
    pub path: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Primary,
    Secondary,
    #[default]
    Unknown,
}
