use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::controller::{enumerate_ports, scan_controllers};
use crate::enclosure::{discover_enclosures, map_disks};
use crate::error::ScanError;
use crate::model::{Controller, Enclosure, Report, ScanMetadata, ScanMetrics, REPORT_VERSION};
use crate::role::{assign_roles, ExpectedRoles};

/// Device tree scanned when no root is supplied.
pub const DEFAULT_DEVICE_ROOT: &str = "/sys/devices";

const NO_CONTROLLERS_REASON: &str =
    "Failed to find any SAS controllers. This can be due to privileges or some other configuration issue.";

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub device_root: PathBuf,
    pub primary: Option<String>,
    pub secondary: Option<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            device_root: PathBuf::from(DEFAULT_DEVICE_ROOT),
            primary: None,
            secondary: None,
        }
    }
}

/// Runs the full discovery pipeline: controllers, then their ports, then
/// enclosures and roles, then member disks.
///
/// A host without visible SAS controllers produces a skipped report rather
/// than an error. An unpaired primary/secondary expectation fails here,
/// before any of the device tree is touched.
pub fn run_scan(options: &ScanOptions) -> Result<Report, ScanError> {
    let expected = ExpectedRoles::from_options(options.primary.clone(), options.secondary.clone())?;
    let started = Instant::now();
    info!("scanning device tree under {}", options.device_root.display());

    let mut controllers = scan_controllers(&options.device_root)?;
    if controllers.is_empty() {
        info!(
            "no SAS controllers under {}; reporting a skipped scan",
            options.device_root.display()
        );
        let mut report = new_report(options, BTreeMap::new(), BTreeMap::new());
        report.skipped = true;
        report.skip_reason = Some(NO_CONTROLLERS_REASON.to_string());
        report.scan_metrics.elapsed_ms = started.elapsed().as_millis() as u64;
        return Ok(report);
    }

    enumerate_ports(&mut controllers)?;
    let mut enclosures = discover_enclosures(&mut controllers)?;
    assign_roles(&mut enclosures, expected.as_ref());
    map_disks(&mut enclosures)?;

    let mut report = new_report(options, controllers, enclosures);
    report.scan_metrics.elapsed_ms = started.elapsed().as_millis() as u64;
    debug!(
        "scan complete: {} controller(s), {} port(s), {} enclosure(s), {} disk(s) in {} ms",
        report.scan_metrics.controllers,
        report.scan_metrics.ports,
        report.scan_metrics.enclosures,
        report.scan_metrics.disks,
        report.scan_metrics.elapsed_ms
    );
    Ok(report)
}

fn new_report(
    options: &ScanOptions,
    controllers: BTreeMap<String, Controller>,
    enclosures: BTreeMap<String, Enclosure>,
) -> Report {
    let scan_metrics = ScanMetrics {
        elapsed_ms: 0,
        controllers: controllers.len() as u64,
        ports: controllers
            .values()
            .map(|controller| controller.ports.len() as u64)
            .sum(),
        enclosures: enclosures.len() as u64,
        disks: enclosures
            .values()
            .map(|enclosure| enclosure.disks.len() as u64)
            .sum(),
    };

    Report {
        report_version: REPORT_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        scan_id: Uuid::new_v4().to_string(),
        scan: ScanMetadata {
            device_root: options.device_root.to_string_lossy().into_owned(),
            primary: options.primary.clone(),
            secondary: options.secondary.clone(),
        },
        scan_metrics,
        skipped: false,
        skip_reason: None,
        controllers,
        enclosures,
    }
}
