pub mod controller;
pub mod doctor;
pub mod enclosure;
pub mod error;
pub mod identity;
pub mod model;
pub mod pattern;
pub mod role;
pub mod scan;

pub use controller::{enumerate_ports, scan_controllers, SAS_HBA_CLASS};
pub use doctor::{collect_doctor_info, DoctorInfo};
pub use enclosure::{discover_enclosures, map_disks, DISK_SEGMENTS, ENCLOSURE_SEGMENTS};
pub use error::ScanError;
pub use identity::{normalize_wwid, read_first_line};
pub use model::{
    Controller, Disk, Enclosure, Port, Report, Role, ScanMetadata, ScanMetrics, REPORT_VERSION,
};
pub use pattern::match_dirs;
pub use role::{assign_roles, role_for, ExpectedRoles};
pub use scan::{run_scan, ScanOptions, DEFAULT_DEVICE_ROOT};
