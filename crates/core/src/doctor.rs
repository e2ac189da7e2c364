use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::controller::scan_controllers;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorInfo {
    pub os: String,
    pub arch: String,
    pub device_root: String,
    pub device_root_present: bool,
    pub controllers_visible: u64,
    pub notes: Vec<String>,
}

pub fn collect_doctor_info(device_root: &Path) -> DoctorInfo {
    let device_root_present = device_root.is_dir();
    let mut notes = vec![
        "The scanner is read-only; no device or multipath state is modified.".to_string(),
    ];

    let controllers_visible = if device_root_present {
        match scan_controllers(device_root) {
            Ok(controllers) => controllers.len() as u64,
            Err(err) => {
                notes.push(format!("Controller probe failed: {err}."));
                0
            }
        }
    } else {
        notes.push(format!(
            "Device root {} does not exist; this host may lack sysfs or the root was overridden.",
            device_root.display()
        ));
        0
    };

    if device_root_present && controllers_visible == 0 {
        notes.push(
            "No SAS controllers visible. This can be due to privileges or some other configuration issue."
                .to_string(),
        );
    }

    DoctorInfo {
        os: env::consts::OS.to_string(),
        arch: env::consts::ARCH.to_string(),
        device_root: device_root.to_string_lossy().into_owned(),
        device_root_present,
        controllers_visible,
        notes,
    }
}
