use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::error::ScanError;
use crate::identity::read_first_line;
use crate::model::{Controller, Port};
use crate::pattern::match_dirs;

/// PCI device class identifying a SAS host bus adapter.
pub const SAS_HBA_CLASS: &str = "0x010700";

/// Controllers sit exactly three levels below the device root
/// (`<root>/<bus>/<bridge>/<function>`).
const CONTROLLER_SEGMENTS: [&str; 3] = ["*", "*", "*"];

const PORT_SEGMENTS: [&str; 2] = ["host*", "port-*"];

const CLASS_FILE: &str = "class";

/// Finds every depth-three directory under `device_root` whose `class`
/// attribute names the SAS HBA device class. Candidates without a readable
/// class value are skipped; a present but unreadable one aborts.
pub fn scan_controllers(device_root: &Path) -> Result<BTreeMap<String, Controller>, ScanError> {
    let mut controllers = BTreeMap::new();
    for candidate in match_dirs(device_root, &CONTROLLER_SEGMENTS)? {
        let Some(class) = read_first_line(&candidate.join(CLASS_FILE))? else {
            continue;
        };
        if class == SAS_HBA_CLASS {
            controllers.insert(candidate.to_string_lossy().into_owned(), Controller::default());
        }
    }
    debug!(
        "controller scan found {} SAS adapter(s) under {}",
        controllers.len(),
        device_root.display()
    );
    Ok(controllers)
}

/// Attaches every `host*/port-*` directory beneath each controller as an
/// empty port. Enclosure identities are filled in by a later stage.
pub fn enumerate_ports(controllers: &mut BTreeMap<String, Controller>) -> Result<(), ScanError> {
    for (path, controller) in controllers.iter_mut() {
        for port in match_dirs(Path::new(path), &PORT_SEGMENTS)? {
            controller
                .ports
                .insert(port.to_string_lossy().into_owned(), Port::default());
        }
    }
    Ok(())
}
