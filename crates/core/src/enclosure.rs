use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::ScanError;
use crate::identity::{normalize_wwid, read_first_line};
use crate::model::{Controller, Disk, Enclosure};
use crate::pattern::match_dirs;

/// Chain matched beneath a controller port to reach the SCSI device of an
/// enclosure services node: expander hop, expander port zero, end device,
/// target, bus-id leaf. The segments mirror the kernel's sysfs naming and
/// must stay verbatim.
pub const ENCLOSURE_SEGMENTS: [&str; 5] =
    ["expander-*", "port-*0", "end_device*", "target*", "*:*"];

/// Chain matched beneath an enclosure's expander to reach member disks:
/// a downstream expander behind another port, then the disk end devices.
pub const DISK_SEGMENTS: [&str; 6] =
    ["port-*", "expander*", "port-*", "end_device-*", "target*", "*:*"];

/// Identity attribute carried by enclosure and disk SCSI devices.
const WWID_FILE: &str = "wwid";

/// Directory levels stepped back from an enclosure chain leaf to reach the
/// expander shared with that enclosure's disks. Tied to the chain length so
/// a change in one keeps the other honest.
const DISK_BASE_ASCENT: usize = ENCLOSURE_SEGMENTS.len() - 1;

/// Walks the enclosure chain beneath every known port, normalizes each WWID
/// found and merges ports that reach the same identity into one enclosure
/// entry. Ports whose chain carries no `wwid` file stay unresolved.
pub fn discover_enclosures(
    controllers: &mut BTreeMap<String, Controller>,
) -> Result<BTreeMap<String, Enclosure>, ScanError> {
    let mut enclosures: BTreeMap<String, Enclosure> = BTreeMap::new();
    for controller in controllers.values_mut() {
        for (port_path, port) in controller.ports.iter_mut() {
            for chain in match_dirs(Path::new(port_path), &ENCLOSURE_SEGMENTS)? {
                let Some(raw) = read_first_line(&chain.join(WWID_FILE))? else {
                    trace!("no wwid beneath chain {}", chain.display());
                    continue;
                };
                let wwid = normalize_wwid(&raw);
                port.enclosure = Some(wwid.clone());
                enclosures
                    .entry(wwid)
                    .or_default()
                    .ports
                    .push(chain.to_string_lossy().into_owned());
            }
        }
    }
    debug!("enclosure discovery resolved {} identity(ies)", enclosures.len());
    Ok(enclosures)
}

/// Collects the disks behind each enclosure. The first recorded chain path
/// is walked back to the expander and every disk chain beneath it is
/// attributed to the enclosure; path proximity alone decides membership.
/// Disk directories without a `wwid` file are skipped.
pub fn map_disks(enclosures: &mut BTreeMap<String, Enclosure>) -> Result<(), ScanError> {
    for (wwid, enclosure) in enclosures.iter_mut() {
        let Some(first_chain) = enclosure.ports.first() else {
            continue;
        };
        let Some(basepath) = disk_basepath(Path::new(first_chain)) else {
            trace!("chain {} too shallow for a disk basepath", first_chain);
            continue;
        };
        for disk_path in match_dirs(&basepath, &DISK_SEGMENTS)? {
            let Some(raw) = read_first_line(&disk_path.join(WWID_FILE))? else {
                trace!("no wwid for disk at {}", disk_path.display());
                continue;
            };
            enclosure.disks.push(Disk {
                wwid: normalize_wwid(&raw),
                path: disk_path.to_string_lossy().into_owned(),
            });
        }
        debug!("mapped {} disk(s) behind enclosure {}", enclosure.disks.len(), wwid);
    }
    Ok(())
}

/// Steps `DISK_BASE_ASCENT` directory levels up from an enclosure chain
/// leaf, landing on `<port>/<expander>`.
fn disk_basepath(chain: &Path) -> Option<PathBuf> {
    let mut base = chain;
    for _ in 0..DISK_BASE_ASCENT {
        base = base.parent()?;
    }
    Some(base.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::TempDir;

    use crate::model::Port;

    fn port_with_enclosure(root: &Path, port: &str, expander: &str, wwid: &str) -> PathBuf {
        let port_path = root.join(port);
        let leaf = port_path
            .join(expander)
            .join("port-2:0:0/end_device-2:0:0/target2:0:0/2:0:0:0");
        fs::create_dir_all(&leaf).expect("fixture");
        fs::write(leaf.join("wwid"), format!("{wwid}\n")).expect("fixture");
        port_path
    }

    fn controllers_with_ports(ports: &[&Path]) -> BTreeMap<String, Controller> {
        let mut controller = Controller::default();
        for port in ports {
            controller
                .ports
                .insert(port.to_string_lossy().into_owned(), Port::default());
        }
        let mut controllers = BTreeMap::new();
        controllers.insert("controller".to_string(), controller);
        controllers
    }

    #[test]
    fn ports_reaching_the_same_identity_merge() {
        let dir = TempDir::new().expect("tempdir");
        let port_a = port_with_enclosure(dir.path(), "port-2:0", "expander-2:0", "naa.600508b1001c7d8e");
        let port_b = port_with_enclosure(dir.path(), "port-2:1", "expander-2:1", "naa.600508b1001c7d8e");

        let mut controllers = controllers_with_ports(&[&port_a, &port_b]);
        let enclosures = discover_enclosures(&mut controllers).expect("discover");

        assert_eq!(enclosures.len(), 1);
        let enclosure = &enclosures["3600508b1001c7d8e"];
        assert_eq!(enclosure.ports.len(), 2);
        assert!(enclosure.ports[0].contains("port-2:0"));
        assert!(enclosure.ports[1].contains("port-2:1"));

        let controller = controllers.values().next().expect("controller");
        for port in controller.ports.values() {
            assert_eq!(port.enclosure.as_deref(), Some("3600508b1001c7d8e"));
        }
    }

    #[test]
    fn chain_without_wwid_leaves_port_unresolved() {
        let dir = TempDir::new().expect("tempdir");
        let port_path = dir.path().join("port-2:0");
        let leaf = port_path.join("expander-2:0/port-2:0:0/end_device-2:0:0/target2:0:0/2:0:0:0");
        fs::create_dir_all(&leaf).expect("fixture");

        let mut controllers = controllers_with_ports(&[&port_path]);
        let enclosures = discover_enclosures(&mut controllers).expect("discover");

        assert!(enclosures.is_empty());
        let controller = controllers.values().next().expect("controller");
        assert!(controller.ports.values().all(|port| port.enclosure.is_none()));
    }

    #[test]
    fn disks_attach_beneath_the_shared_expander() {
        let dir = TempDir::new().expect("tempdir");
        let port_path = port_with_enclosure(dir.path(), "port-2:0", "expander-2:0", "naa.600508b1001c7d8e");
        let expander = port_path.join("expander-2:0");

        let disk = expander.join("port-2:0:1/expander-2:1/port-2:1:4/end_device-2:1:4/target2:0:4/2:0:4:0");
        fs::create_dir_all(&disk).expect("fixture");
        fs::write(disk.join("wwid"), "naa.5000c500a1b2c3d4\n").expect("fixture");

        // A second bay whose device exposes no identity.
        let bare = expander.join("port-2:0:2/expander-2:2/port-2:2:4/end_device-2:2:4/target2:0:5/2:0:5:0");
        fs::create_dir_all(&bare).expect("fixture");

        let mut controllers = controllers_with_ports(&[&port_path]);
        let mut enclosures = discover_enclosures(&mut controllers).expect("discover");
        map_disks(&mut enclosures).expect("map disks");

        let enclosure = &enclosures["3600508b1001c7d8e"];
        assert_eq!(enclosure.disks.len(), 1);
        assert_eq!(enclosure.disks[0].wwid, "35000c500a1b2c3d4");
        assert_eq!(enclosure.disks[0].path, disk.to_string_lossy());
    }

    #[test]
    fn basepath_steps_back_to_the_expander() {
        let chain = Path::new(
            "/sys/devices/pci0000:00/0000:00:03.0/0000:05:00.0/host2/port-2:0/expander-2:0/port-2:0:0/end_device-2:0:0/target2:0:0/2:0:0:0",
        );
        let base = disk_basepath(chain).expect("basepath");
        assert_eq!(
            base,
            Path::new("/sys/devices/pci0000:00/0000:00:03.0/0000:05:00.0/host2/port-2:0/expander-2:0"),
        );
    }

    #[test]
    fn shallow_chain_yields_no_basepath() {
        assert_eq!(disk_basepath(Path::new("expander/port/end_device")), None);
    }
}
