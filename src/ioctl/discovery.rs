//! Finding megaraid_sas adapters and the driver's management device.

use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::{MfiError, Result};

/// Where discovery looks. Every path can be redirected, which is how the
/// tests run against a fake sysfs tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Registered character and block device majors.
    pub proc_devices: PathBuf,
    /// One symlink per SCSI host, each holding a `proc_name` file.
    pub sysfs_host_dir: PathBuf,
    /// The management node to open, created if missing.
    pub node_path: PathBuf,
    /// `proc_name` of hosts driven by megaraid_sas.
    pub driver_name: String,
    /// Name the driver registers its management major under.
    pub node_name: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            proc_devices: PathBuf::from("/proc/devices"),
            sysfs_host_dir: PathBuf::from("/sys/class/scsi_host"),
            node_path: PathBuf::from("/dev/megaraid_sas_ioctl_node"),
            driver_name: String::from("megaraid_sas"),
            node_name: String::from("megaraid_sas_ioctl"),
        }
    }
}

impl DiscoveryConfig {
    /// The default locations, overridden by `MEGAGLASS_PROC_DEVICES`,
    /// `MEGAGLASS_SYSFS_HOST_DIR` and `MEGAGLASS_NODE` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(path) = std::env::var_os("MEGAGLASS_PROC_DEVICES") {
            config.proc_devices = path.into();
        }
        if let Some(path) = std::env::var_os("MEGAGLASS_SYSFS_HOST_DIR") {
            config.sysfs_host_dir = path.into();
        }
        if let Some(path) = std::env::var_os("MEGAGLASS_NODE") {
            config.node_path = path.into();
        }
        config
    }
}

/// Returns the host numbers of every SCSI host driven by megaraid_sas,
/// ascending.
#[tracing::instrument(skip_all, fields(dir = %config.sysfs_host_dir.display()))]
pub fn scan_hosts(config: &DiscoveryConfig) -> Result<Vec<u16>> {
    let mut hosts = Vec::new();
    for entry in fs::read_dir(&config.sysfs_host_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_symlink() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        // Hosts whose proc_name cannot be read belong to some other driver
        // or are going away.
        let Ok(proc_name) = fs::read_to_string(entry.path().join("proc_name")) else {
            debug!(host = name, "no proc_name, skipping");
            continue;
        };
        if proc_name.trim() != config.driver_name {
            continue;
        }
        match parse_host_number(name) {
            Some(host) => hosts.push(host),
            None => warn!(host = name, "unrecognized host entry"),
        }
    }
    hosts.sort_unstable();
    debug!(?hosts, "found adapters");
    Ok(hosts)
}

fn parse_host_number(name: &str) -> Option<u16> {
    name.strip_prefix("host")?.parse().ok()
}

/// Reads the character major the driver registered its management node
/// under.
pub fn find_major(config: &DiscoveryConfig) -> Result<u64> {
    let devices = fs::read_to_string(&config.proc_devices)?;
    parse_major(&devices, &config.node_name).ok_or_else(|| {
        MfiError::Discovery(format!(
            "could not determine {} major number from {}",
            config.node_name,
            config.proc_devices.display()
        ))
    })
}

fn parse_major(devices: &str, node_name: &str) -> Option<u64> {
    devices
        .lines()
        .map(str::trim)
        .filter(|line| line.ends_with(node_name))
        .find_map(|line| line.split_whitespace().next()?.parse().ok())
        .filter(|&major| major != 0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::Path;

    /// A fresh scratch directory under the system temp dir.
    pub(crate) fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("megaglass-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn fake_host(sysfs: &Path, devices: &Path, name: &str, proc_name: Option<&str>) {
        let target = devices.join(name);
        fs::create_dir_all(&target).unwrap();
        if let Some(proc_name) = proc_name {
            fs::write(target.join("proc_name"), format!("{proc_name}\n")).unwrap();
        }
        std::os::unix::fs::symlink(&target, sysfs.join(name)).unwrap();
    }

    const PROC_DEVICES: &str = "\
Character devices:
  1 mem
  4 /dev/vc/0
 10 misc
239 megaraid_sas_ioctl
254 gpiochip

Block devices:
  8 sd
";

    #[test]
    fn scans_only_megaraid_hosts() {
        let root = scratch_dir("scan");
        let sysfs = root.join("scsi_host");
        let devices = root.join("devices");
        fs::create_dir_all(&sysfs).unwrap();

        fake_host(&sysfs, &devices, "host10", Some("megaraid_sas"));
        fake_host(&sysfs, &devices, "host2", Some("megaraid_sas"));
        fake_host(&sysfs, &devices, "host0", Some("ahci"));
        fake_host(&sysfs, &devices, "host5", None);
        fake_host(&sysfs, &devices, "bogus", Some("megaraid_sas"));
        // Plain directories are not host entries.
        fs::create_dir_all(sysfs.join("host7")).unwrap();
        fs::write(sysfs.join("host7").join("proc_name"), "megaraid_sas").unwrap();

        let config = DiscoveryConfig {
            sysfs_host_dir: sysfs,
            ..DiscoveryConfig::default()
        };
        assert_eq!(scan_hosts(&config).unwrap(), vec![2, 10]);
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn missing_sysfs_dir_is_io_error() {
        let config = DiscoveryConfig {
            sysfs_host_dir: PathBuf::from("/nonexistent/scsi_host"),
            ..DiscoveryConfig::default()
        };
        let e = scan_hosts(&config).expect_err("directory does not exist");
        assert!(matches!(e, MfiError::Io(_)));
    }

    #[test]
    fn reads_major_from_proc_devices() {
        assert_eq!(parse_major(PROC_DEVICES, "megaraid_sas_ioctl"), Some(239));
        assert_eq!(parse_major(PROC_DEVICES, "mpt3ctl"), None);
        assert_eq!(parse_major("  0 megaraid_sas_ioctl\n", "megaraid_sas_ioctl"), None);

        let root = scratch_dir("major");
        let config = DiscoveryConfig {
            proc_devices: root.join("devices"),
            ..DiscoveryConfig::default()
        };
        fs::write(&config.proc_devices, PROC_DEVICES).unwrap();
        assert_eq!(find_major(&config).unwrap(), 239);

        fs::write(&config.proc_devices, "Character devices:\n  1 mem\n").unwrap();
        let e = find_major(&config).expect_err("driver not loaded");
        assert!(e.to_string().contains("could not determine megaraid_sas_ioctl major"));
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn host_numbers() {
        assert_eq!(parse_host_number("host0"), Some(0));
        assert_eq!(parse_host_number("host65535"), Some(65535));
        assert_eq!(parse_host_number("host65536"), None);
        assert_eq!(parse_host_number("target0"), None);
    }
}
