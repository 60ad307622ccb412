use color_eyre::Result;
use color_eyre::eyre::{WrapErr, ensure};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use megaglass::Adapter;
use megaglass::ioctl::discovery::{DiscoveryConfig, scan_hosts};
use megaglass::ioctl::{Channel, IoctlChannel};
use megaglass::mfi::opcode::{LdQueryType, PdQueryType};
use megaglass::mfi::response::ctrl::DeviceInterfaceSpeed;

fn main() -> Result<()> {
    color_eyre::install()?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let config = DiscoveryConfig::from_env();
    let mut channel = IoctlChannel::open(&config)
        .wrap_err("failed to open the megaraid_sas management node")?;
    let hosts = scan_hosts(&config)?;
    ensure!(!hosts.is_empty(), "no megaraid_sas adapters found");

    for host in hosts {
        let mut adapter = Adapter::new(&mut channel, host);
        print_physical_drives(&mut adapter)?;
        print_logical_drives(&mut adapter)?;
        print_controller(&mut adapter)?;
    }
    Ok(())
}

fn rule(width: usize) {
    println!("{}", "-".repeat(width));
}

fn print_physical_drives<C: Channel>(adapter: &mut Adapter<C>) -> Result<()> {
    let list = adapter
        .pd_list(PdQueryType::All)
        .wrap_err_with(|| format!("failed to list drives on host {}", adapter.host_no()))?;

    rule(150);
    println!(
        "{:<10}{:<8}{:<8}{:<12}{:<22}{:<20}{:<10}{:<10}{:<24}",
        "Eid:Slt", "DID", "Media", "Size", "Serial", "Product", "Vendor", "State", "WWN"
    );
    rule(150);
    for address in list.addresses.iter().filter(|a| a.is_scsi_dev()) {
        let info = match adapter.pd_info(0, address.device_id) {
            Ok(info) => info,
            Err(e) => {
                warn!(device_id = address.device_id, "skipping drive: {e}");
                continue;
            }
        };
        let inquiry = match info.inquiry() {
            Ok(inquiry) => inquiry,
            Err(e) => {
                warn!(device_id = address.device_id, "skipping drive: {e}");
                continue;
            }
        };
        let wwn = info.wwn().map(|w| w.to_string()).unwrap_or_else(|| "-".into());
        println!(
            "{:<10}{:<8}{:<8}{:<12}{:<22}{:<20}{:<10}{:<10}{:<24}",
            format!("{}:{}", info.encl_device_id, info.slot_number),
            info.device_id,
            info.media().to_string(),
            info.size_string(),
            inquiry.serial_number,
            inquiry.product_identification,
            inquiry.vendor_identification,
            info.state().to_string(),
            wwn,
        );
    }
    rule(150);
    println!();
    Ok(())
}

fn print_logical_drives<C: Channel>(adapter: &mut Adapter<C>) -> Result<()> {
    let drives = adapter.ld_list()?.drives;
    if drives.is_empty() {
        return Ok(());
    }

    rule(40);
    println!("{:<10}{:<20}{:<10}", "TargetId", "State", "Size");
    rule(40);
    for drive in &drives {
        println!(
            "{:<10}{:<20}{:<10}",
            drive.target_id,
            drive.state().to_string(),
            drive.size_string()
        );
    }
    rule(40);

    let exposed = adapter.ld_targets(LdQueryType::ExposedToHost)?;
    let ids: Vec<String> = exposed.target_ids.iter().map(u8::to_string).collect();
    println!("exported target ids: {}", ids.join(","));
    println!();
    Ok(())
}

fn print_controller<C: Channel>(adapter: &mut Adapter<C>) -> Result<()> {
    let info = adapter.ctrl_info()?;
    let interface = match info.device_interface_speed() {
        DeviceInterfaceSpeed::Sas12G => "SAS-12G",
        DeviceInterfaceSpeed::Unknown(_) => "Unknown",
    };
    println!("ProductName: {}", info.product_name);
    println!("VendorId: {:#x}", info.pci.vendor_id);
    println!("Serial: {}", info.serial_number);
    println!("DeviceInterface: {interface}");
    println!("JbodEnabled: {}", info.jbod_enabled());
    println!();
    Ok(())
}
