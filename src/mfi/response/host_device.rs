//! `MR_DCMD_CTRL_DEVICE_LIST_GET`: every device the adapter exposes to the
//! host, system PDs and LDs alike.

use crate::bits::bit;
use crate::error::Result;
use crate::mfi::opcode::{MAX_LOGICAL_DRIVES_EXT, MAX_PD};
use crate::mfi::response::pd::{read_entries, sas_half};
use crate::wire::{Decode, LeReader};

/// Entries the firmware may return: one per PD plus one per LD.
pub const MAX_HOST_DEVICES: usize = MAX_PD + MAX_LOGICAL_DRIVES_EXT;

/// `struct MR_HOST_DEVICE_LIST_ENTRY`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostDevice {
    /// is_sys_pd:1
    pub flags: u8,
    pub scsi_type: u8,
    pub target_id: u16,
    pub sas_addr: [u32; 4],
}

impl HostDevice {
    /// Whether the device is a physical drive passed through to the host.
    pub fn is_sys_pd(&self) -> bool {
        bit(self.flags, 0)
    }

    pub fn sas_address(&self, port: usize) -> u64 {
        sas_half(&self.sas_addr, port)
    }
}

impl Decode for HostDevice {
    const NAME: &'static str = "MR_HOST_DEVICE_LIST_ENTRY";
    const SIZE: usize = 24;

    fn read(r: LeReader<'_>) -> Result<Self> {
        Ok(Self {
            flags: r.u8(0),
            scsi_type: r.u8(1),
            target_id: r.u16(2),
            sas_addr: r.u32s::<4>(8),
        })
    }
}

/// `struct MR_HOST_DEVICE_LIST`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostDeviceList {
    pub size: u32,
    pub devices: Vec<HostDevice>,
}

const HOST_DEVICE_LIST_HEADER: usize = 16;

impl Decode for HostDeviceList {
    const NAME: &'static str = "MR_HOST_DEVICE_LIST";
    const SIZE: usize = HOST_DEVICE_LIST_HEADER + MAX_HOST_DEVICES * HostDevice::SIZE;

    fn read(r: LeReader<'_>) -> Result<Self> {
        let count = r.u32(4);
        Ok(Self {
            size: r.u32(0),
            devices: read_entries(
                Self::NAME,
                r,
                HOST_DEVICE_LIST_HEADER,
                count,
                MAX_HOST_DEVICES,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::LeWriter;

    #[test]
    fn decodes_host_devices() {
        let mut buf = vec![0_u8; HostDeviceList::SIZE];
        let mut w = LeWriter::new(&mut buf);
        w.u32(0, 16 + 2 * 24);
        w.u32(4, 2);
        // a JBOD disk at target 8
        w.u8(16, 0x01);
        w.u8(17, 0x00);
        w.u16(18, 8);
        w.u32(24, 0x1234_5678);
        w.u32(28, 0x5000_c500);
        // an LD at target 0
        w.u8(40, 0x00);
        w.u16(42, 0);

        let list = HostDeviceList::decode(&buf).unwrap();
        assert_eq!(list.devices.len(), 2);
        assert!(list.devices[0].is_sys_pd());
        assert_eq!(list.devices[0].target_id, 8);
        assert_eq!(list.devices[0].sas_address(0), 0x5000_c500_1234_5678);
        assert!(!list.devices[1].is_sys_pd());
    }

    #[test]
    fn zero_count_is_empty() {
        let list = HostDeviceList::decode(&vec![0_u8; HostDeviceList::SIZE]).unwrap();
        assert!(list.devices.is_empty());
        assert_eq!(HostDeviceList::SIZE, 12_304);
    }
}
