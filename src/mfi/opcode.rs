//! DCMD operation codes understood by the adapter firmware.
//!
//! The high byte of an opcode names the category of the command (controller,
//! physical drive, logical drive), the lower bytes select the sub-command.
//! These values are fixed by the firmware and must never be renumbered.

use crate::bits::bit_field;

/// Channels of physical drives addressed by the driver.
pub const MAX_PD_CHANNELS: u16 = 2;
/// Device slots per channel. A target device id is
/// `channel * MAX_DEV_PER_CHANNEL + device`.
pub const MAX_DEV_PER_CHANNEL: u16 = 128;
/// Upper bound on physical drives behind one adapter.
pub const MAX_PD: usize = (MAX_PD_CHANNELS * MAX_DEV_PER_CHANNEL) as usize;
/// Upper bound on logical drives with extended LD support.
pub const MAX_LOGICAL_DRIVES_EXT: usize = 256;

#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Opcode {
    /// Controller details such as firmware images, limits and properties.
    CtrlGetInfo = 0x0101_0000,
    /// Devices exposed to the host, both system PDs and LDs.
    CtrlDeviceListGet = 0x0119_0600,
    PdListQuery = 0x0201_0100,
    PdGetInfo = 0x0202_0000,
    LdGetList = 0x0301_0000,
    LdListQuery = 0x0301_0100,
}

/// Category of a DCMD, taken from the top byte of the opcode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Category {
    Controller,
    PhysicalDrive,
    LogicalDrive,
    Other(u8),
}

impl Opcode {
    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn category(self) -> Category {
        match bit_field(self.code(), 24, 8) {
            0x01 => Category::Controller,
            0x02 => Category::PhysicalDrive,
            0x03 => Category::LogicalDrive,
            other => Category::Other(other as u8),
        }
    }

    /// The low 24 bits, selecting the command within its category.
    pub fn sub_command(self) -> u32 {
        bit_field(self.code(), 0, 24)
    }
}

/// `mbox.b[0]` selector for [`Opcode::PdListQuery`].
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PdQueryType {
    All = 0,
    State,
    PowerState,
    MediaType,
    Speed,
    ExposedToHost,
}

/// `mbox.b[0]` selector for [`Opcode::LdListQuery`].
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LdQueryType {
    All = 0,
    ExposedToHost,
    UsedTargetIds,
    ClusterAccess,
    ClusterLocale,
}

#[cfg(test)]
mod tests {
    use super::{Category, MAX_PD, Opcode};

    #[test]
    fn opcode_table_is_bit_exact() {
        assert_eq!(Opcode::CtrlGetInfo.code(), 0x0101_0000);
        assert_eq!(Opcode::PdListQuery.code(), 0x0201_0100);
        assert_eq!(Opcode::PdGetInfo.code(), 0x0202_0000);
        assert_eq!(Opcode::LdGetList.code(), 0x0301_0000);
        assert_eq!(Opcode::LdListQuery.code(), 0x0301_0100);
        assert_eq!(Opcode::CtrlDeviceListGet.code(), 0x0119_0600);
    }

    #[test]
    fn category_comes_from_high_byte() {
        assert_eq!(Opcode::CtrlGetInfo.category(), Category::Controller);
        assert_eq!(Opcode::CtrlDeviceListGet.category(), Category::Controller);
        assert_eq!(Opcode::PdGetInfo.category(), Category::PhysicalDrive);
        assert_eq!(Opcode::LdListQuery.category(), Category::LogicalDrive);
        assert_eq!(Opcode::LdListQuery.sub_command(), 0x01_0100);
    }

    #[test]
    fn driver_limits() {
        assert_eq!(MAX_PD, 256);
    }
}
