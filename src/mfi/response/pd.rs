//! Physical drive responses: `MR_DCMD_PD_LIST_QUERY` and `MR_DCMD_PD_GET_INFO`.

use std::fmt;

use crate::bits::{assemble, bit, bit_field};
use crate::error::{MfiError, Result};
use crate::mfi::opcode::MAX_PD;
use crate::scsi::inquiry::{INQUIRY_SIZE, Inquiry};
use crate::scsi::vpd::{Wwn, parse_page_83};
use crate::size::size_string;
use crate::wire::{Decode, LeReader};

/// Formats a SAS address the way the firmware tools print it.
pub fn format_sas_address(address: u64) -> String {
    format!("{address:#x}")
}

/// `struct MR_PD_ADDRESS`, one entry of the physical drive list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PdAddress {
    pub device_id: u16,
    pub enclosure_id: u16,
    pub enclosure_index: u8,
    pub slot_number: u8,
    /// SCSI peripheral device type; 0 for disks.
    pub scsi_dev_type: u8,
    pub connect_port_bitmap: u8,
    /// Two 64-bit SAS addresses, each stored as two little-endian halves.
    pub sas_addr: [u32; 4],
}

impl PdAddress {
    pub fn is_scsi_dev(&self) -> bool {
        self.scsi_dev_type == 0
    }

    /// SAS address of path `port` (0 or 1).
    pub fn sas_address(&self, port: usize) -> u64 {
        sas_half(&self.sas_addr, port)
    }
}

/// SAS address of path `port` from two addresses stored as little-endian
/// `u32` halves.
pub(crate) fn sas_half(words: &[u32; 4], port: usize) -> u64 {
    match port {
        0 => assemble(&words[0..2], 32),
        1 => assemble(&words[2..4], 32),
        _ => 0,
    }
}

impl Decode for PdAddress {
    const NAME: &'static str = "MR_PD_ADDRESS";
    const SIZE: usize = 24;

    fn read(r: LeReader<'_>) -> Result<Self> {
        Ok(Self {
            device_id: r.u16(0),
            enclosure_id: r.u16(2),
            enclosure_index: r.u8(4),
            slot_number: r.u8(5),
            scsi_dev_type: r.u8(6),
            connect_port_bitmap: r.u8(7),
            sas_addr: r.u32s::<4>(8),
        })
    }
}

/// `struct MR_PD_LIST`: a size and count header followed by addresses.
///
/// [`Decode::SIZE`] is the header plus room for [`MAX_PD`] entries, which is
/// the buffer a query must supply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PdList {
    pub size: u32,
    pub addresses: Vec<PdAddress>,
}

const PD_LIST_HEADER: usize = 8;

impl Decode for PdList {
    const NAME: &'static str = "MR_PD_LIST";
    const SIZE: usize = PD_LIST_HEADER + MAX_PD * PdAddress::SIZE;

    fn read(r: LeReader<'_>) -> Result<Self> {
        let count = r.u32(4);
        let addresses = read_entries(Self::NAME, r, PD_LIST_HEADER, count, MAX_PD)?;
        Ok(Self {
            size: r.u32(0),
            addresses,
        })
    }
}

/// Reads `count` consecutive `T`s starting at `offset`, rejecting counts
/// larger than `capacity`.
pub(crate) fn read_entries<T: Decode>(
    structure: &'static str,
    r: LeReader<'_>,
    offset: usize,
    count: u32,
    capacity: usize,
) -> Result<Vec<T>> {
    if count as usize > capacity {
        return Err(MfiError::InvalidCount {
            structure,
            count,
            capacity,
        });
    }
    (0..count as usize)
        .map(|i| T::read(r.sub(offset + i * T::SIZE, T::SIZE)))
        .collect()
}

/// Firmware state of a physical drive, `MR_PD_STATE`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PdState {
    UnconfiguredGood,
    UnconfiguredBad,
    HotSpare,
    Offline,
    Failed,
    Rebuild,
    Online,
    Copyback,
    /// Exposed to the host as a JBOD system drive.
    System,
    Unknown(u16),
}

impl From<u16> for PdState {
    fn from(value: u16) -> Self {
        match value {
            0x00 => PdState::UnconfiguredGood,
            0x01 => PdState::UnconfiguredBad,
            0x02 => PdState::HotSpare,
            0x10 => PdState::Offline,
            0x11 => PdState::Failed,
            0x14 => PdState::Rebuild,
            0x18 => PdState::Online,
            0x20 => PdState::Copyback,
            0x40 => PdState::System,
            other => PdState::Unknown(other),
        }
    }
}

impl fmt::Display for PdState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PdState::UnconfiguredGood => "UGood",
            PdState::UnconfiguredBad => "UBad",
            PdState::HotSpare => "HotSpare",
            PdState::Offline => "Offline",
            PdState::Failed => "Failed",
            PdState::Rebuild => "Rebuild",
            PdState::Online => "Online",
            PdState::Copyback => "Copyback",
            PdState::System => "Jbod",
            PdState::Unknown(_) => "Unknown",
        };
        f.write_str(s)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MediaType {
    Hdd,
    Ssd,
    Unknown(u8),
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Hdd => f.write_str("HDD"),
            MediaType::Ssd => f.write_str("SSD"),
            MediaType::Unknown(_) => f.write_str("Unknown"),
        }
    }
}

/// Progress of one background operation, `union MR_PROGRESS`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    /// Fraction done, out of 0xffff.
    pub progress: u16,
    pub elapsed_secs: u16,
}

impl Progress {
    fn read(r: &LeReader<'_>, offset: usize) -> Self {
        Self {
            progress: r.u16(offset),
            elapsed_secs: r.u16(offset + 2),
        }
    }
}

/// `struct MR_PD_PROGRESS`
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PdProgress {
    /// rbld:1 patrol:1 clear:1 copyBack:1 erase:1 locate:1
    pub active: u32,
    pub rebuild: Progress,
    pub patrol: Progress,
    pub clear: Progress,
    pub pause: u32,
}

impl PdProgress {
    pub fn rebuild_active(&self) -> bool {
        bit(self.active, 0)
    }

    pub fn patrol_active(&self) -> bool {
        bit(self.active, 1)
    }

    pub fn clear_active(&self) -> bool {
        bit(self.active, 2)
    }

    pub fn copyback_active(&self) -> bool {
        bit(self.active, 3)
    }
}

/// Field offsets of `struct MR_PD_INFO`.
mod off {
    pub const DEVICE_ID: usize = 0;
    pub const SEQ_NUM: usize = 2;
    pub const INQUIRY_DATA: usize = 4;
    pub const VPD_PAGE_83: usize = 100;
    pub const NOT_SUPPORTED: usize = 164;
    pub const SCSI_DEV_TYPE: usize = 165;
    pub const CONNECTED_PORT_BITMAP: usize = 166;
    pub const DEVICE_SPEED: usize = 167;
    pub const MEDIA_ERR_COUNT: usize = 168;
    pub const OTHER_ERR_COUNT: usize = 172;
    pub const PRED_FAIL_COUNT: usize = 176;
    pub const LAST_PRED_FAIL_EVENT_SEQ_NUM: usize = 180;
    pub const FW_STATE: usize = 184;
    pub const DISABLED_FOR_REMOVAL: usize = 186;
    pub const LINK_SPEED: usize = 187;
    pub const DDF_TYPE: usize = 188;
    pub const PATH_COUNT: usize = 192;
    pub const PATH_BITS: usize = 193;
    pub const CONNECTOR_INDEX: usize = 194;
    pub const PATH_SAS_ADDR: usize = 200;
    pub const RAW_SIZE: usize = 232;
    pub const NON_COERCED_SIZE: usize = 240;
    pub const COERCED_SIZE: usize = 248;
    pub const ENCL_DEVICE_ID: usize = 256;
    pub const ENCL_INDEX: usize = 258;
    pub const SLOT_NUMBER: usize = 259;
    pub const PROG_INFO: usize = 260;
    pub const BAD_BLOCK_TABLE_FULL: usize = 292;
    pub const UNUSABLE_IN_CURRENT_CONFIG: usize = 293;
    pub const VPD_PAGE_83_EXT: usize = 294;
    pub const POWER_STATE: usize = 358;
    pub const ENCL_POSITION: usize = 359;
    pub const ALLOWED_OPS: usize = 360;
    pub const COPYBACK_PARTNER_ID: usize = 364;
    pub const ENCL_PARTNER_DEVICE_ID: usize = 366;
    pub const SECURITY: usize = 368;
    pub const MEDIA_TYPE: usize = 370;
    pub const NOT_CERTIFIED: usize = 371;
    pub const BRIDGE_VENDOR: usize = 372;
    pub const BRIDGE_PRODUCT_IDENTIFICATION: usize = 380;
    pub const BRIDGE_PRODUCT_REVISION_LEVEL: usize = 396;
    pub const SAT_BRIDGE_EXISTS: usize = 400;
    pub const INTERFACE_TYPE: usize = 401;
    pub const TEMPERATURE: usize = 402;
    pub const EMULATED_BLOCK_SIZE: usize = 403;
    pub const USER_DATA_BLOCK_SIZE: usize = 404;
    pub const PROPERTIES: usize = 408;
    pub const SHIELD_DIAG_COMPLETION_TIME: usize = 412;
    pub const SHIELD_COUNTER: usize = 420;
    pub const LINK_SPEED_OTHER: usize = 421;
    pub const BBM_ERR: usize = 424;
    pub const SIZE: usize = 512;
}

pub const VPD_PAGE_83_SIZE: usize = 64;

/// `struct MR_PD_INFO`, everything the firmware knows about one drive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PdInfo {
    pub device_id: u16,
    pub seq_num: u16,
    pub inquiry_data: [u8; INQUIRY_SIZE],
    pub vpd_page_83: [u8; VPD_PAGE_83_SIZE],
    pub not_supported: u8,
    pub scsi_dev_type: u8,
    pub connected_port_bitmap: u8,
    pub device_speed: u8,
    pub media_err_count: u32,
    pub other_err_count: u32,
    pub pred_fail_count: u32,
    pub last_pred_fail_event_seq_num: u32,
    pub fw_state: u16,
    pub disabled_for_removal: u8,
    pub link_speed: u8,
    /// `MR_PD_DDF_TYPE.ddf.pdType` bit-field word.
    pub ddf_type: u16,
    pub path_count: u8,
    /// isPathBroken:4 reserved:3 widePortCapable:1
    pub path_bits: u8,
    pub connector_index: [u8; 2],
    pub path_sas_addr: [u32; 4],
    pub raw_size: [u32; 2],
    pub non_coerced_size: [u32; 2],
    pub coerced_size: [u32; 2],
    pub encl_device_id: u16,
    pub encl_index: u8,
    pub slot_number: u8,
    pub progress: PdProgress,
    pub bad_block_table_full: u8,
    pub unusable_in_current_config: u8,
    pub vpd_page_83_ext: [u8; VPD_PAGE_83_SIZE],
    pub power_state: u8,
    pub encl_position: u8,
    pub allowed_ops: u32,
    pub copyback_partner_id: u16,
    pub encl_partner_device_id: u16,
    pub security: u16,
    pub media_type: u8,
    pub not_certified: u8,
    pub bridge_vendor: [u8; 8],
    pub bridge_product_identification: [u8; 16],
    pub bridge_product_revision_level: [u8; 4],
    pub sat_bridge_exists: u8,
    pub interface_type: u8,
    pub temperature: u8,
    pub emulated_block_size: u8,
    pub user_data_block_size: u16,
    pub properties: u32,
    pub shield_diag_completion_time: [u32; 2],
    pub shield_counter: u8,
    pub link_speed_other: u8,
    pub bbm_err: u32,
}

impl Decode for PdInfo {
    const NAME: &'static str = "MR_PD_INFO";
    const SIZE: usize = off::SIZE;

    fn read(r: LeReader<'_>) -> Result<Self> {
        let p = off::PROG_INFO;
        Ok(Self {
            device_id: r.u16(off::DEVICE_ID),
            seq_num: r.u16(off::SEQ_NUM),
            inquiry_data: r.array(off::INQUIRY_DATA),
            vpd_page_83: r.array(off::VPD_PAGE_83),
            not_supported: r.u8(off::NOT_SUPPORTED),
            scsi_dev_type: r.u8(off::SCSI_DEV_TYPE),
            connected_port_bitmap: r.u8(off::CONNECTED_PORT_BITMAP),
            device_speed: r.u8(off::DEVICE_SPEED),
            media_err_count: r.u32(off::MEDIA_ERR_COUNT),
            other_err_count: r.u32(off::OTHER_ERR_COUNT),
            pred_fail_count: r.u32(off::PRED_FAIL_COUNT),
            last_pred_fail_event_seq_num: r.u32(off::LAST_PRED_FAIL_EVENT_SEQ_NUM),
            fw_state: r.u16(off::FW_STATE),
            disabled_for_removal: r.u8(off::DISABLED_FOR_REMOVAL),
            link_speed: r.u8(off::LINK_SPEED),
            ddf_type: r.u16(off::DDF_TYPE),
            path_count: r.u8(off::PATH_COUNT),
            path_bits: r.u8(off::PATH_BITS),
            connector_index: r.array(off::CONNECTOR_INDEX),
            path_sas_addr: r.u32s::<4>(off::PATH_SAS_ADDR),
            raw_size: r.u32s::<2>(off::RAW_SIZE),
            non_coerced_size: r.u32s::<2>(off::NON_COERCED_SIZE),
            coerced_size: r.u32s::<2>(off::COERCED_SIZE),
            encl_device_id: r.u16(off::ENCL_DEVICE_ID),
            encl_index: r.u8(off::ENCL_INDEX),
            slot_number: r.u8(off::SLOT_NUMBER),
            progress: PdProgress {
                active: r.u32(p),
                rebuild: Progress::read(&r, p + 4),
                patrol: Progress::read(&r, p + 8),
                clear: Progress::read(&r, p + 12),
                pause: r.u32(p + 16),
            },
            bad_block_table_full: r.u8(off::BAD_BLOCK_TABLE_FULL),
            unusable_in_current_config: r.u8(off::UNUSABLE_IN_CURRENT_CONFIG),
            vpd_page_83_ext: r.array(off::VPD_PAGE_83_EXT),
            power_state: r.u8(off::POWER_STATE),
            encl_position: r.u8(off::ENCL_POSITION),
            allowed_ops: r.u32(off::ALLOWED_OPS),
            copyback_partner_id: r.u16(off::COPYBACK_PARTNER_ID),
            encl_partner_device_id: r.u16(off::ENCL_PARTNER_DEVICE_ID),
            security: r.u16(off::SECURITY),
            media_type: r.u8(off::MEDIA_TYPE),
            not_certified: r.u8(off::NOT_CERTIFIED),
            bridge_vendor: r.array(off::BRIDGE_VENDOR),
            bridge_product_identification: r.array(off::BRIDGE_PRODUCT_IDENTIFICATION),
            bridge_product_revision_level: r.array(off::BRIDGE_PRODUCT_REVISION_LEVEL),
            sat_bridge_exists: r.u8(off::SAT_BRIDGE_EXISTS),
            interface_type: r.u8(off::INTERFACE_TYPE),
            temperature: r.u8(off::TEMPERATURE),
            emulated_block_size: r.u8(off::EMULATED_BLOCK_SIZE),
            user_data_block_size: r.u16(off::USER_DATA_BLOCK_SIZE),
            properties: r.u32(off::PROPERTIES),
            shield_diag_completion_time: r.u32s::<2>(off::SHIELD_DIAG_COMPLETION_TIME),
            shield_counter: r.u8(off::SHIELD_COUNTER),
            link_speed_other: r.u8(off::LINK_SPEED_OTHER),
            bbm_err: r.u32(off::BBM_ERR),
        })
    }
}

impl PdInfo {
    pub fn state(&self) -> PdState {
        PdState::from(self.fw_state)
    }

    pub fn media(&self) -> MediaType {
        match self.media_type {
            0 => MediaType::Hdd,
            1 => MediaType::Ssd,
            other => MediaType::Unknown(other),
        }
    }

    /// Size in sectors before coercion.
    pub fn raw_sectors(&self) -> u64 {
        assemble(&self.raw_size, 32)
    }

    pub fn non_coerced_sectors(&self) -> u64 {
        assemble(&self.non_coerced_size, 32)
    }

    pub fn coerced_sectors(&self) -> u64 {
        assemble(&self.coerced_size, 32)
    }

    pub fn size_string(&self) -> String {
        size_string(self.raw_sectors())
    }

    pub fn sas_address(&self, port: usize) -> u64 {
        sas_half(&self.path_sas_addr, port)
    }

    pub fn inquiry(&self) -> Result<Inquiry> {
        Inquiry::parse(&self.inquiry_data)
    }

    pub fn wwn(&self) -> Option<Wwn> {
        parse_page_83(&self.vpd_page_83)
    }

    pub fn wwn_ext(&self) -> Option<Wwn> {
        parse_page_83(&self.vpd_page_83_ext)
    }

    // MR_PD_DDF_TYPE: forcedPDGUID:1 inVD:1 isGlobalSpare:1 isSpare:1
    // isForeign:1 reserved:7 intf:4

    pub fn forced_pd_guid(&self) -> bool {
        bit(self.ddf_type, 0)
    }

    pub fn in_vd(&self) -> bool {
        bit(self.ddf_type, 1)
    }

    pub fn is_global_spare(&self) -> bool {
        bit(self.ddf_type, 2)
    }

    pub fn is_spare(&self) -> bool {
        bit(self.ddf_type, 3)
    }

    pub fn is_foreign(&self) -> bool {
        bit(self.ddf_type, 4)
    }

    pub fn interface(&self) -> u16 {
        bit_field(self.ddf_type, 12, 4)
    }

    /// Bitmap of broken paths.
    pub fn path_broken(&self) -> u8 {
        bit_field(self.path_bits, 0, 4)
    }

    pub fn wide_port_capable(&self) -> bool {
        bit(self.path_bits, 7)
    }

    // security: fdeCapable:1 fdeEnabled:1 secured:1 locked:1 foreign:1
    // needsEKM:1

    pub fn fde_capable(&self) -> bool {
        bit(self.security, 0)
    }

    pub fn fde_enabled(&self) -> bool {
        bit(self.security, 1)
    }

    pub fn secured(&self) -> bool {
        bit(self.security, 2)
    }

    pub fn locked(&self) -> bool {
        bit(self.security, 3)
    }

    pub fn security_foreign(&self) -> bool {
        bit(self.security, 4)
    }

    pub fn needs_ekm(&self) -> bool {
        bit(self.security, 5)
    }

    // properties: piType:3 piFormatted:1 piEligible:1 NCQ:1 WCE:1
    // commissionedSpare:1 emergencySpare:1 ineligibleForSSCD:1
    // ineligibleForLd:1 useSSEraseType:1 wceUnchanged:1 supportScsiUnmap:1

    pub fn pi_type(&self) -> u32 {
        bit_field(self.properties, 0, 3)
    }

    pub fn pi_formatted(&self) -> bool {
        bit(self.properties, 3)
    }

    pub fn pi_eligible(&self) -> bool {
        bit(self.properties, 4)
    }

    pub fn ncq(&self) -> bool {
        bit(self.properties, 5)
    }

    pub fn wce(&self) -> bool {
        bit(self.properties, 6)
    }

    pub fn commissioned_spare(&self) -> bool {
        bit(self.properties, 7)
    }

    pub fn emergency_spare(&self) -> bool {
        bit(self.properties, 8)
    }

    pub fn ineligible_for_sscd(&self) -> bool {
        bit(self.properties, 9)
    }

    pub fn ineligible_for_ld(&self) -> bool {
        bit(self.properties, 10)
    }

    pub fn use_ss_erase_type(&self) -> bool {
        bit(self.properties, 11)
    }

    pub fn wce_unchanged(&self) -> bool {
        bit(self.properties, 12)
    }

    pub fn supports_scsi_unmap(&self) -> bool {
        bit(self.properties, 13)
    }

    /// Bad block management error count, if the drive reports one.
    pub fn bbm_error_count(&self) -> Option<u32> {
        bit(self.bbm_err, 0).then(|| bit_field(self.bbm_err, 1, 31))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::wire::LeWriter;

    /// A PD info response for a 1.8 TB SAS disk in enclosure 252, slot 3.
    pub(crate) fn sample_pd_info() -> Vec<u8> {
        let mut buf = vec![0_u8; PdInfo::SIZE];
        let mut w = LeWriter::new(&mut buf);
        w.u16(off::DEVICE_ID, 10);
        w.u16(off::SEQ_NUM, 2);
        let inquiry = off::INQUIRY_DATA;
        w.bytes(inquiry + 8, b"SEAGATE ");
        w.bytes(inquiry + 16, b"ST2000NM0045    ");
        w.bytes(inquiry + 32, b"N004");
        w.bytes(inquiry + 36, b"ZC20ABCD            ");
        w.bytes(
            off::VPD_PAGE_83,
            &[0, 0x83, 0, 0x0c, 0x01, 0x03, 0x00, 0x08],
        );
        w.bytes(
            off::VPD_PAGE_83 + 8,
            &[0x50, 0x00, 0xc5, 0x00, 0xa1, 0xb2, 0xc3, 0xd4],
        );
        w.u32(off::MEDIA_ERR_COUNT, 4);
        w.u16(off::FW_STATE, 0x18);
        // inVD and interface 1 (SAS)
        w.u16(off::DDF_TYPE, (1 << 12) | 0b10);
        w.u8(off::PATH_COUNT, 1);
        w.u8(off::PATH_BITS, 0x80);
        w.u32(off::PATH_SAS_ADDR, 0xa1b2_c3d5);
        w.u32(off::PATH_SAS_ADDR + 4, 0x5000_c500);
        w.u32(off::RAW_SIZE, 0xe8e0_88b0);
        w.u32(off::NON_COERCED_SIZE, 0xe8d0_88b0);
        w.u32(off::COERCED_SIZE, 0xe8c0_0000);
        w.u16(off::ENCL_DEVICE_ID, 252);
        w.u8(off::SLOT_NUMBER, 3);
        w.u32(off::PROG_INFO, 0b1);
        w.u16(off::PROG_INFO + 4, 0x8000);
        w.u16(off::SECURITY, 0b11);
        w.u8(off::MEDIA_TYPE, 0);
        w.u8(off::TEMPERATURE, 31);
        // piType 2, NCQ, WCE
        w.u32(off::PROPERTIES, 0b110_0010);
        w.u32(off::BBM_ERR, (7 << 1) | 1);
        buf
    }

    #[test]
    fn decodes_pd_info() {
        let info = PdInfo::decode(&sample_pd_info()).unwrap();
        assert_eq!(info.device_id, 10);
        assert_eq!(info.encl_device_id, 252);
        assert_eq!(info.slot_number, 3);
        assert_eq!(info.state(), PdState::Online);
        assert_eq!(info.state().to_string(), "Online");
        assert_eq!(info.media(), MediaType::Hdd);
        assert_eq!(info.media_err_count, 4);
        assert_eq!(info.temperature, 31);
        assert_eq!(info.raw_sectors(), 3_907_029_168);
        assert_eq!(info.size_string(), "1.82 TB");
        assert_eq!(info.coerced_sectors(), 0xe8c0_0000);
        assert_eq!(info.sas_address(0), 0x5000_c500_a1b2_c3d5);
        assert_eq!(info.sas_address(1), 0);
        assert!(info.wide_port_capable());
        assert_eq!(info.path_broken(), 0);
    }

    #[test]
    fn pd_info_bit_fields() {
        let info = PdInfo::decode(&sample_pd_info()).unwrap();
        assert!(info.in_vd());
        assert!(!info.is_spare());
        assert_eq!(info.interface(), 1);

        assert!(info.fde_capable());
        assert!(info.fde_enabled());
        assert!(!info.locked());

        assert_eq!(info.pi_type(), 2);
        assert!(info.ncq());
        assert!(info.wce());
        assert!(!info.pi_formatted());
        assert!(!info.supports_scsi_unmap());

        assert_eq!(info.bbm_error_count(), Some(7));
        assert!(info.progress.rebuild_active());
        assert_eq!(info.progress.rebuild.progress, 0x8000);
    }

    #[test]
    fn pd_info_embedded_descriptors() {
        let info = PdInfo::decode(&sample_pd_info()).unwrap();
        let inq = info.inquiry().unwrap();
        assert_eq!(inq.vendor_identification, "SEAGATE");
        assert_eq!(inq.product_identification, "ST2000NM0045");
        assert_eq!(inq.serial_number, "ZC20ABCD");
        assert_eq!(info.wwn().unwrap().to_string(), "naa.5000c500a1b2c3d4");
        assert_eq!(info.wwn_ext(), None);
    }

    #[test]
    fn unknown_states_are_kept() {
        assert_eq!(PdState::from(0x99), PdState::Unknown(0x99));
        assert_eq!(PdState::from(0x40).to_string(), "Jbod");
    }

    #[test]
    fn decodes_pd_list() {
        let mut buf = vec![0_u8; PdList::SIZE];
        let mut w = LeWriter::new(&mut buf);
        w.u32(0, 8 + 2 * 24);
        w.u32(4, 2);
        // first entry: did 0, enclosure 252, slot 1, disk
        w.u16(8, 0);
        w.u16(10, 252);
        w.u8(12, 1);
        w.u8(13, 1);
        w.u32(16, 0x5000_0001);
        w.u32(20, 0x5000_c500);
        // second entry: the enclosure itself
        w.u16(32, 252);
        w.u16(34, 252);
        w.u8(37, 255);
        w.u8(38, 0x0d);

        let list = PdList::decode(&buf).unwrap();
        assert_eq!(list.addresses.len(), 2);
        let disk = &list.addresses[0];
        assert!(disk.is_scsi_dev());
        assert_eq!(disk.enclosure_id, 252);
        assert_eq!(disk.slot_number, 1);
        assert_eq!(disk.sas_address(0), 0x5000_c500_5000_0001);
        assert_eq!(format_sas_address(disk.sas_address(0)), "0x5000c50050000001");
        let enclosure = &list.addresses[1];
        assert!(!enclosure.is_scsi_dev());
        assert_eq!(enclosure.slot_number, 255);
    }

    #[test]
    fn empty_pd_list() {
        let buf = vec![0_u8; PdList::SIZE];
        let list = PdList::decode(&buf).unwrap();
        assert!(list.addresses.is_empty());
    }

    #[test]
    fn pd_list_count_overflow() {
        let mut buf = vec![0_u8; PdList::SIZE];
        LeWriter::new(&mut buf).u32(4, 1000);
        let e = PdList::decode(&buf).expect_err("1000 entries do not fit");
        assert!(matches!(e, MfiError::InvalidCount { count: 1000, .. }));
    }
}
