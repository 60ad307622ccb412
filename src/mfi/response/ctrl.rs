//! `MR_DCMD_CTRL_GET_INFO`: `struct megasas_ctrl_info`.
//!
//! The structure is 2384 bytes, padded by the firmware to 2K and then
//! extended. Offsets in the `off` module are annotated in hex where the
//! kernel header annotates them.

use crate::bits::{assemble, bit, bit_field};
use crate::error::Result;
use crate::wire::{Decode, LeReader, c_string};

mod off {
    pub const PCI: usize = 0;
    pub const HOST_INTERFACE: usize = 32;
    pub const DEVICE_INTERFACE: usize = 104;
    pub const IMAGE_CHECK_WORD: usize = 176;
    pub const IMAGE_COMPONENT_COUNT: usize = 180;
    pub const IMAGE_COMPONENT: usize = 184;
    pub const PENDING_IMAGE_COMPONENT_COUNT: usize = 760;
    pub const PENDING_IMAGE_COMPONENT: usize = 764;
    pub const MAX_ARMS: usize = 1340;
    pub const MAX_SPANS: usize = 1341;
    pub const MAX_ARRAYS: usize = 1342;
    pub const MAX_LDS: usize = 1343;
    pub const PRODUCT_NAME: usize = 1344;
    pub const SERIAL_NO: usize = 1424;
    pub const HW_PRESENT: usize = 1456;
    pub const CURRENT_FW_TIME: usize = 1460;
    pub const MAX_CONCURRENT_CMDS: usize = 1464;
    pub const MAX_SGE_COUNT: usize = 1466;
    pub const MAX_REQUEST_SIZE: usize = 1468;
    pub const LD_PRESENT_COUNT: usize = 1472;
    pub const LD_DEGRADED_COUNT: usize = 1474;
    pub const LD_OFFLINE_COUNT: usize = 1476;
    pub const PD_PRESENT_COUNT: usize = 1478;
    pub const PD_DISK_PRESENT_COUNT: usize = 1480;
    pub const PD_DISK_PRED_FAILURE_COUNT: usize = 1482;
    pub const PD_DISK_FAILED_COUNT: usize = 1484;
    pub const NVRAM_SIZE: usize = 1486;
    pub const MEMORY_SIZE: usize = 1488;
    pub const FLASH_SIZE: usize = 1490;
    pub const MEM_CORRECTABLE_ERROR_COUNT: usize = 1492;
    pub const MEM_UNCORRECTABLE_ERROR_COUNT: usize = 1494;
    pub const CLUSTER_PERMITTED: usize = 1496;
    pub const CLUSTER_ACTIVE: usize = 1497;
    pub const MAX_STRIPS_PER_IO: usize = 1498;
    pub const RAID_LEVELS: usize = 1500;
    pub const ADAPTER_OPERATIONS: usize = 1504;
    pub const LD_OPERATIONS: usize = 1508;
    pub const STRIPE_SZ_MIN: usize = 1512;
    pub const STRIPE_SZ_MAX: usize = 1513;
    pub const PD_OPERATIONS: usize = 1516;
    pub const PD_MIX_SUPPORT: usize = 1520;
    pub const ECC_BUCKET_COUNT: usize = 1524;
    pub const PROPERTIES: usize = 1536;
    pub const PACKAGE_VERSION: usize = 0x640;
    pub const DEVICE_INTERFACE_PORT_ADDR_2: usize = 0x6a0;
    pub const PDS_FOR_RAID_LEVELS: usize = 0x760;
    pub const MAX_PDS: usize = 0x780;
    pub const MAX_DED_HSPS: usize = 0x782;
    pub const MAX_GLOBAL_HSP: usize = 0x784;
    pub const DDF_SIZE: usize = 0x786;
    pub const MAX_LDS_PER_ARRAY: usize = 0x788;
    pub const PARTITIONS_IN_DDF: usize = 0x789;
    pub const LOCK_KEY_BINDING: usize = 0x78a;
    pub const MAX_PITS_PER_LD: usize = 0x78b;
    pub const MAX_VIEWS_PER_LD: usize = 0x78c;
    pub const MAX_TARGET_ID: usize = 0x78d;
    pub const MAX_BVL_VD_SIZE: usize = 0x78e;
    pub const MAX_CONFIGURABLE_SSC_SIZE: usize = 0x790;
    pub const CURRENT_SSC_SIZE: usize = 0x792;
    pub const EXPANDER_FW_VERSION: usize = 0x794;
    pub const PFK_TRIAL_TIME_REMAINING: usize = 0x7a0;
    pub const CACHE_MEMORY_SIZE: usize = 0x7a2;
    pub const ADAPTER_OPERATIONS_2: usize = 0x7a4;
    pub const DRIVER_VERSION: usize = 0x7a8;
    pub const MAX_DA_PD_COUNT_SPINUP_60: usize = 0x7c8;
    pub const TEMPERATURE_ROC: usize = 0x7c9;
    pub const TEMPERATURE_CTRL: usize = 0x7ca;
    pub const MAX_CONFIGURABLE_PDS: usize = 0x7cc;
    pub const CLUSTER: usize = 0x7d0;
    pub const CLUSTER_ID: usize = 0x7d4;
    pub const IOV: usize = 0x7e4;
    pub const ADAPTER_OPERATIONS_3: usize = 0x7e8;
    pub const CPLD: usize = 0x7ec;
    pub const CPLD_USER_CODE: usize = 0x7f0;
    pub const ADAPTER_OPERATIONS_4: usize = 0x7fc;
    pub const SIZE_FIELD: usize = 0x800;
    pub const ADAPTER_OPERATIONS_5: usize = 0x848;
    pub const TASK_ABORT_TO: usize = 0x94b;
    pub const MAX_RESET_TO: usize = 0x94c;
    pub const SIZE: usize = 0x950;
}

const IMAGE_COMPONENTS: usize = 8;
const IMAGE_COMPONENT_SIZE: usize = 72;
const PORT_ADDRESSES: usize = 8;
const RAID_LEVEL_LIMITS: usize = 10;

/// `pci` block of the controller info.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PciInfo {
    pub vendor_id: u16,
    pub device_id: u16,
    pub sub_vendor_id: u16,
    pub sub_device_id: u16,
}

/// `host_interface` or `device_interface`: a capability byte, a port count
/// and up to eight 64-bit port SAS addresses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceInfo {
    pub bits: u8,
    pub port_count: u8,
    /// Eight addresses, two little-endian halves each.
    pub port_addr: [u32; 16],
}

impl InterfaceInfo {
    fn read(r: &LeReader<'_>, offset: usize) -> Self {
        Self {
            bits: r.u8(offset),
            port_count: r.u8(offset + 7),
            port_addr: r.u32s::<16>(offset + 8),
        }
    }

    pub fn port_address(&self, port: usize) -> u64 {
        if port >= PORT_ADDRESSES {
            return 0;
        }
        assemble(&self.port_addr[port * 2..port * 2 + 2], 32)
    }
}

/// One entry of the flash image component tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageComponent {
    pub name: String,
    pub version: String,
    pub build_date: String,
    pub build_time: String,
}

impl ImageComponent {
    fn read(r: &LeReader<'_>, offset: usize) -> Self {
        Self {
            name: c_string(r.bytes(offset, 8)),
            version: c_string(r.bytes(offset + 8, 32)),
            build_date: c_string(r.bytes(offset + 40, 16)),
            build_time: c_string(r.bytes(offset + 56, 16)),
        }
    }
}

fn read_components(r: &LeReader<'_>, count_offset: usize, offset: usize) -> Vec<ImageComponent> {
    let count = (r.u32(count_offset) as usize).min(IMAGE_COMPONENTS);
    (0..count)
        .map(|i| ImageComponent::read(r, offset + i * IMAGE_COMPONENT_SIZE))
        .collect()
}

/// `struct megasas_ctrl_prop`, the changeable controller settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CtrlProperties {
    pub seq_num: u16,
    pub pred_fail_poll_interval: u16,
    pub intr_throttle_count: u16,
    pub intr_throttle_timeouts: u16,
    pub rebuild_rate: u8,
    pub patrol_read_rate: u8,
    pub bgi_rate: u8,
    pub cc_rate: u8,
    pub recon_rate: u8,
    pub cache_flush_interval: u8,
    pub spinup_drv_count: u8,
    pub spinup_delay: u8,
    pub cluster_enable: u8,
    pub coercion_mode: u8,
    pub alarm_enable: u8,
    pub disable_auto_rebuild: u8,
    pub disable_battery_warn: u8,
    pub ecc_bucket_size: u8,
    pub ecc_bucket_leak_rate: u16,
    pub restore_hotspare_on_insertion: u8,
    pub expose_encl_devices: u8,
    pub maintain_pd_fail_history: u8,
    pub disallow_host_request_reordering: u8,
    pub abort_cc_on_error: u8,
    pub load_balance_mode: u8,
    pub disable_auto_detect_backplane: u8,
    pub snap_vd_space: u8,
    pub on_off_properties: u32,
    pub on_off_properties_2: u16,
    pub spin_down_time: u16,
}

impl CtrlProperties {
    fn read(r: &LeReader<'_>, o: usize) -> Self {
        Self {
            seq_num: r.u16(o),
            pred_fail_poll_interval: r.u16(o + 2),
            intr_throttle_count: r.u16(o + 4),
            intr_throttle_timeouts: r.u16(o + 6),
            rebuild_rate: r.u8(o + 8),
            patrol_read_rate: r.u8(o + 9),
            bgi_rate: r.u8(o + 10),
            cc_rate: r.u8(o + 11),
            recon_rate: r.u8(o + 12),
            cache_flush_interval: r.u8(o + 13),
            spinup_drv_count: r.u8(o + 14),
            spinup_delay: r.u8(o + 15),
            cluster_enable: r.u8(o + 16),
            coercion_mode: r.u8(o + 17),
            alarm_enable: r.u8(o + 18),
            disable_auto_rebuild: r.u8(o + 19),
            disable_battery_warn: r.u8(o + 20),
            ecc_bucket_size: r.u8(o + 21),
            ecc_bucket_leak_rate: r.u16(o + 22),
            restore_hotspare_on_insertion: r.u8(o + 24),
            expose_encl_devices: r.u8(o + 25),
            maintain_pd_fail_history: r.u8(o + 26),
            disallow_host_request_reordering: r.u8(o + 27),
            abort_cc_on_error: r.u8(o + 28),
            load_balance_mode: r.u8(o + 29),
            disable_auto_detect_backplane: r.u8(o + 30),
            snap_vd_space: r.u8(o + 31),
            on_off_properties: r.u32(o + 32),
            on_off_properties_2: r.u16(o + 36),
            spin_down_time: r.u16(o + 38),
        }
    }

    pub fn copyback_disabled(&self) -> bool {
        bit(self.on_off_properties, 0)
    }

    pub fn smarter_enabled(&self) -> bool {
        bit(self.on_off_properties, 1)
    }

    pub fn ncq_disabled(&self) -> bool {
        bit(self.on_off_properties, 4)
    }

    pub fn ssd_patrol_read_enabled(&self) -> bool {
        bit(self.on_off_properties, 6)
    }

    pub fn jbod_enabled(&self) -> bool {
        bit(self.on_off_properties, 13)
    }

    pub fn snap_dump_enabled(&self) -> bool {
        bit(self.on_off_properties_2, 4)
    }

    pub fn fw_dev_list_enabled(&self) -> bool {
        bit(self.on_off_properties_2, 6)
    }
}

/// Minimum and maximum drive counts for one RAID level
/// (`minPdRaidLevel_N:4 maxPdRaidLevel_N:12`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PdLimits {
    pub min: u16,
    pub max: u16,
}

/// SR-IOV virtual function information.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IovInfo {
    pub max_vfs_supported: u8,
    pub num_vfs_enabled: u8,
    /// 0 for the physical function, N for VF N.
    pub requestor_id: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CtrlInfo {
    pub pci: PciInfo,
    pub host_interface: InterfaceInfo,
    pub device_interface: InterfaceInfo,
    pub image_check_word: u32,
    pub image_components: Vec<ImageComponent>,
    /// Flashed but not active until the adapter is reset.
    pub pending_image_components: Vec<ImageComponent>,
    pub max_arms: u8,
    pub max_spans: u8,
    pub max_arrays: u8,
    pub max_lds: u8,
    pub product_name: String,
    pub serial_number: String,
    pub hw_present: u32,
    pub current_fw_time: u32,
    pub max_concurrent_cmds: u16,
    pub max_sge_count: u16,
    pub max_request_size: u32,
    pub ld_present_count: u16,
    pub ld_degraded_count: u16,
    pub ld_offline_count: u16,
    pub pd_present_count: u16,
    pub pd_disk_present_count: u16,
    pub pd_disk_pred_failure_count: u16,
    pub pd_disk_failed_count: u16,
    pub nvram_size: u16,
    pub memory_size: u16,
    pub flash_size: u16,
    pub mem_correctable_error_count: u16,
    pub mem_uncorrectable_error_count: u16,
    pub cluster_permitted: u8,
    pub cluster_active: u8,
    pub max_strips_per_io: u16,
    pub raid_levels: u32,
    pub adapter_operations: u32,
    pub ld_operations: u32,
    pub stripe_size_min: u8,
    pub stripe_size_max: u8,
    pub pd_operations: u32,
    pub pd_mix_support: u32,
    pub ecc_bucket_count: u8,
    pub properties: CtrlProperties,
    pub package_version: String,
    /// Port SAS addresses 8..16 when more than 8 phys are supported.
    pub device_interface_port_addr_2: [u32; 16],
    pds_for_raid_levels: [u16; RAID_LEVEL_LIMITS],
    pub max_pds: u16,
    pub max_ded_hsps: u16,
    pub max_global_hsp: u16,
    pub ddf_size: u16,
    pub max_lds_per_array: u8,
    pub partitions_in_ddf: u8,
    pub lock_key_binding: u8,
    pub max_pits_per_ld: u8,
    pub max_views_per_ld: u8,
    pub max_target_id: u8,
    pub max_bvl_vd_size: u16,
    pub max_configurable_ssc_size: u16,
    pub current_ssc_size: u16,
    pub expander_fw_version: String,
    pub pfk_trial_time_remaining: u16,
    pub cache_memory_size: u16,
    pub adapter_operations_2: u32,
    pub driver_version: String,
    pub max_da_pd_count_spinup_60: u8,
    pub temperature_roc: u8,
    pub temperature_ctrl: u8,
    pub max_configurable_pds: u16,
    pub cluster: u32,
    pub cluster_id: [u8; 16],
    pub iov: IovInfo,
    pub adapter_operations_3: u32,
    /// cpld_in_flash:1
    pub cpld: u8,
    pub cpld_user_code: String,
    pub adapter_operations_4: u16,
    pub size: u32,
    pub adapter_operations_5: u32,
    /// Seconds, used by Abort Task TM requests.
    pub task_abort_timeout: u8,
    /// Seconds.
    pub max_reset_timeout: u8,
}

impl Decode for CtrlInfo {
    const NAME: &'static str = "megasas_ctrl_info";
    const SIZE: usize = off::SIZE;

    fn read(r: LeReader<'_>) -> Result<Self> {
        Ok(Self {
            pci: PciInfo {
                vendor_id: r.u16(off::PCI),
                device_id: r.u16(off::PCI + 2),
                sub_vendor_id: r.u16(off::PCI + 4),
                sub_device_id: r.u16(off::PCI + 6),
            },
            host_interface: InterfaceInfo::read(&r, off::HOST_INTERFACE),
            device_interface: InterfaceInfo::read(&r, off::DEVICE_INTERFACE),
            image_check_word: r.u32(off::IMAGE_CHECK_WORD),
            image_components: read_components(&r, off::IMAGE_COMPONENT_COUNT, off::IMAGE_COMPONENT),
            pending_image_components: read_components(
                &r,
                off::PENDING_IMAGE_COMPONENT_COUNT,
                off::PENDING_IMAGE_COMPONENT,
            ),
            max_arms: r.u8(off::MAX_ARMS),
            max_spans: r.u8(off::MAX_SPANS),
            max_arrays: r.u8(off::MAX_ARRAYS),
            max_lds: r.u8(off::MAX_LDS),
            product_name: c_string(r.bytes(off::PRODUCT_NAME, 80)),
            serial_number: c_string(r.bytes(off::SERIAL_NO, 32)),
            hw_present: r.u32(off::HW_PRESENT),
            current_fw_time: r.u32(off::CURRENT_FW_TIME),
            max_concurrent_cmds: r.u16(off::MAX_CONCURRENT_CMDS),
            max_sge_count: r.u16(off::MAX_SGE_COUNT),
            max_request_size: r.u32(off::MAX_REQUEST_SIZE),
            ld_present_count: r.u16(off::LD_PRESENT_COUNT),
            ld_degraded_count: r.u16(off::LD_DEGRADED_COUNT),
            ld_offline_count: r.u16(off::LD_OFFLINE_COUNT),
            pd_present_count: r.u16(off::PD_PRESENT_COUNT),
            pd_disk_present_count: r.u16(off::PD_DISK_PRESENT_COUNT),
            pd_disk_pred_failure_count: r.u16(off::PD_DISK_PRED_FAILURE_COUNT),
            pd_disk_failed_count: r.u16(off::PD_DISK_FAILED_COUNT),
            nvram_size: r.u16(off::NVRAM_SIZE),
            memory_size: r.u16(off::MEMORY_SIZE),
            flash_size: r.u16(off::FLASH_SIZE),
            mem_correctable_error_count: r.u16(off::MEM_CORRECTABLE_ERROR_COUNT),
            mem_uncorrectable_error_count: r.u16(off::MEM_UNCORRECTABLE_ERROR_COUNT),
            cluster_permitted: r.u8(off::CLUSTER_PERMITTED),
            cluster_active: r.u8(off::CLUSTER_ACTIVE),
            max_strips_per_io: r.u16(off::MAX_STRIPS_PER_IO),
            raid_levels: r.u32(off::RAID_LEVELS),
            adapter_operations: r.u32(off::ADAPTER_OPERATIONS),
            ld_operations: r.u32(off::LD_OPERATIONS),
            stripe_size_min: r.u8(off::STRIPE_SZ_MIN),
            stripe_size_max: r.u8(off::STRIPE_SZ_MAX),
            pd_operations: r.u32(off::PD_OPERATIONS),
            pd_mix_support: r.u32(off::PD_MIX_SUPPORT),
            ecc_bucket_count: r.u8(off::ECC_BUCKET_COUNT),
            properties: CtrlProperties::read(&r, off::PROPERTIES),
            package_version: c_string(r.bytes(off::PACKAGE_VERSION, 0x60)),
            device_interface_port_addr_2: r.u32s::<16>(off::DEVICE_INTERFACE_PORT_ADDR_2),
            pds_for_raid_levels: std::array::from_fn(|i| r.u16(off::PDS_FOR_RAID_LEVELS + i * 2)),
            max_pds: r.u16(off::MAX_PDS),
            max_ded_hsps: r.u16(off::MAX_DED_HSPS),
            max_global_hsp: r.u16(off::MAX_GLOBAL_HSP),
            ddf_size: r.u16(off::DDF_SIZE),
            max_lds_per_array: r.u8(off::MAX_LDS_PER_ARRAY),
            partitions_in_ddf: r.u8(off::PARTITIONS_IN_DDF),
            lock_key_binding: r.u8(off::LOCK_KEY_BINDING),
            max_pits_per_ld: r.u8(off::MAX_PITS_PER_LD),
            max_views_per_ld: r.u8(off::MAX_VIEWS_PER_LD),
            max_target_id: r.u8(off::MAX_TARGET_ID),
            max_bvl_vd_size: r.u16(off::MAX_BVL_VD_SIZE),
            max_configurable_ssc_size: r.u16(off::MAX_CONFIGURABLE_SSC_SIZE),
            current_ssc_size: r.u16(off::CURRENT_SSC_SIZE),
            expander_fw_version: c_string(r.bytes(off::EXPANDER_FW_VERSION, 12)),
            pfk_trial_time_remaining: r.u16(off::PFK_TRIAL_TIME_REMAINING),
            cache_memory_size: r.u16(off::CACHE_MEMORY_SIZE),
            adapter_operations_2: r.u32(off::ADAPTER_OPERATIONS_2),
            driver_version: c_string(r.bytes(off::DRIVER_VERSION, 32)),
            max_da_pd_count_spinup_60: r.u8(off::MAX_DA_PD_COUNT_SPINUP_60),
            temperature_roc: r.u8(off::TEMPERATURE_ROC),
            temperature_ctrl: r.u8(off::TEMPERATURE_CTRL),
            max_configurable_pds: r.u16(off::MAX_CONFIGURABLE_PDS),
            cluster: r.u32(off::CLUSTER),
            cluster_id: r.array(off::CLUSTER_ID),
            iov: IovInfo {
                max_vfs_supported: r.u8(off::IOV),
                num_vfs_enabled: r.u8(off::IOV + 1),
                requestor_id: r.u8(off::IOV + 2),
            },
            adapter_operations_3: r.u32(off::ADAPTER_OPERATIONS_3),
            cpld: r.u8(off::CPLD),
            cpld_user_code: c_string(r.bytes(off::CPLD_USER_CODE, 12)),
            adapter_operations_4: r.u16(off::ADAPTER_OPERATIONS_4),
            size: r.u32(off::SIZE_FIELD),
            adapter_operations_5: r.u32(off::ADAPTER_OPERATIONS_5),
            task_abort_timeout: r.u8(off::TASK_ABORT_TO),
            max_reset_timeout: r.u8(off::MAX_RESET_TO),
        })
    }
}

/// Backend link speed, the low nibble of the device interface byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeviceInterfaceSpeed {
    Sas12G,
    Unknown(u8),
}

impl CtrlInfo {
    // host_interface: PCIX:1 PCIE:1 iSCSI:1 SAS_3G:1 SRIOV:1

    pub fn host_pcix(&self) -> bool {
        bit(self.host_interface.bits, 0)
    }

    pub fn host_pcie(&self) -> bool {
        bit(self.host_interface.bits, 1)
    }

    pub fn host_iscsi(&self) -> bool {
        bit(self.host_interface.bits, 2)
    }

    pub fn host_sas_3g(&self) -> bool {
        bit(self.host_interface.bits, 3)
    }

    pub fn host_sriov(&self) -> bool {
        bit(self.host_interface.bits, 4)
    }

    // device_interface: SPI:1 SAS_3G:1 SATA_1_5G:1 SATA_3G:1

    pub fn device_spi(&self) -> bool {
        bit(self.device_interface.bits, 0)
    }

    pub fn device_sas_3g(&self) -> bool {
        bit(self.device_interface.bits, 1)
    }

    pub fn device_sata_1_5g(&self) -> bool {
        bit(self.device_interface.bits, 2)
    }

    pub fn device_sata_3g(&self) -> bool {
        bit(self.device_interface.bits, 3)
    }

    /// Newer firmware reports a speed code in the low nibble instead of the
    /// individual SPI/SAS/SATA bits.
    pub fn device_interface_speed(&self) -> DeviceInterfaceSpeed {
        match bit_field(self.device_interface.bits, 0, 4) {
            10 => DeviceInterfaceSpeed::Sas12G,
            other => DeviceInterfaceSpeed::Unknown(other),
        }
    }

    /// SAS address of backend port `port`, covering both address tables.
    pub fn device_port_address(&self, port: usize) -> u64 {
        match port {
            0..PORT_ADDRESSES => self.device_interface.port_address(port),
            PORT_ADDRESSES..16 => {
                let i = (port - PORT_ADDRESSES) * 2;
                assemble(&self.device_interface_port_addr_2[i..i + 2], 32)
            }
            _ => 0,
        }
    }

    // hw_present: bbu:1 alarm:1 nvram:1 uart:1

    pub fn has_bbu(&self) -> bool {
        bit(self.hw_present, 0)
    }

    pub fn has_alarm(&self) -> bool {
        bit(self.hw_present, 1)
    }

    pub fn has_nvram(&self) -> bool {
        bit(self.hw_present, 2)
    }

    pub fn has_uart(&self) -> bool {
        bit(self.hw_present, 3)
    }

    // raid_levels: 0:1 1:1 5:1 1E:1 6:1

    pub fn supports_raid_0(&self) -> bool {
        bit(self.raid_levels, 0)
    }

    pub fn supports_raid_1(&self) -> bool {
        bit(self.raid_levels, 1)
    }

    pub fn supports_raid_5(&self) -> bool {
        bit(self.raid_levels, 2)
    }

    pub fn supports_raid_1e(&self) -> bool {
        bit(self.raid_levels, 3)
    }

    pub fn supports_raid_6(&self) -> bool {
        bit(self.raid_levels, 4)
    }

    /// Drive count limits for RAID levels in firmware order:
    /// 0, 1, 5, 1E, 6, 10, 50, 60, 1E RLQ0, 1E0 RLQ0.
    pub fn pds_for_raid_level(&self, index: usize) -> Option<PdLimits> {
        self.pds_for_raid_levels.get(index).map(|&word| PdLimits {
            min: bit_field(word, 0, 4),
            max: bit_field(word, 4, 12),
        })
    }

    pub fn supports_bbu_operations(&self) -> bool {
        bit(self.adapter_operations, 7)
    }

    pub fn supports_foreign_config_import(&self) -> bool {
        bit(self.adapter_operations, 11)
    }

    pub fn supports_jbod(&self) -> bool {
        bit(self.adapter_operations_2, 11)
    }

    pub fn supports_max_ext_lds(&self) -> bool {
        bit(self.adapter_operations_3, 5)
    }

    pub fn supports_security_on_jbod(&self) -> bool {
        bit(self.adapter_operations_3, 18)
    }

    pub fn ctrl_info_ext_supported(&self) -> bool {
        bit(self.adapter_operations_4, 0)
    }

    pub fn supports_nvme_passthru(&self) -> bool {
        bit(self.adapter_operations_4, 13)
    }

    pub fn supports_pcie(&self) -> bool {
        bit(self.adapter_operations_5, 4)
    }

    pub fn jbod_enabled(&self) -> bool {
        self.properties.jbod_enabled()
    }

    pub fn cpld_in_flash(&self) -> bool {
        bit(self.cpld, 0)
    }

    pub fn cluster_peer_present(&self) -> bool {
        bit(self.cluster, 0)
    }
}
