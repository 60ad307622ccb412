//! Standard INQUIRY data, as cached by the firmware for every physical drive.
//!
//! Layout from SPC-2 7.3.2, table 46.

use crate::bits::{bit, bit_field};
use crate::error::{MfiError, Result};

/// The firmware keeps 96 bytes of INQUIRY data per drive.
pub const INQUIRY_SIZE: usize = 96;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inquiry {
    /// PERIPHERAL QUALIFIER (byte 0, bits 7:5).
    ///
    /// 0b000 means a device of the reported type is connected to this unit.
    pub peripheral_qualifier: u8,
    /// PERIPHERAL DEVICE TYPE (byte 0, bits 4:0), see SPC-2 table 48.
    pub peripheral_device_type: u8,
    /// RMB (byte 1, bit 7).
    pub removable_media: bool,
    pub version: u8,
    /// RESPONSE DATA FORMAT (byte 3, bits 3:0).
    pub response_data_format: u8,
    pub vendor_identification: String,
    pub product_identification: String,
    pub firmware_revision: String,
    /// Vendor specific bytes 36..56, used by drives for the serial number.
    pub serial_number: String,
}

impl Inquiry {
    pub fn parse(data: &[u8]) -> Result<Self> {
        MfiError::ensure_len("inquiry data", INQUIRY_SIZE, data)?;
        Ok(Self {
            peripheral_qualifier: bit_field(data[0], 5, 3),
            peripheral_device_type: bit_field(data[0], 0, 5),
            removable_media: bit(data[1], 7),
            version: data[2],
            response_data_format: bit_field(data[3], 0, 4),
            vendor_identification: ascii_field(&data[8..16]),
            product_identification: ascii_field(&data[16..32]),
            firmware_revision: ascii_field(&data[32..36]),
            serial_number: ascii_field(&data[36..56]),
        })
    }

    /// Human readable name of the peripheral device type.
    pub fn device_type(&self) -> &'static str {
        match self.peripheral_device_type {
            0x00 => "Direct access block device",
            0x01 => "Sequential access device",
            0x02 => "Printer device",
            0x03 => "Processor device",
            0x04 => "Write-once device",
            0x05 => "CD/DVD device",
            0x06 => "Scanner device",
            0x07 => "Optical memory device",
            0x08 => "Medium changer device",
            0x09 => "Communications device",
            0x0a => "Storage array controller device",
            0x0b => "Enclosure services device",
            0x0c => "Simplified direct-access device",
            0x0d => "Optical card reader/writer device",
            0x0e => "Bridge controller device",
            0x0f => "Object-based storage device",
            0x10 => "Automation/Drive interface",
            _ => "Unknown device type",
        }
    }
}

/// ASCII fields are space padded, some firmware pads with NUL instead.
fn ascii_field(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{INQUIRY_SIZE, Inquiry};

    fn sample() -> [u8; INQUIRY_SIZE] {
        let mut data = [0_u8; INQUIRY_SIZE];
        data[0] = 0x00;
        data[1] = 0x80;
        data[2] = 0x06;
        data[3] = 0x12;
        data[8..16].copy_from_slice(b"ACME    ");
        data[16..32].copy_from_slice(b"DISK1234        ");
        data[32..36].copy_from_slice(b"GA0A");
        data[36..56].copy_from_slice(b"ZA1B2C3D\0\0\0\0\0\0\0\0\0\0\0\0");
        data
    }

    #[test]
    fn parses_standard_fields() {
        let inq = Inquiry::parse(&sample()).unwrap();
        assert_eq!(inq.peripheral_qualifier, 0);
        assert_eq!(inq.peripheral_device_type, 0);
        assert!(inq.removable_media);
        assert_eq!(inq.version, 6);
        assert_eq!(inq.response_data_format, 2);
        assert_eq!(inq.vendor_identification, "ACME");
        assert_eq!(inq.product_identification, "DISK1234");
        assert_eq!(inq.firmware_revision, "GA0A");
        assert_eq!(inq.serial_number, "ZA1B2C3D");
        assert_eq!(inq.device_type(), "Direct access block device");
    }

    #[test]
    fn qualifier_and_type_share_byte_zero() {
        let mut data = sample();
        // qualifier 0b011 (not capable), type 0x0d (enclosure)
        data[0] = 0b0110_1101;
        data[1] = 0x7f;
        let inq = Inquiry::parse(&data).unwrap();
        assert_eq!(inq.peripheral_qualifier, 3);
        assert_eq!(inq.peripheral_device_type, 0x0d);
        assert!(!inq.removable_media);
    }

    #[test]
    fn short_region_is_a_length_error() {
        let e = Inquiry::parse(&[0; 36]).expect_err("36 bytes is too short");
        assert!(e.to_string().contains("inquiry data needs 96 bytes"));
    }
}
