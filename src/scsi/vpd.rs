//! Device Identification VPD page (0x83), SPC-3 7.6.3.
//!
//! The page starts with a 4 byte header, followed by identification
//! descriptors, each a 4 byte header whose last byte is the length of the
//! designator that follows it.

use std::fmt;

use crate::bits::bit_field;

const PAGE_HEADER_LEN: usize = 4;
const DESCRIPTOR_HEADER_LEN: usize = 4;

/// NAA formats that carry a 64-bit world wide name.
const NAA_IEEE_REGISTERED: u8 = 0x5;
const NAA_IEEE_REGISTERED_EXTENDED: u8 = 0x6;

/// A world wide name taken from an NAA designator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Wwn(pub u64);

impl fmt::Display for Wwn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "naa.{:016x}", self.0)
    }
}

/// Returns the first NAA 5h/6h world wide name on the page.
///
/// The walk stops at the first zero or overflowing descriptor length. A
/// corrupt descriptor header means the rest of the page can't be trusted,
/// so no attempt is made to resynchronize.
pub fn parse_page_83(page: &[u8]) -> Option<Wwn> {
    let mut offset = PAGE_HEADER_LEN;
    while offset + DESCRIPTOR_HEADER_LEN <= page.len() {
        let length = page[offset + 3] as usize;
        let start = offset + DESCRIPTOR_HEADER_LEN;
        if length == 0 || start + length > page.len() {
            return None;
        }
        let designator = &page[start..start + length];
        if designator.len() >= 8 {
            let naa = bit_field(designator[0], 4, 4);
            if naa == NAA_IEEE_REGISTERED || naa == NAA_IEEE_REGISTERED_EXTENDED {
                let mut wwn = [0_u8; 8];
                wwn.copy_from_slice(&designator[designator.len() - 8..]);
                return Some(Wwn(u64::from_be_bytes(wwn)));
            }
        }
        offset = start + length;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{Wwn, parse_page_83};

    #[test]
    fn finds_naa_designator() {
        let page = [
            0x00, 0x83, 0x00, 0x0c, 0x01, 0x00, 0x00, 0x08, 0x51, 0x02, 0x03, 0x04, 0x05, 0x06,
            0x07, 0x08,
        ];
        let wwn = parse_page_83(&page).expect("NAA 5h designator is present");
        assert_eq!(wwn, Wwn(0x5102_0304_0506_0708));
        assert_eq!(wwn.to_string(), "naa.5102030405060708");
    }

    #[test]
    fn skips_non_naa_designators() {
        let mut page = vec![0x00, 0x83, 0x00, 0x00];
        // T10 vendor id designator, 8 bytes of ASCII
        page.extend_from_slice(&[0x02, 0x01, 0x00, 0x08]);
        page.extend_from_slice(b"ATA     ");
        // NAA 6h, 16 byte designator: the WWN is the last 8 bytes
        page.extend_from_slice(&[0x01, 0x03, 0x00, 0x10]);
        page.extend_from_slice(&[0x60, 0, 0, 0, 0, 0, 0, 0]);
        page.extend_from_slice(&[0x50, 0x00, 0xc5, 0x00, 0x12, 0x34, 0x56, 0x78]);
        page.resize(64, 0);
        let wwn = parse_page_83(&page).unwrap();
        assert_eq!(wwn.to_string(), "naa.5000c50012345678");
    }

    #[test]
    fn empty_or_zeroed_page_is_not_found() {
        assert_eq!(parse_page_83(&[]), None);
        assert_eq!(parse_page_83(&[0; 4]), None);
        assert_eq!(parse_page_83(&[0; 64]), None);
    }

    #[test]
    fn stops_at_overflowing_length() {
        let mut page = [0_u8; 16];
        page[7] = 0x40;
        page[8] = 0x50;
        assert_eq!(parse_page_83(&page), None);
    }
}
