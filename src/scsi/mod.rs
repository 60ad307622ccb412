//! SCSI data formats carried inside MFI responses, as described in:
//! - SCSI Primary Commands – 2 (SPC-2):
//!   <https://www.rockbox.org/wiki/pub/Main/DataSheets/spc2r20.pdf>
//!   Section 7.3.2 describes the standard INQUIRY data, section 8.4.4 the
//!   Device Identification VPD page (0x83).
//!
//! The adapter stores both verbatim in `MR_PD_INFO`. They are never sent to
//! the drive from here, only parsed out of the firmware's copy.

pub mod inquiry;
pub mod vpd;
