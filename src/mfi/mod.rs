//! MFI (MegaRAID Firmware Interface) protocol core.
//!
//! Layouts below are taken from the Linux `megaraid_sas` driver headers:
//! <https://github.com/torvalds/linux/blob/master/drivers/scsi/megaraid/megaraid_sas.h>
//!
//! A query is a single DCMD. The host fills a [`frame::DcmdFrame`] with an
//! [`opcode::Opcode`] and a [`mailbox::Mailbox`], wraps it in the ioctl
//! packet with one scatter-gather element pointing at a response buffer, and
//! decodes that buffer as one of the structures in [`response`].

pub mod frame;
pub mod mailbox;
pub mod opcode;
pub mod response;
pub mod status;
