//! Host-side codec and transport for MegaRAID SAS adapters.

pub mod adapter;
pub mod bits;
pub mod error;
pub mod ioctl;
pub mod mfi;
pub mod scsi;
pub mod size;
pub mod wire;

pub use adapter::Adapter;
pub use error::{MfiError, Result};
