//! Fixed-layout response structures, one module per DCMD family.

pub mod ctrl;
pub mod host_device;
pub mod ld;
pub mod pd;
