//! Command transport to the `megaraid_sas` driver.
//!
//! The driver exposes a management character device. Every DCMD is one
//! `MEGASAS_IOC_FIRMWARE` ioctl on it, carrying a serialized
//! [`crate::mfi::frame::IocPacket`]. The driver DMAs the response into the
//! buffer named by the packet's scatter-gather list and copies the frame's
//! completion status back into the packet.

pub mod discovery;

use std::fs::OpenOptions;
use std::os::fd::{AsRawFd, OwnedFd};
use std::path::Path;

use nix::sys::stat::{Mode, SFlag, makedev, mknod};
use tracing::{debug, info, trace};

use crate::error::{MfiError, Result};
use crate::mfi::frame::{IOC_PACKET_SIZE, Request};
use discovery::{DiscoveryConfig, find_major};

/// `'M'`, the ioctl type of the megaraid_sas management node.
const MEGASAS_IOC_MAGIC: u8 = b'M';
const MEGASAS_IOC_FIRMWARE_NR: u8 = 1;

// MEGASAS_IOC_FIRMWARE = _IOWR('M', 1, struct megasas_iocpacket)
nix::ioctl_readwrite!(
    megasas_ioc_firmware,
    MEGASAS_IOC_MAGIC,
    MEGASAS_IOC_FIRMWARE_NR,
    [u8; IOC_PACKET_SIZE]
);

/// A channel able to carry one DCMD exchange at a time.
pub trait Channel {
    /// Performs one blocking exchange.
    ///
    /// On success the request's response buffer holds whatever the adapter
    /// wrote, and the packet holds the completion status. A failed control
    /// operation is returned as [`MfiError::Transport`] with the OS error
    /// unchanged.
    fn exchange(&mut self, request: &mut Request<'_>) -> Result<()>;
}

impl<C: Channel + ?Sized> Channel for &mut C {
    fn exchange(&mut self, request: &mut Request<'_>) -> Result<()> {
        (**self).exchange(request)
    }
}

/// An open handle on the management node. The descriptor is closed when the
/// channel is dropped.
#[derive(Debug)]
pub struct IoctlChannel {
    fd: OwnedFd,
}

impl IoctlChannel {
    /// Opens the management node, creating it first if the driver did not.
    ///
    /// The driver registers a character device major for the node but
    /// never creates the node itself.
    #[tracing::instrument(skip_all, fields(node = %config.node_path.display()))]
    pub fn open(config: &DiscoveryConfig) -> Result<Self> {
        if !config.node_path.exists() {
            let major = find_major(config)?;
            info!(major, "creating management node");
            create_node(&config.node_path, major)?;
        }
        Self::open_path(&config.node_path)
    }

    /// Opens an existing node read-write.
    pub fn open_path(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| MfiError::Discovery(format!("cannot open {}: {e}", path.display())))?;
        debug!("opened management node");
        Ok(Self {
            fd: OwnedFd::from(file),
        })
    }
}

fn create_node(path: &Path, major: u64) -> Result<()> {
    mknod(
        path,
        SFlag::S_IFCHR,
        Mode::from_bits_truncate(0o600),
        makedev(major, 0),
    )
    .map_err(|e| MfiError::Discovery(format!("mknod {} failed: {e}", path.display())))
}

impl Channel for IoctlChannel {
    #[tracing::instrument(skip_all, fields(opcode = ?request.opcode()))]
    fn exchange(&mut self, request: &mut Request<'_>) -> Result<()> {
        // SAFETY: the packet is exactly the 404 bytes encoded in the request
        // number. The only address it embeds is the request's response
        // buffer, which the request borrows mutably for this whole call, and
        // the driver writes at most the transfer length into it.
        let rc = unsafe { megasas_ioc_firmware(self.fd.as_raw_fd(), request.packet_mut()) }?;
        trace!(rc, status = %request.completion_status(), "ioctl returned");
        Ok(())
    }
}
