//! Errors surfaced by the MFI codec, transport, and discovery.

use crate::mfi::status::Status;

pub type Result<T, E = MfiError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum MfiError {
    /// The control operation itself failed. The OS error is kept verbatim.
    #[error("ioctl exchange failed: {0}")]
    Transport(#[source] std::io::Error),

    /// The firmware completed the command with a non-success status.
    #[error("firmware rejected opcode {opcode:#010x} with status {status}")]
    Firmware { opcode: u32, status: Status },

    /// A buffer is too short for the fixed-size structure being decoded.
    #[error("{structure} needs {expected} bytes, buffer holds {actual}")]
    Truncated {
        structure: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A list response claims more entries than its buffer can carry.
    #[error("{structure} reports {count} entries, buffer fits {capacity}")]
    InvalidCount {
        structure: &'static str,
        count: u32,
        capacity: usize,
    },

    /// The transfer length field of a frame is 32 bits wide.
    #[error("response buffer of {0} bytes does not fit a 32 bit transfer length")]
    BufferTooLarge(usize),

    #[error("adapter discovery failed: {0}")]
    Discovery(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MfiError {
    /// Shorthand for a [`MfiError::Truncated`] check against a fixed size.
    pub(crate) fn ensure_len(structure: &'static str, expected: usize, buf: &[u8]) -> Result<()> {
        if buf.len() < expected {
            return Err(MfiError::Truncated {
                structure,
                expected,
                actual: buf.len(),
            });
        }
        Ok(())
    }
}

impl From<nix::errno::Errno> for MfiError {
    fn from(errno: nix::errno::Errno) -> Self {
        MfiError::Transport(std::io::Error::from(errno))
    }
}
