//! The 12 byte DCMD mailbox.
//!
//! In the firmware headers the mailbox is a union of `u8[12]`, `u16[6]` and
//! `u32[3]`, and which view is meaningful depends on the opcode. Here the
//! caller picks the interpretation explicitly and the codec serializes it.

use crate::mfi::opcode::MAX_DEV_PER_CHANNEL;
use crate::wire::LeWriter;

pub const MBOX_SIZE: usize = 12;

/// Mailboxes compare by their serialized bytes, so `Empty` equals a decoded
/// all-zero mailbox and a view equals the raw bytes it produces.
#[derive(Copy, Clone, Debug, Default)]
pub enum Mailbox {
    /// All twelve bytes zero.
    #[default]
    Empty,
    /// `mbox.b`
    Bytes([u8; 12]),
    /// `mbox.s`, little endian.
    Words([u16; 6]),
    /// `mbox.w`, little endian.
    Dwords([u32; 3]),
}

impl Mailbox {
    /// Addresses a physical drive by target device id, written as `mbox.s[0]`.
    pub fn device_id(channel: u16, device: u16) -> Self {
        let mut words = [0; 6];
        words[0] = channel
            .wrapping_mul(MAX_DEV_PER_CHANNEL)
            .wrapping_add(device);
        Mailbox::Words(words)
    }

    /// Selects a sub-command or query type, written as `mbox.b[0]`.
    pub fn sub_command(byte: u8) -> Self {
        let mut bytes = [0; 12];
        bytes[0] = byte;
        Mailbox::Bytes(bytes)
    }

    pub fn to_bytes(&self) -> [u8; MBOX_SIZE] {
        let mut out = [0; MBOX_SIZE];
        let mut w = LeWriter::new(&mut out);
        match self {
            Mailbox::Empty => {}
            Mailbox::Bytes(b) => w.bytes(0, b),
            Mailbox::Words(s) => {
                for (i, word) in s.iter().enumerate() {
                    w.u16(i * 2, *word);
                }
            }
            Mailbox::Dwords(d) => {
                for (i, dword) in d.iter().enumerate() {
                    w.u32(i * 4, *dword);
                }
            }
        }
        out
    }

    /// The raw bytes seen through the 16-bit view.
    pub fn words_of(raw: &[u8; MBOX_SIZE]) -> [u16; 6] {
        std::array::from_fn(|i| u16::from_le_bytes([raw[i * 2], raw[i * 2 + 1]]))
    }

    /// The raw bytes seen through the 32-bit view.
    pub fn dwords_of(raw: &[u8; MBOX_SIZE]) -> [u32; 3] {
        std::array::from_fn(|i| {
            u32::from_le_bytes([raw[i * 4], raw[i * 4 + 1], raw[i * 4 + 2], raw[i * 4 + 3]])
        })
    }
}

impl PartialEq for Mailbox {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for Mailbox {}
