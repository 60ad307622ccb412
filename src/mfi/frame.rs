//! The DCMD frame and the ioctl packet that carries it to the driver.
//!
//! Layouts follow `megaraid_sas.h` from the Linux kernel. Both structures are
//! `__packed` there, so each field is written at its exact byte offset here
//! and the offsets double as protocol constants.

use tracing::{debug, trace};

use crate::error::{MfiError, Result};
use crate::mfi::mailbox::{MBOX_SIZE, Mailbox};
use crate::mfi::opcode::Opcode;
use crate::mfi::status::{CommandKind, Status};
use crate::wire::{Decode, LeReader, LeWriter};

/// Maximum scatter-gather elements in one ioctl packet.
pub const MAX_IOCTL_SGE: usize = 16;

/// `struct megasas_sge64`: 64-bit address followed by a 32-bit length.
pub const SGE64_SIZE: usize = 12;
/// `struct iovec` on a 64-bit host.
pub const IOVEC_SIZE: usize = 16;
/// The frame area of the packet is a 128 byte union of every frame type.
pub const FRAME_AREA_SIZE: usize = 128;

/// Byte offsets inside `struct megasas_dcmd_frame`.
pub mod dcmd {
    pub const CMD: usize = 0;
    pub const RESERVED_0: usize = 1;
    pub const CMD_STATUS: usize = 2;
    pub const RESERVED_1: usize = 3;
    pub const SGE_COUNT: usize = 7;
    pub const CONTEXT: usize = 8;
    pub const PAD_0: usize = 12;
    pub const FLAGS: usize = 16;
    pub const TIMEOUT: usize = 18;
    pub const DATA_XFER_LEN: usize = 20;
    pub const OPCODE: usize = 24;
    pub const MBOX: usize = 28;
    /// Offset of the scatter-gather list, announced to the driver as `sgl_off`.
    pub const SGL: usize = 40;
    pub const SIZE: usize = SGL + super::SGE64_SIZE;
}

/// Byte offsets inside `struct megasas_iocpacket`.
pub mod ioc {
    pub const HOST_NO: usize = 0;
    pub const PAD_1: usize = 2;
    pub const SGL_OFF: usize = 4;
    pub const SGE_COUNT: usize = 8;
    pub const SENSE_OFF: usize = 12;
    pub const SENSE_LEN: usize = 16;
    pub const FRAME: usize = 20;
    pub const SGL: usize = FRAME + super::FRAME_AREA_SIZE;
}

/// The packed ioctl packet is *always* 404 bytes. This size is also encoded
/// into the ioctl request number.
pub const IOC_PACKET_SIZE: usize = 404;

const _: () = {
    assert!(dcmd::MBOX + MBOX_SIZE == dcmd::SGL, "mailbox must end at the sgl");
    assert!(dcmd::SIZE <= FRAME_AREA_SIZE, "dcmd frame overflows frame area");
    assert!(
        ioc::SGL + MAX_IOCTL_SGE * IOVEC_SIZE == IOC_PACKET_SIZE,
        "megasas_iocpacket not 404 bytes in size"
    );
};

/// Data transfer direction, the `MFI_FRAME_DIR_*` bits of the frame flags.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    None,
    /// Host to adapter.
    Write,
    /// Adapter to host.
    Read,
    Both,
}

impl Direction {
    const MASK: u16 = 0x0018;

    pub fn flags(self) -> u16 {
        match self {
            Direction::None => 0x0000,
            Direction::Write => 0x0008,
            Direction::Read => 0x0010,
            Direction::Both => 0x0018,
        }
    }

    pub fn from_flags(flags: u16) -> Self {
        match flags & Self::MASK {
            0x0008 => Direction::Write,
            0x0010 => Direction::Read,
            0x0018 => Direction::Both,
            _ => Direction::None,
        }
    }
}

/// A single 64-bit scatter-gather element.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SgEntry {
    pub phys_addr: u64,
    pub length: u32,
}

/// `struct megasas_dcmd_frame`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DcmdFrame {
    pub cmd: CommandKind,
    pub status: Status,
    pub sge_count: u8,
    pub context: u32,
    pub flags: u16,
    /// Advisory to the firmware only, never enforced on the host.
    pub timeout: u16,
    pub data_xfer_len: u32,
    /// Raw opcode, decoded frames may carry values outside [`Opcode`].
    pub opcode: u32,
    pub mailbox: Mailbox,
    pub sgl: SgEntry,
}

impl DcmdFrame {
    pub fn direction(&self) -> Direction {
        Direction::from_flags(self.flags)
    }

    fn write(&self, out: &mut [u8]) {
        let mut w = LeWriter::new(out);
        w.u8(dcmd::CMD, self.cmd.into());
        w.u8(dcmd::CMD_STATUS, self.status.into());
        w.u8(dcmd::SGE_COUNT, self.sge_count);
        w.u32(dcmd::CONTEXT, self.context);
        w.u32(dcmd::PAD_0, 0);
        w.u16(dcmd::FLAGS, self.flags);
        w.u16(dcmd::TIMEOUT, self.timeout);
        w.u32(dcmd::DATA_XFER_LEN, self.data_xfer_len);
        w.u32(dcmd::OPCODE, self.opcode);
        w.bytes(dcmd::MBOX, &self.mailbox.to_bytes());
        w.u64(dcmd::SGL, self.sgl.phys_addr);
        w.u32(dcmd::SGL + 8, self.sgl.length);
    }
}

impl Decode for DcmdFrame {
    const NAME: &'static str = "megasas_dcmd_frame";
    const SIZE: usize = dcmd::SIZE;

    fn read(r: LeReader<'_>) -> Result<Self> {
        Ok(Self {
            cmd: r.u8(dcmd::CMD).into(),
            status: r.u8(dcmd::CMD_STATUS).into(),
            sge_count: r.u8(dcmd::SGE_COUNT),
            context: r.u32(dcmd::CONTEXT),
            flags: r.u16(dcmd::FLAGS),
            timeout: r.u16(dcmd::TIMEOUT),
            data_xfer_len: r.u32(dcmd::DATA_XFER_LEN),
            opcode: r.u32(dcmd::OPCODE),
            mailbox: Mailbox::Bytes(r.array(dcmd::MBOX)),
            sgl: SgEntry {
                phys_addr: r.u64(dcmd::SGL),
                length: r.u32(dcmd::SGL + 8),
            },
        })
    }
}

/// Host-side `(address, length)` pair handed to the driver.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Iovec {
    pub base: u64,
    pub len: u64,
}

/// `struct megasas_iocpacket`, the argument of `MEGASAS_IOC_FIRMWARE`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IocPacket {
    pub host_no: u16,
    /// Offset of the sgl within the frame, must equal [`dcmd::SGL`].
    pub sgl_off: u32,
    pub sge_count: u32,
    pub sense_off: u32,
    pub sense_len: u32,
    pub frame: DcmdFrame,
    pub sgl: [Iovec; MAX_IOCTL_SGE],
}

impl IocPacket {
    /// Serializes the packet to its packed byte layout.
    pub fn to_bytes(&self) -> [u8; IOC_PACKET_SIZE] {
        let mut out = [0_u8; IOC_PACKET_SIZE];
        self.frame.write(&mut out[ioc::FRAME..ioc::FRAME + FRAME_AREA_SIZE]);
        let mut w = LeWriter::new(&mut out);
        w.u16(ioc::HOST_NO, self.host_no);
        w.u16(ioc::PAD_1, 0);
        w.u32(ioc::SGL_OFF, self.sgl_off);
        w.u32(ioc::SGE_COUNT, self.sge_count);
        w.u32(ioc::SENSE_OFF, self.sense_off);
        w.u32(ioc::SENSE_LEN, self.sense_len);
        for (i, iov) in self.sgl.iter().enumerate() {
            let at = ioc::SGL + i * IOVEC_SIZE;
            w.u64(at, iov.base);
            w.u64(at + 8, iov.len);
        }
        out
    }
}

impl Decode for IocPacket {
    const NAME: &'static str = "megasas_iocpacket";
    const SIZE: usize = IOC_PACKET_SIZE;

    fn read(r: LeReader<'_>) -> Result<Self> {
        Ok(Self {
            host_no: r.u16(ioc::HOST_NO),
            sgl_off: r.u32(ioc::SGL_OFF),
            sge_count: r.u32(ioc::SGE_COUNT),
            sense_off: r.u32(ioc::SENSE_OFF),
            sense_len: r.u32(ioc::SENSE_LEN),
            frame: DcmdFrame::read(r.sub(ioc::FRAME, DcmdFrame::SIZE))?,
            sgl: std::array::from_fn(|i| {
                let at = ioc::SGL + i * IOVEC_SIZE;
                Iovec {
                    base: r.u64(at),
                    len: r.u64(at + 8),
                }
            }),
        })
    }
}

/// A serialized packet, ready to be handed to a [`crate::ioctl::Channel`].
///
/// The packet embeds the address of `buffer`, so the buffer stays mutably
/// borrowed for as long as the request exists and the address can never
/// outlive it.
pub struct Request<'buf> {
    opcode: Opcode,
    packet: [u8; IOC_PACKET_SIZE],
    buffer: &'buf mut [u8],
}

impl<'buf> Request<'buf> {
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn packet(&self) -> &[u8; IOC_PACKET_SIZE] {
        &self.packet
    }

    /// The packet as handed to the driver, which writes the completion
    /// status back into it.
    pub fn packet_mut(&mut self) -> &mut [u8; IOC_PACKET_SIZE] {
        &mut self.packet
    }

    pub fn buffer(&self) -> &[u8] {
        self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut [u8] {
        self.buffer
    }

    /// `cmd_status` as currently present in the packet's frame.
    pub fn completion_status(&self) -> Status {
        Status::from(self.packet[ioc::FRAME + dcmd::CMD_STATUS])
    }
}

/// Builds a DCMD request for `opcode` whose response lands in `buffer`.
///
/// The frame is sent with [`Status::Invalid`] and a single scatter-gather
/// element covering the whole buffer, so `buffer` must already be sized for
/// the structure being requested.
pub fn build_request<'buf>(
    host_no: u16,
    opcode: Opcode,
    mailbox: Mailbox,
    direction: Direction,
    buffer: &'buf mut [u8],
) -> Result<Request<'buf>> {
    let transfer_len =
        u32::try_from(buffer.len()).map_err(|_| MfiError::BufferTooLarge(buffer.len()))?;
    let address = buffer.as_mut_ptr() as u64;
    let sge_count = u8::from(transfer_len > 0);

    let mut sgl = [Iovec::default(); MAX_IOCTL_SGE];
    if sge_count > 0 {
        sgl[0] = Iovec {
            base: address,
            len: transfer_len.into(),
        };
    }

    let packet = IocPacket {
        host_no,
        sgl_off: dcmd::SGL as u32,
        sge_count: sge_count.into(),
        sense_off: 0,
        sense_len: 0,
        frame: DcmdFrame {
            cmd: CommandKind::Dcmd,
            status: Status::Invalid,
            sge_count,
            context: 0,
            flags: direction.flags(),
            timeout: 0,
            data_xfer_len: transfer_len,
            opcode: opcode.code(),
            mailbox,
            sgl: SgEntry {
                phys_addr: sgl[0].base,
                length: transfer_len,
            },
        },
        sgl,
    };
    debug!(
        opcode = format_args!("{:#010x}", opcode.code()),
        host_no,
        transfer_len,
        sgl_off = packet.sgl_off,
        "built dcmd request"
    );
    let packet = packet.to_bytes();
    trace!(?packet, "serialized ioctl packet");

    Ok(Request {
        opcode,
        packet,
        buffer,
    })
}

/// Reinterprets a raw response buffer as `T`, field by field, little endian.
///
/// Only the layout is checked. Counts and states are left to `T`'s accessors.
pub fn decode_response<T: Decode>(raw: &[u8]) -> Result<T> {
    T::decode(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_for(buffer: &mut [u8], mailbox: Mailbox) -> IocPacket {
        let request =
            build_request(3, Opcode::PdGetInfo, mailbox, Direction::Read, buffer).unwrap();
        IocPacket::decode(request.packet()).unwrap()
    }

    #[test]
    fn layout_constants() {
        assert_eq!(dcmd::SGL, 40);
        assert_eq!(dcmd::SIZE, 52);
        assert_eq!(ioc::FRAME, 20);
        assert_eq!(ioc::SGL, 148);
        assert_eq!(IOC_PACKET_SIZE, 404);
    }

    #[test]
    fn declared_sgl_offset_matches_serialized_offset() {
        let mut buf = vec![0_u8; 512];
        let request = build_request(0, Opcode::PdGetInfo, Mailbox::Empty, Direction::Read, &mut buf)
            .unwrap();
        let bytes = request.packet();
        let sgl_off = u32::from_le_bytes(bytes[4..8].try_into().unwrap()) as usize;
        assert_eq!(sgl_off, dcmd::SGL);
        // The frame's sge64 length sits right after its 8 byte address.
        let at = ioc::FRAME + sgl_off + 8;
        assert_eq!(u32::from_le_bytes(bytes[at..at + 4].try_into().unwrap()), 512);
    }

    #[test]
    fn request_header_fields() {
        let mut buf = vec![0_u8; 512];
        let address = buf.as_ptr() as u64;
        let packet = request_for(&mut buf, Mailbox::device_id(0, 10));

        assert_eq!(packet.host_no, 3);
        assert_eq!(packet.sge_count, 1);
        assert_eq!(packet.sgl[0], Iovec { base: address, len: 512 });
        assert!(packet.sgl[1..].iter().all(|iov| *iov == Iovec::default()));

        let frame = packet.frame;
        assert_eq!(frame.cmd, CommandKind::Dcmd);
        assert_eq!(frame.status, Status::Invalid);
        assert_eq!(frame.direction(), Direction::Read);
        assert_eq!(frame.flags, 0x0010);
        assert_eq!(frame.data_xfer_len, 512);
        assert_eq!(frame.opcode, 0x0202_0000);
        assert_eq!(frame.sge_count, 1);
        assert_eq!(frame.timeout, 0);
    }

    #[test]
    fn mailbox_is_written_in_place() {
        let mut buf = vec![0_u8; 8];
        let request = build_request(
            0,
            Opcode::LdListQuery,
            Mailbox::sub_command(1),
            Direction::Read,
            &mut buf,
        )
        .unwrap();
        let mbox = &request.packet()[ioc::FRAME + dcmd::MBOX..ioc::FRAME + dcmd::SGL];
        assert_eq!(mbox, &[1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

        let mut buf = vec![0_u8; 8];
        let packet = request_for(&mut buf, Mailbox::device_id(1, 2));
        let Mailbox::Bytes(raw) = packet.frame.mailbox else {
            panic!("decoded mailboxes are raw bytes");
        };
        assert_eq!(Mailbox::words_of(&raw)[0], 130);
    }

    #[test]
    fn empty_buffer_sends_no_sge() {
        let mut buf: [u8; 0] = [];
        let packet = request_for(&mut buf, Mailbox::Empty);
        assert_eq!(packet.sge_count, 0);
        assert_eq!(packet.frame.sge_count, 0);
        assert_eq!(packet.sgl[0], Iovec::default());
    }

    #[test]
    fn packet_serialization_is_symmetric() {
        let mut buf = vec![0_u8; 64];
        let request = build_request(
            7,
            Opcode::CtrlGetInfo,
            Mailbox::Dwords([1, 2, 3]),
            Direction::Both,
            &mut buf,
        )
        .unwrap();
        let decoded: IocPacket = decode_response(request.packet()).unwrap();
        assert_eq!(&decoded.to_bytes(), request.packet());
    }

    #[test]
    fn completion_status_reads_back_from_packet() {
        let mut buf = vec![0_u8; 4];
        let mut request =
            build_request(0, Opcode::CtrlGetInfo, Mailbox::Empty, Direction::Read, &mut buf)
                .unwrap();
        assert_eq!(request.completion_status(), Status::Invalid);
        request.packet_mut()[ioc::FRAME + dcmd::CMD_STATUS] = 0x0c;
        assert_eq!(request.completion_status(), Status::DeviceNotFound);
    }

    #[test]
    fn direction_flags() {
        let table = [
            (Direction::None, 0x0000),
            (Direction::Write, 0x0008),
            (Direction::Read, 0x0010),
            (Direction::Both, 0x0018),
        ];
        for (direction, flags) in table {
            assert_eq!(direction.flags(), flags);
            assert_eq!(Direction::from_flags(flags), direction);
        }
        // bits outside the direction mask are ignored
        assert_eq!(Direction::from_flags(0x0012), Direction::Read);
        assert_eq!(Direction::from_flags(0x0001), Direction::None);
    }

    #[test]
    fn write_request_sets_write_flag() {
        let mut buf = vec![0_u8; 16];
        let request =
            build_request(0, Opcode::CtrlGetInfo, Mailbox::Empty, Direction::Write, &mut buf)
                .unwrap();
        let frame = IocPacket::decode(request.packet()).unwrap().frame;
        assert_eq!(frame.flags, 0x0008);
        assert_eq!(frame.direction(), Direction::Write);
    }

    #[test]
    fn unknown_command_byte_survives_re_encoding() {
        let mut buf = vec![0_u8; 16];
        let mut request =
            build_request(0, Opcode::CtrlGetInfo, Mailbox::Empty, Direction::Read, &mut buf)
                .unwrap();
        request.packet_mut()[ioc::FRAME + dcmd::CMD] = 0x0b;
        let decoded = IocPacket::decode(request.packet()).unwrap();
        assert_eq!(decoded.frame.cmd, CommandKind::Reserved(0x0b));
        assert_eq!(decoded.frame.mailbox, Mailbox::Empty);
        assert_eq!(&decoded.to_bytes(), request.packet());
    }

    #[test]
    fn short_packet_is_rejected() {
        let e = IocPacket::decode(&[0_u8; 100]).expect_err("100 bytes is not a packet");
        assert!(e.to_string().contains("megasas_iocpacket needs 404 bytes"));
    }
}
