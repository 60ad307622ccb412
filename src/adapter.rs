//! Typed queries against one adapter.
//!
//! Each query allocates a response buffer sized for its structure, builds a
//! single DCMD, runs one blocking exchange over the [`Channel`] and decodes
//! the buffer. Nothing is cached between queries.

use tracing::{debug, warn};

use crate::error::{MfiError, Result};
use crate::ioctl::Channel;
use crate::mfi::frame::{Direction, build_request, decode_response};
use crate::mfi::mailbox::Mailbox;
use crate::mfi::opcode::{LdQueryType, Opcode, PdQueryType};
use crate::mfi::response::ctrl::CtrlInfo;
use crate::mfi::response::host_device::HostDeviceList;
use crate::mfi::response::ld::{LdList, LdTargetIdList};
use crate::mfi::response::pd::{PdInfo, PdList};
use crate::mfi::status::Status;
use crate::wire::Decode;

/// A megaraid_sas SCSI host reached through `channel`.
pub struct Adapter<C> {
    channel: C,
    host_no: u16,
}

impl<C: Channel> Adapter<C> {
    pub fn new(channel: C, host_no: u16) -> Self {
        Self { channel, host_no }
    }

    pub fn host_no(&self) -> u16 {
        self.host_no
    }

    pub fn into_channel(self) -> C {
        self.channel
    }

    /// Physical devices matching `query`. [`PdQueryType::All`] includes
    /// enclosures.
    pub fn pd_list(&mut self, query: PdQueryType) -> Result<PdList> {
        self.query(Opcode::PdListQuery, Mailbox::sub_command(query as u8))
    }

    /// Details of the drive at `channel * 128 + device`.
    ///
    /// Device ids reported by [`Adapter::pd_list`] are already flat, so they
    /// are queried with channel 0.
    pub fn pd_info(&mut self, channel: u16, device: u16) -> Result<PdInfo> {
        self.query(Opcode::PdGetInfo, Mailbox::device_id(channel, device))
    }

    pub fn ld_list(&mut self) -> Result<LdList> {
        self.query(Opcode::LdGetList, Mailbox::Empty)
    }

    /// Target ids of the logical drives matching `query`.
    pub fn ld_targets(&mut self, query: LdQueryType) -> Result<LdTargetIdList> {
        self.query(Opcode::LdListQuery, Mailbox::sub_command(query as u8))
    }

    pub fn ctrl_info(&mut self) -> Result<CtrlInfo> {
        self.query(Opcode::CtrlGetInfo, Mailbox::sub_command(1))
    }

    /// Devices exposed to the host. `is_probe` is set while the driver is
    /// still scanning the bus, which selects the full list.
    pub fn host_devices(&mut self, is_probe: bool) -> Result<HostDeviceList> {
        let selector = if is_probe { 0 } else { 1 };
        self.query(Opcode::CtrlDeviceListGet, Mailbox::sub_command(selector))
    }

    #[tracing::instrument(skip(self, mailbox), fields(host_no = self.host_no))]
    fn query<T: Decode>(&mut self, opcode: Opcode, mailbox: Mailbox) -> Result<T> {
        let mut buffer = vec![0_u8; T::SIZE];
        let mut request =
            build_request(self.host_no, opcode, mailbox, Direction::Read, &mut buffer)?;
        self.channel.exchange(&mut request)?;
        check_status(opcode, request.completion_status())?;
        debug!(structure = T::NAME, "decoding response");
        decode_response(&buffer)
    }
}

fn check_status(opcode: Opcode, status: Status) -> Result<()> {
    match status {
        Status::Ok => Ok(()),
        // Older drivers do not copy the status back.
        Status::Invalid => {
            warn!(?opcode, "completion status was left unset");
            Ok(())
        }
        status => Err(MfiError::Firmware {
            opcode: opcode.code(),
            status,
        }),
    }
}
