//! Command kinds and completion codes carried in the MFI frame header.

use std::fmt;

/// `cmd` byte of the frame header.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CommandKind {
    Init,
    LdRead,
    LdWrite,
    LdScsiIo,
    PdScsiIo,
    /// Direct command: an opcode plus mailbox, used for all management queries.
    Dcmd,
    Abort,
    Smp,
    Stp,
    Nvme,
    Toolbox,
    Invalid,
    /// A byte with no `MFI_CMD_*` name, kept so frames re-encode unchanged.
    Reserved(u8),
}

/// `MFI_CMD_*` codes 0x00..=0x0a in firmware order.
const COMMAND_KINDS: [CommandKind; 0x0b] = [
    CommandKind::Init,
    CommandKind::LdRead,
    CommandKind::LdWrite,
    CommandKind::LdScsiIo,
    CommandKind::PdScsiIo,
    CommandKind::Dcmd,
    CommandKind::Abort,
    CommandKind::Smp,
    CommandKind::Stp,
    CommandKind::Nvme,
    CommandKind::Toolbox,
];

const INVALID_CMD: u8 = 0xff;

impl From<u8> for CommandKind {
    fn from(value: u8) -> Self {
        match value {
            INVALID_CMD => CommandKind::Invalid,
            v => COMMAND_KINDS
                .get(v as usize)
                .copied()
                .unwrap_or(CommandKind::Reserved(v)),
        }
    }
}

impl From<CommandKind> for u8 {
    fn from(kind: CommandKind) -> u8 {
        match kind {
            CommandKind::Invalid => INVALID_CMD,
            CommandKind::Reserved(v) => v,
            k => COMMAND_KINDS
                .iter()
                .position(|&known| known == k)
                .map_or(INVALID_CMD, |i| i as u8),
        }
    }
}

/// `cmd_status` byte of the frame header.
///
/// Requests are sent with [`Status::Invalid`]; the firmware overwrites it on
/// completion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Ok,
    InvalidCmd,
    InvalidDcmd,
    InvalidParameter,
    InvalidSequenceNumber,
    AbortNotPossible,
    AppHostCodeNotFound,
    AppInUse,
    AppNotInitialized,
    ArrayIndexInvalid,
    ArrayRowNotEmpty,
    ConfigResourceConflict,
    DeviceNotFound,
    DriveTooSmall,
    FlashAllocFail,
    FlashBusy,
    FlashError,
    FlashImageBad,
    FlashImageIncomplete,
    FlashNotOpen,
    FlashNotStarted,
    FlushFailed,
    HostCodeNotFound,
    LdCcInProgress,
    LdInitInProgress,
    LdLbaOutOfRange,
    LdMaxConfigured,
    LdNotOptimal,
    LdRbldInProgress,
    LdReconInProgress,
    LdWrongRaidLevel,
    MaxSparesExceeded,
    MemoryNotAvailable,
    MfcHwError,
    NoHwPresent,
    NotFound,
    NotInEncl,
    PdClearInProgress,
    PdTypeWrong,
    PrDisabled,
    RowIndexInvalid,
    SasConfigInvalidAction,
    SasConfigInvalidData,
    SasConfigInvalidPage,
    SasConfigInvalidType,
    ScsiDoneWithError,
    ScsiIoFailed,
    ScsiReservationConflict,
    ShutdownFailed,
    TimeNotSet,
    WrongState,
    LdOffline,
    PeerNotificationRejected,
    PeerNotificationFailed,
    ReservationInProgress,
    I2cErrorsDetected,
    PciErrorsDetected,
    ConfigSeqMismatch,
    /// Sentinel written by the host before submission.
    Invalid,
    Reserved(u8),
}

/// Codes 0x00..=0x38 in firmware order.
const SEQUENTIAL: [Status; 0x39] = [
    Status::Ok,
    Status::InvalidCmd,
    Status::InvalidDcmd,
    Status::InvalidParameter,
    Status::InvalidSequenceNumber,
    Status::AbortNotPossible,
    Status::AppHostCodeNotFound,
    Status::AppInUse,
    Status::AppNotInitialized,
    Status::ArrayIndexInvalid,
    Status::ArrayRowNotEmpty,
    Status::ConfigResourceConflict,
    Status::DeviceNotFound,
    Status::DriveTooSmall,
    Status::FlashAllocFail,
    Status::FlashBusy,
    Status::FlashError,
    Status::FlashImageBad,
    Status::FlashImageIncomplete,
    Status::FlashNotOpen,
    Status::FlashNotStarted,
    Status::FlushFailed,
    Status::HostCodeNotFound,
    Status::LdCcInProgress,
    Status::LdInitInProgress,
    Status::LdLbaOutOfRange,
    Status::LdMaxConfigured,
    Status::LdNotOptimal,
    Status::LdRbldInProgress,
    Status::LdReconInProgress,
    Status::LdWrongRaidLevel,
    Status::MaxSparesExceeded,
    Status::MemoryNotAvailable,
    Status::MfcHwError,
    Status::NoHwPresent,
    Status::NotFound,
    Status::NotInEncl,
    Status::PdClearInProgress,
    Status::PdTypeWrong,
    Status::PrDisabled,
    Status::RowIndexInvalid,
    Status::SasConfigInvalidAction,
    Status::SasConfigInvalidData,
    Status::SasConfigInvalidPage,
    Status::SasConfigInvalidType,
    Status::ScsiDoneWithError,
    Status::ScsiIoFailed,
    Status::ScsiReservationConflict,
    Status::ShutdownFailed,
    Status::TimeNotSet,
    Status::WrongState,
    Status::LdOffline,
    Status::PeerNotificationRejected,
    Status::PeerNotificationFailed,
    Status::ReservationInProgress,
    Status::I2cErrorsDetected,
    Status::PciErrorsDetected,
];

const CONFIG_SEQ_MISMATCH: u8 = 0x67;
const INVALID_STATUS: u8 = 0xff;

impl From<u8> for Status {
    fn from(value: u8) -> Self {
        match value {
            CONFIG_SEQ_MISMATCH => Status::ConfigSeqMismatch,
            INVALID_STATUS => Status::Invalid,
            v => SEQUENTIAL
                .get(v as usize)
                .copied()
                .unwrap_or(Status::Reserved(v)),
        }
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> u8 {
        match status {
            Status::ConfigSeqMismatch => CONFIG_SEQ_MISMATCH,
            Status::Invalid => INVALID_STATUS,
            Status::Reserved(v) => v,
            s => SEQUENTIAL
                .iter()
                .position(|&known| known == s)
                .map_or(INVALID_STATUS, |i| i as u8),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({:#04x})", self, u8::from(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::{CommandKind, Status};

    #[test]
    fn status_codes_match_firmware_numbering() {
        assert_eq!(Status::from(0x00), Status::Ok);
        assert_eq!(Status::from(0x0c), Status::DeviceNotFound);
        assert_eq!(Status::from(0x2d), Status::ScsiDoneWithError);
        assert_eq!(Status::from(0x38), Status::PciErrorsDetected);
        assert_eq!(Status::from(0x67), Status::ConfigSeqMismatch);
        assert_eq!(Status::from(0xff), Status::Invalid);
        assert_eq!(Status::from(0x50), Status::Reserved(0x50));
    }

    #[test]
    fn status_round_trips_through_u8() {
        for code in 0..=u8::MAX {
            assert_eq!(u8::from(Status::from(code)), code);
        }
    }

    #[test]
    fn dcmd_kind() {
        assert_eq!(u8::from(CommandKind::Dcmd), 5);
        assert_eq!(CommandKind::from(5), CommandKind::Dcmd);
        assert_eq!(CommandKind::from(0x0a), CommandKind::Toolbox);
        assert_eq!(CommandKind::from(0xff), CommandKind::Invalid);
        assert_eq!(CommandKind::from(0x42), CommandKind::Reserved(0x42));
    }

    #[test]
    fn command_kind_round_trips_through_u8() {
        for code in 0..=u8::MAX {
            assert_eq!(u8::from(CommandKind::from(code)), code);
        }
    }
}
