//! Logical drive responses: `MR_DCMD_LD_GET_LIST` and `MR_DCMD_LD_LIST_QUERY`.

use std::fmt;

use crate::error::{MfiError, Result};
use crate::mfi::opcode::MAX_LOGICAL_DRIVES_EXT;
use crate::mfi::response::pd::read_entries;
use crate::size::size_string;
use crate::wire::{Decode, LeReader};

/// `MR_LD_STATE`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LdState {
    Offline,
    PartiallyDegraded,
    Degraded,
    Optimal,
    Unknown(u8),
}

impl From<u8> for LdState {
    fn from(value: u8) -> Self {
        match value {
            0 => LdState::Offline,
            1 => LdState::PartiallyDegraded,
            2 => LdState::Degraded,
            3 => LdState::Optimal,
            other => LdState::Unknown(other),
        }
    }
}

impl fmt::Display for LdState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LdState::Offline => "Offline",
            LdState::PartiallyDegraded => "Partially Degraded",
            LdState::Degraded => "Degraded",
            LdState::Optimal => "Optimal",
            LdState::Unknown(_) => "Unknown",
        };
        f.write_str(s)
    }
}

/// One entry of `struct MR_LD_LIST`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LdInfo {
    pub target_id: u8,
    pub seq_num: u16,
    pub state: u8,
    /// Size in sectors.
    pub size: u64,
}

impl LdInfo {
    pub fn state(&self) -> LdState {
        LdState::from(self.state)
    }

    pub fn size_string(&self) -> String {
        size_string(self.size)
    }
}

impl Decode for LdInfo {
    const NAME: &'static str = "MR_LD_LIST entry";
    const SIZE: usize = 16;

    fn read(r: LeReader<'_>) -> Result<Self> {
        Ok(Self {
            target_id: r.u8(0),
            seq_num: r.u16(2),
            state: r.u8(4),
            size: r.u64(8),
        })
    }
}

/// `struct MR_LD_LIST`: a count followed by a fixed table of 256 entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LdList {
    pub drives: Vec<LdInfo>,
}

const LD_LIST_HEADER: usize = 8;

impl Decode for LdList {
    const NAME: &'static str = "MR_LD_LIST";
    const SIZE: usize = LD_LIST_HEADER + MAX_LOGICAL_DRIVES_EXT * LdInfo::SIZE;

    fn read(r: LeReader<'_>) -> Result<Self> {
        let count = r.u32(0);
        Ok(Self {
            drives: read_entries(Self::NAME, r, LD_LIST_HEADER, count, MAX_LOGICAL_DRIVES_EXT)?,
        })
    }
}

/// `struct MR_LD_TARGETID_LIST`, the target ids selected by an
/// [`crate::mfi::opcode::LdQueryType`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LdTargetIdList {
    pub size: u32,
    pub target_ids: Vec<u8>,
}

const TARGET_ID_OFFSET: usize = 11;

impl Decode for LdTargetIdList {
    const NAME: &'static str = "MR_LD_TARGETID_LIST";
    const SIZE: usize = TARGET_ID_OFFSET + MAX_LOGICAL_DRIVES_EXT;

    fn read(r: LeReader<'_>) -> Result<Self> {
        let count = r.u32(4);
        if count as usize > MAX_LOGICAL_DRIVES_EXT {
            return Err(MfiError::InvalidCount {
                structure: Self::NAME,
                count,
                capacity: MAX_LOGICAL_DRIVES_EXT,
            });
        }
        Ok(Self {
            size: r.u32(0),
            target_ids: r.bytes(TARGET_ID_OFFSET, count as usize).to_vec(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::wire::LeWriter;

    /// Two LDs: target 0 optimal 1 TB, target 1 degraded 10 MB.
    pub(crate) fn sample_ld_list() -> Vec<u8> {
        let mut buf = vec![0_u8; LdList::SIZE];
        let mut w = LeWriter::new(&mut buf);
        w.u32(0, 2);
        w.u8(8, 0);
        w.u16(10, 5);
        w.u8(12, 3);
        w.u64(16, 2_147_483_648);
        w.u8(24, 1);
        w.u8(28, 2);
        w.u64(32, 20_480);
        buf
    }

    #[test]
    fn layout_sizes() {
        assert_eq!(LdList::SIZE, 4104);
        assert_eq!(LdTargetIdList::SIZE, 267);
    }

    #[test]
    fn decodes_ld_list() {
        let list = LdList::decode(&sample_ld_list()).unwrap();
        assert_eq!(list.drives.len(), 2);
        assert_eq!(list.drives[0].target_id, 0);
        assert_eq!(list.drives[0].seq_num, 5);
        assert_eq!(list.drives[0].state(), LdState::Optimal);
        assert_eq!(list.drives[0].size_string(), "1.00 TB");
        assert_eq!(list.drives[1].target_id, 1);
        assert_eq!(list.drives[1].state().to_string(), "Degraded");
        assert_eq!(list.drives[1].size_string(), "10.00 MB");
    }

    #[test]
    fn zero_count_is_empty() {
        let list = LdList::decode(&vec![0_u8; LdList::SIZE]).unwrap();
        assert!(list.drives.is_empty());
    }

    #[test]
    fn decodes_target_ids() {
        let mut buf = vec![0_u8; LdTargetIdList::SIZE];
        let mut w = LeWriter::new(&mut buf);
        w.u32(0, 14);
        w.u32(4, 3);
        w.bytes(11, &[0, 1, 4, 9]);
        let list = LdTargetIdList::decode(&buf).unwrap();
        assert_eq!(list.target_ids, vec![0, 1, 4]);
    }

    #[test]
    fn target_id_count_overflow() {
        let mut buf = vec![0_u8; LdTargetIdList::SIZE];
        LeWriter::new(&mut buf).u32(4, 257);
        let e = LdTargetIdList::decode(&buf).expect_err("257 ids do not fit");
        assert!(e.to_string().contains("reports 257 entries"));
    }
}
