//! Drive capacity helpers. The firmware reports sizes in 512 byte sectors.

pub const SECTOR_SIZE: u64 = 512;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Unit {
    B,
    KB,
    MB,
    GB,
    TB,
}

impl Unit {
    pub fn divisor(self) -> u64 {
        match self {
            Unit::B => 1,
            Unit::KB => 1 << 10,
            Unit::MB => 1 << 20,
            Unit::GB => 1 << 30,
            Unit::TB => 1 << 40,
        }
    }
}

/// Whole `unit`s held by `sectors`, rounded down.
pub fn size_in(sectors: u64, unit: Unit) -> u64 {
    sectors.saturating_mul(SECTOR_SIZE) / unit.divisor()
}

/// Formats `sectors` in the largest unit that holds at least one whole unit,
/// with two decimals. Anything below a megabyte is shown in kB.
pub fn size_string(sectors: u64) -> String {
    let bytes = sectors as f64 * SECTOR_SIZE as f64;
    let (value, label) = [(Unit::TB, "TB"), (Unit::GB, "GB"), (Unit::MB, "MB")]
        .into_iter()
        .map(|(unit, label)| (bytes / unit.divisor() as f64, label))
        .find(|(value, _)| *value >= 1.0)
        .unwrap_or((bytes / Unit::KB.divisor() as f64, "kB"));
    format!("{:.2} {label}", (value * 100.0).round() / 100.0)
}
