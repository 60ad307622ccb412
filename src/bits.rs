//! Bit-level helpers for firmware structures.
//!
//! The MFI firmware packs many flags into a single containing integer
//! (C bit-fields such as `u32 NCQ:1;`) and splits 64-bit quantities into
//! two 32-bit halves. Rather than mirroring the C layout, accessors on the
//! decoded structures pull values out with [`bit_field`] and
//! [`assemble`].

mod sealed {
    pub trait Sealed {}
}

/// An unsigned integer that a bit-field may be extracted from.
pub trait Word: Copy + PartialEq + sealed::Sealed {
    /// Width of the integer in bits.
    const BITS: u32;
    const ZERO: Self;

    fn to_u64(self) -> u64;

    /// Keeps the low [`Word::BITS`] bits of `value`.
    fn truncate_from(value: u64) -> Self;
}

macro_rules! impl_word {
    ($($ty:ty),*) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Word for $ty {
                const BITS: u32 = <$ty>::BITS;
                const ZERO: Self = 0;

                fn to_u64(self) -> u64 {
                    self as u64
                }

                fn truncate_from(value: u64) -> Self {
                    value as $ty
                }
            }
        )*
    };
}

impl_word!(u8, u16, u32, u64);

/// Returns the `width`-bit field starting at bit `offset` of `data`,
/// right aligned.
///
/// Bits past the top of `T` read as zero, so a field that runs off the end
/// of the containing integer is truncated instead of panicking.
pub fn bit_field<T: Word>(data: T, offset: u32, width: u32) -> T {
    if width == 0 || offset >= T::BITS {
        return T::ZERO;
    }
    let mask = if width >= u64::BITS {
        u64::MAX
    } else {
        (1_u64 << width) - 1
    };
    T::truncate_from((data.to_u64() >> offset) & mask)
}

/// Returns whether the single bit at `offset` is set.
pub fn bit<T: Word>(data: T, offset: u32) -> bool {
    bit_field(data, offset, 1) != T::ZERO
}

/// Combines `words` into one integer, placing word `i` at bit `i * shift`.
///
/// Zero words are skipped: the firmware writes zero into a half it has no
/// value for, and only populated halves contribute. Words are OR-ed in, and
/// any bits pushed past bit 63 are dropped.
///
/// This is the composition used for 64-bit SAS addresses and sector counts
/// stored as two little-endian `u32` halves (`shift = 32`). It assumes the
/// words form a single value; do not use it for independent sub-fields.
pub fn assemble<T: Word>(words: &[T], shift: u32) -> u64 {
    words
        .iter()
        .enumerate()
        .filter(|(_, word)| **word != T::ZERO)
        .fold(0, |acc, (index, word)| {
            let position = (index as u32).saturating_mul(shift);
            acc | word.to_u64().checked_shl(position).unwrap_or(0)
        })
}

#[cfg(test)]
mod tests {
    use super::{assemble, bit, bit_field};

    #[test]
    fn field_matches_shift_and_mask() {
        let samples: [u32; 5] = [0, 1, 0xdead_beef, 0x8000_0001, u32::MAX];
        for value in samples {
            for offset in 0..32 {
                for width in 1..(32 - offset) {
                    let expected = (value >> offset) & ((1_u32 << width) - 1);
                    assert_eq!(bit_field(value, offset, width), expected);
                }
            }
        }
    }

    #[test]
    fn zero_width_is_zero() {
        assert_eq!(bit_field(0xff_u8, 3, 0), 0);
        assert_eq!(bit_field(u64::MAX, 0, 0), 0);
    }

    #[test]
    fn full_width_fields() {
        assert_eq!(bit_field(0xab_u8, 0, 8), 0xab);
        assert_eq!(bit_field(u64::MAX, 0, 64), u64::MAX);
        assert_eq!(bit_field(0x1234_u16, 4, 16), 0x123);
    }

    #[test]
    fn offset_past_width_reads_zero() {
        assert_eq!(bit_field(0xff_u8, 8, 4), 0);
        assert_eq!(bit_field(0xffff_u16, 40, 4), 0);
    }

    #[test]
    fn single_bits() {
        // enableJBOD is bit 13 of the controller on/off properties
        let on_off: u32 = 1 << 13;
        assert!(bit(on_off, 13));
        assert!(!bit(on_off, 12));
    }

    #[test]
    fn assemble_two_halves() {
        assert_eq!(assemble(&[0x1234_5678_u32, 0], 32), 0x1234_5678);
        assert_eq!(assemble(&[0_u32, 0x9abc_def0], 32), 0x9abc_def0_u64 << 32);
        assert_eq!(assemble(&[0_u32, 0], 32), 0);
        assert_eq!(
            assemble(&[0x5000_0001_u32, 0x5000_c500], 32),
            0x5000_c500_5000_0001
        );
    }

    #[test]
    fn assemble_drops_overflowing_words() {
        assert_eq!(assemble(&[1_u32, 0, 7], 32), 1);
        assert_eq!(assemble::<u8>(&[], 8), 0);
        assert_eq!(assemble(&[0x01_u8, 0x02, 0x03], 8), 0x03_02_01);
    }
}
