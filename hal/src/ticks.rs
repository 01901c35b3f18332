//! Tick counter arithmetic
//!
//! Hardware counters come in many widths, and the register that stores a
//! counter is often wider than the counter itself (a 24-bit down-counter
//! read through a 32-bit register, for instance). [`TickValue`] describes the
//! storage type and [`CounterWidth`] the number of bits that actually count,
//! so that all wrap-around arithmetic is done modulo the real hardware width.

use core::fmt;
use core::ops::{BitAnd, Shr};

/// Unsigned integer type used to store a tick count.
pub trait TickValue:
    Copy
    + Eq
    + Ord
    + Default
    + fmt::Debug
    + fmt::Display
    + Send
    + Sync
    + 'static
    + BitAnd<Output = Self>
    + Shr<u32, Output = Self>
{
    /// Number of bits in the storage type.
    const BITS: u32;
    /// Zero ticks.
    const ZERO: Self;
    /// A single tick.
    const ONE: Self;
    /// Largest value of the storage type.
    const MAX: Self;

    fn wrapping_add(self, rhs: Self) -> Self;

    fn wrapping_sub(self, rhs: Self) -> Self;

    /// Widens the value for unit conversions.
    fn to_u64(self) -> u64;
}

macro_rules! impl_tick_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TickValue for $ty {
                const BITS: u32 = <$ty>::BITS;
                const ZERO: Self = 0;
                const ONE: Self = 1;
                const MAX: Self = <$ty>::MAX;

                #[inline]
                fn wrapping_add(self, rhs: Self) -> Self {
                    <$ty>::wrapping_add(self, rhs)
                }

                #[inline]
                fn wrapping_sub(self, rhs: Self) -> Self {
                    <$ty>::wrapping_sub(self, rhs)
                }

                #[inline]
                fn to_u64(self) -> u64 {
                    self as u64
                }
            }
        )*
    };
}

impl_tick_value!(u8, u16, u32, u64);

/// Number of significant bits of a hardware counter.
///
/// All arithmetic is performed modulo `2^bits`, regardless of how wide the
/// storage type `T` is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterWidth<T> {
    bits: u32,
    mask: T,
}

impl<T: TickValue> CounterWidth<T> {
    /// Creates a width of `bits` significant bits.
    ///
    /// Returns `None` unless `1 <= bits <= T::BITS`.
    pub fn new(bits: u32) -> Option<Self> {
        if bits == 0 || bits > T::BITS {
            return None;
        }
        Some(Self {
            bits,
            mask: T::MAX >> (T::BITS - bits),
        })
    }

    /// Width covering the whole storage type.
    pub fn full() -> Self {
        Self {
            bits: T::BITS,
            mask: T::MAX,
        }
    }

    /// Number of significant bits.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Largest representable tick value, reached just before wrapping to zero.
    pub fn period(&self) -> T {
        self.mask
    }

    /// Discards bits above the counter width.
    #[inline]
    pub fn truncate(&self, value: T) -> T {
        value & self.mask
    }

    /// Moves `value` forward by `by` ticks, wrapping at the counter width.
    #[inline]
    pub fn advance(&self, value: T, by: T) -> T {
        value.wrapping_add(by) & self.mask
    }

    /// Forward distance from `reference` to `current`, modulo `2^bits`.
    ///
    /// Correct across a wrap-around between the two readings, and zero when
    /// both are equal.
    #[inline]
    pub fn elapsed(&self, current: T, reference: T) -> T {
        current.wrapping_sub(reference) & self.mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_and_oversized_widths() {
        assert!(CounterWidth::<u16>::new(0).is_none());
        assert!(CounterWidth::<u16>::new(17).is_none());
        assert!(CounterWidth::<u16>::new(16).is_some());
        assert!(CounterWidth::<u8>::new(1).is_some());
    }

    #[test]
    fn full_width_matches_storage() {
        let width = CounterWidth::<u32>::full();
        assert_eq!(width.bits(), 32);
        assert_eq!(width.period(), u32::MAX);
        assert_eq!(CounterWidth::<u32>::new(32), Some(width));
    }

    #[test]
    fn elapsed_across_16_bit_wrap() {
        let width = CounterWidth::<u16>::full();
        let reference = 65530u16;
        let current = width.advance(reference, 10);
        assert_eq!(current, 4);
        assert_eq!(width.elapsed(current, reference), 10);
    }

    #[test]
    fn elapsed_across_32_bit_wrap() {
        let width = CounterWidth::<u32>::full();
        assert_eq!(width.elapsed(5, u32::MAX - 4), 10);
    }

    #[test]
    fn elapsed_across_24_bit_wrap_in_u32_storage() {
        let width = CounterWidth::<u32>::new(24).unwrap();
        assert_eq!(width.period(), 0x00FF_FFFF);

        let reference = 0x00FF_FFF0;
        let current = width.advance(reference, 0x20);
        assert_eq!(current, 0x10);
        assert_eq!(width.elapsed(current, reference), 0x20);
    }

    #[test]
    fn elapsed_of_equal_ticks_is_zero() {
        let narrow = CounterWidth::<u16>::new(12).unwrap();
        for t in [0u16, 1, 0x7FF, 0xFFF] {
            assert_eq!(narrow.elapsed(t, t), 0);
        }
        let wide = CounterWidth::<u64>::full();
        assert_eq!(wide.elapsed(u64::MAX, u64::MAX), 0);
    }

    #[test]
    fn elapsed_is_modular_difference_for_all_8_bit_pairs() {
        let width = CounterWidth::<u8>::full();
        for reference in 0..=u8::MAX {
            for current in 0..=u8::MAX {
                let expected = ((current as u16 + 256 - reference as u16) % 256) as u8;
                assert_eq!(width.elapsed(current, reference), expected);
            }
        }
    }

    #[test]
    fn elapsed_is_modular_difference_for_all_narrow_pairs() {
        let width = CounterWidth::<u8>::new(5).unwrap();
        for reference in 0..32u8 {
            for current in 0..32u8 {
                let expected = (current + 32 - reference) % 32;
                assert_eq!(width.elapsed(current, reference), expected);
            }
        }
    }

    #[test]
    fn truncate_drops_high_bits() {
        let width = CounterWidth::<u32>::new(24).unwrap();
        assert_eq!(width.truncate(0xAB12_3456), 0x0012_3456);
    }
}
