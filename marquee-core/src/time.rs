//! Wraparound-safe millisecond timestamps
//!
//! The host supplies one free-running 32-bit millisecond counter (the
//! keyboard timer). It rolls over roughly every 49.7 days, so every
//! comparison is done on the wrapping difference interpreted as a signed
//! value of the same width. Deadlines up to ~24.8 days apart compare
//! correctly across the rollover.

/// A reading of the host's millisecond counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp(u32);

impl Timestamp {
    /// Counter value zero
    pub const ZERO: Self = Self(0);

    /// Wrap a raw counter reading
    pub const fn from_millis(ms: u32) -> Self {
        Self(ms)
    }

    /// Raw counter reading
    pub const fn as_millis(self) -> u32 {
        self.0
    }

    /// Timestamp `ms` milliseconds later, wrapping at the counter width
    pub const fn add_millis(self, ms: u32) -> Self {
        Self(self.0.wrapping_add(ms))
    }

    /// Signed distance from `earlier` to `self`
    ///
    /// Negative when `self` lies before `earlier`.
    pub const fn signed_since(self, earlier: Self) -> i32 {
        self.0.wrapping_sub(earlier.0) as i32
    }

    /// Milliseconds elapsed since `earlier`, saturating at zero if
    /// `earlier` is actually in the future
    pub const fn millis_since(self, earlier: Self) -> u32 {
        let delta = self.signed_since(earlier);
        if delta < 0 {
            0
        } else {
            delta as u32
        }
    }

    /// True once `self` has reached or passed `deadline`
    pub const fn has_reached(self, deadline: Self) -> bool {
        self.signed_since(deadline) >= 0
    }
}

impl From<u32> for Timestamp {
    fn from(ms: u32) -> Self {
        Self(ms)
    }
}

/// Source of the current time
///
/// Implementations must be monotonically non-decreasing modulo wraparound.
pub trait Clock {
    /// Read the counter
    fn now(&self) -> Timestamp;
}

impl<F> Clock for F
where
    F: Fn() -> u32,
{
    fn now(&self) -> Timestamp {
        Timestamp(self())
    }
}
