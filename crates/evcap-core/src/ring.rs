//! Cyclic hour index.
//!
//! The planning year is closed into a ring: hour 0 follows the last hour, so
//! SOC dynamics need no fixed initial condition. All predecessor lookups go
//! through [`HourRing::prev`] instead of special-casing the first hour.

use serde::{Deserialize, Serialize};

use crate::{EvcapError, EvcapResult};

/// Hours in a non-leap planning year.
pub const HOURS_PER_YEAR: usize = 8760;

/// Fixed-size ring of hour indices `0..len`.
///
/// Serialized as its length; deserializing goes through [`HourRing::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct HourRing {
    len: usize,
}

impl HourRing {
    /// Create a ring of `len` hours. A zero-length horizon is rejected.
    pub fn new(len: usize) -> EvcapResult<Self> {
        if len == 0 {
            return Err(EvcapError::Data("horizon must contain at least one hour".into()));
        }
        Ok(Self { len })
    }

    /// The 8760-hour planning year.
    pub const fn year() -> Self {
        Self {
            len: HOURS_PER_YEAR,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: a ring holds at least one hour.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Predecessor hour: `(t - 1) mod len`.
    #[inline]
    pub fn prev(&self, t: usize) -> usize {
        (t % self.len + self.len - 1) % self.len
    }

    /// Successor hour: `(t + 1) mod len`.
    #[inline]
    pub fn next(&self, t: usize) -> usize {
        (t % self.len + 1) % self.len
    }

    /// Iterate over every hour in order.
    pub fn hours(&self) -> std::ops::Range<usize> {
        0..self.len
    }
}

impl TryFrom<usize> for HourRing {
    type Error = EvcapError;

    fn try_from(len: usize) -> EvcapResult<Self> {
        Self::new(len)
    }
}

impl From<HourRing> for usize {
    fn from(ring: HourRing) -> usize {
        ring.len
    }
}

impl Default for HourRing {
    fn default() -> Self {
        Self::year()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prev_wraps_first_hour() {
        let ring = HourRing::year();
        assert_eq!(ring.prev(0), 8759);
        assert_eq!(ring.prev(1), 0);
        assert_eq!(ring.prev(8759), 8758);
    }

    #[test]
    fn test_next_wraps_last_hour() {
        let ring = HourRing::new(24).unwrap();
        assert_eq!(ring.next(23), 0);
        assert_eq!(ring.next(0), 1);
    }

    #[test]
    fn test_prev_next_inverse() {
        let ring = HourRing::new(7).unwrap();
        for t in ring.hours() {
            assert_eq!(ring.next(ring.prev(t)), t);
        }
    }

    #[test]
    fn test_single_hour_ring_is_self_loop() {
        let ring = HourRing::new(1).unwrap();
        assert_eq!(ring.prev(0), 0);
        assert_eq!(ring.next(0), 0);
    }

    #[test]
    fn test_zero_length_rejected() {
        assert!(HourRing::new(0).is_err());
    }

    #[test]
    fn test_deserialize_checks_length() {
        let ring: HourRing = serde_json::from_str("24").unwrap();
        assert_eq!(ring.len(), 24);
        assert_eq!(serde_json::to_string(&ring).unwrap(), "24");

        let err = serde_json::from_str::<HourRing>("0").unwrap_err();
        assert!(err.to_string().contains("at least one hour"));
    }
}
