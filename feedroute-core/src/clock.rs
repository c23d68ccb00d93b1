use anchor_lang::prelude::Clock;

/// Source of the current unix time used for feed staleness checks.
pub trait UnixClock {
  fn unix_timestamp(&self) -> i64;
}

impl UnixClock for Clock {
  fn unix_timestamp(&self) -> i64 {
    self.unix_timestamp
  }
}

/// Clock pinned to a single timestamp.
///
/// Used for quoting against prefetched snapshots and in tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl UnixClock for FixedClock {
  fn unix_timestamp(&self) -> i64 {
    self.0
  }
}

impl<C: UnixClock> UnixClock for &C {
  fn unix_timestamp(&self) -> i64 {
    (**self).unix_timestamp()
  }
}
