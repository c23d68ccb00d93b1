use anchor_lang::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, warn};

use crate::clock::UnixClock;
use crate::error::CoreError::{FeedPriceRange, InvalidPrice, LastUpdateIsTooOld};
use crate::pair::FeedKey;

/// Decimal places every reading and composed rate is normalized to.
pub const RATE_DECIMALS: u32 = 18;

/// Latest round as reported by a feed provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundData {
  pub round_id: u64,
  pub answer: i128,
  pub started_at: i64,
  pub updated_at: i64,
  pub answered_in_round: u64,
}

impl RoundData {
  /// Single-round answer, for providers without round bookkeeping.
  #[must_use]
  pub fn new(answer: i128, updated_at: i64) -> RoundData {
    RoundData {
      round_id: 1,
      answer,
      started_at: updated_at,
      updated_at,
      answered_in_round: 1,
    }
  }
}

/// Upstream feed provider.
///
/// Errors returned here reach the caller of the engine unmodified.
pub trait FeedRegistry {
  /// Liveness probe used during classification.
  fn feed_exists(&self, feed: FeedKey) -> bool;

  fn latest_round_data(&self, feed: FeedKey) -> Result<RoundData>;

  /// Fixed decimal precision of the feed's answers.
  fn decimals(&self, feed: FeedKey) -> Result<u8>;
}

impl<R: FeedRegistry + ?Sized> FeedRegistry for &R {
  fn feed_exists(&self, feed: FeedKey) -> bool {
    (**self).feed_exists(feed)
  }

  fn latest_round_data(&self, feed: FeedKey) -> Result<RoundData> {
    (**self).latest_round_data(feed)
  }

  fn decimals(&self, feed: FeedKey) -> Result<u8> {
    (**self).decimals(feed)
  }
}

/// A validated, strictly positive feed answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeedReading {
  pub answer: u128,
  pub decimals: u8,
}

impl FeedReading {
  /// Answer as a decimal, truncated to [`RATE_DECIMALS`].
  ///
  /// An answer that is valid but finer than [`RATE_DECIMALS`] truncates to
  /// zero and is out of range.
  pub fn price(&self) -> Result<Decimal> {
    let answer = i128::try_from(self.answer).map_err(|_| FeedPriceRange)?;
    let price =
      Decimal::try_from_i128_with_scale(answer, u32::from(self.decimals))
        .map_err(|_| FeedPriceRange)?;
    Some(truncate(price))
      .filter(|p| !p.is_zero())
      .ok_or(FeedPriceRange.into())
  }
}

/// Drops digits past [`RATE_DECIMALS`].
pub(crate) fn truncate(value: Decimal) -> Decimal {
  value.round_dp_with_strategy(RATE_DECIMALS, RoundingStrategy::ToZero)
}

/// Rejects zero and negative answers.
fn validate_price(answer: i128) -> Result<u128> {
  if answer <= 0 {
    Err(InvalidPrice.into())
  } else {
    Ok(answer.unsigned_abs())
  }
}

/// Ensures the update time is no older than the inclusive bound
/// `clock_time - max_staleness_secs`. Widened to `i128` so neither the
/// subtraction nor the comparison can wrap.
fn validate_update_time(
  updated_at: i64,
  max_staleness_secs: u64,
  clock_time: i64,
) -> Result<()> {
  let age = i128::from(clock_time) - i128::from(updated_at);
  if age <= i128::from(max_staleness_secs) {
    Ok(())
  } else {
    Err(LastUpdateIsTooOld.into())
  }
}

/// Checks a raw round against price and staleness rules, in that order.
pub fn validate_round<C: UnixClock>(
  round: &RoundData,
  clock: &C,
  max_staleness_secs: u64,
) -> Result<u128> {
  let answer = validate_price(round.answer)?;
  validate_update_time(
    round.updated_at,
    max_staleness_secs,
    clock.unix_timestamp(),
  )?;
  Ok(answer)
}

/// Reads one feed through the provider and validates the answer.
pub fn read_feed<R: FeedRegistry, C: UnixClock>(
  registry: &R,
  clock: &C,
  feed: FeedKey,
  max_staleness_secs: u64,
) -> Result<FeedReading> {
  let round = registry.latest_round_data(feed)?;
  let answer = validate_round(&round, clock, max_staleness_secs)
    .inspect_err(|e| {
      warn!(
        %feed,
        answer = round.answer,
        updated_at = round.updated_at,
        "rejected reading: {e}"
      );
    })?;
  let decimals = registry.decimals(feed)?;
  debug!(%feed, answer, decimals, "feed read");
  Ok(FeedReading { answer, decimals })
}
