use std::collections::HashMap;

use anchor_lang::prelude::*;
use pyth_solana_receiver_sdk::price_update::{PriceUpdateV2, VerificationLevel};

use crate::error::FeedError::{
  FeedNotFound, PythExponent, PythVerificationLevel,
};
use crate::feed::{FeedRegistry, RoundData};
use crate::pair::FeedKey;

/// Feed registry over posted Pyth price updates, one account per feed.
#[derive(Default)]
pub struct PythFeedRegistry {
  updates: HashMap<FeedKey, PriceUpdateV2>,
}

impl PythFeedRegistry {
  #[must_use]
  pub fn new() -> PythFeedRegistry {
    PythFeedRegistry::default()
  }

  /// Registers (or replaces) the price update backing `feed`.
  pub fn insert(&mut self, feed: FeedKey, update: PriceUpdateV2) {
    self.updates.insert(feed, update);
  }

  fn update(&self, feed: FeedKey) -> Result<&PriceUpdateV2> {
    self.updates.get(&feed).ok_or(FeedNotFound.into())
  }
}

/// Checks Pythnet verification level for the price update.
fn validate_verification_level(level: VerificationLevel) -> Result<()> {
  if level == VerificationLevel::Full {
    Ok(())
  } else {
    Err(PythVerificationLevel.into())
  }
}

/// Pyth prices are `price * 10^exponent`; only non-positive exponents map
/// onto a decimal count.
fn exponent_decimals(exponent: i32) -> Result<u8> {
  if exponent > 0 {
    Err(PythExponent.into())
  } else {
    u8::try_from(exponent.unsigned_abs()).map_err(|_| PythExponent.into())
  }
}

impl FeedRegistry for PythFeedRegistry {
  fn feed_exists(&self, feed: FeedKey) -> bool {
    self.updates.contains_key(&feed)
  }

  fn latest_round_data(&self, feed: FeedKey) -> Result<RoundData> {
    let update = self.update(feed)?;
    validate_verification_level(update.verification_level)?;
    let message = &update.price_message;
    Ok(RoundData {
      round_id: update.posted_slot,
      answer: i128::from(message.price),
      started_at: message.publish_time,
      updated_at: message.publish_time,
      answered_in_round: update.posted_slot,
    })
  }

  fn decimals(&self, feed: FeedKey) -> Result<u8> {
    exponent_decimals(self.update(feed)?.price_message.exponent)
  }
}

#[cfg(test)]
mod tests {
  use proptest::prelude::*;
  use pyth_solana_receiver_sdk::price_update::PriceFeedMessage;
  use rust_decimal::Decimal;

  use super::*;
  use crate::clock::FixedClock;
  use crate::feed::read_feed;
  use crate::util::proptest::{feed_key, NOW};

  fn price_update(
    price: i64,
    exponent: i32,
    publish_time: i64,
    verification_level: VerificationLevel,
  ) -> PriceUpdateV2 {
    PriceUpdateV2 {
      write_authority: Pubkey::new_unique(),
      verification_level,
      price_message: PriceFeedMessage {
        feed_id: [0; 32],
        price,
        conf: 0,
        exponent,
        publish_time,
        prev_publish_time: publish_time,
        ema_price: price,
        ema_conf: 0,
      },
      posted_slot: 300_000_000,
    }
  }

  proptest! {
    #[test]
    fn exponent_decimals_non_pos(exp in -255..=0i32) {
      prop_assert_eq!(u32::from(exponent_decimals(exp)?), exp.unsigned_abs());
    }

    #[test]
    fn exponent_decimals_out_of_range(exp in any::<i32>()) {
      prop_assume!(!(-255..=0).contains(&exp));
      prop_assert_eq!(exponent_decimals(exp), Err(PythExponent.into()));
    }
  }

  #[test]
  fn full_update_reads() -> Result<()> {
    let feed = feed_key();
    let mut registry = PythFeedRegistry::new();
    registry.insert(
      feed,
      price_update(14_640_110_937, -8, NOW, VerificationLevel::Full),
    );
    assert!(registry.feed_exists(feed));
    let reading = read_feed(&registry, &FixedClock(NOW), feed, 60)?;
    assert_eq!(reading.decimals, 8);
    assert_eq!(reading.price()?, Decimal::new(14_640_110_937, 8));
    Ok(())
  }

  #[test]
  fn partial_update_rejected() {
    let feed = feed_key();
    let mut registry = PythFeedRegistry::new();
    let level = VerificationLevel::Partial { num_signatures: 5 };
    registry.insert(feed, price_update(100, -8, NOW, level));
    let out = registry.latest_round_data(feed);
    assert_eq!(out, Err(PythVerificationLevel.into()));
  }

  #[test]
  fn unknown_feed() {
    let registry = PythFeedRegistry::new();
    assert!(!registry.feed_exists(feed_key()));
    assert_eq!(registry.decimals(feed_key()), Err(FeedNotFound.into()));
  }
}
