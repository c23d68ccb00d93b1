use std::collections::{HashMap, HashSet};

use anchor_lang::prelude::*;

use crate::error::FeedError::FeedNotFound;
use crate::feed::{FeedRegistry, RoundData};
use crate::pair::FeedKey;

/// In-memory feed registry.
///
/// Holds feed rounds fetched ahead of time together with the set of feeds
/// known to exist, so classification and quoting can run without touching
/// the upstream provider.
#[derive(Clone, Debug, Default)]
pub struct FeedSnapshot {
  rounds: HashMap<FeedKey, (RoundData, u8)>,
  listed: HashSet<FeedKey>,
}

impl FeedSnapshot {
  #[must_use]
  pub fn new() -> FeedSnapshot {
    FeedSnapshot::default()
  }

  /// Records a round and its decimals; the feed is listed as existing.
  pub fn insert(&mut self, feed: FeedKey, round: RoundData, decimals: u8) {
    self.listed.insert(feed);
    self.rounds.insert(feed, (round, decimals));
  }

  /// Marks a feed as existing without any round data.
  pub fn list(&mut self, feed: FeedKey) {
    self.listed.insert(feed);
  }

  #[must_use]
  pub fn with_feed(
    mut self,
    feed: FeedKey,
    round: RoundData,
    decimals: u8,
  ) -> FeedSnapshot {
    self.insert(feed, round, decimals);
    self
  }

  #[must_use]
  pub fn with_listed(mut self, feed: FeedKey) -> FeedSnapshot {
    self.list(feed);
    self
  }

  fn entry(&self, feed: FeedKey) -> Result<&(RoundData, u8)> {
    self.rounds.get(&feed).ok_or(FeedNotFound.into())
  }
}

impl FeedRegistry for FeedSnapshot {
  fn feed_exists(&self, feed: FeedKey) -> bool {
    self.listed.contains(&feed)
  }

  fn latest_round_data(&self, feed: FeedKey) -> Result<RoundData> {
    self.entry(feed).map(|(round, _)| *round)
  }

  fn decimals(&self, feed: FeedKey) -> Result<u8> {
    self.entry(feed).map(|(_, decimals)| *decimals)
  }
}
