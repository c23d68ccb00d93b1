//! Async feed provider trait and adapters.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use feedroute_core::feed::{FeedRegistry, RoundData};
use feedroute_core::pair::FeedKey;

/// Trait for reading feeds from an upstream provider.
#[async_trait]
pub trait FeedSource: Send + Sync {
  /// Whether the provider lists the feed at all.
  ///
  /// # Errors
  /// Returns error if the provider cannot be reached.
  async fn feed_exists(&self, feed: FeedKey) -> Result<bool>;

  /// Latest round of the feed, unvalidated.
  ///
  /// # Errors
  /// Returns the provider's error unchanged.
  async fn latest_round_data(&self, feed: FeedKey) -> Result<RoundData>;

  /// Decimal precision of the feed's answers.
  ///
  /// # Errors
  /// Returns the provider's error unchanged.
  async fn decimals(&self, feed: FeedKey) -> Result<u8>;
}

// Implement FeedSource for Arc<T> where T: FeedSource
#[async_trait]
impl<T: FeedSource + ?Sized> FeedSource for Arc<T> {
  async fn feed_exists(&self, feed: FeedKey) -> Result<bool> {
    (**self).feed_exists(feed).await
  }

  async fn latest_round_data(&self, feed: FeedKey) -> Result<RoundData> {
    (**self).latest_round_data(feed).await
  }

  async fn decimals(&self, feed: FeedKey) -> Result<u8> {
    (**self).decimals(feed).await
  }
}

/// Serves a synchronous [`FeedRegistry`] as a [`FeedSource`].
///
/// Registry errors are carried as-is and can be downcast back to
/// `anchor_lang::error::Error`.
pub struct RegistrySource<T> {
  registry: T,
}

impl<T> RegistrySource<T> {
  #[must_use]
  pub fn new(registry: T) -> Self {
    Self { registry }
  }
}

#[async_trait]
impl<T: FeedRegistry + Send + Sync> FeedSource for RegistrySource<T> {
  async fn feed_exists(&self, feed: FeedKey) -> Result<bool> {
    Ok(self.registry.feed_exists(feed))
  }

  async fn latest_round_data(&self, feed: FeedKey) -> Result<RoundData> {
    Ok(self.registry.latest_round_data(feed)?)
  }

  async fn decimals(&self, feed: FeedKey) -> Result<u8> {
    Ok(self.registry.decimals(feed)?)
  }
}
