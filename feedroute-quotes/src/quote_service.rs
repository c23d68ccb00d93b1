//! Shared router behind an async lock, quoting over an upstream source.

use anchor_lang::prelude::Pubkey;
use anyhow::Result;
use feedroute_core::authority::{Authority, Role};
use feedroute_core::clock::UnixClock;
use feedroute_core::composer::{convert_amount, quote_route};
use feedroute_core::notify::{Notifier, TracingNotifier};
use feedroute_core::plan::Plan;
use feedroute_core::router::FeedRouter;
use fix::prelude::*;
use fix::typenum::Integer;
use rust_decimal::Decimal;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::clock::SystemClock;
use crate::feed_source::FeedSource;
use crate::prefetch::{fetch_route, probe_listings};

/// Quotes pairs against a [`FeedSource`], linearizing router mutations.
///
/// The lock is never held across upstream calls: routes and listings are
/// resolved under a read guard, fetched without it, then composed or
/// committed. Listings are probed again when aliases moved the pair in the
/// meantime.
pub struct QuoteService<S, A, N = TracingNotifier, C = SystemClock> {
  source: S,
  router: RwLock<FeedRouter<A, N>>,
  clock: C,
}

impl<S, A, N> QuoteService<S, A, N, SystemClock>
where
  S: FeedSource,
  A: Authority + Send + Sync,
  N: Notifier + Send + Sync,
{
  #[must_use]
  pub fn new(source: S, router: FeedRouter<A, N>) -> Self {
    Self::with_clock(source, router, SystemClock)
  }
}

impl<S, A, N, C> QuoteService<S, A, N, C>
where
  S: FeedSource,
  A: Authority + Send + Sync,
  N: Notifier + Send + Sync,
  C: UnixClock + Send + Sync,
{
  #[must_use]
  pub fn with_clock(source: S, router: FeedRouter<A, N>, clock: C) -> Self {
    Self {
      source,
      router: RwLock::new(router),
      clock,
    }
  }

  /// Shared access for the consumer reads of the router.
  pub async fn router(&self) -> RwLockReadGuard<'_, FeedRouter<A, N>> {
    self.router.read().await
  }

  /// Exclusive access for administrative mutations that need no feeds.
  pub async fn router_mut(&self) -> RwLockWriteGuard<'_, FeedRouter<A, N>> {
    self.router.write().await
  }

  /// Price of one unit of `x` denominated in `y`.
  ///
  /// # Errors
  /// * Pair has no cached plan
  /// * Upstream failure for any feed of the route
  /// * Reading rejected by validation or composition
  pub async fn quote(&self, x: Pubkey, y: Pubkey) -> Result<Decimal> {
    let (route, base, max_staleness_secs) = {
      let router = self.router.read().await;
      let route = router.route_for(x, y)?;
      (route, router.mapped_token(x), router.max_staleness_secs())
    };
    let snapshot = fetch_route(&self.source, &route).await?;
    let rate =
      quote_route(&snapshot, &self.clock, &route, base, max_staleness_secs)?;
    debug!(%x, %y, %rate, "quoted");
    Ok(rate)
  }

  /// Converts `amount_in` of `x` into `y` at the current rate.
  ///
  /// # Errors
  /// As [`Self::quote`], or when the amount does not fit the output.
  pub async fn quote_amount<InExp: Integer, OutExp: Integer>(
    &self,
    x: Pubkey,
    amount_in: UFix64<InExp>,
    y: Pubkey,
  ) -> Result<UFix64<OutExp>> {
    let rate = self.quote(x, y).await?;
    Ok(convert_amount(amount_in, rate)?)
  }

  /// Classifies the pair against the source's current listings.
  ///
  /// # Errors
  /// Returns error if any listing probe fails.
  pub async fn classify(&self, x: Pubkey, y: Pubkey) -> Result<Plan> {
    let (mut pair, denoms) = {
      let router = self.router.read().await;
      (router.canonical_pair(x, y), *router.denominations())
    };
    loop {
      let listings = probe_listings(&self.source, pair, &denoms).await?;
      let router = self.router.read().await;
      let current = router.canonical_pair(x, y);
      if current == pair {
        return Ok(router.classify(&listings, x, y));
      }
      debug!(%pair, %current, "aliases changed while probing");
      pair = current;
    }
  }

  /// # Errors
  /// Returns error if any listing probe fails.
  pub async fn can_support_pair(&self, x: Pubkey, y: Pubkey) -> Result<bool> {
    Ok(self.classify(x, y).await?.is_supported())
  }

  /// Classifies the pair and caches the plan.
  ///
  /// # Errors
  /// * Caller lacks the admin role
  /// * Pair cannot be supported
  /// * Listing probe failure
  pub async fn add_or_modify_support(
    &self,
    caller: &Pubkey,
    x: Pubkey,
    y: Pubkey,
  ) -> Result<Plan> {
    let (mut pair, denoms) = {
      let router = self.router.read().await;
      router.authority().require(caller, Role::Admin)?;
      (router.canonical_pair(x, y), *router.denominations())
    };
    loop {
      let listings = probe_listings(&self.source, pair, &denoms).await?;
      let mut router = self.router.write().await;
      let current = router.canonical_pair(x, y);
      if current == pair {
        return Ok(router.add_or_modify_support(caller, &listings, x, y)?);
      }
      debug!(%pair, %current, "aliases changed while probing");
      pair = current;
    }
  }

  /// Caches a plan for the pair unless one is already present.
  ///
  /// # Errors
  /// As [`Self::add_or_modify_support`].
  pub async fn add_support_if_needed(
    &self,
    caller: &Pubkey,
    x: Pubkey,
    y: Pubkey,
  ) -> Result<Plan> {
    {
      let router = self.router.read().await;
      router.authority().require(caller, Role::Admin)?;
      let cached = router.plan_for_pair(x, y);
      if cached.is_supported() {
        return Ok(cached);
      }
    }
    self.add_or_modify_support(caller, x, y).await
  }
}
