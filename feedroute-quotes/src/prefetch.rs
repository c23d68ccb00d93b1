//! Concurrent feed fetching into an in-memory snapshot.

use anyhow::{Context, Result};
use feedroute_core::denominations::Denominations;
use feedroute_core::pair::{CanonicalPair, FeedKey};
use feedroute_core::plan::PricingRoute;
use feedroute_core::snapshot::FeedSnapshot;
use futures::future::try_join_all;
use tracing::debug;

use crate::feed_source::FeedSource;

/// Reads every distinct feed of `route` concurrently.
///
/// Per feed, the round is fetched before its decimals. Readings are not
/// validated here; that happens when the snapshot is composed.
///
/// # Errors
/// Returns the first upstream failure, annotated with the feed.
pub async fn fetch_route<S: FeedSource>(
  source: &S,
  route: &PricingRoute,
) -> Result<FeedSnapshot> {
  let reads = route.feeds().into_iter().map(|feed| async move {
    let round = source
      .latest_round_data(feed)
      .await
      .with_context(|| format!("latest round of feed {feed}"))?;
    let decimals = source
      .decimals(feed)
      .await
      .with_context(|| format!("decimals of feed {feed}"))?;
    anyhow::Ok((feed, round, decimals))
  });
  let fetched = try_join_all(reads).await?;
  debug!(pair = %route.pair, feeds = fetched.len(), "fetched route feeds");
  Ok(
    fetched
      .into_iter()
      .fold(FeedSnapshot::new(), |snapshot, (feed, round, decimals)| {
        snapshot.with_feed(feed, round, decimals)
      }),
  )
}

/// Probes the four reference feeds classification may ask about.
///
/// # Errors
/// Returns the first upstream failure, annotated with the feed.
pub async fn probe_listings<S: FeedSource>(
  source: &S,
  pair: CanonicalPair,
  denoms: &Denominations,
) -> Result<FeedSnapshot> {
  let candidates = [pair.token_a(), pair.token_b()]
    .into_iter()
    .flat_map(|token| {
      [
        FeedKey::new(token, denoms.usd),
        FeedKey::new(token, denoms.native),
      ]
    });
  let probes = candidates.map(|feed| async move {
    let exists = source
      .feed_exists(feed)
      .await
      .with_context(|| format!("probing feed {feed}"))?;
    anyhow::Ok((feed, exists))
  });
  let listed = try_join_all(probes).await?;
  Ok(
    listed
      .into_iter()
      .filter(|(_, exists)| *exists)
      .fold(FeedSnapshot::new(), |snapshot, (feed, _)| {
        snapshot.with_listed(feed)
      }),
  )
}
