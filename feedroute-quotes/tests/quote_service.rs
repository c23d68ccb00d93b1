//! Quote service against in-memory feed sources.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anchor_lang::error::Error as CoreChannelError;
use async_trait::async_trait;
use feedroute_core::authority::RoleTable;
use feedroute_core::clock::FixedClock;
use feedroute_core::denominations::{Denominations, NATIVE_MINT, USD};
use feedroute_core::error::CoreError::{
  LastUpdateIsTooOld, PairCannotBeSupported, Unauthorized,
};
use feedroute_core::error::FeedError::FeedNotFound;
use feedroute_core::error::{error_source, ErrorSource};
use feedroute_core::feed::RoundData;
use feedroute_core::notify::TracingNotifier;
use feedroute_core::pair::FeedKey;
use feedroute_core::router::FeedRouter;
use feedroute_core::snapshot::FeedSnapshot;
use feedroute_quotes::prelude::*;
use fix::typenum::{N6, N9};
use tokio::sync::oneshot;

const NOW: i64 = 1_700_000_000;
const DAY: u64 = 86_400;

struct Setup {
  admin: Pubkey,
  x: Pubkey,
  y: Pubkey,
}

impl Setup {
  fn new() -> Self {
    Self {
      admin: Pubkey::new_unique(),
      x: Pubkey::new_unique(),
      y: Pubkey::new_unique(),
    }
  }

  fn router(&self) -> FeedRouter<RoleTable> {
    let roles = RoleTable::new(self.admin, &[]).expect("roles");
    FeedRouter::new(Denominations::default(), DAY, roles, TracingNotifier)
      .expect("router")
  }

  fn service<S: FeedSource>(
    &self,
    source: S,
  ) -> QuoteService<S, RoleTable, TracingNotifier, FixedClock> {
    QuoteService::with_clock(source, self.router(), FixedClock(NOW))
  }
}

fn fresh(answer: i128) -> RoundData {
  RoundData::new(answer, NOW)
}

/// Counts upstream reads per feed.
struct CountingSource {
  inner: RegistrySource<FeedSnapshot>,
  reads: Mutex<HashMap<FeedKey, usize>>,
}

impl CountingSource {
  fn new(snapshot: FeedSnapshot) -> Self {
    Self {
      inner: RegistrySource::new(snapshot),
      reads: Mutex::new(HashMap::new()),
    }
  }

  fn reads(&self) -> HashMap<FeedKey, usize> {
    self.reads.lock().expect("reads lock").clone()
  }
}

#[async_trait]
impl FeedSource for CountingSource {
  async fn feed_exists(&self, feed: FeedKey) -> Result<bool> {
    self.inner.feed_exists(feed).await
  }

  async fn latest_round_data(&self, feed: FeedKey) -> Result<RoundData> {
    *self.reads.lock().expect("reads lock").entry(feed).or_default() += 1;
    self.inner.latest_round_data(feed).await
  }

  async fn decimals(&self, feed: FeedKey) -> Result<u8> {
    self.inner.decimals(feed).await
  }
}

/// Holds the first listing lookup until released.
struct GatedSource {
  inner: RegistrySource<FeedSnapshot>,
  started: Mutex<Option<oneshot::Sender<()>>>,
  release: Mutex<Option<oneshot::Receiver<()>>>,
}

impl GatedSource {
  fn new(
    snapshot: FeedSnapshot,
    started: oneshot::Sender<()>,
    release: oneshot::Receiver<()>,
  ) -> Self {
    Self {
      inner: RegistrySource::new(snapshot),
      started: Mutex::new(Some(started)),
      release: Mutex::new(Some(release)),
    }
  }
}

#[async_trait]
impl FeedSource for GatedSource {
  async fn feed_exists(&self, feed: FeedKey) -> Result<bool> {
    let started = self.started.lock().expect("gate lock").take();
    if let Some(started) = started {
      let _ = started.send(());
      let release = self.release.lock().expect("gate lock").take();
      if let Some(release) = release {
        let _ = release.await;
      }
    }
    self.inner.feed_exists(feed).await
  }

  async fn latest_round_data(&self, feed: FeedKey) -> Result<RoundData> {
    self.inner.latest_round_data(feed).await
  }

  async fn decimals(&self, feed: FeedKey) -> Result<u8> {
    self.inner.decimals(feed).await
  }
}

fn core_error(err: &anyhow::Error) -> &CoreChannelError {
  err
    .downcast_ref::<CoreChannelError>()
    .expect("error on the core channel")
}

#[tokio::test]
async fn two_feed_quote() -> Result<()> {
  let setup = Setup::new();
  let snapshot = FeedSnapshot::new()
    .with_feed(FeedKey::new(setup.x, USD), fresh(200), 8)
    .with_feed(FeedKey::new(setup.y, USD), fresh(100), 8);
  let service = setup.service(RegistrySource::new(snapshot));

  let plan = service
    .add_or_modify_support(&setup.admin, setup.y, setup.x)
    .await?;
  assert_eq!(plan, Plan::TokenToUsdToToken);
  assert_eq!(service.quote(setup.x, setup.y).await?, Decimal::TWO);

  let out: UFix64<N6> = service
    .quote_amount(setup.y, UFix64::<N9>::new(3_000_000_000), setup.x)
    .await?;
  assert_eq!(out, UFix64::new(1_500_000));
  Ok(())
}

#[tokio::test]
async fn cross_plan_reads_each_feed_once() -> Result<()> {
  let setup = Setup::new();
  let native_usd = FeedKey::new(NATIVE_MINT, USD);
  let x_usd = FeedKey::new(setup.x, USD);
  let y_native = FeedKey::new(setup.y, NATIVE_MINT);
  let snapshot = FeedSnapshot::new()
    .with_feed(x_usd, fresh(30_000_000_000), 8)
    .with_feed(y_native, fresh(500_000_000), 9)
    .with_feed(native_usd, fresh(15_000_000_000), 8);
  let source = Arc::new(CountingSource::new(snapshot));
  let service = setup.service(source.clone());

  let plan = service
    .add_or_modify_support(&setup.admin, setup.x, setup.y)
    .await?;
  // `x` sorts first, so it is the USD side of the canonical pair.
  assert_eq!(plan, Plan::TokenAToUsdToNativeToTokenB);
  assert_eq!(service.quote(setup.x, setup.y).await?, Decimal::from(4));
  assert_eq!(service.quote(setup.y, setup.x).await?, Decimal::new(25, 2));

  let reads = source.reads();
  assert_eq!(reads.len(), 3);
  assert!(reads.values().all(|count| *count == 2));
  Ok(())
}

#[tokio::test]
async fn stale_feed_fails_quote() -> Result<()> {
  let setup = Setup::new();
  #[allow(clippy::cast_possible_wrap)]
  let updated_at = NOW - DAY as i64 - 900;
  let snapshot = FeedSnapshot::new().with_feed(
    FeedKey::new(setup.x, NATIVE_MINT),
    RoundData::new(10, updated_at),
    8,
  );
  let service = setup.service(RegistrySource::new(snapshot));
  service
    .add_or_modify_support(&setup.admin, setup.x, NATIVE_MINT)
    .await?;

  let err = service
    .quote(setup.x, NATIVE_MINT)
    .await
    .expect_err("stale reading");
  let core = core_error(&err);
  assert_eq!(*core, LastUpdateIsTooOld.into());
  assert_eq!(error_source(core), ErrorSource::Core);
  Ok(())
}

#[tokio::test]
async fn upstream_error_passes_through() -> Result<()> {
  let setup = Setup::new();
  // Listed for classification but without any round to read.
  let snapshot = FeedSnapshot::new()
    .with_listed(FeedKey::new(setup.x, USD))
    .with_listed(FeedKey::new(setup.y, USD));
  let service = setup.service(RegistrySource::new(snapshot));
  service
    .add_or_modify_support(&setup.admin, setup.x, setup.y)
    .await?;

  let err = service
    .quote(setup.x, setup.y)
    .await
    .expect_err("missing round");
  assert!(format!("{err:#}").contains("latest round of feed"));
  let upstream = core_error(&err);
  assert_eq!(*upstream, FeedNotFound.into());
  assert_eq!(error_source(upstream), ErrorSource::Upstream);
  Ok(())
}

#[tokio::test]
async fn unsupported_and_unauthorized() -> Result<()> {
  let setup = Setup::new();
  let service = setup.service(RegistrySource::new(FeedSnapshot::new()));
  assert!(!service.can_support_pair(setup.x, setup.y).await?);

  let err = service
    .add_or_modify_support(&setup.admin, setup.x, setup.y)
    .await
    .expect_err("no feeds");
  assert_eq!(*core_error(&err), PairCannotBeSupported.into());

  let err = service
    .quote(setup.x, setup.y)
    .await
    .expect_err("uncached pair");
  assert_eq!(*core_error(&err), PairCannotBeSupported.into());

  let stranger = Pubkey::new_unique();
  let err = service
    .add_or_modify_support(&stranger, setup.x, setup.y)
    .await
    .expect_err("not an admin");
  assert_eq!(*core_error(&err), Unauthorized.into());
  Ok(())
}

#[tokio::test]
async fn support_added_once() -> Result<()> {
  let setup = Setup::new();
  let snapshot = FeedSnapshot::new()
    .with_feed(FeedKey::new(setup.x, NATIVE_MINT), fresh(2), 0)
    .with_feed(FeedKey::new(setup.y, NATIVE_MINT), fresh(4), 0);
  let service = setup.service(RegistrySource::new(snapshot));
  let first = service
    .add_support_if_needed(&setup.admin, setup.x, setup.y)
    .await?;
  let second = service
    .add_support_if_needed(&setup.admin, setup.y, setup.x)
    .await?;
  assert_eq!(first, Plan::TokenToNativeToToken);
  assert_eq!(first, second);
  assert!(service.router().await.is_pair_already_supported(setup.y, setup.x));
  assert_eq!(service.quote(setup.x, setup.y).await?, Decimal::new(5, 1));
  Ok(())
}

#[tokio::test]
async fn support_follows_alias_changed_during_listing() -> Result<()> {
  let setup = Setup::new();
  let wrapped = Pubkey::new_unique();
  let snapshot = FeedSnapshot::new()
    .with_feed(FeedKey::new(setup.x, USD), fresh(200), 8)
    .with_feed(FeedKey::new(setup.y, USD), fresh(100), 8);
  let (started_tx, started_rx) = oneshot::channel();
  let (release_tx, release_rx) = oneshot::channel();
  let service =
    setup.service(GatedSource::new(snapshot, started_tx, release_rx));

  let remap = async {
    started_rx.await.expect("listing lookup started");
    service
      .router_mut()
      .await
      .add_mappings(&setup.admin, &[wrapped], &[setup.x])?;
    release_tx.send(()).expect("listing lookup waiting");
    anyhow::Ok(())
  };
  let (plan, remapped) = tokio::join!(
    service.add_or_modify_support(&setup.admin, wrapped, setup.y),
    remap
  );
  remapped?;
  assert_eq!(plan?, Plan::TokenToUsdToToken);
  assert!(service.router().await.is_pair_already_supported(setup.x, setup.y));
  assert_eq!(service.quote(wrapped, setup.y).await?, Decimal::TWO);
  Ok(())
}
