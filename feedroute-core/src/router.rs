use anchor_lang::prelude::*;
use fix::prelude::*;
use fix::typenum::Integer;
use rust_decimal::Decimal;

use crate::alias_map::AliasMap;
use crate::authority::{Authority, Role};
use crate::classifier::classify;
use crate::clock::UnixClock;
use crate::composer::{convert_amount, quote_route};
use crate::config::RouterConfig;
use crate::denominations::Denominations;
use crate::error::CoreError::{PairCannotBeSupported, ZeroMaxDelay};
use crate::feed::FeedRegistry;
use crate::notify::{Notification, Notifier, TracingNotifier};
use crate::pair::CanonicalPair;
use crate::plan::{Plan, PricingRoute};
use crate::plan_cache::PlanCache;
use crate::usd_registry::UsdRegistry;

/// Quote engine state: aliases, USD-equivalent tokens, cached plans and the
/// staleness window, behind an authorization capability.
///
/// Mutations take `&mut self`; callers sharing a router linearize them.
pub struct FeedRouter<A, N = TracingNotifier> {
  denoms: Denominations,
  aliases: AliasMap,
  usd: UsdRegistry,
  plans: PlanCache,
  max_staleness_secs: u64,
  authority: A,
  notifier: N,
}

impl<A: Authority, N: Notifier> FeedRouter<A, N> {
  pub fn new(
    denoms: Denominations,
    max_staleness_secs: u64,
    authority: A,
    notifier: N,
  ) -> Result<FeedRouter<A, N>> {
    if max_staleness_secs == 0 {
      return Err(ZeroMaxDelay.into());
    }
    Ok(FeedRouter {
      denoms,
      aliases: AliasMap::new(),
      usd: UsdRegistry::new(),
      plans: PlanCache::new(),
      max_staleness_secs,
      authority,
      notifier,
    })
  }

  /// Builds a router with the configured references, USD set and aliases.
  pub fn from_config(
    config: &RouterConfig,
    authority: A,
    notifier: N,
  ) -> Result<FeedRouter<A, N>> {
    let denoms = Denominations::new(config.native(), config.usd())?;
    let mut router =
      FeedRouter::new(denoms, config.max_staleness_secs, authority, notifier)?;
    router.usd.add(&config.usd_tokens());
    let (tokens, mappings) = config.mapping_lists();
    if !tokens.is_empty() {
      router.aliases.add_mappings(&tokens, &mappings)?;
    }
    Ok(router)
  }

  #[must_use]
  pub fn denominations(&self) -> &Denominations {
    &self.denoms
  }

  #[must_use]
  pub fn max_staleness_secs(&self) -> u64 {
    self.max_staleness_secs
  }

  #[must_use]
  pub fn authority(&self) -> &A {
    &self.authority
  }

  #[must_use]
  pub fn notifier(&self) -> &N {
    &self.notifier
  }

  /// Alias target of `token`, or `token` itself.
  #[must_use]
  pub fn mapped_token(&self, token: Pubkey) -> Pubkey {
    self.aliases.resolve(token)
  }

  /// The USD reference itself and every registered stablecoin.
  #[must_use]
  pub fn is_usd(&self, token: Pubkey) -> bool {
    token == self.denoms.usd || self.usd.is_usd(token)
  }

  #[must_use]
  pub fn canonical_pair(&self, x: Pubkey, y: Pubkey) -> CanonicalPair {
    CanonicalPair::new(self.mapped_token(x), self.mapped_token(y))
  }

  /// Cached plan for the pair, [`Plan::None`] when unsupported.
  #[must_use]
  pub fn plan_for_pair(&self, x: Pubkey, y: Pubkey) -> Plan {
    self
      .plans
      .get(&self.canonical_pair(x, y))
      .unwrap_or_default()
  }

  /// Consults the plan cache only.
  #[must_use]
  pub fn is_pair_already_supported(&self, x: Pubkey, y: Pubkey) -> bool {
    self.plan_for_pair(x, y).is_supported()
  }

  /// Classifies the pair against the registry's current listings.
  pub fn classify<R: FeedRegistry>(
    &self,
    registry: &R,
    x: Pubkey,
    y: Pubkey,
  ) -> Plan {
    classify(registry, self.canonical_pair(x, y), &self.denoms, |t| {
      self.is_usd(t)
    })
  }

  pub fn can_support_pair<R: FeedRegistry>(
    &self,
    registry: &R,
    x: Pubkey,
    y: Pubkey,
  ) -> bool {
    self.classify(registry, x, y).is_supported()
  }

  /// Feeds the cached plan reads for the pair.
  pub fn route_for(&self, x: Pubkey, y: Pubkey) -> Result<PricingRoute> {
    let pair = self.canonical_pair(x, y);
    self
      .plans
      .get(&pair)
      .and_then(|plan| {
        PricingRoute::new(plan, pair, &self.denoms, |t| self.is_usd(t))
      })
      .ok_or(PairCannotBeSupported.into())
  }

  /// Price of one unit of `x` denominated in `y`.
  ///
  /// Only pairs with a cached plan can be quoted.
  pub fn quote<R: FeedRegistry, C: UnixClock>(
    &self,
    registry: &R,
    clock: &C,
    x: Pubkey,
    y: Pubkey,
  ) -> Result<Decimal> {
    let route = self.route_for(x, y)?;
    quote_route(
      registry,
      clock,
      &route,
      self.mapped_token(x),
      self.max_staleness_secs,
    )
  }

  /// Converts `amount_in` of `x` into `y` at the current rate.
  pub fn quote_amount<InExp: Integer, OutExp: Integer, R, C>(
    &self,
    registry: &R,
    clock: &C,
    x: Pubkey,
    amount_in: UFix64<InExp>,
    y: Pubkey,
  ) -> Result<UFix64<OutExp>>
  where
    R: FeedRegistry,
    C: UnixClock,
  {
    let rate = self.quote(registry, clock, x, y)?;
    convert_amount(amount_in, rate)
  }

  pub fn add_usd_stablecoins(
    &mut self,
    caller: &Pubkey,
    tokens: &[Pubkey],
  ) -> Result<()> {
    self.authority.require(caller, Role::Admin)?;
    self.usd.add(tokens);
    self.notifier.notify(&Notification::TokensConsideredUsd {
      tokens: tokens.to_vec(),
    });
    Ok(())
  }

  pub fn remove_usd_stablecoins(
    &mut self,
    caller: &Pubkey,
    tokens: &[Pubkey],
  ) -> Result<()> {
    self.authority.require(caller, Role::Admin)?;
    self.usd.remove(tokens);
    self
      .notifier
      .notify(&Notification::TokensNoLongerConsideredUsd {
        tokens: tokens.to_vec(),
      });
    Ok(())
  }

  /// Registers aliases; see [`AliasMap::add_mappings`].
  pub fn add_mappings(
    &mut self,
    caller: &Pubkey,
    tokens: &[Pubkey],
    mappings: &[Pubkey],
  ) -> Result<()> {
    self.authority.require(caller, Role::Admin)?;
    self.aliases.add_mappings(tokens, mappings)?;
    self.notifier.notify(&Notification::MappingsAdded {
      tokens: tokens.to_vec(),
      mappings: mappings.to_vec(),
    });
    Ok(())
  }

  pub fn set_max_staleness_window(
    &mut self,
    caller: &Pubkey,
    max_staleness_secs: u64,
  ) -> Result<()> {
    self.authority.require(caller, Role::SuperAdmin)?;
    if max_staleness_secs == 0 {
      return Err(ZeroMaxDelay.into());
    }
    self.max_staleness_secs = max_staleness_secs;
    self
      .notifier
      .notify(&Notification::MaxStalenessSet { max_staleness_secs });
    Ok(())
  }

  /// Classifies the pair and caches the result, replacing any earlier plan.
  pub fn add_or_modify_support<R: FeedRegistry>(
    &mut self,
    caller: &Pubkey,
    registry: &R,
    x: Pubkey,
    y: Pubkey,
  ) -> Result<Plan> {
    self.authority.require(caller, Role::Admin)?;
    let plan = self.classify(registry, x, y);
    if !plan.is_supported() {
      return Err(PairCannotBeSupported.into());
    }
    let pair = self.canonical_pair(x, y);
    self.plans.set(pair, plan);
    self.notifier.notify(&Notification::PlanUpdated { pair, plan });
    Ok(plan)
  }

  /// Like [`Self::add_or_modify_support`], but keeps an existing plan.
  pub fn add_support_if_needed<R: FeedRegistry>(
    &mut self,
    caller: &Pubkey,
    registry: &R,
    x: Pubkey,
    y: Pubkey,
  ) -> Result<Plan> {
    self.authority.require(caller, Role::Admin)?;
    match self.plans.get(&self.canonical_pair(x, y)) {
      Some(plan) => Ok(plan),
      None => self.add_or_modify_support(caller, registry, x, y),
    }
  }

  /// Drops the cached plan; quotes for the pair fail until re-added.
  pub fn remove_support(
    &mut self,
    caller: &Pubkey,
    x: Pubkey,
    y: Pubkey,
  ) -> Result<Option<Plan>> {
    self.authority.require(caller, Role::Admin)?;
    let pair = self.canonical_pair(x, y);
    let removed = self.plans.invalidate(&pair);
    if removed.is_some() {
      self.notifier.notify(&Notification::PlanUpdated {
        pair,
        plan: Plan::None,
      });
    }
    Ok(removed)
  }
}
