use std::collections::HashMap;

use crate::pair::CanonicalPair;
use crate::plan::Plan;

/// Last classified plan per canonical pair. Entries live until overwritten
/// or invalidated.
#[derive(Clone, Debug, Default)]
pub struct PlanCache {
  plans: HashMap<CanonicalPair, Plan>,
}

impl PlanCache {
  #[must_use]
  pub fn new() -> PlanCache {
    PlanCache::default()
  }

  #[must_use]
  pub fn get(&self, pair: &CanonicalPair) -> Option<Plan> {
    self.plans.get(pair).copied()
  }

  /// Storing [`Plan::None`] is the same as invalidating the entry.
  pub fn set(&mut self, pair: CanonicalPair, plan: Plan) {
    if plan.is_supported() {
      self.plans.insert(pair, plan);
    } else {
      self.plans.remove(&pair);
    }
  }

  /// Drops the entry for `pair`, returning the plan it held.
  pub fn invalidate(&mut self, pair: &CanonicalPair) -> Option<Plan> {
    self.plans.remove(pair)
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.plans.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.plans.is_empty()
  }
}
