use std::collections::HashSet;

use anchor_lang::prelude::Pubkey;

/// Tokens priced as if pegged 1:1 to the USD reference during plan
/// selection.
#[derive(Clone, Debug, Default)]
pub struct UsdRegistry {
  tokens: HashSet<Pubkey>,
}

impl UsdRegistry {
  #[must_use]
  pub fn new() -> UsdRegistry {
    UsdRegistry::default()
  }

  #[must_use]
  pub fn is_usd(&self, token: Pubkey) -> bool {
    self.tokens.contains(&token)
  }

  pub fn add(&mut self, tokens: &[Pubkey]) {
    self.tokens.extend(tokens.iter().copied());
  }

  pub fn remove(&mut self, tokens: &[Pubkey]) {
    for token in tokens {
      self.tokens.remove(token);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn add_remove_idempotent() {
    let usdc = Pubkey::new_unique();
    let usdt = Pubkey::new_unique();
    let mut registry = UsdRegistry::new();
    registry.add(&[usdc, usdc]);
    registry.add(&[usdc]);
    assert!(registry.is_usd(usdc));
    registry.remove(&[usdt]);
    registry.remove(&[usdc]);
    registry.remove(&[usdc]);
    assert!(!registry.is_usd(usdc));
    assert!(!registry.is_usd(usdt));
  }

  #[test]
  fn empty_mutations_are_noops() {
    let usdc = Pubkey::new_unique();
    let mut registry = UsdRegistry::new();
    registry.add(&[usdc]);
    registry.add(&[]);
    registry.remove(&[]);
    assert!(registry.is_usd(usdc));
  }
}
