use std::collections::HashSet;
use std::fmt::Display;

use anchor_lang::prelude::*;

use crate::error::CoreError::{Unauthorized, ZeroAddress};

/// Privilege levels gating administrative operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
  /// Sets the max staleness window.
  SuperAdmin,
  /// Manages the USD set, aliases and pair support.
  Admin,
}

impl Display for Role {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Role::SuperAdmin => f.write_str("super_admin"),
      Role::Admin => f.write_str("admin"),
    }
  }
}

/// Decides whether a caller holds a role.
pub trait Authority {
  fn is_authorized(&self, caller: &Pubkey, role: Role) -> bool;

  fn require(&self, caller: &Pubkey, role: Role) -> Result<()> {
    if self.is_authorized(caller, role) {
      Ok(())
    } else {
      Err(Unauthorized.into())
    }
  }
}

impl<F: Fn(&Pubkey, Role) -> bool> Authority for F {
  fn is_authorized(&self, caller: &Pubkey, role: Role) -> bool {
    self(caller, role)
  }
}

/// One super admin plus a set of admins. The super admin holds both roles.
#[derive(Clone, Debug)]
pub struct RoleTable {
  super_admin: Pubkey,
  admins: HashSet<Pubkey>,
}

impl RoleTable {
  pub fn new(super_admin: Pubkey, admins: &[Pubkey]) -> Result<RoleTable> {
    if super_admin == Pubkey::default() {
      Err(ZeroAddress.into())
    } else {
      Ok(RoleTable {
        super_admin,
        admins: admins.iter().copied().collect(),
      })
    }
  }

  #[must_use]
  pub fn super_admin(&self) -> Pubkey {
    self.super_admin
  }

  pub fn grant_admin(&mut self, caller: &Pubkey, admin: Pubkey) -> Result<()> {
    self.require(caller, Role::SuperAdmin)?;
    self.admins.insert(admin);
    Ok(())
  }

  pub fn revoke_admin(&mut self, caller: &Pubkey, admin: &Pubkey) -> Result<()> {
    self.require(caller, Role::SuperAdmin)?;
    self.admins.remove(admin);
    Ok(())
  }
}

impl Authority for RoleTable {
  fn is_authorized(&self, caller: &Pubkey, role: Role) -> bool {
    *caller == self.super_admin
      || (role == Role::Admin && self.admins.contains(caller))
  }
}
