#![allow(clippy::missing_errors_doc)]
#![allow(clippy::wildcard_imports)]

pub mod alias_map;
pub mod authority;
pub mod classifier;
pub mod clock;
pub mod composer;
pub mod config;
pub mod denominations;
pub mod error;
pub mod feed;
pub mod notify;
pub mod pair;
pub mod plan;
pub mod plan_cache;
pub mod pyth;
pub mod router;
pub mod snapshot;
pub mod usd_registry;
pub mod util;
