//! Async quoting over an upstream feed provider.
//!
//! [`QuoteService`] keeps a [`FeedRouter`](feedroute_core::router::FeedRouter)
//! behind a `tokio` read/write lock. A quote resolves the pair's cached
//! pricing route, reads its one to three feeds concurrently from a
//! [`FeedSource`], and composes the rate from that snapshot.
//!
//! # Example
//!
//! ```rust,no_run
//! use feedroute_core::authority::RoleTable;
//! use feedroute_core::config::RouterConfig;
//! use feedroute_core::notify::TracingNotifier;
//! use feedroute_core::router::FeedRouter;
//! use feedroute_core::snapshot::FeedSnapshot;
//! use feedroute_quotes::prelude::*;
//!
//! # async fn example(admin: Pubkey, token: Pubkey, usdc: Pubkey) -> Result<()> {
//! let config = RouterConfig::from_json(r#"{ "max_staleness_secs": 86400 }"#)?;
//! let roles = RoleTable::new(admin, &[])?;
//! let router = FeedRouter::from_config(&config, roles, TracingNotifier)?;
//! let source = RegistrySource::new(FeedSnapshot::new());
//! let service = QuoteService::new(source, router);
//!
//! service.router_mut().await.add_usd_stablecoins(&admin, &[usdc])?;
//! service.add_or_modify_support(&admin, token, usdc).await?;
//! let rate = service.quote(token, usdc).await?;
//! # Ok(())
//! # }
//! ```

mod clock;
mod feed_source;
mod prefetch;
pub mod prelude;
mod quote_service;

pub use clock::SystemClock;
pub use feed_source::{FeedSource, RegistrySource};
pub use prefetch::{fetch_route, probe_listings};
pub use quote_service::QuoteService;
