//! Core invoice analysis: money, classification, tax allocation,
//! grouping, status resolution and segmentation queries.
//!
//! Everything in here is pure and derived on demand: feed an invoice
//! batch in, get structured results back. Nothing is cached between
//! calls, so nothing can go stale.

mod analytics;
mod builder;
mod classify;
mod error;
mod group;
mod money;
mod query;
mod status;
mod tax;
mod types;

pub use analytics::*;
pub use builder::*;
pub use classify::*;
pub use error::*;
pub use group::*;
pub use money::*;
pub use query::*;
pub use status::*;
pub use tax::*;
pub use types::*;
