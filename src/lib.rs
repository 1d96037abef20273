//! # billfold
//!
//! Hosting-invoice analysis library: per-line GST allocation from
//! invoice-level totals, service grouping by line-name conventions,
//! service status resolution, and cross-invoice cost queries.
//!
//! All monetary values use [`rust_decimal::Decimal`] at the API boundary
//! and integer cents ([`Cents`]) internally, never floating point.
//! Tax figures are only reported per line when the invoice's own totals
//! back them; otherwise the blocked state travels with the result.
//!
//! ## Quick Start
//!
//! ```rust
//! use billfold::core::*;
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//!
//! let invoice = InvoiceBuilder::new(4821, "118220")
//!     .created(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(10, 0, 0).unwrap())
//!     .amount(dec!(121.00))
//!     .tax(dec!(11.00))
//!     .add_item(InvoiceItem::new(
//!         "web-01 / Server Operating System: Ubuntu 22.04",
//!         dec!(100.00),
//!     ))
//!     .add_item(InvoiceItem::new("Backup (4 hours)", dec!(10.00)))
//!     .build();
//!
//! let model = build_tax_model(&invoice);
//! assert!(model.is_reconciled());
//!
//! let report = ServiceQuery::new("web-01").run(&[invoice]);
//! assert_eq!(report.totals.inc, dec!(121.00));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Tax allocation, grouping, status, queries, analytics |
//! | `feed` | Feed payload normalization and pagination planning |
//! | `export` | CSV export of query results |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "feed")]
pub mod feed;

#[cfg(feature = "export")]
pub mod export;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
