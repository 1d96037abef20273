use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One invoice as delivered by the billing provider's feed.
///
/// Everything here is upstream data taken at face value. The feed only
/// guarantees invoice-level totals; per-line tax is inferred later by
/// [`build_tax_model`](crate::core::build_tax_model) and friends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Provider-side numeric identifier.
    pub invoice_id: i64,
    /// Display invoice number (not necessarily unique across providers).
    pub invoice_number: String,
    /// Free-text reference / description, often empty.
    pub reference: String,
    /// Issue timestamp. `None` when the feed value was unparseable.
    pub created: Option<NaiveDateTime>,
    /// Due timestamp.
    pub date_due: Option<NaiveDateTime>,
    /// Record-creation timestamp, a fallback some feeds send instead of `created`.
    pub created_at: Option<NaiveDateTime>,
    /// Invoice total, tax inclusive.
    pub amount: Decimal,
    /// Invoice-level tax total. Lines carry no tax of their own.
    pub tax: Decimal,
    /// Whether the provider marks the invoice paid.
    pub paid: bool,
    /// Provider download link for the PDF, when offered.
    pub download_url: Option<String>,
    /// Ordered line items, exactly as the feed listed them.
    pub items: Vec<InvoiceItem>,
}

impl Invoice {
    /// The date this invoice is filed under: `created`, else `date_due`,
    /// else `created_at`. `None` when the feed gave no usable date; such
    /// invoices are skipped by date-scoped queries, never defaulted to
    /// "now".
    pub fn effective_date(&self) -> Option<NaiveDateTime> {
        self.created.or(self.date_due).or(self.created_at)
    }
}

/// One line item on an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Display name. Carries encoded metadata: the primary-line marker,
    /// billing period and hour counts all live in this string.
    pub name: String,
    /// The line's own total.
    pub amount: Decimal,
    /// Provider flag that `amount` already includes tax. Tax allocation
    /// refuses to run when any line sets this.
    pub amount_includes_tax: bool,
}

impl InvoiceItem {
    pub fn new(name: impl Into<String>, amount: Decimal) -> Self {
        InvoiceItem {
            name: name.into(),
            amount,
            amount_includes_tax: false,
        }
    }

    /// Mark the amount as tax inclusive.
    pub fn tax_inclusive(mut self) -> Self {
        self.amount_includes_tax = true;
        self
    }
}

/// Canonical name of an inferred service, as produced by
/// [`canonical_service_name`](crate::core::canonical_service_name).
///
/// Used as the key for status maps and query contexts; ordering is
/// plain lexicographic so selector lists come out sorted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn new(name: impl Into<String>) -> Self {
        ServiceName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceName {
    fn from(name: &str) -> Self {
        ServiceName(name.to_owned())
    }
}

impl From<String> for ServiceName {
    fn from(name: String) -> Self {
        ServiceName(name)
    }
}

/// Inclusive datetime range, open on either end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl DateRange {
    /// Matches every date.
    pub const UNBOUNDED: DateRange = DateRange {
        from: None,
        to: None,
    };

    pub fn new(from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) -> Self {
        DateRange { from, to }
    }

    /// Expand calendar dates to a full-day range: `from` starts at
    /// midnight, `to` ends at 23:59:59.
    pub fn day_bounds(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        let day_end = NaiveTime::from_hms_opt(23, 59, 59).expect("hardcoded time is valid");
        DateRange {
            from: from.map(|d| d.and_time(NaiveTime::MIN)),
            to: to.map(|d| d.and_time(day_end)),
        }
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.from.is_none_or(|f| at >= f) && self.to.is_none_or(|t| at <= t)
    }
}
