//! Invoice feed ingestion: payload normalization and pagination.
//!
//! The feed delivers JSON pages in one of several envelope shapes that
//! changed across API revisions. [`parse_batch`] accepts every known
//! shape and maps wire field names onto [`Invoice`]; [`Pager`] produces
//! the page numbers to request and decides when the walk is done.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::core::{BillfoldError, Invoice, InvoiceItem};

/// Envelope keys tried in order when the payload is an object.
const ENVELOPE_KEYS: [&str; 3] = ["invoices", "items", "data"];

/// One invoice record as the feed spells it. Wire names differ from
/// [`Invoice`] (`invoice_items`, `invoice_download_url`) and nearly
/// every field is optional on the wire.
#[derive(Debug, Deserialize)]
struct RawInvoice {
    invoice_id: Option<i64>,
    invoice_number: Option<String>,
    reference: Option<String>,
    created: Option<String>,
    date_due: Option<String>,
    created_at: Option<String>,
    amount: Option<Decimal>,
    tax: Option<Decimal>,
    paid: Option<bool>,
    invoice_download_url: Option<String>,
    invoice_items: Option<Vec<RawItem>>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    name: Option<String>,
    amount: Option<Decimal>,
    amount_includes_tax: Option<bool>,
}

impl RawInvoice {
    fn into_invoice(self) -> Invoice {
        Invoice {
            invoice_id: self.invoice_id.unwrap_or(0),
            invoice_number: self.invoice_number.unwrap_or_default(),
            reference: self.reference.unwrap_or_default(),
            created: self.created.as_deref().and_then(parse_feed_datetime),
            date_due: self.date_due.as_deref().and_then(parse_feed_datetime),
            created_at: self.created_at.as_deref().and_then(parse_feed_datetime),
            amount: self.amount.unwrap_or_default(),
            tax: self.tax.unwrap_or_default(),
            paid: self.paid.unwrap_or(false),
            download_url: self.invoice_download_url,
            items: self
                .invoice_items
                .unwrap_or_default()
                .into_iter()
                .map(RawItem::into_item)
                .collect(),
        }
    }
}

impl RawItem {
    fn into_item(self) -> InvoiceItem {
        InvoiceItem {
            name: self.name.unwrap_or_default(),
            amount: self.amount.unwrap_or_default(),
            amount_includes_tax: self.amount_includes_tax.unwrap_or(false),
        }
    }
}

/// Parse one feed page into invoices.
///
/// Accepts the four payload shapes the feed has used: a bare array of
/// records, or an object wrapping the array under `invoices`, `items`
/// or `data` (tried in that order). A payload that parses as JSON but
/// matches none of these yields an empty batch, not an error.
///
/// Missing record fields take defaults: zero amounts, unpaid, no items,
/// no dates. Unparseable date strings become `None` on the invoice.
///
/// # Errors
///
/// Returns [`BillfoldError::Feed`] when the payload is not valid JSON
/// and [`BillfoldError::Record`] when a record field has the wrong type.
pub fn parse_batch(json: &str) -> Result<Vec<Invoice>, BillfoldError> {
    let payload: Value =
        serde_json::from_str(json).map_err(|e| BillfoldError::Feed(e.to_string()))?;

    let records = match &payload {
        Value::Array(records) => records.as_slice(),
        Value::Object(map) => {
            match ENVELOPE_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_array))
            {
                Some(records) => records.as_slice(),
                None => return Ok(Vec::new()),
            }
        }
        _ => return Ok(Vec::new()),
    };

    records
        .iter()
        .map(|record| {
            RawInvoice::deserialize(record)
                .map(RawInvoice::into_invoice)
                .map_err(|e| BillfoldError::Record(e.to_string()))
        })
        .collect()
}

/// Parse one feed timestamp.
///
/// Tries RFC 3339 first (the offset is dropped and the local clock time
/// kept; the feed is single-timezone and stamps are only ever compared
/// with each other), then a bare `YYYY-MM-DDTHH:MM:SS` stamp with an
/// optional fraction, then a plain date at midnight. Anything else is
/// `None`, never "now" and never an epoch default.
pub fn parse_feed_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Page-walk parameters for the paginated feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    /// Records requested per page.
    pub page_size: u32,
    /// Hard ceiling on pages fetched in one walk.
    pub max_pages: u32,
}

impl Default for PagePlan {
    fn default() -> Self {
        PagePlan {
            page_size: 100,
            max_pages: 200,
        }
    }
}

/// Tracks progress through the feed's numbered pages.
///
/// The fetch loop asks [`next_page`](Pager::next_page) which page to
/// request, then reports via [`record`](Pager::record) how many records
/// the page held. The walk ends on an empty page, a page shorter than
/// [`PagePlan::page_size`], or at [`PagePlan::max_pages`].
#[derive(Debug, Clone)]
pub struct Pager {
    plan: PagePlan,
    fetched: u32,
    done: bool,
}

impl Pager {
    pub fn new(plan: PagePlan) -> Self {
        Pager {
            plan,
            fetched: 0,
            done: false,
        }
    }

    /// Page number to request next, starting at 1. `None` once the feed
    /// is exhausted.
    pub fn next_page(&self) -> Option<u32> {
        if self.done { None } else { Some(self.fetched + 1) }
    }

    /// Record how many records the just-fetched page held.
    pub fn record(&mut self, received: usize) {
        if received == 0 {
            self.done = true;
            return;
        }
        self.fetched += 1;
        if received < self.plan.page_size as usize || self.fetched >= self.plan.max_pages {
            self.done = true;
        }
    }

    /// Pages fetched so far, empty pages not counted.
    pub fn pages_fetched(&self) -> u32 {
        self.fetched
    }
}

impl Default for Pager {
    fn default() -> Self {
        Pager::new(PagePlan::default())
    }
}
