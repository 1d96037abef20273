use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Months, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::classify::{LineClass, classify_line};
use super::types::{Invoice, ServiceName};

/// Relative date window over the working set, anchored to an explicit
/// `now`; nothing in here reads the clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeFilter {
    #[default]
    All,
    LastTwelveMonths,
    LastSixMonths,
    /// The six months before the most recent six, for period-on-period
    /// comparison.
    PreviousSixMonths,
}

impl RangeFilter {
    pub fn contains(self, now: NaiveDateTime, date: NaiveDateTime) -> bool {
        match self {
            RangeFilter::All => true,
            RangeFilter::LastTwelveMonths => date >= months_back(now, 12),
            RangeFilter::LastSixMonths => date >= months_back(now, 6),
            RangeFilter::PreviousSixMonths => {
                date >= months_back(now, 12) && date < months_back(now, 6)
            }
        }
    }
}

/// Month arithmetic clamps at month ends (31 Mar - 1 month = 28/29 Feb).
fn months_back(now: NaiveDateTime, months: u32) -> NaiveDateTime {
    now.checked_sub_months(Months::new(months)).unwrap_or(now)
}

/// What the working-set view shows: a relative window plus an optional
/// case-insensitive search over invoice number, reference and line
/// names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewFilter {
    pub range: RangeFilter,
    pub search: Option<String>,
}

/// Filter the batch down to the visible working set, preserving order.
///
/// Invoices with no effective date pass `All` but fail every relative
/// window; an undated invoice cannot claim to be recent.
pub fn filter_invoices<'a>(
    batch: &'a [Invoice],
    filter: &ViewFilter,
    now: NaiveDateTime,
) -> Vec<&'a Invoice> {
    let needle = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    batch
        .iter()
        .filter(|invoice| match invoice.effective_date() {
            Some(date) => filter.range.contains(now, date),
            None => filter.range == RangeFilter::All,
        })
        .filter(|invoice| {
            needle
                .as_deref()
                .is_none_or(|needle| matches_search(invoice, needle))
        })
        .collect()
}

fn matches_search(invoice: &Invoice, lowercase_needle: &str) -> bool {
    let mut hay = String::new();
    hay.push_str(&invoice.invoice_number);
    hay.push(' ');
    hay.push_str(&invoice.reference);
    for item in &invoice.items {
        hay.push(' ');
        hay.push_str(&item.name);
    }
    hay.to_lowercase().contains(lowercase_needle)
}

/// Headline numbers over a set of invoices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub invoices: usize,
    /// Sum of invoice totals as stated by the feed, tax inclusive.
    pub amount_total: Decimal,
    pub tax_total: Decimal,
    pub paid: usize,
    pub unpaid: usize,
}

pub fn batch_stats<'a, I>(invoices: I) -> BatchStats
where
    I: IntoIterator<Item = &'a Invoice>,
{
    let mut stats = BatchStats {
        invoices: 0,
        amount_total: Decimal::ZERO,
        tax_total: Decimal::ZERO,
        paid: 0,
        unpaid: 0,
    };
    for invoice in invoices {
        stats.invoices += 1;
        // Sums over unvetted feed amounts saturate.
        stats.amount_total = stats.amount_total.saturating_add(invoice.amount);
        stats.tax_total = stats.tax_total.saturating_add(invoice.tax);
        if invoice.paid {
            stats.paid += 1;
        } else {
            stats.unpaid += 1;
        }
    }
    stats
}

/// Calendar month key, ordered chronologically, displayed `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDateTime) -> Self {
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Invoice spend per calendar month of the effective date, tax
/// inclusive. Undated invoices are skipped.
pub fn monthly_totals<'a, I>(invoices: I) -> BTreeMap<MonthKey, Decimal>
where
    I: IntoIterator<Item = &'a Invoice>,
{
    let mut totals = BTreeMap::new();
    for invoice in invoices {
        let Some(date) = invoice.effective_date() else {
            continue;
        };
        let month = totals.entry(MonthKey::of(date)).or_insert(Decimal::ZERO);
        *month = month.saturating_add(invoice.amount);
    }
    totals
}

/// One service's primary-line spend across the working set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpend {
    pub service: ServiceName,
    pub amount: Decimal,
}

/// Rank services by the raw amounts of their primary lines, largest
/// first, capped at `limit`. Add-on lines don't count; attribution by
/// proximity is too noisy for a ranking.
pub fn top_services<'a, I>(invoices: I, limit: usize) -> Vec<ServiceSpend>
where
    I: IntoIterator<Item = &'a Invoice>,
{
    let mut spend: BTreeMap<ServiceName, Decimal> = BTreeMap::new();
    for invoice in invoices {
        for item in &invoice.items {
            if let LineClass::Primary { service } = classify_line(&item.name) {
                let total = spend.entry(service).or_insert(Decimal::ZERO);
                *total = total.saturating_add(item.amount);
            }
        }
    }

    let mut ranked: Vec<ServiceSpend> = spend
        .into_iter()
        .map(|(service, amount)| ServiceSpend { service, amount })
        .collect();
    // Stable sort keeps ties in name order.
    ranked.sort_by(|a, b| b.amount.cmp(&a.amount));
    ranked.truncate(limit);
    ranked
}
