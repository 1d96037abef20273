use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::group::{UNASSIGNED_ITEMS_LABEL, ordered_groups, row_name};
use super::money::Cents;
use super::tax::build_tax_model;
use super::types::{DateRange, Invoice, ServiceName};

/// Label for a segment opened by add-on rows with no preceding primary.
pub const UNASSIGNED_SEGMENT_LABEL: &str = "(unassigned segment)";

/// How a segment's tax figures were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxBasis {
    /// From a reconciled per-line allocation.
    Derived,
    /// Flat 10% of each line, because the allocation was blocked for
    /// this invoice. Surfaced so a report never passes an estimate off
    /// as derived truth.
    Estimated,
}

/// One inferred billing unit for a service: a primary charge plus the
/// add-ons that followed it within one invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySegment {
    /// Effective date of the owning invoice.
    pub date: NaiveDateTime,
    pub invoice_number: String,
    pub invoice_id: i64,
    pub service: ServiceName,
    /// Display name of the primary line that opened the segment, or
    /// [`UNASSIGNED_SEGMENT_LABEL`].
    pub primary_label: String,
    /// Display names of the absorbed add-on lines, in invoice order.
    pub addons: Vec<String>,
    pub ex: Decimal,
    pub tax: Decimal,
    pub inc: Decimal,
    pub paid: bool,
    pub basis: TaxBasis,
}

/// Sums over a whole query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryTotals {
    pub segments: usize,
    pub ex: Decimal,
    pub tax: Decimal,
    pub inc: Decimal,
}

/// Result of one service cost query: segments sorted newest first,
/// plus their totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostReport {
    pub segments: Vec<QuerySegment>,
    pub totals: QueryTotals,
}

/// A service cost query: which service, over which dates.
///
/// Everything the query needs travels in this context and the batch
/// argument; there is no ambient session state to consult.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceQuery {
    pub service: ServiceName,
    pub range: DateRange,
}

impl ServiceQuery {
    pub fn new(service: impl Into<ServiceName>) -> Self {
        ServiceQuery {
            service: service.into(),
            range: DateRange::UNBOUNDED,
        }
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    /// Walk the batch and re-segment every matching invoice.
    ///
    /// Invoices without an effective date are skipped; each remaining
    /// in-range invoice gets a fresh [`TaxModel`] and the same ordered
    /// grouping the detail view uses. Within a matching group, the
    /// primary row opens a segment and the add-ons behind it fold into
    /// that segment's totals. Add-ons with no primary in front of them
    /// open a placeholder segment instead of being dropped.
    pub fn run(&self, batch: &[Invoice]) -> CostReport {
        let mut segments: Vec<QuerySegment> = Vec::new();

        for invoice in batch {
            let Some(date) = invoice.effective_date() else {
                continue;
            };
            if !self.range.contains(date) {
                continue;
            }

            let model = build_tax_model(invoice);
            let basis = if model.is_reconciled() {
                TaxBasis::Derived
            } else {
                TaxBasis::Estimated
            };

            for group in ordered_groups(&invoice.items) {
                let group_name = group
                    .service
                    .as_ref()
                    .map(ServiceName::as_str)
                    .unwrap_or(UNASSIGNED_ITEMS_LABEL);
                if group_name != self.service.as_str() {
                    continue;
                }

                let mut open: Option<SegmentDraft> = None;

                for (position, &line_index) in group.line_indices.iter().enumerate() {
                    let item = &invoice.items[line_index];
                    // A service group has its primary at the front;
                    // the fallback group has none at all.
                    let is_primary = group.service.is_some() && position == 0;

                    let draft = if is_primary {
                        if let Some(done) = open.take() {
                            segments.push(done.finish(invoice, date, &self.service, basis));
                        }
                        open.insert(SegmentDraft::opened_by(row_name(&item.name)))
                    } else {
                        open.get_or_insert_with(SegmentDraft::unassigned)
                    };

                    let ex = Cents::from_decimal(item.amount);
                    let tax = model.line_gst(line_index).unwrap_or_else(|| ex.flat_gst());
                    draft.ex += ex;
                    draft.tax += tax;
                    if !is_primary {
                        draft.addons.push(row_name(&item.name));
                    }
                }

                if let Some(done) = open.take() {
                    segments.push(done.finish(invoice, date, &self.service, basis));
                }
            }
        }

        segments.sort_by(|a, b| b.date.cmp(&a.date));

        let mut ex = Cents::ZERO;
        let mut tax = Cents::ZERO;
        for segment in &segments {
            ex += Cents::from_decimal(segment.ex);
            tax += Cents::from_decimal(segment.tax);
        }

        let totals = QueryTotals {
            segments: segments.len(),
            ex: ex.to_decimal(),
            tax: tax.to_decimal(),
            inc: (ex + tax).to_decimal(),
        };

        CostReport { segments, totals }
    }
}

struct SegmentDraft {
    primary_label: String,
    addons: Vec<String>,
    ex: Cents,
    tax: Cents,
}

impl SegmentDraft {
    fn opened_by(primary_label: String) -> Self {
        SegmentDraft {
            primary_label,
            addons: Vec::new(),
            ex: Cents::ZERO,
            tax: Cents::ZERO,
        }
    }

    fn unassigned() -> Self {
        SegmentDraft::opened_by(UNASSIGNED_SEGMENT_LABEL.to_owned())
    }

    fn finish(
        self,
        invoice: &Invoice,
        date: NaiveDateTime,
        service: &ServiceName,
        basis: TaxBasis,
    ) -> QuerySegment {
        QuerySegment {
            date,
            invoice_number: invoice.invoice_number.clone(),
            invoice_id: invoice.invoice_id,
            service: service.clone(),
            primary_label: self.primary_label,
            addons: self.addons,
            ex: self.ex.to_decimal(),
            tax: self.tax.to_decimal(),
            inc: (self.ex + self.tax).to_decimal(),
            paid: invoice.paid,
            basis,
        }
    }
}
