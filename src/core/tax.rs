use std::fmt;

use serde::{Deserialize, Serialize};

use super::classify::is_credit_like;
use super::money::{Cents, distribute_remainder};
use super::types::Invoice;

/// A condition that blocks per-line tax allocation for an invoice.
///
/// The gate reports every tripped condition, not just the first, so a
/// caller can show the full picture at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationBlock {
    /// A line amount or the invoice tax is negative.
    NegativeAmount,
    /// A line name reads as a credit, discount, refund or adjustment.
    CreditLikeLine,
    /// A line is flagged as already including tax.
    TaxInclusiveLine,
    /// Line subtotal plus tax is more than one cent away from the
    /// invoice total. `diff` is `subtotal + tax - total`.
    TotalMismatch { diff: Cents },
    /// The invoice-level tax is more than one cent away from flat 10%
    /// GST on the subtotal.
    RateMismatch { expected: Cents, actual: Cents },
}

impl fmt::Display for AllocationBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationBlock::NegativeAmount => write!(f, "negative line or tax amount"),
            AllocationBlock::CreditLikeLine => write!(f, "credit-like line item present"),
            AllocationBlock::TaxInclusiveLine => write!(f, "tax-inclusive line item present"),
            AllocationBlock::TotalMismatch { diff } => {
                write!(f, "subtotal + tax differs from total by {diff}")
            }
            AllocationBlock::RateMismatch { expected, actual } => {
                write!(f, "tax {actual} is not flat 10% GST (expected {expected})")
            }
        }
    }
}

/// Outcome of the allocation safety gate.
///
/// There is no partially-trusted state: either every line has a GST
/// figure that reconciles to the invoice total, or no line does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Allocation {
    /// Per-line GST in cents, index-aligned with the invoice items.
    Reconciled {
        gst: Vec<Cents>,
        /// Remainder the step cap left undistributed. Zero unless the
        /// invoice tax is more than two cents per line away from the
        /// provisional split, which the rate gate rules out in practice.
        residual: Cents,
    },
    /// The gate refused. Consumers fall back to ex-tax display or a
    /// flat 10% estimate, never to invoice-level tax presented as
    /// per-line truth.
    Blocked { blocks: Vec<AllocationBlock> },
}

/// Integer-cents view of one invoice plus its allocation outcome.
///
/// Derived on demand and thrown away with the render pass; nothing
/// caches it, so nothing can hold a stale one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxModel {
    /// Sum of the line amounts.
    pub subtotal: Cents,
    /// Invoice-level tax.
    pub tax: Cents,
    /// Invoice total as stated by the feed.
    pub total: Cents,
    pub allocation: Allocation,
}

impl TaxModel {
    pub fn is_reconciled(&self) -> bool {
        matches!(self.allocation, Allocation::Reconciled { .. })
    }

    /// GST for one line. `None` when the allocation is blocked or the
    /// index is out of range. Callers must branch; there is no zero
    /// default to mistake for a real figure.
    pub fn line_gst(&self, index: usize) -> Option<Cents> {
        match &self.allocation {
            Allocation::Reconciled { gst, .. } => gst.get(index).copied(),
            Allocation::Blocked { .. } => None,
        }
    }

    /// Undistributed remainder, zero when blocked.
    pub fn residual(&self) -> Cents {
        match &self.allocation {
            Allocation::Reconciled { residual, .. } => *residual,
            Allocation::Blocked { .. } => Cents::ZERO,
        }
    }

    /// Gate conditions that blocked allocation, empty when reconciled.
    pub fn blocks(&self) -> &[AllocationBlock] {
        match &self.allocation {
            Allocation::Reconciled { .. } => &[],
            Allocation::Blocked { blocks } => blocks,
        }
    }
}

/// Derive the per-line GST allocation for one invoice.
///
/// The feed only guarantees invoice-level `amount` and `tax`; this
/// reconstructs a per-line split that reconciles exactly to those
/// totals, or refuses when the invoice does not look like a plain
/// flat-10%-GST document:
///
/// 1. Everything is converted to integer cents.
/// 2. The safety gate checks for negative amounts, credit-like lines,
///    tax-inclusive lines, a subtotal/tax/total mismatch beyond one
///    cent, and a tax figure that is not 10% of the subtotal within one
///    cent.
/// 3. When safe, each line gets `round(line × 10%)` and the rounding
///    remainder is spread one cent at a time, largest line first.
pub fn build_tax_model(invoice: &Invoice) -> TaxModel {
    let line_cents: Vec<Cents> = invoice
        .items
        .iter()
        .map(|item| Cents::from_decimal(item.amount))
        .collect();
    let subtotal: Cents = line_cents.iter().copied().sum();
    let tax = Cents::from_decimal(invoice.tax);
    let total = Cents::from_decimal(invoice.amount);

    let mut blocks = Vec::new();

    if tax.is_negative() || line_cents.iter().any(|c| c.is_negative()) {
        blocks.push(AllocationBlock::NegativeAmount);
    }
    if invoice.items.iter().any(|item| is_credit_like(&item.name)) {
        blocks.push(AllocationBlock::CreditLikeLine);
    }
    if invoice.items.iter().any(|item| item.amount_includes_tax) {
        blocks.push(AllocationBlock::TaxInclusiveLine);
    }

    let diff = subtotal + tax - total;
    if diff.abs() > Cents::new(1) {
        blocks.push(AllocationBlock::TotalMismatch { diff });
    }

    let expected = subtotal.flat_gst();
    if (tax - expected).abs() > Cents::new(1) {
        blocks.push(AllocationBlock::RateMismatch {
            expected,
            actual: tax,
        });
    }

    let allocation = if blocks.is_empty() {
        let provisional: Vec<Cents> = line_cents.iter().map(|c| c.flat_gst()).collect();
        let allocated: Cents = provisional.iter().copied().sum();
        let spread = distribute_remainder(&line_cents, tax - allocated);
        let gst = provisional
            .iter()
            .zip(&spread.deltas)
            .map(|(g, d)| *g + *d)
            .collect();
        Allocation::Reconciled {
            gst,
            residual: spread.residual,
        }
    } else {
        Allocation::Blocked { blocks }
    };

    TaxModel {
        subtotal,
        tax,
        total,
        allocation,
    }
}
