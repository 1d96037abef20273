use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::types::{Invoice, InvoiceItem};

/// Builder for assembling invoices by hand.
///
/// Feed records normally arrive through `feed::parse_batch`; the
/// builder is for tests, demos and callers with invoices from other
/// sources. It never validates: a questionable invoice is exactly
/// what the allocation safety gate exists to judge, so nothing is
/// rejected here.
///
/// ```
/// use billfold::core::{InvoiceBuilder, InvoiceItem};
/// use rust_decimal_macros::dec;
///
/// let invoice = InvoiceBuilder::new(1042, "INV-1042")
///     .amount(dec!(121.00))
///     .tax(dec!(11.00))
///     .paid(true)
///     .add_item(InvoiceItem::new(
///         "web-01 / Server Operating System: Ubuntu 22.04",
///         dec!(100.00),
///     ))
///     .add_item(InvoiceItem::new("Backup add-on", dec!(10.00)))
///     .build();
///
/// assert_eq!(invoice.items.len(), 2);
/// assert!(invoice.effective_date().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct InvoiceBuilder {
    invoice: Invoice,
}

impl InvoiceBuilder {
    pub fn new(invoice_id: i64, invoice_number: impl Into<String>) -> Self {
        InvoiceBuilder {
            invoice: Invoice {
                invoice_id,
                invoice_number: invoice_number.into(),
                reference: String::new(),
                created: None,
                date_due: None,
                created_at: None,
                amount: Decimal::ZERO,
                tax: Decimal::ZERO,
                paid: false,
                download_url: None,
                items: Vec::new(),
            },
        }
    }

    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.invoice.reference = reference.into();
        self
    }

    pub fn created(mut self, created: NaiveDateTime) -> Self {
        self.invoice.created = Some(created);
        self
    }

    pub fn date_due(mut self, date_due: NaiveDateTime) -> Self {
        self.invoice.date_due = Some(date_due);
        self
    }

    pub fn created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.invoice.created_at = Some(created_at);
        self
    }

    /// Invoice total, tax inclusive.
    pub fn amount(mut self, amount: Decimal) -> Self {
        self.invoice.amount = amount;
        self
    }

    /// Invoice-level tax.
    pub fn tax(mut self, tax: Decimal) -> Self {
        self.invoice.tax = tax;
        self
    }

    pub fn paid(mut self, paid: bool) -> Self {
        self.invoice.paid = paid;
        self
    }

    pub fn download_url(mut self, url: impl Into<String>) -> Self {
        self.invoice.download_url = Some(url.into());
        self
    }

    pub fn add_item(mut self, item: InvoiceItem) -> Self {
        self.invoice.items.push(item);
        self
    }

    pub fn build(self) -> Invoice {
        self.invoice
    }
}
