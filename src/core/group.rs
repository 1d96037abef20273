use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::classify::{LineClass, classify_line};
use super::money::Cents;
use super::tax::TaxModel;
use super::types::{InvoiceItem, ServiceName};

/// Fallback group label used by the invoice detail view.
pub const GENERAL_CHARGES_LABEL: &str = "General account charges";

/// Fallback group label used by status resolution and segmentation.
pub const UNASSIGNED_ITEMS_LABEL: &str = "Unassigned account items";

/// Display label for a nameless line item.
pub const UNNAMED_ITEM_LABEL: &str = "Unnamed item";

/// Row-level display name: trimmed, with nameless lines swapped for
/// [`UNNAMED_ITEM_LABEL`]. Whitespace-only names trim to empty rather
/// than taking the label.
pub(crate) fn row_name(raw: &str) -> String {
    if raw.is_empty() {
        UNNAMED_ITEM_LABEL.to_owned()
    } else {
        raw.trim().to_owned()
    }
}

/// Role of a row within its service group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineRole {
    Primary,
    Addon,
}

/// Whether a group is a real inferred service or the fallback bucket
/// for lines that precede any primary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupKind {
    Service,
    Fallback,
}

/// One line item as it appears in a service group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRow {
    /// Index of the line in the invoice's item list. Tax lookup is
    /// positional, so duplicate names and amounts cannot alias.
    pub line_index: usize,
    pub name: String,
    pub role: LineRole,
    pub ex: Decimal,
    pub tax: Decimal,
    pub inc: Decimal,
}

/// A cluster of invoice lines belonging to one inferred service.
///
/// When the invoice's allocation is blocked, every `tax` is zero and
/// `inc` equals `ex`: the detail view shows ex-tax amounts rather than
/// numbers it cannot back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceGroup {
    /// Canonical service name, or the fallback label.
    pub name: String,
    pub kind: GroupKind,
    pub ex_total: Decimal,
    pub tax_total: Decimal,
    pub inc_total: Decimal,
    pub rows: Vec<GroupRow>,
}

/// An ordered cluster of line indices, before any money is attached.
/// `service` is `None` for the fallback bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OrderedGroup {
    pub service: Option<ServiceName>,
    pub line_indices: Vec<usize>,
}

/// The ordering rule shared by the detail view and the segmentation
/// walk: a primary line starts a new group, every other line joins the
/// most recently started group, and lines before any primary collect
/// in a single fallback bucket at the front.
pub(crate) fn ordered_groups(items: &[InvoiceItem]) -> Vec<OrderedGroup> {
    let mut groups: Vec<OrderedGroup> = Vec::new();

    for (index, item) in items.iter().enumerate() {
        match classify_line(&item.name) {
            LineClass::Primary { service } => {
                groups.push(OrderedGroup {
                    service: Some(service),
                    line_indices: vec![index],
                });
            }
            LineClass::Addon => match groups.last_mut() {
                Some(group) => group.line_indices.push(index),
                None => groups.push(OrderedGroup {
                    service: None,
                    line_indices: vec![index],
                }),
            },
        }
    }

    groups
}

/// Group an invoice's line items into service clusters for display.
///
/// Per-line tax comes from the allocation when it reconciled; for a
/// blocked model tax is zero and the rows are ex-tax only. Groups come
/// back sorted by inc-tax total, largest first.
pub fn group_line_items(items: &[InvoiceItem], model: &TaxModel) -> Vec<ServiceGroup> {
    let mut groups: Vec<ServiceGroup> = ordered_groups(items)
        .into_iter()
        .map(|ordered| {
            let (name, kind) = match &ordered.service {
                Some(service) => (service.to_string(), GroupKind::Service),
                None => (GENERAL_CHARGES_LABEL.to_owned(), GroupKind::Fallback),
            };

            let mut ex_total = Cents::ZERO;
            let mut tax_total = Cents::ZERO;
            let mut rows = Vec::with_capacity(ordered.line_indices.len());

            for (position, &line_index) in ordered.line_indices.iter().enumerate() {
                let role = if kind == GroupKind::Service && position == 0 {
                    LineRole::Primary
                } else {
                    LineRole::Addon
                };
                let ex = Cents::from_decimal(items[line_index].amount);
                let tax = model.line_gst(line_index).unwrap_or(Cents::ZERO);
                ex_total += ex;
                tax_total += tax;
                rows.push(GroupRow {
                    line_index,
                    name: row_name(&items[line_index].name),
                    role,
                    ex: ex.to_decimal(),
                    tax: tax.to_decimal(),
                    inc: (ex + tax).to_decimal(),
                });
            }

            ServiceGroup {
                name,
                kind,
                ex_total: ex_total.to_decimal(),
                tax_total: tax_total.to_decimal(),
                inc_total: (ex_total + tax_total).to_decimal(),
                rows,
            }
        })
        .collect();

    groups.sort_by(|a, b| b.inc_total.cmp(&a.inc_total));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tax::build_tax_model;
    use crate::core::types::Invoice;
    use rust_decimal_macros::dec;

    fn primary(service: &str, amount: Decimal) -> InvoiceItem {
        InvoiceItem::new(
            format!("{service} / Server Operating System: Ubuntu 22.04"),
            amount,
        )
    }

    fn invoice(items: Vec<InvoiceItem>, tax: Decimal, amount: Decimal) -> Invoice {
        Invoice {
            invoice_id: 7,
            invoice_number: "INV-7".into(),
            reference: String::new(),
            created: None,
            date_due: None,
            created_at: None,
            amount,
            tax,
            paid: false,
            download_url: None,
            items,
        }
    }

    #[test]
    fn addons_follow_the_most_recent_primary() {
        let items = vec![
            primary("alpha", dec!(50.00)),
            InvoiceItem::new("Backup", dec!(5.00)),
            InvoiceItem::new("Extra IP", dec!(2.00)),
            primary("beta", dec!(80.00)),
            InvoiceItem::new("Snapshots", dec!(3.00)),
        ];
        let inv = invoice(items, dec!(14.00), dec!(154.00));
        let groups = group_line_items(&inv.items, &build_tax_model(&inv));

        assert_eq!(groups.len(), 2);
        // Sorted by inc total, largest first: beta (91.30) over alpha (62.70).
        assert_eq!(groups[0].name, "beta");
        assert_eq!(
            groups[0].rows.iter().map(|r| r.line_index).collect::<Vec<_>>(),
            vec![3, 4]
        );
        assert_eq!(groups[1].name, "alpha");
        assert_eq!(
            groups[1].rows.iter().map(|r| r.line_index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(groups[1].rows[0].role, LineRole::Primary);
        assert_eq!(groups[1].rows[1].role, LineRole::Addon);
    }

    #[test]
    fn leading_addons_fall_into_the_general_bucket() {
        let items = vec![
            InvoiceItem::new("Domain renewal", dec!(20.00)),
            InvoiceItem::new("DNS hosting", dec!(5.00)),
            primary("gamma", dec!(75.00)),
        ];
        let inv = invoice(items, dec!(10.00), dec!(110.00));
        let groups = group_line_items(&inv.items, &build_tax_model(&inv));

        assert_eq!(groups.len(), 2);
        let fallback = groups
            .iter()
            .find(|g| g.kind == GroupKind::Fallback)
            .expect("fallback group");
        assert_eq!(fallback.name, GENERAL_CHARGES_LABEL);
        assert_eq!(fallback.rows.len(), 2);
        assert!(fallback.rows.iter().all(|r| r.role == LineRole::Addon));
    }

    #[test]
    fn reconciled_group_totals_match_the_invoice() {
        let items = vec![
            primary("WebHost-1", dec!(100.00)),
            InvoiceItem::new("Backup add-on", dec!(10.00)),
        ];
        let inv = invoice(items, dec!(11.00), dec!(121.00));
        let groups = group_line_items(&inv.items, &build_tax_model(&inv));

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "WebHost-1");
        assert_eq!(groups[0].inc_total, dec!(110.00) + dec!(11.00));
        assert_eq!(groups[0].rows[0].inc, dec!(110.00));
        assert_eq!(groups[0].rows[1].inc, dec!(11.00));
    }

    #[test]
    fn blocked_model_shows_ex_tax_only() {
        let items = vec![
            primary("delta", dec!(100.00)),
            InvoiceItem::new("Loyalty discount", dec!(1.00)),
        ];
        // Credit-like line blocks allocation.
        let inv = invoice(items, dec!(10.10), dec!(111.10));
        let model = build_tax_model(&inv);
        assert!(!model.is_reconciled());

        let groups = group_line_items(&inv.items, &model);
        assert_eq!(groups[0].tax_total, dec!(0.00));
        assert_eq!(groups[0].inc_total, groups[0].ex_total);
        assert!(groups[0].rows.iter().all(|r| r.tax == dec!(0.00)));
    }

    #[test]
    fn empty_items_make_no_groups() {
        let inv = invoice(vec![], dec!(0), dec!(0));
        let groups = group_line_items(&inv.items, &build_tax_model(&inv));
        assert!(groups.is_empty());
    }

    #[test]
    fn nameless_lines_get_a_placeholder_name() {
        let items = vec![
            InvoiceItem::new("", dec!(4.00)),
            InvoiceItem::new("  Backup  ", dec!(6.00)),
        ];
        let inv = invoice(items, dec!(1.00), dec!(11.00));
        let groups = group_line_items(&inv.items, &build_tax_model(&inv));

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].rows[0].name, UNNAMED_ITEM_LABEL);
        assert_eq!(groups[0].rows[1].name, "Backup");
    }
}
