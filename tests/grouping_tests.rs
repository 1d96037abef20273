use billfold::core::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn hosting_invoice(items: Vec<InvoiceItem>, tax: Decimal, amount: Decimal) -> Invoice {
    let mut builder = InvoiceBuilder::new(11, "INV-11").amount(amount).tax(tax);
    for item in items {
        builder = builder.add_item(item);
    }
    builder.build()
}

fn os_line(service: &str, amount: Decimal) -> InvoiceItem {
    InvoiceItem::new(
        format!("{service} / Server Operating System: Ubuntu 22.04"),
        amount,
    )
}

#[test]
fn detail_groups_cover_every_line_and_sum_to_the_total() {
    let inv = hosting_invoice(
        vec![
            InvoiceItem::new("Domain renewal", dec!(15.00)),
            InvoiceItem::new(
                "web-01 / Server Operating System: Ubuntu 22.04 (1 May 2024 to 31 May 2024 - 744 hours)",
                dec!(50.00),
            ),
            InvoiceItem::new("Extra IPv4 address", dec!(3.00)),
            InvoiceItem::new(
                "db-01 / Server Operating System: Debian 12 (1 May 2024 to 31 May 2024 - 744 hours)",
                dec!(80.00),
            ),
            InvoiceItem::new("Snapshot storage (20 hours)", dec!(2.00)),
            InvoiceItem::new("Offsite backup", dec!(10.00)),
        ],
        dec!(16.00),
        dec!(176.00),
    );

    let model = build_tax_model(&inv);
    assert!(model.is_reconciled());

    let groups = group_line_items(&inv.items, &model);
    assert_eq!(groups.len(), 3);

    // Largest inc total first: db-01 (101.20), web-01 (58.30), then the
    // leading lines in the general bucket (16.50).
    assert_eq!(groups[0].name, "db-01");
    assert_eq!(groups[0].ex_total, dec!(92.00));
    assert_eq!(groups[0].tax_total, dec!(9.20));
    assert_eq!(groups[0].inc_total, dec!(101.20));
    assert_eq!(
        groups[0].rows.iter().map(|r| r.line_index).collect::<Vec<_>>(),
        vec![3, 4, 5]
    );
    assert_eq!(groups[0].rows[0].role, LineRole::Primary);
    assert_eq!(groups[0].rows[1].role, LineRole::Addon);

    assert_eq!(groups[1].name, "web-01");
    assert_eq!(groups[1].inc_total, dec!(58.30));

    assert_eq!(groups[2].name, GENERAL_CHARGES_LABEL);
    assert_eq!(groups[2].kind, GroupKind::Fallback);
    assert_eq!(groups[2].inc_total, dec!(16.50));

    let inc_sum: Decimal = groups.iter().map(|g| g.inc_total).sum();
    assert_eq!(inc_sum, inv.amount);
}

#[test]
fn blocked_invoice_groups_show_ex_tax_only() {
    let inv = hosting_invoice(
        vec![
            os_line("web-01", dec!(90.00)),
            InvoiceItem::new("Service credit", dec!(10.00)),
        ],
        dec!(10.00),
        dec!(110.00),
    );

    let model = build_tax_model(&inv);
    assert!(!model.is_reconciled());

    let groups = group_line_items(&inv.items, &model);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].ex_total, dec!(100.00));
    assert_eq!(groups[0].tax_total, dec!(0.00));
    assert_eq!(groups[0].inc_total, dec!(100.00));
    assert!(groups[0].rows.iter().all(|r| r.inc == r.ex));
}

#[test]
fn encoded_metadata_is_stripped_from_the_group_name() {
    let inv = hosting_invoice(
        vec![InvoiceItem::new(
            "VPS Hosting - standard (1 May 2024 to 31 May 2024 - 744 hours) / Server Operating System: Ubuntu 22.04",
            dec!(40.00),
        )],
        dec!(4.00),
        dec!(44.00),
    );

    let groups = group_line_items(&inv.items, &build_tax_model(&inv));
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "VPS Hosting - standard");
    // The row keeps the full line name; only the group label is cut.
    assert!(groups[0].rows[0].name.contains("Server Operating System"));
}

#[test]
fn equal_totals_keep_first_seen_order() {
    let inv = hosting_invoice(
        vec![os_line("web-a", dec!(50.00)), os_line("web-b", dec!(50.00))],
        dec!(10.00),
        dec!(110.00),
    );

    let groups = group_line_items(&inv.items, &build_tax_model(&inv));
    assert_eq!(groups[0].name, "web-a");
    assert_eq!(groups[1].name, "web-b");
    assert_eq!(groups[0].inc_total, groups[1].inc_total);
}
