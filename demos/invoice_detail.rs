use billfold::core::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn main() {
    // A monthly hosting invoice: two servers plus shared account charges.
    let invoice = InvoiceBuilder::new(118220, "118220")
        .created(
            NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
        .amount(dec!(130.90))
        .tax(dec!(11.90))
        .paid(true)
        .add_item(InvoiceItem::new(
            "Domain renewal: example.net.au",
            dec!(15.00),
        ))
        .add_item(InvoiceItem::new(
            "web-01 / Server Operating System: Ubuntu 22.04 (1 May 2024 to 31 May 2024 - 744 hours)",
            dec!(50.00),
        ))
        .add_item(InvoiceItem::new("Backup service", dec!(5.00)))
        .add_item(InvoiceItem::new(
            "db-01 / Server Operating System: Debian 12 (1 May 2024 to 31 May 2024 - 744 hours)",
            dec!(42.00),
        ))
        .add_item(InvoiceItem::new("Snapshot storage (48 hours)", dec!(7.00)))
        .build();

    let model = build_tax_model(&invoice);

    println!("Invoice: {}", invoice.invoice_number);
    println!("Amount:  {} (tax {})", invoice.amount, invoice.tax);
    if model.is_reconciled() {
        println!("Tax:     reconciled, allocated per line");
    } else {
        println!("Tax:     blocked, rows show ex-tax amounts");
        for block in model.blocks() {
            println!("         * {block}");
        }
    }

    for group in group_line_items(&invoice.items, &model) {
        println!("---");
        println!(
            "{}   ex {}  gst {}  inc {}",
            group.name, group.ex_total, group.tax_total, group.inc_total
        );
        for row in &group.rows {
            let marker = match row.role {
                LineRole::Primary => "*",
                LineRole::Addon => " ",
            };
            println!("  {marker} {:<72} {:>8}", row.name, row.inc);
        }
    }
}
