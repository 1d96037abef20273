use billfold::core::*;
use billfold::export::query_csv;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn period_item(month: u32) -> String {
    let span = match month {
        5 => "1 May 2024 to 31 May 2024 - 744 hours",
        6 => "1 June 2024 to 30 June 2024 - 720 hours",
        _ => "1 July 2024 to 31 July 2024 - 744 hours",
    };
    format!("web-01 / Server Operating System: Ubuntu 22.04 ({span})")
}

fn hosting_invoice(
    id: i64,
    number: &str,
    month: u32,
    amount: Decimal,
    tax: Decimal,
    paid: bool,
    items: Vec<(String, Decimal)>,
) -> Invoice {
    let mut builder = InvoiceBuilder::new(id, number)
        .created(
            NaiveDate::from_ymd_opt(2024, month, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
        .amount(amount)
        .tax(tax)
        .paid(paid);
    for (name, line_amount) in items {
        builder = builder.add_item(InvoiceItem::new(name, line_amount));
    }
    builder.build()
}

fn main() {
    let batch = vec![
        hosting_invoice(
            201,
            "118220",
            5,
            dec!(60.50),
            dec!(5.50),
            true,
            vec![
                (period_item(5), dec!(50.00)),
                ("Backup service".into(), dec!(5.00)),
            ],
        ),
        hosting_invoice(
            202,
            "118733",
            6,
            dec!(66.00),
            dec!(6.00),
            true,
            vec![
                (period_item(6), dec!(50.00)),
                ("Backup service".into(), dec!(5.00)),
                ("Extra IPv4 address".into(), dec!(5.00)),
            ],
        ),
        // The discount line blocks allocation, so this month's tax split
        // falls back to flat estimates.
        hosting_invoice(
            203,
            "119104",
            7,
            dec!(52.80),
            dec!(4.80),
            false,
            vec![
                (period_item(7), dec!(50.00)),
                ("Loyalty discount".into(), dec!(-2.00)),
            ],
        ),
    ];

    let report = ServiceQuery::new("web-01").run(&batch);

    println!("Cost history for web-01");
    for seg in &report.segments {
        let basis = match seg.basis {
            TaxBasis::Derived => "derived",
            TaxBasis::Estimated => "estimated",
        };
        println!(
            "  {}  {}  ex {:>6}  gst {:>5}  inc {:>6}  [{basis}]{}",
            seg.date.format("%Y-%m-%d"),
            seg.invoice_number,
            seg.ex,
            seg.tax,
            seg.inc,
            if seg.paid { "" } else { "  UNPAID" },
        );
    }
    println!("---");
    println!(
        "Totals: ex {}  gst {}  inc {}",
        report.totals.ex, report.totals.tax, report.totals.inc
    );

    println!();
    println!("CSV export:");
    println!("{}", query_csv(&report.segments));
}
