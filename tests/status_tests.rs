use billfold::core::*;
use rust_decimal_macros::dec;

fn period_line(service: &str, period: &str) -> InvoiceItem {
    InvoiceItem::new(
        format!("{service} / Server Operating System: Ubuntu 22.04 ({period} - 744 hours)"),
        dec!(50.00),
    )
}

fn invoice_of(id: i64, items: Vec<InvoiceItem>) -> Invoice {
    let mut builder = InvoiceBuilder::new(id, format!("INV-{id}"));
    for item in items {
        builder = builder.add_item(item);
    }
    builder.build()
}

#[test]
fn service_missing_from_the_newest_period_reads_cancelled() {
    let batch = vec![
        invoice_of(
            1,
            vec![
                period_line("web-01", "1 May 2024 to 31 May 2024"),
                period_line("db-01", "1 May 2024 to 31 May 2024"),
            ],
        ),
        invoice_of(
            2,
            vec![
                period_line("web-01", "1 June 2024 to 30 June 2024"),
                period_line("db-01", "1 June 2024 to 30 June 2024"),
            ],
        ),
        invoice_of(3, vec![period_line("web-01", "1 July 2024 to 31 July 2024")]),
    ];

    let statuses = service_status(&batch);
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[&ServiceName::from("web-01")], ServiceStatus::Active);
    assert_eq!(
        statuses[&ServiceName::from("db-01")],
        ServiceStatus::Cancelled
    );
}

#[test]
fn one_day_of_billing_skew_is_still_active() {
    let batch = vec![invoice_of(
        1,
        vec![
            period_line("web-01", "1 July 2024 to 31 July 2024"),
            period_line("mail-01", "30 June 2024 to 30 July 2024"),
            period_line("files-01", "28 June 2024 to 29 July 2024"),
        ],
    )];

    let statuses = service_status(&batch);
    assert!(statuses[&ServiceName::from("web-01")].is_active());
    assert!(statuses[&ServiceName::from("mail-01")].is_active());
    // Two days behind the newest period end.
    assert!(!statuses[&ServiceName::from("files-01")].is_active());
}

#[test]
fn batch_order_does_not_matter() {
    let newest_first = vec![
        invoice_of(2, vec![period_line("web-01", "1 July 2024 to 31 July 2024")]),
        invoice_of(
            1,
            vec![
                period_line("web-01", "1 May 2024 to 31 May 2024"),
                period_line("db-01", "1 May 2024 to 31 May 2024"),
            ],
        ),
    ];

    let statuses = service_status(&newest_first);
    assert!(statuses[&ServiceName::from("web-01")].is_active());
    assert!(!statuses[&ServiceName::from("db-01")].is_active());
}

#[test]
fn unreadable_periods_read_as_cancelled() {
    let batch = vec![invoice_of(
        1,
        vec![
            period_line("web-01", "1 July 2024 to 31 July 2024"),
            // No billing period encoded at all.
            InvoiceItem::new("legacy-01 / Server Operating System: CentOS 7", dec!(20.00)),
            // 31 June does not exist.
            period_line("ghost-01", "1 June 2024 to 31 June 2024"),
        ],
    )];

    let statuses = service_status(&batch);
    assert_eq!(statuses.len(), 3);
    assert!(statuses[&ServiceName::from("web-01")].is_active());
    assert!(!statuses[&ServiceName::from("legacy-01")].is_active());
    assert!(!statuses[&ServiceName::from("ghost-01")].is_active());
}

#[test]
fn selector_lists_sorted_and_filters_cancelled() {
    let batch = vec![invoice_of(
        1,
        vec![
            period_line("web-02", "1 July 2024 to 31 July 2024"),
            period_line("app-01", "1 July 2024 to 31 July 2024"),
            period_line("db-01", "1 May 2024 to 31 May 2024"),
        ],
    )];
    let statuses = service_status(&batch);

    let active: Vec<&str> = selectable_services(&statuses, false)
        .iter()
        .map(|s| s.as_str())
        .collect();
    assert_eq!(active, vec!["app-01", "web-02"]);

    let all: Vec<&str> = selectable_services(&statuses, true)
        .iter()
        .map(|s| s.as_str())
        .collect();
    assert_eq!(all, vec!["app-01", "db-01", "web-02"]);
}
