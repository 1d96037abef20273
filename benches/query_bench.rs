use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use billfold::core::*;
use billfold::feed::parse_batch;

fn month_end(year: i32, month: u32) -> NaiveDate {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.unwrap().pred_opt().unwrap()
}

fn period(year: i32, month: u32) -> String {
    let start = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
    let end = month_end(year, month);
    format!(
        "{} to {} - 744 hours",
        start.format("%-d %B %Y"),
        end.format("%-d %B %Y")
    )
}

fn hosting_invoice(n: i64, year: i32, month: u32) -> Invoice {
    let span = period(year, month);
    InvoiceBuilder::new(n, format!("INV-{n:04}"))
        .created(
            NaiveDate::from_ymd_opt(year, month, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
        .amount(dec!(118.80))
        .tax(dec!(10.80))
        .paid(true)
        .add_item(InvoiceItem::new("Domain renewal", dec!(15.00)))
        .add_item(InvoiceItem::new(
            format!("web-01 / Server Operating System: Ubuntu 22.04 ({span})"),
            dec!(50.00),
        ))
        .add_item(InvoiceItem::new("Backup service", dec!(5.00)))
        .add_item(InvoiceItem::new(
            format!("db-01 / Server Operating System: Debian 12 ({span})"),
            dec!(30.00),
        ))
        .add_item(InvoiceItem::new("Snapshot storage (48 hours)", dec!(8.00)))
        .build()
}

fn build_24_month_batch() -> Vec<Invoice> {
    let mut batch = Vec::with_capacity(24);
    let mut n = 1;
    for year in [2023, 2024] {
        for month in 1..=12 {
            batch.push(hosting_invoice(n, year, month));
            n += 1;
        }
    }
    batch
}

fn build_200_line_invoice() -> Invoice {
    let mut builder = InvoiceBuilder::new(9001, "INV-9001")
        .amount(dec!(2197.80))
        .tax(dec!(199.80));
    for i in 1..=200 {
        builder = builder.add_item(InvoiceItem::new(
            format!("Metered usage block {i}"),
            dec!(9.99),
        ));
    }
    builder.build()
}

fn feed_page(records: usize) -> String {
    let record = r#"{"invoice_id": 1, "invoice_number": "118220", "created": "2024-05-01T00:00:00+10:00", "amount": "60.50", "tax": "5.50", "paid": true, "invoice_items": [{"name": "web-01 / Server Operating System: Ubuntu 22.04 (1 May 2024 to 31 May 2024 - 744 hours)", "amount": "50.00"}, {"name": "Backup service", "amount": "5.00"}]}"#;
    format!(r#"{{"invoices": [{}]}}"#, vec![record; records].join(","))
}

fn bench_tax_model(c: &mut Criterion) {
    let typical = hosting_invoice(1, 2024, 5);
    c.bench_function("tax_model_5_lines", |b| {
        b.iter(|| black_box(build_tax_model(black_box(&typical))));
    });

    let big = build_200_line_invoice();
    c.bench_function("tax_model_200_lines", |b| {
        b.iter(|| black_box(build_tax_model(black_box(&big))));
    });
}

fn bench_grouping(c: &mut Criterion) {
    let invoice = hosting_invoice(1, 2024, 5);
    let model = build_tax_model(&invoice);
    c.bench_function("group_line_items", |b| {
        b.iter(|| {
            black_box(group_line_items(
                black_box(&invoice.items),
                black_box(&model),
            ))
        });
    });
}

fn bench_service_status(c: &mut Criterion) {
    let batch = build_24_month_batch();
    c.bench_function("service_status_24_invoices", |b| {
        b.iter(|| black_box(service_status(black_box(&batch))));
    });
}

fn bench_service_query(c: &mut Criterion) {
    let batch = build_24_month_batch();
    c.bench_function("service_query_24_invoices", |b| {
        b.iter(|| black_box(ServiceQuery::new("web-01").run(black_box(&batch))));
    });
}

fn bench_dashboard(c: &mut Criterion) {
    let batch = build_24_month_batch();
    let now = NaiveDate::from_ymd_opt(2025, 1, 15)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let filter = ViewFilter::default();
    c.bench_function("dashboard_walk_24_invoices", |b| {
        b.iter(|| {
            let visible = filter_invoices(black_box(&batch), black_box(&filter), now);
            let stats = batch_stats(visible.iter().copied());
            let monthly = monthly_totals(visible.iter().copied());
            let top = top_services(visible.iter().copied(), 8);
            black_box((stats, monthly, top))
        });
    });
}

fn bench_feed_parse(c: &mut Criterion) {
    let page = feed_page(50);
    c.bench_function("feed_parse_50_records", |b| {
        b.iter(|| black_box(parse_batch(black_box(&page))));
    });
}

criterion_group!(
    benches,
    bench_tax_model,
    bench_grouping,
    bench_service_status,
    bench_service_query,
    bench_dashboard,
    bench_feed_parse,
);
criterion_main!(benches);
