use billfold::core::*;
use billfold::feed::{PagePlan, Pager, parse_batch};

const PAGE_ONE: &str = r#"{
    "invoices": [
        {
            "invoice_id": 9001,
            "invoice_number": "118220",
            "created": "2024-05-01T09:30:00+10:00",
            "amount": "88.00",
            "tax": "8.00",
            "paid": true,
            "invoice_items": [
                {"name": "web-01 / Server Operating System: Ubuntu 22.04 (1 May 2024 to 31 May 2024 - 744 hours)", "amount": "50.00"},
                {"name": "db-01 / Server Operating System: Debian 12 (1 May 2024 to 31 May 2024 - 744 hours)", "amount": "30.00"}
            ]
        },
        {
            "invoice_id": 9002,
            "invoice_number": "118733",
            "created": "2024-06-01T09:30:00+10:00",
            "amount": "55.00",
            "tax": "5.00",
            "paid": true,
            "invoice_items": [
                {"name": "web-01 / Server Operating System: Ubuntu 22.04 (1 June 2024 to 30 June 2024 - 720 hours)", "amount": "50.00"}
            ]
        }
    ]
}"#;

const PAGE_TWO: &str = r#"{
    "invoices": [
        {
            "invoice_id": 9003,
            "invoice_number": "119104",
            "created": "2024-07-01T09:30:00+10:00",
            "amount": "55.00",
            "tax": "5.00",
            "paid": false,
            "invoice_items": [
                {"name": "web-01 / Server Operating System: Ubuntu 22.04 (1 July 2024 to 31 July 2024 - 744 hours)", "amount": "50.00"}
            ]
        }
    ]
}"#;

fn main() {
    // Stand-in for the panel API: two pages, the second one short.
    let pages = [PAGE_ONE, PAGE_TWO];

    let mut pager = Pager::new(PagePlan {
        page_size: 2,
        max_pages: 50,
    });
    let mut batch = Vec::new();
    while let Some(page) = pager.next_page() {
        let Some(body) = pages.get((page - 1) as usize) else {
            break;
        };
        match parse_batch(body) {
            Ok(records) => {
                pager.record(records.len());
                batch.extend(records);
            }
            Err(e) => {
                eprintln!("page {page}: {e}");
                break;
            }
        }
    }

    println!(
        "Fetched {} invoices over {} pages",
        batch.len(),
        pager.pages_fetched()
    );

    let stats = batch_stats(&batch);
    println!(
        "Billed {} (tax {}) across {} invoices, {} unpaid",
        stats.amount_total, stats.tax_total, stats.invoices, stats.unpaid
    );

    println!("---");
    for (service, status) in service_status(&batch) {
        let state = if status.is_active() {
            "active"
        } else {
            "cancelled"
        };
        println!("  {:<8} {state}", service.as_str());
    }
}
