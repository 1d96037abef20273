//! CSV export for service cost query results.
//!
//! Comma-separated with a bare header row; every data field is quoted
//! with internal quotes doubled, so line names containing commas or
//! quotes survive a spreadsheet import.

use rust_decimal::Decimal;

use crate::core::{QuerySegment, TaxBasis};

/// Column order of [`query_csv`].
const HEADER: &str =
    "date,invoice_number,invoice_id,server,server_charge,addons,ex_gst,gst,inc_gst,mode,paid";

/// Render query segments as CSV, one row per segment, header first.
///
/// Rows keep the order of the slice (a [`CostReport`](crate::core::CostReport)
/// hands them over newest first). Add-on names are joined with `" | "`,
/// amounts are fixed two-decimal, the tax basis becomes `derived` or
/// `estimated` and the paid state `yes` or `no`. No trailing newline.
pub fn query_csv(segments: &[QuerySegment]) -> String {
    let mut out = String::from(HEADER);
    for seg in segments {
        out.push('\n');
        csv_field(&mut out, &seg.date.format("%Y-%m-%dT%H:%M:%S").to_string());
        out.push(',');
        csv_field(&mut out, &seg.invoice_number);
        out.push(',');
        csv_field(&mut out, &seg.invoice_id.to_string());
        out.push(',');
        csv_field(&mut out, seg.service.as_str());
        out.push(',');
        csv_field(&mut out, &seg.primary_label);
        out.push(',');
        csv_field(&mut out, &seg.addons.join(" | "));
        out.push(',');
        csv_amount(&mut out, seg.ex);
        out.push(',');
        csv_amount(&mut out, seg.tax);
        out.push(',');
        csv_amount(&mut out, seg.inc);
        out.push(',');
        csv_field(
            &mut out,
            match seg.basis {
                TaxBasis::Derived => "derived",
                TaxBasis::Estimated => "estimated",
            },
        );
        out.push(',');
        csv_field(&mut out, if seg.paid { "yes" } else { "no" });
    }
    out
}

fn csv_field(out: &mut String, value: &str) {
    out.push('"');
    for ch in value.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
}

fn csv_amount(out: &mut String, value: Decimal) {
    csv_field(out, &format!("{:.2}", value.round_dp(2)));
}
