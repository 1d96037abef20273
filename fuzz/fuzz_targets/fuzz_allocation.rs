#![no_main]

use billfold::core::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 16 {
        return;
    }
    let (head, rest) = data.split_at(8);
    let tax = i64::from_le_bytes(head.try_into().unwrap()) % 100_000_000;

    let mut builder = InvoiceBuilder::new(1, "FUZZ");
    let mut subtotal = 0i64;
    for (i, chunk) in rest.chunks_exact(8).take(64).enumerate() {
        let raw = i64::from_le_bytes(chunk.try_into().unwrap()) % 100_000_000;
        subtotal += raw;
        builder = builder.add_item(InvoiceItem::new(
            format!("Line {i}"),
            Cents::new(raw).to_decimal(),
        ));
    }
    let invoice = builder
        .tax(Cents::new(tax).to_decimal())
        .amount(Cents::new(subtotal + tax).to_decimal())
        .build();

    // Whatever the numbers, modeling must not panic, and a reconciled
    // model must conserve the invoice tax.
    let model = build_tax_model(&invoice);
    if model.is_reconciled() {
        let allocated: Cents = (0..invoice.items.len())
            .map(|i| model.line_gst(i).unwrap())
            .sum();
        assert_eq!(allocated + model.residual(), Cents::new(tax));
    }
});
