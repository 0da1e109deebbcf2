// Invoice and quotation lifecycle over the in-memory store.
//
// Every mutation leaves cached totals equal to a fresh recomputation, and a
// failed mutation leaves nothing behind.

#[path = "../helpers/mod.rs"]
mod helpers;

use rust_decimal_macros::dec;

use gstbill::core::AppError;
use gstbill::documents::models::{DocumentFilter, DocumentKind, DocumentOrdering, DocumentTotals, OrderField};
use gstbill::invoices::models::UpdateInvoiceRequest;
use gstbill::quotations::models::UpdateQuotationRequest;
use helpers::*;

#[tokio::test]
async fn test_create_invoice_computes_totals() {
    let services = TestServices::new();
    let party_id = services.store.add_party(TENANT, "Acme Traders");

    let invoice = services
        .invoices
        .create_invoice(
            TENANT,
            TestDataFactory::invoice_request(party_id, date(2025, 4, 10), vec![TestDataFactory::intra_state_item()]),
        )
        .await
        .unwrap();

    assert_eq!(invoice.bill_no, "INV-1");
    assert_eq!(invoice.terms, INVOICE_TERMS);
    assert!(!invoice.is_paid);
    assert_eq!(invoice.totals.total_gst_amount, dec!(90.00));
    assert_eq!(invoice.totals.total_amount_after_gst, dec!(590.00));
    assert_eq!(invoice.totals.total_units, "10");
    assert_eq!(invoice.line_items.len(), 1);
    assert_eq!(invoice.line_items[0].document_id, Some(invoice.id));

    let fetched = services.invoices.get_invoice(TENANT, invoice.id).await.unwrap();
    assert_eq!(fetched, invoice);
}

#[tokio::test]
async fn test_invoice_numbers_are_sequential_and_unique() {
    let services = TestServices::new();
    let party_id = services.store.add_party(TENANT, "Acme Traders");
    let request = || {
        TestDataFactory::invoice_request(party_id, date(2025, 4, 10), vec![TestDataFactory::intra_state_item()])
    };

    let first = services.invoices.create_invoice(TENANT, request()).await.unwrap();
    let second = services.invoices.create_invoice(TENANT, request()).await.unwrap();
    assert_eq!(first.bill_no, "INV-1");
    assert_eq!(second.bill_no, "INV-2");

    let mut duplicate = request();
    duplicate.bill_no = Some("INV-2".to_string());
    let result = services.invoices.create_invoice(TENANT, duplicate).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    // A manually taken number is skipped by the sequence
    let mut manual = request();
    manual.bill_no = Some("INV-3".to_string());
    services.invoices.create_invoice(TENANT, manual).await.unwrap();
    let next = services.invoices.create_invoice(TENANT, request()).await.unwrap();
    assert_eq!(next.bill_no, "INV-4");
}

#[tokio::test]
async fn test_numbering_is_locked_before_numbers_are_checked() {
    let services = TestServices::new();
    let party_id = services.store.add_party(TENANT, "Acme Traders");
    let request = || {
        TestDataFactory::invoice_request(party_id, date(2025, 4, 10), vec![TestDataFactory::intra_state_item()])
    };

    let mut manual = request();
    manual.bill_no = Some("MANUAL-7".to_string());
    let invoice = services.invoices.create_invoice(TENANT, manual).await.unwrap();
    services.invoices.create_invoice(TENANT, request()).await.unwrap();
    assert_eq!(services.store.numbering_locks(), vec![TENANT, TENANT]);

    // Edits that keep the number leave the lock alone
    services
        .invoices
        .update_invoice(
            TENANT,
            invoice.id,
            UpdateInvoiceRequest { is_paid: Some(true), ..Default::default() },
        )
        .await
        .unwrap();
    assert_eq!(services.store.numbering_locks().len(), 2);

    services
        .invoices
        .update_invoice(
            TENANT,
            invoice.id,
            UpdateInvoiceRequest { bill_no: Some("MANUAL-8".to_string()), ..Default::default() },
        )
        .await
        .unwrap();
    assert_eq!(services.store.numbering_locks().len(), 3);
}

#[tokio::test]
async fn test_invoice_requires_line_items() {
    let services = TestServices::new();
    let party_id = services.store.add_party(TENANT, "Acme Traders");

    let result = services
        .invoices
        .create_invoice(TENANT, TestDataFactory::invoice_request(party_id, date(2025, 4, 10), vec![]))
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(services.store.invoice_count(), 0);
}

#[tokio::test]
async fn test_invalid_line_item_rejected() {
    let services = TestServices::new();
    let party_id = services.store.add_party(TENANT, "Acme Traders");
    let bad = TestDataFactory::line_item("Cable", 0, "10.00", "9", "9", "0");

    let result = services
        .invoices
        .create_invoice(TENANT, TestDataFactory::invoice_request(party_id, date(2025, 4, 10), vec![bad]))
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(services.store.invoice_count(), 0);
}

#[tokio::test]
async fn test_amounts_beyond_money_columns_rejected() {
    let services = TestServices::new();
    let party_id = services.store.add_party(TENANT, "Acme Traders");

    let huge_price = TestDataFactory::line_item("Turbine", 1, "10000000000.00", "0", "0", "18");
    let result = services
        .invoices
        .create_invoice(TENANT, TestDataFactory::invoice_request(party_id, date(2025, 4, 10), vec![huge_price]))
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    // each line fits, the document total does not
    let line = || TestDataFactory::line_item("Turbine", 1, "6000000000.00", "0", "0", "0");
    let result = services
        .invoices
        .create_invoice(TENANT, TestDataFactory::invoice_request(party_id, date(2025, 4, 10), vec![line(), line()]))
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    assert_eq!(services.store.invoice_count(), 0);
    assert_eq!(services.store.line_item_count(DocumentKind::Invoice), 0);
}

#[tokio::test]
async fn test_party_of_other_tenant_is_not_found() {
    let services = TestServices::new();
    let foreign_party = services.store.add_party(OTHER_TENANT, "Other Co");

    let result = services
        .invoices
        .create_invoice(
            TENANT,
            TestDataFactory::invoice_request(foreign_party, date(2025, 4, 10), vec![TestDataFactory::intra_state_item()]),
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_failed_totals_write_rolls_back_everything() {
    let services = TestServices::new();
    let party_id = services.store.add_party(TENANT, "Acme Traders");
    services.store.fail_totals_writes(true);

    let result = services
        .invoices
        .create_invoice(
            TENANT,
            TestDataFactory::invoice_request(party_id, date(2025, 4, 10), vec![TestDataFactory::intra_state_item()]),
        )
        .await;

    assert!(result.is_err());
    assert_eq!(services.store.invoice_count(), 0);
    assert_eq!(services.store.line_item_count(DocumentKind::Invoice), 0);

    // The sequence number is not consumed by the failed attempt
    services.store.fail_totals_writes(false);
    let invoice = services
        .invoices
        .create_invoice(
            TENANT,
            TestDataFactory::invoice_request(party_id, date(2025, 4, 10), vec![TestDataFactory::intra_state_item()]),
        )
        .await
        .unwrap();
    assert_eq!(invoice.bill_no, "INV-1");
}

#[tokio::test]
async fn test_failed_update_keeps_previous_state() {
    let services = TestServices::new();
    let party_id = services.store.add_party(TENANT, "Acme Traders");
    let invoice = services
        .invoices
        .create_invoice(
            TENANT,
            TestDataFactory::invoice_request(party_id, date(2025, 4, 10), vec![TestDataFactory::intra_state_item()]),
        )
        .await
        .unwrap();

    services.store.fail_totals_writes(true);
    let result = services
        .invoices
        .update_invoice(
            TENANT,
            invoice.id,
            UpdateInvoiceRequest {
                is_paid: Some(true),
                line_items: Some(vec![TestDataFactory::inter_state_item(), TestDataFactory::inter_state_item()]),
                ..Default::default()
            },
        )
        .await;
    services.store.fail_totals_writes(false);

    assert!(result.is_err());
    let unchanged = services.invoices.get_invoice(TENANT, invoice.id).await.unwrap();
    assert_eq!(unchanged, invoice);
}

#[tokio::test]
async fn test_update_replaces_line_items_and_recomputes() {
    let services = TestServices::new();
    let party_id = services.store.add_party(TENANT, "Acme Traders");
    let invoice = services
        .invoices
        .create_invoice(
            TENANT,
            TestDataFactory::invoice_request(party_id, date(2025, 4, 10), vec![TestDataFactory::intra_state_item()]),
        )
        .await
        .unwrap();

    let updated = services
        .invoices
        .update_invoice(
            TENANT,
            invoice.id,
            UpdateInvoiceRequest {
                line_items: Some(vec![TestDataFactory::intra_state_item(), TestDataFactory::inter_state_item()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.line_items.len(), 2);
    assert_eq!(updated.totals.total_gst_amount, dec!(180.00));
    assert_eq!(updated.totals.total_amount_after_gst, dec!(1180.00));
    assert_eq!(updated.totals.total_units, "12");
    assert_eq!(updated.totals, DocumentTotals::from_line_items(&updated.line_items));
}

#[tokio::test]
async fn test_update_without_line_items_keeps_them() {
    let services = TestServices::new();
    let party_id = services.store.add_party(TENANT, "Acme Traders");
    let invoice = services
        .invoices
        .create_invoice(
            TENANT,
            TestDataFactory::invoice_request(party_id, date(2025, 4, 10), vec![TestDataFactory::intra_state_item()]),
        )
        .await
        .unwrap();

    let paid = services
        .invoices
        .update_invoice(
            TENANT,
            invoice.id,
            UpdateInvoiceRequest {
                is_paid: Some(true),
                line_items: Some(vec![]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(paid.is_paid);
    assert_eq!(paid.line_items.len(), 1);
    assert_eq!(paid.line_items[0].id, invoice.line_items[0].id);
    assert_eq!(paid.totals, invoice.totals);
}

#[tokio::test]
async fn test_recompute_repairs_stale_totals() {
    let services = TestServices::new();
    let party_id = services.store.add_party(TENANT, "Acme Traders");
    let invoice = services
        .invoices
        .create_invoice(
            TENANT,
            TestDataFactory::invoice_request(party_id, date(2025, 4, 10), vec![TestDataFactory::intra_state_item()]),
        )
        .await
        .unwrap();

    services.store.corrupt_totals(DocumentKind::Invoice, invoice.id, DocumentTotals::zero());

    let first = services
        .totals
        .recompute_document_totals(TENANT, DocumentKind::Invoice, invoice.id)
        .await
        .unwrap();
    let second = services
        .totals
        .recompute_document_totals(TENANT, DocumentKind::Invoice, invoice.id)
        .await
        .unwrap();

    assert_eq!(first, invoice.totals);
    assert_eq!(second, first);

    let stored = services.invoices.get_invoice(TENANT, invoice.id).await.unwrap();
    assert_eq!(stored.totals, invoice.totals);
}

#[tokio::test]
async fn test_recompute_unknown_document_is_not_found() {
    let services = TestServices::new();

    let result = services
        .totals
        .recompute_document_totals(TENANT, DocumentKind::Quotation, 404)
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_invoice_removes_line_items() {
    let services = TestServices::new();
    let party_id = services.store.add_party(TENANT, "Acme Traders");
    let invoice = services
        .invoices
        .create_invoice(
            TENANT,
            TestDataFactory::invoice_request(party_id, date(2025, 4, 10), vec![TestDataFactory::intra_state_item()]),
        )
        .await
        .unwrap();

    let foreign = services.invoices.delete_invoice(OTHER_TENANT, invoice.id).await;
    assert!(matches!(foreign, Err(AppError::NotFound(_))));

    services.invoices.delete_invoice(TENANT, invoice.id).await.unwrap();

    assert_eq!(services.store.line_item_count(DocumentKind::Invoice), 0);
    let result = services.invoices.get_invoice(TENANT, invoice.id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_listing_is_tenant_scoped_and_ordered() {
    let services = TestServices::new();
    let acme = services.store.add_party(TENANT, "Acme Traders");
    let zenith = services.store.add_party(TENANT, "Zenith Steel");
    let foreign = services.store.add_party(OTHER_TENANT, "Acme Imports");

    for (party, on, items) in [
        (acme, date(2025, 4, 10), vec![TestDataFactory::intra_state_item()]),
        (zenith, date(2025, 5, 2), vec![TestDataFactory::intra_state_item(), TestDataFactory::inter_state_item()]),
    ] {
        services
            .invoices
            .create_invoice(TENANT, TestDataFactory::invoice_request(party, on, items))
            .await
            .unwrap();
    }
    services
        .invoices
        .create_invoice(
            OTHER_TENANT,
            TestDataFactory::invoice_request(foreign, date(2025, 4, 11), vec![TestDataFactory::intra_state_item()]),
        )
        .await
        .unwrap();

    let all = services.invoices.list_invoices(TENANT, &DocumentFilter::default()).await.unwrap();
    assert_eq!(all.count, 2);
    // Newest first by default
    assert_eq!(all.results[0].party_id, zenith);

    let by_amount = DocumentFilter {
        ordering: DocumentOrdering {
            field: OrderField::TotalAmountAfterGst,
            descending: false,
        },
        ..Default::default()
    };
    let ascending = services.invoices.list_invoices(TENANT, &by_amount).await.unwrap();
    assert_eq!(ascending.results[0].totals.total_amount_after_gst, dec!(590.00));

    let acme_only = DocumentFilter {
        party_name: Some("acme".to_string()),
        ..Default::default()
    };
    let filtered = services.invoices.list_invoices(TENANT, &acme_only).await.unwrap();
    assert_eq!(filtered.count, 1);
    assert_eq!(filtered.results[0].party_id, acme);
}

#[tokio::test]
async fn test_quotation_lifecycle() {
    let services = TestServices::new();
    let party_id = services.store.add_party(TENANT, "Acme Traders");

    let quotation = services
        .quotations
        .create_quotation(
            TENANT,
            TestDataFactory::quotation_request(party_id, 101, date(2025, 6, 1), vec![TestDataFactory::inter_state_item()]),
        )
        .await
        .unwrap();

    assert_eq!(quotation.quotation_no, 101);
    assert_eq!(quotation.terms, QUOTATION_TERMS);
    assert_eq!(quotation.totals.total_gst_amount, dec!(90.00));
    assert_eq!(quotation.totals.total_amount_after_gst, dec!(590.00));

    let duplicate = services
        .quotations
        .create_quotation(
            TENANT,
            TestDataFactory::quotation_request(party_id, 101, date(2025, 6, 2), vec![TestDataFactory::inter_state_item()]),
        )
        .await;
    assert!(matches!(duplicate, Err(AppError::Validation(_))));

    let updated = services
        .quotations
        .update_quotation(
            TENANT,
            quotation.id,
            UpdateQuotationRequest {
                subject: Some("Revised scope".to_string()),
                line_items: Some(vec![TestDataFactory::intra_state_item(), TestDataFactory::intra_state_item()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.subject, "Revised scope");
    assert_eq!(updated.totals.total_amount_after_gst, dec!(1180.00));
    assert_eq!(updated.totals.total_units, "20");

    services.quotations.delete_quotation(TENANT, quotation.id).await.unwrap();
    assert_eq!(services.store.line_item_count(DocumentKind::Quotation), 0);
}
