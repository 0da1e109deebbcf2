// Converting a quotation into an invoice.

#[path = "../helpers/mod.rs"]
mod helpers;

use gstbill::core::AppError;
use gstbill::documents::models::DocumentKind;
use gstbill::invoices::models::ConvertQuotationRequest;
use gstbill::quotations::models::Quotation;
use helpers::*;

fn convert(quotation_id: i64) -> ConvertQuotationRequest {
    ConvertQuotationRequest {
        quotation_id,
        date: None,
        order_no: None,
        transport_mode: None,
        vehicle_no: None,
        date_of_supply: None,
        place_of_supply: None,
        gst_reverse_charge: None,
    }
}

async fn quoted(services: &TestServices) -> Quotation {
    let party_id = services.store.add_party(TENANT, "Acme Traders");
    services
        .quotations
        .create_quotation(
            TENANT,
            TestDataFactory::quotation_request(
                party_id,
                501,
                date(2025, 6, 1),
                vec![TestDataFactory::intra_state_item(), TestDataFactory::inter_state_item()],
            ),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_conversion_copies_line_items_and_totals() {
    let services = TestServices::new();
    let quotation = quoted(&services).await;

    let invoice = services
        .invoices
        .convert_quotation(TENANT, convert(quotation.id))
        .await
        .unwrap();

    assert_eq!(invoice.party_id, quotation.party_id);
    assert_eq!(invoice.date, quotation.date);
    assert_eq!(invoice.date_of_supply, Some(quotation.date));
    assert_eq!(invoice.terms, quotation.terms);
    assert!(!invoice.is_paid);
    assert_eq!(invoice.bill_no, "INV-1");
    assert_eq!(invoice.totals, quotation.totals);

    assert_eq!(invoice.line_items.len(), quotation.line_items.len());
    for (copied, original) in invoice.line_items.iter().zip(&quotation.line_items) {
        assert_eq!(copied.description, original.description);
        assert_eq!(copied.hsn_code, original.hsn_code);
        assert_eq!(copied.quantity, original.quantity);
        assert_eq!(copied.unit_type, original.unit_type);
        assert_eq!(copied.unit_price, original.unit_price);
        assert_eq!(copied.rates, original.rates);
        assert_eq!(copied.document_id, Some(invoice.id));
        assert_ne!(copied.id, original.id);
    }
}

#[tokio::test]
async fn test_conversion_leaves_quotation_untouched() {
    let services = TestServices::new();
    let quotation = quoted(&services).await;

    services
        .invoices
        .convert_quotation(TENANT, convert(quotation.id))
        .await
        .unwrap();

    let after = services.quotations.get_quotation(TENANT, quotation.id).await.unwrap();
    assert_eq!(after, quotation);
    assert_eq!(services.store.line_item_count(DocumentKind::Quotation), 2);
    assert_eq!(services.store.line_item_count(DocumentKind::Invoice), 2);
}

#[tokio::test]
async fn test_conversion_overrides() {
    let services = TestServices::new();
    let quotation = quoted(&services).await;

    let invoice = services
        .invoices
        .convert_quotation(
            TENANT,
            ConvertQuotationRequest {
                date: Some(date(2025, 7, 15)),
                date_of_supply: Some(date(2025, 7, 20)),
                vehicle_no: Some("KA01CD5678".to_string()),
                ..convert(quotation.id)
            },
        )
        .await
        .unwrap();

    assert_eq!(invoice.date, date(2025, 7, 15));
    assert_eq!(invoice.date_of_supply, Some(date(2025, 7, 20)));
    assert_eq!(invoice.vehicle_no.as_deref(), Some("KA01CD5678"));
}

#[tokio::test]
async fn test_converting_twice_creates_two_invoices() {
    let services = TestServices::new();
    let quotation = quoted(&services).await;

    let first = services.invoices.convert_quotation(TENANT, convert(quotation.id)).await.unwrap();
    let second = services.invoices.convert_quotation(TENANT, convert(quotation.id)).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_ne!(first.bill_no, second.bill_no);
    assert_eq!(services.store.invoice_count(), 2);
    assert_eq!(services.store.numbering_locks(), vec![TENANT, TENANT]);
}

#[tokio::test]
async fn test_unknown_or_foreign_quotation_is_not_found() {
    let services = TestServices::new();
    let quotation = quoted(&services).await;

    let missing = services.invoices.convert_quotation(TENANT, convert(9999)).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    let foreign = services.invoices.convert_quotation(OTHER_TENANT, convert(quotation.id)).await;
    assert!(matches!(foreign, Err(AppError::NotFound(_))));

    assert_eq!(services.store.invoice_count(), 0);
}

#[tokio::test]
async fn test_failed_conversion_creates_nothing() {
    let services = TestServices::new();
    let quotation = quoted(&services).await;
    services.store.fail_totals_writes(true);

    let result = services.invoices.convert_quotation(TENANT, convert(quotation.id)).await;

    assert!(result.is_err());
    assert_eq!(services.store.invoice_count(), 0);
    assert_eq!(services.store.line_item_count(DocumentKind::Invoice), 0);
}
