use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use crate::core::financial_year::{month_label, MONTH_LABELS};
use crate::core::money::whole_units;
use crate::core::{round_currency, AppError, Result};
use crate::modules::documents::models::DocumentKind;
use crate::modules::parties::repositories::PartyDirectory;
use crate::modules::reports::models::{
    DashboardSummary, DateRange, DocumentQuery, InvoiceTaxSummary, MonthlyAggregate,
    MonthlyAmount, MonthlyCount, MonthlyTaxReport, PaidUnpaidSplit, PartySummary, TopClient,
};
use crate::modules::reports::repositories::ReportRepository;
use crate::modules::taxes::services::compute_line_totals;

/// Number of parties shown in the top clients widget
pub const TOP_CLIENT_LIMIT: i64 = 5;

/// Reporting queries over persisted documents.
///
/// Reads the cached document totals except where noted. "Today" is always
/// passed in by the caller.
pub struct ReportService {
    reports: Arc<dyn ReportRepository>,
    parties: Arc<dyn PartyDirectory>,
}

fn by_month(rows: Vec<MonthlyAggregate>) -> HashMap<u32, MonthlyAggregate> {
    rows.into_iter().map(|row| (row.month, row)).collect()
}

impl ReportService {
    pub fn new(reports: Arc<dyn ReportRepository>, parties: Arc<dyn PartyDirectory>) -> Self {
        Self { reports, parties }
    }

    /// Document counts and totals; no range means all time
    pub async fn dashboard_summary(
        &self,
        user_id: i64,
        query: &DocumentQuery,
    ) -> Result<DashboardSummary> {
        let invoices = self
            .reports
            .document_aggregate(user_id, DocumentKind::Invoice, query)
            .await?;

        let quotation_query = DocumentQuery {
            range: query.range,
            is_paid: None,
        };
        let quotations = self
            .reports
            .document_aggregate(user_id, DocumentKind::Quotation, &quotation_query)
            .await?;

        let party_count = self.parties.count_for_tenant(user_id).await?;

        let total_amount_with_gst = round_currency(invoices.amount_after_gst);
        let total_gst = round_currency(invoices.gst);
        let quotation_total_amount_with_gst = round_currency(quotations.amount_after_gst);
        let quotation_total_gst = round_currency(quotations.gst);

        Ok(DashboardSummary {
            invoice_count: invoices.count,
            quotation_count: quotations.count,
            party_count,
            total_amount_with_gst,
            total_gst,
            total_amount: total_amount_with_gst - total_gst,
            quotation_total_amount_with_gst,
            quotation_total_gst,
            quotation_total_amount: quotation_total_amount_with_gst - quotation_total_gst,
            from_date: query.range.map(|r| r.start),
            to_date: query.range.map(|r| r.end),
            is_paid: query.is_paid,
        })
    }

    /// Invoice and quotation counts per calendar month, Jan to Dec.
    ///
    /// The paid filter narrows the invoice counts only.
    pub async fn monthly_counts(
        &self,
        user_id: i64,
        query: &DocumentQuery,
        today: NaiveDate,
    ) -> Result<Vec<MonthlyCount>> {
        let window = DateRange::or_financial_year(query.range, today);
        window.ensure_distinct_months()?;

        let invoices = by_month(
            self.reports
                .monthly_aggregates(user_id, DocumentKind::Invoice, &window, query.is_paid)
                .await?,
        );
        let quotations = by_month(
            self.reports
                .monthly_aggregates(user_id, DocumentKind::Quotation, &window, None)
                .await?,
        );

        Ok((1..=12u32)
            .zip(MONTH_LABELS)
            .map(|(month, label)| MonthlyCount {
                month: label,
                invoices: invoices.get(&month).map_or(0, |m| m.count),
                quotations: quotations.get(&month).map_or(0, |m| m.count),
            })
            .collect())
    }

    /// Invoiced amount and GST per calendar month, Jan to Dec
    pub async fn monthly_amounts(
        &self,
        user_id: i64,
        query: &DocumentQuery,
        today: NaiveDate,
    ) -> Result<Vec<MonthlyAmount>> {
        let window = DateRange::or_financial_year(query.range, today);
        window.ensure_distinct_months()?;

        let invoices = by_month(
            self.reports
                .monthly_aggregates(user_id, DocumentKind::Invoice, &window, query.is_paid)
                .await?,
        );

        Ok((1..=12u32)
            .zip(MONTH_LABELS)
            .map(|(month, label)| {
                let row = invoices.get(&month);
                MonthlyAmount {
                    month: label,
                    invoice_amount: row.map_or(Decimal::ZERO, |m| round_currency(m.amount_after_gst)),
                    gst_amount: row.map_or(Decimal::ZERO, |m| round_currency(m.gst)),
                }
            })
            .collect())
    }

    /// The five parties with the highest invoiced amount
    pub async fn top_clients(
        &self,
        user_id: i64,
        query: &DocumentQuery,
        today: NaiveDate,
    ) -> Result<Vec<TopClient>> {
        let window = DateRange::or_financial_year(query.range, today);

        let parties = self
            .reports
            .top_parties(user_id, &window, query.is_paid, TOP_CLIENT_LIMIT)
            .await?;

        Ok(parties
            .into_iter()
            .map(|party| TopClient {
                party_id: party.party_id,
                name: party.party_name,
                amount: whole_units(party.amount_after_gst),
            })
            .collect())
    }

    /// Invoiced total split into received and pending
    pub async fn paid_unpaid(
        &self,
        user_id: i64,
        query: &DocumentQuery,
        today: NaiveDate,
    ) -> Result<PaidUnpaidSplit> {
        let window = DateRange::or_financial_year(query.range, today);
        let aggregate = self
            .reports
            .paid_aggregate(user_id, &window, query.is_paid)
            .await?;

        let total = round_currency(aggregate.total);
        let paid = round_currency(aggregate.paid);

        Ok(PaidUnpaidSplit {
            total,
            paid,
            pending: total - paid,
        })
    }

    /// GST figures for one calendar month, computed from invoice line items
    pub async fn monthly_tax_report(
        &self,
        user_id: i64,
        year: i32,
        month: u32,
    ) -> Result<MonthlyTaxReport> {
        let month_name = month_label(month).ok_or_else(|| {
            AppError::validation(format!("Month must be between 1 and 12, got {}", month))
        })?;
        let range = DateRange::calendar_month(year, month)?;

        let invoices = self.reports.invoice_lines(user_id, &range).await?;

        let mut summaries = Vec::with_capacity(invoices.len());
        let (mut cgst, mut sgst, mut igst) = (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
        let (mut without_gst, mut with_gst) = (Decimal::ZERO, Decimal::ZERO);

        for invoice in invoices {
            let (mut inv_cgst, mut inv_sgst, mut inv_igst) =
                (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
            let (mut inv_without, mut inv_with) = (Decimal::ZERO, Decimal::ZERO);

            for item in &invoice.line_items {
                let line = compute_line_totals(item);
                inv_cgst += line.cgst_amount;
                inv_sgst += line.sgst_amount;
                inv_igst += line.igst_amount;
                inv_without += line.pre_tax_amount;
                inv_with += line.post_tax_amount;
            }

            cgst += inv_cgst;
            sgst += inv_sgst;
            igst += inv_igst;
            without_gst += inv_without;
            with_gst += inv_with;

            summaries.push(InvoiceTaxSummary {
                invoice_id: invoice.invoice_id,
                bill_no: invoice.bill_no,
                date: invoice.date,
                party_name: invoice.party_name,
                party_gstin: invoice.party_gstin,
                cgst: round_currency(inv_cgst),
                sgst: round_currency(inv_sgst),
                igst: round_currency(inv_igst),
                amount_without_gst: round_currency(inv_without),
                amount_with_gst: round_currency(inv_with),
            });
        }

        info!(
            user_id,
            year,
            month,
            invoices = summaries.len(),
            "Monthly tax report generated"
        );

        Ok(MonthlyTaxReport {
            year,
            month,
            month_name,
            invoice_count: summaries.len() as i64,
            total_cgst: round_currency(cgst),
            total_sgst: round_currency(sgst),
            total_igst: round_currency(igst),
            total_gst: round_currency(cgst + sgst + igst),
            total_amount_without_gst: round_currency(without_gst),
            total_amount_with_gst: round_currency(with_gst),
            invoices: summaries,
        })
    }

    /// Totals over every invoice (or quotation) line item of a party
    pub async fn party_summary(
        &self,
        user_id: i64,
        kind: DocumentKind,
        party_name: Option<&str>,
    ) -> Result<PartySummary> {
        let party_name = party_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AppError::validation("party_name is required"))?;

        let items = self
            .reports
            .party_line_items(user_id, kind, party_name)
            .await?;

        let mut amount = Decimal::ZERO;
        let mut gst = Decimal::ZERO;
        let mut units: i64 = 0;
        let mut documents = HashSet::new();

        for item in &items {
            let line = compute_line_totals(item);
            amount += line.post_tax_amount;
            gst += line.total_tax;
            units += i64::from(item.quantity);
            if let Some(document_id) = item.document_id {
                documents.insert(document_id);
            }
        }

        Ok(PartySummary {
            party_name: party_name.to_string(),
            kind,
            total_amount: round_currency(amount),
            total_gst: round_currency(gst),
            total_units: units,
            document_count: documents.len() as i64,
        })
    }
}
