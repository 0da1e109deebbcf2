use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, QueryBuilder};

use crate::core::{AppError, Result};
use crate::modules::documents::models::{DocumentKind, LineItem, UnitType};
use crate::modules::reports::models::{
    DateRange, DocumentAggregate, DocumentQuery, InvoiceLines, MonthlyAggregate, PaidAggregate,
    PartyAmount,
};
use crate::modules::taxes::models::GstRates;

/// Read-only aggregate queries over a tenant's documents.
///
/// Empty result sets produce zeros, never missing values.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Count and summed cached totals of matching documents
    async fn document_aggregate(
        &self,
        user_id: i64,
        kind: DocumentKind,
        query: &DocumentQuery,
    ) -> Result<DocumentAggregate>;

    /// Per calendar month aggregates; months without documents are omitted.
    /// `is_paid` only narrows invoices.
    async fn monthly_aggregates(
        &self,
        user_id: i64,
        kind: DocumentKind,
        range: &DateRange,
        is_paid: Option<bool>,
    ) -> Result<Vec<MonthlyAggregate>>;

    /// Parties ranked by invoiced amount, highest first
    async fn top_parties(
        &self,
        user_id: i64,
        range: &DateRange,
        is_paid: Option<bool>,
        limit: i64,
    ) -> Result<Vec<PartyAmount>>;

    async fn paid_aggregate(
        &self,
        user_id: i64,
        range: &DateRange,
        is_paid: Option<bool>,
    ) -> Result<PaidAggregate>;

    /// Invoices in the range with their line items, ordered by date
    async fn invoice_lines(&self, user_id: i64, range: &DateRange) -> Result<Vec<InvoiceLines>>;

    /// Line items of every document of the named party
    async fn party_line_items(
        &self,
        user_id: i64,
        kind: DocumentKind,
        party_name: &str,
    ) -> Result<Vec<LineItem>>;
}

#[derive(Debug, sqlx::FromRow)]
struct AggregateRow {
    count: i64,
    amount_after_gst: Decimal,
    gst: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct MonthlyRow {
    month: i64,
    count: i64,
    amount_after_gst: Decimal,
    gst: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct PartyAmountRow {
    party_id: i64,
    party_name: String,
    amount_after_gst: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct PaidRow {
    total: Decimal,
    paid: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct InvoiceLineRow {
    invoice_id: i64,
    bill_no: String,
    date: NaiveDate,
    party_name: String,
    party_gstin: Option<String>,
    line_id: Option<i64>,
    description: Option<String>,
    hsn_code: Option<i32>,
    quantity: Option<i32>,
    unit_type: Option<String>,
    unit_price: Option<Decimal>,
    cgst: Option<Decimal>,
    sgst: Option<Decimal>,
    igst: Option<Decimal>,
}

#[derive(Debug, sqlx::FromRow)]
struct PartyLineRow {
    id: i64,
    document_id: i64,
    description: String,
    hsn_code: Option<i32>,
    quantity: i32,
    unit_type: Option<String>,
    unit_price: Decimal,
    cgst: Decimal,
    sgst: Decimal,
    igst: Decimal,
}

fn parse_unit_type(line_id: i64, code: Option<String>) -> Result<Option<UnitType>> {
    code.map(|code| {
        code.parse().map_err(|_| {
            AppError::integrity(format!(
                "Line item {} has unknown unit type '{}'",
                line_id, code
            ))
        })
    })
    .transpose()
}

impl InvoiceLineRow {
    /// The joined line item, None for an invoice without items
    fn line_item(&self) -> Result<Option<LineItem>> {
        let (Some(id), Some(description), Some(quantity), Some(unit_price)) = (
            self.line_id,
            self.description.clone(),
            self.quantity,
            self.unit_price,
        ) else {
            return Ok(None);
        };

        Ok(Some(LineItem {
            id: Some(id),
            document_id: Some(self.invoice_id),
            description,
            hsn_code: self.hsn_code,
            quantity,
            unit_type: parse_unit_type(id, self.unit_type.clone())?,
            unit_price,
            rates: GstRates::new(
                self.cgst.unwrap_or_default(),
                self.sgst.unwrap_or_default(),
                self.igst.unwrap_or_default(),
            ),
        }))
    }
}

/// Appends tenant scope, date range and paid filter to a `... d JOIN parties p` query
fn push_document_filters(
    qb: &mut QueryBuilder<'_, MySql>,
    user_id: i64,
    kind: DocumentKind,
    range: Option<&DateRange>,
    is_paid: Option<bool>,
) {
    qb.push(" WHERE p.user_id = ").push_bind(user_id);

    if let Some(range) = range {
        qb.push(" AND d.date BETWEEN ")
            .push_bind(range.start)
            .push(" AND ")
            .push_bind(range.end);
    }

    if kind == DocumentKind::Invoice {
        if let Some(is_paid) = is_paid {
            qb.push(" AND d.is_paid = ").push_bind(is_paid);
        }
    }
}

pub struct MySqlReportRepository {
    pool: MySqlPool,
}

impl MySqlReportRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for MySqlReportRepository {
    async fn document_aggregate(
        &self,
        user_id: i64,
        kind: DocumentKind,
        query: &DocumentQuery,
    ) -> Result<DocumentAggregate> {
        let mut qb = QueryBuilder::<MySql>::new(format!(
            "SELECT COUNT(*) AS count, \
             COALESCE(SUM(d.total_amount_after_gst), 0) AS amount_after_gst, \
             COALESCE(SUM(d.total_gst_amount), 0) AS gst \
             FROM {} d JOIN parties p ON p.id = d.party_id",
            kind.table()
        ));
        push_document_filters(&mut qb, user_id, kind, query.range.as_ref(), query.is_paid);

        let row = qb.build_query_as::<AggregateRow>().fetch_one(&self.pool).await?;

        Ok(DocumentAggregate {
            count: row.count,
            amount_after_gst: row.amount_after_gst,
            gst: row.gst,
        })
    }

    async fn monthly_aggregates(
        &self,
        user_id: i64,
        kind: DocumentKind,
        range: &DateRange,
        is_paid: Option<bool>,
    ) -> Result<Vec<MonthlyAggregate>> {
        let mut qb = QueryBuilder::<MySql>::new(format!(
            "SELECT CAST(MONTH(d.date) AS SIGNED) AS month, COUNT(*) AS count, \
             COALESCE(SUM(d.total_amount_after_gst), 0) AS amount_after_gst, \
             COALESCE(SUM(d.total_gst_amount), 0) AS gst \
             FROM {} d JOIN parties p ON p.id = d.party_id",
            kind.table()
        ));
        push_document_filters(&mut qb, user_id, kind, Some(range), is_paid);
        qb.push(" GROUP BY month ORDER BY month");

        let rows = qb.build_query_as::<MonthlyRow>().fetch_all(&self.pool).await?;

        rows.into_iter()
            .map(|row| {
                let month = u32::try_from(row.month).map_err(|_| {
                    AppError::internal(format!("Unexpected month value {}", row.month))
                })?;
                Ok(MonthlyAggregate {
                    month,
                    count: row.count,
                    amount_after_gst: row.amount_after_gst,
                    gst: row.gst,
                })
            })
            .collect()
    }

    async fn top_parties(
        &self,
        user_id: i64,
        range: &DateRange,
        is_paid: Option<bool>,
        limit: i64,
    ) -> Result<Vec<PartyAmount>> {
        let mut qb = QueryBuilder::<MySql>::new(
            "SELECT p.id AS party_id, p.name AS party_name, \
             COALESCE(SUM(d.total_amount_after_gst), 0) AS amount_after_gst \
             FROM invoices d JOIN parties p ON p.id = d.party_id",
        );
        push_document_filters(&mut qb, user_id, DocumentKind::Invoice, Some(range), is_paid);
        qb.push(" GROUP BY p.id, p.name ORDER BY amount_after_gst DESC, p.id ASC LIMIT ")
            .push_bind(limit);

        let rows = qb.build_query_as::<PartyAmountRow>().fetch_all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .map(|row| PartyAmount {
                party_id: row.party_id,
                party_name: row.party_name,
                amount_after_gst: row.amount_after_gst,
            })
            .collect())
    }

    async fn paid_aggregate(
        &self,
        user_id: i64,
        range: &DateRange,
        is_paid: Option<bool>,
    ) -> Result<PaidAggregate> {
        let mut qb = QueryBuilder::<MySql>::new(
            "SELECT COALESCE(SUM(d.total_amount_after_gst), 0) AS total, \
             COALESCE(SUM(CASE WHEN d.is_paid THEN d.total_amount_after_gst ELSE 0 END), 0) AS paid \
             FROM invoices d JOIN parties p ON p.id = d.party_id",
        );
        push_document_filters(&mut qb, user_id, DocumentKind::Invoice, Some(range), is_paid);

        let row = qb.build_query_as::<PaidRow>().fetch_one(&self.pool).await?;

        Ok(PaidAggregate {
            total: row.total,
            paid: row.paid,
        })
    }

    async fn invoice_lines(&self, user_id: i64, range: &DateRange) -> Result<Vec<InvoiceLines>> {
        let rows = sqlx::query_as::<_, InvoiceLineRow>(
            r#"
            SELECT d.id AS invoice_id, d.bill_no, d.date, p.name AS party_name,
                   p.gstin AS party_gstin, li.id AS line_id, li.description, li.hsn_code,
                   li.quantity, li.unit_type, li.unit_price, li.cgst, li.sgst, li.igst
            FROM invoices d
            JOIN parties p ON p.id = d.party_id
            LEFT JOIN invoice_line_items li ON li.invoice_id = d.id
            WHERE p.user_id = ? AND d.date BETWEEN ? AND ?
            ORDER BY d.date, d.id, li.id
            "#,
        )
        .bind(user_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        let mut invoices: Vec<InvoiceLines> = Vec::new();
        for row in rows {
            let item = row.line_item()?;

            match invoices.last_mut() {
                Some(current) if current.invoice_id == row.invoice_id => {
                    current.line_items.extend(item);
                }
                _ => invoices.push(InvoiceLines {
                    invoice_id: row.invoice_id,
                    bill_no: row.bill_no,
                    date: row.date,
                    party_name: row.party_name,
                    party_gstin: row.party_gstin,
                    line_items: item.into_iter().collect(),
                }),
            }
        }

        Ok(invoices)
    }

    async fn party_line_items(
        &self,
        user_id: i64,
        kind: DocumentKind,
        party_name: &str,
    ) -> Result<Vec<LineItem>> {
        let sql = format!(
            "SELECT li.id, li.{fk} AS document_id, li.description, li.hsn_code, li.quantity, \
             li.unit_type, li.unit_price, li.cgst, li.sgst, li.igst \
             FROM {items} li \
             JOIN {docs} d ON d.id = li.{fk} \
             JOIN parties p ON p.id = d.party_id \
             WHERE p.user_id = ? AND p.name = ? \
             ORDER BY li.id",
            fk = kind.foreign_key(),
            items = kind.line_item_table(),
            docs = kind.table(),
        );

        let rows = sqlx::query_as::<_, PartyLineRow>(&sql)
            .bind(user_id)
            .bind(party_name)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(LineItem {
                    id: Some(row.id),
                    document_id: Some(row.document_id),
                    description: row.description,
                    hsn_code: row.hsn_code,
                    quantity: row.quantity,
                    unit_type: parse_unit_type(row.id, row.unit_type)?,
                    unit_price: row.unit_price,
                    rates: GstRates::new(row.cgst, row.sgst, row.igst),
                })
            })
            .collect()
    }
}
