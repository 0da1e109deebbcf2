use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlConnection, MySqlPool, QueryBuilder, Transaction};

use crate::core::{AppError, Result};
use crate::modules::documents::models::{
    DocumentFilter, DocumentKind, DocumentTotals, LineItem, Page,
};
use crate::modules::documents::repositories::{DocumentStore, DocumentTransaction};
use crate::modules::invoices::models::Invoice;
use crate::modules::quotations::models::Quotation;
use crate::modules::taxes::models::GstRates;

const INVOICE_COLUMNS: &str = "d.id, d.party_id, d.bill_no, d.order_no, d.date, \
    d.transport_mode, d.vehicle_no, d.date_of_supply, d.place_of_supply, \
    d.gst_reverse_charge, d.terms, d.is_paid, d.total_gst_amount, \
    d.total_amount_after_gst, d.total_units, d.created_at, d.updated_at";

const QUOTATION_COLUMNS: &str = "d.id, d.party_id, d.quotation_no, d.date, d.subject, \
    d.terms, d.total_gst_amount, d.total_amount_after_gst, d.total_units, \
    d.created_at, d.updated_at";

#[derive(Debug, sqlx::FromRow)]
struct InvoiceRow {
    id: i64,
    party_id: i64,
    bill_no: String,
    order_no: Option<String>,
    date: NaiveDate,
    transport_mode: Option<String>,
    vehicle_no: Option<String>,
    date_of_supply: Option<NaiveDate>,
    place_of_supply: Option<String>,
    gst_reverse_charge: Option<i32>,
    terms: String,
    is_paid: bool,
    total_gst_amount: Decimal,
    total_amount_after_gst: Decimal,
    total_units: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl InvoiceRow {
    fn into_invoice(self, line_items: Vec<LineItem>) -> Invoice {
        Invoice {
            id: self.id,
            party_id: self.party_id,
            bill_no: self.bill_no,
            order_no: self.order_no,
            date: self.date,
            transport_mode: self.transport_mode,
            vehicle_no: self.vehicle_no,
            date_of_supply: self.date_of_supply,
            place_of_supply: self.place_of_supply,
            gst_reverse_charge: self.gst_reverse_charge,
            terms: self.terms,
            is_paid: self.is_paid,
            totals: DocumentTotals {
                total_gst_amount: self.total_gst_amount,
                total_amount_after_gst: self.total_amount_after_gst,
                total_units: self.total_units,
            },
            line_items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct QuotationRow {
    id: i64,
    party_id: i64,
    quotation_no: i64,
    date: NaiveDate,
    subject: String,
    terms: String,
    total_gst_amount: Decimal,
    total_amount_after_gst: Decimal,
    total_units: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl QuotationRow {
    fn into_quotation(self, line_items: Vec<LineItem>) -> Quotation {
        Quotation {
            id: self.id,
            party_id: self.party_id,
            quotation_no: self.quotation_no,
            date: self.date,
            subject: self.subject,
            terms: self.terms,
            totals: DocumentTotals {
                total_gst_amount: self.total_gst_amount,
                total_amount_after_gst: self.total_amount_after_gst,
                total_units: self.total_units,
            },
            line_items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LineItemRow {
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

impl LineItemRow {
    fn into_line_item(self) -> Result<LineItem> {
        let unit_type = self
            .unit_type
            .map(|code| {
                code.parse().map_err(|_| {
                    AppError::integrity(format!(
                        "Line item {} has unknown unit type '{}'",
                        self.id, code
                    ))
                })
            })
            .transpose()?;

        Ok(LineItem {
            id: Some(self.id),
            document_id: Some(self.document_id),
            description: self.description,
            hsn_code: self.hsn_code,
            quantity: self.quantity,
            unit_type,
            unit_price: self.unit_price,
            rates: GstRates::new(self.cgst, self.sgst, self.igst),
        })
    }
}

/// Maps a duplicate-key failure on a document number to a validation error
fn map_number_conflict(err: sqlx::Error, kind: DocumentKind) -> AppError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::validation(format!("{} number already exists", kind));
        }
    }
    AppError::Database(err)
}

fn like_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

async fn load_line_items(
    conn: &mut MySqlConnection,
    kind: DocumentKind,
    document_id: i64,
) -> Result<Vec<LineItem>> {
    let sql = format!(
        "SELECT id, {fk} AS document_id, description, hsn_code, quantity, unit_type, \
         unit_price, cgst, sgst, igst \
         FROM {table} WHERE {fk} = ? ORDER BY id",
        fk = kind.foreign_key(),
        table = kind.line_item_table(),
    );

    let rows = sqlx::query_as::<_, LineItemRow>(&sql)
        .bind(document_id)
        .fetch_all(&mut *conn)
        .await?;

    rows.into_iter().map(LineItemRow::into_line_item).collect()
}

async fn fetch_invoice(
    conn: &mut MySqlConnection,
    user_id: i64,
    invoice_id: i64,
) -> Result<Option<Invoice>> {
    let sql = format!(
        "SELECT {} FROM invoices d JOIN parties p ON p.id = d.party_id \
         WHERE d.id = ? AND p.user_id = ?",
        INVOICE_COLUMNS
    );

    let row = sqlx::query_as::<_, InvoiceRow>(&sql)
        .bind(invoice_id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let line_items = load_line_items(conn, DocumentKind::Invoice, row.id).await?;
    Ok(Some(row.into_invoice(line_items)))
}

async fn fetch_quotation(
    conn: &mut MySqlConnection,
    user_id: i64,
    quotation_id: i64,
) -> Result<Option<Quotation>> {
    let sql = format!(
        "SELECT {} FROM quotations d JOIN parties p ON p.id = d.party_id \
         WHERE d.id = ? AND p.user_id = ?",
        QUOTATION_COLUMNS
    );

    let row = sqlx::query_as::<_, QuotationRow>(&sql)
        .bind(quotation_id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let line_items = load_line_items(conn, DocumentKind::Quotation, row.id).await?;
    Ok(Some(row.into_quotation(line_items)))
}

/// Appends the tenant scope and listing filters to a query ending in `FROM ... d JOIN parties p`
fn push_filters(
    qb: &mut QueryBuilder<'_, MySql>,
    kind: DocumentKind,
    user_id: i64,
    filter: &DocumentFilter,
) -> Result<()> {
    qb.push(" WHERE p.user_id = ").push_bind(user_id);

    if let Some(party_name) = &filter.party_name {
        qb.push(" AND p.name LIKE ").push_bind(like_pattern(party_name));
    }

    if let Some(number) = &filter.number {
        match kind {
            DocumentKind::Invoice => {
                qb.push(" AND d.bill_no = ").push_bind(number.clone());
            }
            DocumentKind::Quotation => {
                let number: i64 = number.parse().map_err(|_| {
                    AppError::validation(format!("Invalid quotation number '{}'", number))
                })?;
                qb.push(" AND d.quotation_no = ").push_bind(number);
            }
        }
    }

    if let Some(date) = filter.date {
        qb.push(" AND d.date = ").push_bind(date);
    }
    if let Some(after) = filter.date_after {
        qb.push(" AND d.date >= ").push_bind(after);
    }
    if let Some(before) = filter.date_before {
        qb.push(" AND d.date <= ").push_bind(before);
    }
    if let Some(min) = filter.min_amount {
        qb.push(" AND d.total_amount_after_gst >= ").push_bind(min);
    }
    if let Some(max) = filter.max_amount {
        qb.push(" AND d.total_amount_after_gst <= ").push_bind(max);
    }

    Ok(())
}

fn push_page(qb: &mut QueryBuilder<'_, MySql>, kind: DocumentKind, filter: &DocumentFilter) {
    let direction = if filter.ordering.descending { "DESC" } else { "ASC" };
    qb.push(format!(
        " ORDER BY d.{column} {dir}, d.id {dir}",
        column = filter.ordering.column(kind),
        dir = direction
    ));
    qb.push(" LIMIT ").push_bind(filter.limit);
    qb.push(" OFFSET ").push_bind(filter.offset);
}

async fn count_documents(
    pool: &MySqlPool,
    kind: DocumentKind,
    user_id: i64,
    filter: &DocumentFilter,
) -> Result<i64> {
    let mut qb = QueryBuilder::<MySql>::new(format!(
        "SELECT COUNT(*) FROM {} d JOIN parties p ON p.id = d.party_id",
        kind.table()
    ));
    push_filters(&mut qb, kind, user_id, filter)?;

    let count = qb.build_query_scalar::<i64>().fetch_one(pool).await?;
    Ok(count)
}

/// MySQL-backed [`DocumentStore`]
pub struct MySqlDocumentStore {
    pool: MySqlPool,
}

impl MySqlDocumentStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for MySqlDocumentStore {
    async fn begin(&self) -> Result<Box<dyn DocumentTransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(MySqlDocumentTransaction { tx }))
    }

    async fn find_invoice(&self, user_id: i64, invoice_id: i64) -> Result<Option<Invoice>> {
        let mut conn = self.pool.acquire().await?;
        fetch_invoice(&mut conn, user_id, invoice_id).await
    }

    async fn find_quotation(
        &self,
        user_id: i64,
        quotation_id: i64,
    ) -> Result<Option<Quotation>> {
        let mut conn = self.pool.acquire().await?;
        fetch_quotation(&mut conn, user_id, quotation_id).await
    }

    async fn list_invoices(&self, user_id: i64, filter: &DocumentFilter) -> Result<Page<Invoice>> {
        let count = count_documents(&self.pool, DocumentKind::Invoice, user_id, filter).await?;

        let mut qb = QueryBuilder::<MySql>::new(format!(
            "SELECT {} FROM invoices d JOIN parties p ON p.id = d.party_id",
            INVOICE_COLUMNS
        ));
        push_filters(&mut qb, DocumentKind::Invoice, user_id, filter)?;
        push_page(&mut qb, DocumentKind::Invoice, filter);

        let rows = qb.build_query_as::<InvoiceRow>().fetch_all(&self.pool).await?;

        Ok(Page {
            count,
            results: rows
                .into_iter()
                .map(|row| row.into_invoice(Vec::new()))
                .collect(),
        })
    }

    async fn list_quotations(
        &self,
        user_id: i64,
        filter: &DocumentFilter,
    ) -> Result<Page<Quotation>> {
        let count = count_documents(&self.pool, DocumentKind::Quotation, user_id, filter).await?;

        let mut qb = QueryBuilder::<MySql>::new(format!(
            "SELECT {} FROM quotations d JOIN parties p ON p.id = d.party_id",
            QUOTATION_COLUMNS
        ));
        push_filters(&mut qb, DocumentKind::Quotation, user_id, filter)?;
        push_page(&mut qb, DocumentKind::Quotation, filter);

        let rows = qb
            .build_query_as::<QuotationRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            count,
            results: rows
                .into_iter()
                .map(|row| row.into_quotation(Vec::new()))
                .collect(),
        })
    }
}

/// [`DocumentTransaction`] over one MySQL transaction.
///
/// sqlx rolls the transaction back when it is dropped uncommitted.
pub struct MySqlDocumentTransaction {
    tx: Transaction<'static, MySql>,
}

#[async_trait]
impl DocumentTransaction for MySqlDocumentTransaction {
    async fn insert_invoice(&mut self, invoice: &Invoice) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO invoices (
                party_id, bill_no, order_no, date, transport_mode, vehicle_no,
                date_of_supply, place_of_supply, gst_reverse_charge, terms, is_paid
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(invoice.party_id)
        .bind(&invoice.bill_no)
        .bind(&invoice.order_no)
        .bind(invoice.date)
        .bind(&invoice.transport_mode)
        .bind(&invoice.vehicle_no)
        .bind(invoice.date_of_supply)
        .bind(&invoice.place_of_supply)
        .bind(invoice.gst_reverse_charge)
        .bind(&invoice.terms)
        .bind(invoice.is_paid)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_number_conflict(e, DocumentKind::Invoice))?;

        Ok(result.last_insert_id() as i64)
    }

    async fn update_invoice(&mut self, invoice: &Invoice) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE invoices SET
                party_id = ?, bill_no = ?, order_no = ?, date = ?, transport_mode = ?,
                vehicle_no = ?, date_of_supply = ?, place_of_supply = ?,
                gst_reverse_charge = ?, terms = ?, is_paid = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
        )
        .bind(invoice.party_id)
        .bind(&invoice.bill_no)
        .bind(&invoice.order_no)
        .bind(invoice.date)
        .bind(&invoice.transport_mode)
        .bind(&invoice.vehicle_no)
        .bind(invoice.date_of_supply)
        .bind(&invoice.place_of_supply)
        .bind(invoice.gst_reverse_charge)
        .bind(&invoice.terms)
        .bind(invoice.is_paid)
        .bind(invoice.id)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_number_conflict(e, DocumentKind::Invoice))?;

        Ok(())
    }

    async fn find_invoice(&mut self, user_id: i64, invoice_id: i64) -> Result<Option<Invoice>> {
        fetch_invoice(&mut self.tx, user_id, invoice_id).await
    }

    async fn delete_invoice(&mut self, invoice_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = ?")
            .bind(invoice_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_quotation(&mut self, quotation: &Quotation) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO quotations (party_id, quotation_no, date, subject, terms)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(quotation.party_id)
        .bind(quotation.quotation_no)
        .bind(quotation.date)
        .bind(&quotation.subject)
        .bind(&quotation.terms)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_number_conflict(e, DocumentKind::Quotation))?;

        Ok(result.last_insert_id() as i64)
    }

    async fn update_quotation(&mut self, quotation: &Quotation) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE quotations SET
                party_id = ?, quotation_no = ?, date = ?, subject = ?, terms = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
        )
        .bind(quotation.party_id)
        .bind(quotation.quotation_no)
        .bind(quotation.date)
        .bind(&quotation.subject)
        .bind(&quotation.terms)
        .bind(quotation.id)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_number_conflict(e, DocumentKind::Quotation))?;

        Ok(())
    }

    async fn find_quotation(
        &mut self,
        user_id: i64,
        quotation_id: i64,
    ) -> Result<Option<Quotation>> {
        fetch_quotation(&mut self.tx, user_id, quotation_id).await
    }

    async fn delete_quotation(&mut self, quotation_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM quotations WHERE id = ?")
            .bind(quotation_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_line_items(
        &mut self,
        kind: DocumentKind,
        document_id: i64,
        items: &[LineItem],
    ) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }

        let mut qb = QueryBuilder::<MySql>::new(format!(
            "INSERT INTO {} ({}, description, hsn_code, quantity, unit_type, unit_price, \
             cgst, sgst, igst) ",
            kind.line_item_table(),
            kind.foreign_key()
        ));

        qb.push_values(items, |mut row, item| {
            row.push_bind(document_id)
                .push_bind(item.description.clone())
                .push_bind(item.hsn_code)
                .push_bind(item.quantity)
                .push_bind(item.unit_type.map(|u| u.code()))
                .push_bind(item.unit_price)
                .push_bind(item.rates.cgst)
                .push_bind(item.rates.sgst)
                .push_bind(item.rates.igst);
        });

        qb.build().execute(&mut *self.tx).await?;
        Ok(())
    }

    async fn delete_line_items(&mut self, kind: DocumentKind, document_id: i64) -> Result<u64> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?",
            kind.line_item_table(),
            kind.foreign_key()
        );

        let result = sqlx::query(&sql)
            .bind(document_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn load_line_items(
        &mut self,
        kind: DocumentKind,
        document_id: i64,
    ) -> Result<Vec<LineItem>> {
        load_line_items(&mut self.tx, kind, document_id).await
    }

    async fn write_totals(
        &mut self,
        kind: DocumentKind,
        document_id: i64,
        totals: &DocumentTotals,
    ) -> Result<()> {
        let sql = format!(
            "UPDATE {} SET total_gst_amount = ?, total_amount_after_gst = ?, total_units = ? \
             WHERE id = ?",
            kind.table()
        );

        let result = sqlx::query(&sql)
            .bind(totals.total_gst_amount)
            .bind(totals.total_amount_after_gst)
            .bind(&totals.total_units)
            .bind(document_id)
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() == 0 {
            // Unchanged rows may report zero, so confirm the row is really gone
            let exists: i64 =
                sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {} WHERE id = ?", kind.table()))
                    .bind(document_id)
                    .fetch_one(&mut *self.tx)
                    .await?;

            if exists == 0 {
                return Err(AppError::integrity(format!(
                    "Cannot store totals: {} {} does not exist",
                    kind, document_id
                )));
            }
        }

        Ok(())
    }

    async fn lock_invoice_numbers(&mut self, user_id: i64) -> Result<()> {
        // The sequence row doubles as the tenant's numbering lock
        sqlx::query(
            r#"
            INSERT INTO invoice_sequences (user_id, last_number) VALUES (?, 0)
            ON DUPLICATE KEY UPDATE last_number = last_number
            "#,
        )
        .bind(user_id)
        .execute(&mut *self.tx)
        .await?;

        sqlx::query("SELECT last_number FROM invoice_sequences WHERE user_id = ? FOR UPDATE")
            .bind(user_id)
            .fetch_one(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn next_invoice_number(&mut self, user_id: i64) -> Result<i64> {
        sqlx::query(
            r#"
            INSERT INTO invoice_sequences (user_id, last_number) VALUES (?, 1)
            ON DUPLICATE KEY UPDATE last_number = last_number + 1
            "#,
        )
        .bind(user_id)
        .execute(&mut *self.tx)
        .await?;

        let number: i64 =
            sqlx::query_scalar("SELECT last_number FROM invoice_sequences WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&mut *self.tx)
                .await?;

        Ok(number)
    }

    async fn invoice_number_taken(
        &mut self,
        user_id: i64,
        bill_no: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM invoices d JOIN parties p ON p.id = d.party_id
            WHERE p.user_id = ? AND d.bill_no = ? AND d.id <> ?
            "#,
        )
        .bind(user_id)
        .bind(bill_no)
        .bind(exclude_id.unwrap_or(0))
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(count > 0)
    }

    async fn quotation_number_taken(
        &mut self,
        quotation_no: i64,
        exclude_id: Option<i64>,
    ) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM quotations WHERE quotation_no = ? AND id <> ?")
                .bind(quotation_no)
                .bind(exclude_id.unwrap_or(0))
                .fetch_one(&mut *self.tx)
                .await?;

        Ok(count > 0)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
