use std::fmt;

use serde::{Deserialize, Serialize};

/// Which of the two document tables a record lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Invoice,
    Quotation,
}

impl DocumentKind {
    pub fn table(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "invoices",
            DocumentKind::Quotation => "quotations",
        }
    }

    pub fn line_item_table(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "invoice_line_items",
            DocumentKind::Quotation => "quotation_line_items",
        }
    }

    /// Foreign key column on the line item table
    pub fn foreign_key(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "invoice_id",
            DocumentKind::Quotation => "quotation_id",
        }
    }

    /// Column holding the human-assigned document number
    pub fn number_column(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "bill_no",
            DocumentKind::Quotation => "quotation_no",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "Invoice",
            DocumentKind::Quotation => "Quotation",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
