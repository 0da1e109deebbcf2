mod filter;
mod kind;
mod line_item;
mod totals;
mod unit_type;

pub use filter::{
    DocumentFilter, DocumentListQuery, DocumentOrdering, OrderField, Page, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};
pub use kind::DocumentKind;
pub use line_item::{parse_line_items, LineItem, LineItemRequest, LineItemResponse};
pub use totals::{DocumentTotals, DocumentTotalsResponse};
pub use unit_type::UnitType;
