mod quotation;

pub use quotation::{
    CreateQuotationRequest, Quotation, QuotationResponse, UpdateQuotationRequest,
};
