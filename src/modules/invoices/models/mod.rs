mod invoice;

pub use invoice::{
    ConvertQuotationRequest, CreateInvoiceRequest, Invoice, InvoiceResponse,
    UpdateInvoiceRequest,
};
