mod document_store;
mod mysql_document_store;

pub use document_store::{DocumentStore, DocumentTransaction};
pub use mysql_document_store::{MySqlDocumentStore, MySqlDocumentTransaction};
