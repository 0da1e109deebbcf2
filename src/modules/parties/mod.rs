// Parties module

pub mod models;
pub mod repositories;

pub use models::Party;
pub use repositories::{MySqlPartyDirectory, PartyDirectory};
