mod party_directory;

pub use party_directory::{MySqlPartyDirectory, PartyDirectory};
