pub mod connection;
pub mod leads;

pub use connection::{init_db, Database};
