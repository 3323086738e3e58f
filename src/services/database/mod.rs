// Database service module
// SQLite database connection and schema management

mod connection;
pub mod migrations;
mod schema;

pub use connection::Database;
