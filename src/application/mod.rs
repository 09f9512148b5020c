// Application layer: the expense ledger and the report types it produces.
// Clients (the CLI session, exporters) only talk to `ExpenseLedger`.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
