//! Package ledger: the record of every package accepted for delivery.

mod memory;
mod types;

pub use memory::MemoryLedger;
pub use types::{LedgerError, MissingFieldsError, NewPackage, Package, PackageStatus, ParseStatusError};
