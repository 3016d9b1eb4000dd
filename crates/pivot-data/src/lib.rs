//! Bar suppliers for the signal engine.

mod csv_supplier;
mod memory;

pub use csv_supplier::CsvBarSupplier;
pub use memory::MemoryBarSupplier;
