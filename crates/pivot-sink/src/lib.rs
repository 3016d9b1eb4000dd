//! Result sinks with idempotent keyed upsert semantics.

mod csv_sink;
mod memory;

pub use csv_sink::CsvSink;
pub use memory::MemorySink;
