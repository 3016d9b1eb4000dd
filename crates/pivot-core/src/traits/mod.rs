//! Core traits for the signal engine.

mod bar_supplier;
mod result_sink;

pub use bar_supplier::BarSupplier;
pub use result_sink::ResultSink;
