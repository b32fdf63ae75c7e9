//! Report export sinks

pub mod csv;
pub mod document;

pub use self::csv::*;
pub use self::document::*;
