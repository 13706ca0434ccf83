//! Reading uploaded tabular data.

/// UTF-8 byte-order mark, written on export and skipped on load.
pub const UTF8_BOM: &str = "\u{feff}";

mod loader;
mod table;

pub use loader::{load, load_path, load_with, CsvOptions};
pub use table::RawTable;
