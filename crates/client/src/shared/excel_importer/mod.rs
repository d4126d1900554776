pub mod parser;
pub mod types;

pub use parser::{read_csv_file, read_csv_str};
pub use types::{ImportError, SheetData, SheetMetadata};
