pub mod csv;
pub mod json;
pub mod row;

pub use crate::error::ExportError;
pub use csv::{export_csv, write_csv};
pub use json::{export_json, write_json};
pub use row::ResultRow;
