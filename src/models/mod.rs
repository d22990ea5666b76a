pub mod document;
pub mod loaders;
pub mod record;

pub use document::{BodyElement, Paragraph, Run, RunStyle, Table, TableCell, TableRow, TemplateDoc};
pub use loaders::{list_record_files, load_records, load_records_file};
pub use record::{value_to_text, Record};
