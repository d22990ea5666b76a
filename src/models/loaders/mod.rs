pub mod record_loader;

pub use record_loader::{list_record_files, load_records, load_records_file};
