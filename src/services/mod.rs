pub mod error_writer;
pub mod field_deriver;
pub mod name_resolver;
pub mod template_substitutor;

pub use error_writer::ErrorWriter;
pub use field_deriver::{FieldDeriver, TOTAL_HOURS_FIELD, WEEKDAY_HOUR_FIELDS};
pub use name_resolver::{IdentityTemplate, NameResolver};
pub use template_substitutor::{placeholder, SubstitutionReport, TemplateSubstitutor};
