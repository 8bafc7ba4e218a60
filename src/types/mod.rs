mod field_value;
mod issue;

pub use field_value::{FieldValue, ProjectFields};
pub use issue::Issue;
