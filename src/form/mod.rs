pub mod schema;
pub mod state;
pub mod teacher;
pub mod validator;

pub use schema::{FieldDescriptor, FieldKind, FormSchema, SchemaError};
pub use state::{FieldValue, FormState};
pub use validator::{validate, validate_form, ErrorMap, REQUIRED_MESSAGE};
