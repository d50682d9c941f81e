//! Shared HTTP building blocks

pub mod api_response;
pub mod form_fields;
pub mod validated_form;

pub use api_response::ApiResponse;
pub use form_fields::FormFields;
pub use validated_form::{ValidatedForm, ValidatedFormRejection};
