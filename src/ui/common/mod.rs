//! Common reusable UI components

pub mod message;
pub mod records;
pub mod spinner;

pub use message::{ErrorMessage, ErrorMessageStatic, SuccessMessage, WarningMessageStatic};
pub use records::{Column, RecordTable, field_text};
pub use spinner::{LoadingSpinner, Spinner, SpinnerSize};
