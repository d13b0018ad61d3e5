pub mod controller;
pub mod detail;
pub mod schema;

pub use controller::{FormController, SubmitOutcome};
pub use detail::DetailController;
pub use schema::{check_password_confirmation, FieldSource, FieldSpec, FormSchema, PasswordConfirmation};
