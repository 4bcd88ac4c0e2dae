pub mod division;
pub mod leave_request;
pub mod settings;
