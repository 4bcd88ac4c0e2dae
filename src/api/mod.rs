pub mod import;
pub mod leave_request;
pub mod settings;
