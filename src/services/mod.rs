pub mod quota;
pub mod validation;
