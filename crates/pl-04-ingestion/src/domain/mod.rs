pub mod errors;
pub mod request;
