pub mod incident;
pub mod response;
