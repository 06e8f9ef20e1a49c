pub mod jwt;
pub mod upload;
