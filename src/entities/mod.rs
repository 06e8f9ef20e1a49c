pub mod booking;
pub mod gallery;
pub mod service;
pub mod user;
