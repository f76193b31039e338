pub mod auth;
pub mod booking;
pub mod space;
pub mod user;
