pub mod auth;
pub mod booking;
pub mod health;
pub mod space;
pub mod user;
pub mod v1;
