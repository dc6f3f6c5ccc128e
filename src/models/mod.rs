pub mod event;
pub mod profile;
pub mod user;
pub mod volunteer;
