pub mod accounts;
pub mod backup;
pub mod events;
pub mod log;
pub mod profiles;
pub mod session;
pub mod volunteers;
