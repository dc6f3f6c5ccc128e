pub mod codec;
pub mod events;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod profiles;
pub mod stats;
pub mod users;
pub mod volunteers;
