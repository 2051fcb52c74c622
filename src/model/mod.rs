pub mod backends;
pub mod manager;
pub mod traits;
