pub mod config;
pub mod exercises;
pub mod session;
pub mod stats;
pub mod users;
