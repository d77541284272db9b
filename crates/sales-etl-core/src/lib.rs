pub mod config;
pub mod db;
pub mod error;
pub mod pipeline;
pub mod store;
pub mod transform;
pub mod types;
