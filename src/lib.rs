pub mod common;
pub mod config;
pub mod manifest;
pub mod operations;
pub mod resolver;
pub mod setup;
pub mod store;
pub mod workflow;
