pub mod agent;
pub mod auth;
pub mod config;
pub mod engine;
pub mod errors;
pub mod tool;
pub mod tools;
