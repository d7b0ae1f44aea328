pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
