pub mod api;
pub mod clients;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod models;
pub mod relay;
pub mod utils;
