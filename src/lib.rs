pub mod api;
pub mod config;
pub mod config_server;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pubsub;
