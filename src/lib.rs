pub mod api;
pub mod config;
pub mod image;
pub mod lookup;
pub mod models;
pub mod request;
pub mod server;
pub mod view;
