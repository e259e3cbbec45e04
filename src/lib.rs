pub mod api;
pub mod app;
pub mod config;
pub mod extractor;
pub mod fetch_error;
pub mod fetcher;
pub mod keep_alive;
pub mod pipeline;
pub mod scheduler;
pub mod token_manager;
pub mod uploader;
pub mod utils;
