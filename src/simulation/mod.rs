pub mod config;
pub mod engine;
pub mod feed;
pub mod presets;
pub mod step;
pub mod types;
