pub mod alerts;
pub mod config;
pub mod downstream;
pub mod logger;
pub mod model;
pub mod monitor;
pub mod state;
