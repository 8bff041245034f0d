pub mod config;
pub mod emoji;
pub mod errors;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;
pub mod web;
