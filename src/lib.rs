//! Nutrack Library
//!
//! Calorie and protein tracking against daily goals, with time-windowed
//! history and statistics.

pub mod build_info;
pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod tracker;
