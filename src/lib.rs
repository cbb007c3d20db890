pub mod aim;
pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod input;
pub mod model;
pub mod rules;
pub mod stats;
pub mod storage;
