// src/lib.rs

pub mod api;
pub mod app_state;
pub mod config;
pub mod error;
pub mod name;
pub mod service;
pub mod store;
