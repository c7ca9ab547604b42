// src/lib.rs

//! Harvester Library
//!
//! A profile-driven product catalog crawler: declarative per-site
//! profiles describe discovery, extraction, and filtering; the engine
//! walks listing pages and produces structured product records.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod services;
pub mod storage;
pub mod utils;
