//! Core library: content analysis, fingerprinting, index building, checking.

pub mod analyzer;
pub mod articles;
pub mod builder;
pub mod checker;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod repository;
