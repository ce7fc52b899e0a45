pub mod app;
pub mod cli;
pub mod collection;
pub mod configuration;
pub mod context;
pub mod rest;
pub mod storage;
pub mod tracing;
pub mod types;
