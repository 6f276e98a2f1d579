// Library for tests to access modules

pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod scheduler;
pub mod stats;
pub mod version;
