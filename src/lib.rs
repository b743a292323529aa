// Library for tests to access modules

pub mod cache;
pub mod collector;
pub mod config;
pub mod cpu_tracker;
pub mod gpu;
pub mod models;
pub mod probes;
pub mod routes;
pub mod version;
