pub mod app;
pub mod cli;
pub mod config;
pub mod detector;
pub mod filter;
pub mod model;
pub mod paginator;
pub mod poller;
pub mod render;
pub mod runner;
pub mod session;
pub mod source;
pub mod utils;

#[cfg(test)]
mod tests;
