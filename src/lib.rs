pub mod apis;
pub mod arguments;
pub mod cache;
pub mod config;
pub mod errors;
pub mod logger;
pub mod notes;
pub mod signals;
pub mod validation;

#[cfg(feature = "web")]
pub mod webserver;
