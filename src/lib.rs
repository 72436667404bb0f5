pub mod analyzer;
pub mod banner;
pub mod config;
pub mod consts;
pub mod error;
pub mod page;
pub mod relay;
pub mod scratch;
pub mod server;
