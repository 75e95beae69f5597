//! CLI command implementations.

pub mod build;
pub mod dev;
pub mod feed;
pub mod generate;
pub mod init;
pub mod serve;
