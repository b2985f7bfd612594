// Library root — exposes internals for integration tests and the binaries.
// The server entry point is src/main.rs; the authoring shell is
// src/bin/add_business.rs.

pub mod authoring;
pub mod chat;
pub mod config;
pub mod contact;
pub mod error;
pub mod llm;
pub mod logger;
pub mod server;
pub mod store;
