//! customer-api - REST facade for customer records over an Onyx document database
//!
//! Layers, outermost first:
//! - `cli`: argument parsing, tracing setup, process lifecycle
//! - `http_server`: axum routes and error mapping
//! - `customer`: validation, mapping, partition resolution, operations
//! - `store`: the document store contract and its implementations
//! - `config`: file and environment configuration

pub mod cli;
pub mod config;
pub mod customer;
pub mod http_server;
pub mod store;
