//! Domains module containing business logic organized by bounded contexts.
//!
//! - `trees`: the open-data tree catalog (query building, HTTP client,
//!   normalization, aggregation)
//! - `tools`: the MCP tool surface built on top of it

pub mod tools;
pub mod trees;
