//! Purpose: Typed blocking client for the test.guide REST API.
//! Exports: `api` (client, requests, service façades), `model` (wire types), `core` (errors,
//!          variant decoding).
//! Role: Library crate; applications build a `Client` and call its façades.
//! Invariants: Polymorphic JSON is resolved only by its discriminator, never by field shape.
//! Invariants: No state outlives one request/response cycle.
pub mod api;
pub mod core;
pub mod model;

pub use api::{ApiResult, Client, ClientConfig, Error, ErrorKind, Reply};
