//! Request-building, validation and gateway core for the seed inventory API.
//!
//! # Overview
//! A UI shell hands raw field strings to this crate; it validates them,
//! normalizes dates, builds the HTTP request and executes it, returning the
//! status code and body for display.
//!
//! # Design
//! - `InventoryClient` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_*` interprets an `HttpResponse`, no I/O in between.
//! - `Gateway` owns the only I/O seam (`Transport`), applies the fixed
//!   timeout and never retries.
//! - `commands` is a table of named handlers so shells never duplicate the
//!   validate → build → send pipeline.
//! - DTOs are defined independently from the `mock-server` crate;
//!   integration tests catch schema drift.

pub mod client;
pub mod commands;
pub mod datetime;
pub mod error;
pub mod forms;
pub mod gateway;
pub mod http;
pub mod types;
pub mod validate;

pub use client::InventoryClient;
pub use commands::{dispatch, Command, Fields, COMMANDS};
pub use datetime::{normalize_datetime, normalize_datetime_at};
pub use error::{ApiError, Error, ValidationError};
pub use forms::{SeedFilterForm, SeedForm, SupplierFilterForm, SupplierForm};
pub use gateway::{ClientConfig, Gateway, Transport, UreqTransport};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{ApiResponse, Seed, SeedFilter, Supplier, SupplierFilter, TopSeeds};
