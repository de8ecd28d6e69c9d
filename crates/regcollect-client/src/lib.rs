//! regcollect-client — Typed client for the collection backend's REST API.
//!
//! One module per backend resource, each adding methods to [`ApiClient`]:
//!   - auth:          login, logout, profile
//!   - institutions:  CRUD on /institutions
//!   - report_series: CRUD on /report-series
//!   - submissions:   list, detail, upload, validate, status changes
//!   - forms:         form listing and PDF downloads
//!   - validation:    rules and per-submission results
//!   - mdrm:          dictionary listing and search
//!   - users:         user administration and self-service profile updates

pub mod client;
pub mod auth;
pub mod institutions;
pub mod report_series;
pub mod submissions;
pub mod forms;
pub mod validation;
pub mod mdrm;
pub mod users;

pub use client::ApiClient;
