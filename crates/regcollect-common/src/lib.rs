//! regcollect-common — Shared records, roles, token claims and errors used across all regcollect crates.

pub mod error;
pub mod records;
pub mod roles;
pub mod token;

// Re-export commonly used types
pub use error::{RegcollectError, Result};
pub use roles::{has_role, rank, Role};
pub use token::TokenClaims;
