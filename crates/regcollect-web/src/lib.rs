//! regcollect-web — browser UI for the regulatory data collection backend.
//! Server-rendered pages for:
//!   - Dashboard with headline counts
//!   - Institutions and report series administration
//!   - Submission upload, filtering and validation results
//!   - Blank form and instruction downloads
//!   - Validation rules and the MDRM dictionary (analysts)
//!   - User administration (admins) and the user's own profile

pub mod config;
pub mod router;
pub mod handlers;
pub mod session;
pub mod state;
pub mod view;
