//! Wizard engine and publishing service for co-branded lead-capture landing pages.
//!
//! Loan officers and realtors build a page by walking a multi-step wizard,
//! optionally pairing with a partner of the other kind. Finished drafts are
//! published as flat page records that also back `.ics` and `.vcf` downloads.

pub mod config;
pub mod error;
pub mod formats;
pub mod telemetry;
pub mod workflows;

pub use error::AppError;
