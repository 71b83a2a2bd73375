//! Shared vocabulary for the mupen-front crates.
//!
//! Everything here is free of file-system policy: error types, the header
//! country code, progress events for long-running scans, and a few byte
//! helpers used by the header and database code.

use std::io::{Read, Seek};

pub mod country;
pub mod error;
pub mod progress;
pub mod util;

pub use country::CountryCode;
pub use error::AnalysisError;
pub use progress::ScanProgress;

/// A reader that implements both Read and Seek.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}
