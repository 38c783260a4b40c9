//! Command handlers for the WNBA ingestion CLI.

pub mod import;
pub mod status;
