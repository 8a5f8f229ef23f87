//! Feed client and export shaping
//!
//! # Components
//! - [`OddsClient`]: session-scoped client over the four feed endpoints
//! - [`OddsTable`] / [`Export`]: column-union table and output container

mod client;
mod export;

pub use client::OddsClient;
pub use export::{Export, OddsTable, OutputFormat};
