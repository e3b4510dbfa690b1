//! Report aggregation and rendering
//!
//! The pipeline produces markdown ([`markdown::aggregate`]); the CLI parses
//! it back into sections ([`markdown::parse`]) and renders the styled HTML
//! document ([`html`]) with an embedded SVG price chart ([`chart`]).

pub mod chart;
pub mod html;
pub mod markdown;

pub use markdown::{ParsedReport, Section, aggregate, parse};
