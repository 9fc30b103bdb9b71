//! # mockchart-config
//!
//! TOML configuration for the mockchart generators.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use mockchart_config::GeneratorConfig;
//!
//! let config = GeneratorConfig::from_file(Path::new("mockchart.toml"))?;
//! let mut generator = config.build_generator()?;
//! let record = generator.generate_record(&config.record)?;
//! ```
//!
//! A missing seed means "draw one from OS entropy"; the drawn seed is logged
//! so a run can be replayed. A missing `today` means the system date.

pub mod loader;
pub mod settings;

pub use settings::{ClaimConfig, GeneratorConfig};

// ── Tests ─────────────────────────────────────────────────────────────────────
