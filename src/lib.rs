//! # Difundir: Diffusion Policy Configuration
//!
//! Difundir provides the declarative configuration record for a
//! diffusion-based robot-control policy: typed, defaulted parameters for
//! input/output tensor shapes, normalization strategies, vision-backbone and
//! denoising-network architecture, the diffusion noise schedule, and
//! optimizer/training hyperparameters, with validation of interdependent
//! fields at construction time.
//!
//! The policy implementation itself (network forward pass, diffusion
//! sampling, training loop) lives outside this crate and consumes the record
//! by value.
//!
//! ## Architecture
//!
//! - **config**: Schema, validation, fluent builders, YAML loading, CLI
//! - **error**: Crate-level error type

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{load_config, save_config, validate_config, DiffusionPolicyConfig};
pub use error::{Error, Result};
