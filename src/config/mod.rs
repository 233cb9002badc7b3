//! Declarative diffusion policy configuration
//!
//! This module provides the configuration record consumed by a diffusion
//! policy training/inference system, loadable from YAML.
//!
//! # Example
//!
//! ```yaml
//! environment:
//!   state_dim: 7
//!   action_dim: 7
//!   image_size: [128, 128]
//!
//! window:
//!   n_obs_steps: 2
//!   horizon: 16
//!   n_action_steps: 8
//!
//! vision:
//!   backbone: resnet18
//!   crop_shape: [112, 112]
//!
//! noise_schedule:
//!   num_train_timesteps: 100
//!   beta_schedule: squaredcos_cap_v2
//! ```

mod builder;
mod cli;
mod load;
mod schema;
mod validate;


#[cfg(test)]
mod property_tests;

pub use cli::{
    apply_overrides, parse_args, Cli, Command, InfoArgs, InitArgs, OutputFormat, OverrideArgs,
    ValidateArgs,
};
pub use load::{load_config, save_config};
pub use schema::{
    BetaSchedule, DiffusionPolicyConfig, EmaSpec, EnvironmentSpec, FeatureSpec,
    NoiseScheduleSpec, NormalizationMode, NormalizationSpec, OptimizerSpec, PredictionType,
    TrainingSpec, UnetSpec, VisionSpec, WindowSpec,
};
pub use validate::{validate_config, ValidationError};
