//! Fluent construction helpers for the configuration record

use super::schema::{DiffusionPolicyConfig, EmaSpec};

impl DiffusionPolicyConfig {
    /// Create a configuration with the PushT defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the environment dimensions.
    ///
    /// Keeps the standard modality entries in the shape maps
    /// (`observation.image`, `observation.state`, `action`) in sync with the
    /// new dimensions.
    pub fn with_environment(
        mut self,
        state_dim: usize,
        action_dim: usize,
        image_size: (usize, usize),
    ) -> Self {
        self.environment.state_dim = state_dim;
        self.environment.action_dim = action_dim;
        self.environment.image_size = image_size;

        self.features.input_shapes.insert(
            "observation.image".to_string(),
            vec![3, image_size.0, image_size.1],
        );
        self.features
            .input_shapes
            .insert("observation.state".to_string(), vec![state_dim]);
        self.features
            .output_shapes
            .insert("action".to_string(), vec![action_dim]);
        self
    }

    /// Set the temporal windowing
    pub fn with_window(
        mut self,
        n_obs_steps: usize,
        horizon: usize,
        n_action_steps: usize,
    ) -> Self {
        self.window.n_obs_steps = n_obs_steps;
        self.window.horizon = horizon;
        self.window.n_action_steps = n_action_steps;
        self
    }

    /// Set the vision backbone
    pub fn with_backbone(mut self, backbone: impl Into<String>) -> Self {
        self.vision.backbone = backbone.into();
        self
    }

    /// Set the preprocessing crop
    pub fn with_crop(mut self, height: usize, width: usize) -> Self {
        self.vision.crop_shape = Some((height, width));
        self
    }

    /// Disable preprocessing crops
    pub fn without_crop(mut self) -> Self {
        self.vision.crop_shape = None;
        self
    }

    /// Set the learning rate
    pub fn with_learning_rate(mut self, lr: f32) -> Self {
        self.optimizer.lr = lr;
        self
    }

    /// Set the batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.training.batch_size = batch_size;
        self
    }

    /// Set the number of reverse diffusion steps used at inference time
    pub fn with_inference_steps(mut self, steps: usize) -> Self {
        self.noise_schedule.num_inference_steps = Some(steps);
        self
    }

    /// Enable EMA with the given parameters
    pub fn with_ema(mut self, ema: EmaSpec) -> Self {
        self.ema = Some(ema);
        self
    }

    /// Disable EMA
    pub fn without_ema(mut self) -> Self {
        self.ema = None;
        self
    }
}
