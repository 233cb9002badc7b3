//! Configuration validation

use super::schema::DiffusionPolicyConfig;

/// Validation error type
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Unsupported vision backbone: {0} (must be a ResNet variant)")]
    UnsupportedBackbone(String),

    #[error("Crop shape {crop:?} does not fit within image size {image:?}")]
    CropExceedsImage {
        crop: (usize, usize),
        image: (usize, usize),
    },

    #[error("Invalid observation steps: {0} (must be >= 1)")]
    InvalidObservationSteps(usize),

    #[error("Invalid horizon: {0} (must be >= 1)")]
    InvalidHorizon(usize),

    #[error("Invalid action steps: {0} (must be >= 1)")]
    InvalidActionSteps(usize),

    #[error(
        "Action window does not fit the horizon: n_obs_steps - 1 + n_action_steps = {window} > horizon = {horizon}"
    )]
    ActionWindowExceedsHorizon { window: usize, horizon: usize },

    #[error("Shape for {key} ends in {got} but {dim_name} is {expected}")]
    ShapeDimMismatch {
        key: String,
        dim_name: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Empty shape for modality {0}")]
    EmptyShape(String),

    #[error("Unet down_dims must not be empty")]
    EmptyDownDims,

    #[error("Unet stage dimension {dim} is not divisible by n_groups = {n_groups}")]
    DownDimNotGrouped { dim: usize, n_groups: usize },

    #[error("Invalid kernel size: {0} (must be >= 1)")]
    InvalidKernelSize(usize),

    #[error("Invalid diffusion step embedding dimension: {0} (must be >= 1)")]
    InvalidStepEmbedDim(usize),

    #[error("Invalid spatial softmax keypoint count: {0} (must be >= 1)")]
    InvalidKeypoints(usize),

    #[error("Invalid training timesteps: {0} (must be >= 1)")]
    InvalidTrainTimesteps(usize),

    #[error("Invalid beta range: start = {start}, end = {end} (need 0 < start <= end < 1)")]
    InvalidBetaRange { start: f32, end: f32 },

    #[error("Invalid inference steps: {inference} (must be in 1..={train})")]
    InvalidInferenceSteps { inference: usize, train: usize },

    #[error("Invalid clip sample range: {0} (must be > 0.0)")]
    InvalidClipSampleRange(f32),

    #[error("Invalid learning rate: {0} (must be > 0.0)")]
    InvalidLearningRate(f32),

    #[error("Invalid gradient clip norm: {0} (must be > 0.0)")]
    InvalidGradClipNorm(f32),

    #[error("Invalid batch size: {0} (must be > 0)")]
    InvalidBatchSize(usize),

    #[error("Invalid update-to-data ratio: {0} (must be >= 1)")]
    InvalidUtd(usize),
}

/// Validate a diffusion policy configuration
///
/// Checks:
/// - The vision backbone denotes a supported ResNet variant
/// - The crop fits within the image
/// - Temporal windowing is self-consistent
/// - Shape maps agree with the environment dimensions
/// - Numeric values are in valid ranges
pub fn validate_config(config: &DiffusionPolicyConfig) -> Result<(), ValidationError> {
    // Vision backbone
    if !config.vision.backbone.starts_with("resnet") {
        return Err(ValidationError::UnsupportedBackbone(
            config.vision.backbone.clone(),
        ));
    }

    // Crop must fit within the image
    if let Some(crop) = config.vision.crop_shape {
        let image = config.environment.image_size;
        if crop.0 > image.0 || crop.1 > image.1 {
            return Err(ValidationError::CropExceedsImage { crop, image });
        }
    }

    // Temporal windowing
    let window = &config.window;
    if window.n_obs_steps == 0 {
        return Err(ValidationError::InvalidObservationSteps(window.n_obs_steps));
    }
    if window.horizon == 0 {
        return Err(ValidationError::InvalidHorizon(window.horizon));
    }
    if window.n_action_steps == 0 {
        return Err(ValidationError::InvalidActionSteps(window.n_action_steps));
    }
    // The executed slice starts at n_obs_steps - 1 and runs for n_action_steps
    let executed = window.n_obs_steps - 1 + window.n_action_steps;
    if executed > window.horizon {
        return Err(ValidationError::ActionWindowExceedsHorizon {
            window: executed,
            horizon: window.horizon,
        });
    }

    // Shape maps agree with the environment dimensions
    for (key, shape) in &config.features.input_shapes {
        if shape.is_empty() {
            return Err(ValidationError::EmptyShape(key.clone()));
        }
    }
    for (key, shape) in &config.features.output_shapes {
        if shape.is_empty() {
            return Err(ValidationError::EmptyShape(key.clone()));
        }
    }
    if let Some(shape) = config.features.input_shapes.get("observation.state") {
        let got = shape[shape.len() - 1];
        if got != config.environment.state_dim {
            return Err(ValidationError::ShapeDimMismatch {
                key: "observation.state".to_string(),
                dim_name: "state_dim",
                expected: config.environment.state_dim,
                got,
            });
        }
    }
    if let Some(shape) = config.features.output_shapes.get("action") {
        let got = shape[shape.len() - 1];
        if got != config.environment.action_dim {
            return Err(ValidationError::ShapeDimMismatch {
                key: "action".to_string(),
                dim_name: "action_dim",
                expected: config.environment.action_dim,
                got,
            });
        }
    }

    // Unet architecture
    if config.unet.down_dims.is_empty() {
        return Err(ValidationError::EmptyDownDims);
    }
    for &dim in &config.unet.down_dims {
        if config.unet.n_groups == 0 || dim % config.unet.n_groups != 0 {
            return Err(ValidationError::DownDimNotGrouped {
                dim,
                n_groups: config.unet.n_groups,
            });
        }
    }
    if config.unet.kernel_size == 0 {
        return Err(ValidationError::InvalidKernelSize(config.unet.kernel_size));
    }
    if config.unet.diffusion_step_embed_dim == 0 {
        return Err(ValidationError::InvalidStepEmbedDim(
            config.unet.diffusion_step_embed_dim,
        ));
    }
    if config.vision.spatial_softmax_num_keypoints == 0 {
        return Err(ValidationError::InvalidKeypoints(
            config.vision.spatial_softmax_num_keypoints,
        ));
    }

    // Noise schedule
    let schedule = &config.noise_schedule;
    if schedule.num_train_timesteps == 0 {
        return Err(ValidationError::InvalidTrainTimesteps(
            schedule.num_train_timesteps,
        ));
    }
    if schedule.beta_start <= 0.0
        || schedule.beta_end >= 1.0
        || schedule.beta_start > schedule.beta_end
    {
        return Err(ValidationError::InvalidBetaRange {
            start: schedule.beta_start,
            end: schedule.beta_end,
        });
    }
    if let Some(steps) = schedule.num_inference_steps {
        if steps == 0 || steps > schedule.num_train_timesteps {
            return Err(ValidationError::InvalidInferenceSteps {
                inference: steps,
                train: schedule.num_train_timesteps,
            });
        }
    }
    if schedule.clip_sample && schedule.clip_sample_range <= 0.0 {
        return Err(ValidationError::InvalidClipSampleRange(
            schedule.clip_sample_range,
        ));
    }

    // Optimizer / training
    if config.optimizer.lr <= 0.0 {
        return Err(ValidationError::InvalidLearningRate(config.optimizer.lr));
    }
    if config.optimizer.grad_clip_norm <= 0.0 {
        return Err(ValidationError::InvalidGradClipNorm(
            config.optimizer.grad_clip_norm,
        ));
    }
    if config.training.batch_size == 0 {
        return Err(ValidationError::InvalidBatchSize(config.training.batch_size));
    }
    if config.training.utd == 0 {
        return Err(ValidationError::InvalidUtd(config.training.utd));
    }

    Ok(())
}
