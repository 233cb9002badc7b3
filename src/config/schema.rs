//! Schema definitions for the diffusion policy configuration record

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete configuration for a diffusion-based robot-control policy.
///
/// Defaults target the PushT benchmark: proprioceptive state plus a single
/// 96x96 camera. The fields most likely to need changing per environment are
/// `environment.state_dim`, `environment.action_dim` and
/// `environment.image_size`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffusionPolicyConfig {
    /// Environment shape descriptors
    #[serde(default)]
    pub environment: EnvironmentSpec,

    /// Temporal windowing of observations and actions
    #[serde(default)]
    pub window: WindowSpec,

    /// Per-modality input/output tensor shapes
    #[serde(default)]
    pub features: FeatureSpec,

    /// Per-modality normalization strategies
    #[serde(default)]
    pub normalization: NormalizationSpec,

    /// Vision backbone architecture
    #[serde(default)]
    pub vision: VisionSpec,

    /// Denoising Unet architecture
    #[serde(default)]
    pub unet: UnetSpec,

    /// Diffusion noise schedule
    #[serde(default)]
    pub noise_schedule: NoiseScheduleSpec,

    /// Optimizer hyperparameters
    #[serde(default)]
    pub optimizer: OptimizerSpec,

    /// Training hyperparameters
    #[serde(default)]
    pub training: TrainingSpec,

    /// Exponential moving average of model weights (`null` disables EMA)
    #[serde(default = "default_ema")]
    pub ema: Option<EmaSpec>,
}

impl DiffusionPolicyConfig {
    /// Number of reverse diffusion steps used at inference time.
    ///
    /// Falls back to the number of training timesteps when not set.
    pub fn num_inference_steps(&self) -> usize {
        self.noise_schedule
            .num_inference_steps
            .unwrap_or(self.noise_schedule.num_train_timesteps)
    }

    /// Input modality keys that carry image tensors (rank-3 shapes).
    pub fn image_input_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .features
            .input_shapes
            .iter()
            .filter(|(_, shape)| shape.len() == 3)
            .map(|(key, _)| key.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }
}

impl Default for DiffusionPolicyConfig {
    fn default() -> Self {
        Self {
            environment: EnvironmentSpec::default(),
            window: WindowSpec::default(),
            features: FeatureSpec::default(),
            normalization: NormalizationSpec::default(),
            vision: VisionSpec::default(),
            unet: UnetSpec::default(),
            noise_schedule: NoiseScheduleSpec::default(),
            optimizer: OptimizerSpec::default(),
            training: TrainingSpec::default(),
            ema: default_ema(),
        }
    }
}

/// Environment shape descriptors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentSpec {
    /// Dimensionality of the observation state space (excluding images)
    #[serde(default = "default_state_dim")]
    pub state_dim: usize,

    /// Dimensionality of the action space
    #[serde(default = "default_action_dim")]
    pub action_dim: usize,

    /// (H, W) size of the input images
    #[serde(default = "default_image_size")]
    pub image_size: (usize, usize),
}

impl Default for EnvironmentSpec {
    fn default() -> Self {
        Self {
            state_dim: default_state_dim(),
            action_dim: default_action_dim(),
            image_size: default_image_size(),
        }
    }
}

/// Temporal windowing of observations and actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSpec {
    /// Number of environment steps worth of observations passed to the policy
    /// (the current step plus additional steps going back)
    #[serde(default = "default_n_obs_steps")]
    pub n_obs_steps: usize,

    /// Diffusion model action prediction size
    #[serde(default = "default_horizon")]
    pub horizon: usize,

    /// Number of action steps run in the environment per policy invocation
    #[serde(default = "default_n_action_steps")]
    pub n_action_steps: usize,
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            n_obs_steps: default_n_obs_steps(),
            horizon: default_horizon(),
            n_action_steps: default_n_action_steps(),
        }
    }
}

/// Per-modality input/output tensor shapes.
///
/// Keys are modality names (e.g. `observation.image`); values are the
/// per-frame dimensions, excluding batch and temporal dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSpec {
    /// Shapes of the input modalities
    #[serde(default = "default_input_shapes")]
    pub input_shapes: HashMap<String, Vec<usize>>,

    /// Shapes of the output modalities
    #[serde(default = "default_output_shapes")]
    pub output_shapes: HashMap<String, Vec<usize>>,
}

impl Default for FeatureSpec {
    fn default() -> Self {
        Self {
            input_shapes: default_input_shapes(),
            output_shapes: default_output_shapes(),
        }
    }
}

/// Normalization strategy for a single modality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationMode {
    /// Subtract the mean and divide by the standard deviation
    MeanStd,
    /// Rescale into a [-1, 1] range
    MinMax,
}

impl std::fmt::Display for NormalizationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MeanStd => write!(f, "mean_std"),
            Self::MinMax => write!(f, "min_max"),
        }
    }
}

/// Per-modality normalization strategies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationSpec {
    /// Normalization applied to each input modality before inference
    #[serde(default = "default_input_modes")]
    pub input_modes: HashMap<String, NormalizationMode>,

    /// Unnormalization applied to each output modality after inference
    #[serde(default = "default_output_modes")]
    pub output_modes: HashMap<String, NormalizationMode>,
}

impl Default for NormalizationSpec {
    fn default() -> Self {
        Self {
            input_modes: default_input_modes(),
            output_modes: default_output_modes(),
        }
    }
}

/// Vision backbone architecture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionSpec {
    /// Name of the ResNet variant used to encode images
    #[serde(default = "default_backbone")]
    pub backbone: String,

    /// (H, W) crop applied before the backbone; `null` disables cropping.
    /// Must fit within `environment.image_size`.
    #[serde(default = "default_crop_shape")]
    pub crop_shape: Option<(usize, usize)>,

    /// Randomize the crop position at training time (eval always center-crops)
    #[serde(default = "default_true")]
    pub crop_is_random: bool,

    /// Initialize the backbone with pretrained weights
    #[serde(default)]
    pub use_pretrained_backbone: bool,

    /// Replace batch normalization with group normalization in the backbone
    #[serde(default = "default_true")]
    pub use_group_norm: bool,

    /// Number of keypoints for the spatial-softmax pooling head
    #[serde(default = "default_spatial_softmax_num_keypoints")]
    pub spatial_softmax_num_keypoints: usize,
}

impl Default for VisionSpec {
    fn default() -> Self {
        Self {
            backbone: default_backbone(),
            crop_shape: default_crop_shape(),
            crop_is_random: true,
            use_pretrained_backbone: false,
            use_group_norm: true,
            spatial_softmax_num_keypoints: default_spatial_softmax_num_keypoints(),
        }
    }
}

/// Denoising Unet architecture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnetSpec {
    /// Feature dimension for each stage of temporal downsampling; the number
    /// of entries controls the degree of downsampling
    #[serde(default = "default_down_dims")]
    pub down_dims: Vec<usize>,

    /// Convolutional kernel size
    #[serde(default = "default_kernel_size")]
    pub kernel_size: usize,

    /// Number of groups in the group norm of the convolutional blocks
    #[serde(default = "default_n_groups")]
    pub n_groups: usize,

    /// Output dimension of the diffusion timestep embedding network
    #[serde(default = "default_diffusion_step_embed_dim")]
    pub diffusion_step_embed_dim: usize,

    /// Use FiLM scale modulation in addition to bias modulation for
    /// conditioning
    #[serde(default = "default_true")]
    pub use_film_scale_modulation: bool,
}

impl Default for UnetSpec {
    fn default() -> Self {
        Self {
            down_dims: default_down_dims(),
            kernel_size: default_kernel_size(),
            n_groups: default_n_groups(),
            diffusion_step_embed_dim: default_diffusion_step_embed_dim(),
            use_film_scale_modulation: true,
        }
    }
}

/// Diffusion beta schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetaSchedule {
    /// Linear ramp from `beta_start` to `beta_end`
    Linear,
    /// Linear ramp in sqrt space
    ScaledLinear,
    /// Squared-cosine schedule, capped
    SquaredcosCapV2,
}

impl std::fmt::Display for BetaSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::ScaledLinear => write!(f, "scaled_linear"),
            Self::SquaredcosCapV2 => write!(f, "squaredcos_cap_v2"),
        }
    }
}

/// Quantity predicted by the denoising Unet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionType {
    /// Predict the noise added at each diffusion step
    Epsilon,
    /// Predict the denoised sample directly
    Sample,
}

impl std::fmt::Display for PredictionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Epsilon => write!(f, "epsilon"),
            Self::Sample => write!(f, "sample"),
        }
    }
}

/// Diffusion noise schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseScheduleSpec {
    /// Number of diffusion steps for the forward schedule
    #[serde(default = "default_num_train_timesteps")]
    pub num_train_timesteps: usize,

    /// Beta schedule shape
    #[serde(default = "default_beta_schedule")]
    pub beta_schedule: BetaSchedule,

    /// Beta value for the first forward-diffusion step
    #[serde(default = "default_beta_start")]
    pub beta_start: f32,

    /// Beta value for the last forward-diffusion step
    #[serde(default = "default_beta_end")]
    pub beta_end: f32,

    /// Quantity the Unet is trained to predict
    #[serde(default = "default_prediction_type")]
    pub prediction_type: PredictionType,

    /// Clip each denoised sample into [-clip_sample_range, clip_sample_range]
    /// at inference time; the action space must be normalized to fit
    #[serde(default = "default_true")]
    pub clip_sample: bool,

    /// Magnitude of the sample clipping range
    #[serde(default = "default_clip_sample_range")]
    pub clip_sample_range: f32,

    /// Number of evenly spaced reverse diffusion steps at inference time;
    /// defaults to `num_train_timesteps` when not set
    #[serde(default)]
    pub num_inference_steps: Option<usize>,
}

impl Default for NoiseScheduleSpec {
    fn default() -> Self {
        Self {
            num_train_timesteps: default_num_train_timesteps(),
            beta_schedule: default_beta_schedule(),
            beta_start: default_beta_start(),
            beta_end: default_beta_end(),
            prediction_type: default_prediction_type(),
            clip_sample: true,
            clip_sample_range: default_clip_sample_range(),
            num_inference_steps: None,
        }
    }
}

/// Optimizer hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerSpec {
    /// Learning rate
    #[serde(default = "default_lr")]
    pub lr: f32,

    /// Adam (beta1, beta2)
    #[serde(default = "default_adam_betas")]
    pub adam_betas: (f32, f32),

    /// Adam epsilon
    #[serde(default = "default_adam_eps")]
    pub adam_eps: f32,

    /// Adam weight decay
    #[serde(default = "default_adam_weight_decay")]
    pub adam_weight_decay: f32,

    /// Learning rate scheduler name (e.g. "cosine")
    #[serde(default = "default_lr_scheduler")]
    pub lr_scheduler: String,

    /// Learning rate warmup steps
    #[serde(default = "default_lr_warmup_steps")]
    pub lr_warmup_steps: usize,

    /// Maximum gradient norm for clipping
    #[serde(default = "default_grad_clip_norm")]
    pub grad_clip_norm: f32,
}

impl Default for OptimizerSpec {
    fn default() -> Self {
        Self {
            lr: default_lr(),
            adam_betas: default_adam_betas(),
            adam_eps: default_adam_eps(),
            adam_weight_decay: default_adam_weight_decay(),
            lr_scheduler: default_lr_scheduler(),
            lr_warmup_steps: default_lr_warmup_steps(),
            grad_clip_norm: default_grad_clip_norm(),
        }
    }
}

/// Training hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSpec {
    /// Batch size
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Update-to-data ratio (optimizer steps per data collection step)
    #[serde(default = "default_utd")]
    pub utd: usize,
}

impl Default for TrainingSpec {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            utd: default_utd(),
        }
    }
}

/// Exponential moving average of model weights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmaSpec {
    /// Start EMA updates after this many optimizer steps
    #[serde(default)]
    pub update_after_step: usize,

    /// Minimum EMA decay rate
    #[serde(default)]
    pub min_alpha: f32,

    /// Maximum EMA decay rate
    #[serde(default = "default_ema_max_alpha")]
    pub max_alpha: f32,

    /// Inverse multiplicative factor of the EMA warmup
    #[serde(default = "default_ema_inv_gamma")]
    pub inv_gamma: f32,

    /// Exponential factor of the EMA warmup
    #[serde(default = "default_ema_power")]
    pub power: f32,
}

impl Default for EmaSpec {
    fn default() -> Self {
        Self {
            update_after_step: 0,
            min_alpha: 0.0,
            max_alpha: default_ema_max_alpha(),
            inv_gamma: default_ema_inv_gamma(),
            power: default_ema_power(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_state_dim() -> usize {
    2
}

fn default_action_dim() -> usize {
    2
}

fn default_image_size() -> (usize, usize) {
    (96, 96)
}

fn default_n_obs_steps() -> usize {
    2
}

fn default_horizon() -> usize {
    16
}

fn default_n_action_steps() -> usize {
    8
}

fn default_input_shapes() -> HashMap<String, Vec<usize>> {
    HashMap::from([
        ("observation.image".to_string(), vec![3, 96, 96]),
        ("observation.state".to_string(), vec![2]),
    ])
}

fn default_output_shapes() -> HashMap<String, Vec<usize>> {
    HashMap::from([("action".to_string(), vec![2])])
}

fn default_input_modes() -> HashMap<String, NormalizationMode> {
    HashMap::from([
        ("observation.image".to_string(), NormalizationMode::MeanStd),
        ("observation.state".to_string(), NormalizationMode::MinMax),
    ])
}

fn default_output_modes() -> HashMap<String, NormalizationMode> {
    HashMap::from([("action".to_string(), NormalizationMode::MinMax)])
}

fn default_backbone() -> String {
    "resnet18".to_string()
}

fn default_crop_shape() -> Option<(usize, usize)> {
    Some((84, 84))
}

fn default_spatial_softmax_num_keypoints() -> usize {
    32
}

fn default_down_dims() -> Vec<usize> {
    vec![512, 1024, 2048]
}

fn default_kernel_size() -> usize {
    5
}

fn default_n_groups() -> usize {
    8
}

fn default_diffusion_step_embed_dim() -> usize {
    128
}

fn default_num_train_timesteps() -> usize {
    100
}

fn default_beta_schedule() -> BetaSchedule {
    BetaSchedule::SquaredcosCapV2
}

fn default_beta_start() -> f32 {
    1e-4
}

fn default_beta_end() -> f32 {
    0.02
}

fn default_prediction_type() -> PredictionType {
    PredictionType::Epsilon
}

fn default_clip_sample_range() -> f32 {
    1.0
}

fn default_lr() -> f32 {
    1e-4
}

fn default_adam_betas() -> (f32, f32) {
    (0.95, 0.999)
}

fn default_adam_eps() -> f32 {
    1e-8
}

fn default_adam_weight_decay() -> f32 {
    1e-6
}

fn default_lr_scheduler() -> String {
    "cosine".to_string()
}

fn default_lr_warmup_steps() -> usize {
    500
}

fn default_grad_clip_norm() -> f32 {
    10.0
}

fn default_batch_size() -> usize {
    64
}

fn default_utd() -> usize {
    1
}

fn default_ema() -> Option<EmaSpec> {
    Some(EmaSpec::default())
}

fn default_ema_max_alpha() -> f32 {
    0.9999
}

fn default_ema_inv_gamma() -> f32 {
    1.0
}

fn default_ema_power() -> f32 {
    0.75
}
