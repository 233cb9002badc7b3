//! Property tests for configuration validation
//!
//! Generates well-formed configurations and checks that validation accepts
//! them, rejects targeted corruptions, and that serialization preserves them.

#[cfg(test)]
mod tests {
    use crate::config::schema::*;
    use crate::config::validate::{validate_config, ValidationError};
    use proptest::prelude::*;

    // ============================================================
    // Arbitrary Generators
    // ============================================================

    fn arb_backbone() -> impl Strategy<Value = String> {
        prop_oneof!["resnet18", "resnet34", "resnet50", "resnet101"].prop_map(String::from)
    }

    fn arb_beta_schedule() -> impl Strategy<Value = BetaSchedule> {
        prop_oneof![
            Just(BetaSchedule::Linear),
            Just(BetaSchedule::ScaledLinear),
            Just(BetaSchedule::SquaredcosCapV2),
        ]
    }

    fn arb_prediction_type() -> impl Strategy<Value = PredictionType> {
        prop_oneof![Just(PredictionType::Epsilon), Just(PredictionType::Sample)]
    }

    /// A well-formed configuration: dimensions synced through the builders,
    /// crop within the image, action window within the horizon, inference
    /// steps within the training schedule.
    fn arb_valid_config() -> impl Strategy<Value = DiffusionPolicyConfig> {
        (
            (1usize..32, 1usize..32),
            (64usize..=256, 64usize..=256),
            (1usize..4, 1usize..12, 0usize..8),
            arb_backbone(),
            proptest::option::of((0usize..64, 0usize..64)),
            (arb_beta_schedule(), arb_prediction_type()),
            1usize..500,
            (1e-6f32..1e-1, 1usize..512),
        )
            .prop_flat_map(
                |(
                    (state_dim, action_dim),
                    (img_h, img_w),
                    (n_obs, n_action, slack),
                    backbone,
                    crop_margin,
                    (beta_schedule, prediction_type),
                    timesteps,
                    (lr, batch_size),
                )| {
                    proptest::option::of(1usize..=timesteps).prop_map(move |inference_steps| {
                        let horizon = n_obs - 1 + n_action + slack;
                        let mut config = DiffusionPolicyConfig::new()
                            .with_environment(state_dim, action_dim, (img_h, img_w))
                            .with_window(n_obs, horizon, n_action)
                            .with_backbone(backbone.clone())
                            .with_learning_rate(lr)
                            .with_batch_size(batch_size);
                        config.vision.crop_shape =
                            crop_margin.map(|(dh, dw)| (img_h - dh, img_w - dw));
                        config.noise_schedule.beta_schedule = beta_schedule;
                        config.noise_schedule.prediction_type = prediction_type;
                        config.noise_schedule.num_train_timesteps = timesteps;
                        config.noise_schedule.num_inference_steps = inference_steps;
                        config
                    })
                },
            )
    }

    // ============================================================
    // Validation Properties
    // ============================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_generated_config_is_valid(config in arb_valid_config()) {
            let result = validate_config(&config);
            prop_assert!(result.is_ok(), "Valid config failed validation: {:?}", result);
        }

        #[test]
        fn prop_yaml_round_trip(config in arb_valid_config()) {
            let yaml = serde_yaml::to_string(&config).unwrap();
            let parsed: DiffusionPolicyConfig = serde_yaml::from_str(&yaml).unwrap();

            prop_assert_eq!(config.environment.state_dim, parsed.environment.state_dim);
            prop_assert_eq!(config.environment.image_size, parsed.environment.image_size);
            prop_assert_eq!(config.window.horizon, parsed.window.horizon);
            prop_assert_eq!(&config.vision.backbone, &parsed.vision.backbone);
            prop_assert_eq!(config.vision.crop_shape, parsed.vision.crop_shape);
            prop_assert_eq!(
                config.noise_schedule.beta_schedule,
                parsed.noise_schedule.beta_schedule
            );
            prop_assert_eq!(
                config.noise_schedule.num_inference_steps,
                parsed.noise_schedule.num_inference_steps
            );
            prop_assert_eq!(config.ema.is_some(), parsed.ema.is_some());
            prop_assert!(validate_config(&parsed).is_ok());
        }

        #[test]
        fn prop_non_resnet_backbone_fails(
            config in arb_valid_config(),
            bad_name in "[a-z]{3,10}"
        ) {
            prop_assume!(!bad_name.starts_with("resnet"));
            let mut config = config;
            config.vision.backbone = bad_name;
            let result = validate_config(&config);
            prop_assert!(matches!(result, Err(ValidationError::UnsupportedBackbone(_))));
        }

        #[test]
        fn prop_oversized_crop_fails(
            config in arb_valid_config(),
            excess in 1usize..64
        ) {
            let mut config = config;
            let (h, w) = config.environment.image_size;
            config.vision.crop_shape = Some((h + excess, w));
            let result = validate_config(&config);
            prop_assert!(
                matches!(result, Err(ValidationError::CropExceedsImage { .. })),
                "expected CropExceedsImage"
            );
        }

        #[test]
        fn prop_action_window_overflow_fails(
            config in arb_valid_config(),
            excess in 1usize..16
        ) {
            let mut config = config;
            config.window.n_action_steps =
                config.window.horizon - config.window.n_obs_steps + 1 + excess;
            let result = validate_config(&config);
            prop_assert!(
                matches!(
                    result,
                    Err(ValidationError::ActionWindowExceedsHorizon { .. })
                ),
                "expected ActionWindowExceedsHorizon"
            );
        }

        #[test]
        fn prop_zero_batch_size_fails(config in arb_valid_config()) {
            let mut config = config;
            config.training.batch_size = 0;
            let result = validate_config(&config);
            prop_assert!(matches!(result, Err(ValidationError::InvalidBatchSize(0))));
        }

        #[test]
        fn prop_negative_lr_fails(
            config in arb_valid_config(),
            neg_lr in -1.0f32..-1e-6
        ) {
            let mut config = config;
            config.optimizer.lr = neg_lr;
            let result = validate_config(&config);
            prop_assert!(matches!(result, Err(ValidationError::InvalidLearningRate(_))));
        }

        #[test]
        fn prop_inverted_beta_range_fails(config in arb_valid_config()) {
            let mut config = config;
            config.noise_schedule.beta_start = config.noise_schedule.beta_end + 0.1;
            let result = validate_config(&config);
            prop_assert!(
                matches!(result, Err(ValidationError::InvalidBetaRange { .. })),
                "expected InvalidBetaRange"
            );
        }

        #[test]
        fn prop_inference_steps_above_train_fails(
            config in arb_valid_config(),
            excess in 1usize..100
        ) {
            let mut config = config;
            config.noise_schedule.num_inference_steps =
                Some(config.noise_schedule.num_train_timesteps + excess);
            let result = validate_config(&config);
            prop_assert!(
                matches!(
                    result,
                    Err(ValidationError::InvalidInferenceSteps { .. })
                ),
                "expected InvalidInferenceSteps"
            );
        }

        #[test]
        fn prop_state_dim_drift_fails(
            config in arb_valid_config(),
            drift in 1usize..16
        ) {
            // Changing state_dim without resyncing the shape map must fail
            let mut config = config;
            config.environment.state_dim += drift;
            let result = validate_config(&config);
            prop_assert!(
                matches!(result, Err(ValidationError::ShapeDimMismatch { .. })),
                "expected ShapeDimMismatch"
            );
        }
    }
}
