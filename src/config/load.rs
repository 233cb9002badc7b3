//! Loading and saving configuration files

use super::schema::DiffusionPolicyConfig;
use super::validate::validate_config;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Load a policy configuration from a YAML file.
///
/// Parses, applies defaults for absent fields, and validates. A partially
/// specified document is fine; an empty one resolves to the PushT defaults.
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<DiffusionPolicyConfig> {
    let yaml_content = fs::read_to_string(config_path.as_ref()).map_err(|e| {
        Error::ConfigError(format!(
            "Failed to read config file {}: {}",
            config_path.as_ref().display(),
            e
        ))
    })?;

    let config: DiffusionPolicyConfig = serde_yaml::from_str(&yaml_content)
        .map_err(|e| Error::ConfigError(format!("Failed to parse YAML config: {}", e)))?;

    validate_config(&config)?;

    Ok(config)
}

/// Save a policy configuration to a YAML file.
///
/// The configuration is validated before writing so a saved file always
/// loads back cleanly.
pub fn save_config<P: AsRef<Path>>(config_path: P, config: &DiffusionPolicyConfig) -> Result<()> {
    validate_config(config)?;

    let yaml_content = serde_yaml::to_string(config)
        .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

    fs::write(config_path.as_ref(), yaml_content).map_err(|e| {
        Error::ConfigError(format!(
            "Failed to write config file {}: {}",
            config_path.as_ref().display(),
            e
        ))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_config() {
        let yaml = r#"
environment:
  state_dim: 2
  action_dim: 2

window:
  horizon: 16

vision:
  backbone: resnet18
  crop_shape: [84, 84]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.vision.backbone, "resnet18");
        assert_eq!(config.window.horizon, 16);
        // Absent sections keep defaults
        assert_eq!(config.training.batch_size, 64);
    }

    #[test]
    fn test_load_invalid_config() {
        let yaml = r#"
vision:
  backbone: resnet18
  crop_shape: [104, 104]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let result = load_config(temp_file.path());
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_load_malformed_yaml() {
        let yaml = "this is not valid yaml: [}";

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let result = load_config(temp_file.path());
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config("definitely/not/here.yaml");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_save_then_load() {
        let config = DiffusionPolicyConfig::new()
            .with_environment(7, 7, (128, 128))
            .with_backbone("resnet34")
            .without_ema();

        let temp_file = NamedTempFile::new().unwrap();
        save_config(temp_file.path(), &config).unwrap();

        let loaded = load_config(temp_file.path()).unwrap();
        assert_eq!(loaded.environment.state_dim, 7);
        assert_eq!(loaded.vision.backbone, "resnet34");
        assert!(loaded.ema.is_none());
    }

    #[test]
    fn test_save_rejects_invalid_config() {
        let mut config = DiffusionPolicyConfig::default();
        config.vision.backbone = "vit_b_16".to_string();

        let temp_file = NamedTempFile::new().unwrap();
        let result = save_config(temp_file.path(), &config);
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
