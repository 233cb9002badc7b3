//! Difundir CLI
//!
//! # Usage
//!
//! ```bash
//! # Write the default configuration
//! difundir init --output policy.yaml
//!
//! # Validate a config
//! difundir validate policy.yaml --detailed
//!
//! # Show the fully resolved config, with overrides applied
//! difundir info policy.yaml --format yaml --horizon 32
//! ```

use clap::Parser;
use difundir::config::{
    apply_overrides, load_config, save_config, validate_config, Cli, Command, DiffusionPolicyConfig,
    InfoArgs, InitArgs, OutputFormat, ValidateArgs,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Verbose
    } else {
        LogLevel::Normal
    };

    let result = match cli.command {
        Command::Init(args) => run_init(args, log_level),
        Command::Validate(args) => run_validate(args, log_level),
        Command::Info(args) => run_info(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum LogLevel {
    Quiet,
    Normal,
    Verbose,
}

fn log(level: LogLevel, required: LogLevel, msg: &str) {
    if level != LogLevel::Quiet && (level == required || required == LogLevel::Normal) {
        println!("{msg}");
    }
}

fn run_init(args: InitArgs, level: LogLevel) -> Result<(), String> {
    let config = DiffusionPolicyConfig::default();

    match args.output {
        Some(path) => {
            save_config(&path, &config).map_err(|e| format!("Config error: {e}"))?;
            log(
                level,
                LogLevel::Normal,
                &format!("Wrote default configuration to {}", path.display()),
            );
        }
        None => {
            let yaml = serde_yaml::to_string(&config)
                .map_err(|e| format!("Serialization error: {e}"))?;
            print!("{yaml}");
        }
    }

    Ok(())
}

fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Validating config: {}", args.config.display()),
    );

    let mut config = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    apply_overrides(&mut config, &args.overrides);
    validate_config(&config).map_err(|e| format!("Validation failed: {e}"))?;

    log(level, LogLevel::Normal, "Configuration is valid");

    if args.detailed {
        print_summary(&config);
    }

    Ok(())
}

fn run_info(args: InfoArgs) -> Result<(), String> {
    let mut config = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    apply_overrides(&mut config, &args.overrides);
    validate_config(&config).map_err(|e| format!("Validation failed: {e}"))?;

    match args.format {
        OutputFormat::Text => print_summary(&config),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&config)
                .map_err(|e| format!("Serialization error: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml =
                serde_yaml::to_string(&config).map_err(|e| format!("Serialization error: {e}"))?;
            print!("{yaml}");
        }
    }

    Ok(())
}

fn print_summary(config: &DiffusionPolicyConfig) {
    println!();
    println!("Configuration Summary:");
    println!(
        "  State dim: {}, action dim: {}",
        config.environment.state_dim, config.environment.action_dim
    );
    println!(
        "  Image size: {}x{}",
        config.environment.image_size.0, config.environment.image_size.1
    );
    println!(
        "  Windowing: {} obs steps, horizon {}, {} action steps",
        config.window.n_obs_steps, config.window.horizon, config.window.n_action_steps
    );
    println!();
    println!("  Vision backbone: {}", config.vision.backbone);
    match config.vision.crop_shape {
        Some((h, w)) => println!(
            "  Crop: {h}x{w} ({})",
            if config.vision.crop_is_random {
                "random at train time"
            } else {
                "center"
            }
        ),
        None => println!("  Crop: disabled"),
    }
    println!(
        "  Unet down dims: {:?}, kernel {}",
        config.unet.down_dims, config.unet.kernel_size
    );
    println!();
    println!(
        "  Noise schedule: {} ({} train timesteps, {} at inference)",
        config.noise_schedule.beta_schedule,
        config.noise_schedule.num_train_timesteps,
        config.num_inference_steps()
    );
    println!("  Prediction type: {}", config.noise_schedule.prediction_type);
    println!();
    println!(
        "  Optimizer: lr={}, scheduler={}",
        config.optimizer.lr, config.optimizer.lr_scheduler
    );
    println!("  Batch size: {}", config.training.batch_size);
    match &config.ema {
        Some(ema) => println!("  EMA: max alpha {}", ema.max_alpha),
        None => println!("  EMA: disabled"),
    }
}
