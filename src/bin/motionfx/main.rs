//! motionfx - play a test tone through the effects chain while a motion
//! sensor steers its parameters.
//!
//! Run with: cargo run --bin motionfx -- [--config fx.yaml] [--telemetry FILE] [--seconds N]
//!
//! Telemetry bytes are read from stdin unless `--telemetry` names a file or
//! device node.

mod app;

use std::path::PathBuf;

use app::{MotionFx, TelemetryInput};
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use motion_fx::EngineConfig;

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config_path: Option<PathBuf> = None;
    let mut input = TelemetryInput::Stdin;
    let mut seconds: Option<f64> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or_else(|| eyre!("--config needs a path"))?;
                config_path = Some(PathBuf::from(path));
            }
            "--telemetry" => {
                let path = args.next().ok_or_else(|| eyre!("--telemetry needs a path"))?;
                input = TelemetryInput::File(PathBuf::from(path));
            }
            "--seconds" => {
                let value = args.next().ok_or_else(|| eyre!("--seconds needs a value"))?;
                seconds = Some(value.parse().wrap_err_with(|| format!("invalid --seconds value {value:?}"))?);
            }
            other => return Err(eyre!("unknown argument {other:?}")),
        }
    }

    let config = match config_path {
        Some(path) => EngineConfig::load(&path).wrap_err("failed to load config")?,
        None => EngineConfig::default(),
    };

    MotionFx::new(config).telemetry(input).run_for(seconds)
}
