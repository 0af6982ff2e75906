//! Kernel tolerances and limits.

use std::path::Path;

use eyre::WrapErr;
use serde::{Deserialize, Serialize};
use solidmath::Float;
use solidmath::roots::RootLimits;

use crate::{KernelError, KernelResult};

const CONFIG_FILE_FORMAT: config::FileFormat = config::FileFormat::Yaml;
const DEFAULT_CONFIG_STR: &str = include_str!("default_config.yaml");
/// Prefix for environment variables that override config values, such as
/// `SOLIDCSG_MAX_ROOTS`.
pub const ENV_PREFIX: &str = "SOLIDCSG";

/// Tolerances and limits used by a [`crate::SetSpace`] and everything built
/// from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Tolerance for comparing primitive coefficients in `same()`.
    pub same_tolerance: Float,
    /// Width below which interval bisection stops, and distance below which
    /// two roots are merged.
    pub root_tolerance: Float,
    /// Maximum number of roots reported per primitive per ray.
    pub max_roots: usize,
    /// Maximum number of refinement iterations per root.
    pub max_iterations: usize,
    /// Fraction of a box's width by which each half is grown across a cut.
    pub swell_fraction: Float,
    /// Whether `prune()` regularizes its result.
    pub regularize_after_prune: bool,
    /// Redivision forks onto the thread pool for nodes shallower than this.
    pub parallel_depth: u32,
}
impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            same_tolerance: 0.000001,
            root_tolerance: 0.000000001,
            max_roots: 32,
            max_iterations: 100,
            swell_fraction: 0.001,
            regularize_after_prune: false,
            parallel_depth: 4,
        }
    }
}

impl KernelConfig {
    /// Loads the built-in defaults, overridden by `SOLIDCSG_*` environment
    /// variables.
    pub fn load() -> KernelResult<Self> {
        Self::load_layered(None)
    }
    /// Loads the built-in defaults, overridden by a YAML file and then by
    /// `SOLIDCSG_*` environment variables.
    pub fn load_file(path: &Path) -> eyre::Result<Self> {
        Self::load_layered(Some(config::File::from(path).format(CONFIG_FILE_FORMAT)))
            .wrap_err_with(|| format!("loading kernel config from {}", path.display()))
    }
    /// Loads the built-in defaults overridden by a YAML string. Environment
    /// variables are ignored.
    pub fn from_yaml_str(s: &str) -> KernelResult<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG_STR, CONFIG_FILE_FORMAT))
            .add_source(config::File::from_str(s, CONFIG_FILE_FORMAT))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn load_layered(
        user_source: Option<config::File<config::FileSourceFile, config::FileFormat>>,
    ) -> KernelResult<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG_STR, CONFIG_FILE_FORMAT));
        if let Some(source) = user_source {
            builder = builder.add_source(source);
        }
        let config: Self = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        tracing::debug!(?config, "loaded kernel config");
        Ok(config)
    }

    /// Returns an error if any tolerance or limit is out of range.
    pub fn validate(&self) -> KernelResult<()> {
        let positive = [
            ("same_tolerance", self.same_tolerance),
            ("root_tolerance", self.root_tolerance),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(KernelError::InvalidConfig(format!(
                    "{name} must be positive; got {value}",
                )));
            }
        }
        if !(0.0..0.5).contains(&self.swell_fraction) {
            return Err(KernelError::InvalidConfig(format!(
                "swell_fraction must be in [0, 0.5); got {}",
                self.swell_fraction,
            )));
        }
        if self.max_roots == 0 || self.max_iterations == 0 {
            return Err(KernelError::InvalidConfig(
                "max_roots and max_iterations must be nonzero".to_owned(),
            ));
        }
        Ok(())
    }

    /// Returns the limits to use for polynomial root finding.
    pub fn root_limits(&self) -> RootLimits {
        RootLimits {
            tolerance: self.root_tolerance,
            max_iterations: self.max_iterations,
            max_roots: self.max_roots,
        }
    }
}
