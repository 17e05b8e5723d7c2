use std::path::Path;

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::config::CONFIG_ENV_PREFIX;
use crate::error::{CommonError, CommonResult};

const DEFAULT_CONFIG: &str = include_str!("default.toml");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub split: SplitConfig,
    pub fit: FitConfig,
    pub evaluation: EvaluationConfig,
    pub demo: DemoConfig,
}

impl AppConfig {
    /// Loads the embedded defaults overridden by `COLLINEAR__*` environment variables.
    pub fn load() -> CommonResult<Self> {
        Self::extract(Self::figment())
    }

    /// Like [`AppConfig::load`], with an additional TOML file layered
    /// between the defaults and the environment.
    pub fn load_with_file(path: impl AsRef<Path>) -> CommonResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(CommonError::invalid(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }
        let figment = Figment::from(Toml::string(DEFAULT_CONFIG))
            .admerge(Toml::file(path))
            .admerge(Self::env());
        Self::extract(figment)
    }

    fn figment() -> Figment {
        Figment::from(Toml::string(DEFAULT_CONFIG)).admerge(Self::env())
    }

    fn env() -> Env {
        Env::prefixed(CONFIG_ENV_PREFIX).map(|p| p.as_str().replace("__", ".").into())
    }

    fn extract(figment: Figment) -> CommonResult<Self> {
        let config: Self = figment
            .extract()
            .map_err(|e| CommonError::InvalidArgument(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CommonResult<()> {
        let fraction = self.split.train_fraction;
        if !(fraction > 0.0 && fraction < 1.0) {
            return Err(CommonError::invalid(format!(
                "split.train_fraction must be in (0, 1), got {fraction}"
            )));
        }
        if self.demo.rows == 0 {
            return Err(CommonError::invalid("demo.rows must be positive"));
        }
        if !self.demo.noise.is_finite() || self.demo.noise < 0.0 {
            return Err(CommonError::invalid(format!(
                "demo.noise must be a non-negative number, got {}",
                self.demo.noise
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    pub train_fraction: f64,
    pub seed: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitConfig {
    /// One of `auto`, `svd` or `normal-equation`.
    pub solver: String,
    pub fit_intercept: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// One of `r2`, `mse`, `rmse`, `mae` or `var`.
    pub metric: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    pub rows: usize,
    pub noise: f64,
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn test_load_defaults() {
        Jail::expect_with(|_| {
            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.split.train_fraction, 0.8);
            assert_eq!(config.split.seed, 42);
            assert_eq!(config.fit.solver, "auto");
            assert!(config.fit.fit_intercept);
            assert_eq!(config.evaluation.metric, "r2");
            assert_eq!(config.demo.rows, 1000);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides() {
        Jail::expect_with(|jail| {
            jail.set_env("COLLINEAR__SPLIT__SEED", "7");
            jail.set_env("COLLINEAR__FIT__SOLVER", "svd");
            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.split.seed, 7);
            assert_eq!(config.fit.solver, "svd");
            Ok(())
        });
    }

    #[test]
    fn test_file_overrides() {
        Jail::expect_with(|jail| {
            jail.create_file("collinear.toml", "[split]\ntrain_fraction = 0.5\n")?;
            let config = AppConfig::load_with_file("collinear.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.split.train_fraction, 0.5);
            assert_eq!(config.split.seed, 42);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_train_fraction() {
        Jail::expect_with(|jail| {
            jail.set_env("COLLINEAR__SPLIT__TRAIN_FRACTION", "1.5");
            assert!(matches!(
                AppConfig::load(),
                Err(CommonError::InvalidArgument(_))
            ));
            Ok(())
        });
    }
}
