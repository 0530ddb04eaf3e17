//! Synthetic sample generation.
//!
//! Evenly spaced x-values, y from a model plus Gaussian noise, with optional
//! random gaps (NaN y-values) to exercise missing-value handling. Output is
//! fully determined by the config (including the seed).

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{ModelKind, ModelSpec, Observation};
use crate::error::AppError;
use crate::models::predict;

/// Settings for `generate_sample`.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub model: ModelSpec,
    /// `[a, b]` for linear/power, `[a0 … a_order]` for polynomial.
    pub coefficients: Vec<f64>,
    pub n: usize,
    pub x_min: f64,
    pub x_max: f64,
    /// Standard deviation of the additive noise on y.
    pub noise: f64,
    /// Probability that a sample's y is replaced by NaN.
    pub missing_prob: f64,
    pub seed: u64,
}

impl SampleConfig {
    /// Model spec implied by a coefficient list (polynomial order = len − 1).
    pub fn model_for(kind: ModelKind, coefficients: &[f64]) -> ModelSpec {
        match kind {
            ModelKind::Linear => ModelSpec::linear(),
            ModelKind::Power => ModelSpec::power(),
            ModelKind::Polynomial => ModelSpec::polynomial(coefficients.len().saturating_sub(1)),
        }
    }
}

pub fn generate_sample(config: &SampleConfig) -> Result<Vec<Observation>, AppError> {
    validate(config)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, config.noise)
        .map_err(|e| AppError::new(2, format!("Noise distribution error: {e}")))?;

    let step = if config.n > 1 {
        (config.x_max - config.x_min) / (config.n as f64 - 1.0)
    } else {
        0.0
    };

    let mut samples = Vec::with_capacity(config.n);
    for i in 0..config.n {
        let x = config.x_min + step * i as f64;
        let y_true = predict(config.model.kind, x, &config.coefficients);
        let noise = if config.noise > 0.0 { normal.sample(&mut rng) } else { 0.0 };

        let gap: f64 = rng.r#gen();
        let y = if gap < config.missing_prob { f64::NAN } else { y_true + noise };
        samples.push(Observation::new(x, y));
    }

    Ok(samples)
}

fn validate(config: &SampleConfig) -> Result<(), AppError> {
    if config.n == 0 {
        return Err(AppError::new(2, "Sample count must be > 0."));
    }
    if !(config.x_min.is_finite() && config.x_max.is_finite() && config.x_max > config.x_min) {
        return Err(AppError::new(2, "Invalid x range for sample generation."));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(AppError::new(2, "Noise must be finite and >= 0."));
    }
    if !(0.0..1.0).contains(&config.missing_prob) {
        return Err(AppError::new(2, "Missing probability must be in [0, 1)."));
    }
    if config.model.kind == ModelKind::Polynomial && config.model.order == 0 {
        return Err(AppError::new(2, "Polynomial order must be >= 1."));
    }

    let expected = match config.model.kind {
        ModelKind::Linear | ModelKind::Power => 2,
        ModelKind::Polynomial => config.model.order + 1,
    };
    if config.coefficients.len() != expected {
        return Err(AppError::new(
            2,
            format!(
                "{} needs {expected} coefficients, got {}.",
                config.model.label(),
                config.coefficients.len()
            ),
        ));
    }
    if config.coefficients.iter().any(|c| !c.is_finite()) {
        return Err(AppError::new(2, "Coefficients must be finite."));
    }
    Ok(())
}
