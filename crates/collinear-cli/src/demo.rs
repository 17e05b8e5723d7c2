//! A synthetic fuel-consumption dataset with deliberately collinear columns.

use collinear_common::config::DemoConfig;
use collinear_common::error::{CommonError, CommonResult};
use collinear_ml::Dataset;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

pub const FEATURES: [&str; 4] = ["engine_size", "fuel_city", "fuel_hwy", "fuel_comb"];
pub const TARGET: &str = "co2_emissions";

/// Generates `config.rows` vehicles.
///
/// City and highway consumption both grow with engine size, and combined
/// consumption is `0.55·city + 0.45·hwy`, so the four features are rank
/// deficient. CO₂ is `20 + 4·engine + 23·comb` plus Gaussian noise.
pub fn fuel_consumption(config: &DemoConfig) -> CommonResult<Dataset> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let consumption_noise =
        Normal::new(0.0, 0.6).map_err(|e| CommonError::internal(e.to_string()))?;
    let emission_noise = Normal::new(0.0, config.noise)
        .map_err(|e| CommonError::invalid(format!("demo noise: {e}")))?;

    let rows = config.rows;
    let mut engine = Vec::with_capacity(rows);
    let mut city = Vec::with_capacity(rows);
    let mut hwy = Vec::with_capacity(rows);
    let mut comb = Vec::with_capacity(rows);
    let mut co2 = Vec::with_capacity(rows);
    for _ in 0..rows {
        let e: f64 = rng.random_range(1.0..6.5);
        let c = 4.5 + 2.3 * e + consumption_noise.sample(&mut rng);
        let h = 3.2 + 1.4 * e + consumption_noise.sample(&mut rng);
        let m = 0.55 * c + 0.45 * h;
        engine.push(e);
        city.push(c);
        hwy.push(h);
        comb.push(m);
        co2.push(20.0 + 4.0 * e + 23.0 * m + emission_noise.sample(&mut rng));
    }
    Dataset::new(vec![
        (FEATURES[0].to_string(), engine),
        (FEATURES[1].to_string(), city),
        (FEATURES[2].to_string(), hwy),
        (FEATURES[3].to_string(), comb),
        (TARGET.to_string(), co2),
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use collinear_ml::{pearson_correlation, LinearRegression};

    use super::*;

    fn config(rows: usize) -> DemoConfig {
        DemoConfig {
            rows,
            noise: 4.0,
            seed: 7,
        }
    }

    #[test]
    fn test_demo_is_deterministic() {
        assert_eq!(
            fuel_consumption(&config(50)).unwrap(),
            fuel_consumption(&config(50)).unwrap()
        );
    }

    #[test]
    fn test_demo_columns_are_collinear() {
        let dataset = fuel_consumption(&config(500)).unwrap();
        assert_eq!(dataset.num_rows(), 500);
        let engine = dataset.column("engine_size").unwrap();
        let city = dataset.column("fuel_city").unwrap();
        assert!(pearson_correlation(engine, city).unwrap() > 0.9);

        let x = dataset.feature_matrix(&FEATURES).unwrap();
        let y = dataset.target(TARGET).unwrap();
        let model = LinearRegression::new().fit(&x, &y).unwrap();
        assert!(model.is_rank_deficient());
    }

    #[test]
    fn test_demo_rejects_negative_noise() {
        let config = DemoConfig {
            rows: 10,
            noise: -1.0,
            seed: 1,
        };
        assert!(matches!(
            fuel_consumption(&config),
            Err(CommonError::InvalidArgument(_))
        ));
    }
}
