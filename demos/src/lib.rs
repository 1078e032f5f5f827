//! Shared helpers for the demo binaries.

use pipeline_rs::{BoxError, Records};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber honouring `RUST_LOG` (default `info`).
pub fn setup_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// One labelled iris flower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flower {
    pub features: [f64; 4],
    pub class: String,
}

/// A set of flowers plus the per-class mean of every feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IrisModel {
    pub flowers: Vec<Flower>,
    pub centroids: Vec<(String, [f64; 4])>,
}

impl IrisModel {
    /// Encodes `sepal_len,sepal_wid,petal_len,petal_wid,class` rows.
    pub fn from_records(records: Records) -> Result<Self, BoxError> {
        let mut flowers = Vec::with_capacity(records.len());
        for (index, row) in records.into_iter().enumerate() {
            let [a, b, c, d, class] = <[String; 5]>::try_from(row)
                .map_err(|row| format!("row {}: expected 5 fields, got {}", index + 1, row.len()))?;
            flowers.push(Flower {
                features: [a.parse()?, b.parse()?, c.parse()?, d.parse()?],
                class,
            });
        }
        Ok(Self {
            flowers,
            centroids: Vec::new(),
        })
    }

    /// Returns a copy with centroids computed from the flowers.
    pub fn fit(&self) -> Result<Self, BoxError> {
        if self.flowers.is_empty() {
            return Err("cannot fit an empty dataset".into());
        }
        let mut centroids: Vec<(String, [f64; 4], f64)> = Vec::new();
        for flower in &self.flowers {
            let index = match centroids.iter().position(|(class, _, _)| *class == flower.class) {
                Some(index) => index,
                None => {
                    centroids.push((flower.class.clone(), [0.0; 4], 0.0));
                    centroids.len() - 1
                }
            };
            let (_, sum, count) = &mut centroids[index];
            for (acc, value) in sum.iter_mut().zip(flower.features) {
                *acc += value;
            }
            *count += 1.0;
        }
        Ok(Self {
            flowers: self.flowers.clone(),
            centroids: centroids
                .into_iter()
                .map(|(class, sum, count)| (class, sum.map(|s| s / count)))
                .collect(),
        })
    }

    /// Class of the nearest centroid.
    pub fn predict(&self, features: [f64; 4]) -> Option<&str> {
        self.centroids
            .iter()
            .map(|(class, centroid)| {
                let distance: f64 = centroid
                    .iter()
                    .zip(features)
                    .map(|(c, f)| (c - f).powi(2))
                    .sum();
                (class.as_str(), distance)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(class, _)| class)
    }

    /// Share of flowers whose own class is predicted.
    pub fn accuracy(&self) -> f64 {
        if self.flowers.is_empty() {
            return 0.0;
        }
        let hits = self
            .flowers
            .iter()
            .filter(|f| self.predict(f.features) == Some(f.class.as_str()))
            .count();
        hits as f64 / self.flowers.len() as f64
    }
}
