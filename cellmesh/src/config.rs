//! Recognized configuration options, loadable
//! from a TOML file.

use serde::{Deserialize, Serialize};

use cell_store::StoreConfig;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LshConfig {
    pub lsh_bit_count: usize,
    pub lsh_seed: u64,
}

impl Default for LshConfig {
    fn default() -> LshConfig {
        LshConfig {
            lsh_bit_count: 256,
            lsh_seed: 0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarPairsConfig {
    pub k: usize,
    pub similarity_threshold: f64,
}

impl Default for SimilarPairsConfig {
    fn default() -> SimilarPairsConfig {
        SimilarPairsConfig {
            k: 30,
            similarity_threshold: 0.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    pub max_iterations: usize,
    pub min_cluster_size: usize,
    /// Seeds the per-iteration vertex permutation so label propagation is
    /// reproducible.
    pub permutation_seed: u64,
}

impl Default for ClusteringConfig {
    fn default() -> ClusteringConfig {
        ClusteringConfig {
            max_iterations: 100,
            min_cluster_size: 1,
            permutation_seed: 0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DownsampleConfig {
    pub downsample_probability: f64,
    pub downsample_seed: u64,
}

impl Default for DownsampleConfig {
    fn default() -> DownsampleConfig {
        DownsampleConfig {
            downsample_probability: 1.0,
            downsample_seed: 0,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfigToml,
    pub lsh: LshConfig,
    pub similar_pairs: SimilarPairsConfig,
    pub clustering: ClusteringConfig,
    pub downsample: DownsampleConfig,
}

/// `cell_store::StoreConfig` mirrored with `serde` derives (the upstream
/// type intentionally stays free of a `serde` dependency).
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfigToml {
    pub gene_capacity: usize,
    pub cell_capacity: usize,
    pub cell_meta_data_name_capacity: usize,
    pub cell_meta_data_value_capacity: usize,
}

impl Default for StoreConfigToml {
    fn default() -> StoreConfigToml {
        StoreConfigToml::from(StoreConfig::default())
    }
}

impl From<StoreConfig> for StoreConfigToml {
    fn from(c: StoreConfig) -> StoreConfigToml {
        StoreConfigToml {
            gene_capacity: c.gene_capacity,
            cell_capacity: c.cell_capacity,
            cell_meta_data_name_capacity: c.cell_meta_data_name_capacity,
            cell_meta_data_value_capacity: c.cell_meta_data_value_capacity,
        }
    }
}

impl From<StoreConfigToml> for StoreConfig {
    fn from(c: StoreConfigToml) -> StoreConfig {
        StoreConfig {
            gene_capacity: c.gene_capacity,
            cell_capacity: c.cell_capacity,
            cell_meta_data_name_capacity: c.cell_meta_data_name_capacity,
            cell_meta_data_value_capacity: c.cell_meta_data_value_capacity,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<std::path::Path>) -> crate::errors::Result<Config> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}
