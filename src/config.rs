use serde::{Deserialize, Serialize};

use crate::types::Smoothing;

///Engine configuration, loadable from a TOML file.
///Every field has a default so partial files are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ngram: NgramConfig,
    pub corpus: CorpusConfig,
    pub domain: DomainConfig,
    pub edit_distance: EditDistanceConfig,
    pub error_handling: ErrorHandlingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NgramConfig {
    ///Order of the highest n-gram table kept beyond the bigram/trigram
    ///tables, for on-the-fly lookups
    pub size: usize,

    ///Counts below this threshold are ignored by the generic n-gram lookup
    pub min_freq_threshold: u64,

    ///Cap on candidates generated per out-of-vocabulary token
    pub max_candidates: usize,

    pub smoothing: Smoothing,
}

impl Default for NgramConfig {
    fn default() -> Self {
        Self {
            size: 3,
            min_freq_threshold: 1,
            max_candidates: 20,
            smoothing: Smoothing::AddOne,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    ///Location of the prepared training text
    pub merged_corpus: String,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            merged_corpus: "data/merged_corpus.txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainConfig {
    ///Newline-separated lowercase medical terms; a missing file is treated
    ///as an empty set
    pub medical_terms_file: String,

    ///Multiplicative boost applied to in-domain candidate scores, must be > 0
    pub domain_weight: f64,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            medical_terms_file: "data/medical_terms.txt".to_string(),
            domain_weight: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditDistanceConfig {
    pub max_distance: usize,
    pub allow_transpose: bool,
    pub substitution_cost: usize,
    pub insertion_cost: usize,
    pub deletion_cost: usize,
    pub transpose_cost: usize,
    pub max_candidates: usize,
}

impl Default for EditDistanceConfig {
    fn default() -> Self {
        Self {
            max_distance: 2,
            allow_transpose: true,
            substitution_cost: 1,
            insertion_cost: 1,
            deletion_cost: 1,
            transpose_cost: 1,
            max_candidates: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorHandlingConfig {
    ///Cap on suggestions emitted per error record
    pub max_suggestions: usize,

    pub error_types: ErrorTypeToggles,
}

impl Default for ErrorHandlingConfig {
    fn default() -> Self {
        Self {
            max_suggestions: 5,
            error_types: ErrorTypeToggles::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorTypeToggles {
    ///Emit advisory homophone records for in-vocabulary tokens
    pub homophone: bool,
}

impl Default for ErrorTypeToggles {
    fn default() -> Self {
        Self { homophone: true }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ngram: NgramConfig::default(),
            corpus: CorpusConfig::default(),
            domain: DomainConfig::default(),
            edit_distance: EditDistanceConfig::default(),
            error_handling: ErrorHandlingConfig::default(),
        }
    }
}

impl Config {
    ///Load configuration from a TOML file
    pub fn load_toml(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    ///Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    ///Serialize configuration to a TOML string
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
