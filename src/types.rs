use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

///Which n-gram model drives contextual scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Unigram,
    Bigram,
    Trigram,
}

impl ModelType {
    ///Parse a model name; anything unrecognized degrades to unigram scoring
    ///rather than raising an error
    pub fn from_name(name: &str) -> Self {
        match name {
            "bigram" => ModelType::Bigram,
            "trigram" => ModelType::Trigram,
            _ => ModelType::Unigram,
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ModelType::Unigram => write!(f, "unigram"),
            ModelType::Bigram => write!(f, "bigram"),
            ModelType::Trigram => write!(f, "trigram"),
        }
    }
}

///Probability-mass redistribution for unseen events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Smoothing {
    AddOne,
    GoodTuring,
    None,
}

impl Smoothing {
    pub fn from_name(name: &str) -> Self {
        match name {
            "good-turing" => Smoothing::GoodTuring,
            "none" => Smoothing::None,
            _ => Smoothing::AddOne,
        }
    }
}

impl fmt::Display for Smoothing {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Smoothing::AddOne => write!(f, "add-one"),
            Smoothing::GoodTuring => write!(f, "good-turing"),
            Smoothing::None => write!(f, "none"),
        }
    }
}

///Classification attached to a correction, advisory metadata for the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    Homophone,
    Transposition,
    Substitution,
    Deletion,
    Insertion,
    Phonetic,
    Typo,
    NoError,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Homophone => "homophone",
            ErrorType::Transposition => "transposition",
            ErrorType::Substitution => "substitution",
            ErrorType::Deletion => "deletion",
            ErrorType::Insertion => "insertion",
            ErrorType::Phonetic => "phonetic",
            ErrorType::Typo => "typo",
            ErrorType::NoError => "no_error",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

///A vocabulary word under consideration as replacement for an
///out-of-vocabulary token. The distance fields are filled by candidate
///generation, the scoring fields by the correction pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub text: String,

    ///Raw (Damerau-)Levenshtein distance to the misspelled token
    pub edit_distance: usize,

    ///Keyboard-weighted distance
    pub weighted_distance: f64,

    ///Levenshtein distance after phonetic normalization
    pub phonetic_distance: usize,

    ///Weighted combination of the three distances, lower is closer
    pub combined: f64,

    ///Composite n-gram probability score given the left context
    pub frequency_score: f64,

    ///Frequency score with domain boost applied, discounted by distance
    pub final_score: f64,

    pub is_medical: bool,
}

///A single ranked replacement as emitted in an error record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub word: String,
    ///Score normalized over all suggestions for this error, in [0,1]
    pub score: f64,
    pub frequency_score: f64,
    pub edit_distance: f64,
    pub is_medical: bool,
}

///One detected error with its ranked suggestions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellingError {
    pub original: String,

    ///Zero-based index in the token stream
    pub position: usize,

    #[serde(rename = "type")]
    pub error_type: ErrorType,

    ///Normalized score of the top suggestion, in [0,1]
    pub confidence: f64,

    ///The alphabetic tokens among the two preceding positions
    pub context: Vec<String>,

    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrectionStatistics {
    pub total_errors: usize,
    pub error_types: HashMap<String, usize>,
    pub average_confidence: f64,
    pub medical_corrections: usize,
    pub medical_correction_rate: f64,
}

///The full outcome of checking one input text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionResult {
    pub corrected_text: String,
    pub errors: Vec<SpellingError>,
    pub statistics: CorrectionStatistics,
}

///Aggregate figures describing a trained frequency model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelStatistics {
    pub total_tokens: u64,
    pub vocabulary_size: usize,
    pub unique_bigrams: usize,
    pub unique_trigrams: usize,
    pub most_common: Vec<(String, u64)>,
    pub smoothing: Smoothing,
}

///Model statistics plus the engine-level domain configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineReport {
    pub frequency_model: ModelStatistics,
    pub medical_terms: usize,
    pub domain_weight: f64,
    pub max_distance: usize,
    pub allow_transpose: bool,
}

///Aggregated edit-operation patterns over a set of correction pairs
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorPatternReport {
    ///Counts per operation kind (substitution/deletion/insertion)
    pub pattern_counts: HashMap<String, usize>,
    ///The ten most frequent concrete operations, count-descending
    pub most_common_operations: Vec<(String, usize)>,
}

///Outcome of evaluating the engine against known correction pairs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub accuracy: f64,
    pub total_tests: usize,
    pub correct_predictions: usize,
    pub error_analysis: ErrorPatternReport,
}
