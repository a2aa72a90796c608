use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter};

use serde::{Deserialize, Serialize};
use simple_error::{bail, try_with, SimpleError};

use crate::config::NgramConfig;
use crate::tokenizer::tokenize;
use crate::types::{ModelStatistics, ModelType, Smoothing};

///Fixed weights fusing the unigram and contextual probability into the
///composite frequency score
const UNIGRAM_WEIGHT: f64 = 0.3;
const CONTEXT_WEIGHT: f64 = 0.7;

///Zero probabilities are floored at this value before taking logarithms
const FLOOR_PROBABILITY: f64 = 1e-10;

///Unigram, bigram and trigram counts over a training corpus, plus a generic
///highest-order table for on-the-fly lookups. Built once from corpus text
///(or loaded from disk) and read-only thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyModel {
    unigrams: HashMap<String, u64>,

    ///prev token -> (next token -> count)
    bigrams: HashMap<String, HashMap<String, u64>>,

    ///(prev1, prev2) -> (next token -> count); a flat pair key avoids
    ///nesting two map levels
    trigrams: HashMap<(String, String), HashMap<String, u64>>,

    ///prefix of length `ngram_order - 1` -> (next token -> count)
    ngrams: HashMap<Vec<String>, HashMap<String, u64>>,

    ngram_order: usize,
    min_freq_threshold: u64,

    ///Total number of training tokens (N)
    total_tokens: u64,

    ///Number of distinct unigrams (V)
    vocabulary_size: usize,

    smoothing: Smoothing,

    ///Number of unigrams seen exactly once, kept for Good-Turing
    #[serde(skip)]
    singletons: u64,
}

impl FrequencyModel {
    pub fn new(ngram_order: usize, min_freq_threshold: u64, smoothing: Smoothing) -> Self {
        Self {
            unigrams: HashMap::new(),
            bigrams: HashMap::new(),
            trigrams: HashMap::new(),
            ngrams: HashMap::new(),
            ngram_order,
            min_freq_threshold,
            total_tokens: 0,
            vocabulary_size: 0,
            smoothing,
            singletons: 0,
        }
    }

    pub fn from_config(config: &NgramConfig) -> Self {
        FrequencyModel::new(config.size, config.min_freq_threshold, config.smoothing)
    }

    ///Tokenize the text and accumulate all count tables, then recompute the
    ///totals
    pub fn train(&mut self, text: &str) {
        let tokens = tokenize(text);
        let words: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();

        for word in &words {
            *self.unigrams.entry((*word).to_string()).or_insert(0) += 1;
        }
        for pair in words.windows(2) {
            *self
                .bigrams
                .entry(pair[0].to_string())
                .or_default()
                .entry(pair[1].to_string())
                .or_insert(0) += 1;
        }
        for triple in words.windows(3) {
            *self
                .trigrams
                .entry((triple[0].to_string(), triple[1].to_string()))
                .or_default()
                .entry(triple[2].to_string())
                .or_insert(0) += 1;
        }
        if self.ngram_order >= 2 {
            for window in words.windows(self.ngram_order) {
                let prefix: Vec<String> = window[..window.len() - 1]
                    .iter()
                    .map(|w| (*w).to_string())
                    .collect();
                *self
                    .ngrams
                    .entry(prefix)
                    .or_default()
                    .entry(window[window.len() - 1].to_string())
                    .or_insert(0) += 1;
            }
        }

        self.total_tokens += words.len() as u64;
        self.vocabulary_size = self.unigrams.len();
        self.singletons = self.unigrams.values().filter(|&&c| c == 1).count() as u64;
    }

    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary_size
    }

    pub fn unigram_count(&self, word: &str) -> u64 {
        self.unigrams.get(word).copied().unwrap_or(0)
    }

    pub fn bigram_count(&self, prev: &str, word: &str) -> u64 {
        self.bigrams
            .get(prev)
            .and_then(|s| s.get(word))
            .copied()
            .unwrap_or(0)
    }

    pub fn trigram_count(&self, prev1: &str, prev2: &str, word: &str) -> u64 {
        self.trigrams
            .get(&(prev1.to_string(), prev2.to_string()))
            .and_then(|s| s.get(word))
            .copied()
            .unwrap_or(0)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.unigrams.contains_key(word)
    }

    ///The set of all tokens observed at least once in training
    pub fn vocabulary(&self) -> HashSet<String> {
        self.unigrams.keys().cloned().collect()
    }

    ///Unigram probability of a word under the configured smoothing mode
    pub fn word_probability(&self, word: &str) -> f64 {
        let count = self.unigram_count(word);
        match self.smoothing {
            Smoothing::AddOne => {
                let denominator = self.total_tokens + self.vocabulary_size as u64;
                if denominator == 0 {
                    0.0
                } else {
                    (count + 1) as f64 / denominator as f64
                }
            }
            Smoothing::GoodTuring => self.good_turing_probability(count),
            Smoothing::None => {
                if self.total_tokens == 0 {
                    0.0
                } else {
                    count as f64 / self.total_tokens as f64
                }
            }
        }
    }

    ///Minimal Good-Turing estimate: unseen words receive the singleton
    ///probability mass, seen words their relative frequency
    fn good_turing_probability(&self, count: u64) -> f64 {
        if self.total_tokens == 0 {
            return 0.0;
        }
        if count == 0 {
            self.singletons as f64 / self.total_tokens as f64
        } else {
            count as f64 / self.total_tokens as f64
        }
    }

    ///Conditional probability P(word | context). Zero denominators fall
    ///back through trigram -> bigram -> unigram.
    pub fn conditional_probability(
        &self,
        word: &str,
        context: &[String],
        model: ModelType,
    ) -> f64 {
        match model {
            ModelType::Trigram if context.len() >= 2 => {
                let key = (
                    context[context.len() - 2].clone(),
                    context[context.len() - 1].clone(),
                );
                let successors = self.trigrams.get(&key);
                let mut numerator = successors
                    .and_then(|s| s.get(word))
                    .copied()
                    .unwrap_or(0) as f64;
                let mut denominator =
                    successors.map(|s| s.values().sum::<u64>()).unwrap_or(0) as f64;
                if self.smoothing == Smoothing::AddOne {
                    numerator += 1.0;
                    denominator += self.vocabulary_size as f64;
                }
                if denominator > 0.0 {
                    numerator / denominator
                } else {
                    self.conditional_probability(
                        word,
                        &context[context.len() - 1..],
                        ModelType::Bigram,
                    )
                }
            }
            ModelType::Bigram if !context.is_empty() => {
                let prev = &context[context.len() - 1];
                let mut numerator = self
                    .bigrams
                    .get(prev)
                    .and_then(|s| s.get(word))
                    .copied()
                    .unwrap_or(0) as f64;
                let mut denominator = self.unigram_count(prev) as f64;
                if self.smoothing == Smoothing::AddOne {
                    numerator += 1.0;
                    denominator += self.vocabulary_size as f64;
                }
                if denominator > 0.0 {
                    numerator / denominator
                } else {
                    self.word_probability(word)
                }
            }
            _ => self.word_probability(word),
        }
    }

    ///Composite score fusing the unigram probability with the contextual
    ///probability at fixed 0.3/0.7 weights. Without context the unigram
    ///probability stands alone.
    pub fn frequency_score(&self, word: &str, context: &[String], model: ModelType) -> f64 {
        let unigram_probability = self.word_probability(word);
        let contextual_probability = if context.is_empty() {
            unigram_probability
        } else {
            self.conditional_probability(word, context, model)
        };
        UNIGRAM_WEIGHT * unigram_probability + CONTEXT_WEIGHT * contextual_probability
    }

    ///Perplexity of a token sequence under the chosen model. Positions
    ///lacking sufficient context fall back to the unigram probability.
    pub fn perplexity(&self, tokens: &[String], model: ModelType) -> f64 {
        if tokens.is_empty() {
            return f64::INFINITY;
        }
        let mut log_sum = 0.0;
        for (i, token) in tokens.iter().enumerate() {
            let probability = match model {
                ModelType::Bigram if i > 0 => {
                    self.conditional_probability(token, &tokens[i - 1..i], ModelType::Bigram)
                }
                ModelType::Trigram if i > 1 => {
                    self.conditional_probability(token, &tokens[i - 2..i], ModelType::Trigram)
                }
                _ => self.word_probability(token),
            };
            log_sum += if probability > 0.0 {
                probability.ln()
            } else {
                FLOOR_PROBABILITY.ln()
            };
        }
        (-(log_sum / tokens.len() as f64)).exp()
    }

    ///Count from the generic highest-order table; counts below the
    ///configured threshold read as absent
    pub fn ngram_count(&self, prefix: &[String], word: &str) -> u64 {
        let count = self
            .ngrams
            .get(prefix)
            .and_then(|s| s.get(word))
            .copied()
            .unwrap_or(0);
        if count < self.min_freq_threshold {
            0
        } else {
            count
        }
    }

    pub fn statistics(&self) -> ModelStatistics {
        let mut most_common: Vec<(String, u64)> = self
            .unigrams
            .iter()
            .map(|(word, count)| (word.clone(), *count))
            .collect();
        most_common.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        most_common.truncate(10);
        ModelStatistics {
            total_tokens: self.total_tokens,
            vocabulary_size: self.vocabulary_size,
            unique_bigrams: self.bigrams.values().map(|s| s.len()).sum(),
            unique_trigrams: self.trigrams.values().map(|s| s.len()).sum(),
            most_common,
            smoothing: self.smoothing,
        }
    }

    ///Write the model to disk. The representation round-trips all counts
    ///and totals.
    pub fn save(&self, path: &str) -> Result<(), SimpleError> {
        let file = try_with!(File::create(path), "unable to create model file {}", path);
        try_with!(
            bincode::serialize_into(BufWriter::new(file), self),
            "unable to serialize model to {}",
            path
        );
        Ok(())
    }

    ///Load a model from disk, failing loudly on unreadable or corrupted
    ///files. Stored totals must agree with the count tables.
    pub fn load(path: &str) -> Result<FrequencyModel, SimpleError> {
        let file = try_with!(File::open(path), "unable to open model file {}", path);
        let mut model: FrequencyModel = try_with!(
            bincode::deserialize_from(BufReader::new(file)),
            "model file {} is corrupted",
            path
        );
        let unigram_total: u64 = model.unigrams.values().sum();
        if unigram_total != model.total_tokens || model.vocabulary_size != model.unigrams.len() {
            bail!(
                "model file {} is corrupted: stored totals do not match the count tables",
                path
            );
        }
        model.singletons = model.unigrams.values().filter(|&&c| c == 1).count() as u64;
        Ok(model)
    }
}
