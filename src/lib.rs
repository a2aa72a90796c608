use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use simple_error::{bail, SimpleError};

pub mod config;
pub mod distance;
pub mod freqmodel;
pub mod homophones;
pub mod keyboard;
pub mod tokenizer;
pub mod types;

pub use crate::config::*;
pub use crate::distance::*;
pub use crate::freqmodel::*;
pub use crate::homophones::*;
pub use crate::keyboard::*;
pub use crate::tokenizer::*;
pub use crate::types::*;

///An advisory homophone record is only attached when the top context score
///exceeds this threshold
const HOMOPHONE_CONFIDENCE_THRESHOLD: f64 = 0.7;

///The spelling correction engine. Built once from corpus text (or a loaded
///model) plus a medical-term list; immutable after `build()`, after which
///queries are pure and safe to issue from multiple threads.
pub struct SpellEngine {
    ///The trained frequency model
    pub model: FrequencyModel,

    ///All tokens observed at least once in training, frozen by `build()`
    pub vocab: HashSet<String>,

    ///Lowercased domain terms granting the multiplicative score boost
    pub medical_terms: HashSet<String>,

    pub homophones: HomophoneDetector,

    pub editdist: EditDistance,

    pub config: Config,

    pub debug: bool,
}

impl SpellEngine {
    ///Create an untrained engine. Fails on invalid configuration; training
    ///input must be supplied before `build()`.
    pub fn new(config: Config, debug: bool) -> Result<SpellEngine, SimpleError> {
        if config.domain.domain_weight <= 0.0 {
            bail!(
                "domain weight must be positive, got {}",
                config.domain.domain_weight
            );
        }
        if config.ngram.size < 2 {
            bail!("n-gram size must be at least 2, got {}", config.ngram.size);
        }
        Ok(SpellEngine {
            model: FrequencyModel::from_config(&config.ngram),
            vocab: HashSet::new(),
            medical_terms: HashSet::new(),
            homophones: HomophoneDetector::new(),
            editdist: EditDistance::new(&config.edit_distance),
            config,
            debug,
        })
    }

    ///Train the frequency model on a piece of corpus text
    pub fn train(&mut self, text: &str) {
        self.model.train(text);
        if self.debug {
            eprintln!(
                "(trained on {} tokens, vocabulary size {})",
                self.model.total_tokens(),
                self.model.vocabulary_size()
            );
        }
    }

    ///Read and train on a corpus file. An unreadable corpus is a hard
    ///error, the engine cannot work without one.
    pub fn read_corpus(&mut self, filename: &str) -> Result<(), std::io::Error> {
        if self.debug {
            eprintln!("Reading corpus from {}...", filename);
        }
        let text = std::fs::read_to_string(filename)?;
        self.train(&text);
        Ok(())
    }

    ///Read the medical-term list, one lowercase term per line. A missing
    ///file is not an error: the engine continues with an empty set.
    pub fn read_medical_terms(&mut self, filename: &str) -> Result<(), std::io::Error> {
        if !Path::new(filename).exists() {
            if self.debug {
                eprintln!(
                    "(medical terms file {} not found, continuing with an empty set)",
                    filename
                );
            }
            return Ok(());
        }
        let f = File::open(filename)?;
        for line in BufReader::new(f).lines() {
            let line = line?;
            let term = line.trim();
            if !term.is_empty() {
                self.medical_terms.insert(term.to_lowercase());
            }
        }
        if self.debug {
            eprintln!(" - Read {} medical terms", self.medical_terms.len());
        }
        Ok(())
    }

    pub fn add_medical_term(&mut self, term: &str) {
        self.medical_terms.insert(term.to_lowercase());
    }

    ///Replace the frequency model with one loaded from disk
    pub fn load_model(&mut self, path: &str) -> Result<(), SimpleError> {
        self.model = FrequencyModel::load(path)?;
        Ok(())
    }

    pub fn save_model(&self, path: &str) -> Result<(), SimpleError> {
        self.model.save(path)
    }

    ///Freeze the vocabulary from the trained model. Building with an empty
    ///vocabulary is refused: either train on a corpus or load a model
    ///first.
    pub fn build(&mut self) -> Result<(), SimpleError> {
        self.vocab = self.model.vocabulary();
        if self.vocab.is_empty() {
            bail!("refusing to build an engine with an empty vocabulary; train on a corpus or load a model first");
        }
        if self.debug {
            eprintln!(
                "(built engine: {} vocabulary entries, {} medical terms)",
                self.vocab.len(),
                self.medical_terms.len()
            );
        }
        Ok(())
    }

    ///Check a text and return the corrected token stream, per-error records
    ///and summary statistics. Unknown model names degrade to unigram
    ///scoring.
    pub fn check_text(&self, text: &str, model_type: ModelType) -> CorrectionResult {
        let tokens = tokenize(text);
        let mut corrected: Vec<String> = Vec::with_capacity(tokens.len());
        let mut errors: Vec<SpellingError> = Vec::new();
        let max_suggestions = self.config.error_handling.max_suggestions;

        for (i, token) in tokens.iter().enumerate() {
            //the alphabetic tokens among the two preceding positions
            let context: Vec<String> = tokens[i.saturating_sub(2)..i]
                .iter()
                .filter(|t| t.alphabetic)
                .map(|t| t.text.clone())
                .collect();

            if self.vocab.contains(&token.text) || !token.alphabetic {
                if token.alphabetic && self.config.error_handling.error_types.homophone {
                    if let Some(record) = self.check_homophone(token, &context, model_type) {
                        errors.push(record);
                    }
                }
                corrected.push(token.text.clone());
                continue;
            }

            let ranked = self.rank_candidates(&token.text, &context, model_type);
            if ranked.is_empty() {
                //nothing within reach, the token passes through unchanged
                corrected.push(token.text.clone());
                continue;
            }

            let total: f64 = ranked.iter().map(|c| c.final_score).sum();
            let confidence = if total > 0.0 {
                round3(ranked[0].final_score / total)
            } else {
                0.0
            };
            let best = ranked[0].text.clone();
            if self.debug {
                eprintln!(
                    "   (correcting '{}' -> '{}' at position {}, confidence {})",
                    token.text, best, token.position, confidence
                );
            }

            let suggestions: Vec<Suggestion> = ranked
                .iter()
                .take(max_suggestions)
                .map(|c| Suggestion {
                    word: c.text.clone(),
                    score: if total > 0.0 {
                        round3(c.final_score / total)
                    } else {
                        0.0
                    },
                    frequency_score: round6(c.frequency_score),
                    edit_distance: c.combined,
                    is_medical: c.is_medical,
                })
                .collect();

            let error_type = self.classify_error(&token.text, &best);
            errors.push(SpellingError {
                original: token.text.clone(),
                position: token.position,
                error_type,
                confidence,
                context,
                suggestions,
            });
            corrected.push(best);
        }

        let statistics = correction_statistics(&errors);
        CorrectionResult {
            corrected_text: corrected.join(" "),
            errors,
            statistics,
        }
    }

    ///Advisory homophone detection for an in-vocabulary alphabetic token.
    ///The token is always emitted unchanged, the record only signals a
    ///possible confusion.
    fn check_homophone(
        &self,
        token: &Token,
        context: &[String],
        model_type: ModelType,
    ) -> Option<SpellingError> {
        let (confused, alternates) = self
            .homophones
            .confusion_candidates(&token.text, &self.vocab);
        if !confused {
            return None;
        }
        let scored = self.homophones.score(&alternates, context);
        let top_score = scored.first()?.1;
        if top_score <= HOMOPHONE_CONFIDENCE_THRESHOLD {
            return None;
        }
        let suggestions: Vec<Suggestion> = scored
            .iter()
            .take(self.config.error_handling.max_suggestions)
            .map(|(word, score)| Suggestion {
                word: word.clone(),
                score: *score,
                frequency_score: self.model.frequency_score(word, context, model_type),
                edit_distance: 0.0,
                is_medical: self.medical_terms.contains(word),
            })
            .collect();
        Some(SpellingError {
            original: token.text.clone(),
            position: token.position,
            error_type: ErrorType::Homophone,
            confidence: top_score,
            context: context.to_vec(),
            suggestions,
        })
    }

    ///Generate and score candidates for an out-of-vocabulary token,
    ///descending by final score with lexicographic tie-break
    fn rank_candidates(
        &self,
        word: &str,
        context: &[String],
        model_type: ModelType,
    ) -> Vec<Candidate> {
        let mut ranked = self
            .editdist
            .candidates(word, &self.vocab, self.config.ngram.max_candidates);
        for candidate in ranked.iter_mut() {
            candidate.frequency_score =
                self.model
                    .frequency_score(&candidate.text, context, model_type);
            candidate.is_medical = self.medical_terms.contains(&candidate.text);
            let domain_multiplier = if candidate.is_medical {
                self.config.domain.domain_weight
            } else {
                1.0
            };
            candidate.final_score =
                (candidate.frequency_score * domain_multiplier) / (1.0 + candidate.combined);
        }
        ranked.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .expect("final scores must be comparable")
                .then_with(|| a.text.cmp(&b.text))
        });
        ranked
    }

    ///Classify what kind of error the chosen correction repaired
    fn classify_error(&self, original: &str, corrected: &str) -> ErrorType {
        if self
            .homophones
            .alternates(original)
            .iter()
            .any(|alternate| alternate == corrected)
        {
            return ErrorType::Homophone;
        }

        let operations = self.editdist.operations(original, corrected);
        if operations.is_empty() {
            return ErrorType::NoError;
        }
        if operations
            .iter()
            .any(|op| matches!(op, EditOp::Transpose { .. }))
        {
            return ErrorType::Transposition;
        }
        if operations.len() == 1 {
            return match operations[0] {
                EditOp::Substitute { .. } => ErrorType::Substitution,
                EditOp::Delete { .. } => ErrorType::Deletion,
                EditOp::Insert { .. } => ErrorType::Insertion,
                EditOp::Transpose { .. } => ErrorType::Transposition,
            };
        }
        if self.editdist.phonetic(original, corrected) < operations.len() {
            return ErrorType::Phonetic;
        }
        ErrorType::Typo
    }

    ///Run the pipeline over known correction pairs and report how often the
    ///first error's top suggestion matches the expectation
    pub fn evaluate(&self, pairs: &[(String, String)], model_type: ModelType) -> EvaluationReport {
        let mut correct = 0;
        for (original, expected) in pairs {
            let result = self.check_text(original, model_type);
            if let Some(top) = result
                .errors
                .first()
                .and_then(|error| error.suggestions.first())
            {
                if &top.word == expected {
                    correct += 1;
                }
            }
        }
        EvaluationReport {
            accuracy: if pairs.is_empty() {
                0.0
            } else {
                round3(correct as f64 / pairs.len() as f64)
            },
            total_tests: pairs.len(),
            correct_predictions: correct,
            error_analysis: self.editdist.analyze_error_patterns(pairs),
        }
    }

    ///Model statistics plus the engine-level domain configuration
    pub fn report(&self) -> EngineReport {
        EngineReport {
            frequency_model: self.model.statistics(),
            medical_terms: self.medical_terms.len(),
            domain_weight: self.config.domain.domain_weight,
            max_distance: self.editdist.max_distance,
            allow_transpose: self.editdist.allow_transpose,
        }
    }
}

fn correction_statistics(errors: &[SpellingError]) -> CorrectionStatistics {
    if errors.is_empty() {
        return CorrectionStatistics::default();
    }
    let mut error_types: HashMap<String, usize> = HashMap::new();
    let mut confidence_sum = 0.0;
    let mut medical_corrections = 0;
    for error in errors {
        *error_types
            .entry(error.error_type.as_str().to_string())
            .or_insert(0) += 1;
        confidence_sum += error.confidence;
        if error
            .suggestions
            .first()
            .map_or(false, |suggestion| suggestion.is_medical)
        {
            medical_corrections += 1;
        }
    }
    CorrectionStatistics {
        total_errors: errors.len(),
        error_types,
        average_confidence: round3(confidence_sum / errors.len() as f64),
        medical_corrections,
        medical_correction_rate: round3(medical_corrections as f64 / errors.len() as f64),
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}
