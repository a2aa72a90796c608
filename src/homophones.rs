use std::collections::{HashMap, HashSet};

///Fixed homophone groups, stored per key. Symmetry is not required.
const HOMOPHONE_GROUPS: &[(&str, &[&str])] = &[
    ("ileum", &["ilium"]),
    ("ilium", &["ileum"]),
    ("humerus", &["humorous"]),
    ("humorous", &["humerus"]),
    ("mucus", &["mucous"]),
    ("mucous", &["mucus"]),
    ("perineal", &["peroneal"]),
    ("peroneal", &["perineal"]),
    ("discreet", &["discrete"]),
    ("discrete", &["discreet"]),
    ("aphagia", &["aphasia"]),
    ("aphasia", &["aphagia"]),
    ("their", &["there", "theyre"]),
    ("there", &["their", "theyre"]),
    ("theyre", &["their", "there"]),
    ("to", &["too", "two"]),
    ("too", &["to", "two"]),
    ("two", &["to", "too"]),
    ("your", &["youre"]),
    ("youre", &["your"]),
    ("affect", &["effect"]),
    ("effect", &["affect"]),
    ("accept", &["except"]),
    ("except", &["accept"]),
    ("principal", &["principle"]),
    ("principle", &["principal"]),
    ("complement", &["compliment"]),
    ("compliment", &["complement"]),
    ("stationary", &["stationery"]),
    ("stationery", &["stationary"]),
];

///Context words that indicate a medical passage
const MEDICAL_TRIGGERS: &[&str] = &["patient", "diagnosis", "treatment", "medical"];

///Homophones whose score is raised in a medical context
const MEDICAL_HOMOPHONES: &[&str] = &[
    "ileum", "ilium", "humerus", "mucus", "mucous", "perineal", "peroneal",
];

const BASE_SCORE: f64 = 0.5;
const MEDICAL_CONTEXT_SCORE: f64 = 0.8;

///Detects in-vocabulary homophone confusions against a fixed table
#[derive(Debug, Clone)]
pub struct HomophoneDetector {
    groups: HashMap<String, Vec<String>>,
}

impl HomophoneDetector {
    pub fn new() -> Self {
        let mut groups = HashMap::with_capacity(HOMOPHONE_GROUPS.len());
        for (word, alternates) in HOMOPHONE_GROUPS {
            groups.insert(
                word.to_string(),
                alternates.iter().map(|a| a.to_string()).collect(),
            );
        }
        HomophoneDetector { groups }
    }

    ///The stored alternates for a word (empty when the word has none)
    pub fn alternates(&self, word: &str) -> &[String] {
        self.groups
            .get(&word.to_lowercase())
            .map(|alternates| alternates.as_slice())
            .unwrap_or(&[])
    }

    ///Could this in-vocabulary word be a homophone confusion? Returns true
    ///together with the alternates that actually occur in the vocabulary.
    pub fn confusion_candidates(
        &self,
        word: &str,
        vocab: &HashSet<String>,
    ) -> (bool, Vec<String>) {
        let valid: Vec<String> = self
            .alternates(word)
            .iter()
            .filter(|alternate| vocab.contains(*alternate))
            .cloned()
            .collect();
        (!valid.is_empty(), valid)
    }

    ///Score homophone candidates against the surrounding context. Every
    ///candidate starts at 0.5; medically flagged homophones are raised to
    ///0.8 when a medical trigger word appears in the context. The result is
    ///sorted descending by score, preserving input order on ties.
    pub fn score(&self, candidates: &[String], context: &[String]) -> Vec<(String, f64)> {
        let medical_context = context
            .iter()
            .any(|word| MEDICAL_TRIGGERS.contains(&word.as_str()));
        let mut scored: Vec<(String, f64)> = candidates
            .iter()
            .map(|candidate| {
                let score = if medical_context && MEDICAL_HOMOPHONES.contains(&candidate.as_str())
                {
                    MEDICAL_CONTEXT_SCORE
                } else {
                    BASE_SCORE
                };
                (candidate.clone(), score)
            })
            .collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .expect("homophone scores must be comparable")
        });
        scored
    }
}

impl Default for HomophoneDetector {
    fn default() -> Self {
        HomophoneDetector::new()
    }
}
