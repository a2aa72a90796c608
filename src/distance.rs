use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::config::EditDistanceConfig;
use crate::keyboard::KeyboardLayout;
use crate::types::{Candidate, ErrorPatternReport};

///Relative weights of the three distance signals in the combined score
const DISTANCE_WEIGHT: f64 = 0.5;
const KEYBOARD_WEIGHT: f64 = 0.3;
const PHONETIC_WEIGHT: f64 = 0.2;

///Substituting physically adjacent keys costs half a regular substitution
const ADJACENT_SUBSTITUTION_COST: f64 = 0.5;

///Ordered rewrite patterns applied to both words before the phonetic
///distance is computed. Order matters, longer patterns must not be
///shadowed by shorter ones.
const PHONETIC_PATTERNS: &[(&str, &str)] = &[
    ("ph", "f"),
    ("tion", "shun"),
    ("sion", "zhun"),
    ("ough", "uff"),
    ("augh", "aff"),
    ("eigh", "ay"),
    ("ight", "ite"),
    ("kn", "n"),
    ("wr", "r"),
    ("mb", "m"),
    ("bt", "t"),
];

///A single step in an optimal alignment between two words.
///Positions refer to the source word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    Substitute { position: usize, from: char, to: char },
    Delete { position: usize, ch: char },
    Insert { position: usize, ch: char },
    Transpose { position: usize, first: char, second: char },
}

impl EditOp {
    pub fn kind(&self) -> &'static str {
        match self {
            EditOp::Substitute { .. } => "substitution",
            EditOp::Delete { .. } => "deletion",
            EditOp::Insert { .. } => "insertion",
            EditOp::Transpose { .. } => "transposition",
        }
    }
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EditOp::Substitute { position, from, to } => {
                write!(f, "substitute '{}' -> '{}' at position {}", from, to, position)
            }
            EditOp::Delete { position, ch } => {
                write!(f, "delete '{}' at position {}", ch, position)
            }
            EditOp::Insert { position, ch } => {
                write!(f, "insert '{}' at position {}", ch, position)
            }
            EditOp::Transpose {
                position,
                first,
                second,
            } => {
                write!(f, "transpose '{}{}' at position {}", first, second, position)
            }
        }
    }
}

///Edit-distance engine carrying the per-operation costs and the keyboard
///layout used for weighted substitutions. Immutable after construction.
pub struct EditDistance {
    pub max_distance: usize,
    pub allow_transpose: bool,
    pub substitution_cost: usize,
    pub insertion_cost: usize,
    pub deletion_cost: usize,
    pub transpose_cost: usize,
    keyboard: KeyboardLayout,
}

impl EditDistance {
    pub fn new(config: &EditDistanceConfig) -> Self {
        Self {
            max_distance: config.max_distance,
            allow_transpose: config.allow_transpose,
            substitution_cost: config.substitution_cost,
            insertion_cost: config.insertion_cost,
            deletion_cost: config.deletion_cost,
            transpose_cost: config.transpose_cost,
            keyboard: KeyboardLayout::qwerty(),
        }
    }

    ///Standard Levenshtein distance with the configured operation costs,
    ///computed with two rows. Substituting equal characters costs 0.
    pub fn levenshtein(&self, a: &str, b: &str) -> usize {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        self.levenshtein_chars(&a, &b)
    }

    fn levenshtein_chars(&self, a: &[char], b: &[char]) -> usize {
        if a == b {
            return 0;
        }
        let mut previous: Vec<usize> = (0..=b.len()).map(|j| j * self.insertion_cost).collect();
        let mut current: Vec<usize> = vec![0; b.len() + 1];
        for (i, ca) in a.iter().enumerate() {
            current[0] = (i + 1) * self.deletion_cost;
            for (j, cb) in b.iter().enumerate() {
                let substitution = previous[j]
                    + if ca == cb {
                        0
                    } else {
                        self.substitution_cost
                    };
                let insertion = current[j] + self.insertion_cost;
                let deletion = previous[j + 1] + self.deletion_cost;
                current[j + 1] = substitution.min(insertion).min(deletion);
            }
            std::mem::swap(&mut previous, &mut current);
        }
        previous[b.len()]
    }

    ///Restricted Damerau-Levenshtein distance: Levenshtein extended with an
    ///adjacent-transposition operation, maintaining the classic auxiliary
    ///map of the last row in which each character appeared.
    pub fn damerau_levenshtein(&self, a: &str, b: &str) -> usize {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let (len1, len2) = (a.len(), b.len());

        let max_cost = self
            .substitution_cost
            .max(self.insertion_cost)
            .max(self.deletion_cost)
            .max(self.transpose_cost);
        let inf = (len1 + len2) * max_cost + 1;

        let mut last_row: HashMap<char, usize> = HashMap::new();
        for c in a.iter().chain(b.iter()) {
            last_row.insert(*c, 0);
        }

        let mut h = vec![vec![inf; len2 + 2]; len1 + 2];
        for i in 0..=len1 {
            h[i + 1][0] = inf;
            h[i + 1][1] = i * self.deletion_cost;
        }
        for j in 0..=len2 {
            h[0][j + 1] = inf;
            h[1][j + 1] = j * self.insertion_cost;
        }

        for i in 1..=len1 {
            let mut db = 0;
            for j in 1..=len2 {
                let k = last_row[&b[j - 1]];
                let l = db;
                let cost = if a[i - 1] == b[j - 1] {
                    db = j;
                    0
                } else {
                    self.substitution_cost
                };
                let substitution = h[i][j] + cost;
                let insertion = h[i + 1][j] + self.insertion_cost;
                let deletion = h[i][j + 1] + self.deletion_cost;
                let transposition = h[k][l] + (i - k - 1) + self.transpose_cost + (j - l - 1);
                h[i + 1][j + 1] = substitution
                    .min(insertion)
                    .min(deletion)
                    .min(transposition);
            }
            last_row.insert(a[i - 1], i);
        }

        h[len1 + 1][len2 + 1]
    }

    ///Real-valued Levenshtein distance where substitutions between keys in
    ///the same keyboard-neighbour set cost 0.5 instead of the configured
    ///substitution cost.
    pub fn weighted(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        if a == b {
            return 0.0;
        }
        let mut previous: Vec<f64> = (0..=b.len())
            .map(|j| (j * self.insertion_cost) as f64)
            .collect();
        let mut current: Vec<f64> = vec![0.0; b.len() + 1];
        for (i, ca) in a.iter().enumerate() {
            current[0] = ((i + 1) * self.deletion_cost) as f64;
            for (j, cb) in b.iter().enumerate() {
                let sub_cost = if ca == cb {
                    0.0
                } else if self.keyboard.adjacent(*ca, *cb) {
                    ADJACENT_SUBSTITUTION_COST
                } else {
                    self.substitution_cost as f64
                };
                let substitution = previous[j] + sub_cost;
                let insertion = current[j] + self.insertion_cost as f64;
                let deletion = previous[j + 1] + self.deletion_cost as f64;
                current[j + 1] = substitution.min(insertion).min(deletion);
            }
            std::mem::swap(&mut previous, &mut current);
        }
        previous[b.len()]
    }

    ///Levenshtein distance between the phonetic normalizations of both
    ///words. Both words are lowercased before normalization.
    pub fn phonetic(&self, a: &str, b: &str) -> usize {
        self.levenshtein(&normalize_phonetic(a), &normalize_phonetic(b))
    }

    ///Generate replacement candidates for a word from the vocabulary.
    ///Entries whose length differs by more than `max_distance` are skipped
    ///outright, survivors are ranked by the combined distance score,
    ///ascending, with ties broken by natural string order.
    pub fn candidates(
        &self,
        word: &str,
        vocab: &HashSet<String>,
        max_candidates: usize,
    ) -> Vec<Candidate> {
        let word_len = word.chars().count();
        let mut results: Vec<Candidate> = Vec::new();
        for entry in vocab {
            let entry_len = entry.chars().count();
            if word_len.abs_diff(entry_len) > self.max_distance {
                continue;
            }
            let distance = if self.allow_transpose {
                self.damerau_levenshtein(word, entry)
            } else {
                self.levenshtein(word, entry)
            };
            if distance > self.max_distance {
                continue;
            }
            let weighted = self.weighted(word, entry);
            let phonetic = self.phonetic(word, entry);
            let combined = DISTANCE_WEIGHT * distance as f64
                + KEYBOARD_WEIGHT * weighted
                + PHONETIC_WEIGHT * phonetic as f64;
            results.push(Candidate {
                text: entry.clone(),
                edit_distance: distance,
                weighted_distance: weighted,
                phonetic_distance: phonetic,
                combined,
                frequency_score: 0.0,
                final_score: 0.0,
                is_medical: false,
            });
        }
        results.sort_unstable_by(|a, b| {
            a.combined
                .partial_cmp(&b.combined)
                .expect("combined scores must be comparable")
                .then_with(|| a.text.cmp(&b.text))
        });
        results.truncate(max_candidates);
        results
    }

    ///Recover one optimal alignment from the unit-cost Levenshtein table.
    ///Tie-break priority when back-tracing: match > substitute > delete >
    ///insert. The number of returned operations equals the unit-cost
    ///distance; replaying them over `a` yields `b`.
    pub fn operations(&self, a: &str, b: &str) -> Vec<EditOp> {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let (len1, len2) = (a.len(), b.len());

        let mut dp = vec![vec![0; len2 + 1]; len1 + 1];
        for (i, row) in dp.iter_mut().enumerate() {
            row[0] = i;
        }
        for j in 0..=len2 {
            dp[0][j] = j;
        }
        for i in 1..=len1 {
            for j in 1..=len2 {
                dp[i][j] = if a[i - 1] == b[j - 1] {
                    dp[i - 1][j - 1]
                } else {
                    1 + dp[i - 1][j].min(dp[i][j - 1]).min(dp[i - 1][j - 1])
                };
            }
        }

        let mut operations = Vec::new();
        let (mut i, mut j) = (len1, len2);
        while i > 0 || j > 0 {
            if i > 0 && j > 0 && a[i - 1] == b[j - 1] {
                i -= 1;
                j -= 1;
            } else if i > 0 && j > 0 && dp[i][j] == dp[i - 1][j - 1] + 1 {
                operations.push(EditOp::Substitute {
                    position: i - 1,
                    from: a[i - 1],
                    to: b[j - 1],
                });
                i -= 1;
                j -= 1;
            } else if i > 0 && dp[i][j] == dp[i - 1][j] + 1 {
                operations.push(EditOp::Delete {
                    position: i - 1,
                    ch: a[i - 1],
                });
                i -= 1;
            } else if j > 0 && dp[i][j] == dp[i][j - 1] + 1 {
                operations.push(EditOp::Insert {
                    position: i,
                    ch: b[j - 1],
                });
                j -= 1;
            } else {
                break;
            }
        }
        operations.reverse();
        operations
    }

    ///Aggregate edit-operation patterns over known correction pairs
    pub fn analyze_error_patterns(&self, corrections: &[(String, String)]) -> ErrorPatternReport {
        let mut pattern_counts: HashMap<String, usize> = HashMap::new();
        let mut operation_counts: HashMap<String, usize> = HashMap::new();
        for (original, corrected) in corrections {
            for op in self.operations(original, corrected) {
                *operation_counts.entry(op.to_string()).or_insert(0) += 1;
                *pattern_counts.entry(op.kind().to_string()).or_insert(0) += 1;
            }
        }
        let mut most_common: Vec<(String, usize)> = operation_counts.into_iter().collect();
        most_common.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        most_common.truncate(10);
        ErrorPatternReport {
            pattern_counts,
            most_common_operations: most_common,
        }
    }
}

impl Default for EditDistance {
    fn default() -> Self {
        EditDistance::new(&EditDistanceConfig::default())
    }
}

///Apply the fixed phonetic rewrite patterns, in order, to a lowercased word
pub fn normalize_phonetic(word: &str) -> String {
    let mut normalized = word.to_lowercase();
    for (pattern, replacement) in PHONETIC_PATTERNS {
        normalized = normalized.replace(pattern, replacement);
    }
    normalized
}
