//! Similarity scoring between short requirement and task labels.
//!
//! Labels are short and written in an inflected language, so edit distance over
//! tokens is unreliable. Scoring is tiered: cheap high-confidence signals first
//! (exact match, containment), then an optional keyword-overlap boost, and finally
//! a generic matching-blocks ratio.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Words ignored when extracting keywords.
const STOP_WORDS: &[&str] = &[
    "та", "і", "в", "на", "з", "по", "для", "що", "який", "яка", "яке", "від", "до", "за",
    "про", "при", "під", "над", "через", "у",
];

/// Keywords must be longer than this many characters.
const MIN_KEYWORD_CHARS: usize = 3;

/// Keyword overlap at or below this Jaccard index does not boost the score.
const KEYWORD_OVERLAP_FLOOR: f64 = 0.4;

/// Second strings at least this long enable the popular-element heuristic.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Which scoring tiers are active.
///
/// - `Baseline`: exact, containment (0.9), ratio
/// - `Enhanced`: exact, containment (0.95), keyword overlap, ratio
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    Baseline,
    #[default]
    Enhanced,
}

impl ScoringMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Enhanced => "enhanced",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "baseline" => Some(Self::Baseline),
            "enhanced" => Some(Self::Enhanced),
            _ => None,
        }
    }

    /// Score awarded when one label contains the other.
    pub fn containment_score(&self) -> f64 {
        match self {
            Self::Baseline => 0.9,
            Self::Enhanced => 0.95,
        }
    }

    /// Threshold used when none is configured.
    pub fn default_threshold(&self) -> f64 {
        match self {
            Self::Baseline => 0.6,
            Self::Enhanced => 0.5,
        }
    }
}

/// Score two labels in `[0, 1]`.
pub fn score(mode: ScoringMode, left: &str, right: &str) -> f64 {
    let a = left.trim().to_lowercase();
    let b = right.trim().to_lowercase();

    if a == b {
        return 1.0;
    }

    if a.contains(&b) || b.contains(&a) {
        return mode.containment_score();
    }

    if mode == ScoringMode::Enhanced {
        if let Some(overlap) = keyword_overlap(&a, &b) {
            if overlap > KEYWORD_OVERLAP_FLOOR {
                return 0.7 + overlap * 0.3;
            }
        }
    }

    sequence_ratio(&a, &b)
}

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\w+").expect("word pattern is valid"))
}

/// Significant words of a label: longer than three characters and not a stop word.
pub fn extract_keywords(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    word_pattern()
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|w| w.chars().count() > MIN_KEYWORD_CHARS && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Jaccard index of the two keyword sets, or `None` when either side has none.
pub fn keyword_overlap(a: &str, b: &str) -> Option<f64> {
    let left = extract_keywords(a);
    let right = extract_keywords(b);
    if left.is_empty() || right.is_empty() {
        return None;
    }

    let intersection = left.intersection(&right).count();
    let union = left.union(&right).count();
    Some(intersection as f64 / union as f64)
}

/// Ratcliff/Obershelp similarity: `2 * M / (|a| + |b|)` where `M` is the total
/// length of the matching blocks found by recursively taking the longest common
/// run and repeating on both sides of it.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matcher = BlockMatcher::new(&a, &b);
    let matched = matcher.matched_len();
    2.0 * matched as f64 / total as f64
}

struct BlockMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each element of `b`, ascending. Popular elements are left out.
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> BlockMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, ch) in b.iter().enumerate() {
            b2j.entry(*ch).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let popular_above = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= popular_above);
        }

        Self { a, b, b2j }
    }

    /// Longest common run inside `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Ties go to the run starting earliest in `a`, then earliest in `b`.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0usize);
        let mut run_ending_at: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next_runs: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let len = j
                        .checked_sub(1)
                        .and_then(|prev| run_ending_at.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_runs.insert(j, len);
                    if len > best_len {
                        best_i = i + 1 - len;
                        best_j = j + 1 - len;
                        best_len = len;
                    }
                }
            }
            run_ending_at = next_runs;
        }

        // Popular elements never seed a run, but a run may still grow across them.
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_len += 1;
        }
        while best_i + best_len < ahi
            && best_j + best_len < bhi
            && self.a[best_i + best_len] == self.b[best_j + best_len]
        {
            best_len += 1;
        }

        (best_i, best_j, best_len)
    }

    fn matched_len(&self) -> usize {
        let mut matched = 0;
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, len) = self.longest_match(alo, ahi, blo, bhi);
            if len == 0 {
                continue;
            }
            matched += len;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + len < ahi && j + len < bhi {
                pending.push((i + len, ahi, j + len, bhi));
            }
        }

        matched
    }
}
