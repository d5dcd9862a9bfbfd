//! Rule-based valence scorer in the style of VADER
//!
//! Each token's lexicon valence is adjusted by the rules VADER applies:
//! boosters, negation within three tokens (including a determiner "no"),
//! ALL-CAPS emphasis, "but" and "least" handling, and trailing `!`/`?`
//! emphasis. The sum is squashed into a compound score in [-1, 1].

use crate::lexicon::ValenceLexicon;
use crate::normalizer::round_to;
use crate::scorer::PolarityScorer;
use sentiscope_core::Result;
use std::path::Path;
use tracing::debug;

/// Booster word increment
const B_INCR: f64 = 0.293;
/// Booster word decrement
const B_DECR: f64 = -0.293;
/// ALL-CAPS emphasis when the text mixes cases
const C_INCR: f64 = 0.733;
/// Negation scale factor
const N_SCALAR: f64 = -0.74;
/// Approximates the max expected compound sum
const NORMALIZATION_ALPHA: f64 = 15.0;

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "ain't",
    "aren't", "can't", "couldn't", "daren't", "didn't", "doesn't", "dont", "hadnt", "hasnt",
    "havent", "isnt", "mightnt", "mustnt", "neither", "don't", "hadn't", "hasn't", "haven't",
    "isn't", "mightn't", "mustn't", "neednt", "needn't", "never", "none", "nope", "nor",
    "not", "nothing", "nowhere", "oughtnt", "shant", "shouldnt", "uhuh", "wasnt", "werent",
    "oughtn't", "shan't", "shouldn't", "uh-uh", "wasn't", "weren't", "without", "wont",
    "wouldnt", "won't", "wouldn't", "rarely", "seldom", "despite",
];

fn booster(word: &str) -> Option<f64> {
    match word {
        "absolutely" | "amazingly" | "awfully" | "completely" | "considerably" | "decidedly"
        | "deeply" | "effing" | "enormously" | "entirely" | "especially" | "exceptionally"
        | "extremely" | "fabulously" | "flipping" | "fully" | "greatly" | "hella" | "highly"
        | "hugely" | "incredibly" | "intensely" | "majorly" | "more" | "most"
        | "particularly" | "purely" | "quite" | "really" | "remarkably" | "so"
        | "substantially" | "thoroughly" | "totally" | "tremendously" | "uber"
        | "unbelievably" | "unusually" | "utterly" | "very" => Some(B_INCR),
        "almost" | "barely" | "hardly" | "kinda" | "kindof" | "kind-of" | "less" | "little"
        | "marginally" | "occasionally" | "partly" | "scarcely" | "slightly" | "somewhat"
        | "sorta" | "sortof" | "sort-of" => Some(B_DECR),
        _ => None,
    }
}

fn is_negation(word: &str) -> bool {
    let lower = word.to_lowercase();
    NEGATIONS.contains(&lower.as_str()) || lower.contains("n't")
}

/// Has at least one cased letter and no lowercase ones
fn is_all_caps(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

/// Split on whitespace, strip surrounding punctuation from words (keeping
/// short tokens such as emoticons intact) and drop single characters.
fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|raw| {
            let stripped = raw.trim_matches(|c: char| c.is_ascii_punctuation());
            if stripped.chars().count() <= 2 {
                raw
            } else {
                stripped
            }
        })
        .filter(|w| w.chars().count() > 1)
        .collect()
}

/// VADER-equivalent compound scorer
pub struct VaderScorer {
    name: String,
    lexicon: ValenceLexicon,
}

impl VaderScorer {
    /// Scorer over the built-in lexicon
    pub fn new() -> Result<Self> {
        Ok(Self::with_lexicon(ValenceLexicon::embedded()?))
    }

    /// Scorer over a lexicon file (e.g. the full `vader_lexicon.txt`)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::with_lexicon(ValenceLexicon::from_file(path)?))
    }

    pub fn with_lexicon(lexicon: ValenceLexicon) -> Self {
        Self {
            name: "VADER".to_string(),
            lexicon,
        }
    }

    /// Compound score in [-1, 1], rounded to four decimals
    pub fn compound(&self, text: &str) -> f64 {
        let words = tokenize(text);
        let lowered: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();

        let caps = words.iter().filter(|w| is_all_caps(w)).count();
        let cap_diff = caps > 0 && caps < words.len();

        let mut sentiments = Vec::with_capacity(words.len());
        for i in 0..words.len() {
            let lower = lowered[i].as_str();

            if booster(lower).is_some() {
                sentiments.push(0.0);
                continue;
            }
            if lower == "kind" && lowered.get(i + 1).is_some_and(|w| w == "of") {
                sentiments.push(0.0);
                continue;
            }

            sentiments.push(self.valence_at(&words, &lowered, i, cap_diff));
        }

        but_check(&lowered, &mut sentiments);

        let mut sum: f64 = sentiments.iter().sum();
        if sum == 0.0 {
            return 0.0;
        }

        let emphasis = punctuation_emphasis(text);
        if sum > 0.0 {
            sum += emphasis;
        } else {
            sum -= emphasis;
        }

        let compound = (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0);
        round_to(compound, 4)
    }

    fn valence_at(&self, words: &[&str], lowered: &[String], i: usize, cap_diff: bool) -> f64 {
        let Some(mut valence) = self.lexicon.get(words[i]) else {
            return 0.0;
        };

        // "no" used as a determiner ("no problems") carries no valence itself
        if lowered[i] == "no"
            && words
                .get(i + 1)
                .is_some_and(|next| self.lexicon.get(next).is_some())
        {
            valence = 0.0;
        }

        // ...and negates the word it determines
        if preceded_by_no(lowered, i) {
            if let Some(base) = self.lexicon.get(&lowered[i]) {
                valence = base * N_SCALAR;
            }
        }

        if cap_diff && is_all_caps(words[i]) {
            if valence > 0.0 {
                valence += C_INCR;
            } else {
                valence -= C_INCR;
            }
        }

        for start_i in 0..3 {
            if i <= start_i {
                break;
            }
            let prev = words[i - (start_i + 1)];
            if self.lexicon.get(prev).is_some() {
                continue;
            }

            let mut scalar = scalar_inc_dec(prev, valence, cap_diff);
            if start_i == 1 {
                scalar *= 0.95;
            } else if start_i == 2 {
                scalar *= 0.9;
            }
            valence += scalar;
            valence = negation_check(valence, lowered, start_i, i);
        }

        least_check(valence, &self.lexicon, lowered, i)
    }
}

/// "no" one or two words back, or three back with "or"/"nor" in between
fn preceded_by_no(lowered: &[String], i: usize) -> bool {
    let back = |offset: usize| i.checked_sub(offset).map(|j| lowered[j].as_str());

    back(1) == Some("no")
        || back(2) == Some("no")
        || (back(3) == Some("no") && matches!(back(1), Some("or" | "nor")))
}

fn scalar_inc_dec(word: &str, valence: f64, cap_diff: bool) -> f64 {
    let Some(mut scalar) = booster(&word.to_lowercase()) else {
        return 0.0;
    };
    if valence < 0.0 {
        scalar = -scalar;
    }
    if cap_diff && is_all_caps(word) {
        if valence > 0.0 {
            scalar += C_INCR;
        } else {
            scalar -= C_INCR;
        }
    }
    scalar
}

fn negation_check(valence: f64, lowered: &[String], start_i: usize, i: usize) -> f64 {
    let at = |offset: usize| lowered[i - offset].as_str();

    match start_i {
        0 => {
            if is_negation(at(1)) {
                return valence * N_SCALAR;
            }
        }
        1 => {
            if at(2) == "never" && matches!(at(1), "so" | "this") {
                return valence * 1.25;
            }
            if at(2) == "without" && at(1) == "doubt" {
                return valence;
            }
            if is_negation(at(2)) {
                return valence * N_SCALAR;
            }
        }
        _ => {
            if at(3) == "never" && (matches!(at(2), "so" | "this") || matches!(at(1), "so" | "this")) {
                return valence * 1.25;
            }
            if at(3) == "without" && (at(2) == "doubt" || at(1) == "doubt") {
                return valence;
            }
            if is_negation(at(3)) {
                return valence * N_SCALAR;
            }
        }
    }
    valence
}

fn least_check(valence: f64, lexicon: &ValenceLexicon, lowered: &[String], i: usize) -> f64 {
    if i == 0 || lowered[i - 1] != "least" || lexicon.get(&lowered[i - 1]).is_some() {
        return valence;
    }
    if i > 1 && matches!(lowered[i - 2].as_str(), "at" | "very") {
        return valence;
    }
    valence * N_SCALAR
}

/// Clauses after "but" dominate the ones before it
fn but_check(lowered: &[String], sentiments: &mut [f64]) {
    let Some(but_idx) = lowered.iter().position(|w| w == "but") else {
        return;
    };
    for (idx, sentiment) in sentiments.iter_mut().enumerate() {
        if idx < but_idx {
            *sentiment *= 0.5;
        } else if idx > but_idx {
            *sentiment *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(4) as f64 * 0.292;

    let questions = text.matches('?').count();
    let question_emphasis = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * 0.18,
        _ => 0.96,
    };

    exclamations + question_emphasis
}

impl PolarityScorer for VaderScorer {
    fn score(&self, text: &str) -> Result<f64> {
        let compound = self.compound(text);
        debug!(analyzer = %self.name, compound, "scored text");
        Ok(compound)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
