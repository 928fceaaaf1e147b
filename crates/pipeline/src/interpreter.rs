//! Preference interpretation: free text -> genre set.
//!
//! ## Algorithm
//! 1. Lowercase the text and split on anything that isn't a letter or digit
//! 2. Walk the lexicon longest phrase first
//! 3. A phrase matches a run of tokens none of which a longer phrase already
//!    claimed; the run is then claimed
//! 4. Union the genres of every phrase that matched
//!
//! Lexicon phrases go through the same tokenizer, so "Sci-Fi!", "sci fi" and
//! "SCI-FI" all look alike, and "sci-fi" can't leave "fi" behind for a
//! shorter entry.

use crate::lexicon::GenreLexicon;
use crate::GenreSet;
use std::sync::Arc;
use tracing::debug;

/// Split text into lowercase alphanumeric tokens
///
/// Example: "I love Sci-Fi, really!" -> ["i", "love", "sci", "fi", "really"]
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// What a piece of preference text resolved to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interpretation {
    pub genres: GenreSet,
    /// Lexicon phrases that matched, in lexicon order
    pub matched_phrases: Vec<String>,
}

impl Interpretation {
    /// True when the text carried no genre signal
    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }
}

/// Maps preference text to genres using a `GenreLexicon`
///
/// Cheap to clone: the lexicon is shared.
#[derive(Debug, Clone)]
pub struct PreferenceInterpreter {
    lexicon: Arc<GenreLexicon>,
}

impl PreferenceInterpreter {
    pub fn new(lexicon: Arc<GenreLexicon>) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &GenreLexicon {
        &self.lexicon
    }

    /// Genres mentioned in `text`; empty when nothing matched
    pub fn interpret(&self, text: &str) -> GenreSet {
        self.interpret_detailed(text).genres
    }

    /// Like `interpret`, but also reports which phrases matched
    pub fn interpret_detailed(&self, text: &str) -> Interpretation {
        let tokens = tokenize(text);
        let mut claimed = vec![false; tokens.len()];
        let mut interpretation = Interpretation::default();

        for entry in self.lexicon.entries() {
            let width = entry.tokens.len();
            if width > tokens.len() {
                continue;
            }
            let mut hit = false;
            for start in 0..=tokens.len() - width {
                let window = start..start + width;
                if claimed[window.clone()].iter().any(|&c| c) {
                    continue;
                }
                if tokens[window.clone()] == entry.tokens[..] {
                    claimed[window].fill(true);
                    hit = true;
                }
            }
            if hit {
                interpretation.genres.extend(entry.genres.iter().copied());
                interpretation.matched_phrases.push(entry.phrase.clone());
            }
        }

        debug!(
            phrases = ?interpretation.matched_phrases,
            genres = ?interpretation.genres,
            "Interpreted preference text"
        );
        interpretation
    }
}

impl Default for PreferenceInterpreter {
    fn default() -> Self {
        Self::new(GenreLexicon::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::Genre;
    use std::collections::BTreeSet;

    fn interpreter_with(pairs: &[(&str, &[Genre])]) -> PreferenceInterpreter {
        let lexicon = GenreLexicon::from_pairs(
            pairs
                .iter()
                .map(|(p, g)| (p.to_string(), g.iter().copied().collect::<BTreeSet<_>>())),
        )
        .unwrap();
        PreferenceInterpreter::new(Arc::new(lexicon))
    }

    #[test]
    fn test_tokenize_strips_punctuation() {
        assert_eq!(
            tokenize("I love Sci-Fi, really!"),
            vec!["i", "love", "sci", "fi", "really"]
        );
        assert!(tokenize("  ...  ").is_empty());
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let interpreter = PreferenceInterpreter::default();
        for text in ["I love sci-fi movies", "SCI-FI!!", "sci fi", "Sci-Fi."] {
            assert_eq!(
                interpreter.interpret(text),
                BTreeSet::from([Genre::SciFi]),
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_longest_phrase_claims_tokens() {
        let interpreter = interpreter_with(&[
            ("sci-fi", &[Genre::SciFi]),
            ("fi", &[Genre::Documentary]),
        ]);
        assert_eq!(
            interpreter.interpret("sci-fi please"),
            BTreeSet::from([Genre::SciFi])
        );
        // A free-standing "fi" still matches
        assert_eq!(
            interpreter.interpret("fi"),
            BTreeSet::from([Genre::Documentary])
        );
    }

    #[test]
    fn test_no_partial_word_matches() {
        let interpreter = PreferenceInterpreter::default();
        // "warm" contains "war", "spacey" contains "space"
        assert!(interpreter.interpret("something warm and spacey").is_empty());
    }

    #[test]
    fn test_multiple_genres_union() {
        let interpreter = PreferenceInterpreter::default();
        let genres = interpreter.interpret("Looking for romantic comedies or a dark thriller");
        assert_eq!(
            genres,
            BTreeSet::from([Genre::Comedy, Genre::Romance, Genre::Thriller])
        );
    }

    #[test]
    fn test_love_alone_is_not_romance() {
        let interpreter = PreferenceInterpreter::default();
        assert!(!interpreter.interpret("I love westerns").contains(&Genre::Romance));
        assert!(interpreter.interpret("falling in love").contains(&Genre::Romance));
    }

    #[test]
    fn test_empty_and_garbage_text() {
        let interpreter = PreferenceInterpreter::default();
        assert!(interpreter.interpret("").is_empty());
        assert!(interpreter.interpret("   \t\n").is_empty());
        assert!(interpreter.interpret("qwerty zxcv 12345").is_empty());
    }

    #[test]
    fn test_detailed_reports_phrases() {
        let interpreter = PreferenceInterpreter::default();
        let interpretation = interpreter.interpret_detailed("a science fiction heist");
        assert_eq!(
            interpretation.matched_phrases,
            vec!["science fiction".to_string(), "heist".to_string()]
        );
        assert_eq!(
            interpretation.genres,
            BTreeSet::from([Genre::Crime, Genre::SciFi, Genre::Thriller])
        );
    }

    #[test]
    fn test_deterministic() {
        let interpreter = PreferenceInterpreter::default();
        let text = "Action movies with sci-fi themes and some comedy";
        let first = interpreter.interpret_detailed(text);
        for _ in 0..10 {
            assert_eq!(interpreter.interpret_detailed(text), first);
        }
    }
}
