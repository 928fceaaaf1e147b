//! Keyword-to-genre lexicon.
//!
//! The lexicon is plain data: an ordered list of `(phrase, genres)` entries.
//! Phrases are stored pre-tokenized and sorted longest-first so the
//! interpreter can consume multi-word phrases before their parts.
//!
//! The built-in table covers the MovieLens genres. A TOML file can replace
//! or extend it:
//!
//! ```toml
//! extend_standard = true
//!
//! [[entries]]
//! phrase = "space opera"
//! genres = ["Sci-Fi", "Adventure"]
//! ```

use crate::interpreter::tokenize;
use data_loader::Genre;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, LazyLock};
use thiserror::Error;

/// Errors raised while building a lexicon from data
#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("Failed to read lexicon file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid lexicon TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Lexicon phrase {0:?} has no words in it")]
    EmptyPhrase(String),

    #[error("Lexicon phrase {0:?} maps to no genres")]
    NoGenres(String),

    #[error("Unknown genre {genre:?} for phrase {phrase:?}")]
    UnknownGenre { phrase: String, genre: String },
}

/// One lexicon row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconEntry {
    /// Phrase as written in the source table
    pub phrase: String,
    /// Normalized tokens the phrase must match, in order
    pub tokens: Vec<String>,
    pub genres: BTreeSet<Genre>,
}

/// Immutable phrase -> genres mapping, ordered longest-first
#[derive(Debug, Clone)]
pub struct GenreLexicon {
    entries: Vec<LexiconEntry>,
}

#[derive(Debug, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    extend_standard: bool,
    #[serde(default)]
    entries: Vec<EntrySpec>,
}

#[derive(Debug, Deserialize)]
struct EntrySpec {
    phrase: String,
    genres: Vec<String>,
}

static STANDARD: LazyLock<Arc<GenreLexicon>> = LazyLock::new(|| {
    let entries = STANDARD_ENTRIES
        .iter()
        .map(|(phrase, genres)| (phrase.to_string(), genres.iter().copied().collect()))
        .collect::<Vec<(String, BTreeSet<Genre>)>>();
    // The built-in table only holds non-empty phrases with genres
    Arc::new(GenreLexicon::from_pairs(entries).unwrap_or_else(|_| GenreLexicon::empty()))
});

impl GenreLexicon {
    /// Lexicon with no entries; every text interprets to no genres
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The built-in lexicon, shared process-wide
    pub fn standard() -> Arc<GenreLexicon> {
        Arc::clone(&STANDARD)
    }

    /// Build from `(phrase, genres)` pairs
    ///
    /// Phrases that normalize to the same tokens are merged and their genres
    /// unioned.
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (String, BTreeSet<Genre>)>,
    ) -> Result<Self, LexiconError> {
        let mut entries: Vec<LexiconEntry> = Vec::new();
        for (phrase, genres) in pairs {
            let tokens = tokenize(&phrase);
            if tokens.is_empty() {
                return Err(LexiconError::EmptyPhrase(phrase));
            }
            if genres.is_empty() {
                return Err(LexiconError::NoGenres(phrase));
            }
            match entries.iter_mut().find(|e| e.tokens == tokens) {
                Some(existing) => existing.genres.extend(genres),
                None => entries.push(LexiconEntry {
                    phrase,
                    tokens,
                    genres,
                }),
            }
        }

        entries.sort_by(|a, b| {
            b.tokens
                .len()
                .cmp(&a.tokens.len())
                .then_with(|| b.phrase.len().cmp(&a.phrase.len()))
                .then_with(|| a.phrase.cmp(&b.phrase))
        });
        Ok(Self { entries })
    }

    /// Parse a TOML lexicon
    ///
    /// With `extend_standard = true` the file's entries are merged into the
    /// built-in table; otherwise they replace it.
    pub fn from_toml_str(content: &str) -> Result<Self, LexiconError> {
        let file: LexiconFile = toml::from_str(content)?;

        let mut pairs: Vec<(String, BTreeSet<Genre>)> = Vec::new();
        if file.extend_standard {
            pairs.extend(
                STANDARD
                    .entries
                    .iter()
                    .map(|e| (e.phrase.clone(), e.genres.clone())),
            );
        }
        for raw in file.entries {
            let mut genres = BTreeSet::new();
            for label in &raw.genres {
                let genre = Genre::from_label(label).ok_or_else(|| LexiconError::UnknownGenre {
                    phrase: raw.phrase.clone(),
                    genre: label.clone(),
                })?;
                genres.insert(genre);
            }
            pairs.push((raw.phrase, genres));
        }
        Self::from_pairs(pairs)
    }

    /// Read and parse a TOML lexicon file
    pub fn from_toml_file(path: &Path) -> Result<Self, LexiconError> {
        let content = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Entries, longest phrase first
    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

use Genre::*;

/// Built-in phrases. Keep "love" out on its own: "I love sci-fi" is not a
/// request for romance.
const STANDARD_ENTRIES: &[(&str, &[Genre])] = &[
    // Action
    ("action", &[Action]),
    ("action packed", &[Action]),
    ("explosions", &[Action]),
    ("explosive", &[Action]),
    ("fight", &[Action]),
    ("fights", &[Action]),
    ("fighting", &[Action]),
    ("martial arts", &[Action]),
    ("kung fu", &[Action]),
    ("car chase", &[Action]),
    ("car chases", &[Action]),
    ("superhero", &[Action, Adventure]),
    ("superheroes", &[Action, Adventure]),
    ("adrenaline", &[Action, Thriller]),
    // Adventure
    ("adventure", &[Adventure]),
    ("adventures", &[Adventure]),
    ("adventurous", &[Adventure]),
    ("quest", &[Adventure]),
    ("treasure", &[Adventure]),
    ("exploration", &[Adventure]),
    ("swashbuckling", &[Adventure, Action]),
    ("pirates", &[Adventure]),
    // Animation
    ("animation", &[Animation]),
    ("animated", &[Animation]),
    ("cartoon", &[Animation]),
    ("cartoons", &[Animation]),
    ("anime", &[Animation]),
    ("pixar", &[Animation, Children]),
    ("disney", &[Animation, Children]),
    // Children's
    ("children", &[Children]),
    ("children's", &[Children]),
    ("kids", &[Children]),
    ("kid friendly", &[Children]),
    ("family", &[Children]),
    ("family friendly", &[Children]),
    // Comedy
    ("comedy", &[Comedy]),
    ("comedies", &[Comedy]),
    ("funny", &[Comedy]),
    ("hilarious", &[Comedy]),
    ("humor", &[Comedy]),
    ("humour", &[Comedy]),
    ("laugh", &[Comedy]),
    ("laughs", &[Comedy]),
    ("lighthearted", &[Comedy]),
    ("light hearted", &[Comedy]),
    ("satire", &[Comedy]),
    ("parody", &[Comedy]),
    ("rom com", &[Comedy, Romance]),
    ("romcom", &[Comedy, Romance]),
    ("romantic comedy", &[Comedy, Romance]),
    ("romantic comedies", &[Comedy, Romance]),
    // Crime
    ("crime", &[Crime]),
    ("criminal", &[Crime]),
    ("gangster", &[Crime]),
    ("gangsters", &[Crime]),
    ("mafia", &[Crime]),
    ("mob", &[Crime]),
    ("heist", &[Crime, Thriller]),
    ("heists", &[Crime, Thriller]),
    ("detective", &[Crime, Mystery]),
    ("detectives", &[Crime, Mystery]),
    // Documentary
    ("documentary", &[Documentary]),
    ("documentaries", &[Documentary]),
    ("docs", &[Documentary]),
    ("true story", &[Documentary, Drama]),
    ("real life", &[Documentary]),
    // Drama
    ("drama", &[Drama]),
    ("dramas", &[Drama]),
    ("dramatic", &[Drama]),
    ("emotional", &[Drama]),
    ("tearjerker", &[Drama]),
    ("character study", &[Drama]),
    // Fantasy
    ("fantasy", &[Fantasy]),
    ("magic", &[Fantasy]),
    ("magical", &[Fantasy]),
    ("wizard", &[Fantasy]),
    ("wizards", &[Fantasy]),
    ("dragons", &[Fantasy]),
    ("fairy tale", &[Fantasy, Children]),
    ("fairy tales", &[Fantasy, Children]),
    ("mythical", &[Fantasy]),
    // Film-Noir
    ("film noir", &[FilmNoir]),
    ("noir", &[FilmNoir]),
    ("neo noir", &[FilmNoir, Crime]),
    // Horror
    ("horror", &[Horror]),
    ("scary", &[Horror]),
    ("creepy", &[Horror]),
    ("terrifying", &[Horror]),
    ("frightening", &[Horror]),
    ("monster", &[Horror]),
    ("monsters", &[Horror]),
    ("zombie", &[Horror]),
    ("zombies", &[Horror]),
    ("slasher", &[Horror]),
    ("ghost", &[Horror]),
    ("ghosts", &[Horror]),
    ("haunted", &[Horror]),
    ("spooky", &[Horror]),
    // Musical
    ("musical", &[Musical]),
    ("musicals", &[Musical]),
    ("singing", &[Musical]),
    ("songs", &[Musical]),
    ("dancing", &[Musical]),
    ("broadway", &[Musical]),
    // Mystery
    ("mystery", &[Mystery]),
    ("mysteries", &[Mystery]),
    ("mysterious", &[Mystery]),
    ("whodunit", &[Mystery]),
    ("whodunnit", &[Mystery]),
    ("plot twist", &[Mystery, Thriller]),
    ("plot twists", &[Mystery, Thriller]),
    // Romance
    ("romance", &[Romance]),
    ("romances", &[Romance]),
    ("romantic", &[Romance]),
    ("love story", &[Romance]),
    ("love stories", &[Romance]),
    ("in love", &[Romance]),
    ("dating", &[Romance]),
    // Sci-Fi
    ("sci-fi", &[SciFi]),
    ("scifi", &[SciFi]),
    ("science fiction", &[SciFi]),
    ("space", &[SciFi]),
    ("outer space", &[SciFi]),
    ("alien", &[SciFi]),
    ("aliens", &[SciFi]),
    ("robot", &[SciFi]),
    ("robots", &[SciFi]),
    ("futuristic", &[SciFi]),
    ("time travel", &[SciFi]),
    ("dystopian", &[SciFi]),
    ("cyberpunk", &[SciFi]),
    ("star wars", &[SciFi, Action, Adventure]),
    ("star trek", &[SciFi, Adventure]),
    // Thriller
    ("thriller", &[Thriller]),
    ("thrillers", &[Thriller]),
    ("suspense", &[Thriller]),
    ("suspenseful", &[Thriller]),
    ("tense", &[Thriller]),
    ("edge of my seat", &[Thriller]),
    ("edge of your seat", &[Thriller]),
    ("conspiracy", &[Thriller]),
    ("spy", &[Thriller, Action]),
    ("espionage", &[Thriller]),
    ("psychological", &[Thriller]),
    // War
    ("war", &[War]),
    ("war movies", &[War]),
    ("military", &[War]),
    ("soldiers", &[War]),
    ("battle", &[War]),
    ("battles", &[War]),
    ("world war", &[War]),
    ("wwii", &[War]),
    ("ww2", &[War]),
    ("army", &[War]),
    // Western
    ("western", &[Western]),
    ("westerns", &[Western]),
    ("cowboy", &[Western]),
    ("cowboys", &[Western]),
    ("wild west", &[Western]),
    ("outlaw", &[Western]),
    ("outlaws", &[Western]),
    ("gunslinger", &[Western]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_lexicon_is_longest_first() {
        let lexicon = GenreLexicon::standard();
        assert!(!lexicon.is_empty());
        let lens: Vec<usize> = lexicon.entries().iter().map(|e| e.tokens.len()).collect();
        assert!(lens.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(lexicon.entries()[0].phrase, "edge of your seat");
    }

    #[test]
    fn test_standard_covers_every_real_genre() {
        let lexicon = GenreLexicon::standard();
        for genre in Genre::ALL.into_iter().filter(|g| *g != Genre::Unknown) {
            assert!(
                lexicon.entries().iter().any(|e| e.genres.contains(&genre)),
                "no phrase for {}",
                genre
            );
        }
    }

    #[test]
    fn test_duplicate_phrases_merge() {
        let lexicon = GenreLexicon::from_pairs(vec![
            ("Sci-Fi".to_string(), BTreeSet::from([Genre::SciFi])),
            ("sci fi".to_string(), BTreeSet::from([Genre::Action])),
        ])
        .unwrap();
        assert_eq!(lexicon.len(), 1);
        assert_eq!(
            lexicon.entries()[0].genres,
            BTreeSet::from([Genre::Action, Genre::SciFi])
        );
    }

    #[test]
    fn test_rejects_bad_entries() {
        let err = GenreLexicon::from_pairs(vec![("--".to_string(), BTreeSet::from([Genre::War]))])
            .unwrap_err();
        assert!(matches!(err, LexiconError::EmptyPhrase(_)));

        let err = GenreLexicon::from_pairs(vec![("war".to_string(), BTreeSet::new())]).unwrap_err();
        assert!(matches!(err, LexiconError::NoGenres(_)));
    }

    #[test]
    fn test_toml_replace_and_extend() {
        let replaced = GenreLexicon::from_toml_str(
            r#"
            [[entries]]
            phrase = "space opera"
            genres = ["Sci-Fi", "adventure"]
            "#,
        )
        .unwrap();
        assert_eq!(replaced.len(), 1);
        assert_eq!(
            replaced.entries()[0].genres,
            BTreeSet::from([Genre::Adventure, Genre::SciFi])
        );

        let extended = GenreLexicon::from_toml_str(
            r#"
            extend_standard = true

            [[entries]]
            phrase = "space opera"
            genres = ["Sci-Fi"]
            "#,
        )
        .unwrap();
        assert_eq!(extended.len(), GenreLexicon::standard().len() + 1);
    }

    #[test]
    fn test_toml_unknown_genre() {
        let err = GenreLexicon::from_toml_str(
            r#"
            [[entries]]
            phrase = "toons"
            genres = ["Cartoon"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, LexiconError::UnknownGenre { .. }));
    }
}
