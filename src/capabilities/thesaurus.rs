//! Built-in synonym table
//!
//! A static in-process thesaurus. Deliberately small: the lexical operator
//! only swaps a bounded fraction of words, and a conservative table keeps
//! replacements readable. A richer source (WordNet export, embedding
//! neighbors) plugs in behind the same [`Thesaurus`] trait.

use crate::capabilities::Thesaurus;
use std::collections::HashMap;

/// Embedded headword → synonyms table.
const DEFAULT_ENTRIES: &[(&str, &[&str])] = &[
    ("important", &["significant", "notable", "major"]),
    ("significant", &["notable", "important", "sizable"]),
    ("quickly", &["rapidly", "swiftly", "fast"]),
    ("slowly", &["gradually", "steadily"]),
    ("large", &["big", "sizable", "huge"]),
    ("small", &["little", "minor", "modest"]),
    ("difficult", &["hard", "tricky", "tough"]),
    ("simple", &["easy", "plain", "basic"]),
    ("complex", &["complicated", "involved", "intricate"]),
    ("improve", &["boost", "better", "strengthen"]),
    ("increase", &["grow", "raise", "expand"]),
    ("decrease", &["drop", "shrink", "reduce"]),
    ("create", &["build", "make", "produce"]),
    ("develop", &["build", "shape", "grow"]),
    ("understand", &["grasp", "follow", "get"]),
    ("explain", &["describe", "clarify", "spell out"]),
    ("consider", &["weigh", "think about", "look at"]),
    ("require", &["need", "demand", "call for"]),
    ("provide", &["give", "offer", "supply"]),
    ("obtain", &["get", "acquire", "gain"]),
    ("method", &["approach", "way", "technique"]),
    ("result", &["outcome", "effect", "upshot"]),
    ("problem", &["issue", "trouble", "snag"]),
    ("benefit", &["advantage", "upside", "gain"]),
    ("purpose", &["goal", "aim", "point"]),
    ("example", &["instance", "case", "sample"]),
    ("different", &["distinct", "separate", "unlike"]),
    ("similar", &["alike", "comparable", "close"]),
    ("effective", &["useful", "powerful", "potent"]),
    ("various", &["several", "assorted", "many"]),
    ("numerous", &["many", "plenty of", "countless"]),
    ("essential", &["key", "vital", "core"]),
    ("common", &["usual", "widespread", "frequent"]),
    ("popular", &["well-known", "widespread", "favored"]),
    ("modern", &["current", "recent", "contemporary"]),
    ("ancient", &["old", "early", "age-old"]),
    ("begin", &["start", "open", "kick off"]),
    ("finish", &["end", "complete", "wrap up"]),
    ("continue", &["keep going", "carry on", "persist"]),
    ("discover", &["find", "uncover", "spot"]),
    ("believe", &["think", "feel", "reckon"]),
    ("achieve", &["reach", "hit", "pull off"]),
    ("maintain", &["keep", "hold", "preserve"]),
    ("reduce", &["cut", "lower", "trim"]),
    ("enhance", &["improve", "sharpen", "lift"]),
    ("ensure", &["make sure", "see to it", "confirm"]),
    ("determine", &["work out", "figure out", "decide"]),
    ("indicate", &["show", "point to", "suggest"]),
    ("generate", &["produce", "make", "yield"]),
    ("process", &["handle", "work through", "deal with"]),
];

/// Thesaurus backed by an in-memory table.
pub struct StaticThesaurus {
    map: HashMap<String, Vec<String>>,
}

impl StaticThesaurus {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<S>)>,
        S: Into<String>,
    {
        let map = pairs
            .into_iter()
            .map(|(word, syns)| {
                (
                    word.into().to_lowercase(),
                    syns.into_iter().map(Into::into).collect(),
                )
            })
            .collect();
        Self { map }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for StaticThesaurus {
    fn default() -> Self {
        let map = DEFAULT_ENTRIES
            .iter()
            .map(|(word, syns)| {
                (
                    word.to_string(),
                    syns.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect();
        Self { map }
    }
}

impl Thesaurus for StaticThesaurus {
    fn synonyms(&self, word: &str) -> Vec<String> {
        self.map
            .get(&word.to_lowercase())
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let thesaurus = StaticThesaurus::default();
        assert!(!thesaurus.synonyms("Important").is_empty());
        assert!(thesaurus.synonyms("xylophone").is_empty());
    }

    #[test]
    fn test_from_pairs() {
        let thesaurus = StaticThesaurus::from_pairs(vec![("Fast", vec!["quick", "rapid"])]);
        assert_eq!(thesaurus.synonyms("fast"), vec!["quick", "rapid"]);
        assert_eq!(thesaurus.len(), 1);
    }
}
