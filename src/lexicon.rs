//! Word lists shared by operators, oracles, and the selector
//!
//! All of this is data, not behavior: callers can construct a [`Lexicon`]
//! with their own lists. `Lexicon::default()` ships a workable English set;
//! the stop words come from the `stop_words` crate.

use std::collections::HashSet;

/// Transition words that formulaic generated prose overuses. Stripped by the
/// destructuring operator, counted by the heuristic scorer and the selector.
pub const AI_TRANSITIONS: &[&str] = &[
    "additionally",
    "furthermore",
    "moreover",
    "consequently",
    "therefore",
    "thus",
    "hence",
    "notably",
    "importantly",
    "subsequently",
    "nevertheless",
    "nonetheless",
];

/// Sentence-initial formulas stripped by the destructuring operator.
pub const FORMULAIC_OPENERS: &[&str] = &[
    "In conclusion",
    "In summary",
    "On the other hand",
    "As a result",
    "For instance",
    "For example",
    "It is important to note that",
    "It is worth noting that",
    "It should be noted that",
];

/// Connectors used when merging adjacent sentences.
pub const CONNECTORS: &[&str] = &[" and ", " but ", " so ", " - ", "; "];

/// Mid-sentence hedges.
pub const HEDGES: &[&str] = &[
    "kind of",
    "sort of",
    "maybe",
    "probably",
    "I think",
    "seems like",
    "basically",
    "generally",
];

/// Conversational fillers inserted mid-sentence.
pub const FILLERS: &[&str] = &["you know,", "I mean,", "like,", "honestly,", "anyway,"];

/// First-person sentence openers.
pub const OPENERS: &[&str] = &[
    "Personally, ",
    "To me, ",
    "Honestly, ",
    "I feel like ",
    "From what I've seen, ",
    "I might be wrong, but ",
    "If you ask me, ",
    "In my experience, ",
];

/// Rephrasing lead-ins prepended to non-initial sentences.
pub const CLARIFIERS: &[&str] = &[
    "What I mean is, ",
    "To put it differently, ",
    "Or rather, ",
    "In other words, ",
    "Here's the thing, ",
];

/// Self-correction lead-ins.
pub const CORRECTIONS: &[&str] = &[
    "Wait, no - ",
    "Actually, scratch that - ",
    "Or maybe it's better to say ",
    "Well, not exactly, but ",
];

/// Redundancy phrases.
pub const REDUNDANCIES: &[&str] = &["Again, ", "Like I said, ", "As I mentioned, "];

/// Parenthetical asides appended to sentences.
pub const ASIDES: &[&str] = &[
    " (just my opinion though)",
    " (could be wrong)",
    " (take that with a grain of salt)",
    " - at least that's how I see it",
    " - though I could be wrong",
    " - that's just my take",
];

/// Absolute-claim words softened into hedged ones.
pub const WEAKENERS: &[(&str, &str)] = &[
    ("guarantees", "helps"),
    ("proves", "suggests"),
    ("clearly", "it seems"),
    ("always", "often"),
    ("essential", "useful"),
    ("undeniable", "pretty strong"),
    ("certainly", "probably"),
    ("definitively", "arguably"),
];

/// Stiff register words swapped for looser equivalents.
pub const LOOSENING: &[(&str, &str)] = &[
    ("utilize", "use"),
    ("facilitate", "help"),
    ("implement", "do"),
    ("commence", "start"),
    ("terminate", "stop"),
    ("regarding", "about"),
    ("leverage", "use"),
    ("demonstrate", "show"),
];

/// Formal pairs folded into contractions.
pub const CONTRACTIONS: &[(&str, &str)] = &[
    ("do not", "don't"),
    ("cannot", "can't"),
    ("will not", "won't"),
    ("should not", "shouldn't"),
    ("would not", "wouldn't"),
    ("is not", "isn't"),
    ("are not", "aren't"),
    ("it is", "it's"),
    ("that is", "that's"),
    ("there is", "there's"),
];

/// Informal markers counted by the heuristic scorer.
pub const INFORMAL_MARKERS: &[&str] = &[
    "honestly",
    "like,",
    "you know,",
    "i mean,",
    "basically,",
    "kind of",
    "sort of",
    "tbh",
    "lol",
];

/// Formality markers counted by the adaptive selector.
pub const FORMAL_MARKERS: &[&str] = &["shall", "ought", "whereas", "thereby", "wherein"];

/// Zero-width characters inserted by the invisible-noise operator.
pub const ZERO_WIDTH: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}'];

/// Latin → Cyrillic look-alike pairs.
pub const HOMOGLYPHS: &[(char, char)] = &[
    ('a', 'а'),
    ('e', 'е'),
    ('o', 'о'),
    ('A', 'А'),
    ('E', 'Е'),
    ('O', 'О'),
];

/// Emoji groups keyed by tone.
pub const EMOJI_POSITIVE: &[&str] = &["✨", "🚀", "🙌", "🔥", "✅", "💡"];
pub const EMOJI_THINKING: &[&str] = &["🤔", "💭", "🧠"];
pub const EMOJI_CASUAL: &[&str] = &["😂", "🙏", "💯", "🤷", "😅"];
pub const EMOJI_CREATIVE: &[&str] = &["🌈", "🎨", "✍️", "🎭"];
pub const EMOJI_PROFESSIONAL: &[&str] = &["📈", "🎯", "🤝", "💡"];

/// The injectable word-list bundle.
#[derive(Debug, Clone)]
pub struct Lexicon {
    pub stop_words: HashSet<String>,
    pub ai_transitions: Vec<String>,
    pub formulaic_openers: Vec<String>,
    pub connectors: Vec<String>,
    pub hedges: Vec<String>,
    pub fillers: Vec<String>,
    pub openers: Vec<String>,
    pub clarifiers: Vec<String>,
    pub corrections: Vec<String>,
    pub redundancies: Vec<String>,
    pub asides: Vec<String>,
    pub weakeners: Vec<(String, String)>,
    pub loosening: Vec<(String, String)>,
    pub contractions: Vec<(String, String)>,
    pub informal_markers: Vec<String>,
    pub formal_markers: Vec<String>,
}

impl Lexicon {
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(&word.to_lowercase())
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        let owned = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let pairs = |xs: &[(&str, &str)]| {
            xs.iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect::<Vec<_>>()
        };
        Self {
            stop_words: stop_words::get(stop_words::LANGUAGE::English)
                .into_iter()
                .collect(),
            ai_transitions: owned(AI_TRANSITIONS),
            formulaic_openers: owned(FORMULAIC_OPENERS),
            connectors: owned(CONNECTORS),
            hedges: owned(HEDGES),
            fillers: owned(FILLERS),
            openers: owned(OPENERS),
            clarifiers: owned(CLARIFIERS),
            corrections: owned(CORRECTIONS),
            redundancies: owned(REDUNDANCIES),
            asides: owned(ASIDES),
            weakeners: pairs(WEAKENERS),
            loosening: pairs(LOOSENING),
            contractions: pairs(CONTRACTIONS),
            informal_markers: owned(INFORMAL_MARKERS),
            formal_markers: owned(FORMAL_MARKERS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lexicon_has_stop_words() {
        let lex = Lexicon::default();
        assert!(lex.is_stop_word("the"));
        assert!(lex.is_stop_word("The"));
        assert!(!lex.is_stop_word("significant"));
    }

    #[test]
    fn test_replacement_pairs_are_lowercase() {
        let lex = Lexicon::default();
        for (from, _) in lex.weakeners.iter().chain(&lex.loosening).chain(&lex.contractions) {
            assert_eq!(from, &from.to_lowercase(), "pattern {from:?} must be lowercase");
        }
    }
}
