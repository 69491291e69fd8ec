//! Text segmentation and small string utilities
//!
//! Paragraphs are newline-delimited lines: `paragraphs` splits on `'\n'`
//! and callers rejoin with `'\n'`, so blank lines survive verbatim and the
//! paragraph count is stable under structure-preserving runs. Sentence
//! segmentation is a terminator-aware scanner that knows about common
//! abbreviations and decimal numbers; it is deliberately conservative —
//! over-merging is harmless to the operators, over-splitting is not.

pub mod metrics;

/// Abbreviations that end with a period but do not end a sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "st", "vs", "etc", "e.g", "i.e", "cf", "al", "inc", "ltd",
    "jr", "sr", "no", "fig", "approx",
];

/// Split into newline-delimited paragraph units, preserving empty lines.
pub fn paragraphs(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Number of paragraph units `paragraphs` would produce.
pub fn paragraph_count(text: &str) -> usize {
    text.split('\n').count()
}

/// Segment a paragraph into sentences.
///
/// A sentence ends at `.`, `!`, or `?` (plus any closing quotes/brackets)
/// followed by whitespace, unless the terminator belongs to a known
/// abbreviation or sits between digits.
pub fn sentences(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = trimmed.chars().collect();
    let mut out = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if matches!(c, '.' | '!' | '?') {
            // Decimal point: 3.14
            if c == '.'
                && i > 0
                && i + 1 < chars.len()
                && chars[i - 1].is_ascii_digit()
                && chars[i + 1].is_ascii_digit()
            {
                i += 1;
                continue;
            }
            if c == '.' && ends_with_abbreviation(&chars[start..i]) {
                i += 1;
                continue;
            }
            // Swallow runs of terminators ("..." / "?!") and trailing quotes.
            let mut end = i + 1;
            while end < chars.len() && matches!(chars[end], '.' | '!' | '?' | '"' | '\'' | ')' | ']') {
                end += 1;
            }
            if end >= chars.len() || chars[end].is_whitespace() {
                let sentence: String = chars[start..end].iter().collect();
                let sentence = sentence.trim();
                if !sentence.is_empty() {
                    out.push(sentence.to_string());
                }
                // Skip the whitespace run.
                while end < chars.len() && chars[end].is_whitespace() {
                    end += 1;
                }
                start = end;
                i = end;
                continue;
            }
            i = end;
            continue;
        }
        i += 1;
    }

    if start < chars.len() {
        let tail: String = chars[start..].iter().collect();
        let tail = tail.trim();
        if !tail.is_empty() {
            out.push(tail.to_string());
        }
    }

    out
}

fn ends_with_abbreviation(prefix: &[char]) -> bool {
    // Collect the word immediately before the period.
    let mut word = String::new();
    for &c in prefix.iter().rev() {
        if c.is_alphabetic() || c == '.' {
            word.push(c);
        } else {
            break;
        }
    }
    if word.is_empty() {
        return false;
    }
    let word: String = word.chars().rev().collect::<String>().to_ascii_lowercase();
    ABBREVIATIONS.contains(&word.as_str())
}

/// Rejoin sentences produced by [`sentences`].
pub fn join_sentences(sents: &[String]) -> String {
    sents.join(" ")
}

/// Whitespace-delimited word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Count of alphabetic characters. Used by the engine's destructive-output
/// floor guard.
pub fn alphabetic_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_alphabetic()).count()
}

/// Lowercase the first character, leaving the rest untouched.
pub fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Uppercase the first character, leaving the rest untouched.
pub fn uppercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Transfer the casing shape of `original` onto `replacement`:
/// all-caps stays all-caps, leading capital stays a leading capital.
pub fn match_case(original: &str, replacement: &str) -> String {
    if original.chars().all(|c| !c.is_lowercase()) && original.chars().any(|c| c.is_uppercase()) {
        replacement.to_uppercase()
    } else if original.chars().next().is_some_and(|c| c.is_uppercase()) {
        uppercase_first(replacement)
    } else {
        replacement.to_string()
    }
}

/// Strip leading/trailing punctuation from a token, returning
/// `(prefix, core, suffix)`.
pub fn split_affixes(token: &str) -> (&str, &str, &str) {
    let is_affix = |c: char| !c.is_alphanumeric();
    let start = token
        .char_indices()
        .find(|(_, c)| !is_affix(*c))
        .map(|(i, _)| i)
        .unwrap_or(token.len());
    let end = token
        .char_indices()
        .rev()
        .find(|(_, c)| !is_affix(*c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(start);
    (&token[..start], &token[start..end], &token[end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_preserve_blank_lines() {
        let text = "first\n\nsecond\n";
        let paras = paragraphs(text);
        assert_eq!(paras, vec!["first", "", "second", ""]);
        assert_eq!(paras.join("\n"), text);
    }

    #[test]
    fn test_sentences_basic() {
        let sents = sentences("The cat sat. The dog barked! Did it rain?");
        assert_eq!(
            sents,
            vec!["The cat sat.", "The dog barked!", "Did it rain?"]
        );
    }

    #[test]
    fn test_sentences_abbreviations() {
        let sents = sentences("Dr. Smith arrived at 3.5 p.m. sharp. Everyone clapped.");
        assert_eq!(sents.len(), 2);
        assert!(sents[0].starts_with("Dr. Smith"));
    }

    #[test]
    fn test_sentences_no_terminator() {
        let sents = sentences("a fragment without punctuation");
        assert_eq!(sents, vec!["a fragment without punctuation"]);
    }

    #[test]
    fn test_sentences_empty() {
        assert!(sentences("").is_empty());
        assert!(sentences("   ").is_empty());
    }

    #[test]
    fn test_match_case() {
        assert_eq!(match_case("Important", "crucial"), "Crucial");
        assert_eq!(match_case("IMPORTANT", "crucial"), "CRUCIAL");
        assert_eq!(match_case("important", "crucial"), "crucial");
    }

    #[test]
    fn test_split_affixes() {
        assert_eq!(split_affixes("(hello)."), ("(", "hello", ")."));
        assert_eq!(split_affixes("plain"), ("", "plain", ""));
        assert_eq!(split_affixes("..."), ("...", "", ""));
    }

    #[test]
    fn test_alphabetic_count() {
        assert_eq!(alphabetic_count("ab c1!"), 3);
    }
}
