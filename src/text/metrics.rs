//! Sentence-length statistics
//!
//! The rhythm operator and the heuristic scorer both key off the spread of
//! sentence lengths within a paragraph: a flat distribution is a strong
//! machine-generation signal.

/// Mean, standard deviation, and coefficient of variation of a set of
/// sentence lengths (in words).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthStats {
    pub mean: f64,
    pub std_dev: f64,
    /// std_dev / mean; 0.0 when the mean is 0.
    pub cv: f64,
}

impl LengthStats {
    pub const ZERO: LengthStats = LengthStats {
        mean: 0.0,
        std_dev: 0.0,
        cv: 0.0,
    };
}

/// Population statistics over word counts of the given sentences.
pub fn sentence_length_stats(sents: &[String]) -> LengthStats {
    let lengths: Vec<f64> = sents
        .iter()
        .map(|s| s.split_whitespace().count() as f64)
        .collect();
    length_stats(&lengths)
}

fn length_stats(lengths: &[f64]) -> LengthStats {
    if lengths.is_empty() {
        return LengthStats::ZERO;
    }
    let mean = lengths.iter().sum::<f64>() / lengths.len() as f64;
    let variance = lengths.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / lengths.len() as f64;
    let std_dev = variance.sqrt();
    let cv = if mean > 0.0 { std_dev / mean } else { 0.0 };
    LengthStats { mean, std_dev, cv }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sents(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_uniform_lengths_have_zero_spread() {
        let stats = sentence_length_stats(&sents(&["one two three", "four five six"]));
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.cv, 0.0);
    }

    #[test]
    fn test_varied_lengths() {
        let stats = sentence_length_stats(&sents(&["short one", "a much longer sentence here now"]));
        assert_eq!(stats.mean, 4.0);
        assert!(stats.std_dev > 1.9 && stats.std_dev < 2.1);
        assert!(stats.cv > 0.0);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(sentence_length_stats(&[]), LengthStats::ZERO);
    }
}
