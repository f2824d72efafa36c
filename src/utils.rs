use unicode_segmentation::UnicodeSegmentation;

/// Folds a term or a document to the case stored in the index.
pub fn normalize(s: &str) -> String {
    s.trim_start().trim_end().to_lowercase()
}

/// Splits already normalized text into terms.
///
/// Word boundaries follow UAX #29, words without any alphanumeric character
/// (punctuation, symbols) are dropped.
pub fn tokenize(s: &str) -> impl Iterator<Item = &str> {
    s.unicode_words()
}

/// Returns the index of the first element of `s` that is `>= target`,
/// starting the search at `begin` and doubling the step until it
/// overshoots.
#[inline(always)]
pub(crate) fn gallop(s: &[u32], begin: usize, target: u32) -> usize {
    if begin >= s.len() || s[begin] >= target {
        return begin;
    }

    // s[lo] < target always holds
    let mut lo = begin;
    let mut delta = 1;
    let mut hi = lo + delta;
    while hi < s.len() && s[hi] < target {
        lo = hi;
        delta *= 2;
        hi = lo + delta;
    }
    let hi = hi.min(s.len());

    lo + 1 + s[(lo + 1)..hi].partition_point(|v| *v < target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_folded() {
        let s = normalize("  Lorem ipsum, DOLOR sit... amet  ");
        let tokens: Vec<_> = tokenize(&s).collect();
        assert_eq!(tokens, ["lorem", "ipsum", "dolor", "sit", "amet"]);
    }

    #[test]
    fn tokenize_keeps_contractions_and_decimals() {
        let tokens: Vec<_> = tokenize("we don't ship v3.14, 2.5 or don t").collect();
        assert_eq!(tokens, ["we", "don't", "ship", "v3.14", "2.5", "or", "don", "t"]);
    }

    #[test]
    fn tokenize_drops_punctuation() {
        let tokens: Vec<_> = tokenize("-- , ; ! ?").collect();
        assert!(tokens.is_empty());
    }

    #[test]
    fn gallop_positions() {
        let s = [1, 3, 5, 7, 9, 11, 13, 15, 17];
        assert_eq!(gallop(&s, 0, 0), 0);
        assert_eq!(gallop(&s, 0, 1), 0);
        assert_eq!(gallop(&s, 0, 2), 1);
        assert_eq!(gallop(&s, 0, 13), 6);
        assert_eq!(gallop(&s, 2, 14), 7);
        assert_eq!(gallop(&s, 4, 17), 8);
        assert_eq!(gallop(&s, 0, 18), s.len());
        assert_eq!(gallop(&s, 5, 3), 5);
        assert_eq!(gallop(&s, s.len(), 3), s.len());
    }
}
