//! Approximate string similarity on a 0-100 scale
//!
//! All functions expect already-normalized input. The base measure is the
//! indel similarity `2 * LCS / (len_a + len_b)`; the token variants make it
//! insensitive to word order and to extra words on one side.

use std::collections::BTreeSet;

/// Length ratio above which partial (substring) matching is considered
const PARTIAL_LENGTH_RATIO: f64 = 1.5;

/// Partial matches never score as high as full ones
const PARTIAL_SCALE: f64 = 0.9;

/// Similarity of the two strings as a whole
pub fn ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    char_ratio(&a, &b)
}

fn char_ratio(a: &[char], b: &[char]) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let total = a.len() + b.len();
    let lcs = longest_common_subsequence(a, b);
    to_score(2.0 * lcs as f64 / total as f64)
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb {
                previous[j] + 1
            } else {
                current[j].max(previous[j + 1])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

fn to_score(similarity: f64) -> u8 {
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Ratio after sorting the words of both strings
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn sorted_tokens(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Set-based comparison
///
/// Compares the shared words alone against the shared words plus each
/// side's leftovers. A string whose words are a subset of the other's
/// scores 100.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    let intersection = join(tokens_a.intersection(&tokens_b));
    let only_a = join(tokens_a.difference(&tokens_b));
    let only_b = join(tokens_b.difference(&tokens_a));

    let combined_a = format!("{} {}", intersection, only_a).trim().to_string();
    let combined_b = format!("{} {}", intersection, only_b).trim().to_string();

    ratio(&intersection, &combined_a)
        .max(ratio(&intersection, &combined_b))
        .max(ratio(&combined_a, &combined_b))
}

fn join<'a>(tokens: impl Iterator<Item = &'a &'a str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

/// Best ratio of the shorter string against equal-length windows of the longer
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    if shorter.is_empty() {
        return 0;
    }

    let mut best = 0;
    for window in longer.windows(shorter.len()) {
        best = best.max(char_ratio(&shorter, window));
        if best == 100 {
            break;
        }
    }
    best
}

/// Combined score used for ranking
///
/// The best of the plain, token-sorted and token-set ratios, plus a scaled
/// partial ratio when one string is much longer than the other. Identical
/// inputs score 100; an empty input scores 0.
pub fn similarity(query: &str, candidate: &str) -> u8 {
    if query.is_empty() || candidate.is_empty() {
        return 0;
    }
    if query == candidate {
        return 100;
    }

    let mut best = ratio(query, candidate)
        .max(token_sort_ratio(query, candidate))
        .max(token_set_ratio(query, candidate));

    let (len_q, len_c) = (query.chars().count(), candidate.chars().count());
    let length_ratio = len_q.max(len_c) as f64 / len_q.min(len_c) as f64;
    if length_ratio >= PARTIAL_LENGTH_RATIO {
        let partial = partial_ratio(query, candidate) as f64 * PARTIAL_SCALE;
        best = best.max(partial.round() as u8);
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_bounds() {
        assert_eq!(ratio("kajal", "kajal"), 100);
        assert_eq!(ratio("abc", "xyz"), 0);
        assert_eq!(ratio("", "kajal"), 0);
        assert_eq!(ratio("", ""), 0);
    }

    #[test]
    fn test_ratio_typo() {
        // LCS of 10 over 21 characters
        assert_eq!(ratio("condtioner", "conditioner"), 95);
    }

    #[test]
    fn test_token_sort_ignores_order() {
        assert_eq!(token_sort_ratio("conditioner hair", "hair conditioner"), 100);
        assert!(ratio("conditioner hair", "hair conditioner") < 100);
    }

    #[test]
    fn test_token_set_subset_scores_full() {
        assert_eq!(token_set_ratio("conditioner", "hair conditioner"), 100);
        assert_eq!(token_set_ratio("hair conditioner 200ml", "conditioner"), 100);
        assert!(token_set_ratio("conditioner", "body lotion") < 70);
    }

    #[test]
    fn test_partial_ratio() {
        assert_eq!(partial_ratio("kajal", "eyeconic kajal black"), 100);
        assert_eq!(partial_ratio("", "kajal"), 0);
    }

    #[test]
    fn test_similarity_scenarios() {
        assert_eq!(similarity("conditioner", "hair conditioner"), 100);

        let typo = similarity("condtioner", "hair conditioner");
        assert!((70..100).contains(&typo), "typo scored {}", typo);

        assert!(similarity("conditioner", "body lotion") < 70);
        assert!(similarity("condtioner", "body lotion") < 70);
    }

    #[test]
    fn test_similarity_exact_and_empty() {
        assert_eq!(similarity("body lotion", "body lotion"), 100);
        assert_eq!(similarity("", "body lotion"), 0);
        assert_eq!(similarity("body lotion", ""), 0);
    }

    #[test]
    fn test_similarity_symmetric_for_reordering() {
        assert_eq!(
            similarity("matte lipstick red", "red matte lipstick"),
            100
        );
    }
}
