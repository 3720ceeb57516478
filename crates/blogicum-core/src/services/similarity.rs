//! Ratcliff/Obershelp string similarity.
//!
//! The ratio is `2 * M / T`, where `T` is the total number of characters in
//! both strings and `M` the number of characters in matching blocks. Blocks
//! are found by taking the longest common substring and recursing on the
//! pieces left and right of it.

use std::collections::HashMap;

/// Strings at least this long drop over-represented characters from the
/// match index.
const POPULAR_THRESHOLD_LEN: usize = 200;

/// Similarity of `a` and `b` in `[0, 1]`; `1.0` means identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = Matcher::new(&a, &b).matching_characters();
    2.0 * matched as f64 / total as f64
}

/// The candidate scoring highest against `word`, if any reaches `cutoff`.
///
/// On equal scores the candidate that sorts last wins, which keeps the
/// result independent of iteration order.
pub fn best_match<'a, I>(word: &str, candidates: I, cutoff: f64) -> Option<(&'a str, f64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, f64)> = None;
    for candidate in candidates {
        let score = ratio(candidate, word);
        if score < cutoff {
            continue;
        }
        best = match best {
            Some((current, current_score))
                if current_score > score || (current_score == score && current > candidate) =>
            {
                Some((current, current_score))
            }
            _ => Some((candidate, score)),
        };
    }
    best
}

struct Matcher<'s> {
    a: &'s [char],
    b: &'s [char],
    /// Positions of each character of `b`, ascending.
    b_index: HashMap<char, Vec<usize>>,
}

impl<'s> Matcher<'s> {
    fn new(a: &'s [char], b: &'s [char]) -> Self {
        let mut b_index: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            b_index.entry(*c).or_default().push(j);
        }

        if b.len() >= POPULAR_THRESHOLD_LEN {
            let limit = b.len() / 100 + 1;
            b_index.retain(|_, positions| positions.len() <= limit);
        }

        Self { a, b, b_index }
    }

    /// Longest common block within `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Ties go to the block starting earliest in `a`, then earliest in `b`.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
        let mut run_lengths: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next_lengths = HashMap::new();
            if let Some(positions) = self.b_index.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| run_lengths.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_lengths.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            run_lengths = next_lengths;
        }

        // Characters left out of the index can still extend a block.
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }

    fn matching_characters(&self) -> usize {
        let mut total = 0;
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, size) = self.longest_match(alo, ahi, blo, bhi);
            if size == 0 {
                continue;
            }
            total += size;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + size < ahi && j + size < bhi {
                pending.push((i + size, ahi, j + size, bhi));
            }
        }

        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    #[test]
    fn test_identical_strings() {
        assert!(approx(ratio("spam", "spam"), 1.0));
        assert!(approx(ratio("", ""), 1.0));
    }

    #[test]
    fn test_disjoint_strings() {
        assert!(approx(ratio("hello", "spam"), 0.0));
        assert!(approx(ratio("", "spam"), 0.0));
    }

    #[test]
    fn test_known_ratios() {
        assert!(approx(ratio("spamx", "spam"), 8.0 / 9.0));
        assert!(approx(ratio("bane", "ban"), 6.0 / 7.0));
        assert!(approx(ratio("abcd", "bcde"), 0.75));
        assert!(approx(ratio("abxcd", "abcd"), 8.0 / 9.0));
    }

    #[test]
    fn test_ratio_counts_non_adjacent_blocks() {
        // Blocks "q", "u", "ck" -> 4 matched characters.
        assert!(approx(ratio("quick", "qxuxck"), 8.0 / 11.0));
    }

    #[test]
    fn test_ratio_handles_multibyte_characters() {
        assert!(approx(ratio("бан", "баня"), 6.0 / 7.0));
    }

    #[test]
    fn test_long_word_drops_popular_characters() {
        // 210 characters: both 'a' and 'b' exceed 210 / 100 + 1 occurrences,
        // so blocks only grow by extension from the range start.
        let long = "a".repeat(150) + &"b".repeat(60);

        assert!(approx(ratio(&"a".repeat(100), &long), 20.0 / 31.0));
        // Without the rule "ab" would line up at the a/b seam (4 / 212).
        assert!(approx(ratio("ab", &long), 2.0 / 212.0));
    }

    #[test]
    fn test_short_word_keeps_every_character() {
        let short = "a".repeat(150) + &"b".repeat(40);
        assert!(approx(ratio("ab", &short), 4.0 / 192.0));
    }

    #[test]
    fn test_best_match_respects_cutoff() {
        let tokens = ["hello", "world"];
        assert_eq!(best_match("spam", tokens, 0.6), None);
    }

    #[test]
    fn test_best_match_picks_highest_score() {
        let tokens = ["spa", "spamx", "spam"];
        let (token, score) = best_match("spam", tokens, 0.6).unwrap();
        assert_eq!(token, "spam");
        assert!(approx(score, 1.0));
    }
}
