use strsim::levenshtein;

/// Normalized Levenshtein similarity between two matching keys:
/// `1 - distance / max(len)`, on character counts. Symmetric, 1.0 for
/// identical strings, 0.0 shares nothing.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

/// Fuzzy matcher over normalized supplier keys. Given a candidate and the
/// keys already in the store, picks the single key whose similarity
/// clears the threshold, preferring lowest edit distance and breaking
/// ties toward the earliest-inserted key so runs are order-stable.
#[derive(Debug, Clone)]
pub struct SimilarityMatcher {
    threshold: f64,
}

impl SimilarityMatcher {
    pub fn new(threshold: f64) -> Self {
        SimilarityMatcher { threshold }
    }

    /// Scan `candidates` (insertion position, key) and return the position
    /// of the best acceptable key, or `None` when nothing clears the
    /// threshold. Exact hits are expected to be resolved by the caller's
    /// key index before this runs.
    pub fn best_match<'a, I>(&self, candidate: &str, candidates: I) -> Option<usize>
    where
        I: IntoIterator<Item = (usize, &'a str)>,
    {
        let candidate_len = candidate.chars().count();
        let mut best: Option<(usize, usize)> = None; // (distance, position)

        for (position, key) in candidates {
            let max_len = candidate_len.max(key.chars().count());
            if max_len == 0 {
                continue;
            }
            let distance = levenshtein(candidate, key);
            let similarity = 1.0 - distance as f64 / max_len as f64;
            if similarity < self.threshold {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_distance, best_position)) => {
                    distance < best_distance
                        || (distance == best_distance && position < best_position)
                }
            };
            if better {
                best = Some((distance, position));
            }
        }

        best.map(|(_, position)| position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similarity_is_symmetric() {
        let pairs = [
            ("greensteel", "greenstel"),
            ("acme concrete", "acme cement"),
            ("roxul", "rockwool"),
        ];
        for (a, b) in pairs {
            assert_eq!(name_similarity(a, b), name_similarity(b, a));
        }
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(name_similarity("vulcan materials", "vulcan materials"), 1.0);
        assert_eq!(name_similarity("", ""), 1.0);
        assert_eq!(name_similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_similarity_value() {
        // One deletion against ten characters.
        let sim = name_similarity("greensteel", "greenstel");
        assert!((sim - 0.9).abs() < 1e-9);

        // Three substitutions against ten characters.
        let sim = name_similarity("insulation", "insulators");
        assert!((sim - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_best_match_requires_threshold() {
        let matcher = SimilarityMatcher::new(0.85);
        let keys = [(0, "insulation")];
        // 0.70 similarity stays below the default threshold.
        assert_eq!(matcher.best_match("insulators", keys.iter().copied()), None);
        assert_eq!(
            matcher.best_match("insulation supply", [(0, "granite works")]),
            None
        );
    }

    #[test]
    fn test_best_match_prefers_lowest_distance() {
        let matcher = SimilarityMatcher::new(0.85);
        let keys = vec![(0, "precision concrete"), (1, "precision concretes")];
        // Exact distance zero beats distance one regardless of order.
        assert_eq!(
            matcher.best_match("precision concretes", keys.clone()),
            Some(1)
        );
        assert_eq!(matcher.best_match("precision concrete", keys), Some(0));
    }

    #[test]
    fn test_best_match_tie_breaks_to_earliest() {
        let matcher = SimilarityMatcher::new(0.85);
        // Both keys sit at distance one from the candidate.
        let keys = vec![(3, "precision concretes"), (7, "precision concreted")];
        assert_eq!(matcher.best_match("precision concrete", keys), Some(3));

        // Same keys offered in the opposite order still pick position 3.
        let keys = vec![(7, "precision concreted"), (3, "precision concretes")];
        assert_eq!(matcher.best_match("precision concrete", keys), Some(3));
    }
}
