/// Scores how alike two case-folded descriptions are, in `[0.0, 1.0]`.
pub trait DescriptionSimilarity {
    fn similarity(&self, left: &str, right: &str) -> f64;
}

/// Jaro–Winkler with the usual 0.1 prefix scale over at most four leading characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct JaroWinkler;

const PREFIX_SCALE: f64 = 0.1;
const MAX_PREFIX: usize = 4;

impl DescriptionSimilarity for JaroWinkler {
    fn similarity(&self, left: &str, right: &str) -> f64 {
        jaro_winkler(left, right)
    }
}

pub fn jaro_winkler(left: &str, right: &str) -> f64 {
    let left_chars = left.chars().collect::<Vec<char>>();
    let right_chars = right.chars().collect::<Vec<char>>();
    let jaro_score = jaro(&left_chars, &right_chars);

    let prefix = left_chars
        .iter()
        .zip(right_chars.iter())
        .take(MAX_PREFIX)
        .take_while(|(a, b)| a == b)
        .count();

    jaro_score + (prefix as f64) * PREFIX_SCALE * (1.0 - jaro_score)
}

fn jaro(left: &[char], right: &[char]) -> f64 {
    if left.is_empty() && right.is_empty() {
        return 1.0;
    }
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let window = (left.len().max(right.len()) / 2).saturating_sub(1);
    let mut left_matched = vec![false; left.len()];
    let mut right_matched = vec![false; right.len()];
    let mut matches = 0usize;

    for (index, character) in left.iter().enumerate() {
        let start = index.saturating_sub(window);
        let end = (index + window + 1).min(right.len());
        for candidate in start..end {
            if !right_matched[candidate] && right[candidate] == *character {
                left_matched[index] = true;
                right_matched[candidate] = true;
                matches += 1;
                break;
            }
        }
    }

    if matches == 0 {
        return 0.0;
    }

    let left_sequence = left
        .iter()
        .zip(left_matched.iter())
        .filter(|(_, matched)| **matched)
        .map(|(character, _)| character);
    let right_sequence = right
        .iter()
        .zip(right_matched.iter())
        .filter(|(_, matched)| **matched)
        .map(|(character, _)| character);
    let half_transpositions = left_sequence
        .zip(right_sequence)
        .filter(|(a, b)| a != b)
        .count() as f64
        / 2.0;

    let m = matches as f64;
    (m / left.len() as f64 + m / right.len() as f64 + (m - half_transpositions) / m) / 3.0
}

#[cfg(test)]
mod tests {
    use super::{DescriptionSimilarity, JaroWinkler, jaro_winkler};

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-3
    }

    #[test]
    fn identical_strings_score_one() {
        assert!(close(jaro_winkler("NETFLIX", "NETFLIX"), 1.0));
        assert!(close(jaro_winkler("", ""), 1.0));
    }

    #[test]
    fn disjoint_or_empty_strings_score_zero() {
        assert!(close(jaro_winkler("ABC", "XYZ"), 0.0));
        assert!(close(jaro_winkler("ABC", ""), 0.0));
    }

    #[test]
    fn reference_pairs_match_published_values() {
        assert!(close(jaro_winkler("MARTHA", "MARHTA"), 0.961));
        assert!(close(jaro_winkler("DWAYNE", "DUANE"), 0.84));
        assert!(close(jaro_winkler("DIXON", "DICKSONX"), 0.813));
    }

    #[test]
    fn store_number_variants_clear_the_merge_threshold() {
        let score = JaroWinkler.similarity("SPOTIFY USA 1234", "SPOTIFY USA 5678");
        assert!(score > 0.7);
        let unrelated = JaroWinkler.similarity("SPOTIFY USA", "CITY WATER DEPT");
        assert!(unrelated <= 0.7);
    }
}
