use std::collections::BTreeSet;

use crate::personality::PersonalityVector;

/// Cosine similarity mapped from [-1, 1] to [0, 1].
/// Returns 0.0 when either vector is all-zero.
pub fn vector_similarity(a: &PersonalityVector, b: &PersonalityVector) -> f64 {
    if a.is_zero() || b.is_zero() {
        return 0.0;
    }
    let (a, b) = (a.scores(), b.scores());

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for i in 0..a.len() {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    let cosine = (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0);
    (cosine + 1.0) / 2.0
}

/// Trims and lowercases terms, dropping blanks.
pub fn normalize_terms<'a, I>(terms: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    terms
        .into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// |A ∩ B| / |A ∪ B|, or 0.0 when either set is empty.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(scores: [f64; 6]) -> PersonalityVector {
        PersonalityVector::from_scores(scores).unwrap()
    }

    #[test]
    fn test_identical_vectors_score_one() {
        let v = vector([100.0, 80.0, 20.0, 40.0, 60.0, 20.0]);
        assert!((vector_similarity(&v, &v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_scaled_vectors_score_one() {
        let a = vector([50.0, 40.0, 10.0, 20.0, 30.0, 10.0]);
        let b = vector([100.0, 80.0, 20.0, 40.0, 60.0, 20.0]);
        assert!((vector_similarity(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_orthogonal_vectors_score_half() {
        let a = vector([100.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let b = vector([0.0, 100.0, 0.0, 0.0, 0.0, 0.0]);
        assert!((vector_similarity(&a, &b) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_vector_similarity_is_zero_not_nan() {
        let zero = PersonalityVector::zero();
        let v = vector([10.0; 6]);
        assert_eq!(vector_similarity(&zero, &v), 0.0);
        assert_eq!(vector_similarity(&v, &zero), 0.0);
        assert_eq!(vector_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let a = vector([90.0, 10.0, 30.0, 70.0, 20.0, 50.0]);
        let b = vector([20.0, 60.0, 80.0, 10.0, 40.0, 30.0]);
        assert_eq!(vector_similarity(&a, &b), vector_similarity(&b, &a));
    }

    #[test]
    fn test_jaccard_normalizes_case_and_whitespace() {
        let a = normalize_terms(["  Python ", "SQL", ""]);
        let b = normalize_terms(["python", "sql", "Statistics"]);
        assert!((jaccard(&a, &b) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_jaccard_empty_set_is_zero() {
        let a = normalize_terms(["python"]);
        assert_eq!(jaccard(&a, &BTreeSet::new()), 0.0);
        assert_eq!(jaccard(&BTreeSet::new(), &BTreeSet::new()), 0.0);
    }
}
