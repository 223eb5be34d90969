//! Deterministic down-sampling for chart payloads.

use rand::prelude::*;

/// Pick at most `cap` indices out of `len`, uniformly without replacement.
///
/// Indices come back in ascending order so sampled series keep their
/// original relative ordering.
pub(crate) fn sample_indices(len: usize, cap: usize, rng: &mut StdRng) -> Vec<usize> {
    if len <= cap {
        return (0..len).collect();
    }

    let all: Vec<usize> = (0..len).collect();
    let mut chosen: Vec<usize> = all.choose_multiple(rng, cap).copied().collect();
    chosen.sort_unstable();
    chosen
}

/// Down-sample a value slice to at most `cap` points.
pub(crate) fn sample_values(values: &[f64], cap: usize, rng: &mut StdRng) -> Vec<f64> {
    sample_indices(values.len(), cap, rng)
        .into_iter()
        .map(|i| values[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_input_passes_through() {
        let mut rng = StdRng::seed_from_u64(42);
        let values = [1.0, 2.0, 3.0];
        assert_eq!(sample_values(&values, 10, &mut rng), values.to_vec());
    }

    #[test]
    fn test_large_input_is_capped() {
        let mut rng = StdRng::seed_from_u64(42);
        let values: Vec<f64> = (0..10_000).map(|i| i as f64).collect();
        let sampled = sample_values(&values, 1000, &mut rng);
        assert_eq!(sampled.len(), 1000);
    }

    #[test]
    fn test_sampling_is_without_replacement() {
        let mut rng = StdRng::seed_from_u64(7);
        let indices = sample_indices(5000, 800, &mut rng);
        let mut deduped = indices.clone();
        deduped.dedup();
        assert_eq!(indices.len(), deduped.len());
        assert!(indices.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_sampling_is_deterministic_for_fixed_seed() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let values: Vec<f64> = (0..5000).map(|i| i as f64).collect();
        assert_eq!(
            sample_values(&values, 100, &mut a),
            sample_values(&values, 100, &mut b)
        );
    }
}
