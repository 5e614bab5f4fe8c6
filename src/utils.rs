//! Utility functions for the qfit crate

use rand::{Rng, distr::StandardUniform, prelude::IndexedRandom};

/// Performs weighted random sampling from a collection of items.
///
/// The standard threshold-walk algorithm: draw a threshold in `[0, total)`,
/// then walk the items subtracting weights until the threshold crosses zero.
///
/// # Behavior
///
/// - If all weights are zero or negative, falls back to uniform selection
/// - The last item is returned if the threshold never crosses zero
///   (floating-point accumulation)
///
/// # Examples
///
/// ```
/// use rand::{SeedableRng, rngs::StdRng};
/// use qfit::utils::weighted_sample;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let items = vec![("a", 1.0), ("b", 2.0), ("c", 1.0)];
/// assert!(weighted_sample(&mut rng, &items).is_some());
/// ```
pub fn weighted_sample<R, T>(rng: &mut R, items: &[(T, f64)]) -> Option<T>
where
    R: Rng,
    T: Clone,
{
    if items.is_empty() {
        return None;
    }

    let total: f64 = items.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return items.choose(rng).map(|(item, _)| item.clone());
    }

    let mut threshold = rng.sample::<f64, _>(StandardUniform) * total;
    for (item, weight) in items {
        if threshold < *weight {
            return Some(item.clone());
        }
        threshold -= weight;
    }

    items.last().map(|(item, _)| item.clone())
}
