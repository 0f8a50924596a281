//! Tie-breaks and aggregates over several same-role inputs.

use fastrand::Rng;

/// Uniform pick among `items`. `None` when empty.
pub fn pick<'a, T>(rng: &mut Rng, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.usize(..items.len()))
}

/// Arithmetic mean. `None` when empty.
#[must_use]
pub fn mean<I>(values: I) -> Option<f32>
where
    I: IntoIterator<Item = f32>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0_f32, 0_usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_empty() {
        let mut rng = Rng::with_seed(1);
        let empty: [u8; 0] = [];
        assert!(pick(&mut rng, &empty).is_none());
    }

    #[test]
    fn test_pick_is_reproducible() {
        let values = [10, 20, 30, 40, 50];
        let a: Vec<i32> = {
            let mut rng = Rng::with_seed(42);
            (0..8).filter_map(|_| pick(&mut rng, &values).copied()).collect()
        };
        let b: Vec<i32> = {
            let mut rng = Rng::with_seed(42);
            (0..8).filter_map(|_| pick(&mut rng, &values).copied()).collect()
        };
        assert_eq!(a, b);
        assert!(a.iter().all(|v| values.contains(v)));
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean([2.0, 4.0, 9.0]), Some(5.0));
        assert_eq!(mean(Vec::<f32>::new()), None);
    }
}
