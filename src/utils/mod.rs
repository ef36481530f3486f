//! Utility functions and helpers

pub mod formats;

/// Computes an exclusive prefix sum (scan) for a vector
pub fn exclusive_scan(input: &[usize]) -> Vec<usize> {
    let mut result = Vec::with_capacity(input.len() + 1);
    let mut sum = 0;

    result.push(0); // First element is always 0

    for &val in input {
        sum += val;
        result.push(sum);
    }

    result
}

/// First position at or after `from` whose value is not below `target`
///
/// `sorted` must be ascending. The search doubles its step from `from`
/// until it overshoots, then binary-searches the last step, so the cost is
/// logarithmic in the distance skipped rather than in the slice length.
pub fn gallop_lower_bound(sorted: &[usize], from: usize, target: usize) -> usize {
    let n = sorted.len();
    if from >= n || sorted[from] >= target {
        return from;
    }

    // sorted[lo] < target holds throughout
    let mut lo = from;
    let mut step = 1;
    let mut hi = lo + 1;
    while hi < n && sorted[hi] < target {
        lo = hi;
        step *= 2;
        hi = lo + step;
    }
    let hi = hi.min(n);

    lo + 1 + sorted[lo + 1..hi].partition_point(|&v| v < target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusive_scan() {
        let input = vec![1, 2, 3, 4];
        let expected = vec![0, 1, 3, 6, 10];
        assert_eq!(exclusive_scan(&input), expected);

        let input = vec![0, 0, 5, 0];
        let expected = vec![0, 0, 0, 5, 5];
        assert_eq!(exclusive_scan(&input), expected);
    }

    #[test]
    fn test_gallop_matches_partition_point() {
        let sorted: Vec<usize> = (0..200).map(|i| i * 3 + (i % 2)).collect();
        for from in [0, 1, 17, 150, 199, 200] {
            for target in [0, 1, 2, 50, 301, 450, 597, 598, 1000] {
                let expected = from + sorted[from.min(sorted.len())..].partition_point(|&v| v < target);
                assert_eq!(
                    gallop_lower_bound(&sorted, from, target),
                    expected,
                    "from={from} target={target}"
                );
            }
        }
    }

    #[test]
    fn test_gallop_edges() {
        assert_eq!(gallop_lower_bound(&[], 0, 5), 0);
        assert_eq!(gallop_lower_bound(&[1, 2, 3], 0, 9), 3);
        assert_eq!(gallop_lower_bound(&[4, 4, 4, 9], 1, 4), 1);
        assert_eq!(gallop_lower_bound(&[1, 4, 4, 9], 0, 4), 1);
    }
}
