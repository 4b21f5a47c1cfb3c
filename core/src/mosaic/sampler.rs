/// Evenly spaced interior slice positions along each axis
///
/// For every axis, `slice_count + 2` evenly spaced points are laid over the
/// closed interval `[0, axis_len]`, truncated to integers, and the two end
/// points are dropped. With `axis_len >= slice_count + 2` every index lies in
/// `[1, axis_len - 1]`; smaller axes may yield duplicates and are not
/// rejected.
///
/// # Example
///
/// ```
/// use volqc_core::sample_indices;
///
/// let indices = sample_indices([10, 20, 30], 1);
/// assert_eq!(indices, [vec![5], vec![10], vec![15]]);
/// ```
pub fn sample_indices(shape: [usize; 3], slice_count: usize) -> [Vec<usize>; 3] {
    shape.map(|axis_len| axis_indices(axis_len, slice_count))
}

fn axis_indices(axis_len: usize, slice_count: usize) -> Vec<usize> {
    let step = axis_len as f64 / (slice_count + 1) as f64;
    (1..=slice_count)
        .map(|i| (i as f64 * step).floor() as usize)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_single_slice_is_midpoint() {
        assert_eq!(sample_indices([10, 20, 30], 1), [vec![5], vec![10], vec![15]]);
    }

    #[rstest]
    #[case(10, 2, vec![3, 6])]
    #[case(30, 2, vec![10, 20])]
    #[case(256, 3, vec![64, 128, 192])]
    #[case(7, 4, vec![1, 2, 4, 5])]
    #[case(11, 1, vec![5])]
    fn test_axis_indices(#[case] len: usize, #[case] count: usize, #[case] expected: Vec<usize>) {
        assert_eq!(axis_indices(len, count), expected);
    }

    #[test]
    fn test_indices_are_interior() {
        for len in 3..64 {
            for count in 1..=(len - 2) {
                let indices = axis_indices(len, count);
                assert_eq!(indices.len(), count);
                assert!(indices.iter().all(|&i| i >= 1 && i < len), "len {len} count {count}");
                assert!(indices.windows(2).all(|w| w[0] <= w[1]));
            }
        }
    }

    #[test]
    fn test_small_axis_is_degenerate() {
        // Fewer voxels than requested slices: duplicates, including 0
        assert_eq!(axis_indices(2, 3), vec![0, 1, 1]);
    }

    #[test]
    fn test_zero_slices() {
        assert_eq!(sample_indices([4, 4, 4], 0), [vec![], vec![], vec![]]);
    }
}
