/// All k-element subsets of `values`, in lexicographic order of positions.
///
/// Each subset keeps the input's order, so a sorted input yields ascending
/// subsets. Recursion depth is bounded by `k`.
pub fn combinations<T: Copy>(values: &[T], k: usize) -> Vec<Vec<T>> {
    let n = values.len();
    if k == 0 {
        return vec![Vec::new()];
    }
    if k > n {
        return Vec::new();
    }
    if k == 1 {
        return values.iter().map(|&v| vec![v]).collect();
    }
    if k == n {
        return vec![values.to_vec()];
    }

    let mut result = Vec::with_capacity(binomial(n, k));
    for i in 0..=(n - k) {
        let head = values[i];
        for tail in combinations(&values[i + 1..], k - 1) {
            let mut subset = Vec::with_capacity(k);
            subset.push(head);
            subset.extend(tail);
            result.push(subset);
        }
    }
    result
}

/// C(n, k), zero when k > n.
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1usize, |acc, i| acc * (n - i) / (i + 1))
}
