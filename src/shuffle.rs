/// Seeded Fisher-Yates shuffle, a pure function of `(items, seed)`.
///
/// The same content directory is re-evaluated on every metadata
/// recomputation (live preview included), so the permutation must be stable
/// across processes and over time with no wall-clock or entropy input. The
/// hash/LCG constants are fixed to keep orderings byte-compatible with
/// previously rendered compositions.
pub fn seeded_shuffle<T: Clone>(items: &[T], seed: &str) -> Vec<T> {
    let mut out = items.to_vec();
    let mut state = fold_seed(seed);

    for i in (1..out.len()).rev() {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let j = ((state as i32).unsigned_abs() as usize) % (i + 1);
        out.swap(i, j);
    }

    out
}

/// Polynomial string fold (`h = h*31 + char`) wrapped to 32 bits.
fn fold_seed(seed: &str) -> u32 {
    seed.chars()
        .fold(0u32, |h, c| h.wrapping_mul(31).wrapping_add(c as u32))
}
