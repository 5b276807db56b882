//! Compressed adjacency from a directed edge list.

/// Build row addresses and neighbour lists from `(from, to)` slot pairs.
///
/// On entry `rownnz` holds the number of entries leaving each vertex. On
/// return it holds the same counts, `rowadr` their prefix sums and
/// `colind` every `to` grouped by `from`, in edge order. `colind` must hold
/// exactly one slot per pair.
pub fn build_adjacency(
    edges: &[i32],
    rownnz: &mut [i32],
    rowadr: &mut [i32],
    colind: &mut [i32],
) {
    debug_assert_eq!(rownnz.len(), rowadr.len());
    debug_assert_eq!(edges.len(), 2 * colind.len());

    let mut adr = 0;
    for (count, start) in rownnz.iter_mut().zip(rowadr.iter_mut()) {
        *start = adr;
        adr += *count;
        *count = 0;
    }

    for pair in edges.chunks_exact(2) {
        let (from, to) = (pair[0] as usize, pair[1]);
        colind[(rowadr[from] + rownnz[from]) as usize] = to;
        rownnz[from] += 1;
    }
}
