//! Connected components of a compressed symmetric graph.
//!
//! Nothing here knows about trees or constraints: any sparse symmetric
//! adjacency over `n` vertices can be labelled.

use skerry_core::{index_slot, NONE};

/// Borrowed compressed-row adjacency.
///
/// Neighbour lists need not be sorted or unique. Symmetry is the caller's
/// responsibility: every `u -> v` entry must have a matching `v -> u`.
#[derive(Clone, Copy, Debug)]
pub struct CsrGraph<'a> {
    rownnz: &'a [i32],
    rowadr: &'a [i32],
    colind: &'a [i32],
}

impl<'a> CsrGraph<'a> {
    /// Wrap row counts, row addresses and flattened neighbour lists.
    pub fn new(rownnz: &'a [i32], rowadr: &'a [i32], colind: &'a [i32]) -> Self {
        debug_assert_eq!(rownnz.len(), rowadr.len());
        Self {
            rownnz,
            rowadr,
            colind,
        }
    }

    /// Number of vertices.
    pub fn nvertex(&self) -> usize {
        self.rownnz.len()
    }

    /// Total neighbour entries.
    pub fn nnz(&self) -> usize {
        self.rownnz.iter().map(|&n| n as usize).sum()
    }

    /// Neighbour entries of `v`.
    pub fn degree(&self, v: usize) -> usize {
        self.rownnz[v] as usize
    }

    /// Neighbours of `v`, as stored.
    pub fn neighbors(&self, v: usize) -> &'a [i32] {
        let adr = self.rowadr[v] as usize;
        &self.colind[adr..adr + self.degree(v)]
    }
}

/// Label the connected components of `graph`.
///
/// Writes each vertex's component to `island` and returns the number of
/// components. Components are numbered in order of their lowest vertex.
/// Vertices without entries are left at [`NONE`]. `stack` needs at least
/// [`CsrGraph::nnz`] slots.
///
/// # Panics
///
/// Panics if `island` is shorter than the vertex count or `stack` is too
/// small.
pub fn flood_fill(graph: &CsrGraph<'_>, island: &mut [i32], stack: &mut [i32]) -> usize {
    island.fill(NONE);
    let mut nisland = 0;

    for start in 0..graph.nvertex() {
        if island[start] != NONE || graph.degree(start) == 0 {
            continue;
        }

        stack[0] = index_slot(start);
        let mut nstack = 1;
        while nstack > 0 {
            nstack -= 1;
            let v = stack[nstack] as usize;
            if island[v] != NONE {
                continue;
            }
            island[v] = index_slot(nisland);

            let neighbors = graph.neighbors(v);
            stack[nstack..nstack + neighbors.len()].copy_from_slice(neighbors);
            nstack += neighbors.len();
        }

        nisland += 1;
    }

    nisland
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flatten per-vertex neighbour lists.
    fn csr(lists: &[Vec<i32>]) -> (Vec<i32>, Vec<i32>, Vec<i32>) {
        let rownnz: Vec<i32> = lists.iter().map(|l| l.len() as i32).collect();
        let mut rowadr = Vec::with_capacity(lists.len());
        let mut adr = 0;
        for n in &rownnz {
            rowadr.push(adr);
            adr += n;
        }
        let colind = lists.concat();
        (rownnz, rowadr, colind)
    }

    fn label(lists: &[Vec<i32>]) -> (Vec<i32>, usize) {
        let (rownnz, rowadr, colind) = csr(lists);
        let graph = CsrGraph::new(&rownnz, &rowadr, &colind);
        let mut island = vec![0; graph.nvertex()];
        let mut stack = vec![0; graph.nnz()];
        let n = flood_fill(&graph, &mut island, &mut stack);
        (island, n)
    }

    #[test]
    fn two_components_and_an_isolated_vertex() {
        // 0-2, 3-3, 1 isolated, 4-0
        let lists = vec![vec![2, 4], vec![], vec![0], vec![3], vec![0]];
        let (island, n) = label(&lists);
        assert_eq!(n, 2);
        assert_eq!(island, vec![0, NONE, 0, 1, 0]);
    }

    #[test]
    fn numbering_follows_lowest_vertex() {
        let lists = vec![vec![1], vec![0], vec![3], vec![2]];
        let (island, n) = label(&lists);
        assert_eq!(n, 2);
        assert_eq!(island, vec![0, 0, 1, 1]);
    }

    #[test]
    fn duplicate_neighbours_are_harmless() {
        let lists = vec![vec![1, 1, 1, 0], vec![0, 0, 0, 2], vec![1]];
        let (island, n) = label(&lists);
        assert_eq!(n, 1);
        assert_eq!(island, vec![0, 0, 0]);
    }

    #[test]
    fn no_vertices() {
        assert_eq!(label(&[]), (vec![], 0));
    }

    #[test]
    fn stale_labels_are_overwritten() {
        let (rownnz, rowadr, colind) = csr(&[vec![], vec![1]]);
        let graph = CsrGraph::new(&rownnz, &rowadr, &colind);
        let mut island = vec![5, 5];
        let mut stack = vec![0; 1];
        assert_eq!(flood_fill(&graph, &mut island, &mut stack), 1);
        assert_eq!(island, vec![NONE, 0]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;
        use skerry_test_utils::{reference_components, same_partition};

        fn graph_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
            (1usize..40).prop_flat_map(|n| {
                let edges = proptest::collection::vec((0..n, 0..n), 0..80);
                (Just(n), edges)
            })
        }

        fn symmetric_lists(n: usize, edges: &[(usize, usize)]) -> Vec<Vec<i32>> {
            let mut lists = vec![Vec::new(); n];
            for &(u, v) in edges {
                lists[u].push(v as i32);
                if u != v {
                    lists[v].push(u as i32);
                }
            }
            lists
        }

        proptest! {
            #[test]
            fn matches_union_find((n, edges) in graph_strategy()) {
                let (island, count) = label(&symmetric_lists(n, &edges));
                let expected = reference_components(n, &edges);

                let labels: Vec<Option<usize>> =
                    island.iter().map(|&s| usize::try_from(s).ok()).collect();
                prop_assert!(same_partition(&labels, &expected));
                prop_assert_eq!(count, expected.iter().flatten().max().map_or(0, |m| m + 1));
                for (v, slot) in island.iter().enumerate() {
                    let touched = edges.iter().any(|&(a, b)| a == v || b == v);
                    prop_assert_eq!(*slot != NONE, touched);
                    if *slot != NONE {
                        prop_assert!((*slot as usize) < count);
                    }
                }
            }

            #[test]
            fn neighbour_order_does_not_change_labels(
                (n, edges) in graph_strategy(),
                seed in any::<u64>(),
            ) {
                let lists = symmetric_lists(n, &edges);
                let mut shuffled = lists.clone();
                for (i, list) in shuffled.iter_mut().enumerate() {
                    if !list.is_empty() {
                        let k = (seed as usize).wrapping_add(i) % list.len();
                        list.rotate_left(k);
                        list.reverse();
                    }
                }
                prop_assert_eq!(label(&lists), label(&shuffled));
            }
        }
    }
}
