//! Reference connected components and partition comparison.

use indexmap::IndexMap;
use skerry_core::{EfcRows, Model};

/// Disjoint-set forest with path halving.
pub struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    pub fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra.max(rb)] = ra.min(rb);
        }
    }
}

/// Components of the undirected graph on `n` vertices with `edges`.
///
/// Vertices on no edge are `None`. Components are numbered by their
/// lowest vertex.
pub fn reference_components(n: usize, edges: &[(usize, usize)]) -> Vec<Option<usize>> {
    let mut uf = UnionFind::new(n);
    let mut touched = vec![false; n];
    for &(a, b) in edges {
        uf.union(a, b);
        touched[a] = true;
        touched[b] = true;
    }

    let mut labels: IndexMap<usize, usize> = IndexMap::new();
    (0..n)
        .map(|v| {
            if !touched[v] {
                return None;
            }
            let root = uf.find(v);
            let next = labels.len();
            Some(*labels.entry(root).or_insert(next))
        })
        .collect()
}

/// Tree couplings implied by the Jacobian: every row links all the trees
/// it touches. A row on one tree yields a self-edge.
pub fn row_couplings(model: &Model, efc: &EfcRows) -> Vec<(usize, usize)> {
    let mut edges = Vec::new();
    for row in 0..efc.nefc() {
        let mut trees: Vec<usize> = efc
            .jacobian()
            .row_dofs(row)
            .map(|dof| model.dof_treeid[dof])
            .collect();
        trees.sort_unstable();
        trees.dedup();
        if let Some(&first) = trees.first() {
            edges.extend(trees.iter().map(|&t| (first, t)));
        }
    }
    edges
}

/// Members of each labelled class, classes ordered by first member.
pub fn partition(labels: &[Option<usize>]) -> Vec<Vec<usize>> {
    let mut classes: IndexMap<usize, Vec<usize>> = IndexMap::new();
    for (element, label) in labels.iter().enumerate() {
        if let Some(label) = label {
            classes.entry(*label).or_default().push(element);
        }
    }
    classes.into_values().collect()
}

/// Whether two labellings describe the same partition, ignoring label
/// values, with the same unlabelled elements.
pub fn same_partition(a: &[Option<usize>], b: &[Option<usize>]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| x.is_some() == y.is_some())
        && partition(a) == partition(b)
}
