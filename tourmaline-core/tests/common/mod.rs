//! Reference structures shared by the integration suites.

/// Sequential union-find used as the connectivity oracle.
#[derive(Clone, Debug)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[node] != node {
            let parent = self.parent[node];
            self.parent[node] = root;
            node = parent;
        }
        root
    }

    pub fn union(&mut self, left: usize, right: usize) {
        let mut left = self.find(left);
        let mut right = self.find(right);
        if left == right {
            return;
        }
        if self.rank[left] < self.rank[right] {
            std::mem::swap(&mut left, &mut right);
        }
        self.parent[right] = left;
        if self.rank[left] == self.rank[right] {
            self.rank[left] = self.rank[left].saturating_add(1);
        }
    }
}

/// Oracle for a forest with the given edge set.
#[must_use]
pub fn oracle(num_vertices: usize, edges: &[(usize, usize)]) -> DisjointSet {
    let mut dsu = DisjointSet::new(num_vertices);
    for &(u, v) in edges {
        dsu.union(u, v);
    }
    dsu
}

/// Expected tree aggregate per vertex with default value 1 and addition:
/// `|V_t| + 2·|E_t|` for the tree containing each vertex.
#[must_use]
pub fn expected_aggregates(num_vertices: usize, edges: &[(usize, usize)]) -> Vec<i64> {
    let mut dsu = oracle(num_vertices, edges);
    let mut vertex_count = vec![0_i64; num_vertices];
    let mut edge_count = vec![0_i64; num_vertices];
    for v in 0..num_vertices {
        let root = dsu.find(v);
        vertex_count[root] += 1;
    }
    for &(u, _) in edges {
        let root = dsu.find(u);
        edge_count[root] += 1;
    }
    (0..num_vertices)
        .map(|v| {
            let root = dsu.find(v);
            vertex_count[root] + 2 * edge_count[root]
        })
        .collect()
}
