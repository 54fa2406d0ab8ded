/// Disjoint sets over the numbers `0..n` with path compression and union by rank. In addition to the
/// usual operations, every class remembers its least element, which is what the minimization uses as
/// the canonical representative of a class.
#[derive(Debug, Clone)]
pub(crate) struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
    least: Vec<usize>,
}

impl UnionFind {
    /// Creates `n` singleton classes.
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            least: (0..n).collect(),
        }
    }

    /// Returns the root of the class containing `x`, compressing the path on the way.
    pub(crate) fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = x;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// Merges the classes of `x` and `y`. Returns `false` if they were the same class already.
    pub(crate) fn union(&mut self, x: usize, y: usize) -> bool {
        let (rx, ry) = (self.find(x), self.find(y));
        if rx == ry {
            return false;
        }
        let least = self.least[rx].min(self.least[ry]);
        let root = match self.rank[rx].cmp(&self.rank[ry]) {
            std::cmp::Ordering::Less => {
                self.parent[rx] = ry;
                ry
            }
            std::cmp::Ordering::Greater => {
                self.parent[ry] = rx;
                rx
            }
            std::cmp::Ordering::Equal => {
                self.parent[ry] = rx;
                self.rank[rx] += 1;
                rx
            }
        };
        self.least[root] = least;
        true
    }

    /// Returns the least element of the class containing `x`.
    pub(crate) fn least(&mut self, x: usize) -> usize {
        let root = self.find(x);
        self.least[root]
    }
}
