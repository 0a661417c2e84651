//! # Graphs Backing Edge Variable Groups
//!
//! Minimal graph representations with vertices `1..=n` and sorted adjacency
//! lists. Edge variable groups take a snapshot of a graph when they are
//! created, later changes to the graph do not affect them.
//!
//! Graph construction, parsing and I/O live outside of this crate; these
//! types only carry what the variable groups need.

use crate::Error;

/// Inserts `x` into a sorted vector, returns `false` if it was present
fn sorted_insert(vec: &mut Vec<usize>, x: usize) -> bool {
    match vec.binary_search(&x) {
        Ok(_) => false,
        Err(pos) => {
            vec.insert(pos, x);
            true
        }
    }
}

fn neighbors(adj: &[Vec<usize>], v: usize) -> &[usize] {
    v.checked_sub(1)
        .and_then(|idx| adj.get(idx))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn check_vertex(v: usize, order: usize, side: &str) -> Result<(), Error> {
    if v == 0 || v > order {
        return Err(Error::IndexOutOfRange(format!(
            "{side}vertex {v} is not in 1..={order}"
        )));
    }
    Ok(())
}

/// A bipartite graph with left vertices `1..=L` and right vertices `1..=R`
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct BipartiteGraph {
    ladj: Vec<Vec<usize>>,
    radj: Vec<Vec<usize>>,
    n_edges: usize,
}

impl BipartiteGraph {
    /// Creates a bipartite graph without edges
    pub fn new(left: usize, right: usize) -> Self {
        Self {
            ladj: vec![vec![]; left],
            radj: vec![vec![]; right],
            n_edges: 0,
        }
    }

    /// Creates the complete bipartite graph `K_{left,right}`
    ///
    /// # Examples
    ///
    /// ```
    /// use cnfgen::graphs::BipartiteGraph;
    ///
    /// let b = BipartiteGraph::complete(2, 3);
    /// assert_eq!(b.number_of_edges(), 6);
    /// assert_eq!(b.right_neighbors(2), &[1, 2, 3]);
    /// ```
    pub fn complete(left: usize, right: usize) -> Self {
        Self {
            ladj: vec![(1..=right).collect(); left],
            radj: vec![(1..=left).collect(); right],
            n_edges: left * right,
        }
    }

    /// Number of left vertices
    pub fn left_order(&self) -> usize {
        self.ladj.len()
    }

    /// Number of right vertices
    pub fn right_order(&self) -> usize {
        self.radj.len()
    }

    /// Number of edges
    pub fn number_of_edges(&self) -> usize {
        self.n_edges
    }

    /// Adds the edge `(u,v)` with `u` on the left and `v` on the right.
    /// Returns `false` if the edge was already present.
    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<bool, Error> {
        check_vertex(u, self.left_order(), "left ")?;
        check_vertex(v, self.right_order(), "right ")?;
        if !sorted_insert(&mut self.ladj[u - 1], v) {
            return Ok(false);
        }
        sorted_insert(&mut self.radj[v - 1], u);
        self.n_edges += 1;
        Ok(true)
    }

    /// Adds a sequence of edges
    pub fn add_edges_from<I: IntoIterator<Item = (usize, usize)>>(
        &mut self,
        edges: I,
    ) -> Result<(), Error> {
        edges
            .into_iter()
            .try_for_each(|(u, v)| self.add_edge(u, v).map(|_| ()))
    }

    /// Checks whether `(u,v)` is an edge
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.right_neighbors(u).binary_search(&v).is_ok()
    }

    /// The sorted right neighbors of left vertex `u`, empty if `u` is not a vertex
    pub fn right_neighbors(&self, u: usize) -> &[usize] {
        neighbors(&self.ladj, u)
    }

    /// The sorted left neighbors of right vertex `v`, empty if `v` is not a vertex
    pub fn left_neighbors(&self, v: usize) -> &[usize] {
        neighbors(&self.radj, v)
    }

    /// Degree of left vertex `u`
    pub fn right_degree(&self, u: usize) -> usize {
        self.right_neighbors(u).len()
    }

    /// Degree of right vertex `v`
    pub fn left_degree(&self, v: usize) -> usize {
        self.left_neighbors(v).len()
    }

    /// Iterates over the edges ordered by left vertex, then right vertex
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.ladj
            .iter()
            .enumerate()
            .flat_map(|(u, nbrs)| nbrs.iter().map(move |&v| (u + 1, v)))
    }
}

/// A simple undirected graph with vertices `1..=n`
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Graph {
    adj: Vec<Vec<usize>>,
    n_edges: usize,
}

impl Graph {
    /// Creates a graph without edges
    pub fn new(n: usize) -> Self {
        Self {
            adj: vec![vec![]; n],
            n_edges: 0,
        }
    }

    /// Number of vertices
    pub fn number_of_vertices(&self) -> usize {
        self.adj.len()
    }

    /// Number of edges
    pub fn number_of_edges(&self) -> usize {
        self.n_edges
    }

    /// Adds the edge `{u,v}`. Returns `false` if it was already present.
    /// Self loops are rejected with [`Error::InvalidArgument`], vertices
    /// outside `1..=n` with [`Error::IndexOutOfRange`].
    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<bool, Error> {
        check_vertex(u, self.number_of_vertices(), "")?;
        check_vertex(v, self.number_of_vertices(), "")?;
        if u == v {
            return Err(Error::InvalidArgument(format!(
                "self loop on vertex {u} in a simple graph"
            )));
        }
        if !sorted_insert(&mut self.adj[u - 1], v) {
            return Ok(false);
        }
        sorted_insert(&mut self.adj[v - 1], u);
        self.n_edges += 1;
        Ok(true)
    }

    /// Adds a sequence of edges
    pub fn add_edges_from<I: IntoIterator<Item = (usize, usize)>>(
        &mut self,
        edges: I,
    ) -> Result<(), Error> {
        edges
            .into_iter()
            .try_for_each(|(u, v)| self.add_edge(u, v).map(|_| ()))
    }

    /// Checks whether `{u,v}` is an edge
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.neighbors(u).binary_search(&v).is_ok()
    }

    /// The sorted neighbors of `v`, empty if `v` is not a vertex
    pub fn neighbors(&self, v: usize) -> &[usize] {
        neighbors(&self.adj, v)
    }

    /// Iterates over the edges as `(u,v)` with `u < v`, in lexicographic order
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adj.iter().enumerate().flat_map(|(u, nbrs)| {
            nbrs.iter()
                .filter(move |&&v| v > u + 1)
                .map(move |&v| (u + 1, v))
        })
    }
}

/// A directed graph with vertices `1..=n`, without parallel edges
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct DiGraph {
    succ: Vec<Vec<usize>>,
    pred: Vec<Vec<usize>>,
    n_edges: usize,
}

impl DiGraph {
    /// Creates a directed graph without edges
    pub fn new(n: usize) -> Self {
        Self {
            succ: vec![vec![]; n],
            pred: vec![vec![]; n],
            n_edges: 0,
        }
    }

    /// Number of vertices
    pub fn number_of_vertices(&self) -> usize {
        self.succ.len()
    }

    /// Number of edges
    pub fn number_of_edges(&self) -> usize {
        self.n_edges
    }

    /// Adds the edge `u -> v`. Returns `false` if it was already present.
    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<bool, Error> {
        check_vertex(u, self.number_of_vertices(), "")?;
        check_vertex(v, self.number_of_vertices(), "")?;
        if !sorted_insert(&mut self.succ[u - 1], v) {
            return Ok(false);
        }
        sorted_insert(&mut self.pred[v - 1], u);
        self.n_edges += 1;
        Ok(true)
    }

    /// Adds a sequence of edges
    pub fn add_edges_from<I: IntoIterator<Item = (usize, usize)>>(
        &mut self,
        edges: I,
    ) -> Result<(), Error> {
        edges
            .into_iter()
            .try_for_each(|(u, v)| self.add_edge(u, v).map(|_| ()))
    }

    /// Checks whether `u -> v` is an edge
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.successors(u).binary_search(&v).is_ok()
    }

    /// The sorted successors of `u`
    pub fn successors(&self, u: usize) -> &[usize] {
        neighbors(&self.succ, u)
    }

    /// The sorted predecessors of `v`
    pub fn predecessors(&self, v: usize) -> &[usize] {
        neighbors(&self.pred, v)
    }

    /// Iterates over the edges ordered by source, then target
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.succ
            .iter()
            .enumerate()
            .flat_map(|(u, nbrs)| nbrs.iter().map(move |&v| (u + 1, v)))
    }
}
