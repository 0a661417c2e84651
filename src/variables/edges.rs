//! # Edge Variables
//!
//! One variable per edge of a graph. All three kinds share the layout of
//! [`BipartiteEdges`]: edges are grouped by left vertex, and within a left
//! vertex ordered by right vertex.

use std::ops::Range;

use super::{check_arity, expand_pattern, id_range, out_of_range, Indices, Lits, VariableGroup};
use crate::{
    graphs::{BipartiteGraph, DiGraph, Graph},
    types::Lit,
    utils::LabelFormat,
    Error,
};

/// Variables for the edges of a bipartite graph, indexed by `(u,v)` with `u`
/// a left and `v` a right vertex
///
/// # Examples
///
/// ```
/// use cnfgen::{graphs::BipartiteGraph, instances::CnfFormula, lit, variables::VariableGroup};
///
/// let mut g = BipartiteGraph::new(2, 3);
/// g.add_edges_from([(2, 1), (1, 3), (2, 2)]).unwrap();
/// let mut formula = CnfFormula::new();
/// formula.new_variables(100).unwrap();
/// let e = formula.new_bipartite_edges(&g, None).unwrap();
/// assert_eq!(e.to_index(lit![101]).unwrap(), vec![1, 3]);
/// assert_eq!(e.to_index(lit![103]).unwrap(), vec![2, 2]);
/// ```
#[derive(Clone, Debug)]
pub struct BipartiteEdges {
    ids: Range<u32>,
    graph: BipartiteGraph,
    /// First identifier of the edges of each left vertex
    offsets: Vec<u32>,
    fmt: LabelFormat,
}

impl BipartiteEdges {
    /// Creates the edge variables of a snapshot of `graph`, starting from
    /// variable `start`
    pub fn new(start: u32, graph: &BipartiteGraph, label: Option<&str>) -> Result<Self, Error> {
        let ids = id_range(start, graph.number_of_edges())?;
        let mut offsets = Vec::with_capacity(graph.left_order());
        let mut next = start;
        for u in 1..=graph.left_order() {
            offsets.push(next);
            next += graph.right_degree(u) as u32;
        }
        Ok(Self {
            ids,
            graph: graph.clone(),
            offsets,
            fmt: LabelFormat::parse(label.unwrap_or("e({},{})"), 2)?,
        })
    }

    /// The graph the variables were created for
    pub fn graph(&self) -> &BipartiteGraph {
        &self.graph
    }

    fn check_left(&self, u: usize) -> Result<(), Error> {
        if u == 0 || u > self.graph.left_order() {
            return Err(Error::IndexOutOfRange(format!(
                "left vertex {u} is not in 1..={}",
                self.graph.left_order()
            )));
        }
        Ok(())
    }

    fn check_right(&self, v: usize) -> Result<(), Error> {
        if v == 0 || v > self.graph.right_order() {
            return Err(Error::IndexOutOfRange(format!(
                "right vertex {v} is not in 1..={}",
                self.graph.right_order()
            )));
        }
        Ok(())
    }

    /// Identifier of edge `(u,v)`, if it is an edge
    fn edge_id(&self, u: usize, v: usize) -> Option<u32> {
        let rank = self.graph.right_neighbors(u).binary_search(&v).ok()?;
        Some(self.offsets[u - 1] + rank as u32)
    }

    fn edge_lit(&self, u: usize, v: usize) -> Result<Lit, Error> {
        self.check_left(u)?;
        self.check_right(v)?;
        self.edge_id(u, v)
            .map(|id| Lit::new_unchecked(id, false))
            .ok_or_else(|| Error::IndexOutOfRange(format!("({u},{v}) is not an edge")))
    }

    fn edge_indices(&self, pattern: &[Option<usize>]) -> Result<Vec<(usize, usize)>, Error> {
        let pattern = expand_pattern(pattern, 2)?;
        Ok(match (pattern[0], pattern[1]) {
            (None, None) => self.graph.edges().collect(),
            (Some(u), None) => {
                self.check_left(u)?;
                self.graph
                    .right_neighbors(u)
                    .iter()
                    .map(|&v| (u, v))
                    .collect()
            }
            (None, Some(v)) => {
                self.check_right(v)?;
                self.graph
                    .left_neighbors(v)
                    .iter()
                    .map(|&u| (u, v))
                    .collect()
            }
            (Some(u), Some(v)) => {
                self.edge_lit(u, v)?;
                vec![(u, v)]
            }
        })
    }
}

impl VariableGroup for BipartiteEdges {
    fn ids(&self) -> Range<u32> {
        self.ids.clone()
    }

    fn arity(&self) -> usize {
        2
    }

    fn indices(&self, pattern: &[Option<usize>]) -> Result<Indices<'_>, Error> {
        Ok(Box::new(
            self.edge_indices(pattern)?
                .into_iter()
                .map(|(u, v)| vec![u, v]),
        ))
    }

    fn evaluate(&self, index: &[usize]) -> Result<Lit, Error> {
        check_arity(index, 2)?;
        self.edge_lit(index[0], index[1])
    }

    fn lits(&self, pattern: &[Option<usize>]) -> Result<Lits<'_>, Error> {
        let edges = self.edge_indices(pattern)?;
        Ok(Box::new(edges.into_iter().filter_map(move |(u, v)| {
            self.edge_id(u, v).map(|id| Lit::new_unchecked(id, false))
        })))
    }

    fn to_index(&self, lit: Lit) -> Result<Vec<usize>, Error> {
        if !self.contains(lit) {
            return Err(out_of_range(lit, &self.ids));
        }
        let id = lit.vid();
        // last left vertex whose edges start at or before the identifier
        let u = self.offsets.partition_point(|&o| o <= id);
        let rank = (id - self.offsets[u - 1]) as usize;
        let v = self
            .graph
            .right_neighbors(u)
            .get(rank)
            .copied()
            .ok_or_else(|| out_of_range(lit, &self.ids))?;
        Ok(vec![u, v])
    }

    fn render_label(&self, index: &[usize]) -> String {
        self.fmt.render(index)
    }
}

/// Variables for the edges of a simple undirected graph. Edges are indexed
/// by `(u,v)` in either orientation and always reported as `(min,max)`.
///
/// # Examples
///
/// ```
/// use cnfgen::{graphs::Graph, instances::CnfFormula, lit, variables::VariableGroup};
///
/// let mut g = Graph::new(4);
/// g.add_edges_from([(2, 1), (3, 2), (1, 3), (4, 2)]).unwrap();
/// let mut formula = CnfFormula::new();
/// formula.new_variables(100).unwrap();
/// let e = formula.new_graph_edges(&g, Some("E[{},{}]")).unwrap();
/// assert_eq!(e.to_index(lit![104]).unwrap(), vec![2, 4]);
/// assert_eq!(e.label(&[3, 1]).unwrap(), "E[1,3]");
/// ```
#[derive(Clone, Debug)]
pub struct GraphEdges {
    inner: BipartiteEdges,
}

impl GraphEdges {
    /// Creates the edge variables of a snapshot of `graph`, starting from
    /// variable `start`
    pub fn new(start: u32, graph: &Graph, label: Option<&str>) -> Result<Self, Error> {
        let n = graph.number_of_vertices();
        let mut upper = BipartiteGraph::new(n, n);
        upper.add_edges_from(graph.edges())?;
        Ok(Self {
            inner: BipartiteEdges::new(start, &upper, label)?,
        })
    }

    /// The number of vertices of the graph
    pub fn number_of_vertices(&self) -> usize {
        self.inner.graph.left_order()
    }
}

impl VariableGroup for GraphEdges {
    fn ids(&self) -> Range<u32> {
        self.inner.ids()
    }

    fn arity(&self) -> usize {
        2
    }

    fn indices(&self, pattern: &[Option<usize>]) -> Result<Indices<'_>, Error> {
        let pattern = expand_pattern(pattern, 2)?;
        match (pattern[0], pattern[1]) {
            (None, None) => self.inner.indices(&[]),
            (Some(u), Some(v)) => self.inner.indices(&[Some(u.min(v)), Some(u.max(v))]),
            (Some(w), None) | (None, Some(w)) => {
                self.inner.check_left(w)?;
                let graph = &self.inner.graph;
                Ok(Box::new(
                    graph
                        .left_neighbors(w)
                        .iter()
                        .map(move |&x| vec![x, w])
                        .chain(graph.right_neighbors(w).iter().map(move |&y| vec![w, y])),
                ))
            }
        }
    }

    fn evaluate(&self, index: &[usize]) -> Result<Lit, Error> {
        check_arity(index, 2)?;
        let (u, v) = (index[0].min(index[1]), index[0].max(index[1]));
        self.inner.edge_lit(u, v)
    }

    fn lits(&self, pattern: &[Option<usize>]) -> Result<Lits<'_>, Error> {
        Ok(Box::new(self.indices(pattern)?.filter_map(move |idx| {
            self.inner
                .edge_id(idx[0], idx[1])
                .map(|id| Lit::new_unchecked(id, false))
        })))
    }

    fn to_index(&self, lit: Lit) -> Result<Vec<usize>, Error> {
        self.inner.to_index(lit)
    }

    fn render_label(&self, index: &[usize]) -> String {
        self.inner.render_label(index)
    }
}

/// How the edges of a [`DigraphEdges`] group are grouped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EdgeOrder {
    /// Edges `u -> v` grouped by source `u`
    #[default]
    Pred,
    /// Edges `u -> v` grouped by target `v`
    Succ,
}

/// Variables for the edges of a directed graph, indexed by `(u,v)` for the
/// edge `u -> v`
///
/// # Examples
///
/// ```
/// use cnfgen::{graphs::DiGraph, instances::CnfFormula, lit, variables::{EdgeOrder, VariableGroup}};
///
/// let mut g = DiGraph::new(5);
/// g.add_edges_from([(1, 2), (1, 3), (2, 3), (2, 4), (5, 1)]).unwrap();
/// let mut formula = CnfFormula::new();
/// formula.new_variables(11).unwrap();
/// let b = formula.new_digraph_edges(&g, EdgeOrder::Succ, None).unwrap();
/// assert_eq!(b.evaluate(&[1, 3]).unwrap(), lit![14]);
/// assert_eq!(b.to_index(lit![12]).unwrap(), vec![5, 1]);
/// ```
#[derive(Clone, Debug)]
pub struct DigraphEdges {
    inner: BipartiteEdges,
    order: EdgeOrder,
}

impl DigraphEdges {
    /// Creates the edge variables of a snapshot of `graph`, starting from
    /// variable `start`
    pub fn new(
        start: u32,
        graph: &DiGraph,
        order: EdgeOrder,
        label: Option<&str>,
    ) -> Result<Self, Error> {
        let n = graph.number_of_vertices();
        let mut layout = BipartiteGraph::new(n, n);
        match order {
            EdgeOrder::Pred => layout.add_edges_from(graph.edges())?,
            EdgeOrder::Succ => layout.add_edges_from(graph.edges().map(|(u, v)| (v, u)))?,
        }
        Ok(Self {
            inner: BipartiteEdges::new(start, &layout, label)?,
            order,
        })
    }

    /// The grouping of the edges
    pub fn order(&self) -> EdgeOrder {
        self.order
    }

    fn orient<T: Copy>(&self, pair: [T; 2]) -> [T; 2] {
        match self.order {
            EdgeOrder::Pred => pair,
            EdgeOrder::Succ => [pair[1], pair[0]],
        }
    }
}

impl VariableGroup for DigraphEdges {
    fn ids(&self) -> Range<u32> {
        self.inner.ids()
    }

    fn arity(&self) -> usize {
        2
    }

    fn indices(&self, pattern: &[Option<usize>]) -> Result<Indices<'_>, Error> {
        let pattern = expand_pattern(pattern, 2)?;
        let inner = self.inner.indices(&self.orient([pattern[0], pattern[1]]))?;
        Ok(Box::new(
            inner.map(move |idx| self.orient([idx[0], idx[1]]).to_vec()),
        ))
    }

    fn evaluate(&self, index: &[usize]) -> Result<Lit, Error> {
        check_arity(index, 2)?;
        let [u, v] = self.orient([index[0], index[1]]);
        self.inner.edge_lit(u, v)
    }

    fn lits(&self, pattern: &[Option<usize>]) -> Result<Lits<'_>, Error> {
        let pattern = expand_pattern(pattern, 2)?;
        self.inner.lits(&self.orient([pattern[0], pattern[1]]))
    }

    fn to_index(&self, lit: Lit) -> Result<Vec<usize>, Error> {
        let idx = self.inner.to_index(lit)?;
        Ok(self.orient([idx[0], idx[1]]).to_vec())
    }

    fn render_label(&self, index: &[usize]) -> String {
        self.inner.render_label(index)
    }
}
