use std::collections::BTreeSet;

use cnfgen::{
    graphs::{BipartiteGraph, DiGraph, Graph},
    instances::CnfFormula,
    types::Lit,
    variables::{EdgeOrder, VariableGroup, WordKind},
};
use proptest::prelude::*;

/// Checks that evaluation and inversion are mutually inverse over the whole
/// group and that the indices enumerate the identifiers in ascending order
fn check_bijection(group: &dyn VariableGroup) -> Result<(), TestCaseError> {
    let indices: Vec<Vec<usize>> = group.indices(&[]).unwrap().collect();
    prop_assert_eq!(indices.len(), group.len());
    let lits: Vec<Lit> = group.lits(&[]).unwrap().collect();
    prop_assert_eq!(
        lits.iter().map(Lit::vid).collect::<Vec<_>>(),
        group.ids().collect::<Vec<_>>()
    );
    for (idx, lit) in indices.iter().zip(&lits) {
        prop_assert_eq!(group.evaluate(idx).unwrap(), *lit);
        prop_assert_eq!(&group.to_index(*lit).unwrap(), idx);
        prop_assert_eq!(&group.to_index(!*lit).unwrap(), idx);
    }
    for id in group.ids() {
        let idx = group.to_index(Lit::positive(id)).unwrap();
        prop_assert_eq!(group.evaluate(&idx).unwrap().vid(), id);
    }
    let labels: BTreeSet<String> = group.labels(&[]).unwrap().collect();
    prop_assert_eq!(labels.len(), group.len());
    Ok(())
}

fn edges(n: usize, m: usize) -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((1..=n, 1..=m), 0..(n * m + 3))
}

proptest! {
    #[test]
    fn block_bijection(offset in 0..30_usize, dims in prop::collection::vec(1..5_usize, 1..4)) {
        let mut formula = CnfFormula::new();
        formula.new_variables(offset).unwrap();
        let block = formula.new_block(&dims, None).unwrap();
        prop_assert_eq!(block.len(), dims.iter().product::<usize>());
        check_bijection(block.as_ref())?;
    }

    #[test]
    fn words_bijection(offset in 0..30_usize, n in 1..6_usize, k in 0..4_usize, kind in 0..4_u8) {
        let kind = match kind {
            0 => WordKind::Combinations,
            1 => WordKind::CombinationsWithReplacement,
            2 => WordKind::Permutations,
            _ => WordKind::Words,
        };
        let mut formula = CnfFormula::new();
        formula.new_variables(offset).unwrap();
        let words = formula.new_words(n, k, kind, None).unwrap();
        check_bijection(words.as_ref())?;
    }

    #[test]
    fn bipartite_bijection(offset in 0..30_usize, edges in edges(4, 5)) {
        let mut graph = BipartiteGraph::new(4, 5);
        graph.add_edges_from(edges).unwrap();
        let mut formula = CnfFormula::new();
        formula.new_variables(offset).unwrap();
        let group = formula.new_bipartite_edges(&graph, None).unwrap();
        prop_assert_eq!(group.len(), graph.number_of_edges());
        check_bijection(group.as_ref())?;
        let mapping = formula.new_sparse_mapping(&graph, None).unwrap();
        check_bijection(mapping.as_ref())?;
    }

    #[test]
    fn graph_bijection(offset in 0..30_usize, edges in edges(6, 6)) {
        let mut graph = Graph::new(6);
        graph.add_edges_from(edges.into_iter().filter(|(u, v)| u != v)).unwrap();
        let mut formula = CnfFormula::new();
        formula.new_variables(offset).unwrap();
        let group = formula.new_graph_edges(&graph, None).unwrap();
        prop_assert_eq!(group.len(), graph.number_of_edges());
        check_bijection(group.as_ref())?;
    }

    #[test]
    fn digraph_bijection(offset in 0..30_usize, edges in edges(5, 5), succ in any::<bool>()) {
        let mut graph = DiGraph::new(5);
        graph.add_edges_from(edges).unwrap();
        let order = if succ { EdgeOrder::Succ } else { EdgeOrder::Pred };
        let mut formula = CnfFormula::new();
        formula.new_variables(offset).unwrap();
        let group = formula.new_digraph_edges(&graph, order, None).unwrap();
        prop_assert_eq!(group.len(), graph.number_of_edges());
        check_bijection(group.as_ref())?;
    }

    #[test]
    fn binary_mapping_bijection(offset in 0..30_usize, n in 1..6_usize, m in 1..20_usize) {
        let mut formula = CnfFormula::new();
        formula.new_variables(offset).unwrap();
        let f = formula.new_binary_mapping(n, m, None).unwrap();
        prop_assert_eq!(f.len(), n * f.bits() as usize);
        check_bijection(f.as_ref())?;
    }
}
