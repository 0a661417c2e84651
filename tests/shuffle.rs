#![cfg(feature = "rand")]

use cnfgen::{
    clause,
    instances::{CnfFormula, OpbFormula, ShuffleOptions},
    lit,
    types::{Assignment, Clause, RelOp},
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn formula() -> CnfFormula {
    let mut formula = CnfFormula::with_description("ordering");
    let f = formula.new_mapping(3, 3, None).unwrap();
    formula.force_complete_mapping(&f).unwrap();
    formula.force_functional_mapping(&f).unwrap();
    formula.force_injective_mapping(&f).unwrap();
    formula
}

fn count_models(clauses: &[Clause], n_vars: u32) -> usize {
    (0..(1_u64 << n_vars))
        .filter(|&bits| {
            let assign = Assignment::from_bits(n_vars, bits);
            clauses.iter().all(|cl| cl.is_sat(&assign))
        })
        .count()
}

fn sorted(clauses: &[Clause]) -> Vec<Vec<i32>> {
    let mut dimacs: Vec<Vec<i32>> = clauses
        .iter()
        .map(|cl| {
            let mut lits = cl.to_dimacs();
            lits.sort_unstable();
            lits
        })
        .collect();
    dimacs.sort();
    dimacs
}

#[test]
fn shuffle_is_equisatisfiable() {
    let base = formula();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let shuffled = base.shuffle(&mut rng, ShuffleOptions::default());
    assert_eq!(shuffled.number_of_variables(), 9);
    assert_eq!(shuffled.number_of_clauses(), base.number_of_clauses());
    assert_eq!(count_models(shuffled.clauses(), 9), 6);
    assert_eq!(count_models(base.clauses(), 9), 6);
    assert_eq!(shuffled.description(), Some("ordering (reshuffled)"));
    assert_eq!(
        shuffled.header_field("transformation 1"),
        Some("Formula reshuffling")
    );
    assert_eq!(shuffled.var_manager().n_groups(), 0);
    assert!(shuffled.debug(false, false));
}

#[test]
fn shuffle_is_reproducible() {
    let base = formula();
    let first = base.shuffle(&mut ChaCha8Rng::seed_from_u64(7), ShuffleOptions::default());
    let second = base.shuffle(&mut ChaCha8Rng::seed_from_u64(7), ShuffleOptions::default());
    assert_eq!(first.clauses(), second.clauses());
}

#[test]
fn shuffle_only_clause_order() {
    let base = formula();
    let shuffled = base.shuffle(
        &mut ChaCha8Rng::seed_from_u64(3),
        ShuffleOptions {
            variables: false,
            polarity: false,
            constraints: true,
        },
    );
    assert_eq!(sorted(shuffled.clauses()), sorted(base.clauses()));
    let unchanged = base.shuffle(
        &mut ChaCha8Rng::seed_from_u64(3),
        ShuffleOptions {
            variables: false,
            polarity: false,
            constraints: false,
        },
    );
    assert_eq!(unchanged.clauses(), base.clauses());
}

#[test]
fn repeated_shuffles_number_transformations() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let twice = formula()
        .shuffle(&mut rng, ShuffleOptions::default())
        .shuffle(&mut rng, ShuffleOptions::default());
    assert_eq!(
        twice.description(),
        Some("ordering (reshuffled) (reshuffled)")
    );
    assert!(twice.header_field("transformation 2").is_some());
}

#[test]
fn shuffle_opb() {
    let mut formula = OpbFormula::new();
    let lits = formula.new_variables(4).unwrap();
    formula.add_linear(&lits, RelOp::Le, 2).unwrap();
    formula.add_linear(&lits[..2], RelOp::Ge, 1).unwrap();
    let shuffled = formula.shuffle(&mut ChaCha8Rng::seed_from_u64(9), ShuffleOptions::default());
    assert_eq!(shuffled.number_of_clauses(), 2);
    let mut bounds: Vec<isize> = shuffled.constraints().iter().map(|c| c.bound()).collect();
    bounds.sort_unstable();
    assert_eq!(bounds, vec![1, 2]);
}

#[test]
fn shuffle_keeps_unchecked_variables() {
    let mut formula = CnfFormula::new();
    formula.add_clause(clause![lit![1]]);
    formula.add_clause_unchecked(clause![lit![-5], lit![1]]);
    assert!(!formula.debug(false, false));
    for seed in 0..8 {
        let shuffled = formula.shuffle(
            &mut ChaCha8Rng::seed_from_u64(seed),
            ShuffleOptions::default(),
        );
        assert_eq!(shuffled.number_of_variables(), 1);
        assert!(!shuffled.debug(false, false));
        let mut vids: Vec<u32> = shuffled
            .clauses()
            .iter()
            .flat_map(|cl| cl.iter().map(|l| l.vid()))
            .collect();
        vids.sort_unstable();
        assert_eq!(vids, vec![1, 1, 5]);
    }
}
