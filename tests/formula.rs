use cnfgen::{
    clause,
    graphs::{BipartiteGraph, DiGraph, Graph},
    instances::{fio::WriteOptions, CnfFormula, OpbFormula},
    lit,
    types::{Assignment, Clause, Lit, RelOp},
    variables::{EdgeOrder, VariableGroup, WordKind},
    Error,
};

/// Checks for every assignment of the first `n_vars` variables whether all
/// clauses are satisfied exactly when `expected` holds
fn check_all<F: Fn(&Assignment) -> bool>(clauses: &[Clause], n_vars: u32, expected: F) {
    assert!(n_vars < 24);
    for bits in 0..(1_u64 << n_vars) {
        let assign = Assignment::from_bits(n_vars, bits);
        assert_eq!(
            clauses.iter().all(|cl| cl.is_sat(&assign)),
            expected(&assign),
            "assignment {bits:b}"
        );
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn is_true(assign: &Assignment, lit: Lit) -> bool {
    assign.lit_value(lit).to_bool_with_def(false)
}

#[test]
fn block_scenario() {
    let mut formula = CnfFormula::new();
    let g = formula.new_block(&[2, 3], Some("G[{},{}]")).unwrap();
    assert_eq!(g.evaluate(&[2, 1]).unwrap(), lit![4]);
    assert_eq!(g.label(&[2, 1]).unwrap(), "G[2,1]");
    formula.new_variables(5).unwrap();
    let h = formula.new_block(&[2, 3], None).unwrap();
    assert_eq!(h.evaluate(&[2, 1]).unwrap(), lit![15]);
    assert_eq!(h.to_index(lit![-15]).unwrap(), vec![2, 1]);
}

#[test]
fn linear_scenarios() {
    let mut formula = CnfFormula::new();
    formula.update_variable_number(3);
    let lits = [lit![1], lit![2], lit![3]];
    formula.add_linear(&lits, RelOp::Ge, 3).unwrap();
    assert_eq!(
        formula.clauses(),
        &[clause![lit![1]], clause![lit![2]], clause![lit![3]]]
    );

    let mut formula = CnfFormula::new();
    formula.update_variable_number(3);
    formula
        .add_linear(&[lit![-1], lit![2], lit![3]], RelOp::Lt, 2)
        .unwrap();
    assert_eq!(
        formula.clauses(),
        &[
            clause![lit![1], lit![-2]],
            clause![lit![1], lit![-3]],
            clause![lit![-2], lit![-3]]
        ]
    );

    let mut formula = CnfFormula::new();
    formula.update_variable_number(2);
    formula.add_parity(&[lit![-1], lit![2]], 1).unwrap();
    assert_eq!(
        formula.clauses(),
        &[clause![lit![-1], lit![2]], clause![lit![1], lit![-2]]]
    );
}

#[test]
fn cardinality_counts() {
    // C(k, k-c+1) clauses for 0 < c <= k
    let binom = |n: usize, k: usize| -> usize { (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1)) };
    for k in 1..=6_usize {
        for c in -1..=(k as isize + 1) {
            let mut formula = CnfFormula::new();
            let lits = formula.new_variables(k).unwrap();
            formula.add_linear(&lits, RelOp::Ge, c).unwrap();
            let expected = match c {
                c if c <= 0 => 0,
                c if c as usize > k => 1,
                c => binom(k, k - c as usize + 1),
            };
            assert_eq!(formula.number_of_clauses(), expected, "k={k} c={c}");
            if c as usize > k && c > 0 {
                assert!(formula.clauses()[0].is_empty());
            }
        }
    }
}

#[test]
fn parity_counts_and_semantics() {
    for k in 1..=6_u32 {
        for b in 0..=1 {
            let mut formula = CnfFormula::new();
            let lits = formula.new_variables(k as usize).unwrap();
            formula.add_parity(&lits, b).unwrap();
            assert_eq!(formula.number_of_clauses(), 1 << (k - 1));
            assert!(formula.clauses().iter().all(|cl| cl.len() == k as usize));
            check_all(formula.clauses(), k, |assign| {
                lits.iter().filter(|&&l| is_true(assign, l)).count() % 2 == b
            });
        }
    }
}

#[test]
fn shorthand_semantics() {
    for k in 0..=6_usize {
        let half = |assign: &Assignment, lits: &[Lit]| {
            2 * lits.iter().filter(|&&l| is_true(assign, l)).count()
        };
        let mut formula = CnfFormula::new();
        let lits = formula.new_variables(k).unwrap();
        formula.add_strict_majority(&lits).unwrap();
        check_all(formula.clauses(), k as u32, |a| half(a, &lits) > k);

        let mut formula = CnfFormula::new();
        let lits = formula.new_variables(k).unwrap();
        formula.add_strict_minority(&lits).unwrap();
        check_all(formula.clauses(), k as u32, |a| half(a, &lits) < k);

        let mut formula = CnfFormula::new();
        let lits = formula.new_variables(k).unwrap();
        formula.add_loose_minority(&lits).unwrap();
        check_all(formula.clauses(), k as u32, |a| half(a, &lits) <= k);

        let mut formula = CnfFormula::new();
        let lits = formula.new_variables(k).unwrap();
        formula.add_loose_majority(&lits).unwrap();
        check_all(formula.clauses(), k as u32, |a| half(a, &lits) >= k);
    }
}

#[test]
fn injective_mapping_brute_force() {
    for (n, m) in [(2, 3), (3, 3), (3, 2), (2, 4)] {
        let mut formula = CnfFormula::new();
        let f = formula.new_mapping(n, m, None).unwrap();
        formula.force_complete_mapping(&f).unwrap();
        formula.force_functional_mapping(&f).unwrap();
        formula.force_injective_mapping(&f).unwrap();
        let image = |assign: &Assignment, u: usize| -> Vec<usize> {
            (1..=m)
                .filter(|&v| is_true(assign, f.evaluate(&[u, v]).unwrap()))
                .collect()
        };
        check_all(formula.clauses(), (n * m) as u32, |assign| {
            let images: Vec<Vec<usize>> = (1..=n).map(|u| image(assign, u)).collect();
            images.iter().all(|img| img.len() == 1) && {
                let mut values: Vec<usize> = images.iter().map(|img| img[0]).collect();
                values.sort_unstable();
                values.dedup();
                values.len() == n
            }
        });
    }
}

#[test]
fn binary_mapping_brute_force() {
    let mut formula = CnfFormula::new();
    let f = formula.new_binary_mapping(3, 3, None).unwrap();
    formula.force_complete_mapping(&f).unwrap();
    formula.force_functional_mapping(&f).unwrap();
    formula.force_injective_mapping(&f).unwrap();
    formula.force_nondecreasing_mapping(&f).unwrap();
    let value = |assign: &Assignment, u: usize| -> usize {
        (0..f.bits() as usize).fold(0, |acc, b| {
            acc | (usize::from(is_true(assign, f.evaluate(&[u, b]).unwrap())) << b)
        })
    };
    check_all(formula.clauses(), 6, |assign| {
        let values: Vec<usize> = (1..=3).map(|u| value(assign, u)).collect();
        values.iter().all(|&v| v < 3) && values.windows(2).all(|w| w[0] < w[1])
    });
}

#[test]
fn nondecreasing_unary_brute_force() {
    let mut formula = CnfFormula::new();
    let f = formula.new_mapping(3, 3, None).unwrap();
    formula.force_complete_mapping(&f).unwrap();
    formula.force_functional_mapping(&f).unwrap();
    formula.force_nondecreasing_mapping(&f).unwrap();
    let value = |assign: &Assignment, u: usize| -> Option<usize> {
        let img: Vec<usize> = (1..=3)
            .filter(|&v| is_true(assign, f.evaluate(&[u, v]).unwrap()))
            .collect();
        (img.len() == 1).then(|| img[0])
    };
    check_all(formula.clauses(), 9, |assign| {
        let values: Option<Vec<usize>> = (1..=3).map(|u| value(assign, u)).collect();
        values.is_some_and(|v| v.windows(2).all(|w| w[0] <= w[1]))
    });
}

#[test]
fn mapping_counts() {
    init_logging();
    let mut formula = CnfFormula::new();
    let f = formula.new_mapping(10, 5, None).unwrap();
    let g = formula.new_binary_mapping(4, 14, None).unwrap();
    formula.force_complete_mapping(&f).unwrap();
    assert_eq!(formula.number_of_clauses(), 10);
    formula.force_complete_mapping(&g).unwrap();
    assert_eq!(formula.number_of_clauses(), 18);
    assert_eq!(
        formula.clauses()[10],
        clause![lit![-51], lit![-52], lit![-53], lit![54]]
    );
    formula.force_functional_mapping(&f).unwrap();
    assert_eq!(formula.number_of_clauses(), 118);
    formula.force_surjective_mapping(&f).unwrap();
    assert_eq!(formula.number_of_clauses(), 123);
    formula.force_injective_mapping(&f).unwrap();
    assert_eq!(formula.number_of_clauses(), 348);
    assert_eq!(formula.clauses()[123], clause![lit![-1], lit![-6]]);
    assert!(formula.debug(false, false));
}

#[test]
fn range_monotonicity() {
    let mut formula = CnfFormula::new();
    let mut g = Graph::new(4);
    g.add_edges_from([(1, 2), (2, 3), (3, 4), (4, 1)]).unwrap();
    let mut d = DiGraph::new(3);
    d.add_edges_from([(1, 2), (1, 3), (3, 2)]).unwrap();
    let mut lens = vec![];
    let mut ranges = vec![];
    macro_rules! record {
        ($group:expr) => {{
            let group = $group;
            lens.push(group.len());
            ranges.push(group.ids());
        }};
    }
    record!(formula.new_block(&[2, 2, 3], None).unwrap());
    record!(formula.new_words(4, 2, WordKind::Combinations, None).unwrap());
    record!(formula.new_permutations(3, None, None).unwrap());
    record!(formula.new_graph_edges(&g, None).unwrap());
    record!(formula.new_digraph_edges(&d, EdgeOrder::Succ, None).unwrap());
    record!(formula.new_mapping(2, 3, None).unwrap());
    record!(formula.new_binary_mapping(3, 5, None).unwrap());
    formula.new_variables(4).unwrap();
    assert_eq!(lens, vec![12, 6, 6, 4, 3, 6, 9]);
    assert_eq!(
        formula.number_of_variables() as usize,
        lens.iter().sum::<usize>() + 4
    );
    assert_eq!(ranges[0].start, 1);
    for pair in ranges.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
}

#[test]
fn empty_groups() {
    let mut formula = CnfFormula::new();
    formula.new_variables(2).unwrap();
    let e = formula
        .new_bipartite_edges(&BipartiteGraph::new(3, 3), None)
        .unwrap();
    assert!(e.is_empty());
    assert_eq!(e.lits(&[Some(2), None]).unwrap().count(), 0);
    assert_eq!(formula.number_of_variables(), 2);
    let x = formula.new_block(&[1], None).unwrap();
    assert_eq!(x.evaluate(&[1]).unwrap(), lit![3]);
    assert!(matches!(
        formula.new_block(&[2, 0], None),
        Err(Error::InvalidArgument(_))
    ));
    assert_eq!(formula.var_manager().n_groups(), 2);
}

#[test]
fn debug_is_idempotent() {
    init_logging();
    let mut formula = CnfFormula::new();
    let f = formula.new_mapping(3, 4, None).unwrap();
    formula.force_complete_mapping(&f).unwrap();
    formula.force_injective_mapping(&f).unwrap();
    let before = formula.clauses().to_vec();
    assert!(formula.debug(false, false));
    assert!(formula.debug(false, false));
    assert_eq!(formula.clauses(), before.as_slice());
}

#[test]
fn opb_mapping() {
    let mut formula = OpbFormula::new();
    let f = formula.new_mapping(5, 4, None).unwrap();
    formula.force_complete_mapping(&f).unwrap();
    formula.force_injective_mapping(&f).unwrap();
    let mut out = vec![];
    formula
        .write_opb(&mut out, WriteOptions::default())
        .unwrap();
    let out = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[0], "* #variable= 20 #constraint= 9");
    assert_eq!(lines[1], "+1 x1 +1 x2 +1 x3 +1 x4 >= 1;");
    assert_eq!(lines[6], "+1 ~x1 +1 ~x5 +1 ~x9 +1 ~x13 +1 ~x17 >= 4;");
    assert_eq!(lines[9], "+1 ~x4 +1 ~x8 +1 ~x12 +1 ~x16 +1 ~x20 >= 4;");
}

#[test]
fn cnf_as_opb() {
    let mut formula = CnfFormula::with_description("tiny");
    formula.new_variable(Some("a")).unwrap();
    formula.add_clause(clause![lit![1], lit![-2]]);
    let mut out = vec![];
    formula
        .write_opb(
            &mut out,
            WriteOptions {
                export_header: true,
                export_varnames: true,
            },
        )
        .unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "* #variable= 2 #constraint= 1\n* description: tiny\n*\n\
         * varname 1 a\n* varname 2 x2\n*\n+1 x1 +1 ~x2 >= 1;\n"
    );
}
