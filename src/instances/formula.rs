//! # Formulas With Variable Groups

use std::{
    io::{self, BufRead, Write},
    path::Path,
    sync::Arc,
};

use log::{debug, warn};

use crate::{
    encodings::{card, mapping, parity, CollectClauses},
    graphs::{BipartiteGraph, DiGraph, Graph},
    types::{Clause, IWLitIter, Lit, RelOp},
    utils::LabelFormat,
    variables::{
        id_range, BinaryMapping, BipartiteEdges, Block, DigraphEdges, EdgeOrder, GraphEdges,
        Mapping, Singleton, UnaryMapping, VariableGroup, WordKind, Words,
    },
    Error,
};

use super::{
    fio::{self, WriteOptions},
    Cnf, ConstraintStore, ManageVars, Opb, VarManager,
};

/// A formula over clauses
pub type CnfFormula = Formula<Cnf>;
/// A formula over pseudo-boolean constraints
pub type OpbFormula = Formula<Opb>;

/// A formula together with its variable groups and a header of metadata.
///
/// Variables are allocated in groups (see [`crate::variables`]), each group
/// reserving the identifiers directly after the last used variable. The
/// constraint builders compile parity, cardinality and mapping constraints
/// into the store `S`.
///
/// # Examples
///
/// ```
/// use cnfgen::{instances::CnfFormula, lit, types::RelOp};
///
/// let mut formula = CnfFormula::with_description("three pigeons");
/// let lits = formula.new_variables(3).unwrap();
/// formula.add_linear(&lits, RelOp::Ge, 3).unwrap();
/// let dimacs: Vec<Vec<i32>> = formula.clauses().iter().map(|cl| cl.to_dimacs()).collect();
/// assert_eq!(dimacs, vec![vec![1], vec![2], vec![3]]);
/// assert_eq!(formula.description(), Some("three pigeons"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Formula<S: ConstraintStore = Cnf> {
    store: S,
    vars: VarManager,
    header: Vec<(String, String)>,
}

impl<S: ConstraintStore> Formula<S> {
    /// Creates a new empty formula
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty formula with a description in its header
    pub fn with_description(description: &str) -> Self {
        let mut formula = Self::default();
        formula.set_header("description", description);
        formula
    }

    /// Gets the description of the formula
    pub fn description(&self) -> Option<&str> {
        self.header_field("description")
    }

    /// Gets the header fields of the formula, in insertion order
    pub fn header(&self) -> &[(String, String)] {
        &self.header
    }

    /// Gets the value of a header field
    pub fn header_field(&self, field: &str) -> Option<&str> {
        self.header
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v.as_str())
    }

    /// Sets a header field, replacing the previous value if the field exists
    pub fn set_header(&mut self, field: &str, value: &str) {
        match self.header.iter_mut().find(|(f, _)| f == field) {
            Some((_, v)) => *v = value.to_string(),
            None => self.header.push((field.to_string(), value.to_string())),
        }
    }

    /// Gets the underlying constraint store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Gets the variable groups of the formula
    pub fn var_manager(&self) -> &VarManager {
        &self.vars
    }

    /// Gets the number of variables
    pub fn number_of_variables(&self) -> u32 {
        self.store.n_vars()
    }

    /// Gets the number of clauses (constraints)
    pub fn number_of_clauses(&self) -> usize {
        self.store.n_constraints()
    }

    /// Gets the constraints, in insertion order
    pub fn constraints(&self) -> &[S::Constraint] {
        self.store.constraints()
    }

    /// Raises the number of variables to at least `n`
    pub fn update_variable_number(&mut self, n: u32) {
        self.store.update_variable_number(n);
    }

    fn next_id(&self) -> u32 {
        self.store.n_vars() + 1
    }

    fn register<G: VariableGroup + 'static>(&mut self, group: G) -> Result<Arc<G>, Error> {
        let group = Arc::new(group);
        self.vars.register(group.clone(), &mut self.store)?;
        Ok(group)
    }

    /// Creates a single new variable. Without a name, the variable is labelled
    /// like variables outside of any group.
    pub fn new_variable(&mut self, name: Option<&str>) -> Result<Lit, Error> {
        let group = self.register(Singleton::new(self.next_id(), name)?)?;
        Ok(group.var().pos_lit())
    }

    /// Reserves `n` new variables that belong to no group
    pub fn new_variables(&mut self, n: usize) -> Result<Vec<Lit>, Error> {
        let ids = id_range(self.next_id(), n)?;
        if let Some(last) = ids.clone().last() {
            self.store.update_variable_number(last);
        }
        Ok(ids.map(Lit::positive).collect())
    }

    /// Creates a [`Block`] of variables with the given dimensions
    pub fn new_block(&mut self, ranges: &[usize], label: Option<&str>) -> Result<Arc<Block>, Error> {
        self.register(Block::new(self.next_id(), ranges, label)?)
    }

    /// Creates a [`Words`] group with one variable per sequence of length `k`
    /// over `1..=n` of the given kind
    pub fn new_words(
        &mut self,
        n: usize,
        k: usize,
        kind: WordKind,
        label: Option<&str>,
    ) -> Result<Arc<Words>, Error> {
        self.register(Words::new(self.next_id(), n, k, kind, label)?)
    }

    /// Creates one variable per `k`-subset of `1..=n`
    pub fn new_combinations(
        &mut self,
        n: usize,
        k: usize,
        label: Option<&str>,
    ) -> Result<Arc<Words>, Error> {
        self.new_words(n, k, WordKind::Combinations, label)
    }

    /// Creates one variable per `k`-multiset of `1..=n`
    pub fn new_combinations_with_replacement(
        &mut self,
        n: usize,
        k: usize,
        label: Option<&str>,
    ) -> Result<Arc<Words>, Error> {
        self.new_words(n, k, WordKind::CombinationsWithReplacement, label)
    }

    /// Creates one variable per sequence of `k` distinct elements of
    /// `1..=n`. `k` defaults to `n`.
    pub fn new_permutations(
        &mut self,
        n: usize,
        k: Option<usize>,
        label: Option<&str>,
    ) -> Result<Arc<Words>, Error> {
        self.new_words(n, k.unwrap_or(n), WordKind::Permutations, label)
    }

    /// Creates one variable per edge of a bipartite graph
    pub fn new_bipartite_edges(
        &mut self,
        graph: &BipartiteGraph,
        label: Option<&str>,
    ) -> Result<Arc<BipartiteEdges>, Error> {
        self.register(BipartiteEdges::new(self.next_id(), graph, label)?)
    }

    /// Creates one variable per edge of a simple graph
    pub fn new_graph_edges(
        &mut self,
        graph: &Graph,
        label: Option<&str>,
    ) -> Result<Arc<GraphEdges>, Error> {
        self.register(GraphEdges::new(self.next_id(), graph, label)?)
    }

    /// Creates one variable per edge of a directed graph, grouped as given by
    /// `order`
    pub fn new_digraph_edges(
        &mut self,
        graph: &DiGraph,
        order: EdgeOrder,
        label: Option<&str>,
    ) -> Result<Arc<DigraphEdges>, Error> {
        self.register(DigraphEdges::new(self.next_id(), graph, order, label)?)
    }

    /// Creates the variables of a mapping from `1..=n` to `1..=m` in unary
    /// representation
    pub fn new_mapping(
        &mut self,
        n: usize,
        m: usize,
        label: Option<&str>,
    ) -> Result<Arc<UnaryMapping>, Error> {
        self.new_sparse_mapping(&BipartiteGraph::complete(n, m), label)
    }

    /// Creates the variables of a mapping in unary representation where
    /// element `u` may only be mapped to the right neighbors of `u`
    pub fn new_sparse_mapping(
        &mut self,
        graph: &BipartiteGraph,
        label: Option<&str>,
    ) -> Result<Arc<UnaryMapping>, Error> {
        self.register(UnaryMapping::new(self.next_id(), graph, label)?)
    }

    /// Creates the variables of a mapping from `1..=n` to `0..m` in binary
    /// representation
    pub fn new_binary_mapping(
        &mut self,
        n: usize,
        m: usize,
        label: Option<&str>,
    ) -> Result<Arc<BinaryMapping>, Error> {
        self.register(BinaryMapping::new(self.next_id(), n, m, label)?)
    }

    /// Adds a clause and raises the number of variables to the highest
    /// variable of the clause
    pub fn add_clause(&mut self, clause: Clause) {
        if let Some(max) = clause.max_vid() {
            self.store.update_variable_number(max);
        }
        self.store.push_clause(clause);
    }

    /// Adds a clause given as DIMACS integers. Returns
    /// [`Error::InvalidLiteral`] if a literal is zero.
    pub fn add_dimacs_clause(&mut self, lits: &[i32]) -> Result<(), Error> {
        self.add_clause(Clause::from_dimacs(lits)?);
        Ok(())
    }

    /// Adds a clause without touching the number of variables. The formula
    /// is only well-formed afterwards if the variables of the clause were
    /// already in use, which [`Formula::debug`] can audit.
    pub fn add_clause_unchecked(&mut self, clause: Clause) {
        self.store.push_clause(clause);
    }

    fn check_lits(&self, lits: &[Lit]) -> Result<(), Error> {
        let n_vars = self.store.n_vars();
        match lits.iter().find(|l| l.vid() > n_vars) {
            Some(l) => Err(Error::InvalidArgument(format!(
                "literal {l} refers to a variable beyond the {n_vars} variables of the formula"
            ))),
            None => Ok(()),
        }
    }

    fn check_owned(&self, group: &dyn VariableGroup) -> Result<(), Error> {
        if !self.vars.owns(group) {
            return Err(Error::InvalidArgument(
                "the mapping was not created by this formula".to_string(),
            ));
        }
        Ok(())
    }

    /// Adds the constraint that the exclusive or of `lits` is `constant`.
    /// See [`parity::encode`].
    pub fn add_parity(&mut self, lits: &[Lit], constant: usize) -> Result<(), Error> {
        self.check_lits(lits)?;
        let before = self.number_of_clauses();
        parity::encode(lits, constant, self)?;
        debug!(
            "parity over {} literals added {} clauses",
            lits.len(),
            self.number_of_clauses() - before
        );
        Ok(())
    }

    /// Adds the constraint `Σ lits op value`. On a [`Cnf`] store this adds
    /// the clauses of [`card::encode`], on an [`Opb`] store a single
    /// constraint unless `op` is `!=` or the normalized bound overflows.
    pub fn add_linear(&mut self, lits: &[Lit], op: RelOp, value: isize) -> Result<(), Error> {
        self.check_lits(lits)?;
        let before = self.number_of_clauses();
        self.store.push_linear(lits, op, value);
        debug!(
            "linear constraint over {} literals {op} {value} added {} constraints",
            lits.len(),
            self.number_of_clauses() - before
        );
        Ok(())
    }

    /// At least half of the literals are true
    pub fn add_loose_majority(&mut self, lits: &[Lit]) -> Result<(), Error> {
        self.add_linear(lits, RelOp::Ge, card::loose_majority_bound(lits.len()))
    }

    /// At most half of the literals are true
    pub fn add_loose_minority(&mut self, lits: &[Lit]) -> Result<(), Error> {
        self.add_linear(lits, RelOp::Le, card::loose_minority_bound(lits.len()))
    }

    /// More than half of the literals are true
    pub fn add_strict_majority(&mut self, lits: &[Lit]) -> Result<(), Error> {
        self.add_linear(lits, RelOp::Ge, card::strict_majority_bound(lits.len()))
    }

    /// Fewer than half of the literals are true
    pub fn add_strict_minority(&mut self, lits: &[Lit]) -> Result<(), Error> {
        self.add_linear(lits, RelOp::Le, card::strict_minority_bound(lits.len()))
    }

    fn log_axiom(&self, axiom: &str, before: usize) {
        debug!(
            "{axiom} mapping axiom added {} constraints",
            self.number_of_clauses() - before
        );
    }

    /// Every element of the domain is mapped to some element of the range
    pub fn force_complete_mapping<'a, M: Into<Mapping<'a>>>(&mut self, f: M) -> Result<(), Error> {
        let f = f.into();
        self.check_owned(f.group())?;
        let before = self.number_of_clauses();
        match f {
            Mapping::Unary(f) => mapping::complete_unary(f, self)?,
            Mapping::Binary(f) => mapping::complete_binary(f, self)?,
        }
        self.log_axiom("complete", before);
        Ok(())
    }

    /// Every element of the domain is mapped to at most one element. Binary
    /// mappings are functional by construction and add nothing.
    pub fn force_functional_mapping<'a, M: Into<Mapping<'a>>>(
        &mut self,
        f: M,
    ) -> Result<(), Error> {
        let f = f.into();
        self.check_owned(f.group())?;
        let before = self.number_of_clauses();
        if let Mapping::Unary(f) = f {
            mapping::functional_unary(f, self)?;
        }
        self.log_axiom("functional", before);
        Ok(())
    }

    /// Every element of the range has a preimage
    pub fn force_surjective_mapping(&mut self, f: &UnaryMapping) -> Result<(), Error> {
        self.check_owned(f)?;
        let before = self.number_of_clauses();
        mapping::surjective_unary(f, self)?;
        self.log_axiom("surjective", before);
        Ok(())
    }

    /// No two elements of the domain are mapped to the same element.
    ///
    /// For binary mappings the axiom only covers the values of the range, so
    /// it should be combined with [`Formula::force_complete_mapping`].
    pub fn force_injective_mapping<'a, M: Into<Mapping<'a>>>(&mut self, f: M) -> Result<(), Error> {
        let f = f.into();
        self.check_owned(f.group())?;
        let before = self.number_of_clauses();
        match f {
            Mapping::Unary(f) => mapping::injective_unary(f, self)?,
            Mapping::Binary(f) => mapping::injective_binary(f, self)?,
        }
        self.log_axiom("injective", before);
        Ok(())
    }

    /// Smaller elements of the domain are not mapped to larger elements of
    /// the range than larger elements of the domain
    pub fn force_nondecreasing_mapping<'a, M: Into<Mapping<'a>>>(
        &mut self,
        f: M,
    ) -> Result<(), Error> {
        let f = f.into();
        self.check_owned(f.group())?;
        let before = self.number_of_clauses();
        match f {
            Mapping::Unary(f) => mapping::nondecreasing_unary(f, self)?,
            Mapping::Binary(f) => mapping::nondecreasing_binary(f, self)?,
        }
        self.log_axiom("nondecreasing", before);
        Ok(())
    }

    /// Labels of all variables `1..=n`. Variables outside of any group are
    /// labelled `x<id>`.
    pub fn all_variable_labels(&self) -> Vec<String> {
        self.vars.labels(self.store.n_vars(), &LabelFormat::variable())
    }

    /// Labels of all variables `1..=n`, variables outside of any group are
    /// labelled with `default`, a format with one placeholder for the
    /// variable identifier
    pub fn all_variable_labels_with(&self, default: &str) -> Result<Vec<String>, Error> {
        Ok(self
            .vars
            .labels(self.store.n_vars(), &LabelFormat::parse(default, 1)?))
    }

    /// Checks that the formula is well-formed: every variable is in
    /// `1..=n`, every coefficient is positive, and unless allowed no
    /// constraint contains a repeated literal or a literal together with its
    /// negation. Problems are logged as warnings.
    pub fn debug(&self, allow_opposite: bool, allow_repetition: bool) -> bool {
        let n_vars = self.store.n_vars();
        for (idx, constr) in self.store.constraints().iter().enumerate() {
            if let Some((l, _)) = S::to_pb(constr).iter().find(|&&(_, w)| w == 0) {
                warn!("constraint {idx} has coefficient 0 for {l}");
                return false;
            }
            let mut lits = S::constraint_lits(constr);
            if let Some(l) = lits.iter().find(|l| l.vid() > n_vars) {
                warn!("constraint {idx} contains {l} beyond the {n_vars} variables");
                return false;
            }
            lits.sort_unstable();
            for pair in lits.windows(2) {
                if pair[0] == pair[1] && !allow_repetition {
                    warn!("constraint {idx} repeats literal {}", pair[0]);
                    return false;
                }
                if pair[0] == !pair[1] && !allow_opposite {
                    warn!("constraint {idx} contains {} and its negation", pair[0]);
                    return false;
                }
            }
        }
        true
    }

    /// Writes the formula in OPB format. Clauses are written as constraints
    /// `Σ l_i >= 1`.
    pub fn write_opb<W: io::Write>(&self, writer: &mut W, opts: WriteOptions) -> io::Result<()> {
        let labels = opts.export_varnames.then(|| self.all_variable_labels());
        fio::opb::write_opb(
            writer,
            opts.export_header.then_some(self.header.as_slice()),
            labels.as_deref(),
            self.store.n_vars(),
            self.store.constraints().iter().map(S::to_pb),
        )
    }

    /// Writes the formula in OPB format to a file. With feature
    /// `compression`, `.gz`, `.bz2` and `.xz` files are compressed.
    pub fn write_opb_path<P: AsRef<Path>>(&self, path: P, opts: WriteOptions) -> io::Result<()> {
        let mut writer = fio::open_compressed_uncompressed_write(path)?;
        self.write_opb(&mut writer, opts)?;
        writer.flush()
    }

    /// Returns a formula with randomly renamed variables, randomly flipped
    /// polarities and a random order of constraints. Variable groups are not
    /// carried over.
    #[cfg(feature = "rand")]
    pub fn shuffle<R: rand::Rng + ?Sized>(&self, rng: &mut R, opts: ShuffleOptions) -> Self {
        use rand::seq::SliceRandom;

        let n_vars = self.store.n_vars();
        // unchecked clauses may mention variables beyond `n_vars`, these keep
        // their identifier
        let max_var = self
            .store
            .constraints()
            .iter()
            .flat_map(S::constraint_lits)
            .map(|l| l.vid())
            .fold(n_vars, u32::max);
        let mut rename: Vec<u32> = (1..=max_var).collect();
        if opts.variables {
            rename[..n_vars as usize].shuffle(rng);
        }
        let flip: Vec<bool> = (0..max_var)
            .map(|_| opts.polarity && rng.random_bool(0.5))
            .collect();
        let mut positions: Vec<usize> = (0..self.store.n_constraints()).collect();
        if opts.constraints {
            positions.shuffle(rng);
        }

        let mut store = self.store.clone();
        store.substitute(|l| {
            let idx = l.vid() as usize - 1;
            Lit::new_unchecked(rename[idx], l.is_neg() != flip[idx])
        });
        store.permute(&positions);

        let mut shuffled = Formula {
            store,
            vars: VarManager::default(),
            header: self.header.clone(),
        };
        let description = match self.description() {
            Some(desc) => format!("{desc} (reshuffled)"),
            None => "(reshuffled)".to_string(),
        };
        shuffled.set_header("description", &description);
        let field = (1..)
            .map(|i| format!("transformation {i}"))
            .find(|f| self.header_field(f).is_none())
            .unwrap_or_default();
        shuffled.set_header(&field, "Formula reshuffling");
        debug!(
            "shuffled formula with {n_vars} variables and {} constraints",
            shuffled.number_of_clauses()
        );
        shuffled
    }
}

impl Formula<Cnf> {
    /// Gets the clauses of the formula
    pub fn clauses(&self) -> &[Clause] {
        self.store.clauses()
    }

    /// Writes the formula in DIMACS CNF format
    pub fn write_dimacs<W: io::Write>(&self, writer: &mut W, opts: WriteOptions) -> io::Result<()> {
        let labels = opts.export_varnames.then(|| self.all_variable_labels());
        fio::dimacs::write_cnf(
            writer,
            opts.export_header.then_some(self.header.as_slice()),
            labels.as_deref(),
            self.store.n_vars(),
            self.store.clauses(),
        )
    }

    /// Writes the formula in DIMACS CNF format to a file. With feature
    /// `compression`, `.gz`, `.bz2` and `.xz` files are compressed.
    pub fn write_dimacs_path<P: AsRef<Path>>(
        &self,
        path: P,
        opts: WriteOptions,
    ) -> io::Result<()> {
        let mut writer = fio::open_compressed_uncompressed_write(path)?;
        self.write_dimacs(&mut writer, opts)?;
        writer.flush()
    }

    /// Parses a DIMACS CNF formula. `name` is used in the description of the
    /// formula.
    pub fn from_dimacs<R: BufRead>(reader: R, name: &str) -> Result<Self, fio::dimacs::Error> {
        let (n_vars, clauses) = fio::dimacs::parse_cnf(reader)?;
        let mut formula = Self::with_description(&format!("Formula from DIMACS file {name}"));
        formula.update_variable_number(n_vars);
        formula.extend(clauses);
        Ok(formula)
    }

    /// Parses a DIMACS CNF file. With feature `compression`, `.gz`, `.bz2`
    /// and `.xz` files are decompressed.
    pub fn from_dimacs_path<P: AsRef<Path>>(path: P) -> Result<Self, fio::dimacs::Error> {
        let path = path.as_ref();
        let reader = io::BufReader::new(fio::open_compressed_uncompressed_read(path)?);
        Self::from_dimacs(reader, &path.display().to_string())
    }
}

impl Formula<Opb> {
    /// Adds the pseudo-boolean constraint `Σ w_i·l_i op bound` and raises the
    /// number of variables to its highest variable
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for `!=`, zero coefficients and bounds
    /// overflowing in normalization.
    pub fn add_constraint<LI: IWLitIter>(
        &mut self,
        lits: LI,
        op: RelOp,
        bound: isize,
    ) -> Result<(), Error> {
        self.store.add_constraint(lits, op, bound)?;
        debug!("added pseudo-boolean constraint {op} {bound}");
        Ok(())
    }
}

impl<S: ConstraintStore> CollectClauses for Formula<S> {
    fn n_clauses(&self) -> usize {
        self.store.n_constraints()
    }

    fn add_clause(&mut self, clause: Clause) {
        Formula::add_clause(self, clause);
    }

    fn add_linear(&mut self, lits: &[Lit], op: RelOp, value: isize) {
        if let Some(max) = lits.iter().map(Lit::vid).max() {
            self.store.update_variable_number(max);
        }
        self.store.push_linear(lits, op, value);
    }
}

impl<S: ConstraintStore> Extend<Clause> for Formula<S> {
    fn extend<T: IntoIterator<Item = Clause>>(&mut self, iter: T) {
        iter.into_iter().for_each(|cl| self.add_clause(cl));
    }
}

/// Which parts of a formula [`Formula::shuffle`] randomizes
#[cfg(feature = "rand")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShuffleOptions {
    /// Rename the variables with a random permutation
    pub variables: bool,
    /// Flip the polarity of each variable with probability 1/2
    pub polarity: bool,
    /// Randomly reorder the constraints
    pub constraints: bool,
}

#[cfg(feature = "rand")]
impl Default for ShuffleOptions {
    fn default() -> Self {
        Self {
            variables: true,
            polarity: true,
            constraints: true,
        }
    }
}
