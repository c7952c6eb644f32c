//! Measurement-basis grouping.
//!
//! Terms that are diagonal in a common single-qubit basis can be estimated
//! from one histogram. A [`GroupingStrategy`] partitions a term list into
//! [`MeasurementGroup`]s and records, per term, which group it reads from.
//!
//! [`GreedyGrouping`] walks the terms in order and places each one into the
//! first group whose base it is compatible with. Input order decides the
//! order of the groups and which term becomes each group's base. Because
//! compatibility only distinguishes X, Y and "diagonal" per position, the
//! number of groups does not depend on the order.

use tracing::debug;
use varq_ir::{Circuit, QubitId};

use crate::error::VqeResult;
use crate::hamiltonian::{Pauli, PauliString};

/// Terms sharing one measurement basis.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementGroup {
    base: PauliString,
    members: Vec<usize>,
    trivial: bool,
}

impl MeasurementGroup {
    fn new(base: PauliString, first: usize) -> Self {
        let trivial = base.is_identity();
        Self {
            base,
            members: vec![first],
            trivial,
        }
    }

    /// The term that fixes this group's basis.
    pub fn base(&self) -> &PauliString {
        &self.base
    }

    /// Indices of the member terms, in input order.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Whether this group holds only all-identity terms and needs no
    /// measurement.
    pub fn is_trivial(&self) -> bool {
        self.trivial
    }

    /// Append the group's basis rotations and a full measurement to `circuit`.
    ///
    /// X positions of the base get `H`, Y positions get `Sdg` then `H`.
    /// Every qubit is then measured into the classical bit of the same
    /// index, so a member with Z where the base has I still reads a real
    /// outcome.
    pub fn append_measurement(&self, circuit: &mut Circuit) -> VqeResult<()> {
        for (q, p) in self.base.symbols().iter().enumerate() {
            let qid = QubitId(q as u32);
            match p {
                Pauli::X => {
                    circuit.h(qid)?;
                }
                Pauli::Y => {
                    circuit.sdg(qid)?;
                    circuit.h(qid)?;
                }
                Pauli::I | Pauli::Z => {}
            }
        }
        circuit.measure_all()?;
        Ok(())
    }
}

/// Ordered measurement groups plus the term-to-group assignment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeasurementPlan {
    groups: Vec<MeasurementGroup>,
    assignment: Vec<usize>,
}

impl MeasurementPlan {
    /// All groups, trivial ones included.
    pub fn groups(&self) -> &[MeasurementGroup] {
        &self.groups
    }

    /// Number of groups, trivial ones included.
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Number of groups that need an executor call.
    pub fn num_measured_groups(&self) -> usize {
        self.groups.iter().filter(|g| !g.is_trivial()).count()
    }

    /// Number of terms covered by the plan.
    pub fn num_terms(&self) -> usize {
        self.assignment.len()
    }

    /// Group index for `term`, if the term is covered.
    pub fn group_of(&self, term: usize) -> Option<usize> {
        self.assignment.get(term).copied()
    }

    /// Term-to-group map, indexed by term.
    pub fn assignment(&self) -> &[usize] {
        &self.assignment
    }

    fn push_into(&mut self, group: usize, term: usize) {
        self.groups[group].members.push(term);
        self.assignment.push(group);
    }

    fn open(&mut self, base: PauliString, term: usize) -> usize {
        let index = self.groups.len();
        self.groups.push(MeasurementGroup::new(base, term));
        self.assignment.push(index);
        index
    }
}

/// Strategy for partitioning terms into measurement groups.
pub trait GroupingStrategy {
    /// Short name for logs and reports.
    fn name(&self) -> &'static str;

    /// Partition `terms`. Every term lands in exactly one group.
    fn group(&self, terms: &[PauliString]) -> MeasurementPlan;
}

impl<S: GroupingStrategy + ?Sized> GroupingStrategy for &S {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn group(&self, terms: &[PauliString]) -> MeasurementPlan {
        (**self).group(terms)
    }
}

impl<S: GroupingStrategy + ?Sized> GroupingStrategy for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn group(&self, terms: &[PauliString]) -> MeasurementPlan {
        (**self).group(terms)
    }
}

/// First-fit grouping on basis compatibility with each group's base.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyGrouping;

impl GroupingStrategy for GreedyGrouping {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn group(&self, terms: &[PauliString]) -> MeasurementPlan {
        let mut plan = MeasurementPlan::default();
        let mut trivial = None;

        for (i, term) in terms.iter().enumerate() {
            if term.is_identity() {
                match trivial {
                    Some(g) => plan.push_into(g, i),
                    None => trivial = Some(plan.open(term.clone(), i)),
                }
                continue;
            }

            let target = plan
                .groups
                .iter()
                .position(|g| !g.trivial && g.base.basis_compatible(term));
            match target {
                Some(g) => plan.push_into(g, i),
                None => {
                    plan.open(term.clone(), i);
                }
            }
        }

        debug!(
            strategy = self.name(),
            terms = terms.len(),
            groups = plan.num_groups(),
            measured = plan.num_measured_groups(),
            "built measurement plan"
        );
        plan
    }
}

/// One measured group per non-identity term; identity terms still share a
/// trivial group.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndividualGrouping;

impl GroupingStrategy for IndividualGrouping {
    fn name(&self) -> &'static str {
        "individual"
    }

    fn group(&self, terms: &[PauliString]) -> MeasurementPlan {
        let mut plan = MeasurementPlan::default();
        let mut trivial = None;

        for (i, term) in terms.iter().enumerate() {
            match (term.is_identity(), trivial) {
                (true, Some(g)) => plan.push_into(g, i),
                (true, None) => trivial = Some(plan.open(term.clone(), i)),
                (false, _) => {
                    plan.open(term.clone(), i);
                }
            }
        }

        debug!(
            strategy = self.name(),
            terms = terms.len(),
            groups = plan.num_groups(),
            "built measurement plan"
        );
        plan
    }
}
