//! A single walk of the propagation loop: a target value is propagated from a node down the term
//! graph until it reaches a variable, selecting at every operator the child which should change
//! and the value it should take.
use log::trace;

use super::model::Model;
use super::observer::PropagationObserver;
use super::propagation_queue::PropagationEntry;
use super::solver_statistics::EngineStatistics;
use super::EntailedPropagation;
use super::SolverOptions;
use crate::basic_types::shuffle;
use crate::basic_types::BitVector;
use crate::basic_types::Random;
use crate::containers::KeyedVec;
use crate::domains::BitDomain;
use crate::propagators::consistent_value;
use crate::propagators::inverse_value;
use crate::propagators::is_essential;
use crate::terms::BvOp;
use crate::terms::NodeId;
use crate::terms::NodeKind;
use crate::terms::TermGraph;

/// The options which steer the choices made while walking.
#[derive(Clone, Copy, Debug)]
pub(crate) struct WalkParameters {
    pub(crate) prob_use_inverse_value: f64,
    pub(crate) prob_flip_condition: f64,
    pub(crate) prob_flip_condition_const: f64,
    pub(crate) flip_condition_const_delta: f64,
    pub(crate) flip_condition_const_npathsel: u64,
    pub(crate) entailed_propagation: EntailedPropagation,
}

impl From<&SolverOptions> for WalkParameters {
    fn from(options: &SolverOptions) -> Self {
        WalkParameters {
            prob_use_inverse_value: options.prob_use_inverse_value,
            prob_flip_condition: options.prob_flip_condition,
            prob_flip_condition_const: options.prob_flip_condition_const,
            flip_condition_const_delta: options.flip_condition_const_delta,
            flip_condition_const_npathsel: options.flip_condition_const_npathsel,
            entailed_propagation: options.entailed_propagation,
        }
    }
}

/// The state of the search which a walk reads, together with the parts it updates.
pub(crate) struct WalkContext<'a> {
    pub(crate) terms: &'a TermGraph,
    pub(crate) domains: &'a KeyedVec<NodeId, BitDomain>,
    pub(crate) model: &'a Model,
    pub(crate) random: &'a mut dyn Random,
    pub(crate) statistics: &'a mut EngineStatistics,
    pub(crate) observer: &'a mut Option<Box<dyn PropagationObserver>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WalkOutcome {
    /// The walk reached `variable`, which should take `value`.
    Leaf { variable: NodeId, value: BitVector },
    /// The walk ended at a node of which no child can produce its target.
    Conflict,
}

#[derive(Clone, Debug)]
pub(crate) struct PropagationLoop {
    parameters: WalkParameters,
    /// The current probability of flipping the condition of an if-then-else whose enabled branch
    /// is fixed; drifts during a round
    prob_flip_condition_const: f64,
    flip_condition_const_delta: f64,
    /// The number of path selections since the last drift
    path_selections: u64,
    /// The entailed propagations recorded during the last walk
    entailed: Vec<PropagationEntry>,
}

impl PropagationLoop {
    pub(crate) fn new(parameters: WalkParameters) -> PropagationLoop {
        let mut propagation_loop = PropagationLoop {
            parameters,
            prob_flip_condition_const: 0.0,
            flip_condition_const_delta: 0.0,
            path_selections: 0,
            entailed: vec![],
        };
        propagation_loop.reset_round();
        propagation_loop
    }

    /// Resets the drifting flip probability; the drift initially points towards `0.5`.
    pub(crate) fn reset_round(&mut self) {
        self.prob_flip_condition_const = self.parameters.prob_flip_condition_const;
        self.flip_condition_const_delta = if self.prob_flip_condition_const <= 0.5 {
            self.parameters.flip_condition_const_delta
        } else {
            -self.parameters.flip_condition_const_delta
        };
        self.path_selections = 0;
    }

    pub(crate) fn entailed(&self) -> &[PropagationEntry] {
        &self.entailed
    }

    /// Propagates the target of `start` down to a variable.
    pub(crate) fn walk(
        &mut self,
        context: &mut WalkContext<'_>,
        start: PropagationEntry,
        is_entailed: bool,
    ) -> WalkOutcome {
        self.entailed.clear();
        if let Some(observer) = context.observer.as_mut() {
            observer.on_walk_started();
        }

        let PropagationEntry {
            mut node,
            mut target,
            mut forced_child,
        } = start;
        loop {
            context.statistics.steps += 1;
            if is_entailed {
                context.statistics.steps_entailed += 1;
            }
            if let Some(observer) = context.observer.as_mut() {
                observer.on_propagation(node, target);
            }
            trace!("Propagating {target} to {node}");

            let op = match context.terms.kind(node) {
                NodeKind::Variable => {
                    return WalkOutcome::Leaf {
                        variable: node,
                        value: target,
                    }
                }
                NodeKind::Constant(_) => {
                    context.statistics.fixed_conflicts += 1;
                    return WalkOutcome::Conflict;
                }
                NodeKind::Operator(op) => op,
            };

            let operands = context.model.operands(context.terms, node);
            let selection = match (op, forced_child) {
                (BvOp::Ite, None) => self.select_ite_path(context, node, target, &operands),
                _ => self.select_child(context, node, op, target, &operands, forced_child),
            };
            let Some((position, value)) = selection else {
                context.statistics.non_recoverable_conflicts += 1;
                trace!("No child of {node} can produce {target}");
                return WalkOutcome::Conflict;
            };

            node = context.terms.children(node)[position];
            target = value;
            forced_child = None;
        }
    }

    /// Selects a child of `node` and its new value; essential children are preferred and inverse
    /// values are preferred over consistent ones.
    fn select_child(
        &mut self,
        context: &mut WalkContext<'_>,
        node: NodeId,
        op: BvOp,
        target: BitVector,
        operands: &[BitVector],
        forced_child: Option<usize>,
    ) -> Option<(usize, BitVector)> {
        let domains = context
            .terms
            .children(node)
            .iter()
            .map(|&child| context.domains[child])
            .collect::<Vec<_>>();
        let candidates = match forced_child {
            Some(position) => vec![position],
            None => (0..domains.len()).collect(),
        };
        let (mut ordered, mut inessential): (Vec<usize>, Vec<usize>) = candidates
            .into_iter()
            .filter(|&position| !domains[position].is_fixed())
            .partition(|&position| is_essential(&op, target, operands, position, &domains));
        if ordered.is_empty() && inessential.is_empty() {
            context.statistics.fixed_conflicts += 1;
            return None;
        }
        shuffle(&mut ordered, context.random);
        shuffle(&mut inessential, context.random);
        ordered.append(&mut inessential);

        for &position in &ordered {
            let domain = &domains[position];
            let Some(inverse) =
                inverse_value(&op, target, operands, position, domain, context.random)
            else {
                continue;
            };
            context.statistics.inverse_values.increment(op.kind());

            if context
                .random
                .generate_bool(1.0 - self.parameters.prob_use_inverse_value)
            {
                if let Some(consistent) =
                    consistent_value(&op, target, operands, position, domain, context.random)
                {
                    context.statistics.consistent_values.increment(op.kind());
                    context.statistics.consistent_propagations += 1;
                    return Some((position, consistent));
                }
            }
            context.statistics.inverse_propagations += 1;
            return Some((position, inverse));
        }

        for &position in &ordered {
            let domain = &domains[position];
            let Some(consistent) =
                consistent_value(&op, target, operands, position, domain, context.random)
            else {
                continue;
            };
            context.statistics.consistent_values.increment(op.kind());
            context.statistics.consistent_propagations += 1;
            context.statistics.recoverable_conflicts += 1;

            if self.parameters.entailed_propagation != EntailedPropagation::Off {
                self.entailed.extend(
                    ordered
                        .iter()
                        .filter(|&&other| other != position)
                        .map(|&other| PropagationEntry {
                            node,
                            target,
                            forced_child: Some(other),
                        }),
                );
            }
            return Some((position, consistent));
        }
        None
    }

    /// Decides whether the walk continues through the condition or through the enabled branch of
    /// an if-then-else.
    fn select_ite_path(
        &mut self,
        context: &mut WalkContext<'_>,
        node: NodeId,
        target: BitVector,
        operands: &[BitVector],
    ) -> Option<(usize, BitVector)> {
        let children = context.terms.children(node);
        let condition_domain = context.domains[children[0]];
        let enabled = if operands[0].is_true() { 1 } else { 2 };

        let flip = if condition_domain.is_fixed() {
            false
        } else if context.domains[children[enabled]].is_fixed() {
            self.flip_condition_const(context.random)
        } else {
            context
                .random
                .generate_bool(self.parameters.prob_flip_condition)
        };
        if !flip {
            return self.select_child(context, node, BvOp::Ite, target, operands, Some(enabled));
        }

        match inverse_value(
            &BvOp::Ite,
            target,
            operands,
            0,
            &condition_domain,
            context.random,
        ) {
            Some(condition) => {
                context.statistics.inverse_values.increment(BvOp::Ite.kind());
                context.statistics.inverse_propagations += 1;
                Some((0, condition))
            }
            None => {
                context.statistics.recoverable_conflicts += 1;
                Some((0, !operands[0]))
            }
        }
    }

    /// Flips with the drifting probability; after every `flip_condition_const_npathsel` calls
    /// the probability moves by the delta, which reverses at the bounds `0` and `1`.
    fn flip_condition_const(&mut self, random: &mut dyn Random) -> bool {
        let flip = random.generate_bool(self.prob_flip_condition_const);
        self.path_selections += 1;
        if self.path_selections >= self.parameters.flip_condition_const_npathsel {
            self.path_selections = 0;
            if !(0.0..=1.0)
                .contains(&(self.prob_flip_condition_const + self.flip_condition_const_delta))
            {
                self.flip_condition_const_delta = -self.flip_condition_const_delta;
            }
            self.prob_flip_condition_const = (self.prob_flip_condition_const
                + self.flip_condition_const_delta)
                .clamp(0.0, 1.0);
        }
        flip
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::basic_types::TestRandom;
    use crate::domains::forward::compute_domains;
    use crate::engine::InitialValues;

    fn parameters() -> WalkParameters {
        WalkParameters::from(&SolverOptions::default())
    }

    #[test]
    fn walks_end_at_a_variable_with_an_inverse_value() {
        let mut terms = TermGraph::default();
        let x = terms.new_variable(4).unwrap();
        let one = terms.constant(BitVector::one(4));
        let zero = terms.constant(BitVector::zero(4));
        let sum = terms.add(x, one).unwrap();
        let equal = terms.eq(sum, zero).unwrap();
        let domains = compute_domains(&terms, true);
        let mut rng = SmallRng::seed_from_u64(42);
        let model = Model::initialise(&terms, &domains, InitialValues::Zero, &mut rng);

        let mut statistics = EngineStatistics::default();
        let mut observer = None;
        let mut context = WalkContext {
            terms: &terms,
            domains: &domains,
            model: &model,
            random: &mut rng,
            statistics: &mut statistics,
            observer: &mut observer,
        };

        let mut propagation_loop = PropagationLoop::new(parameters());
        let mut outcome = propagation_loop.walk(
            &mut context,
            PropagationEntry::new(equal, BitVector::one(1)),
            false,
        );
        // With probability 0.01 per step the walk uses a consistent value; it then has to retry.
        while outcome
            != (WalkOutcome::Leaf {
                variable: x,
                value: BitVector::ones(4),
            })
        {
            outcome = propagation_loop.walk(
                &mut context,
                PropagationEntry::new(equal, BitVector::one(1)),
                false,
            );
        }
        assert!(statistics.steps >= 3);
        assert!(statistics.inverse_values.get(crate::terms::OpKind::Add) >= 1);
    }

    #[test]
    fn fixed_children_cause_a_conflict() {
        let mut terms = TermGraph::default();
        let two = terms.constant(BitVector::new(2, 4));
        let three = terms.constant(BitVector::new(3, 4));
        let product = terms.mul(two, three).unwrap();
        let domains = compute_domains(&terms, false);
        let mut rng = TestRandom::default();
        let model = Model::initialise(&terms, &domains, InitialValues::Zero, &mut rng);

        let mut statistics = EngineStatistics::default();
        let mut observer = None;
        let mut context = WalkContext {
            terms: &terms,
            domains: &domains,
            model: &model,
            random: &mut rng,
            statistics: &mut statistics,
            observer: &mut observer,
        };

        let outcome = PropagationLoop::new(parameters()).walk(
            &mut context,
            PropagationEntry::new(product, BitVector::new(1, 4)),
            true,
        );
        assert_eq!(outcome, WalkOutcome::Conflict);
        assert_eq!(statistics.fixed_conflicts, 1);
        assert_eq!(statistics.non_recoverable_conflicts, 1);
        assert_eq!(statistics.steps_entailed, 1);
    }

    #[test]
    fn if_then_else_flips_the_condition_or_follows_the_enabled_branch() {
        let mut terms = TermGraph::default();
        let condition = terms.new_variable(1).unwrap();
        let then_branch = terms.new_variable(4).unwrap();
        let else_branch = terms.new_variable(4).unwrap();
        let ite = terms.ite(condition, then_branch, else_branch).unwrap();
        let domains = compute_domains(&terms, true);
        let mut rng = TestRandom {
            usizes: vec![0],
            bools: vec![true, false, false],
            ..TestRandom::default()
        };
        let model = Model::initialise(&terms, &domains, InitialValues::Zero, &mut rng);

        let mut statistics = EngineStatistics::default();
        let mut observer = None;
        let mut context = WalkContext {
            terms: &terms,
            domains: &domains,
            model: &model,
            random: &mut rng,
            statistics: &mut statistics,
            observer: &mut observer,
        };
        let target = BitVector::new(0b0101, 4);
        let mut propagation_loop = PropagationLoop::new(parameters());

        // Flipping the condition does not produce the target since both branches are zero.
        let outcome = propagation_loop.walk(&mut context, PropagationEntry::new(ite, target), false);
        assert_eq!(
            outcome,
            WalkOutcome::Leaf {
                variable: condition,
                value: BitVector::one(1),
            }
        );

        // Without a flip the target is propagated to the enabled else-branch.
        let outcome = propagation_loop.walk(&mut context, PropagationEntry::new(ite, target), false);
        assert_eq!(
            outcome,
            WalkOutcome::Leaf {
                variable: else_branch,
                value: target,
            }
        );
        assert_eq!(statistics.recoverable_conflicts, 1);
        assert_eq!(statistics.inverse_propagations, 1);
    }

    #[test]
    fn recoverable_conflicts_record_entailed_propagations() {
        let mut terms = TermGraph::default();
        let x = terms.new_variable(2).unwrap();
        let y = terms.new_variable(2).unwrap();
        let conjunction = terms.and(x, y).unwrap();
        let domains = compute_domains(&terms, true);
        let mut rng = SmallRng::seed_from_u64(3);
        let model = Model::initialise(&terms, &domains, InitialValues::Zero, &mut rng);

        let mut statistics = EngineStatistics::default();
        let mut observer = None;
        let mut context = WalkContext {
            terms: &terms,
            domains: &domains,
            model: &model,
            random: &mut rng,
            statistics: &mut statistics,
            observer: &mut observer,
        };

        let mut parameters = parameters();
        parameters.entailed_propagation = EntailedPropagation::All;
        let mut propagation_loop = PropagationLoop::new(parameters);
        // x & 00 = 11 has no inverse value for x (nor for y), but both are consistent.
        let outcome = propagation_loop.walk(
            &mut context,
            PropagationEntry::new(conjunction, BitVector::new(3, 2)),
            false,
        );
        let WalkOutcome::Leaf { variable, value } = outcome else {
            panic!("a consistent value exists");
        };
        assert_eq!(value, BitVector::new(3, 2));
        assert_eq!(statistics.recoverable_conflicts, 1);

        let entailed = propagation_loop.entailed();
        assert_eq!(entailed.len(), 1);
        let sibling = if variable == x { 1 } else { 0 };
        assert_eq!(entailed[0].forced_child, Some(sibling));
        assert_eq!(entailed[0].target, BitVector::new(3, 2));
    }

    #[test]
    fn flip_probability_drifts_and_reverses() {
        let mut parameters = parameters();
        parameters.prob_flip_condition_const = 0.9;
        parameters.flip_condition_const_npathsel = 1;
        let mut propagation_loop = PropagationLoop::new(parameters);
        let mut rng = SmallRng::seed_from_u64(42);

        let _ = propagation_loop.flip_condition_const(&mut rng);
        assert!((propagation_loop.prob_flip_condition_const - 0.8).abs() < 1e-9);
        for _ in 0..8 {
            let _ = propagation_loop.flip_condition_const(&mut rng);
        }
        assert!(propagation_loop.prob_flip_condition_const.abs() < 1e-9);
        let _ = propagation_loop.flip_condition_const(&mut rng);
        assert!((propagation_loop.prob_flip_condition_const - 0.1).abs() < 1e-9);

        propagation_loop.reset_round();
        assert!((propagation_loop.prob_flip_condition_const - 0.9).abs() < 1e-9);
    }
}
