//! Houses the local search session which drives the propagation loop: it owns the model, the
//! root set, the propagation queue and the selector, and decides when a round ends.
use std::time::Instant;

use log::debug;
use log::info;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::cone::ConeUpdater;
use super::model::Model;
use super::observer::PropagationObserver;
use super::propagation_loop::PropagationLoop;
use super::propagation_loop::WalkContext;
use super::propagation_loop::WalkOutcome;
use super::propagation_loop::WalkParameters;
use super::propagation_queue::PropagationEntry;
use super::propagation_queue::PropagationQueue;
use super::restart_strategy::RestartOptions;
use super::restart_strategy::RestartStrategy;
use super::roots::RootSet;
use super::score::compute_score;
use super::selection::BanditSelector;
use super::selection::ConstraintSelector;
use super::selection::UniformSelector;
use super::solver_statistics::SolverStatistics;
use super::termination::TerminationCondition;
use crate::basic_types::BitVector;
use crate::basic_types::Solution;
use crate::bvprop_assert_advanced;
use crate::bvprop_assert_moderate;
use crate::containers::HashMap;
use crate::containers::KeyedVec;
use crate::domains::forward::compute_domains;
use crate::domains::BitDomain;
use crate::terms::NodeId;
use crate::terms::TermGraph;

/// How the violated constraint which a move tries to repair is selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ConstraintSelection {
    /// Uniformly at random.
    #[default]
    Uniform,
    /// According to the upper confidence bound of the score of the constraints.
    Bandit,
}

/// Which of the propagations recorded at recoverable conflicts are handled as moves of their own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum EntailedPropagation {
    #[default]
    Off,
    All,
    First,
    Last,
}

/// The values of the variables at the start of every round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum InitialValues {
    /// The smallest value consistent with the domain of the variable.
    #[default]
    Zero,
    /// A random value consistent with the domain of the variable.
    Random,
}

/// Options for the [`Solver`](crate::Solver) which determine how the local search behaves.
#[derive(Debug, Clone)]
pub struct SolverOptions {
    /// The maximum number of propagation steps, over all rounds, before giving up.
    pub step_budget: Option<u64>,
    /// The maximum number of moves, over all rounds, before giving up.
    pub move_budget: Option<u64>,
    /// Whether the search restarts from a fresh assignment when a round ends.
    pub restarts: bool,
    /// The options which determine the length of the rounds.
    pub restart_options: RestartOptions,
    pub constraint_selection: ConstraintSelection,
    /// The constant `C` in the upper confidence bound of the bandit selection.
    pub exploration_constant: f64,
    /// The probability of using an inverse value rather than a consistent value when an operand
    /// is invertible.
    pub prob_use_inverse_value: f64,
    /// The probability of selecting the condition of an if-then-else rather than its enabled
    /// branch.
    pub prob_flip_condition: f64,
    /// The initial probability of selecting the condition of an if-then-else whose enabled branch
    /// is fixed.
    pub prob_flip_condition_const: f64,
    /// The amount by which [`SolverOptions::prob_flip_condition_const`] drifts.
    pub flip_condition_const_delta: f64,
    /// The number of path selections between two drifts of
    /// [`SolverOptions::prob_flip_condition_const`].
    pub flip_condition_const_npathsel: u64,
    /// Whether constant bits are derived for the nodes; values are only ever selected from these
    /// domains.
    pub constant_bits: bool,
    pub entailed_propagation: EntailedPropagation,
    pub initial_values: InitialValues,
    /// The random generator which is used by the search.
    pub random_generator: SmallRng,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions {
            step_budget: None,
            move_budget: None,
            restarts: true,
            restart_options: RestartOptions::default(),
            constraint_selection: ConstraintSelection::default(),
            exploration_constant: 20.0,
            prob_use_inverse_value: 0.99,
            prob_flip_condition: 0.1,
            prob_flip_condition_const: 0.1,
            flip_condition_const_delta: 0.1,
            flip_condition_const_npathsel: 500,
            constant_bits: true,
            entailed_propagation: EntailedPropagation::default(),
            initial_values: InitialValues::default(),
            random_generator: SmallRng::seed_from_u64(42),
        }
    }
}

/// The result of a call to [`LocalSearchSolver::solve`].
#[derive(Debug)]
pub(crate) enum LocalSearchResult {
    Satisfiable(Solution),
    Unsatisfiable,
    Unknown,
}

enum MoveOutcome {
    Applied,
    Interrupted,
}

/// A local search session over a term graph.
///
/// A call to [`LocalSearchSolver::solve`] derives the domains, initialises the model and then
/// makes moves until every constraint has its required value. A move selects a violated
/// constraint (or an entailed propagation), propagates the required value down to a variable and
/// updates the values of every node depending on that variable.
#[derive(Debug)]
pub(crate) struct LocalSearchSolver {
    options: SolverOptions,
    selector: Box<dyn ConstraintSelector>,
    propagation_loop: PropagationLoop,
    queue: PropagationQueue,
    cone: ConeUpdater,
    statistics: SolverStatistics,
    observer: Option<Box<dyn PropagationObserver>>,
}

impl LocalSearchSolver {
    pub(crate) fn new(options: SolverOptions) -> LocalSearchSolver {
        let selector: Box<dyn ConstraintSelector> = match options.constraint_selection {
            ConstraintSelection::Uniform => Box::new(UniformSelector),
            ConstraintSelection::Bandit => {
                Box::new(BanditSelector::new(options.exploration_constant))
            }
        };
        LocalSearchSolver {
            propagation_loop: PropagationLoop::new(WalkParameters::from(&options)),
            options,
            selector,
            queue: PropagationQueue::default(),
            cone: ConeUpdater::default(),
            statistics: SolverStatistics::default(),
            observer: None,
        }
    }

    pub(crate) fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }

    pub(crate) fn set_observer(&mut self, observer: Box<dyn PropagationObserver>) {
        self.observer = Some(observer);
    }

    pub(crate) fn observer(&self) -> Option<&dyn PropagationObserver> {
        self.observer.as_deref()
    }

    /// Searches for an assignment under which every node of `constraints` has its required value.
    ///
    /// The budgets of the options apply to this call only; the statistics accumulate over calls.
    pub(crate) fn solve(
        &mut self,
        terms: &TermGraph,
        constraints: &[(NodeId, bool)],
        termination: &mut impl TerminationCondition,
    ) -> LocalSearchResult {
        let start_time = Instant::now();
        let result = self.search(terms, constraints, termination);
        self.statistics.time_spent_in_solver += start_time.elapsed();
        result
    }

    fn search(
        &mut self,
        terms: &TermGraph,
        constraints: &[(NodeId, bool)],
        termination: &mut impl TerminationCondition,
    ) -> LocalSearchResult {
        let domains = compute_domains(terms, self.options.constant_bits);
        if has_contradiction(constraints, &domains) {
            return LocalSearchResult::Unsatisfiable;
        }

        let mut model = Model::initialise(
            terms,
            &domains,
            self.options.initial_values,
            &mut self.options.random_generator,
        );
        let mut roots = RootSet::new(constraints.to_vec());
        let mut restart_strategy =
            RestartStrategy::new(self.options.restart_options, self.options.restarts);
        let budget_start = (
            self.statistics.engine_statistics.moves,
            self.statistics.engine_statistics.steps,
        );
        self.start_round(terms, &model, &mut roots);

        loop {
            if roots.is_empty() {
                info!(
                    "Found a satisfying assignment after {} moves",
                    self.statistics.engine_statistics.moves - budget_start.0
                );
                return LocalSearchResult::Satisfiable(Solution::from(model.as_reference()));
            }
            if termination.should_stop() || self.budget_exhausted(budget_start) {
                info!("Local search stopped with {} violated constraints", roots.len());
                return LocalSearchResult::Unknown;
            }

            if restart_strategy.should_restart() {
                self.statistics.engine_statistics.restarts += 1;
                info!(
                    "Restart {} after {} moves with {} violated constraints",
                    self.statistics.engine_statistics.restarts,
                    restart_strategy.moves_since_restart(),
                    roots.len()
                );
                model = Model::initialise(
                    terms,
                    &domains,
                    self.options.initial_values,
                    &mut self.options.random_generator,
                );
                self.start_round(terms, &model, &mut roots);
                restart_strategy.notify_restart();
                continue;
            }

            match self.make_move(
                terms,
                &domains,
                &mut model,
                &mut roots,
                termination,
                budget_start.1,
            ) {
                MoveOutcome::Applied => {
                    restart_strategy.notify_move();
                    termination.move_has_been_made();
                }
                MoveOutcome::Interrupted => {}
            }
        }
    }

    /// Forgets everything learned during the previous round and recomputes the violated
    /// constraints (and their scores) under the new model.
    fn start_round(&mut self, terms: &TermGraph, model: &Model, roots: &mut RootSet) {
        self.queue.clear();
        self.selector.on_restart();
        self.propagation_loop.reset_round();
        roots.rebuild(model);
        if self.selector.uses_scores() {
            for &(root, required) in roots.constraints() {
                self.selector
                    .update_score(root, compute_score(terms, model, root, required));
            }
        }
    }

    fn budget_exhausted(&self, (moves_at_start, steps_at_start): (u64, u64)) -> bool {
        let statistics = &self.statistics.engine_statistics;
        self.options
            .move_budget
            .is_some_and(|budget| statistics.moves - moves_at_start >= budget)
            || self.step_budget_exhausted(steps_at_start)
    }

    fn step_budget_exhausted(&self, steps_at_start: u64) -> bool {
        self.options.step_budget.is_some_and(|budget| {
            self.statistics.engine_statistics.steps - steps_at_start >= budget
        })
    }

    /// Walks from an entailed propagation or a violated constraint until a walk reaches a
    /// variable, which is then assigned; walks ending in a conflict are retried.
    fn make_move(
        &mut self,
        terms: &TermGraph,
        domains: &KeyedVec<NodeId, BitDomain>,
        model: &mut Model,
        roots: &mut RootSet,
        termination: &mut impl TerminationCondition,
        steps_at_start: u64,
    ) -> MoveOutcome {
        loop {
            if termination.should_stop() || self.step_budget_exhausted(steps_at_start) {
                return MoveOutcome::Interrupted;
            }

            let (start, is_entailed) = match self.next_entailed(model) {
                Some(entry) => (entry, true),
                None => {
                    let Some(root) = self
                        .selector
                        .select(roots, &mut self.options.random_generator)
                    else {
                        return MoveOutcome::Interrupted;
                    };
                    bvprop_assert_moderate!(roots.contains(root));
                    let Some(required) = roots.required_value(root) else {
                        return MoveOutcome::Interrupted;
                    };
                    debug!(
                        "Selected constraint {root} out of {} violated constraints",
                        roots.len()
                    );
                    (
                        PropagationEntry::new(root, BitVector::from_bool(required)),
                        false,
                    )
                }
            };

            let mut context = WalkContext {
                terms,
                domains,
                model: &*model,
                random: &mut self.options.random_generator,
                statistics: &mut self.statistics.engine_statistics,
                observer: &mut self.observer,
            };
            let WalkOutcome::Leaf { variable, value } =
                self.propagation_loop.walk(&mut context, start, is_entailed)
            else {
                continue;
            };

            self.apply_move(terms, model, roots, variable, value);
            if is_entailed {
                self.statistics.engine_statistics.moves_entailed += 1;
            }
            self.queue.push_entailed(
                self.propagation_loop.entailed(),
                self.options.entailed_propagation,
            );
            if !self.queue.is_empty() {
                debug!("{} entailed propagations are pending", self.queue.len());
            }
            return MoveOutcome::Applied;
        }
    }

    /// Pops entailed propagations until one is found whose node does not have its target yet.
    fn next_entailed(&mut self, model: &Model) -> Option<PropagationEntry> {
        while let Some(entry) = self.queue.pop() {
            if model.value(entry.node) != entry.target {
                return Some(entry);
            }
        }
        None
    }

    fn apply_move(
        &mut self,
        terms: &TermGraph,
        model: &mut Model,
        roots: &mut RootSet,
        variable: NodeId,
        value: BitVector,
    ) {
        debug!("Assigning {value} to {variable}");
        model.set(variable, value);
        let affected = self.cone.update(terms, model, &[variable]);

        let statistics = &mut self.statistics.engine_statistics;
        statistics.moves += 1;
        statistics.cone_updates += affected.len() as u64 - 1;

        for &node in affected {
            roots.refresh(node, model);
            if self.selector.uses_scores() {
                if let Some(required) = roots.required_value(node) {
                    self.selector
                        .update_score(node, compute_score(terms, model, node, required));
                }
            }
        }
        self.selector.on_move();
        bvprop_assert_advanced!(
            roots.agrees_with(model),
            "The violated constraints do not match the model after assigning {variable}"
        );

        if let Some(observer) = self.observer.as_mut() {
            observer.on_move_applied(model.as_reference());
        }
    }
}

/// Detects constraints which can never have their required value: a node which is required to be
/// both `true` and `false`, or a node whose domain is fixed to the other value. Constants always
/// have a fixed domain.
fn has_contradiction(
    constraints: &[(NodeId, bool)],
    domains: &KeyedVec<NodeId, BitDomain>,
) -> bool {
    let mut required_values: HashMap<NodeId, bool> = HashMap::default();
    for &(node, required) in constraints {
        if required_values
            .insert(node, required)
            .is_some_and(|previous| previous != required)
        {
            info!("{node} is required to be both true and false");
            return true;
        }

        let domain = domains[node];
        if domain.is_fixed() && (domain.fixed_values() == 1) != required {
            info!("{node} is fixed to {domain} but is required to be {required}");
            return true;
        }
    }
    false
}
