#![cfg(test)]

use std::thread;
use std::time::Duration;
use std::time::Instant;

use bvprop_core::observers::PropagationPathRecorder;
use bvprop_core::options::SolverOptions;
use bvprop_core::results::SatisfactionResult;
use bvprop_core::termination::CancellationFlag;
use bvprop_core::termination::Combinator;
use bvprop_core::termination::Indefinite;
use bvprop_core::termination::MoveBudget;
use bvprop_core::termination::TimeBudget;
use bvprop_core::BitVector;
use bvprop_core::Solver;

/// Shows the log output of the solver for failing tests, e.g. with `RUST_LOG=debug`.
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A solver for `x & 0100 = 1000` without constant bits, on which the search never ends by itself.
fn endless_solver() -> Solver {
    let options = SolverOptions {
        constant_bits: false,
        ..Default::default()
    };
    let mut solver = Solver::new(options);
    let terms = solver.terms_mut();
    let x = terms.new_variable(4).unwrap();
    let four = terms.constant(BitVector::new(0b0100, 4));
    let eight = terms.constant(BitVector::new(0b1000, 4));
    let masked = terms.and(x, four).unwrap();
    let equal = terms.eq(masked, eight).unwrap();
    solver.assert(equal).unwrap();
    solver
}

#[test]
fn cancelled_flag_stops_before_the_first_move() {
    init_logging();
    let mut solver = endless_solver();
    let mut flag = CancellationFlag::new();
    flag.cancel();

    let result = solver.solve(&mut flag);
    assert!(matches!(result, SatisfactionResult::Unknown));
    assert_eq!(solver.statistics().engine_statistics.moves, 0);
}

#[test]
fn cancellation_from_another_thread() {
    init_logging();
    let mut solver = endless_solver();
    let flag = CancellationFlag::new();
    let canceller = {
        let flag = flag.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            flag.cancel();
        })
    };

    // The time budget only guards against a flag which is never observed.
    let mut termination = Combinator::new(
        flag.clone(),
        TimeBudget::starting_now(Duration::from_secs(30)),
    );
    let start = Instant::now();
    let result = solver.solve(&mut termination);
    canceller.join().unwrap();

    assert!(matches!(result, SatisfactionResult::Unknown));
    assert!(flag.is_cancelled());
    assert!(start.elapsed() < Duration::from_secs(30));
    assert!(solver.statistics().engine_statistics.moves > 0);
}

#[test]
fn time_budget_stops_the_search() {
    init_logging();
    let mut solver = endless_solver();
    let result = solver.solve(&mut TimeBudget::starting_now(Duration::from_millis(20)));
    assert!(matches!(result, SatisfactionResult::Unknown));
    assert!(solver.statistics().time_spent_in_solver > Duration::ZERO);
}

#[test]
fn move_budget_termination_counts_applied_moves() {
    init_logging();
    let mut solver = endless_solver();
    let result = solver.solve(&mut MoveBudget::new(42));
    assert!(matches!(result, SatisfactionResult::Unknown));
    assert_eq!(solver.statistics().engine_statistics.moves, 42);

    // Statistics accumulate over calls while budgets apply per call.
    let result = solver.solve(&mut MoveBudget::new(8));
    assert!(matches!(result, SatisfactionResult::Unknown));
    assert_eq!(solver.statistics().engine_statistics.moves, 50);
}

#[test]
fn recorder_reports_every_move() {
    init_logging();
    let mut solver = Solver::default().with_observer(PropagationPathRecorder::new());
    let terms = solver.terms_mut();
    let x = terms.new_variable(8).unwrap();
    let y = terms.new_variable(8).unwrap();
    let sum = terms.add(x, y).unwrap();
    let target = terms.constant(BitVector::new(77, 8));
    let equal = terms.eq(sum, target).unwrap();
    let less = terms.ult(x, y).unwrap();
    solver.assert(equal).unwrap();
    solver.assert(less).unwrap();

    let result = solver.solve(&mut Indefinite);
    assert!(result.is_satisfiable());

    let recorder = solver
        .observer()
        .and_then(|observer| observer.downcast_ref::<PropagationPathRecorder>())
        .expect("the recorder is installed");
    let summary = recorder.summary();
    assert_eq!(summary.moves, solver.statistics().engine_statistics.moves);
    assert!(summary.propagations >= summary.moves);
    assert_eq!(summary.moves_without_match, 0);
    assert!(summary.matched <= summary.propagations);
    assert!(summary.longest_path >= 1);
    let last = recorder.last_report().expect("at least one move was made");
    assert!(last.matched >= 1 && last.matched <= last.propagations);
}
