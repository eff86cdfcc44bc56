//! Timed execution of a solver with cooperative cancellation.
//!
//! [`TimedRunner::run`] measures one `solve()` call and, when given a
//! deadline, arms a scoped timer thread that requests a stop through the
//! solver's [`StopHandle`] once the deadline passes. The solve itself always
//! runs on the calling thread.

use crate::algorithm::Algorithm;
use crate::solution::Solution;
use log::{debug, info};
use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// Outcome of one timed run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TestResult {
    /// Wall-clock time spent in `solve()`.
    pub duration: Duration,
    /// Best tour at the end of the run.
    pub solution: Solution,
    /// `false` if the run was cut short by the deadline.
    pub completed: bool,
}

impl TestResult {
    pub fn duration_micros(&self) -> u128 {
        self.duration.as_micros()
    }
}

/// One CSV record: `micros,0->1->…->0,cost,completed`.
impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},", self.duration_micros())?;
        for (i, city) in self.solution.path.iter().enumerate() {
            if i > 0 {
                f.write_str("->")?;
            }
            write!(f, "{city}")?;
        }
        write!(f, ",{},{}", self.solution.cost, self.completed)
    }
}

/// Runs solvers against an optional wall-clock deadline.
///
/// # Usage
///
/// ```
/// use std::time::Duration;
/// use u_tsp::{BranchAndBoundDfs, DistanceMatrix, TimedRunner};
///
/// let m = DistanceMatrix::from_rows(vec![
///     vec![0, 10, 15, 20],
///     vec![10, 0, 35, 25],
///     vec![15, 35, 0, 30],
///     vec![20, 25, 30, 0],
/// ]).unwrap();
/// let mut bnb = BranchAndBoundDfs::new(m).unwrap();
///
/// let result = TimedRunner::run(&mut bnb, Duration::from_secs(5));
/// assert!(result.completed);
/// assert_eq!(result.solution.cost, 80);
/// ```
pub struct TimedRunner;

impl TimedRunner {
    /// Solves once. `Duration::ZERO` means no deadline.
    ///
    /// The timer thread is armed before the clock starts, so the deadline
    /// covers the whole solve. A timer that fires after the solve returned
    /// has no effect on later runs.
    pub fn run(algorithm: &mut dyn Algorithm, timeout: Duration) -> TestResult {
        info!(
            "runner: starting {} (timeout {:?})",
            algorithm.name(),
            (!timeout.is_zero()).then_some(timeout)
        );

        let (completed, duration) = if timeout.is_zero() {
            Self::measure(algorithm)
        } else {
            Self::run_with_deadline(algorithm, timeout)
        };

        let solution = algorithm.solution();
        info!(
            "runner: {} {} in {:?}, cost {}",
            algorithm.name(),
            if completed { "completed" } else { "timed out" },
            duration,
            solution.cost
        );
        TestResult {
            duration,
            solution,
            completed,
        }
    }

    /// Solves `count` times, clearing the solver between runs.
    pub fn run_repeated(
        algorithm: &mut dyn Algorithm,
        timeout: Duration,
        count: usize,
    ) -> Vec<TestResult> {
        let mut results = Vec::with_capacity(count);
        for i in 0..count {
            if i > 0 {
                algorithm.clear();
            }
            results.push(Self::run(&mut *algorithm, timeout));
        }
        results
    }

    fn measure(algorithm: &mut dyn Algorithm) -> (bool, Duration) {
        let start = Instant::now();
        let completed = algorithm.solve();
        (completed, start.elapsed())
    }

    fn run_with_deadline(algorithm: &mut dyn Algorithm, timeout: Duration) -> (bool, Duration) {
        let stop = algorithm.stop_handle();
        let (armed_tx, armed_rx) = mpsc::sync_channel::<()>(0);
        let (done_tx, done_rx) = mpsc::channel::<()>();

        thread::scope(|scope| {
            scope.spawn(move || {
                if armed_tx.send(()).is_err() {
                    return;
                }
                if let Err(RecvTimeoutError::Timeout) = done_rx.recv_timeout(timeout) {
                    debug!("runner: deadline of {timeout:?} reached, requesting stop");
                    stop.stop();
                }
            });

            // Rendezvous: the timer is waiting before the clock starts.
            let _ = armed_rx.recv();
            let outcome = Self::measure(algorithm);
            let _ = done_tx.send(());
            outcome
        })
    }
}
