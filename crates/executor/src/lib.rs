//! Scheduling strategies for labelpress batch jobs.
//!
//! A batch applies the same fallible per-asset pipeline to every requested id.
//! [`Schedule`] decides how many of those run at once; results always come
//! back in input order regardless of completion order.
//!
//! ## Available Schedules
//!
//! - [`Schedule::Sequential`]: one item at a time (the default)
//! - [`Schedule::Bounded`]: up to `n` items in flight
//!
//! ## Usage
//!
//! ```ignore
//! use labelpress_executor::Schedule;
//!
//! let schedule = Schedule::bounded(4);
//! let doubled = schedule.run_all(vec![1, 2, 3], |x| async move { x * 2 }).await;
//! ```

use futures::stream::{self, StreamExt};
use std::fmt;
use std::future::Future;
use std::num::NonZeroUsize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Schedule {
    /// Items run one after another.
    #[default]
    Sequential,

    /// Up to `n` items run concurrently.
    Bounded(NonZeroUsize),
}

impl Schedule {
    /// `Bounded(n)`, or `Sequential` when `n <= 1`.
    pub fn bounded(n: usize) -> Self {
        match NonZeroUsize::new(n) {
            Some(n) if n.get() > 1 => Schedule::Bounded(n),
            _ => Schedule::Sequential,
        }
    }

    /// Runs `f` over every item and returns the outputs in input order.
    pub async fn run_all<T, R, F, Fut>(&self, items: Vec<T>, mut f: F) -> Vec<R>
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = R>,
    {
        match self {
            Schedule::Sequential => {
                let mut results = Vec::with_capacity(items.len());
                for item in items {
                    results.push(f(item).await);
                }
                results
            }
            Schedule::Bounded(n) => stream::iter(items).map(f).buffered(n.get()).collect().await,
        }
    }

    /// Maximum number of items in flight.
    pub fn parallelism(&self) -> usize {
        match self {
            Schedule::Sequential => 1,
            Schedule::Bounded(n) => n.get(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Schedule::Sequential => "sequential",
            Schedule::Bounded(_) => "bounded",
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schedule::Sequential => f.write_str("sequential"),
            Schedule::Bounded(n) => write!(f, "bounded({})", n),
        }
    }
}
