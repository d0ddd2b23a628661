//! Weighted selection of the day's working set.
//!
//! Each unfinished task stands in the draw `weight` times. A drawn task is
//! taken and all of its copies leave the pool, so the result is sampling
//! without replacement with inclusion odds proportional to weight among what
//! is left at each step. The pool is kept as (task, weight) pairs and drawn
//! by cumulative weight rather than by materialising the copies.

use rand::Rng;
use tracing::debug;

use crate::fields::TaskId;
use crate::task::Task;

/// Default size of the working set.
pub const DEFAULT_LIMIT: usize = 5;

/// Draws working sets from an injected random source.
#[derive(Debug)]
pub struct WeightedSelector<R> {
    rng: R,
    limit: usize,
}

impl<R: Rng> WeightedSelector<R> {
    pub fn new(rng: R, limit: usize) -> Self {
        WeightedSelector { rng, limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Pick up to `limit` distinct unfinished tasks, favouring heavier ones.
    pub fn select(&mut self, tasks: &[Task]) -> Vec<TaskId> {
        select(tasks, self.limit, &mut self.rng)
    }
}

/// One-shot form of [`WeightedSelector::select`].
pub fn select<R: Rng>(tasks: &[Task], limit: usize, rng: &mut R) -> Vec<TaskId> {
    let mut pool: Vec<(TaskId, u32)> = tasks
        .iter()
        .filter(|t| t.is_selectable())
        .map(|t| (t.id, u32::from(t.weight.get())))
        .collect();
    let mut total: u32 = pool.iter().map(|(_, w)| w).sum();
    let mut chosen = Vec::with_capacity(limit.min(pool.len()));

    while chosen.len() < limit && total > 0 {
        let mut ticket = rng.gen_range(0..total);
        let idx = pool
            .iter()
            .position(|&(_, w)| {
                if ticket < w {
                    true
                } else {
                    ticket -= w;
                    false
                }
            })
            .unwrap_or(pool.len() - 1);
        let (id, w) = pool.swap_remove(idx);
        total -= w;
        chosen.push(id);
    }

    debug!(candidates = tasks.len(), chosen = chosen.len(), "selected working set");
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn task(id: u64, weight: i64) -> Task {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        Task::new(TaskId(id), &format!("task {id}"), weight, today).unwrap()
    }

    #[test]
    fn test_empty_and_all_finished_yield_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(select(&[], 5, &mut rng).is_empty());

        let mut tasks = vec![task(1, 3), task(2, 5)];
        tasks.iter_mut().for_each(Task::finish);
        assert!(select(&tasks, 5, &mut rng).is_empty());
    }

    #[test]
    fn test_zero_limit() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(select(&[task(1, 3)], 0, &mut rng).is_empty());
    }

    #[test]
    fn test_never_finished_duplicate_or_over_limit() {
        let mut tasks: Vec<Task> = (1..=12).map(|i| task(i, (i % 5 + 1) as i64)).collect();
        tasks[0].finish();
        tasks[5].finish();
        let mut selector = WeightedSelector::new(StdRng::seed_from_u64(42), DEFAULT_LIMIT);
        assert_eq!(selector.limit(), DEFAULT_LIMIT);

        for _ in 0..500 {
            let picked = selector.select(&tasks);
            assert_eq!(picked.len(), DEFAULT_LIMIT);
            let unique: HashSet<_> = picked.iter().collect();
            assert_eq!(unique.len(), picked.len());
            assert!(!picked.contains(&TaskId(1)));
            assert!(!picked.contains(&TaskId(6)));
        }
    }

    #[test]
    fn test_fewer_candidates_than_limit_returns_all() {
        let tasks = vec![task(1, 1), task(2, 5), task(3, 2)];
        let mut rng = StdRng::seed_from_u64(7);
        let mut picked = select(&tasks, 5, &mut rng);
        picked.sort();
        assert_eq!(picked, vec![TaskId(1), TaskId(2), TaskId(3)]);
    }

    #[test]
    fn test_heavier_task_wins_more_often() {
        let tasks = vec![task(1, 5), task(2, 1)];
        let mut selector = WeightedSelector::new(StdRng::seed_from_u64(2024), 1);
        let trials = 6000;
        let heavy = (0..trials)
            .filter(|_| selector.select(&tasks) == vec![TaskId(1)])
            .count();
        // Expected share is 5/6.
        let share = heavy as f64 / trials as f64;
        assert!(share > 0.78 && share < 0.89, "heavy share was {share}");
    }

    #[test]
    fn test_inclusion_rises_with_weight() {
        let tasks = vec![task(1, 1), task(2, 3), task(3, 5), task(4, 1), task(5, 1)];
        let mut selector = WeightedSelector::new(StdRng::seed_from_u64(9), 2);
        let mut hits = [0usize; 6];
        for _ in 0..5000 {
            for id in selector.select(&tasks) {
                hits[id.0 as usize] += 1;
            }
        }
        assert!(hits[3] > hits[2]);
        assert!(hits[2] > hits[1]);
    }
}
