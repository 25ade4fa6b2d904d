//! Ordering tasks by their declared dependencies.

use std::any::TypeId;
use std::collections::{BTreeSet, HashMap};

use super::Task;

/// For each task, the indices of the listed tasks it waits on.
///
/// Dependencies on tasks outside `tasks` are dropped, which is how a single
/// build target runs without its usual prerequisites.
fn prerequisites(tasks: &[&dyn Task]) -> Vec<Vec<usize>> {
    let index: HashMap<TypeId, usize> = tasks
        .iter()
        .enumerate()
        .map(|(i, task)| (task.task_id(), i))
        .collect();
    tasks
        .iter()
        .map(|task| {
            task.dependencies()
                .iter()
                .filter_map(|dep| index.get(dep).copied())
                .collect()
        })
        .collect()
}

/// Indices of `tasks` in an order where every task follows its
/// dependencies, or `None` if they form a cycle.
///
/// Ties go to the task listed first, so the order is stable.
pub fn topological_order(tasks: &[&dyn Task]) -> Option<Vec<usize>> {
    let waits_on = prerequisites(tasks);
    let mut pending: Vec<usize> = waits_on.iter().map(Vec::len).collect();
    let mut unblocks: Vec<Vec<usize>> = vec![Vec::new(); tasks.len()];
    for (task, deps) in waits_on.iter().enumerate() {
        for &dep in deps {
            if let Some(list) = unblocks.get_mut(dep) {
                list.push(task);
            }
        }
    }

    let mut ready: BTreeSet<usize> = (0..tasks.len())
        .filter(|&i| pending.get(i) == Some(&0))
        .collect();
    let mut order = Vec::with_capacity(tasks.len());
    while let Some(next) = ready.pop_first() {
        order.push(next);
        for &waiting in unblocks.get(next).into_iter().flatten() {
            if let Some(left) = pending.get_mut(waiting) {
                *left = left.saturating_sub(1);
                if *left == 0 {
                    ready.insert(waiting);
                }
            }
        }
    }

    (order.len() == tasks.len()).then_some(order)
}

/// `true` if the dependencies among `tasks` loop back on themselves.
pub fn has_cycle(tasks: &[&dyn Task]) -> bool {
    topological_order(tasks).is_none()
}
