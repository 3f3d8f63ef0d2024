//! Dependency graph over work orders.
//!
//! Edges point from prerequisite to dependent. The graph validates declared
//! references at build time and produces either a deterministic topological
//! order (Kahn's algorithm with a `(original_start, id)` ready-pool key) or a
//! cycle witness on failure. All iteration order is derived from explicit
//! sorts, never from map traversal.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use crate::api::{WorkOrder, WorkOrderId};
use crate::scheduler::error::{ScheduleError, ScheduleResult};

/// Directed dependency graph over a slice of work orders.
#[derive(Debug)]
pub struct DependencyGraph<'a> {
    orders: &'a [WorkOrder],
    /// Order id -> position in `orders`.
    index: HashMap<&'a str, usize>,
    /// Declared prerequisites, resolved to positions.
    prerequisites: Vec<Vec<usize>>,
    /// Reverse edges: prerequisite position -> dependent positions.
    dependents: Vec<Vec<usize>>,
    /// Number of declared prerequisites per order.
    in_degree: Vec<usize>,
}

impl<'a> DependencyGraph<'a> {
    /// Build the graph in two passes: one creating a node per order, one
    /// resolving every declared dependency. An unknown dependency id fails
    /// with [`ScheduleError::MissingDependency`] for the first offender in
    /// input order.
    pub fn build(orders: &'a [WorkOrder]) -> ScheduleResult<Self> {
        let mut index = HashMap::with_capacity(orders.len());
        for (pos, order) in orders.iter().enumerate() {
            index.insert(order.id.value(), pos);
        }

        let mut prerequisites = vec![Vec::new(); orders.len()];
        let mut dependents = vec![Vec::new(); orders.len()];
        let mut in_degree = vec![0usize; orders.len()];

        for (pos, order) in orders.iter().enumerate() {
            for dep in &order.depends_on {
                let Some(&dep_pos) = index.get(dep.value()) else {
                    return Err(ScheduleError::MissingDependency {
                        work_order_id: order.id.value().to_string(),
                        missing_dependency_id: dep.value().to_string(),
                    });
                };
                prerequisites[pos].push(dep_pos);
                dependents[dep_pos].push(pos);
                in_degree[pos] += 1;
            }
        }

        Ok(Self {
            orders,
            index,
            prerequisites,
            dependents,
            in_degree,
        })
    }

    /// Kahn's algorithm with a deterministic ready pool.
    ///
    /// The ready pool always yields the node with the smallest
    /// `(original_start, id)` key, making the schedule reproducible across
    /// runs. A graph that cannot drain fails with
    /// [`ScheduleError::CircularDependency`] carrying a cycle witness.
    pub fn topological_sort(&self) -> ScheduleResult<Vec<&'a WorkOrder>> {
        let mut in_degree = self.in_degree.clone();
        let mut ready = BinaryHeap::new();

        for (pos, &degree) in in_degree.iter().enumerate() {
            if degree == 0 {
                ready.push(Reverse(self.ready_key(pos)));
            }
        }

        let mut sorted = Vec::with_capacity(self.orders.len());
        while let Some(Reverse((_, _, pos))) = ready.pop() {
            sorted.push(&self.orders[pos]);
            for &dependent in &self.dependents[pos] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.push(Reverse(self.ready_key(dependent)));
                }
            }
        }

        if sorted.len() == self.orders.len() {
            return Ok(sorted);
        }

        let remaining: HashSet<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, &degree)| degree > 0)
            .map(|(pos, _)| pos)
            .collect();
        Err(ScheduleError::CircularDependency {
            cycle: self.find_cycle(&remaining),
        })
    }

    /// Every order that transitively depends on `id`, sorted by id.
    ///
    /// Auxiliary utility; the reflow pass does not use it.
    pub fn transitive_dependents(&self, id: &WorkOrderId) -> Vec<&'a WorkOrder> {
        self.transitive_closure(id, &self.dependents)
    }

    /// Every order that `id` transitively depends on, sorted by id.
    ///
    /// Auxiliary utility; the reflow pass does not use it.
    pub fn transitive_dependencies(&self, id: &WorkOrderId) -> Vec<&'a WorkOrder> {
        self.transitive_closure(id, &self.prerequisites)
    }

    fn transitive_closure(&self, id: &WorkOrderId, edges: &[Vec<usize>]) -> Vec<&'a WorkOrder> {
        let Some(&start) = self.index.get(id.value()) else {
            return Vec::new();
        };

        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([start]);
        while let Some(pos) = queue.pop_front() {
            for &next in &edges[pos] {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        visited.remove(&start);

        let mut closure: Vec<&'a WorkOrder> = visited.into_iter().map(|pos| &self.orders[pos]).collect();
        closure.sort_by(|a, b| a.id.cmp(&b.id));
        closure
    }

    /// Depth-first search along the prerequisite direction, restricted to the
    /// nodes left undrained by the topological sort. Returns a witness path
    /// whose last id repeats its first occurrence, closing the cycle.
    fn find_cycle(&self, remaining: &HashSet<usize>) -> Vec<String> {
        let mut starts: Vec<usize> = remaining.iter().copied().collect();
        starts.sort_by_key(|&pos| self.orders[pos].id.value());

        let mut visited = vec![false; self.orders.len()];
        let mut on_path = vec![false; self.orders.len()];
        let mut path = Vec::new();

        for start in starts {
            if !visited[start] {
                if let Some(cycle) =
                    self.dfs_cycle(start, remaining, &mut visited, &mut on_path, &mut path)
                {
                    return cycle;
                }
            }
        }
        Vec::new()
    }

    fn dfs_cycle(
        &self,
        pos: usize,
        remaining: &HashSet<usize>,
        visited: &mut [bool],
        on_path: &mut [bool],
        path: &mut Vec<usize>,
    ) -> Option<Vec<String>> {
        visited[pos] = true;
        on_path[pos] = true;
        path.push(pos);

        for &prereq in &self.prerequisites[pos] {
            if !remaining.contains(&prereq) {
                continue;
            }
            if on_path[prereq] {
                let first = path.iter().position(|&p| p == prereq).unwrap_or(0);
                let mut cycle: Vec<String> = path[first..]
                    .iter()
                    .map(|&p| self.orders[p].id.value().to_string())
                    .collect();
                cycle.push(self.orders[prereq].id.value().to_string());
                return Some(cycle);
            }
            if !visited[prereq] {
                if let Some(cycle) =
                    self.dfs_cycle(prereq, remaining, visited, on_path, path)
                {
                    return Some(cycle);
                }
            }
        }

        on_path[pos] = false;
        path.pop();
        None
    }

    fn ready_key(&self, pos: usize) -> (chrono::DateTime<chrono::Utc>, &'a str, usize) {
        let order = &self.orders[pos];
        (order.start_date, order.id.value(), pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn order(id: &str, deps: &[&str]) -> WorkOrder {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        WorkOrder::new(id, id.to_uppercase(), "wc-1", start, start, 60)
            .with_dependencies(deps.iter().map(|d| WorkOrderId::new(*d)).collect())
    }

    #[test]
    fn test_build_resolves_edges() {
        let orders = vec![order("a", &[]), order("b", &["a"])];
        let graph = DependencyGraph::build(&orders).unwrap();
        assert_eq!(graph.in_degree, vec![0, 1]);
        assert_eq!(graph.dependents[0], vec![1]);
    }

    #[test]
    fn test_build_missing_dependency() {
        let orders = vec![order("a", &["ghost"])];
        let err = DependencyGraph::build(&orders).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::MissingDependency {
                work_order_id: "a".into(),
                missing_dependency_id: "ghost".into(),
            }
        );
    }

    #[test]
    fn test_topological_sort_respects_edges() {
        let orders = vec![order("c", &["b"]), order("b", &["a"]), order("a", &[])];
        let graph = DependencyGraph::build(&orders).unwrap();
        let sorted = graph.topological_sort().unwrap();
        let ids: Vec<&str> = sorted.iter().map(|o| o.id.value()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_topological_sort_tie_break_by_id() {
        let orders = vec![order("z", &[]), order("a", &[]), order("m", &[])];
        let graph = DependencyGraph::build(&orders).unwrap();
        let sorted = graph.topological_sort().unwrap();
        let ids: Vec<&str> = sorted.iter().map(|o| o.id.value()).collect();
        // Same start instant, so ids decide.
        assert_eq!(ids, vec!["a", "m", "z"]);
    }

    #[test]
    fn test_cycle_witness_closes() {
        let orders = vec![order("a", &["c"]), order("b", &["a"]), order("c", &["b"])];
        let graph = DependencyGraph::build(&orders).unwrap();
        let err = graph.topological_sort().unwrap_err();
        let ScheduleError::CircularDependency { cycle } = err else {
            panic!("expected circular dependency");
        };
        assert!(cycle.len() >= 2);
        assert_eq!(cycle.first(), cycle.last());
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let orders = vec![order("a", &["a"])];
        let graph = DependencyGraph::build(&orders).unwrap();
        let err = graph.topological_sort().unwrap_err();
        let ScheduleError::CircularDependency { cycle } = err else {
            panic!("expected circular dependency");
        };
        assert_eq!(cycle, vec!["a".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_transitive_closures() {
        let orders = vec![
            order("a", &[]),
            order("b", &["a"]),
            order("c", &["b"]),
            order("d", &[]),
        ];
        let graph = DependencyGraph::build(&orders).unwrap();

        let dependents: Vec<&str> = graph
            .transitive_dependents(&WorkOrderId::new("a"))
            .iter()
            .map(|o| o.id.value())
            .collect();
        assert_eq!(dependents, vec!["b", "c"]);

        let dependencies: Vec<&str> = graph
            .transitive_dependencies(&WorkOrderId::new("c"))
            .iter()
            .map(|o| o.id.value())
            .collect();
        assert_eq!(dependencies, vec!["a", "b"]);

        assert!(graph.transitive_dependents(&WorkOrderId::new("d")).is_empty());
        assert!(graph.transitive_dependents(&WorkOrderId::new("nope")).is_empty());
    }
}
