//! Non-throwing dependency diagnostics.
//!
//! Collects every dependency problem in a set of work orders into a list
//! instead of failing fast. The reflow pass never calls this; it is a
//! pre-flight check for callers that want a full picture before scheduling.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::api::WorkOrder;
use crate::scheduler::{DependencyGraph, ScheduleError};

/// One dependency problem found during pre-flight validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyIssue {
    /// "self_dependency", "missing_dependency" or "circular_dependency"
    pub issue_type: String,
    /// The offending order, when the issue is attributable to one.
    pub work_order_id: Option<String>,
    pub description: String,
}

impl DependencyIssue {
    fn new(issue_type: &str, work_order_id: Option<String>, description: String) -> Self {
        Self {
            issue_type: issue_type.to_string(),
            work_order_id,
            description,
        }
    }
}

/// Collect all dependency issues: self-dependencies, references to unknown
/// orders, and cycles. Returns an empty list for a well-formed set.
pub fn validate_dependencies(orders: &[WorkOrder]) -> Vec<DependencyIssue> {
    let known: HashSet<&str> = orders.iter().map(|o| o.id.value()).collect();
    let mut issues = Vec::new();

    for order in orders {
        for dep in &order.depends_on {
            if dep == &order.id {
                issues.push(DependencyIssue::new(
                    "self_dependency",
                    Some(order.id.value().to_string()),
                    format!("work order '{}' depends on itself", order.id),
                ));
            } else if !known.contains(dep.value()) {
                issues.push(DependencyIssue::new(
                    "missing_dependency",
                    Some(order.id.value().to_string()),
                    format!(
                        "work order '{}' depends on unknown work order '{}'",
                        order.id, dep
                    ),
                ));
            }
        }
    }

    // Cycle detection runs on a sanitized copy so the issues above do not
    // mask a genuine cycle among the well-formed edges.
    let sanitized: Vec<WorkOrder> = orders
        .iter()
        .map(|order| {
            let mut cleaned = order.clone();
            cleaned
                .depends_on
                .retain(|dep| dep != &order.id && known.contains(dep.value()));
            cleaned
        })
        .collect();

    let sort = DependencyGraph::build(&sanitized).and_then(|graph| {
        graph.topological_sort().map(|_| ())
    });
    if let Err(ScheduleError::CircularDependency { cycle }) = sort {
        issues.push(DependencyIssue::new(
            "circular_dependency",
            cycle.first().cloned(),
            format!("circular dependency: {}", cycle.join(" -> ")),
        ));
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::WorkOrderId;
    use chrono::{TimeZone, Utc};

    fn order(id: &str, deps: &[&str]) -> WorkOrder {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        WorkOrder::new(id, id.to_uppercase(), "wc-1", start, start, 60)
            .with_dependencies(deps.iter().map(|d| WorkOrderId::new(*d)).collect())
    }

    #[test]
    fn test_clean_set_has_no_issues() {
        let orders = vec![order("a", &[]), order("b", &["a"])];
        assert!(validate_dependencies(&orders).is_empty());
    }

    #[test]
    fn test_self_dependency_reported() {
        let orders = vec![order("a", &["a"])];
        let issues = validate_dependencies(&orders);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, "self_dependency");
        assert_eq!(issues[0].work_order_id.as_deref(), Some("a"));
    }

    #[test]
    fn test_missing_dependency_reported() {
        let orders = vec![order("a", &["ghost"])];
        let issues = validate_dependencies(&orders);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, "missing_dependency");
    }

    #[test]
    fn test_cycle_reported() {
        let orders = vec![order("a", &["b"]), order("b", &["a"])];
        let issues = validate_dependencies(&orders);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, "circular_dependency");
    }

    #[test]
    fn test_all_categories_collected() {
        let orders = vec![
            order("a", &["a", "ghost"]),
            order("b", &["c"]),
            order("c", &["b"]),
        ];
        let issues = validate_dependencies(&orders);
        let kinds: Vec<&str> = issues.iter().map(|i| i.issue_type.as_str()).collect();
        assert_eq!(
            kinds,
            vec!["self_dependency", "missing_dependency", "circular_dependency"]
        );
    }
}
