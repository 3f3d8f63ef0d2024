//! The reflow pass: drives topologically ordered work orders through the
//! calendar engine while tracking per-machine availability and per-order end
//! times.
//!
//! Control flow is a single top-to-bottom pipeline: validate work centers,
//! build the graph, sort it, then for each order compute the earliest start,
//! snap it to a shift, walk the working duration, record the end, and reserve
//! the machine. No concurrency within a run; all trackers are confined to the
//! call.

use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::api::{
    ReflowConfig, ReflowMetadata, ReflowOutput, ReflowResult, WorkCenter, WorkCenterId, WorkOrder,
    WorkOrderId,
};
use crate::scheduler::calendar;
use crate::scheduler::error::{ScheduleError, ScheduleResult};
use crate::scheduler::graph::DependencyGraph;

/// Finite-capacity scheduler over an immutable work-center index.
///
/// A `reflow` call is a pure function of the scheduler's configuration and
/// the orders passed in; no state persists between calls, so one instance can
/// serve many sequential reflows (or each call can build its own).
#[derive(Debug, Clone)]
pub struct ReflowScheduler {
    work_centers: HashMap<WorkCenterId, WorkCenter>,
    config: ReflowConfig,
}

impl ReflowScheduler {
    pub fn new(work_centers: Vec<WorkCenter>, config: ReflowConfig) -> Self {
        let work_centers = work_centers
            .into_iter()
            .map(|wc| (wc.id.clone(), wc))
            .collect();
        Self {
            work_centers,
            config,
        }
    }

    pub fn config(&self) -> &ReflowConfig {
        &self.config
    }

    /// Run one full reflow pass over `orders`.
    ///
    /// Results are returned in processing (topological) order. The first
    /// error aborts the whole pass; warnings accumulate for orders that were
    /// delayed past their original start.
    pub fn reflow(&self, orders: &[WorkOrder]) -> ScheduleResult<ReflowOutput> {
        let started = Instant::now();

        for order in orders {
            if !self.work_centers.contains_key(&order.work_center) {
                return Err(ScheduleError::MissingWorkCenter {
                    work_order_id: order.id.value().to_string(),
                    work_center_id: order.work_center.value().to_string(),
                });
            }
        }

        let graph = DependencyGraph::build(orders)?;
        let sorted = graph.topological_sort()?;

        let mut machine_availability: HashMap<WorkCenterId, DateTime<Utc>> = HashMap::new();
        let mut order_end: HashMap<WorkOrderId, DateTime<Utc>> = HashMap::new();
        let mut results = Vec::with_capacity(sorted.len());
        let mut warnings = Vec::new();

        for order in sorted {
            let result = if order.is_maintenance {
                self.process_fixed(order, &mut machine_availability, &mut order_end)
            } else {
                self.process_movable(
                    order,
                    &mut machine_availability,
                    &mut order_end,
                    &mut warnings,
                )?
            };
            results.push(result);
        }

        let rescheduled_count = results.iter().filter(|r| r.was_rescheduled).count();
        let fixed_count = results.iter().filter(|r| r.is_fixed).count();
        debug!(
            total = orders.len(),
            rescheduled = rescheduled_count,
            fixed = fixed_count,
            "reflow pass complete"
        );

        Ok(ReflowOutput {
            results,
            warnings,
            metadata: ReflowMetadata {
                total_orders: orders.len(),
                rescheduled_count,
                fixed_count,
                processing_time_ms: started.elapsed().as_millis() as u64,
            },
        })
    }

    /// Maintenance orders are fixed: they keep their original interval and
    /// only push the machine's next-free instant forward.
    fn process_fixed(
        &self,
        order: &WorkOrder,
        machine_availability: &mut HashMap<WorkCenterId, DateTime<Utc>>,
        order_end: &mut HashMap<WorkOrderId, DateTime<Utc>>,
    ) -> ReflowResult {
        machine_availability
            .entry(order.work_center.clone())
            .and_modify(|free| *free = (*free).max(order.end_date))
            .or_insert(order.end_date);
        order_end.insert(order.id.clone(), order.end_date);

        ReflowResult {
            work_order_id: order.id.clone(),
            work_order_number: order.number.clone(),
            original_start: order.start_date,
            original_end: order.end_date,
            new_start: order.start_date,
            new_end: order.end_date,
            was_rescheduled: false,
            is_fixed: true,
        }
    }

    fn process_movable(
        &self,
        order: &WorkOrder,
        machine_availability: &mut HashMap<WorkCenterId, DateTime<Utc>>,
        order_end: &mut HashMap<WorkOrderId, DateTime<Utc>>,
        warnings: &mut Vec<String>,
    ) -> ScheduleResult<ReflowResult> {
        // Index validated up front.
        let wc = &self.work_centers[&order.work_center];
        let tz = self.config.timezone;

        let mut constraints: Vec<DateTime<Utc>> = Vec::new();
        if !self.config.allow_earlier_start {
            constraints.push(order.start_date);
        }
        if let Some(&free) = machine_availability.get(&order.work_center) {
            constraints.push(free);
        }
        for dep in &order.depends_on {
            // Topological order guarantees every dependency is recorded.
            if let Some(&end) = order_end.get(dep) {
                constraints.push(end);
            }
        }
        let earliest_start = constraints.into_iter().max().unwrap_or(self.config.now);

        let valid_start = calendar::find_earliest_valid_start(earliest_start, wc, tz)?;
        let new_end =
            calendar::calculate_end_date_with_shifts(valid_start, order.duration_minutes, wc, tz)?;

        machine_availability.insert(order.work_center.clone(), new_end);
        order_end.insert(order.id.clone(), new_end);

        if valid_start > order.start_date {
            let delayed_by = (valid_start - order.start_date).num_minutes();
            warnings.push(format!(
                "Work order {} delayed by {} minutes",
                order.number, delayed_by
            ));
        }

        Ok(ReflowResult {
            work_order_id: order.id.clone(),
            work_order_number: order.number.clone(),
            original_start: order.start_date,
            original_end: order.end_date,
            new_start: valid_start,
            new_end,
            was_rescheduled: valid_start != order.start_date || new_end != order.end_date,
            is_fixed: false,
        })
    }
}
