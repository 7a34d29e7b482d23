//! Dependency resolution: Kahn's topological ordering with dates computed as
//! each task is released.
//!
//! Output order is the release order. Root tasks are released by name; every
//! later task is appended to the ready queue at the moment its last
//! dependency resolves, so ties among later generations follow discovery
//! order rather than name order.

use crate::calculations::{ForwardPass, ResolvedDates};
use crate::calendar::WorkCalendar;
use crate::error::ScheduleError;
use crate::graph::TaskGraph;
use crate::task::{ScheduledTask, TaskSpec};
use chrono::NaiveDate;
use std::collections::VecDeque;
use tracing::{debug, info, instrument};

pub struct Scheduler<'a> {
    calendar: &'a WorkCalendar,
}

impl<'a> Scheduler<'a> {
    pub fn new(calendar: &'a WorkCalendar) -> Self {
        Self { calendar }
    }

    pub fn calendar(&self) -> &WorkCalendar {
        self.calendar
    }

    /// Resolve every task or fail; a partial schedule is never returned.
    #[instrument(skip_all, fields(task_count = tasks.len()))]
    pub fn schedule(&self, tasks: Vec<TaskSpec>) -> Result<Vec<ScheduledTask>, ScheduleError> {
        if tasks.is_empty() {
            return Err(ScheduleError::EmptyInput);
        }

        let (order, mut resolved) = {
            let graph = TaskGraph::build(&tasks)?;
            self.release_in_order(&graph)?
        };

        let mut slots: Vec<Option<TaskSpec>> = tasks.into_iter().map(Some).collect();
        let mut scheduled = Vec::with_capacity(order.len());
        for idx in order {
            if let (Some(spec), Some(dates)) = (slots[idx].take(), resolved[idx].take()) {
                scheduled.push(ScheduledTask {
                    spec,
                    computed_start: dates.start,
                    computed_end: dates.end,
                    computed_actual: dates.actual,
                });
            }
        }

        info!(task_count = scheduled.len(), "schedule resolved");
        Ok(scheduled)
    }

    fn release_in_order(
        &self,
        graph: &TaskGraph<'_>,
    ) -> Result<(Vec<usize>, Vec<Option<ResolvedDates>>), ScheduleError> {
        let forward = ForwardPass::new(self.calendar);
        let mut in_degree = graph.in_degrees();
        let mut queue: VecDeque<usize> = graph.roots().into();
        let mut resolved: Vec<Option<ResolvedDates>> = vec![None; graph.len()];
        let mut order = Vec::with_capacity(graph.len());

        while let Some(idx) = queue.pop_front() {
            let dependency_ends = Self::dependency_ends(graph, idx, &resolved)?;
            let dates = forward.resolve(graph.task(idx), dependency_ends)?;
            debug!(
                task = graph.name(idx),
                start = %dates.start,
                end = %dates.end,
                "scheduled task"
            );
            resolved[idx] = Some(dates);
            order.push(idx);

            for &dependent in graph.dependents(idx) {
                let degree = &mut in_degree[dependent];
                *degree = degree.saturating_sub(1);
                if *degree == 0 {
                    queue.push_back(dependent);
                }
            }
        }

        if order.len() < graph.len() {
            let unresolved: Vec<usize> = (0..graph.len())
                .filter(|&idx| resolved[idx].is_none())
                .collect();
            return Err(ScheduleError::CyclicDependency {
                tasks: graph.cycle_members(&unresolved),
            });
        }

        Ok((order, resolved))
    }

    fn dependency_ends(
        graph: &TaskGraph<'_>,
        idx: usize,
        resolved: &[Option<ResolvedDates>],
    ) -> Result<Vec<NaiveDate>, ScheduleError> {
        graph
            .dependencies(idx)
            .iter()
            .map(|&dep| {
                resolved[dep]
                    .map(|dates| dates.end)
                    .ok_or_else(|| ScheduleError::DanglingDependency {
                        task: graph.name(idx).to_string(),
                        dependency: graph.name(dep).to_string(),
                    })
            })
            .collect()
    }
}

/// Schedule `tasks` against `calendar`.
pub fn schedule(
    tasks: Vec<TaskSpec>,
    calendar: &WorkCalendar,
) -> Result<Vec<ScheduledTask>, ScheduleError> {
    Scheduler::new(calendar).schedule(tasks)
}
