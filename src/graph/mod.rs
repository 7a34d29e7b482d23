//! Arena-indexed dependency graph.
//!
//! Tasks keep their input position as their index; dependency names are
//! resolved to indices once, when the graph is built, so the traversal never
//! hashes a name again.

use crate::error::ScheduleError;
use crate::task::TaskSpec;
use std::collections::HashMap;

mod cycles;

pub struct TaskGraph<'a> {
    tasks: &'a [TaskSpec],
    /// Per task, the indices it depends on (one entry per `depends_on` entry).
    dependencies: Vec<Vec<usize>>,
    /// Per task, the indices depending on it, in discovery order.
    dependents: Vec<Vec<usize>>,
}

impl<'a> TaskGraph<'a> {
    /// Index the tasks and wire edges dependency -> dependent.
    ///
    /// Fails on a repeated task name or a dependency naming no task.
    pub fn build(tasks: &'a [TaskSpec]) -> Result<Self, ScheduleError> {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(tasks.len());
        for (idx, task) in tasks.iter().enumerate() {
            if index.insert(task.name.as_str(), idx).is_some() {
                return Err(ScheduleError::DuplicateTask {
                    task: task.name.clone(),
                });
            }
        }

        let mut dependencies = vec![Vec::new(); tasks.len()];
        let mut dependents = vec![Vec::new(); tasks.len()];
        for (idx, task) in tasks.iter().enumerate() {
            for dep in &task.depends_on {
                let Some(&dep_idx) = index.get(dep.as_str()) else {
                    return Err(ScheduleError::DanglingDependency {
                        task: task.name.clone(),
                        dependency: dep.clone(),
                    });
                };
                dependencies[idx].push(dep_idx);
                dependents[dep_idx].push(idx);
            }
        }

        Ok(Self {
            tasks,
            dependencies,
            dependents,
        })
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn task(&self, idx: usize) -> &'a TaskSpec {
        &self.tasks[idx]
    }

    pub fn name(&self, idx: usize) -> &'a str {
        &self.tasks[idx].name
    }

    pub fn dependencies(&self, idx: usize) -> &[usize] {
        &self.dependencies[idx]
    }

    pub fn dependents(&self, idx: usize) -> &[usize] {
        &self.dependents[idx]
    }

    pub fn in_degrees(&self) -> Vec<usize> {
        self.dependencies.iter().map(Vec::len).collect()
    }

    /// Tasks with no dependencies, ordered by name.
    pub fn roots(&self) -> Vec<usize> {
        let mut roots: Vec<usize> = (0..self.len())
            .filter(|&idx| self.dependencies[idx].is_empty())
            .collect();
        roots.sort_by(|a, b| self.name(*a).cmp(self.name(*b)));
        roots
    }
}
