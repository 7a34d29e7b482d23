use super::TaskGraph;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

impl TaskGraph<'_> {
    /// Names of the tasks lying on a cycle among `unresolved`, sorted.
    ///
    /// `unresolved` is what a stalled topological pass leaves behind: cycle
    /// members plus everything downstream of them. Only strongly connected
    /// components with more than one task, or a task depending on itself,
    /// are reported. Falls back to every unresolved task if none qualifies.
    pub fn cycle_members(&self, unresolved: &[usize]) -> Vec<String> {
        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let mut nodes: HashMap<usize, NodeIndex> = HashMap::with_capacity(unresolved.len());
        for &idx in unresolved {
            nodes.insert(idx, graph.add_node(idx));
        }

        // Edges: dependency -> dependent
        for &idx in unresolved {
            for dep in self.dependencies(idx) {
                if let (Some(&u), Some(&v)) = (nodes.get(dep), nodes.get(&idx)) {
                    graph.update_edge(u, v, ());
                }
            }
        }

        let mut names: Vec<String> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1 || graph.contains_edge(component[0], component[0])
            })
            .flatten()
            .map(|node| self.name(graph[node]).to_string())
            .collect();

        if names.is_empty() {
            names = unresolved
                .iter()
                .map(|&idx| self.name(idx).to_string())
                .collect();
        }
        names.sort();
        names
    }
}
