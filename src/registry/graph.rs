// src/registry/graph.rs

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

/// Dependency graph over target declaration indices.
///
/// Node `i` is the `i`-th declared target. Edge direction: dependency ->
/// dependent, so for
///
/// ```toml
/// [[target]]
/// name = "rs"
/// depends_on = ["py"]
/// ```
///
/// there is an edge `py -> rs`.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<usize, ()>,
    nodes: Vec<NodeIndex>,
}

impl DependencyGraph {
    /// Build a graph with `node_count` nodes and the given `(dependency, dependent)` edges.
    ///
    /// Duplicate edges collapse into one. Indices must be `< node_count`.
    pub fn new(node_count: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut graph = DiGraph::with_capacity(node_count, 0);
        let nodes: Vec<NodeIndex> = (0..node_count).map(|i| graph.add_node(i)).collect();

        for (dep, dependent) in edges {
            graph.update_edge(nodes[dep], nodes[dependent], ());
        }

        Self { graph, nodes }
    }

    /// Kahn's algorithm, always picking the lowest ready declaration index.
    ///
    /// Returns the order, or `Err(members)` with the declaration indices of
    /// one cycle (ascending) if the graph is not acyclic.
    pub fn stable_order(&self) -> Result<Vec<usize>, Vec<usize>> {
        let mut in_degree: Vec<usize> = self
            .nodes
            .iter()
            .map(|&n| self.graph.neighbors_directed(n, Direction::Incoming).count())
            .collect();

        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d == 0)
            .map(|(i, _)| Reverse(i))
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(Reverse(i)) = ready.pop() {
            order.push(i);
            for next in self.graph.neighbors_directed(self.nodes[i], Direction::Outgoing) {
                let j = self.graph[next];
                in_degree[j] -= 1;
                if in_degree[j] == 0 {
                    ready.push(Reverse(j));
                }
            }
        }

        if order.len() == self.nodes.len() {
            Ok(order)
        } else {
            Err(self.first_cycle())
        }
    }

    /// Members of the cyclic strongly connected component containing the
    /// lowest declaration index.
    fn first_cycle(&self) -> Vec<usize> {
        let mut cycles: Vec<Vec<usize>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0])
            })
            .map(|scc| {
                let mut members: Vec<usize> = scc.into_iter().map(|n| self.graph[n]).collect();
                members.sort_unstable();
                members
            })
            .collect();

        cycles.sort_by_key(|members| members[0]);
        cycles.into_iter().next().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn independent_nodes_keep_declaration_order() {
        let g = DependencyGraph::new(4, []);
        assert_eq!(g.stable_order(), Ok(vec![0, 1, 2, 3]));
    }

    #[test]
    fn dependency_moves_ahead_of_dependent() {
        // 0 depends on 2.
        let g = DependencyGraph::new(3, [(2, 0)]);
        assert_eq!(g.stable_order(), Ok(vec![1, 2, 0]));
    }

    #[test]
    fn diamond_is_ordered_with_lowest_index_first() {
        // 3 depends on 1 and 2; 1 and 2 depend on 0.
        let g = DependencyGraph::new(4, [(0, 1), (0, 2), (1, 3), (2, 3)]);
        assert_eq!(g.stable_order(), Ok(vec![0, 1, 2, 3]));
    }

    #[test]
    fn duplicate_edges_do_not_break_ordering() {
        let g = DependencyGraph::new(2, [(0, 1), (0, 1)]);
        assert_eq!(g.stable_order(), Ok(vec![0, 1]));
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let g = DependencyGraph::new(2, [(1, 1)]);
        assert_eq!(g.stable_order(), Err(vec![1]));
    }

    #[test]
    fn two_node_cycle_reports_both_members() {
        let g = DependencyGraph::new(3, [(1, 2), (2, 1)]);
        assert_eq!(g.stable_order(), Err(vec![1, 2]));
    }

    #[test]
    fn cycle_downstream_reports_only_cycle_members() {
        // 0 -> 1 -> 2 -> 1, node 3 depends on 2.
        let g = DependencyGraph::new(4, [(0, 1), (1, 2), (2, 1), (2, 3)]);
        assert_eq!(g.stable_order(), Err(vec![1, 2]));
    }
}
