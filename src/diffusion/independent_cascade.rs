//! Host Independent-Cascade walk (spec §4.2).
//!
//! A frontier BFS from `root`: each out-edge of the current frontier is
//! kept independently with probability equal to its weight; the RRR set
//! is the root plus every vertex reached through a kept edge.

use std::collections::VecDeque;

use rand::Rng;

use crate::graph::CsrGraph;
use crate::rrr_set::{assert_within_host_capacity, finalize};

/// Runs one Independent-Cascade reverse BFS starting at `root` and
/// returns the sorted, deduplicated RRR set it reaches.
pub fn walk(graph: &CsrGraph, root: u32, rng: &mut impl Rng) -> Vec<u32> {
    let mut visited = vec![root];
    let mut reached = vec![false; graph.node_count()];
    reached[root as usize] = true;

    let mut frontier = VecDeque::new();
    frontier.push_back(root);

    while let Some(cur) = frontier.pop_front() {
        for (next, weight) in graph.neighbors(cur as usize) {
            if reached[next as usize] {
                continue;
            }
            if rng.gen_range(0.0f32..1.0) <= weight {
                reached[next as usize] = true;
                visited.push(next);
                frontier.push_back(next);
                assert_within_host_capacity(&visited);
            }
        }
    }

    finalize(&mut visited);
    visited
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn star_in_graph_root_reaches_everyone() {
        // Spec scenario 2's "1 -> 0, 2 -> 0, 3 -> 0" describes the original
        // influence graph; the walk runs over its reverse, 0 -> {1, 2, 3},
        // which is the CSR this generator is constructed with (spec §3:
        // graph CSR/loading is an external collaborator).
        let graph = CsrGraph::from_edges(4, &[(0, 1, 1.0), (0, 2, 1.0), (0, 3, 1.0)]);
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let set = walk(&graph, 0, &mut rng);
        assert_eq!(set, vec![0, 1, 2, 3]);
    }

    #[test]
    fn root_without_out_edges_yields_singleton() {
        let graph = CsrGraph::from_edges(4, &[(0, 1, 1.0), (0, 2, 1.0), (0, 3, 1.0)]);
        let mut rng = ChaCha12Rng::seed_from_u64(2);
        for root in 1..4u32 {
            let set = walk(&graph, root, &mut rng);
            assert_eq!(set, vec![root]);
        }
    }

    #[test]
    fn weight_one_always_activates() {
        let graph = CsrGraph::from_edges(3, &[(0, 1, 1.0), (1, 2, 1.0)]);
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        let set = walk(&graph, 0, &mut rng);
        assert_eq!(set, vec![0, 1, 2]);
    }

    #[test]
    fn returned_set_always_contains_root() {
        let graph = CsrGraph::from_edges(3, &[(0, 1, 0.0), (1, 2, 0.0)]);
        let mut rng = ChaCha12Rng::seed_from_u64(4);
        for root in 0..3u32 {
            let set = walk(&graph, root, &mut rng);
            assert!(set.contains(&root));
        }
    }
}
