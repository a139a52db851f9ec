//! Host Linear-Threshold walk (spec §4.1).
//!
//! Reverse walk from a root `r`: draw a uniform threshold in `(0, 1]`,
//! scan `cur`'s out-neighbors in CSR order subtracting each edge weight
//! until the threshold is driven `<= 0`; the neighbor that does it is the
//! candidate. Stop if the candidate is already visited, or if no
//! neighbor drives the threshold to `<= 0` (including vertices with no
//! out-edges). Otherwise recurse from the candidate.

use rand::Rng;

use crate::graph::CsrGraph;
use crate::rrr_set::{assert_within_host_capacity, finalize};

/// Runs one Linear-Threshold reverse walk starting at `root` and returns
/// the sorted, deduplicated RRR set it visits.
pub fn walk(graph: &CsrGraph, root: u32, rng: &mut impl Rng) -> Vec<u32> {
    let mut visited = vec![root];
    let mut cur = root;

    loop {
        let mut threshold: f32 = rng.gen_range(f32::EPSILON..=1.0);
        let mut candidate = None;
        for (next, weight) in graph.neighbors(cur as usize) {
            threshold -= weight;
            if threshold <= 0.0 {
                candidate = Some(next);
                break;
            }
        }

        match candidate {
            None => break,
            Some(next) if visited.contains(&next) => break,
            Some(next) => {
                visited.push(next);
                cur = next;
            }
        }

        assert_within_host_capacity(&visited);
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
    fn linear_chain_walk_is_contiguous_interval_ending_at_last() {
        let graph = CsrGraph::from_edges(5, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 4, 1.0)]);
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        for root in 0..5u32 {
            let set = walk(&graph, root, &mut rng);
            let expected: Vec<u32> = (root..5).collect();
            assert_eq!(set, expected);
        }
    }

    #[test]
    fn vertex_with_no_out_edges_terminates_immediately() {
        let graph = CsrGraph::from_edges(3, &[(0, 1, 1.0)]);
        let mut rng = ChaCha12Rng::seed_from_u64(2);
        let set = walk(&graph, 2, &mut rng);
        assert_eq!(set, vec![2]);
    }

    #[test]
    fn self_loop_terminates_walk() {
        let graph = CsrGraph::from_edges(2, &[(0, 0, 1.0)]);
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        let set = walk(&graph, 0, &mut rng);
        assert_eq!(set, vec![0]);
    }
}
