//! Property-based tests for the quantified invariants in spec.md §8.

use cascade::graph::CsrGraph;
use cascade::{Config, DiffusionModel, Generator};
use proptest::prelude::*;

fn random_graph(node_count: usize, edge_count: usize, seed: u64) -> CsrGraph {
    use rand::Rng;
    use rand::SeedableRng;
    let mut rng = rand_chacha::ChaCha12Rng::seed_from_u64(seed);
    let mut edges = Vec::with_capacity(edge_count);
    for _ in 0..edge_count {
        let from = rng.gen_range(0..node_count as u32);
        let to = rng.gen_range(0..node_count as u32);
        let weight = rng.gen_range(0.05f32..0.9);
        edges.push((from, to, weight));
    }
    CsrGraph::from_edges(node_count, &edges)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Invariants 1-3: exact count, sorted + deduplicated, in-bounds.
    #[test]
    fn generate_returns_exactly_theta_sorted_in_bounds_sets(
        node_count in 2usize..40,
        edge_count in 0usize..200,
        theta in 1usize..64,
        num_cpu in 1usize..4,
        seed in any::<u64>(),
        model in prop_oneof![Just(DiffusionModel::LinearThreshold), Just(DiffusionModel::IndependentCascade)],
    ) {
        let graph = random_graph(node_count, edge_count, seed);
        let config = Config::builder()
            .num_cpu_workers(num_cpu)
            .master_seed(seed)
            .diffusion_model(model)
            .build()
            .unwrap();
        let generator = Generator::new(graph, config).unwrap();
        let sets = generator.generate(theta);

        prop_assert_eq!(sets.len(), theta);
        for set in &sets {
            let mut sorted = set.clone();
            sorted.sort_unstable();
            sorted.dedup();
            prop_assert_eq!(&sorted, set);
            for &v in set {
                prop_assert!((v as usize) < node_count);
            }
        }
    }

    /// Invariant 7: IC sets always contain their root.
    #[test]
    fn ic_walk_always_contains_root(
        node_count in 2usize..30,
        edge_count in 0usize..150,
        seed in any::<u64>(),
        root in 0u32..30,
    ) {
        use rand::SeedableRng;
        let root = root % node_count as u32;
        let graph = random_graph(node_count, edge_count, seed);
        let mut rng = rand_chacha::ChaCha12Rng::seed_from_u64(seed.wrapping_add(1));
        let set = cascade::diffusion::independent_cascade::walk(&graph, root, &mut rng);
        prop_assert!(set.contains(&root));
    }
}
