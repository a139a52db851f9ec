//! End-to-end scenarios from spec.md §8.

use cascade::graph::CsrGraph;
use cascade::{Config, DiffusionModel, Error, Generator};

#[test]
fn scenario_1_linear_chain_lt() {
    let graph = CsrGraph::from_edges(5, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 4, 1.0)]);
    let config = Config::builder()
        .num_cpu_workers(1)
        .master_seed(42)
        .diffusion_model(DiffusionModel::LinearThreshold)
        .build()
        .unwrap();
    let generator = Generator::new(graph, config).unwrap();
    let sets = generator.generate(8);

    assert_eq!(sets.len(), 8);
    for set in &sets {
        assert_eq!(*set.last().unwrap(), 4, "every walk must end at 4");
        let expected: Vec<u32> = (*set.first().unwrap()..5).collect();
        assert_eq!(set, &expected, "every set must be the contiguous interval [root, 4]");
    }
}

#[test]
fn scenario_2_star_in_ic() {
    // Reverse of the spec's "1 -> 0, 2 -> 0, 3 -> 0": the generator
    // walks the already-reversed graph, 0 -> {1, 2, 3}.
    let graph = CsrGraph::from_edges(4, &[(0, 1, 1.0), (0, 2, 1.0), (0, 3, 1.0)]);
    let config = Config::builder()
        .num_cpu_workers(1)
        .master_seed(7)
        .diffusion_model(DiffusionModel::IndependentCascade)
        .build()
        .unwrap();
    let generator = Generator::new(graph, config).unwrap();
    let sets = generator.generate(4);

    assert_eq!(sets.len(), 4);
    for set in &sets {
        if set.contains(&0) {
            assert_eq!(set, &vec![0, 1, 2, 3]);
        } else {
            assert_eq!(set.len(), 1);
        }
    }
}

#[test]
fn scenario_5_invalid_mapping_is_rejected() {
    let err = Config::builder()
        .num_cpu_workers(2)
        .num_gpu_workers(2)
        .gpu_mapping("5")
        .master_seed(1)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::SlotOutOfRange { slot: 5, total_workers: 4 }));
}

#[cfg(feature = "cuda")]
mod gpu {
    use super::*;
    use cascade::device::mirror::DeviceGraphMirror;

    fn device_available() -> bool {
        let probe = CsrGraph::from_edges(1, &[]);
        DeviceGraphMirror::upload(&probe).is_ok()
    }

    fn dense_graph(n: usize) -> CsrGraph {
        let mut edges = Vec::new();
        for i in 0..n {
            edges.push((i as u32, ((i + 1) % n) as u32, 0.5));
        }
        CsrGraph::from_edges(n, &edges)
    }

    #[test]
    fn scenario_3_mixed_cpu_gpu_lt() {
        if !device_available() {
            eprintln!("skipping scenario_3: no CUDA device available");
            return;
        }
        let graph = dense_graph(5_000);
        let config = Config::builder()
            .num_cpu_workers(2)
            .num_gpu_workers(2)
            .master_seed(3)
            .diffusion_model(DiffusionModel::LinearThreshold)
            .build()
            .unwrap();
        let generator = Generator::new(graph, config).unwrap();
        let (sets, report) = generator.generate_with_report(10_000);

        assert_eq!(sets.len(), 10_000);
        for set in &sets {
            let mut sorted = set.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(&sorted, set);
        }
        assert!(report.total_exceedances() <= report.total_walks());
    }

    #[test]
    fn scenario_4_explicit_mapping_selects_gpu_slots() {
        if !device_available() {
            eprintln!("skipping scenario_4: no CUDA device available");
            return;
        }
        let graph = dense_graph(64);
        let config = Config::builder()
            .num_cpu_workers(2)
            .num_gpu_workers(2)
            .gpu_mapping("0,3")
            .master_seed(4)
            .diffusion_model(DiffusionModel::LinearThreshold)
            .build()
            .unwrap();
        assert_eq!(config.gpu_slots, std::collections::BTreeSet::from([0, 3]));
        let layout = cascade::mapping::layout_from_slots(4, 2, &config.gpu_slots);
        assert_eq!(layout, vec![true, false, false, true]);

        let generator = Generator::new(graph, config).unwrap();
        let sets = generator.generate(40);
        assert_eq!(sets.len(), 40);
    }

    #[test]
    fn scenario_6_gpu_lt_overflow_falls_back_to_host() {
        if !device_available() {
            eprintln!("skipping scenario_6: no CUDA device available");
            return;
        }
        // A path of length > LT_MASK_WORDS with weight 1.0 on every edge
        // forces every walk to overflow the fixed device mask.
        let n = 20;
        let mut edges = Vec::new();
        for i in 0..n - 1 {
            edges.push((i as u32, (i + 1) as u32, 1.0));
        }
        let graph = dense_graph_from(n, edges);
        let config = Config::builder()
            .num_cpu_workers(0)
            .num_gpu_workers(1)
            .master_seed(5)
            .diffusion_model(DiffusionModel::LinearThreshold)
            .build()
            .unwrap();
        let generator = Generator::new(graph, config).unwrap();
        let (sets, report) = generator.generate_with_report(64);

        assert_eq!(sets.len(), 64);
        assert_eq!(report.total_exceedances(), report.total_walks());
    }

    fn dense_graph_from(n: usize, edges: Vec<(u32, u32, f32)>) -> CsrGraph {
        CsrGraph::from_edges(n, &edges)
    }
}
