//! Property-based tests for model circuits and heavy sets.

use proptest::prelude::*;
use qvol_bench::{compute_heavy_set, compute_ideal_distribution, generate_model_circuit};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::collections::BTreeSet;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_layers_pair_disjoint_qubits(n in 1u32..=9, d in 1u32..=6, seed in any::<u64>()) {
        let circuit = generate_model_circuit(n, d, &mut SmallRng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(circuit.depth(), d as usize);

        for moment in circuit.moments() {
            prop_assert_eq!(moment.len(), (n / 2) as usize);
            let mut seen = BTreeSet::new();
            for op in moment.operations() {
                prop_assert_eq!(op.qubits.len(), 2);
                for q in &op.qubits {
                    prop_assert!(q.0 < n);
                    prop_assert!(seen.insert(q.0), "qubit {} used twice", q.0);
                }
            }
            prop_assert_eq!(n as usize - seen.len(), (n % 2) as usize);
        }
    }

    #[test]
    fn prop_same_seed_same_circuit(n in 1u32..=6, d in 1u32..=4, seed in any::<u64>()) {
        let a = generate_model_circuit(n, d, &mut SmallRng::seed_from_u64(seed)).unwrap();
        let b = generate_model_circuit(n, d, &mut SmallRng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_heavy_set_below_half(n in 1u32..=6, d in 1u32..=4, seed in any::<u64>()) {
        let circuit = generate_model_circuit(n, d, &mut SmallRng::seed_from_u64(seed)).unwrap();
        let distribution = compute_ideal_distribution(&circuit).unwrap();
        let total: f64 = distribution.probabilities().iter().sum();
        prop_assert!((total - 1.0).abs() < 1e-6);

        let heavy = compute_heavy_set(&circuit).unwrap();
        let half = (1usize << n) / 2;
        prop_assert!(heavy.len() <= half);
        if n >= 2 {
            prop_assert!(heavy.len() + 1 >= half, "heavy set of {} outcomes", heavy.len());
        }
    }
}
