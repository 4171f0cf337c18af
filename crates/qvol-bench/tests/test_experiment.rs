//! End-to-end HOG experiments against the built-in simulators.

use qvol_adapter_sim::{IdealSampler, NoisySampler};
use qvol_bench::{
    ASYMPTOTIC_IDEAL_HOG, ExperimentConfig, HOG_THRESHOLD, compute_heavy_set,
    compute_ideal_distribution, generate_model_circuit, run_configured, run_experiment,
    run_experiment_parallel,
};
use qvol_hal::{Sampler, SamplerConfig};
use qvol_ir::NoiseModel;
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn ideal_and_noisy(p: f64) -> Vec<Box<dyn Sampler>> {
    vec![
        Box::new(IdealSampler::new()),
        Box::new(NoisySampler::depolarizing(p).unwrap()),
    ]
}

#[test]
fn test_ideal_sampler_is_well_above_threshold() {
    let samplers: Vec<Box<dyn Sampler>> = vec![Box::new(IdealSampler::new())];
    let config = ExperimentConfig::new(vec![3])
        .with_repetitions(50)
        .with_shots(200);
    let mut rng = SmallRng::seed_from_u64(2024);

    let report = run_experiment(&config, &mut rng, &samplers).unwrap();
    let point = report.series("ideal").unwrap().point(3).unwrap();
    assert_eq!(point.num_trials, 50);
    assert!(point.mean > 0.7, "ideal HOG {}", point.mean);
    assert!(point.mean > HOG_THRESHOLD);
}

#[test]
fn test_heavy_noise_drifts_to_one_half() {
    let samplers: Vec<Box<dyn Sampler>> = vec![Box::new(NoisySampler::depolarizing(0.5).unwrap())];
    let config = ExperimentConfig::new(vec![3])
        .with_repetitions(50)
        .with_shots(200);
    let mut rng = SmallRng::seed_from_u64(7);

    let report = run_experiment(&config, &mut rng, &samplers).unwrap();
    let mean = report.series[0].points[0].mean;
    assert!((0.35..0.65).contains(&mean), "noisy HOG {mean}");
}

#[test]
fn test_noise_compounds_with_depth() {
    let config = ExperimentConfig::new(vec![2, 3, 4, 5])
        .with_repetitions(30)
        .with_shots(200);
    let mut rng = SmallRng::seed_from_u64(99);
    let report = run_experiment(&config, &mut rng, &ideal_and_noisy(0.05)).unwrap();

    let ideal = report.series("ideal").unwrap().means();
    let noisy = report.series("noisy").unwrap().means();

    for m in &ideal {
        assert!(*m > 0.7, "ideal means {ideal:?}");
        assert!(*m < ASYMPTOTIC_IDEAL_HOG + 0.1, "ideal means {ideal:?}");
    }
    assert!(noisy[3] < noisy[0], "noisy means {noisy:?}");
    for pair in noisy.windows(2) {
        assert!(pair[1] < pair[0] + 0.05, "noisy means {noisy:?}");
    }
    for (n, i) in noisy.iter().zip(&ideal) {
        assert!(n < i, "noisy {noisy:?} ideal {ideal:?}");
    }
}

#[test]
fn test_parallel_matches_sequential() {
    let config = ExperimentConfig::new(vec![2, 4])
        .with_repetitions(8)
        .with_shots(64);
    let samplers = ideal_and_noisy(0.02);

    let sequential = run_experiment(&config, &mut SmallRng::seed_from_u64(5), &samplers).unwrap();
    let parallel =
        run_experiment_parallel(&config, &mut SmallRng::seed_from_u64(5), &samplers).unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn test_same_seed_same_report() {
    let config = ExperimentConfig::new(vec![3])
        .with_repetitions(4)
        .with_shots(50);
    let samplers = ideal_and_noisy(0.01);

    let first = run_experiment(&config, &mut SmallRng::seed_from_u64(1), &samplers).unwrap();
    let second = run_experiment(&config, &mut SmallRng::seed_from_u64(1), &samplers).unwrap();
    let other = run_experiment(&config, &mut SmallRng::seed_from_u64(2), &samplers).unwrap();
    assert_eq!(first, second);
    assert_ne!(first, other);
}

#[test]
fn test_rectangular_width() {
    let samplers: Vec<Box<dyn Sampler>> = vec![Box::new(IdealSampler::new())];
    let config = ExperimentConfig::new(vec![1, 2])
        .with_width(4)
        .with_repetitions(3)
        .with_shots(20);
    let report = run_experiment(&config, &mut SmallRng::seed_from_u64(3), &samplers).unwrap();
    let points = &report.series[0].points;
    assert!(points.iter().all(|p| p.width == 4));
    assert!(points.iter().all(|p| !p.is_square()));
    // No square point, so no width is achieved.
    assert_eq!(report.series[0].achieved_width(), None);
}

#[test]
fn test_oversized_width_is_execution_error() {
    let samplers: Vec<Box<dyn Sampler>> = vec![Box::new(IdealSampler::with_max_qubits(2))];
    let config = ExperimentConfig::new(vec![3])
        .with_repetitions(1)
        .with_shots(10);
    let err = run_experiment(&config, &mut SmallRng::seed_from_u64(0), &samplers).unwrap_err();
    assert!(matches!(err, qvol_bench::QvError::Execution(_)), "{err}");
}

#[test]
fn test_configured_run() {
    let yaml = r"
depths: [2, 3]
num_repetitions: 4
shots: 100
seed: 17
samplers:
  - name: exact
    kind: ideal
  - name: flip
    kind: noisy
    noise:
      channel: bit_flip
      p: 0.1
";
    let config = ExperimentConfig::from_yaml_str(yaml).unwrap();
    let report = run_configured(&config).unwrap();
    assert_eq!(report.seed, Some(17));
    let names: Vec<&str> = report.series.iter().map(|s| s.sampler.as_str()).collect();
    assert_eq!(names, vec!["exact", "flip"]);

    let again = run_configured(&config).unwrap();
    assert_eq!(report, again);

    let json = report.to_json().unwrap();
    assert!(json.contains("\"exact\""));
}

#[test]
fn test_unknown_sampler_kind() {
    let config = ExperimentConfig::new(vec![2])
        .with_samplers(vec![SamplerConfig::new("qpu", "ibm_heron")]);
    assert!(matches!(
        run_configured(&config),
        Err(qvol_bench::QvError::Execution(_))
    ));
}

#[test]
fn test_noisy_config_requires_noise() {
    let config = ExperimentConfig::new(vec![2])
        .with_samplers(vec![SamplerConfig::new("noisy", "noisy")]);
    assert!(run_configured(&config).is_err());

    let config = ExperimentConfig::new(vec![2])
        .with_repetitions(2)
        .with_shots(10)
        .with_samplers(vec![
            SamplerConfig::new("noisy", "noisy").with_noise(NoiseModel::PhaseFlip { p: 0.1 }),
        ]);
    assert!(run_configured(&config).is_ok());
}

#[test]
fn test_heavy_set_is_idempotent() {
    let circuit = generate_model_circuit(4, 4, &mut SmallRng::seed_from_u64(8)).unwrap();
    let first = compute_heavy_set(&circuit).unwrap();
    let second = compute_heavy_set(&circuit).unwrap();
    assert_eq!(first, second);

    let distribution = compute_ideal_distribution(&circuit).unwrap();
    let total: f64 = distribution.probabilities().iter().sum();
    assert!((total - 1.0).abs() < 1e-6);
}

#[test]
fn test_single_qubit_boundary() {
    let circuit = generate_model_circuit(1, 2, &mut SmallRng::seed_from_u64(0)).unwrap();
    let heavy = compute_heavy_set(&circuit).unwrap();
    assert_eq!(heavy.bitstrings(), vec!["0"]);
}
