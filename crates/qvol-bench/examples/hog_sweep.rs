//! Run a HOG sweep and print the report.
//!
//! ```text
//! cargo run -p qvol-bench --example hog_sweep -- [config.yaml]
//! QVOL_DEPTHS=2,3,4 QVOL_REPETITIONS=20 RUST_LOG=qvol_bench=debug cargo run -p qvol-bench --example hog_sweep
//! ```

use std::time::Instant;

use qvol_bench::{ASYMPTOTIC_IDEAL_HOG, ExperimentConfig, HOG_THRESHOLD, QvResult, run_configured};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> QvResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let path = std::env::args().nth(1);
    let config = ExperimentConfig::load(path.as_deref())?;
    info!(
        depths = ?config.depths,
        repetitions = config.num_repetitions,
        shots = config.shots,
        seed = config.seed,
        "starting sweep"
    );

    let start = Instant::now();
    let report = run_configured(&config)?;
    let elapsed = start.elapsed();

    println!("{}", report.to_json()?);
    println!();
    println!("reference: ideal {ASYMPTOTIC_IDEAL_HOG:.3}, threshold {HOG_THRESHOLD:.3}");
    for series in &report.series {
        let qv = series.quantum_volume().with_duration(elapsed);
        let means: Vec<String> = series.means().iter().map(|m| format!("{m:.3}")).collect();
        println!(
            "{:<12} hog=[{}]  QV={}",
            series.sampler,
            means.join(", "),
            qv.value
        );
    }
    Ok(())
}
