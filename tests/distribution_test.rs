use variant_assigner::core::distribution::DEFAULT_ALPHA;
use variant_assigner::{DistributionReport, Experiment};

const SAMPLE_SIZE: u64 = 100_000;

fn assert_uniform(name: &str, variants: u64) {
    let experiment = Experiment::new(name, variants).unwrap();
    let report = DistributionReport::simulate(&experiment, SAMPLE_SIZE).unwrap();

    assert_eq!(report.counts.len() as u64, variants);
    assert_eq!(report.counts.iter().sum::<u64>(), SAMPLE_SIZE);
    assert!(
        report.is_uniform(DEFAULT_ALPHA).unwrap(),
        "{} with {} variants: chi-squared {} counts {:?}",
        name,
        variants,
        report.chi_squared,
        report.counts
    );
    // 每個桶都應接近 N/V
    assert!(report.max_deviation < 0.05, "max deviation {}", report.max_deviation);
}

#[test]
fn test_uniform_four_variants() {
    assert_uniform("exp-a", 4);
}

#[test]
fn test_uniform_three_variants() {
    assert_uniform("exp-a", 3);
}

#[test]
fn test_uniform_ten_variants() {
    assert_uniform("exp-uniform", 10);
}

#[test]
fn test_simulated_counts_are_pinned() {
    let experiment = Experiment::new("exp-a", 4).unwrap();
    let report = DistributionReport::simulate(&experiment, SAMPLE_SIZE).unwrap();
    assert_eq!(report.counts, vec![24935, 25014, 25085, 24966]);
}
