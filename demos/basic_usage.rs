//! Basic usage example for the taguchi-doe library.
//!
//! This example builds an L9 design for an injection-molding process,
//! simulates two replicate measurements per run and prints the analysis.
//!
//! Run with `RUST_LOG=taguchi_doe=debug` to see the pooling steps.

use taguchi_doe::{ArrayType, DesignBuilder, SNRatioType};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Taguchi DOE - Basic Usage Example\n");

    let design = DesignBuilder::new()
        .array(ArrayType::L9)
        .factor("Temperature", vec![180, 200, 220])
        .factor("Pressure", vec![60, 80, 100])
        .factor("CoolingTime", vec![10, 15, 20])
        .sn_ratio_type(SNRatioType::LargerIsBetter)
        .build()?;

    let plan = design.generate()?;
    println!("{} experiments on {}:", plan.len(), plan.array());
    for (run, experiment) in plan.iter().enumerate() {
        let settings: Vec<String> = experiment
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        println!("  {:>2}: {}", run + 1, settings.join(", "));
    }
    println!();

    // Simulated tensile strength: temperature matters most, pressure a
    // little, cooling time hardly at all
    let responses: Vec<Vec<f64>> = plan
        .iter()
        .enumerate()
        .map(|(run, e)| {
            let t = f64::from(*e.get("Temperature").unwrap_or(&200));
            let p = f64::from(*e.get("Pressure").unwrap_or(&80));
            let c = f64::from(*e.get("CoolingTime").unwrap_or(&15));
            let base = 20.0 + 0.15 * (t - 180.0) + 0.03 * (p - 60.0) + 0.001 * c;
            let noise = ((run * 37) % 7) as f64 * 0.05;
            vec![base + noise, base - noise * 0.5]
        })
        .collect();
    let results = plan.with_responses(&responses)?;

    let analysis = design.analyze(&results)?;

    println!("Grand mean: {:.3}", analysis.grand_mean);
    println!();

    println!("Main effects:");
    for effect in &analysis.main_effects {
        println!(
            "  {:<12} means {:?}  range {:.3}  rank {}",
            effect.factor,
            effect
                .level_means
                .iter()
                .map(|m| format!("{m:.3}"))
                .collect::<Vec<_>>(),
            effect.range,
            effect.rank
        );
    }
    println!();

    println!("ANOVA:");
    for entry in &analysis.anova.entries {
        if entry.pooled {
            println!("  {:<12} pooled (SS {:.4})", entry.factor, entry.sum_of_squares);
        } else {
            println!(
                "  {:<12} SS {:>9.4}  df {}  F {:>9.2}  p {:.4}  {:>6.2}%",
                entry.factor,
                entry.sum_of_squares,
                entry.degrees_of_freedom,
                entry.f_ratio,
                entry.p_value.unwrap_or(1.0),
                entry.contribution_percent
            );
        }
    }
    let error = &analysis.anova.error;
    println!(
        "  {:<12} SS {:>9.4}  df {}  MS {:.4}  pooled {:?}",
        "Error",
        error.sum_of_squares,
        error.degrees_of_freedom,
        error.mean_square,
        error.pooled_factors
    );
    println!();

    println!("Optimal settings:");
    for (factor, &level) in design
        .factors()
        .iter()
        .zip(&analysis.optimal_settings.factor_levels)
    {
        println!("  {} = {}", factor.name(), factor.levels()[level]);
    }
    let ci = analysis.optimal_settings.confidence_interval;
    println!(
        "Predicted mean: {:.3} ({:.0}% CI {:.3} .. {:.3})",
        analysis.optimal_settings.predicted_mean,
        ci.level * 100.0,
        ci.lower,
        ci.upper
    );

    Ok(())
}
