use std::path::Path;

use carbongate_core::{ForecastOutcome, GateConfig, GateReport, JobSpec, ProfileCatalog};
use carbongate_estimator::evaluate_job;
use carbongate_intensity::{MoerClient, StaticSource};

pub async fn check(
    spec_path: &str,
    config_path: Option<&str>,
    format: &str,
    offline: bool,
) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => GateConfig::from_file(Path::new(path))?,
        None => GateConfig::default(),
    };
    let job = JobSpec::from_file(Path::new(spec_path))?;
    let catalog = ProfileCatalog::builtin();

    let report = if offline {
        evaluate_job(&config, &catalog, &job, &StaticSource).await
    } else {
        let client = MoerClient::from_env(&config.source);
        evaluate_job(&config, &catalog, &job, &client).await
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => println!("{}", format_report(&report)),
    }

    if report.gate.status.is_blocking() {
        std::process::exit(1);
    }
    Ok(())
}

fn format_report(report: &GateReport) -> String {
    let est = &report.estimate;
    let mut out = String::new();

    let mut line = |s: String| {
        out.push_str(&s);
        out.push('\n');
    };

    line(format!("{} @ {}", report.accelerator, report.region));
    line(format!(
        "  emissions       {:.4} ± {:.4} kgCO2eq",
        est.combined_kg, est.sigma_kg
    ));
    line(format!("  alternative     {:.4} kgCO2eq", est.alternate_kg));
    line(format!(
        "  pue             {:.4} ± {:.4}",
        est.pue, est.pue_sigma
    ));
    line(format!("  throttle adj    -{:.2}%", est.throttle_pct));
    line(format!("  embodied        {:.4} kg", est.embodied_kg));
    line(format!("  lifecycle       {:.3} kg", est.lifecycle_kg));
    line(format!(
        "  intensity       {:.1} g/kWh ({:?})",
        est.intensity_g_kwh, est.intensity_source
    ));
    match &est.forecast {
        ForecastOutcome::Window(window) => {
            line(format!(
                "  optimal window  wait {:.0}h  conf={:.2} ({})",
                window.wait_hours, window.confidence, window.meta.confidence_label
            ));
            line(format!("  savings         {:.1}%", window.savings_pct));
        }
        ForecastOutcome::InsufficientHistory { samples, required } => {
            line(format!(
                "  forecast        unavailable ({samples}/{required} history samples)"
            ));
        }
    }
    line(format!("  forcing         {:.3e} W/m2", est.radiative_forcing_w_m2));
    line(format!(
        "  gate            {:?}  {}",
        report.gate.status, report.gate.message
    ));
    for option in &report.gate.options {
        line(format!(
            "    [{}]  {}  saves {:.0}%",
            option.id, option.label, option.savings_pct
        ));
    }
    line(format!(
        "  budget left     {:.1} kg after this job",
        report.budget_remaining_kg
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn text_report_covers_the_essentials() {
        let config = GateConfig::default();
        let catalog = ProfileCatalog::builtin();
        let mut job = JobSpec::scaffold();
        job.current_intensity_g_kwh = Some(420.0);

        let report = evaluate_job(&config, &catalog, &job, &StaticSource).await;
        let text = format_report(&report);

        assert!(text.contains("A100 @ us-east-1"));
        assert!(text.contains("emissions"));
        assert!(text.contains("pue"));
        assert!(text.contains("gate"));
        // No history in the scaffold → explicit forecast gap.
        assert!(text.contains("unavailable (0/48"));
    }
}
