use crate::cli::args::{Cli, Commands};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::models::{LocationSelector, Variable};
use crate::processors::{
    Correlation, CorrelationMatrix, Exploration, Explorer, SeasonalSummary, SeverityDistribution,
};
use crate::utils::progress::ProgressReporter;
use serde::Serialize;
use std::path::Path;

pub fn run(cli: Cli) -> Result<()> {
    let config = PipelineConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Locations { input } => {
            let explorer = open(&input, &config, cli.quiet)?;
            for location in explorer.locations() {
                println!("{}", location);
            }
        }

        Commands::Summary {
            input,
            location,
            json,
        } => {
            let explorer = open(&input, &config, cli.quiet)?;
            report_rejections(&explorer);

            let selector = LocationSelector::from_option(location);
            let exploration = explorer.explore(&selector);

            if json {
                println!("{}", serde_json::to_string_pretty(&SummaryJson::from(&exploration))?);
            } else {
                println!("{}", render_summary(&exploration));
            }
        }

        Commands::Scatter {
            input,
            location,
            variable,
            limit,
        } => {
            if !variable.is_weather() {
                return Err(PipelineError::InvalidConfig(format!(
                    "scatter needs a weather variable, got {}",
                    variable
                )));
            }

            let explorer = open(&input, &config, cli.quiet)?;
            let selector = LocationSelector::from_option(location);
            let exploration = explorer.explore(&selector);

            let points = exploration.scatter(variable);
            println!("{},{}", variable, Variable::Pm25);
            for point in points.iter().take(limit.unwrap_or(points.len())) {
                println!("{},{}", point.x, point.pm25);
            }
        }
    }

    Ok(())
}

fn open(input: &Path, config: &PipelineConfig, quiet: bool) -> Result<Explorer> {
    let progress = ProgressReporter::new_spinner("Loading readings...", quiet);
    Explorer::from_path(input, config, Some(&progress))
}

fn report_rejections(explorer: &Explorer) {
    let rejections = explorer.dataset().rejections();
    if !rejections.is_empty() {
        eprintln!(
            "⚠️  Skipped {} rows with invalid date, month or measurement (see log for details)",
            rejections.len()
        );
    }
}

#[derive(Serialize)]
struct SummaryJson<'a> {
    selector: String,
    rows: usize,
    seasonal: &'a SeasonalSummary,
    severity: &'a SeverityDistribution,
    correlation: &'a CorrelationMatrix,
}

impl<'a> From<&'a Exploration<'a>> for SummaryJson<'a> {
    fn from(exploration: &'a Exploration<'a>) -> Self {
        Self {
            selector: exploration.selector.to_string(),
            rows: exploration.view.len(),
            seasonal: &exploration.seasonal,
            severity: &exploration.severity,
            correlation: &exploration.correlation,
        }
    }
}

pub fn render_summary(exploration: &Exploration<'_>) -> String {
    let mut out = format!(
        "Average PM2.5 per season ({})\nRows: {}\n",
        exploration.selector,
        exploration.view.len()
    );

    if exploration.seasonal.is_empty() {
        out.push_str("  No PM2.5 measurements\n");
    }
    for (season, mean) in exploration.seasonal.iter() {
        out.push_str(&format!(
            "  {:<8} {:>8.2}  (n={})\n",
            season.label(),
            mean.mean,
            mean.count
        ));
    }

    out.push_str("\nSeverity categories\n");
    for (category, count) in &exploration.severity.counts {
        out.push_str(&format!("  {:<24} {:>8}\n", category.label(), count));
    }
    out.push_str(&format!(
        "  {:<24} {:>8}\n",
        "(no PM2.5)", exploration.severity.undefined
    ));

    out.push_str("\nCorrelation of PM2.5 with weather\n");
    out.push_str(&format!("  {:<6}", ""));
    for variable in exploration.correlation.variables() {
        out.push_str(&format!(" {:>7}", variable.column()));
    }
    out.push('\n');

    for variable in exploration.correlation.variables() {
        out.push_str(&format!("  {:<6}", variable.column()));
        for cell in exploration.correlation.row(*variable) {
            match cell {
                Correlation::Defined(r) => out.push_str(&format!(" {:>7.2}", r)),
                Correlation::Undefined => out.push_str(&format!(" {:>7}", "-")),
            }
        }
        out.push('\n');
    }

    let undefined = exploration.correlation.undefined_variables();
    if !undefined.is_empty() {
        let names: Vec<&str> = undefined.iter().map(|v| v.column()).collect();
        out.push_str(&format!(
            "  Undefined (zero variance or too few values): {}\n",
            names.join(", ")
        ));
    }

    out
}
