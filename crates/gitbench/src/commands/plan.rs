//! `gitbench plan`: show configured jobs as a summary table

use crate::config::ProjectConfig;
use crate::errors::CliError;
use gitbench_toolchain::{
    BenchmarkCase, Column, ColumnCategory, GIT_AWARE_SUFFIX, GitReferenceColumn, Job, UnitType,
    sort_columns,
};
use tracing::instrument;

/// A job characteristic shown as a table column
struct JobColumn {
    id: &'static str,
    priority: i32,
    extract: fn(&Job) -> Option<String>,
}

impl Column for JobColumn {
    fn id(&self) -> &str {
        self.id
    }

    fn column_name(&self) -> &str {
        self.id
    }

    fn value(&self, case: &BenchmarkCase) -> String {
        (self.extract)(&case.job).unwrap_or_else(|| "Default".to_string())
    }

    fn is_default(&self, case: &BenchmarkCase) -> bool {
        (self.extract)(&case.job).is_none()
    }

    fn is_available(&self) -> bool {
        true
    }

    fn always_show(&self) -> bool {
        false
    }

    fn category(&self) -> ColumnCategory {
        ColumnCategory::Job
    }

    fn priority_in_category(&self) -> i32 {
        self.priority
    }

    fn is_numeric(&self) -> bool {
        false
    }

    fn unit_type(&self) -> UnitType {
        UnitType::Dimensionless
    }

    fn legend(&self) -> &str {
        ""
    }
}

static JOB_COLUMNS: [JobColumn; 8] = [
    JobColumn {
        id: "Runtime",
        priority: 0,
        extract: |job| job.runtime.map(|runtime| runtime.name.to_string()),
    },
    JobColumn {
        id: "Toolchain",
        priority: 1,
        extract: |job| {
            job.toolchain.as_ref().map(|toolchain| match job.git_reference {
                Some(_) => format!("{toolchain}{GIT_AWARE_SUFFIX}"),
                None => toolchain.to_string(),
            })
        },
    },
    JobColumn {
        id: "LaunchCount",
        priority: 3,
        extract: |job| job.run.launch_count.map(|n| n.to_string()),
    },
    JobColumn {
        id: "WarmupCount",
        priority: 4,
        extract: |job| job.run.warmup_count.map(|n| n.to_string()),
    },
    JobColumn {
        id: "IterationCount",
        priority: 5,
        extract: |job| job.run.iteration_count.map(|n| n.to_string()),
    },
    JobColumn {
        id: "InvocationCount",
        priority: 6,
        extract: |job| job.run.invocation_count.map(|n| n.to_string()),
    },
    JobColumn {
        id: "UnrollFactor",
        priority: 7,
        extract: |job| job.run.unroll_factor.map(|n| n.to_string()),
    },
    JobColumn {
        id: "Baseline",
        priority: 8,
        extract: |job| job.baseline.then(|| "Yes".to_string()),
    },
];

#[instrument(skip(config))]
pub fn execute(config: &ProjectConfig) -> Result<String, CliError> {
    if config.jobs.is_empty() {
        return Err(CliError::NoJobs {
            path: config.display_source(),
        });
    }

    let cases = config
        .jobs
        .iter()
        .enumerate()
        .map(|(index, git_job)| -> Result<_, gitbench_toolchain::Error> {
            let job = git_job.clone().into_job()?;
            let name = job.id.clone().unwrap_or_else(|| format!("Job-{}", index + 1));
            Ok(BenchmarkCase { name, job })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut columns: Vec<&dyn Column> = JOB_COLUMNS
        .iter()
        .filter(|column| {
            column.always_show() || cases.iter().any(|case| !column.is_default(case))
        })
        .map(|column| column as &dyn Column)
        .collect();
    columns.push(&GitReferenceColumn);
    sort_columns(&mut columns);

    Ok(render_table(&cases, &columns))
}

/// Markdown-style table with a leading job column and a legend
fn render_table(cases: &[BenchmarkCase], columns: &[&dyn Column]) -> String {
    let mut headers = vec!["Job".to_string()];
    headers.extend(columns.iter().map(|column| column.column_name().to_string()));

    let rows: Vec<Vec<String>> = cases
        .iter()
        .map(|case| {
            let mut row = vec![case.name.clone()];
            row.extend(columns.iter().map(|column| column.value(case)));
            row
        })
        .collect();

    let widths: Vec<usize> = (0..headers.len())
        .map(|i| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(headers[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_row = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        format!("| {} |", padded.join(" | "))
    };

    let mut lines = vec![format_row(headers.as_slice())];
    let separator: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    lines.push(format!("|-{}-|", separator.join("-|-")));
    lines.extend(rows.iter().map(|row| format_row(row.as_slice())));

    let legends: Vec<String> = columns
        .iter()
        .filter(|column| !column.legend().is_empty())
        .map(|column| format!("  {} : {}", column.column_name(), column.legend()))
        .collect();
    if !legends.is_empty() {
        lines.push(String::new());
        lines.extend(legends);
    }

    lines.join("\n")
}
