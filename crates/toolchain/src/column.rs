//! Summary table columns

use crate::pipeline::BenchmarkCase;

/// Section of the summary table a column belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnCategory {
    /// Benchmark method
    Descriptor,
    /// Job characteristics
    Job,
    /// Benchmark parameters
    Params,
    /// Measured statistics
    Statistics,
    /// Baseline ratios
    Baseline,
    /// Anything else
    Custom,
}

/// Unit of a column's values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitType {
    /// Plain values
    Dimensionless,
    /// Durations
    Time,
    /// Byte sizes
    Size,
}

/// A column of the benchmark summary table
pub trait Column: Send + Sync {
    /// Stable identifier
    fn id(&self) -> &str;
    /// Header text
    fn column_name(&self) -> &str;
    /// Cell value for `case`
    fn value(&self, case: &BenchmarkCase) -> String;
    /// Whether the cell holds the column's default value
    fn is_default(&self, case: &BenchmarkCase) -> bool;
    /// Whether the column can be shown at all
    fn is_available(&self) -> bool;
    /// Show even when every cell holds the default
    fn always_show(&self) -> bool;
    /// Table section
    fn category(&self) -> ColumnCategory;
    /// Order inside the section, lower first
    fn priority_in_category(&self) -> i32;
    /// Whether values are numbers
    fn is_numeric(&self) -> bool;
    /// Unit of the values
    fn unit_type(&self) -> UnitType;
    /// Explanation printed under the table
    fn legend(&self) -> &str;
}

/// Shows which git reference each benchmark was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GitReferenceColumn;

impl GitReferenceColumn {
    /// Column id
    pub const ID: &'static str = "GitReference";
}

impl Column for GitReferenceColumn {
    fn id(&self) -> &str {
        Self::ID
    }

    fn column_name(&self) -> &str {
        "Git Reference"
    }

    fn value(&self, case: &BenchmarkCase) -> String {
        case.job
            .git_reference
            .clone()
            .unwrap_or_else(|| "-".to_string())
    }

    fn is_default(&self, _case: &BenchmarkCase) -> bool {
        false
    }

    fn is_available(&self) -> bool {
        true
    }

    fn always_show(&self) -> bool {
        true
    }

    fn category(&self) -> ColumnCategory {
        ColumnCategory::Job
    }

    fn priority_in_category(&self) -> i32 {
        2
    }

    fn is_numeric(&self) -> bool {
        false
    }

    fn unit_type(&self) -> UnitType {
        UnitType::Dimensionless
    }

    fn legend(&self) -> &str {
        "Git reference the benchmark was run on"
    }
}

/// Order columns the way the summary table lays them out
pub fn sort_columns(columns: &mut [&dyn Column]) {
    columns.sort_by_key(|column| (column.category(), column.priority_in_category()));
}
