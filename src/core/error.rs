use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line} is not valid UTF-8")]
    InvalidUtf8 { line: usize },

    #[error("line {line}: header column {column} is {found:?}, expected {expected:?}")]
    HeaderMismatch {
        line: usize,
        column: usize,
        found: String,
        expected: &'static str,
    },

    #[error("line {line}: data row before any header")]
    MissingHeader { line: usize },

    #[error("line {line}: expected {expected} fields, found {actual}")]
    RowWidth {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("line {line}: field {field} has invalid value {value:?}")]
    ParseType {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: {n_mismatches} mismatches exceed {n_bases} bases")]
    MismatchExceedsBases {
        line: usize,
        n_mismatches: u64,
        n_bases: u64,
    },

    #[error("cannot combine an empty set of records")]
    EmptyAggregation,

    #[error("statistic requested over an empty distribution")]
    EmptyDistribution,

    #[error("sample stdev undefined for total weight {total_weight}")]
    DegenerateSample { total_weight: u64 },

    #[error("coefficient of variation undefined: mean quality is zero")]
    DivisionByZero,
}
