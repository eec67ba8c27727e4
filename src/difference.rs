use serde::Serialize;
use std::fmt;

// ── Codes ───────────────────────────────────────────────────────────

/// The five stable difference codes. Declaration order is the report
/// column order and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DifferenceCode {
    Template,
    ParameterTypeNonEmptyIntersection,
    ParameterTypeEmptyIntersection,
    ParameterExtra,
    ParameterMissing,
}

impl DifferenceCode {
    /// All codes, in report column order.
    pub const ALL: [DifferenceCode; 5] = [
        DifferenceCode::Template,
        DifferenceCode::ParameterTypeNonEmptyIntersection,
        DifferenceCode::ParameterTypeEmptyIntersection,
        DifferenceCode::ParameterExtra,
        DifferenceCode::ParameterMissing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DifferenceCode::Template => "TemplateDifference",
            DifferenceCode::ParameterTypeNonEmptyIntersection => {
                "ParameterTypeNonEmptyIntersectionDifference"
            }
            DifferenceCode::ParameterTypeEmptyIntersection => {
                "ParameterTypeEmptyIntersectionDifference"
            }
            DifferenceCode::ParameterExtra => "ParameterExtraDifference",
            DifferenceCode::ParameterMissing => "ParameterMissingDifference",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == code)
    }

    /// Position of this code's counter in a report line.
    pub fn column(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DifferenceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Differences ─────────────────────────────────────────────────────

/// What diverged, with the type text involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DifferenceKind {
    /// Shape-level divergence not reducible to one parameter.
    Template { detail: String },
    ParameterTypeNonEmptyIntersection { expected: String, actual: String },
    ParameterTypeEmptyIntersection { expected: String, actual: String },
    /// Only the candidate has it.
    ParameterExtra { actual: String },
    /// Only the reference has it.
    ParameterMissing { expected: String },
    /// A code outside the known taxonomy (from a newer producer, say).
    Unrecognized { code: String, detail: String },
}

/// One divergence between a reference and a candidate construct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Difference {
    pub kind: DifferenceKind,
    /// Member/parameter names leading to the divergence inside the construct
    /// (e.g. `["bar", "x"]` for parameter `x` of method `bar`).
    pub path: Vec<String>,
    pub message: String,
}

impl Difference {
    pub fn template(path: Vec<String>, detail: String) -> Self {
        let message = if path.is_empty() {
            detail.clone()
        } else {
            format!("{}: {}", path.join("."), detail)
        };
        Difference {
            kind: DifferenceKind::Template { detail },
            path,
            message,
        }
    }

    pub fn type_overlap(path: Vec<String>, expected: String, actual: String) -> Self {
        Difference {
            message: format!(
                "\"{}\" has type \"{}\", expected \"{}\" (types overlap)",
                path.join("."),
                actual,
                expected
            ),
            kind: DifferenceKind::ParameterTypeNonEmptyIntersection { expected, actual },
            path,
        }
    }

    pub fn type_disjoint(path: Vec<String>, expected: String, actual: String) -> Self {
        Difference {
            message: format!(
                "\"{}\" has type \"{}\", expected \"{}\" (no overlap)",
                path.join("."),
                actual,
                expected
            ),
            kind: DifferenceKind::ParameterTypeEmptyIntersection { expected, actual },
            path,
        }
    }

    pub fn extra(path: Vec<String>, actual: String) -> Self {
        Difference {
            message: format!("Unexpected \"{}\" of type \"{}\"", path.join("."), actual),
            kind: DifferenceKind::ParameterExtra { actual },
            path,
        }
    }

    pub fn missing(path: Vec<String>, expected: String) -> Self {
        Difference {
            message: format!("Missing \"{}\" of type \"{}\"", path.join("."), expected),
            kind: DifferenceKind::ParameterMissing { expected },
            path,
        }
    }

    pub fn unrecognized(code: &str, detail: &str) -> Self {
        Difference {
            kind: DifferenceKind::Unrecognized {
                code: code.to_string(),
                detail: detail.to_string(),
            },
            path: Vec::new(),
            message: detail.to_string(),
        }
    }

    /// Machine-readable code of this difference.
    pub fn code(&self) -> &str {
        match &self.kind {
            DifferenceKind::Unrecognized { code, .. } => code,
            _ => self.known_code().map(DifferenceCode::as_str).unwrap_or_default(),
        }
    }

    /// The taxonomy code, if this difference belongs to the known taxonomy.
    pub fn known_code(&self) -> Option<DifferenceCode> {
        match &self.kind {
            DifferenceKind::Template { .. } => Some(DifferenceCode::Template),
            DifferenceKind::ParameterTypeNonEmptyIntersection { .. } => {
                Some(DifferenceCode::ParameterTypeNonEmptyIntersection)
            }
            DifferenceKind::ParameterTypeEmptyIntersection { .. } => {
                Some(DifferenceCode::ParameterTypeEmptyIntersection)
            }
            DifferenceKind::ParameterExtra { .. } => Some(DifferenceCode::ParameterExtra),
            DifferenceKind::ParameterMissing { .. } => Some(DifferenceCode::ParameterMissing),
            DifferenceKind::Unrecognized { code, .. } => DifferenceCode::from_code(code),
        }
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

/// The outcome of comparing one construct.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ResultComparison {
    /// Name of the compared construct.
    pub template: String,
    pub differences: Vec<Difference>,
}

impl ResultComparison {
    pub fn new(template: &str) -> Self {
        ResultComparison {
            template: template.to_string(),
            differences: Vec::new(),
        }
    }

    pub fn push(&mut self, difference: Difference) {
        self.differences.push(difference);
    }

    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }

    pub fn count(&self, code: DifferenceCode) -> usize {
        self.differences
            .iter()
            .filter(|d| d.code() == code.as_str())
            .count()
    }
}
