use crate::difference::{DifferenceCode, ResultComparison};

/// Turns one comparison result into one report record.
pub trait Formatter {
    fn format(&self, compared_module: &str, result: &ResultComparison) -> String;
}

/// `label,template,T,NE,E,X,M` where the five numbers count template,
/// overlapping-type, disjoint-type, extra and missing differences.
///
/// Differences with a code outside the taxonomy are not counted. Fields are
/// not quoted or escaped: labels and names must not contain the separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvFormatter {
    pub separator: char,
}

impl CsvFormatter {
    pub fn new() -> Self {
        CsvFormatter { separator: ',' }
    }

    pub fn with_separator(separator: char) -> Self {
        CsvFormatter { separator }
    }

    /// Column names matching `format`, for callers that want a header row.
    pub fn header(&self) -> String {
        let mut fields = vec!["module".to_string(), "template".to_string()];
        fields.extend(DifferenceCode::ALL.iter().map(|c| c.as_str().to_string()));
        fields.join(&self.separator.to_string())
    }
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for CsvFormatter {
    fn format(&self, compared_module: &str, result: &ResultComparison) -> String {
        let mut counts = DifferenceCode::ALL.map(|_| 0usize);
        for d in &result.differences {
            if let Some(code) = DifferenceCode::from_code(d.code()) {
                counts[code.column()] += 1;
            }
        }

        let mut line: Vec<String> = vec![compared_module.to_string(), result.template.clone()];
        line.extend(counts.iter().map(|n| n.to_string()));
        line.join(&self.separator.to_string())
    }
}
