// Severity verdicts and threshold evaluation

use std::fmt;

/// Monitoring verdict, ordered by severity. `Unknown` means the value could
/// not be obtained at all; threshold comparison never produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verdict {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Verdict {
    /// Conventional monitoring-plugin exit code.
    pub fn exit_code(self) -> i32 {
        match self {
            Verdict::Ok => 0,
            Verdict::Warning => 1,
            Verdict::Critical => 2,
            Verdict::Unknown => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::Ok => "OK",
            Verdict::Warning => "WARNING",
            Verdict::Critical => "CRITICAL",
            Verdict::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Threshold policy: strict greater-than, both bounds checked independently,
/// critical checked last so it wins when both fire. An absent bound means
/// that tier is never raised, so a value with no bounds set is always OK. A
/// value exactly equal to a bound does not trip it.
pub fn evaluate(value: f64, warning: Option<f64>, critical: Option<f64>) -> Verdict {
    let mut verdict = Verdict::Ok;
    if warning.is_some_and(|w| value > w) {
        verdict = Verdict::Warning;
    }
    if critical.is_some_and(|c| value > c) {
        verdict = Verdict::Critical;
    }
    verdict
}
