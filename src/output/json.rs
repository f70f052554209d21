//! JSON serialization for interaction reports.

use serde::Serialize;

/// Serialize a report to a compact JSON string.
///
/// Works for [`PhaseReport`](crate::PhaseReport),
/// [`ExperimentReport`](crate::ExperimentReport) and their parts.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for reports).
pub fn to_json<T: Serialize + ?Sized>(report: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(report)
}

/// Serialize a report to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for reports).
pub fn to_json_pretty<T: Serialize + ?Sized>(report: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::make_phase_report;
    use crate::result::PhaseReport;

    #[test]
    fn test_to_json() {
        let report = make_phase_report();
        let json = to_json(&report).unwrap();
        assert!(json.contains("\"name\":\"dark 1\""));
        assert!(json.contains("\"baseline\":\"Mean\""));
        assert!(json.contains("\"spans\":[4.5,6.0,2.25]"));
    }

    #[test]
    fn test_to_json_pretty() {
        let report = make_phase_report();
        let json = to_json_pretty(&report).unwrap();
        assert!(json.contains('\n')); // Pretty print has newlines
        let back: PhaseReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_floats_survive_round_trip() {
        let mut report = make_phase_report();
        report.time_together.values[(0, 1)] = 0.09332160242150507;
        report.time_together_expected.values[(0, 1)] = 1.0 / 3.0;
        report.subjects[0].leading_per_activity = 0.1 + 0.2;
        report.metadata.runtime_secs = 2.0_f64.sqrt();

        let back: PhaseReport = serde_json::from_str(&to_json(&report).unwrap()).unwrap();
        assert_eq!(back.time_together.values[(0, 1)], 0.09332160242150507);
        assert_eq!(back, report);
    }
}
