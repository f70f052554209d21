//! Terminal output formatting with colors and box drawing.

use colored::Colorize;

use crate::result::{PairMatrix, PhaseReport};

/// Format a PhaseReport for human-readable terminal output.
///
/// Matrices are printed row = leader (or dominant), column = follower (or
/// displaced). Excess entries are green above the baseline and red below.
pub fn format_phase(report: &PhaseReport) -> String {
    let mut output = String::new();
    let sep = "\u{2500}".repeat(62);

    output.push_str("cohort-dynamics\n");
    output.push_str(&sep);
    output.push('\n');
    output.push('\n');

    output.push_str(&format!(
        "  Phase: {} [{:.0}s, {:.0}s) ({:.2}h)\n",
        report.phase.name,
        report.phase.start,
        report.phase.end,
        report.phase.duration() / 3600.0
    ));
    output.push_str(&format!(
        "  Null model: {} resamples, {} baseline, seed {}\n",
        report.metadata.resamples,
        report.metadata.baseline.label(),
        report.metadata.seed
    ));
    output.push('\n');

    output.push_str("  Following (observed):\n");
    output.push_str(&format_matrix(&report.following, |v| format!("{v:.0}")));
    output.push_str("  Following (excess over baseline):\n");
    output.push_str(&format_matrix(&report.following_excess, colored_excess));
    output.push_str("  Tube dominance:\n");
    output.push_str(&format_matrix(&report.dominance, |v| format!("{v:.0}")));
    output.push('\n');

    output.push_str(&format!(
        "    {:<12} {:>8} {:>8} {:>8} {:>10} {:>10}\n",
        "subject", "activity", "leading", "follows", "lead/act", "follow/act"
    ));
    for s in &report.subjects {
        output.push_str(&format!(
            "    {:<12} {:>8} {:>8.0} {:>8.0} {:>10.3} {:>10.3}\n",
            s.subject,
            s.activity,
            s.leading,
            s.following,
            s.leading_per_activity,
            s.following_per_activity
        ));
    }
    output.push('\n');

    output.push_str(&sep);
    output.push('\n');
    output.push_str(&format!(
        "Completed in {:.2}s\n",
        report.metadata.runtime_secs
    ));

    output
}

fn colored_excess(value: f64) -> String {
    let text = format!("{value:+.2}");
    if value > 0.0 {
        text.green().to_string()
    } else if value < 0.0 {
        text.red().to_string()
    } else {
        text
    }
}

/// Lay out a labelled matrix; the diagonal is shown as a dot.
fn format_matrix<F>(matrix: &PairMatrix, cell: F) -> String
where
    F: Fn(f64) -> String,
{
    const WIDTH: usize = 9;
    let mut out = String::new();

    out.push_str(&format!("    {:<12}", ""));
    for name in &matrix.subjects {
        out.push_str(&format!("{:>WIDTH$}", truncate(name, WIDTH - 1)));
    }
    out.push('\n');

    for (i, name) in matrix.subjects.iter().enumerate() {
        out.push_str(&format!("    {:<12}", truncate(name, 12)));
        for j in 0..matrix.subjects.len() {
            let text = if i == j {
                ".".dimmed().to_string()
            } else {
                cell(matrix.values[(i, j)])
            };
            // ANSI codes do not take columns; pad on the visible length.
            let visible = strip_len(&text);
            out.push_str(&" ".repeat(WIDTH.saturating_sub(visible)));
            out.push_str(&text);
        }
        out.push('\n');
    }
    out
}

fn truncate(name: &str, max: usize) -> String {
    name.chars().take(max).collect()
}

fn strip_len(text: &str) -> usize {
    let mut len = 0;
    let mut in_escape = false;
    for c in text.chars() {
        match (in_escape, c) {
            (false, '\u{1b}') => in_escape = true,
            (true, 'm') => in_escape = false,
            (true, _) => {}
            (false, _) => len += 1,
        }
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::make_phase_report;

    #[test]
    fn test_format_phase() {
        colored::control::set_override(false);
        let output = format_phase(&make_phase_report());
        assert!(output.contains("cohort-dynamics"));
        assert!(output.contains("Phase: dark 1"));
        assert!(output.contains("100 resamples, mean baseline, seed 42"));
        assert!(output.contains("+2.00"));
        assert!(output.contains("m2"));
    }

    #[test]
    fn test_strip_len_ignores_escapes() {
        assert_eq!(strip_len("\u{1b}[32m+1.00\u{1b}[0m"), 5);
        assert_eq!(strip_len("abc"), 3);
    }
}
