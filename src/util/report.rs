use crate::models::window::{evictions, WindowStep};
use crate::util::human::{fmt_average, fmt_sample};

/// Generate a human-readable report of a windowed run to a String.
pub fn generate(capacity: usize, steps: &[WindowStep], precision: usize) -> String {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let mut out = String::new();

    out.push_str("═══════════════════════════════════════════════\n");
    out.push_str(&format!("  RingSum Window Report — {}\n", now));
    out.push_str("═══════════════════════════════════════════════\n\n");

    // ── Steps ──────────────────────────────────────────────────────────
    out.push_str(&format!(
        "── Samples ({}, capacity {}) ──────────────────────\n",
        steps.len(), capacity
    ));
    out.push_str(&format!(
        "  {:>5} {:>14} {:>5} {:>5} {:>14} {:>14} {:>14}\n",
        "Step", "Value", "Head", "Occ", "Sum", "Average", "Evicted"
    ));
    out.push_str(&format!("  {}\n", "─".repeat(77)));
    for s in steps {
        let evicted = match s.evicted {
            Some(v) => fmt_sample(v, precision),
            None    => "—".to_string(),
        };
        out.push_str(&format!(
            "  {:>5} {:>14} {:>5} {:>5} {:>14} {:>14} {:>14}\n",
            s.step,
            fmt_sample(s.value, precision),
            s.head,
            s.occupancy,
            fmt_sample(s.sum, precision),
            fmt_average(s.average, precision),
            evicted,
        ));
    }
    out.push('\n');

    // ── Summary ────────────────────────────────────────────────────────
    out.push_str("── Summary ────────────────────────────────────\n");
    match steps.last() {
        Some(last) => {
            out.push_str(&format!("  Final sum:     {}\n", fmt_sample(last.sum, precision)));
            out.push_str(&format!("  Final average: {}\n", fmt_average(last.average, precision)));
            out.push_str(&format!("  Retained:      {} of {}\n", last.occupancy, capacity));
        }
        None => out.push_str("  ● No samples pushed\n"),
    }
    out.push_str(&format!("  Evictions:     {}\n", evictions(steps)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::window::run_window;
    use crate::util::ring_buffer::RingBuffer;

    #[test]
    fn report_has_row_per_step_and_summary() {
        let mut buf = RingBuffer::new(3).unwrap();
        let steps = run_window(&mut buf, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let text = generate(3, &steps, 1);

        assert!(text.contains("RingSum Window Report"));
        assert!(text.contains("Samples (4, capacity 3)"));
        assert!(text.contains("Final sum:     9.0"));
        assert!(text.contains("Final average: 3.0"));
        assert!(text.contains("Retained:      3 of 3"));
        assert!(text.contains("Evictions:     1"));

        let rows = text.lines().filter(|l| l.trim_start().starts_with(char::is_numeric)).count();
        assert_eq!(rows, 4);
    }

    #[test]
    fn empty_run_says_so() {
        let text = generate(4, &[], 2);
        assert!(text.contains("No samples pushed"));
        assert!(text.contains("Evictions:     0"));
    }
}
