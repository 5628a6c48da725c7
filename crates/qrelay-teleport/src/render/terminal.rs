//! Terminal rendering with `console` styling.

use console::style;
use qrelay_hal::Counts;

use crate::density::DensityMatrix;
use crate::marginal::MarginalCounts;

/// Horizontal bar chart of `counts`, most frequent first.
pub fn counts_bar_chart(counts: &Counts, width: usize) -> String {
    let total = counts.total_shots().max(1) as f64;
    let max = counts.sorted().first().map_or(1, |(_, n)| **n).max(1) as f64;

    counts
        .sorted()
        .into_iter()
        .map(|(key, &n)| {
            let len = ((n as f64 / max) * width as f64).round() as usize;
            format!(
                "  {:>8} {} {} ({:.1}%)",
                style(key).cyan(),
                style("█".repeat(len)).green(),
                n,
                100.0 * n as f64 / total
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-line summary of marginal counts.
pub fn marginal_summary(label: &str, counts: &MarginalCounts) -> String {
    format!(
        "  {} 0: {:>6}  1: {:>6}",
        style(format!("{label}:")).dim(),
        counts.zeros(),
        counts.ones()
    )
}

/// Density matrix followed by its Bloch vector and purity.
pub fn density_matrix_block(rho: &DensityMatrix) -> String {
    format!(
        "{}\n  {} {}\n  {} {:.4}",
        rho,
        style("Bloch vector:").dim(),
        rho.bloch_vector(),
        style("Purity:").dim(),
        rho.purity()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_chart_orders_by_count() {
        console::set_colors_enabled(false);
        let counts: Counts = [("0", 25), ("1", 75)].into_iter().collect();
        let chart = counts_bar_chart(&counts, 20);
        let lines: Vec<_> = chart.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("75"));
        assert!(lines[0].contains(&"█".repeat(20)));
        assert!(lines[1].contains("25.0%"));
    }

    #[test]
    fn test_density_block_mentions_purity() {
        console::set_colors_enabled(false);
        let text = density_matrix_block(&DensityMatrix::maximally_mixed());
        assert!(text.contains("Purity: 0.5000"));
    }
}
