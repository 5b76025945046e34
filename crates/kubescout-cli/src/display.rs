//! Terminal rendering for drift results

use console::{Style, style};
use kubescout_core::{ComparisonResult, DriftReport, DriftStatus};

const HEADERS: [&str; 7] = [
    "NAMESPACE",
    "NAME",
    "CHART",
    "CURRENT",
    "LATEST",
    "APP VERSION",
    "STATUS",
];

const MISSING: &str = "-";

/// Get icon and style for a drift status
pub fn status_style(status: DriftStatus) -> (&'static str, Style) {
    match status {
        DriftStatus::Sync => ("✓", Style::new().green()),
        DriftStatus::PatchDrift => ("↑", Style::new().cyan()),
        DriftStatus::MinorDrift => ("⚠", Style::new().yellow()),
        DriftStatus::MajorDrift => ("✗", Style::new().red()),
        DriftStatus::Unknown => ("?", Style::new().dim()),
    }
}

fn row(result: &ComparisonResult) -> [String; 6] {
    let release = &result.release;
    let app_version = match (
        release.app_version.as_str(),
        result.latest_app_version.as_str(),
    ) {
        ("", "") => MISSING.to_string(),
        (current, latest) if current == latest || latest.is_empty() => current.to_string(),
        (current, latest) => format!("{} → {}", or_missing(current), latest),
    };

    [
        release.namespace.clone(),
        release.name.clone(),
        release.chart_name.clone(),
        release.chart_version.clone(),
        or_missing(&result.latest_version).to_string(),
        app_version,
    ]
}

fn or_missing(value: &str) -> &str {
    if value.is_empty() { MISSING } else { value }
}

/// Render the results table, one line per release
pub fn render_table(results: &[ComparisonResult]) -> String {
    let rows: Vec<[String; 6]> = results.iter().map(row).collect();

    let mut widths = [0usize; 6];
    for (i, header) in HEADERS.iter().take(6).enumerate() {
        widths[i] = rows
            .iter()
            .map(|r| r[i].chars().count())
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0);
    }

    let mut out = String::new();
    let header_line: Vec<String> = HEADERS
        .iter()
        .take(6)
        .zip(widths)
        .map(|(h, w)| format!("{:<w$}", h, w = w))
        .collect();
    out.push_str(&format!(
        "{}  {}\n",
        style(header_line.join("  ")).bold(),
        style(HEADERS[6]).bold()
    ));

    for (cells, result) in rows.iter().zip(results) {
        let line: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{:<w$}", c, w = w))
            .collect();
        let (icon, color) = status_style(result.status);
        out.push_str(&format!(
            "{}  {}\n",
            line.join("  "),
            color.apply_to(format!("{} {}", icon, result.status))
        ));
    }

    out
}

/// One-line summary of a drift report
pub fn render_summary(report: &DriftReport) -> String {
    if report.total == 0 {
        return format!("{}", style("No deployed Helm releases found").dim());
    }

    let mut parts = vec![format!("{} in sync", report.sync)];
    for (count, status) in [
        (report.patch, DriftStatus::PatchDrift),
        (report.minor, DriftStatus::MinorDrift),
        (report.major, DriftStatus::MajorDrift),
        (report.unknown, DriftStatus::Unknown),
    ] {
        if count > 0 {
            let (_, color) = status_style(status);
            parts.push(format!("{}", color.apply_to(format!("{} {}", count, status))));
        }
    }

    format!(
        "{} release(s) checked: {}",
        style(report.total).bold(),
        parts.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubescout_core::{Release, ResolutionSource, ResolvedUpstream, UpstreamCandidate};

    fn result(name: &str, current: &str, latest: Option<&str>) -> ComparisonResult {
        let release = Release::new(name, "apps", name, current).with_app_version("1.0.0");
        let mut result = ComparisonResult::unresolved(release);
        if let Some(latest) = latest {
            let candidate = UpstreamCandidate::new(name, "repo", latest).with_app_version("1.1.0");
            result.apply(&ResolvedUpstream::from_candidate(
                &candidate,
                ResolutionSource::Search,
            ));
        }
        result
    }

    #[test]
    fn test_status_style() {
        let (icon, _) = status_style(DriftStatus::Sync);
        assert_eq!(icon, "✓");

        let (icon, _) = status_style(DriftStatus::MajorDrift);
        assert_eq!(icon, "✗");

        let (icon, _) = status_style(DriftStatus::Unknown);
        assert_eq!(icon, "?");
    }

    #[test]
    fn test_render_table_lists_every_release() {
        console::set_colors_enabled(false);
        let results = vec![
            result("redis", "17.0.0", Some("18.1.0")),
            result("a-much-longer-release-name", "1.0.0", None),
        ];

        let table = render_table(&results);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("NAMESPACE"));
        assert!(lines[1].contains("18.1.0"));
        assert!(lines[1].contains("1.0.0 → 1.1.0"));
        assert!(lines[1].ends_with("✗ MAJOR_DRIFT"));
        assert!(lines[2].ends_with("? UNKNOWN"));

        // Columns stay aligned with the widest name and with multi-byte cells
        let char_col =
            |line: &str, needle: &str| line[..line.find(needle).unwrap()].chars().count();
        let status_col = char_col(lines[0], "STATUS");
        assert_eq!(char_col(lines[1], "✗ MAJOR_DRIFT"), status_col);
        assert_eq!(char_col(lines[2], "? UNKNOWN"), status_col);
    }

    #[test]
    fn test_render_summary() {
        console::set_colors_enabled(false);
        let results = vec![
            result("a", "1.0.0", Some("1.0.0")),
            result("b", "1.0.0", Some("1.1.0")),
            result("c", "1.0.0", None),
        ];

        let summary = render_summary(&DriftReport::from_results(&results));
        assert_eq!(
            summary,
            "3 release(s) checked: 1 in sync, 1 MINOR_DRIFT, 1 UNKNOWN"
        );
    }

    #[test]
    fn test_render_summary_empty() {
        console::set_colors_enabled(false);
        let summary = render_summary(&DriftReport::default());
        assert_eq!(summary, "No deployed Helm releases found");
    }
}
