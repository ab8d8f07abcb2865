//! Text rendering for terminal output. JSON output serializes the core types
//! directly.

use std::fmt::Write;

use span_core::audit::GradeOrderingIssue;
use span_core::dataset::LoadingAssumptions;
use span_core::elements::subtype_info;
use span_core::sections::SectionSize;
use span_core::{CapacityStatus, ReferenceDataset, ResolvedResult, ValidationReport};

const RULE: &str = "═══════════════════════════════════════";

pub fn status_icon(status: CapacityStatus) -> &'static str {
    match status {
        CapacityStatus::Limited => "[LOW]",
        _ => "[OK]",
    }
}

pub fn result_text(result: &ResolvedResult, disclaimer: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "  {}", result.element_type.display_name().to_uppercase());
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out);

    let _ = writeln!(out, "Selection:");
    let _ = writeln!(out, "  Grade:    {}", result.grade);
    match SectionSize::from_str_flexible(&result.size) {
        Ok(section) => {
            let _ = writeln!(
                out,
                "  Size:     {} ({} x {}, {} mm²)",
                section.key(),
                section.breadth(),
                section.depth(),
                section.area_mm2()
            );
        }
        Err(_) => {
            let _ = writeln!(out, "  Size:     {}", result.size);
        }
    }
    if let Some(subtype) = &result.subtype {
        let _ = writeln!(out, "  Type:     {}", subtype_info(subtype).display_name);
    }
    if let Some(spacing) = &result.spacing {
        let _ = writeln!(out, "  Spacing:  {}mm centres", spacing);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "{}: {} {}", result.quantity.label(), result.capacity, status_icon(result.status));
    let _ = writeln!(out, "  {}", result.summary());
    let _ = writeln!(
        out,
        "  Confidence: {} ({} agreeing source{})",
        result.confidence,
        result.source_agreement.len(),
        if result.source_agreement.len() == 1 { "" } else { "s" }
    );
    if let Some(notes) = &result.notes {
        let _ = writeln!(out, "  Notes: {}", notes);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Loading:");
    loading_lines(&mut out, &result.loading);
    let _ = writeln!(out);

    let criteria = &result.design_criteria;
    let _ = writeln!(out, "Design criteria:");
    let _ = writeln!(out, "  Deflection limit: {}", criteria.deflection_limit);
    let _ = writeln!(out, "  End conditions:   {}", criteria.end_conditions);
    if let Some(bearing) = &criteria.bearing_length {
        let _ = writeln!(out, "  Bearing length:   {}", bearing);
    }
    let _ = writeln!(out, "  Service class:    {}", criteria.service_class);
    for (key, value) in &criteria.extra {
        let _ = writeln!(out, "  {}: {}", key.replace('_', " "), value);
    }

    if let Some(subtype) = &result.subtype {
        let advisories = subtype_info(subtype).advisories;
        if !advisories.is_empty() {
            let _ = writeln!(out);
            for advisory in advisories {
                let _ = writeln!(out, "  * {}", advisory);
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "{}", disclaimer);
    out
}

fn loading_lines(out: &mut String, loading: &LoadingAssumptions) {
    let _ = writeln!(out, "  Dead:      {}", loading.dead_load);
    let _ = writeln!(out, "  Imposed:   {}", loading.imposed_load);
    if let Some(snow) = loading.snow_load {
        let _ = writeln!(out, "  Snow:      {}", snow);
    }
    if let Some(wind) = loading.wind_load {
        let _ = writeln!(out, "  Wind:      {}", wind);
    }
    if let Some(point) = loading.concentrated_load {
        let _ = writeln!(out, "  Point:     {} kN", point);
    }
    let _ = writeln!(out, "  Total:     {}", loading.total_load);
    if let Some(notes) = &loading.notes {
        let _ = writeln!(out, "  ({})", notes);
    }
}

pub fn sources_text(dataset: &ReferenceDataset) -> String {
    let meta = &dataset.meta;
    let mut out = String::new();
    let _ = writeln!(out, "{} v{}", meta.title, meta.version);
    let _ = writeln!(out, "Created: {}", meta.created_date.format("%Y-%m-%d"));
    let _ = writeln!(out, "Status:  {}", meta.data_status);
    let _ = writeln!(
        out,
        "Verified {} (cross-referenced: {}, engineer reviewed: {}, confidence: {})",
        meta.validation_status.last_verified.format("%Y-%m-%d"),
        yes_no(meta.validation_status.cross_referenced),
        yes_no(meta.validation_status.engineer_reviewed),
        meta.validation_status.confidence_level
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "Sources:");
    for source in dataset.sources() {
        let _ = write!(out, "  - {}", source.name);
        if let Some(version) = &source.version {
            let _ = write!(out, " ({})", version);
        }
        let _ = writeln!(out, " [{}]", source.status);
        if let Some(notes) = &source.notes {
            let _ = writeln!(out, "      {}", notes);
        }
        if let Some(url) = &source.url {
            let _ = writeln!(out, "      {}", url);
        }
    }

    if !dataset.usage_notes().is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Usage notes:");
        for (index, note) in dataset.usage_notes().iter().enumerate() {
            let _ = writeln!(out, "  {:>2}. {}", index + 1, note);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", dataset.disclaimer());
    out
}

pub fn audit_text(report: &ValidationReport, issues: &[GradeOrderingIssue]) -> String {
    let mut out = String::new();
    if report.is_clean() && issues.is_empty() {
        let _ = writeln!(out, "No findings.");
        return out;
    }

    if !report.is_clean() {
        let _ = writeln!(out, "Shape warnings:");
        for warning in &report.warnings {
            let _ = writeln!(out, "  - {}", warning);
        }
    }
    if !issues.is_empty() {
        let _ = writeln!(out, "Grade ordering:");
        for issue in issues {
            let _ = writeln!(out, "  - {}", issue);
        }
    }
    out
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use span_core::{default_dataset, resolve, Selection};

    #[test]
    fn test_result_text_for_wall() {
        let dataset = default_dataset().unwrap();
        let selection = Selection::new("stud_walls")
            .grade("C16")
            .size("38x140")
            .subtype("external_wall")
            .spacing("400");
        let result = resolve(dataset, &selection).unwrap();
        let text = result_text(&result, dataset.disclaimer());

        assert!(text.contains("STUD WALLS"));
        assert!(text.contains("Type:     External Wall"));
        assert!(text.contains("Maximum Height: "));
        assert!(text.contains("Wind:      0.8 kN/m²"));
        assert!(text.contains("buckling check: euler_buckling"));
        assert!(text.contains("Part L"));
        assert!(text.ends_with(&format!("{}\n", dataset.disclaimer())));
    }

    #[test]
    fn test_result_text_for_joist() {
        let dataset = default_dataset().unwrap();
        let selection = Selection::new("floor_joists").grade("C16").size("47x150").spacing("400");
        let result = resolve(dataset, &selection).unwrap();
        let text = result_text(&result, "");

        assert!(text.contains("Maximum Span: 3.28m [OK]"));
        assert!(text.contains("Adequate span capability"));
        assert!(text.contains("Spacing:  400mm centres"));
        assert!(text.contains("Size:     47x150 (47mm x 150mm, 7050 mm²)"));
        assert!(!text.contains("Type:"));
    }

    #[test]
    fn test_sources_text() {
        let dataset = default_dataset().unwrap();
        let text = sources_text(dataset);
        assert!(text.contains("v3.0.0"));
        assert!(text.contains("Created: 2025-07-14"));
        assert!(text.contains("21. "));
    }

    #[test]
    fn test_audit_text_clean() {
        assert_eq!(audit_text(&ValidationReport::default(), &[]), "No findings.\n");
    }
}
