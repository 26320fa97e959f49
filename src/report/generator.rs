//! Text and JSON report generation.
//!
//! Dataset and model reports use a fixed Indonesian layout. The audit report
//! wraps both with run metadata and the recommendation list.

use crate::models::{AuditReport, DatasetAnalysis, Metric, ModelAnalysis, ReportMetadata};
use anyhow::Result;
use std::path::Path;

const RULE_WIDTH: usize = 30;

/// `0.6` -> `60.00%`.
fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Render the dataset distribution report.
pub fn format_dataset_report(analysis: &DatasetAnalysis, detailed: bool) -> String {
    let mut lines = vec![
        "Laporan Analisis Bias Dataset".to_string(),
        "=".repeat(RULE_WIDTH),
    ];

    for dist in &analysis.attributes {
        lines.push(format!("\nAnalisis untuk atribut: '{}'", dist.attribute));
        lines.push("-".repeat(25 + dist.attribute.chars().count()));

        if dist.categories.is_empty() {
            lines.push("Tidak ada data untuk dianalisis.".to_string());
            continue;
        }

        for share in &dist.categories {
            if detailed {
                lines.push(format!(
                    "- Kategori '{}': {} ({} sampel)",
                    share.category,
                    percent(share.proportion),
                    share.count
                ));
            } else {
                lines.push(format!(
                    "- Kategori '{}': {}",
                    share.category,
                    percent(share.proportion)
                ));
            }
        }
    }

    lines.join("\n")
}

/// Render the model performance report.
pub fn format_model_report(analysis: &ModelAnalysis) -> String {
    let mut lines = vec![
        "Laporan Analisis Bias Model".to_string(),
        "=".repeat(RULE_WIDTH),
    ];

    lines.push("\nKinerja Keseluruhan:".to_string());
    for metric in Metric::ALL {
        lines.push(format!(
            "  - {}: {}",
            metric.report_label(),
            percent(analysis.overall.get(metric))
        ));
    }

    for attr in &analysis.attributes {
        lines.push(format!("\nAnalisis Kinerja berdasarkan '{}':", attr.attribute));
        lines.push("-".repeat(30 + attr.attribute.chars().count()));

        for group in &attr.groups {
            lines.push(format!("  Kelompok '{}':", group.category));
            for metric in Metric::ALL {
                lines.push(format!(
                    "    - {}: {}",
                    metric.report_label(),
                    percent(group.metrics.get(metric))
                ));
            }
        }
    }

    lines.join("\n")
}

/// Generate the complete text report.
pub fn generate_text_report(report: &AuditReport, detailed: bool) -> String {
    let mut output = String::new();

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str("\n\n");
    output.push_str(&format_dataset_report(&report.dataset, detailed));

    if let Some(ref model) = report.model {
        output.push_str("\n\n");
        output.push_str(&format_model_report(model));
    }

    output.push_str("\n\n");
    output.push_str(&generate_recommendations_section(&report.recommendations));
    output.push('\n');

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut lines = vec![
        "Laporan Audit Bias".to_string(),
        "=".repeat(RULE_WIDTH),
        format!("Data: {}", metadata.data_path),
        format!(
            "Tanggal Analisis: {}",
            metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        format!("Jumlah Baris: {}", metadata.rows),
        format!("Jumlah Kolom: {}", metadata.columns),
        format!(
            "Atribut Sensitif: {}",
            metadata.sensitive_attributes.join(", ")
        ),
    ];

    if let Some(ref target) = metadata.target {
        lines.push(format!("Variabel Target: {}", target));
    }
    if let Some(ref model) = metadata.model_name {
        lines.push(format!("Model: {}", model));
    }
    lines.push(format!("Durasi Analisis: {:.3}s", metadata.duration_seconds));

    lines.join("\n")
}

/// Generate the recommendations section.
fn generate_recommendations_section(recommendations: &[String]) -> String {
    let mut lines = vec!["Rekomendasi Mitigasi".to_string(), "=".repeat(RULE_WIDTH)];

    for (i, rec) in recommendations.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, rec));
    }

    lines.join("\n")
}

/// Generate a JSON report.
pub fn generate_json_report(report: &AuditReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write report content to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    std::fs::write(path, content)?;
    Ok(())
}
