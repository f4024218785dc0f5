//! Markdown report generation.
//!
//! This module renders the fixed-shape aggregation results into a
//! sectioned Markdown document, or into pretty-printed JSON.

use crate::models::{
    Overview, Report, ReportMetadata, ScoreDistribution, StudentReport, VisualizationReport,
};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# ScoreLens Report\n\n");

    // Metadata section
    output.push_str(&generate_metadata_section(&report.metadata));

    // Overview section
    output.push_str(&generate_overview_section(&report.overview));

    // Aggregated visualization sections
    output.push_str(&generate_distribution_section(
        "Score Distribution",
        &report.visualization.distribution,
    ));
    output.push_str(&generate_course_section(&report.visualization));
    output.push_str(&generate_major_section(&report.visualization));
    output.push_str(&generate_hometown_section(&report.visualization));

    // Optional per-student section
    if let Some(ref student) = report.student {
        output.push_str(&generate_student_section(student));
    }

    // Footer
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Dataset:** {}\n", metadata.dataset_path));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Students:** {}\n", metadata.student_count));
    section.push_str(&format!("- **Courses:** {}\n", metadata.course_count));
    section.push_str(&format!("- **Scores:** {}\n", metadata.score_count));
    section.push_str(&format!(
        "- **Duration:** {:.3}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the overview section with recent students.
fn generate_overview_section(overview: &Overview) -> String {
    let mut section = String::new();

    section.push_str("## Overview\n\n");
    section.push_str(&format!(
        "{} students, {} courses, {} score records.\n\n",
        overview.student_count, overview.course_count, overview.score_count
    ));

    if !overview.recent_students.is_empty() {
        section.push_str("### Recent Students\n\n");
        section.push_str("| Student ID | Name | Major | Class |\n");
        section.push_str("|:---|:---|:---|:---|\n");

        for student in &overview.recent_students {
            section.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                student.student_id, student.name, student.major, student.class_label
            ));
        }
        section.push('\n');
    }

    section
}

/// Generate a five-bucket histogram table under the given heading.
fn generate_distribution_section(title: &str, dist: &ScoreDistribution) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", title));
    section.push_str("| <60 | 60-70 | 70-80 | 80-90 | 90-100 | **Total** |\n");
    section.push_str("|:---:|:---:|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} | {} | **{}** |\n\n",
        dist.below_60,
        dist.from_60,
        dist.from_70,
        dist.from_80,
        dist.from_90,
        dist.total()
    ));

    section
}

/// Generate the per-course statistics section.
fn generate_course_section(viz: &VisualizationReport) -> String {
    if viz.course_names.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Course Statistics\n\n");
    section.push_str("| Course | Average | Min | Q1 | Median | Q3 | Max |\n");
    section.push_str("|:---|:---:|:---:|:---:|:---:|:---:|:---:|\n");

    for (i, name) in viz.course_names.iter().enumerate() {
        let avg = viz.course_avgs.get(i).copied().unwrap_or(0.0);
        let [min, q1, median, q3, max] = viz.boxplot_data.get(i).copied().unwrap_or_default();
        section.push_str(&format!(
            "| {} | {:.1} | {:.1} | {:.1} | {:.1} | {:.1} | {:.1} |\n",
            name, avg, min, q1, median, q3, max
        ));
    }
    section.push('\n');

    // Per-course histograms, keyed by course id ascending.
    section.push_str("### Course Score Distributions\n\n");
    section.push_str("| Course ID | <60 | 60-70 | 70-80 | 80-90 | 90-100 |\n");
    section.push_str("|:---:|:---:|:---:|:---:|:---:|:---:|\n");
    for (course_id, dist) in &viz.course_distributions {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            course_id, dist.below_60, dist.from_60, dist.from_70, dist.from_80, dist.from_90
        ));
    }
    section.push('\n');

    section
}

/// Generate the per-major averages section.
fn generate_major_section(viz: &VisualizationReport) -> String {
    if viz.majors.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Major Averages\n\n");
    section.push_str("| Major | Average |\n");
    section.push_str("|:---|:---:|\n");

    for (major, avg) in viz.majors.iter().zip(&viz.major_scores) {
        section.push_str(&format!("| {} | {:.1} |\n", major, avg));
    }
    section.push('\n');

    section
}

/// Generate the hometown distribution section.
fn generate_hometown_section(viz: &VisualizationReport) -> String {
    if viz.hometown_names.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Hometown Distribution\n\n");
    section.push_str("| Hometown | Students |\n");
    section.push_str("|:---|:---:|\n");

    for (name, count) in viz.hometown_names.iter().zip(&viz.hometown_counts) {
        section.push_str(&format!("| {} | {} |\n", name, count));
    }
    section.push('\n');

    section
}

/// Generate the per-student section.
fn generate_student_section(report: &StudentReport) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "## Student {} ({})\n\n",
        report.student.name, report.student.student_id
    ));
    section.push_str(&format!(
        "*Major: {} | Class: {} | Average: {:.2}*\n\n",
        report.student.major, report.student.class_label, report.summary.average
    ));

    if report.rows.is_empty() {
        section.push_str("No scores recorded for this student.\n\n");
        return section;
    }

    section.push_str("| Course | Score |\n");
    section.push_str("|:---|:---:|\n");
    for row in &report.rows {
        section.push_str(&format!("| {} | {:.1} |\n", row.course_name, row.score));
    }
    section.push('\n');

    section.push_str("| 不及格 | 及格 | 优秀 |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} |\n\n",
        report.summary.bands.fail, report.summary.bands.pass, report.summary.bands.excellent
    ));

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by ScoreLens*\n");

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        GradeBandSummary, Overview, ScoreRow, Student, StudentScoreSummary, VisualizationReport,
    };
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn create_test_report() -> Report {
        let metadata = ReportMetadata {
            dataset_path: "records.json".to_string(),
            generated_at: Utc::now(),
            student_count: 2,
            course_count: 1,
            score_count: 2,
            duration_seconds: 0.004,
        };

        let student = Student {
            student_id: "2301610001".to_string(),
            name: "李雷".to_string(),
            gender: "男".to_string(),
            major: "数据科学".to_string(),
            class_label: "23016101".to_string(),
            hometown: Some("北京".to_string()),
        };

        let mut course_distributions = BTreeMap::new();
        course_distributions.insert(
            1,
            ScoreDistribution {
                below_60: 0,
                from_60: 1,
                from_70: 0,
                from_80: 1,
                from_90: 0,
            },
        );

        Report {
            metadata,
            overview: Overview {
                student_count: 2,
                course_count: 1,
                score_count: 2,
                recent_students: vec![student.clone()],
            },
            visualization: VisualizationReport {
                distribution: ScoreDistribution {
                    below_60: 0,
                    from_60: 1,
                    from_70: 0,
                    from_80: 1,
                    from_90: 0,
                },
                course_distributions,
                majors: vec!["数据科学".to_string()],
                major_scores: vec![75.5],
                course_names: vec!["高等数学".to_string()],
                course_avgs: vec![75.5],
                boxplot_data: vec![[64.0, 64.0, 75.5, 87.0, 87.0]],
                hometown_names: vec!["北京".to_string()],
                hometown_counts: vec![2],
            },
            student: Some(StudentReport {
                student,
                rows: vec![ScoreRow {
                    student_id: "2301610001".to_string(),
                    student_name: "李雷".to_string(),
                    course_id: 1,
                    course_name: "高等数学".to_string(),
                    score: 87.0,
                }],
                summary: StudentScoreSummary {
                    average: 87.0,
                    bands: GradeBandSummary {
                        fail: 0,
                        pass: 1,
                        excellent: 0,
                    },
                },
            }),
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("# ScoreLens Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Overview"));
        assert!(markdown.contains("## Score Distribution"));
        assert!(markdown.contains("## Course Statistics"));
        assert!(markdown.contains("## Major Averages"));
        assert!(markdown.contains("## Hometown Distribution"));
        assert!(markdown.contains("高等数学"));
        assert!(markdown.contains("## Student 李雷 (2301610001)"));
    }

    #[test]
    fn test_markdown_without_student_section() {
        let mut report = create_test_report();
        report.student = None;

        let markdown = generate_markdown_report(&report);
        assert!(!markdown.contains("## Student"));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let mut report = create_test_report();
        report.student = None;
        report.visualization.course_names.clear();
        report.visualization.hometown_names.clear();
        report.visualization.majors.clear();

        let markdown = generate_markdown_report(&report);
        assert!(!markdown.contains("## Course Statistics"));
        assert!(!markdown.contains("## Major Averages"));
        assert!(!markdown.contains("## Hometown Distribution"));
    }

    #[test]
    fn test_generate_metadata_section() {
        let report = create_test_report();
        let section = generate_metadata_section(&report.metadata);

        assert!(section.contains("records.json"));
        assert!(section.contains("**Students:** 2"));
        assert!(section.contains("**Scores:** 2"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"dataset_path\""));
        assert!(json.contains("\"course_distributions\""));
        assert!(json.contains("\"boxplot_data\""));
        assert!(json.contains("\"<60\""));
        assert!(json.contains("\"不及格\""));
    }
}
