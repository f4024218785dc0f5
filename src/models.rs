//! Data models for the score analytics tool.
//!
//! This module contains the record types consumed from the dataset
//! boundary and the result shapes handed to the report renderers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A student record from the dataset snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Student number, unique and stable for the student's lifetime.
    pub student_id: String,
    /// Full name.
    pub name: String,
    /// Gender label, free text.
    #[serde(default = "default_gender")]
    pub gender: String,
    /// Major, stored as free text but reported against a fixed list.
    pub major: String,
    /// Class label, stored under the `class` key.
    #[serde(rename = "class", default)]
    pub class_label: String,
    /// Hometown, free text; may be absent.
    #[serde(default)]
    pub hometown: Option<String>,
}

fn default_gender() -> String {
    "男".to_string()
}

/// A course record from the dataset snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Course identifier.
    pub course_id: i64,
    /// Course name, unique across the dataset.
    pub course_name: String,
    /// Credit count, positive.
    pub credit: u32,
}

/// One score for one (student, course) pair.
///
/// The dataset loader guarantees at most one record per pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Owning student's number.
    pub student_id: String,
    /// Scored course's identifier.
    pub course_id: i64,
    /// Numeric score value.
    pub score: f64,
}

/// The five-bucket score histogram used by the visualization view.
///
/// The serialized key labels are a rendering contract and must not
/// change. Bucket boundaries are half-open on the lower bound; the top
/// bucket is closed at 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    /// Scores below 60.
    #[serde(rename = "<60")]
    pub below_60: usize,
    /// Scores in [60, 70).
    #[serde(rename = "60-70")]
    pub from_60: usize,
    /// Scores in [70, 80).
    #[serde(rename = "70-80")]
    pub from_70: usize,
    /// Scores in [80, 90).
    #[serde(rename = "80-90")]
    pub from_80: usize,
    /// Scores of 90 and above.
    #[serde(rename = "90-100")]
    pub from_90: usize,
}

impl ScoreDistribution {
    /// Total number of counted scores across all buckets.
    pub fn total(&self) -> usize {
        self.below_60 + self.from_60 + self.from_70 + self.from_80 + self.from_90
    }
}

/// The three-band view used by the per-student score page.
///
/// A distinct, coarser scheme than [`ScoreDistribution`]; the two are
/// never unified. The serialized labels are a rendering contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeBandSummary {
    /// Scores below 60.
    #[serde(rename = "不及格")]
    pub fail: usize,
    /// Scores in [60, 90).
    #[serde(rename = "及格")]
    pub pass: usize,
    /// Scores of 90 and above.
    #[serde(rename = "优秀")]
    pub excellent: usize,
}

impl GradeBandSummary {
    /// Total number of counted scores across all bands.
    #[allow(dead_code)] // Utility for report consumers
    pub fn total(&self) -> usize {
        self.fail + self.pass + self.excellent
    }
}

/// Per-course statistics: rounded average and five-number summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSummary {
    /// Mean score rounded to 1 decimal place; 0.0 for a course with no
    /// scores.
    pub average: f64,
    /// `[min, q1, median, q3, max]` box-plot data. The minimum is
    /// floored at 50 for display; an empty course gets the fixed
    /// placeholder `[60, 68, 75, 82, 90]`.
    pub summary: [f64; 5],
}

/// Per-student statistics: unrounded average and grade bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentScoreSummary {
    /// Mean score, unrounded; 0.0 for a student with no scores.
    pub average: f64,
    /// Grade-band counts over the same scores.
    pub bands: GradeBandSummary,
}

/// The fixed-shape result structure consumed by the rendering layer.
///
/// `majors`/`major_scores` are positionally aligned, as are
/// `course_names`/`course_avgs`/`boxplot_data` (ordered by course id
/// ascending) and `hometown_names`/`hometown_counts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisualizationReport {
    /// Whole-system five-bucket histogram.
    pub distribution: ScoreDistribution,
    /// Five-bucket histogram per course, keyed by course id.
    pub course_distributions: BTreeMap<i64, ScoreDistribution>,
    /// The fixed ordered major list the averages were computed over.
    pub majors: Vec<String>,
    /// Average score per major, aligned with `majors`.
    pub major_scores: Vec<f64>,
    /// Course names ordered by course id ascending.
    pub course_names: Vec<String>,
    /// Average score per course, aligned with `course_names`.
    pub course_avgs: Vec<f64>,
    /// Box-plot five-number summary per course, aligned with
    /// `course_names`.
    pub boxplot_data: Vec<[f64; 5]>,
    /// Hometown labels in first-seen order.
    pub hometown_names: Vec<String>,
    /// Student count per hometown, aligned with `hometown_names`.
    pub hometown_counts: Vec<usize>,
}

/// Dataset-wide counts and the most recently added students.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Overview {
    /// Number of students in the dataset.
    pub student_count: usize,
    /// Number of courses in the dataset.
    pub course_count: usize,
    /// Number of score records in the dataset.
    pub score_count: usize,
    /// The latest students by student id descending.
    pub recent_students: Vec<Student>,
}

/// A score joined with its student and course names for listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub student_id: String,
    pub student_name: String,
    pub course_id: i64,
    pub course_name: String,
    pub score: f64,
}

/// Everything the per-student report section needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentReport {
    /// The student the report is about.
    pub student: Student,
    /// The student's scores joined with course names.
    pub rows: Vec<ScoreRow>,
    /// Average and grade bands over those scores.
    pub summary: StudentScoreSummary,
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Path of the dataset snapshot the report was computed from.
    pub dataset_path: String,
    /// Date and time of generation.
    pub generated_at: DateTime<Utc>,
    /// Number of students in the dataset.
    pub student_count: usize,
    /// Number of courses in the dataset.
    pub course_count: usize,
    /// Number of score records in the dataset.
    pub score_count: usize,
    /// Wall-clock duration of the computation in seconds.
    pub duration_seconds: f64,
}

/// The complete report bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// Dataset-wide counts and recent students.
    pub overview: Overview,
    /// The aggregated visualization data.
    pub visualization: VisualizationReport,
    /// Optional per-student section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<StudentReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_total() {
        let dist = ScoreDistribution {
            below_60: 1,
            from_60: 2,
            from_70: 3,
            from_80: 4,
            from_90: 5,
        };
        assert_eq!(dist.total(), 15);
        assert_eq!(ScoreDistribution::default().total(), 0);
    }

    #[test]
    fn test_distribution_serialized_labels() {
        let dist = ScoreDistribution {
            below_60: 1,
            from_60: 0,
            from_70: 0,
            from_80: 0,
            from_90: 2,
        };
        let json = serde_json::to_value(&dist).unwrap();

        assert_eq!(json["<60"], 1);
        assert_eq!(json["60-70"], 0);
        assert_eq!(json["70-80"], 0);
        assert_eq!(json["80-90"], 0);
        assert_eq!(json["90-100"], 2);
    }

    #[test]
    fn test_grade_band_serialized_labels() {
        let bands = GradeBandSummary {
            fail: 1,
            pass: 2,
            excellent: 3,
        };
        let json = serde_json::to_value(&bands).unwrap();

        assert_eq!(json["不及格"], 1);
        assert_eq!(json["及格"], 2);
        assert_eq!(json["优秀"], 3);
        assert_eq!(bands.total(), 6);
    }

    #[test]
    fn test_student_class_key_rename() {
        let json = r#"{
            "student_id": "2301610230",
            "name": "虞桓毅",
            "gender": "男",
            "major": "数据科学",
            "class": "23016102",
            "hometown": "黄石"
        }"#;

        let student: Student = serde_json::from_str(json).unwrap();
        assert_eq!(student.class_label, "23016102");
        assert_eq!(student.hometown.as_deref(), Some("黄石"));

        let back = serde_json::to_value(&student).unwrap();
        assert_eq!(back["class"], "23016102");
    }

    #[test]
    fn test_student_defaults() {
        let json = r#"{
            "student_id": "2301610001",
            "name": "张三",
            "major": "软件工程"
        }"#;

        let student: Student = serde_json::from_str(json).unwrap();
        assert_eq!(student.gender, "男");
        assert_eq!(student.class_label, "");
        assert!(student.hometown.is_none());
    }
}
