//! Score aggregation and report assembly.
//!
//! This module is the reporting core: pure, deterministic functions
//! over in-memory record slices. Fetching records is the dataset
//! layer's job and rendering is the report layer's job; nothing here
//! performs I/O or mutates its inputs.

use crate::analysis::stats::{self, mean, round1, DEFAULT_MAJOR_AVERAGE};
use crate::dataset::Dataset;
use crate::models::{
    GradeBandSummary, Overview, ScoreDistribution, ScoreRecord, ScoreRow, Student, StudentReport,
    StudentScoreSummary, VisualizationReport,
};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Group label for students with a missing or empty hometown.
pub const UNKNOWN_HOMETOWN: &str = "未知";

/// Count scores into the five-bucket histogram.
///
/// Lower bounds are inclusive, upper bounds exclusive, except the top
/// bucket which is closed: 60.0 counts under `60-70` and 90.0 under
/// `90-100`. The predicates partition the whole number line, so
/// out-of-range values still land in exactly one bucket (negatives
/// under `<60`, values above 100 under `90-100`) and the bucket totals
/// always sum to the input length.
pub fn score_distribution(scores: &[f64]) -> ScoreDistribution {
    let mut dist = ScoreDistribution::default();

    for &value in scores {
        if value < 60.0 {
            dist.below_60 += 1;
        } else if value < 70.0 {
            dist.from_60 += 1;
        } else if value < 80.0 {
            dist.from_70 += 1;
        } else if value < 90.0 {
            dist.from_80 += 1;
        } else {
            dist.from_90 += 1;
        }
    }

    dist
}

/// Count scores into the coarse three-band view of the student page.
pub fn grade_band_summary(scores: &[f64]) -> GradeBandSummary {
    let mut bands = GradeBandSummary::default();

    for &value in scores {
        if value < 60.0 {
            bands.fail += 1;
        } else if value < 90.0 {
            bands.pass += 1;
        } else {
            bands.excellent += 1;
        }
    }

    bands
}

/// Average (unrounded, 0.0 when empty) and grade bands for one
/// student's scores.
pub fn student_summary(scores: &[f64]) -> StudentScoreSummary {
    StudentScoreSummary {
        average: mean(scores),
        bands: grade_band_summary(scores),
    }
}

/// Average score per major, aligned positionally with `majors`.
///
/// A major with no scores reports [`DEFAULT_MAJOR_AVERAGE`]. The
/// output length always equals the major-list length.
pub fn major_averages(majors: &[String], students: &[Student], scores: &[ScoreRecord]) -> Vec<f64> {
    majors
        .iter()
        .map(|major| {
            let member_ids: HashSet<&str> = students
                .iter()
                .filter(|s| s.major == *major)
                .map(|s| s.student_id.as_str())
                .collect();

            let values: Vec<f64> = scores
                .iter()
                .filter(|r| member_ids.contains(r.student_id.as_str()))
                .map(|r| r.score)
                .collect();

            if values.is_empty() {
                DEFAULT_MAJOR_AVERAGE
            } else {
                round1(mean(&values))
            }
        })
        .collect()
}

/// Group students by hometown into parallel (label, count) sequences.
///
/// Groups appear in first-seen order over the student sequence, which
/// makes the output deterministic for a given input ordering. A
/// missing or empty hometown is its own group, [`UNKNOWN_HOMETOWN`].
pub fn hometown_distribution(students: &[Student]) -> (Vec<String>, Vec<usize>) {
    let mut names: Vec<String> = Vec::new();
    let mut counts: Vec<usize> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for student in students {
        let label = match student.hometown.as_deref() {
            Some(h) if !h.is_empty() => h.to_string(),
            _ => UNKNOWN_HOMETOWN.to_string(),
        };

        match index.get(&label) {
            Some(&i) => counts[i] += 1,
            None => {
                index.insert(label.clone(), names.len());
                names.push(label);
                counts.push(1);
            }
        }
    }

    (names, counts)
}

/// Assemble the fixed-shape visualization result over a dataset.
///
/// Course-aligned sequences are ordered by course id ascending.
pub fn visualization_report(dataset: &Dataset, majors: &[String]) -> VisualizationReport {
    let all_scores: Vec<f64> = dataset.scores.iter().map(|r| r.score).collect();
    let distribution = score_distribution(&all_scores);

    let major_scores = major_averages(majors, &dataset.students, &dataset.scores);

    let mut course_names = Vec::new();
    let mut course_avgs = Vec::new();
    let mut boxplot_data = Vec::new();
    let mut course_distributions = BTreeMap::new();

    for course in dataset.courses_by_id() {
        let scores = dataset.scores_for_course(course.course_id);

        let summary = stats::course_summary(&scores);
        course_names.push(course.course_name.clone());
        course_avgs.push(summary.average);
        boxplot_data.push(summary.summary);
        course_distributions.insert(course.course_id, score_distribution(&scores));
    }

    let (hometown_names, hometown_counts) = hometown_distribution(&dataset.students);

    VisualizationReport {
        distribution,
        course_distributions,
        majors: majors.to_vec(),
        major_scores,
        course_names,
        course_avgs,
        boxplot_data,
        hometown_names,
        hometown_counts,
    }
}

/// Dataset-wide counts plus the latest students by id descending.
pub fn overview(dataset: &Dataset, recent_limit: usize) -> Overview {
    let mut recent: Vec<Student> = dataset.students.clone();
    recent.sort_by(|a, b| b.student_id.cmp(&a.student_id));
    recent.truncate(recent_limit);

    Overview {
        student_count: dataset.students.len(),
        course_count: dataset.courses.len(),
        score_count: dataset.scores.len(),
        recent_students: recent,
    }
}

/// Join scores with student and course names, optionally filtered.
///
/// Rows keep the dataset's score order. The loader has already
/// verified referential integrity, so every score resolves.
pub fn score_rows(
    dataset: &Dataset,
    student_filter: Option<&str>,
    course_filter: Option<i64>,
) -> Vec<ScoreRow> {
    let mut rows = Vec::new();

    for record in &dataset.scores {
        if let Some(id) = student_filter {
            if record.student_id != id {
                continue;
            }
        }
        if let Some(id) = course_filter {
            if record.course_id != id {
                continue;
            }
        }

        let (Some(student), Some(course)) = (
            dataset.student(&record.student_id),
            dataset.course(record.course_id),
        ) else {
            continue;
        };

        rows.push(ScoreRow {
            student_id: record.student_id.clone(),
            student_name: student.name.clone(),
            course_id: record.course_id,
            course_name: course.course_name.clone(),
            score: record.score,
        });
    }

    rows
}

/// The per-student report: joined rows plus average and grade bands.
///
/// Returns `None` when the student id is not in the dataset.
pub fn student_report(dataset: &Dataset, student_id: &str) -> Option<StudentReport> {
    let student = dataset.student(student_id)?.clone();
    let rows = score_rows(dataset, Some(student_id), None);
    let values = dataset.scores_for_student(student_id);

    Some(StudentReport {
        student,
        rows,
        summary: student_summary(&values),
    })
}
