//! Dataset snapshot loading.
//!
//! This module is the read-only persistence boundary: it loads a JSON
//! snapshot of students, courses, and scores, checks that every score
//! resolves to an existing student and course, and hands the
//! aggregation core a clean in-memory `Dataset`.

use crate::models::{Course, ScoreRecord, Student};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Errors produced while loading or validating a dataset snapshot.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read dataset file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse dataset JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate student id: {student_id}")]
    DuplicateStudent { student_id: String },

    #[error("Duplicate course id: {course_id}")]
    DuplicateCourse { course_id: i64 },

    #[error("Duplicate course name: {course_name}")]
    DuplicateCourseName { course_name: String },

    #[error("Score references unknown student: {student_id}")]
    UnknownStudent { student_id: String },

    #[error("Score references unknown course: {course_id}")]
    UnknownCourse { course_id: i64 },
}

/// An in-memory snapshot of the student records.
///
/// Construction always goes through validation: student and course ids
/// are unique, every score resolves to an existing student and course,
/// and at most one score exists per (student, course) pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// All students in the snapshot.
    #[serde(default)]
    pub students: Vec<Student>,
    /// All courses in the snapshot.
    #[serde(default)]
    pub courses: Vec<Course>,
    /// All score records in the snapshot.
    #[serde(default)]
    pub scores: Vec<ScoreRecord>,
}

impl Dataset {
    /// Build a validated dataset from record collections.
    pub fn new(
        students: Vec<Student>,
        courses: Vec<Course>,
        scores: Vec<ScoreRecord>,
    ) -> Result<Self, DatasetError> {
        let mut dataset = Self {
            students,
            courses,
            scores,
        };
        dataset.normalize()?;
        Ok(dataset)
    }

    /// Load and validate a dataset from a JSON snapshot file.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Parse and validate a dataset from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self, DatasetError> {
        let mut dataset: Dataset = serde_json::from_str(content)?;
        dataset.normalize()?;
        Ok(dataset)
    }

    /// Check uniqueness and referential integrity, and collapse
    /// duplicate (student, course) scores to the latest record.
    fn normalize(&mut self) -> Result<(), DatasetError> {
        let mut student_ids: HashSet<&str> = HashSet::new();
        for student in &self.students {
            if !student_ids.insert(student.student_id.as_str()) {
                return Err(DatasetError::DuplicateStudent {
                    student_id: student.student_id.clone(),
                });
            }
        }

        let mut course_ids: HashSet<i64> = HashSet::new();
        let mut course_names: HashSet<&str> = HashSet::new();
        for course in &self.courses {
            if !course_ids.insert(course.course_id) {
                return Err(DatasetError::DuplicateCourse {
                    course_id: course.course_id,
                });
            }
            if !course_names.insert(course.course_name.as_str()) {
                return Err(DatasetError::DuplicateCourseName {
                    course_name: course.course_name.clone(),
                });
            }
        }

        for record in &self.scores {
            if !student_ids.contains(record.student_id.as_str()) {
                return Err(DatasetError::UnknownStudent {
                    student_id: record.student_id.clone(),
                });
            }
            if !course_ids.contains(&record.course_id) {
                return Err(DatasetError::UnknownCourse {
                    course_id: record.course_id,
                });
            }
        }

        // Last-wins dedupe: a later entry for the same (student,
        // course) pair overwrites the earlier one.
        let mut seen: HashMap<(String, i64), usize> = HashMap::new();
        let mut deduped: Vec<ScoreRecord> = Vec::with_capacity(self.scores.len());

        for record in self.scores.drain(..) {
            let key = (record.student_id.clone(), record.course_id);
            match seen.get(&key) {
                Some(&i) => {
                    warn!(
                        "Duplicate score for student {} course {}; keeping the latest value",
                        record.student_id, record.course_id
                    );
                    deduped[i] = record;
                }
                None => {
                    seen.insert(key, deduped.len());
                    deduped.push(record);
                }
            }
        }

        self.scores = deduped;
        Ok(())
    }

    /// Look up a student by id.
    pub fn student(&self, student_id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.student_id == student_id)
    }

    /// Look up a course by id.
    pub fn course(&self, course_id: i64) -> Option<&Course> {
        self.courses.iter().find(|c| c.course_id == course_id)
    }

    /// Courses sorted by course id ascending.
    pub fn courses_by_id(&self) -> Vec<&Course> {
        let mut courses: Vec<&Course> = self.courses.iter().collect();
        courses.sort_by_key(|c| c.course_id);
        courses
    }

    /// Score values for one student, in dataset order.
    pub fn scores_for_student(&self, student_id: &str) -> Vec<f64> {
        self.scores
            .iter()
            .filter(|r| r.student_id == student_id)
            .map(|r| r.score)
            .collect()
    }

    /// Score values for one course, in dataset order.
    pub fn scores_for_course(&self, course_id: i64) -> Vec<f64> {
        self.scores
            .iter()
            .filter(|r| r.course_id == course_id)
            .map(|r| r.score)
            .collect()
    }
}
