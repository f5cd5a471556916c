// 📒 Academic Ledgers - enrollment, attendance, exam scores, final grades
//
// Two independent ledgers:
// - StudentLedger: a student's own view (keyed by course code)
// - FacultyLedger: a faculty member's records (keyed by student id, then course code)
//
// Nothing propagates between them. A faculty member recording attendance for
// student 42 does not touch student 42's own ledger, and vice versa.
//
// All maps are BTreeMaps so reports iterate in a fixed order:
// course codes and exam labels lexicographically, student ids ascending.

use crate::entities::course::Course;
use crate::error::RecordError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Numeric student id as entered at registration
pub type StudentId = i32;

/// Exam label → score, for one course
pub type ExamScores = BTreeMap<String, f64>;

// ============================================================================
// STUDENT LEDGER
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentLedger {
    /// Enrolled courses, in enrollment order
    enrolled: Vec<Course>,

    /// Course code → attendance percentage (unbounded, last write wins)
    attendance: BTreeMap<String, i32>,

    /// Course code → exam label → score
    exam_scores: BTreeMap<String, ExamScores>,

    final_grade: f64,
}

impl StudentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enroll in a course.
    ///
    /// Enrollment also seeds attendance at 0 and an empty exam entry for the
    /// course code, so both exist as soon as the call returns.
    pub fn add_course(&mut self, course: Course) -> Result<(), RecordError> {
        if self.is_enrolled(course.code()) {
            return Err(RecordError::duplicate_course(course.code()));
        }
        self.attendance.insert(course.code().to_string(), 0);
        self.exam_scores
            .insert(course.code().to_string(), ExamScores::new());
        self.enrolled.push(course);
        Ok(())
    }

    pub fn is_enrolled(&self, code: &str) -> bool {
        self.enrolled.iter().any(|c| c.code() == code)
    }

    /// Overwrite the attendance percentage for an enrolled course
    pub fn update_attendance(&mut self, code: &str, value: i32) -> Result<(), RecordError> {
        if !self.is_enrolled(code) {
            return Err(RecordError::unknown_course(code));
        }
        self.attendance.insert(code.to_string(), value);
        Ok(())
    }

    /// Upsert a score; re-recording the same (course, exam) replaces the old value
    pub fn record_exam_score(
        &mut self,
        code: &str,
        exam_type: &str,
        score: f64,
    ) -> Result<(), RecordError> {
        if !self.is_enrolled(code) {
            return Err(RecordError::unknown_course(code));
        }
        self.exam_scores
            .entry(code.to_string())
            .or_default()
            .insert(exam_type.to_string(), score);
        Ok(())
    }

    pub fn set_final_grade(&mut self, grade: f64) {
        self.final_grade = grade;
    }

    pub fn enrolled_courses(&self) -> &[Course] {
        &self.enrolled
    }

    pub fn attendance(&self, code: &str) -> Option<i32> {
        self.attendance.get(code).copied()
    }

    pub fn attendance_entries(&self) -> &BTreeMap<String, i32> {
        &self.attendance
    }

    pub fn exam_scores_for(&self, code: &str) -> Option<&ExamScores> {
        self.exam_scores.get(code)
    }

    pub fn exam_score(&self, code: &str, exam_type: &str) -> Option<f64> {
        self.exam_scores.get(code)?.get(exam_type).copied()
    }

    pub fn exam_entries(&self) -> &BTreeMap<String, ExamScores> {
        &self.exam_scores
    }

    pub fn final_grade(&self) -> f64 {
        self.final_grade
    }

    /// True when nothing beyond the defaults has been recorded
    pub fn is_empty(&self) -> bool {
        self.enrolled.is_empty()
            && self.attendance.is_empty()
            && self.exam_scores.is_empty()
            && self.final_grade == 0.0
    }

    // ------------------------------------------------------------------------
    // Reports (pure reads)
    // ------------------------------------------------------------------------

    pub fn attendance_report(&self) -> String {
        if self.attendance.is_empty() {
            return "No attendance recorded.\n".to_string();
        }
        let mut out = String::from("Attendance Report:\n");
        for (code, pct) in &self.attendance {
            out.push_str(&format!("Course: {} | Attendance: {}%\n", code, pct));
        }
        out
    }

    pub fn exam_score_report(&self) -> String {
        if self.exam_scores.is_empty() {
            return "No exam scores recorded.\n".to_string();
        }
        let mut out = String::from("Exam Scores:\n");
        for (code, exams) in &self.exam_scores {
            out.push_str(&format!("Course: {}\n", code));
            for (exam, score) in exams {
                out.push_str(&format!("  Exam: {} | Score: {}\n", exam, score));
            }
        }
        out
    }

    pub fn grade_report(&self) -> String {
        format!("Final Grade: {}\n", self.final_grade)
    }

    pub fn enrollment_report(&self) -> String {
        if self.enrolled.is_empty() {
            return "No courses enrolled.\n".to_string();
        }
        let mut out = String::from("Enrolled Courses:\n");
        for course in &self.enrolled {
            out.push_str(&course.display_line());
            out.push('\n');
        }
        out
    }
}

// ============================================================================
// FACULTY LEDGER
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacultyLedger {
    assigned: Vec<Course>,

    /// Student id → course code → attendance percentage
    attendance: BTreeMap<StudentId, BTreeMap<String, i32>>,

    /// Student id → course code → exam label → score
    exam_scores: BTreeMap<StudentId, BTreeMap<String, ExamScores>>,

    /// Student id → course code → final grade
    final_grades: BTreeMap<StudentId, BTreeMap<String, f64>>,
}

impl FacultyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign_course(&mut self, course: Course) -> Result<(), RecordError> {
        if self.is_assigned(course.code()) {
            return Err(RecordError::duplicate_course(course.code()));
        }
        self.assigned.push(course);
        Ok(())
    }

    pub fn is_assigned(&self, code: &str) -> bool {
        self.assigned.iter().any(|c| c.code() == code)
    }

    fn require_assigned(&self, code: &str) -> Result<(), RecordError> {
        if self.is_assigned(code) {
            Ok(())
        } else {
            Err(RecordError::unknown_course(code))
        }
    }

    pub fn record_attendance(
        &mut self,
        student_id: StudentId,
        code: &str,
        value: i32,
    ) -> Result<(), RecordError> {
        self.require_assigned(code)?;
        self.attendance
            .entry(student_id)
            .or_default()
            .insert(code.to_string(), value);
        Ok(())
    }

    pub fn record_exam_score(
        &mut self,
        student_id: StudentId,
        code: &str,
        exam_type: &str,
        score: f64,
    ) -> Result<(), RecordError> {
        self.require_assigned(code)?;
        self.exam_scores
            .entry(student_id)
            .or_default()
            .entry(code.to_string())
            .or_default()
            .insert(exam_type.to_string(), score);
        Ok(())
    }

    pub fn assign_final_grade(
        &mut self,
        student_id: StudentId,
        code: &str,
        grade: f64,
    ) -> Result<(), RecordError> {
        self.require_assigned(code)?;
        self.final_grades
            .entry(student_id)
            .or_default()
            .insert(code.to_string(), grade);
        Ok(())
    }

    pub fn assigned_courses(&self) -> &[Course] {
        &self.assigned
    }

    pub fn attendance(&self, student_id: StudentId, code: &str) -> Option<i32> {
        self.attendance.get(&student_id)?.get(code).copied()
    }

    pub fn exam_score(&self, student_id: StudentId, code: &str, exam_type: &str) -> Option<f64> {
        self.exam_scores
            .get(&student_id)?
            .get(code)?
            .get(exam_type)
            .copied()
    }

    pub fn exam_scores_for(&self, student_id: StudentId, code: &str) -> Option<&ExamScores> {
        self.exam_scores.get(&student_id)?.get(code)
    }

    pub fn final_grade(&self, student_id: StudentId, code: &str) -> Option<f64> {
        self.final_grades.get(&student_id)?.get(code).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
            && self.attendance.is_empty()
            && self.exam_scores.is_empty()
            && self.final_grades.is_empty()
    }

    // ------------------------------------------------------------------------
    // Reports (pure reads)
    // ------------------------------------------------------------------------

    pub fn assigned_course_report(&self) -> String {
        if self.assigned.is_empty() {
            return "No courses assigned.\n".to_string();
        }
        let mut out = String::from("Assigned Courses:\n");
        for course in &self.assigned {
            out.push_str(&course.display_line());
            out.push('\n');
        }
        out
    }

    pub fn student_attendance_report(&self) -> String {
        if self.attendance.is_empty() {
            return "No attendance records available.\n".to_string();
        }
        let mut out = String::from("Attendance Records for Assigned Courses:\n");
        for (student_id, courses) in &self.attendance {
            out.push_str(&format!("Student ID: {}\n", student_id));
            for (code, pct) in courses {
                out.push_str(&format!("  Course: {} | Attendance: {}%\n", code, pct));
            }
        }
        out
    }

    pub fn student_exam_score_report(&self) -> String {
        if self.exam_scores.is_empty() {
            return "No exam scores recorded.\n".to_string();
        }
        let mut out = String::from("Exam Scores for Assigned Courses:\n");
        for (student_id, courses) in &self.exam_scores {
            out.push_str(&format!("Student ID: {}\n", student_id));
            for (code, exams) in courses {
                out.push_str(&format!("  Course: {}\n", code));
                for (exam, score) in exams {
                    out.push_str(&format!("    Exam: {} | Score: {}\n", exam, score));
                }
            }
        }
        out
    }

    pub fn student_final_grade_report(&self) -> String {
        if self.final_grades.is_empty() {
            return "No final grades assigned.\n".to_string();
        }
        let mut out = String::from("Final Grades for Assigned Courses:\n");
        for (student_id, courses) in &self.final_grades {
            out.push_str(&format!("Student ID: {}\n", student_id));
            for (code, grade) in courses {
                out.push_str(&format!("  Course: {} | Final Grade: {}\n", code, grade));
            }
        }
        out
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cs101() -> Course {
        Course::new("CS101", "Intro to Programming")
    }

    #[test]
    fn test_add_course_seeds_ledgers() {
        let mut ledger = StudentLedger::new();
        ledger.add_course(cs101()).unwrap();

        assert_eq!(ledger.enrolled_courses().len(), 1);
        assert_eq!(ledger.attendance("CS101"), Some(0));

        let exams = ledger.exam_scores_for("CS101");
        assert!(exams.is_some());
        assert!(exams.unwrap().is_empty());
    }

    #[test]
    fn test_add_course_twice_rejected() {
        let mut ledger = StudentLedger::new();
        ledger.add_course(cs101()).unwrap();
        ledger.update_attendance("CS101", 80).unwrap();

        let result = ledger.add_course(Course::new("CS101", "Renamed"));
        assert!(result.is_err());
        assert_eq!(ledger.enrolled_courses().len(), 1);
        assert_eq!(ledger.attendance("CS101"), Some(80));
    }

    #[test]
    fn test_update_attendance_last_write_wins() {
        let mut ledger = StudentLedger::new();
        ledger.add_course(cs101()).unwrap();

        ledger.update_attendance("CS101", 60).unwrap();
        ledger.update_attendance("CS101", 45).unwrap();
        assert_eq!(ledger.attendance("CS101"), Some(45));

        // No range enforcement
        ledger.update_attendance("CS101", 140).unwrap();
        assert_eq!(ledger.attendance("CS101"), Some(140));
    }

    #[test]
    fn test_unknown_course_rejected_without_mutation() {
        let mut ledger = StudentLedger::new();

        assert_eq!(
            ledger.update_attendance("CS999", 50),
            Err(RecordError::unknown_course("CS999"))
        );
        assert_eq!(
            ledger.record_exam_score("CS999", "midterm", 70.0),
            Err(RecordError::unknown_course("CS999"))
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_exam_score_overwrites() {
        let mut ledger = StudentLedger::new();
        ledger.add_course(Course::new("CS1", "Computing")).unwrap();

        ledger.record_exam_score("CS1", "midterm", 70.0).unwrap();
        ledger.record_exam_score("CS1", "midterm", 85.0).unwrap();

        let exams = ledger.exam_scores_for("CS1").unwrap();
        assert_eq!(exams.len(), 1);
        assert_eq!(exams.get("midterm"), Some(&85.0));
    }

    #[test]
    fn test_student_reports_empty() {
        let ledger = StudentLedger::new();
        assert_eq!(ledger.attendance_report(), "No attendance recorded.\n");
        assert_eq!(ledger.exam_score_report(), "No exam scores recorded.\n");
        assert_eq!(ledger.enrollment_report(), "No courses enrolled.\n");
        assert_eq!(ledger.grade_report(), "Final Grade: 0\n");
    }

    #[test]
    fn test_student_reports_sorted_by_code() {
        let mut ledger = StudentLedger::new();
        ledger.add_course(Course::new("MA201", "Linear Algebra")).unwrap();
        ledger.add_course(cs101()).unwrap();
        ledger.update_attendance("MA201", 90).unwrap();
        ledger.record_exam_score("CS101", "quiz", 9.5).unwrap();
        ledger.record_exam_score("CS101", "final", 88.0).unwrap();

        assert_eq!(
            ledger.attendance_report(),
            "Attendance Report:\nCourse: CS101 | Attendance: 0%\nCourse: MA201 | Attendance: 90%\n"
        );
        assert_eq!(
            ledger.exam_score_report(),
            "Exam Scores:\nCourse: CS101\n  Exam: final | Score: 88\n  Exam: quiz | Score: 9.5\nCourse: MA201\n"
        );
        // Enrollment keeps insertion order
        assert!(ledger
            .enrollment_report()
            .starts_with("Enrolled Courses:\nCourse Code: MA201"));
    }

    #[test]
    fn test_reports_do_not_mutate() {
        let mut ledger = StudentLedger::new();
        ledger.add_course(cs101()).unwrap();
        let before = ledger.clone();

        let _ = ledger.attendance_report();
        let _ = ledger.exam_score_report();
        let _ = ledger.enrollment_report();
        let _ = ledger.grade_report();

        assert_eq!(ledger, before);
    }

    #[test]
    fn test_faculty_requires_assigned_course() {
        let mut faculty = FacultyLedger::new();

        assert!(faculty.record_attendance(7, "CS101", 90).is_err());
        assert!(faculty.is_empty());

        faculty.assign_course(cs101()).unwrap();
        faculty.record_attendance(7, "CS101", 90).unwrap();
        assert_eq!(faculty.attendance(7, "CS101"), Some(90));
        assert_eq!(faculty.attendance(8, "CS101"), None);
    }

    #[test]
    fn test_faculty_exam_scores_and_grades() {
        let mut faculty = FacultyLedger::new();
        faculty.assign_course(cs101()).unwrap();

        faculty.record_exam_score(7, "CS101", "midterm", 70.0).unwrap();
        faculty.record_exam_score(7, "CS101", "midterm", 75.0).unwrap();
        faculty.record_exam_score(7, "CS101", "final", 80.0).unwrap();
        faculty.assign_final_grade(7, "CS101", 3.5).unwrap();

        assert_eq!(faculty.exam_scores_for(7, "CS101").unwrap().len(), 2);
        assert_eq!(faculty.exam_score(7, "CS101", "midterm"), Some(75.0));
        assert_eq!(faculty.final_grade(7, "CS101"), Some(3.5));
    }

    #[test]
    fn test_faculty_reports() {
        let mut faculty = FacultyLedger::new();
        assert_eq!(
            faculty.student_attendance_report(),
            "No attendance records available.\n"
        );
        assert_eq!(
            faculty.student_exam_score_report(),
            "No exam scores recorded.\n"
        );
        assert_eq!(
            faculty.student_final_grade_report(),
            "No final grades assigned.\n"
        );

        faculty.assign_course(cs101()).unwrap();
        faculty.record_attendance(12, "CS101", 70).unwrap();
        faculty.record_attendance(3, "CS101", 95).unwrap();
        faculty.assign_final_grade(3, "CS101", 4.0).unwrap();

        // Student ids ascend numerically
        assert_eq!(
            faculty.student_attendance_report(),
            "Attendance Records for Assigned Courses:\nStudent ID: 3\n  Course: CS101 | Attendance: 95%\nStudent ID: 12\n  Course: CS101 | Attendance: 70%\n"
        );
        assert_eq!(
            faculty.student_final_grade_report(),
            "Final Grades for Assigned Courses:\nStudent ID: 3\n  Course: CS101 | Final Grade: 4\n"
        );
    }
}
