// 📚 Course Entity - code/name value + institution catalog
//
// A Course is a plain value: copied wherever it is referenced, equal by code.

use crate::error::RecordError;
use serde::{Deserialize, Serialize};

// ============================================================================
// COURSE
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Course code, e.g. "CS101" (the key used by every ledger)
    code: String,

    /// Human-readable name, e.g. "Intro to Programming"
    name: String,
}

impl Course {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Course {
            code: code.into(),
            name: name.into(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line display used by enrollment and catalog listings
    pub fn display_line(&self) -> String {
        format!("Course Code: {}, Course Name: {}", self.code, self.name)
    }
}

impl PartialEq for Course {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Course {}

// ============================================================================
// COURSE CATALOG
// ============================================================================

/// Institution-wide list of offered courses, maintained by administrators.
///
/// Insertion order is kept for listings; codes are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseCatalog {
    courses: Vec<Course>,
}

impl CourseCatalog {
    pub fn new() -> Self {
        CourseCatalog {
            courses: Vec::new(),
        }
    }

    /// Add a course; rejects a code that is already listed
    pub fn add(&mut self, course: Course) -> Result<(), RecordError> {
        if self.contains(course.code()) {
            return Err(RecordError::duplicate_course(course.code()));
        }
        self.courses.push(course);
        Ok(())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.courses.iter().any(|c| c.code == code)
    }

    pub fn find(&self, code: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.code == code)
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Render the catalog listing ("View All Courses")
    pub fn listing(&self) -> String {
        if self.courses.is_empty() {
            return "No courses available.\n".to_string();
        }
        let mut out = String::from("Available Courses:\n");
        for course in &self.courses {
            out.push_str(&course.display_line());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_equality_by_code() {
        let a = Course::new("CS101", "Intro to Programming");
        let b = Course::new("CS101", "Programming I");
        let c = Course::new("CS102", "Intro to Programming");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_course_display_line() {
        let course = Course::new("MA201", "Linear Algebra");
        assert_eq!(
            course.display_line(),
            "Course Code: MA201, Course Name: Linear Algebra"
        );
    }

    #[test]
    fn test_catalog_rejects_duplicate_code() {
        let mut catalog = CourseCatalog::new();
        catalog.add(Course::new("CS101", "Intro")).unwrap();

        let result = catalog.add(Course::new("CS101", "Other name"));
        assert_eq!(result, Err(RecordError::duplicate_course("CS101")));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find("CS101").unwrap().name(), "Intro");
    }

    #[test]
    fn test_catalog_listing() {
        let mut catalog = CourseCatalog::new();
        assert_eq!(catalog.listing(), "No courses available.\n");

        catalog.add(Course::new("CS101", "Intro")).unwrap();
        catalog.add(Course::new("AB100", "Basics")).unwrap();

        // Insertion order, not sorted
        assert_eq!(
            catalog.listing(),
            "Available Courses:\nCourse Code: CS101, Course Name: Intro\nCourse Code: AB100, Course Name: Basics\n"
        );
    }
}
