// 📋 Roster Report - "View All Users" as CSV
//
// One row per identity, in directory order. Student-only columns stay empty
// for admins and faculty.

use crate::directory::UserDirectory;
use crate::entities::Identity;
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterRow {
    #[serde(rename = "Username")]
    pub username: String,

    #[serde(rename = "Role")]
    pub role: String,

    #[serde(rename = "Student_ID")]
    pub student_id: Option<i32>,

    #[serde(rename = "Age")]
    pub age: Option<i32>,

    #[serde(rename = "Course")]
    pub course: Option<String>,

    #[serde(rename = "Enrolled_Courses")]
    pub enrolled_courses: Option<usize>,

    #[serde(rename = "Fee_Total")]
    pub fee_total: Option<Decimal>,

    #[serde(rename = "Fee_Paid")]
    pub fee_paid: Option<Decimal>,

    #[serde(rename = "Fee_Due")]
    pub fee_due: Option<Decimal>,

    #[serde(rename = "Settled")]
    pub settled: Option<bool>,

    #[serde(rename = "Assigned_Courses")]
    pub assigned_courses: Option<usize>,
}

impl RosterRow {
    pub fn from_identity(identity: &Identity) -> Self {
        let student = identity.as_student();
        let faculty = identity.as_faculty();

        RosterRow {
            username: identity.username().to_string(),
            role: identity.role().as_str().to_string(),
            student_id: student.map(|s| s.id()),
            age: student.map(|s| s.age()),
            course: student.map(|s| s.course().to_string()),
            enrolled_courses: student.map(|s| s.ledger().enrolled_courses().len()),
            fee_total: student.map(|s| s.fee().total_due()),
            fee_paid: student.map(|s| s.fee().amount_paid()),
            fee_due: student.map(|s| s.fee().amount_due()),
            settled: student.map(|s| s.fee().is_settled()),
            assigned_courses: faculty.map(|f| f.assigned_courses().len()),
        }
    }
}

pub fn roster_rows(directory: &UserDirectory) -> Vec<RosterRow> {
    directory
        .identities()
        .iter()
        .map(RosterRow::from_identity)
        .collect()
}

/// Write the roster with a header row; returns the number of data rows
pub fn write_roster_csv<W: Write>(writer: W, directory: &UserDirectory) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    let rows = roster_rows(directory);
    for row in &rows {
        wtr.serialize(row).context("Failed to serialize roster row")?;
    }
    wtr.flush().context("Failed to flush roster")?;
    Ok(rows.len())
}

pub fn export_roster(path: &Path, directory: &UserDirectory) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_roster_csv(file, directory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Course;
    use rust_decimal_macros::dec;

    fn sample_directory() -> UserDirectory {
        let mut directory = UserDirectory::new();
        {
            let alice = directory
                .register_student("Alice", 1001, 20, dec!(500), "alice", "pw1")
                .unwrap()
                .student_mut()
                .unwrap();
            alice.add_course(Course::new("CS101", "Intro")).unwrap();
            alice.make_payment(dec!(500)).unwrap();
        }
        directory.register_faculty("bob", "pw2").unwrap();
        directory
    }

    #[test]
    fn test_roster_rows() {
        let rows = roster_rows(&sample_directory());
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].username, "alice");
        assert_eq!(rows[0].student_id, Some(1001));
        assert_eq!(rows[0].enrolled_courses, Some(1));
        assert_eq!(rows[0].fee_due, Some(Decimal::ZERO));
        assert_eq!(rows[0].settled, Some(true));
        assert_eq!(rows[0].assigned_courses, None);

        assert_eq!(rows[1].role, "faculty");
        assert_eq!(rows[1].student_id, None);
        assert_eq!(rows[1].assigned_courses, Some(0));
    }

    #[test]
    fn test_write_roster_csv() {
        let mut buf = Vec::new();
        let count = write_roster_csv(&mut buf, &sample_directory()).unwrap();
        assert_eq!(count, 2);

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Username,Role,Student_ID,Age,Course,Enrolled_Courses,Fee_Total,Fee_Paid,Fee_Due,Settled,Assigned_Courses"
        );
        assert_eq!(
            lines.next().unwrap(),
            "alice,student,1001,20,N/A,1,500,500,0,true,"
        );
        assert_eq!(lines.next().unwrap(), "bob,faculty,,,,,,,,,0");
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_empty_directory_roster() {
        let mut buf = Vec::new();
        let count = write_roster_csv(&mut buf, &UserDirectory::new()).unwrap();
        assert_eq!(count, 0);
        // csv writes the header lazily with the first record
        assert!(buf.is_empty());
    }
}
