// 🪪 Identity Entity - credentials + role-specific profile
//
// One struct for every user, with the role-specific payload held in a tagged
// enum. The role is derived from the profile variant, so it is fixed at
// construction and cannot drift.
//
//   Admin    no extra state
//   Student  id, age, course of study, own ledger, fee account
//   Faculty  assigned courses + per-student records (FacultyLedger)

use crate::entities::course::Course;
use crate::entities::fee::FeeAccount;
use crate::entities::ledger::{FacultyLedger, StudentId, StudentLedger};
use crate::error::RecordError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Course-of-study label given to students registered interactively
pub const DEFAULT_COURSE_LABEL: &str = "N/A";

// ============================================================================
// ROLE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
    Faculty,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
            Role::Faculty => "faculty",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "admin" => Some(Role::Admin),
            "student" => Some(Role::Student),
            "faculty" => Some(Role::Faculty),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CAPABILITIES
// ============================================================================

/// Operations a role may drive from the menu layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    // Admin
    ViewAllUsers,
    RegisterStudent,
    RegisterFaculty,
    AddCatalogCourse,
    ViewCatalog,
    ManageNotices,
    ManageHostel,
    ManageEvents,

    // Student
    AddCourse,
    ViewEnrolledCourses,
    ViewGrades,
    ViewAttendance,
    ViewExamScores,
    ViewFees,
    MakePayment,

    // Faculty
    AssignCourse,
    RecordAttendance,
    RecordExamScore,
    AssignFinalGrade,
    ViewStudentAttendance,
    ViewStudentExamScores,
    ViewStudentFinalGrades,
}

const ADMIN_CAPABILITIES: &[Capability] = &[
    Capability::ViewAllUsers,
    Capability::RegisterStudent,
    Capability::RegisterFaculty,
    Capability::AddCatalogCourse,
    Capability::ViewCatalog,
    Capability::ManageNotices,
    Capability::ManageHostel,
    Capability::ManageEvents,
];

const STUDENT_CAPABILITIES: &[Capability] = &[
    Capability::AddCourse,
    Capability::ViewEnrolledCourses,
    Capability::ViewGrades,
    Capability::ViewAttendance,
    Capability::ViewExamScores,
    Capability::ViewFees,
    Capability::MakePayment,
];

const FACULTY_CAPABILITIES: &[Capability] = &[
    Capability::AssignCourse,
    Capability::RecordAttendance,
    Capability::RecordExamScore,
    Capability::AssignFinalGrade,
    Capability::ViewStudentAttendance,
    Capability::ViewStudentExamScores,
    Capability::ViewStudentFinalGrades,
];

impl Role {
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Role::Admin => ADMIN_CAPABILITIES,
            Role::Student => STUDENT_CAPABILITIES,
            Role::Faculty => FACULTY_CAPABILITIES,
        }
    }
}

// ============================================================================
// STUDENT RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    id: StudentId,
    age: i32,

    /// Course-of-study label; single token in the flat-file layout
    course: String,

    ledger: StudentLedger,
    fee: FeeAccount,
}

impl StudentRecord {
    pub fn new(
        id: StudentId,
        age: i32,
        course: impl Into<String>,
        fee_total: Decimal,
    ) -> Result<Self, RecordError> {
        Ok(StudentRecord {
            id,
            age,
            course: course.into(),
            ledger: StudentLedger::new(),
            fee: FeeAccount::new(fee_total)?,
        })
    }

    pub fn id(&self) -> StudentId {
        self.id
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn course(&self) -> &str {
        &self.course
    }

    pub fn ledger(&self) -> &StudentLedger {
        &self.ledger
    }

    pub fn fee(&self) -> &FeeAccount {
        &self.fee
    }

    pub fn fee_total(&self) -> Decimal {
        self.fee.total_due()
    }

    pub fn add_course(&mut self, course: Course) -> Result<(), RecordError> {
        self.ledger.add_course(course)
    }

    pub fn update_attendance(&mut self, code: &str, value: i32) -> Result<(), RecordError> {
        self.ledger.update_attendance(code, value)
    }

    pub fn record_exam_score(
        &mut self,
        code: &str,
        exam_type: &str,
        score: f64,
    ) -> Result<(), RecordError> {
        self.ledger.record_exam_score(code, exam_type, score)
    }

    pub fn set_final_grade(&mut self, grade: f64) {
        self.ledger.set_final_grade(grade);
    }

    pub fn make_payment(&mut self, amount: Decimal) -> Result<Decimal, RecordError> {
        self.fee.make_payment(amount)
    }
}

// ============================================================================
// IDENTITY
// ============================================================================

// Externally tagged: faculty maps have integer keys, which internally tagged
// enums cannot read back from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Admin,
    Student(StudentRecord),
    Faculty(FacultyLedger),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    username: String,
    password: String,
    profile: Profile,
}

impl Identity {
    pub fn admin(username: impl Into<String>, password: impl Into<String>) -> Self {
        Identity {
            username: username.into(),
            password: password.into(),
            profile: Profile::Admin,
        }
    }

    pub fn student(
        username: impl Into<String>,
        password: impl Into<String>,
        record: StudentRecord,
    ) -> Self {
        Identity {
            username: username.into(),
            password: password.into(),
            profile: Profile::Student(record),
        }
    }

    pub fn faculty(username: impl Into<String>, password: impl Into<String>) -> Self {
        Identity {
            username: username.into(),
            password: password.into(),
            profile: Profile::Faculty(FacultyLedger::new()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn role(&self) -> Role {
        match self.profile {
            Profile::Admin => Role::Admin,
            Profile::Student(_) => Role::Student,
            Profile::Faculty(_) => Role::Faculty,
        }
    }

    /// Plain equality on both credentials
    pub fn check_login(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn as_student(&self) -> Option<&StudentRecord> {
        match &self.profile {
            Profile::Student(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_student_mut(&mut self) -> Option<&mut StudentRecord> {
        match &mut self.profile {
            Profile::Student(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_faculty(&self) -> Option<&FacultyLedger> {
        match &self.profile {
            Profile::Faculty(ledger) => Some(ledger),
            _ => None,
        }
    }

    pub fn as_faculty_mut(&mut self) -> Option<&mut FacultyLedger> {
        match &mut self.profile {
            Profile::Faculty(ledger) => Some(ledger),
            _ => None,
        }
    }

    /// Student view or a RoleMismatch rejection
    pub fn student_mut(&mut self) -> Result<&mut StudentRecord, RecordError> {
        let username = self.username.clone();
        self.as_student_mut().ok_or(RecordError::RoleMismatch {
            username,
            expected: "student",
        })
    }

    /// Faculty view or a RoleMismatch rejection
    pub fn faculty_mut(&mut self) -> Result<&mut FacultyLedger, RecordError> {
        let username = self.username.clone();
        self.as_faculty_mut().ok_or(RecordError::RoleMismatch {
            username,
            expected: "faculty",
        })
    }

    pub fn capabilities(&self) -> &'static [Capability] {
        self.role().capabilities()
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn alice() -> Identity {
        let record = StudentRecord::new(1001, 20, "CS", dec!(500)).unwrap();
        Identity::student("alice", "pw1", record)
    }

    #[test]
    fn test_role_from_profile() {
        assert_eq!(Identity::admin("root", "x").role(), Role::Admin);
        assert_eq!(alice().role(), Role::Student);
        assert_eq!(Identity::faculty("bob", "y").role(), Role::Faculty);
    }

    #[test]
    fn test_role_parse_round_trip() {
        for role in [Role::Admin, Role::Student, Role::Faculty] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("registrar"), None);
    }

    #[test]
    fn test_check_login() {
        let id = alice();
        assert!(id.check_login("alice", "pw1"));
        assert!(!id.check_login("alice", "PW1"));
        assert!(!id.check_login("alic", "pw1"));
    }

    #[test]
    fn test_student_operations_through_identity() {
        let mut id = alice();
        let student = id.student_mut().unwrap();

        student.add_course(Course::new("CS101", "Intro")).unwrap();
        student.update_attendance("CS101", 75).unwrap();
        student.make_payment(dec!(200)).unwrap();
        student.set_final_grade(3.7);

        let student = id.as_student().unwrap();
        assert_eq!(student.ledger().attendance("CS101"), Some(75));
        assert_eq!(student.fee().amount_due(), dec!(300));
        assert_eq!(student.ledger().final_grade(), 3.7);
        assert_eq!(student.fee_total(), dec!(500));
    }

    #[test]
    fn test_role_mismatch() {
        let mut faculty = Identity::faculty("bob", "y");
        assert_eq!(
            faculty.student_mut().unwrap_err(),
            RecordError::RoleMismatch {
                username: "bob".to_string(),
                expected: "student"
            }
        );
        assert!(faculty.faculty_mut().is_ok());
        assert!(alice().faculty_mut().is_err());
    }

    #[test]
    fn test_capabilities_are_role_specific() {
        let admin = Identity::admin("root", "x");
        let student = alice();
        let faculty = Identity::faculty("bob", "y");

        assert!(admin.can(Capability::ViewAllUsers));
        assert!(!admin.can(Capability::MakePayment));

        assert!(student.can(Capability::MakePayment));
        assert!(!student.can(Capability::RecordAttendance));

        assert!(faculty.can(Capability::AssignFinalGrade));
        assert!(!faculty.can(Capability::RegisterStudent));

        assert_eq!(student.capabilities().len(), 7);
        assert_eq!(faculty.capabilities().len(), 7);
        assert_eq!(admin.capabilities().len(), 8);
    }

    #[test]
    fn test_identity_json_keeps_ledgers() {
        let mut id = alice();
        {
            let student = id.student_mut().unwrap();
            student.add_course(Course::new("CS101", "Intro")).unwrap();
            student.record_exam_score("CS101", "midterm", 81.5).unwrap();
        }

        let json = serde_json::to_string(&id).unwrap();
        assert!(json.contains("\"profile\":{\"student\":"));

        let back: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
