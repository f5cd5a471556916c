// Entity Models - the record graph
//
// Each entity is a plain value owned by its parent:
// - Course values are copied into ledgers and the catalog
// - FeeAccount and ledgers live inside the Student/Faculty that owns them
// - Identity is owned by the UserDirectory

pub mod course;
pub mod fee;
pub mod ledger;
pub mod identity;

pub use course::{Course, CourseCatalog};
pub use fee::{FeeAccount, FeeState};
pub use ledger::{ExamScores, FacultyLedger, StudentId, StudentLedger};
pub use identity::{Capability, Identity, Profile, Role, StudentRecord, DEFAULT_COURSE_LABEL};
