// Campus Records - Core Library
// Users, roles and academic records, plus their flat-file and snapshot persistence

pub mod error;
pub mod entities;
pub mod directory;
pub mod persistence;
pub mod snapshot;
pub mod report;
pub mod config;

// Re-export commonly used types
pub use error::RecordError;
pub use entities::{
    Capability, Course, CourseCatalog, ExamScores, FacultyLedger, FeeAccount, FeeState,
    Identity, Profile, Role, StudentId, StudentLedger, StudentRecord, DEFAULT_COURSE_LABEL,
};
pub use directory::UserDirectory;
pub use persistence::{
    FlatFileGateway, LoadSummary, SaveSummary,
    parse_student_line, parse_faculty_line, format_student_line, format_faculty_line,
};
pub use snapshot::{SnapshotInfo, SnapshotStore};
pub use report::{RosterRow, roster_rows, write_roster_csv, export_roster};
pub use config::{AdminCredentials, RecordsConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
