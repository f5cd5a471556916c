// 💾 Flat-File Persistence - load at startup, save at shutdown
//
// Two plain-text files, one record per line, fields separated by whitespace:
//
//   students.txt   username password id age course feeTotal
//   faculty.txt    username password
//
// Only these scalar fields survive a save/reload cycle. Enrollment, attendance,
// exam scores, final grades, the amount already paid and everything a faculty
// member recorded start empty again after a reload. Use the snapshot store for
// a lossless copy.
//
// A malformed line ends the pass for that file. Records read before it are
// kept, nothing after it is read, and the stopping line is reported in the
// LoadSummary. A missing file is not an error.
//
// On save, a record whose username, password or course label is empty or holds
// whitespace would split into the wrong number of fields and cut the next load
// short. Such records are left out of the file and counted in the SaveSummary.

use crate::config::RecordsConfig;
use crate::directory::UserDirectory;
use crate::entities::{Identity, Role, StudentRecord};
use crate::error::RecordError;
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// ============================================================================
// SUMMARIES
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Students read from the student file
    pub students: usize,

    /// Faculty read from the faculty file
    pub faculty: usize,

    /// 1-based line where a malformed record stopped the student pass
    pub student_stop: Option<usize>,

    /// 1-based line where a malformed record stopped the faculty pass
    pub faculty_stop: Option<usize>,
}

impl LoadSummary {
    pub fn total(&self) -> usize {
        self.students + self.faculty
    }

    /// True when neither file was cut short
    pub fn is_complete(&self) -> bool {
        self.student_stop.is_none() && self.faculty_stop.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveSummary {
    pub students: usize,
    pub faculty: usize,

    /// Records left out because a field could not be written as one token
    pub skipped: usize,
}

impl SaveSummary {
    pub fn is_complete(&self) -> bool {
        self.skipped == 0
    }
}

// ============================================================================
// LINE FORMAT
// ============================================================================

/// Parse one student line; None if it is not exactly six valid fields
pub fn parse_student_line(line: &str) -> Option<Identity> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [username, password, id, age, course, fee_total] = fields.as_slice() else {
        return None;
    };

    let id = id.parse().ok()?;
    let age = age.parse().ok()?;
    let fee_total: Decimal = fee_total.parse().ok()?;
    let record = StudentRecord::new(id, age, *course, fee_total).ok()?;

    Some(Identity::student(*username, *password, record))
}

/// Parse one faculty line; None if it is not exactly two fields
pub fn parse_faculty_line(line: &str) -> Option<Identity> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [username, password] = fields.as_slice() else {
        return None;
    };
    Some(Identity::faculty(*username, *password))
}

fn check_token(identity: &Identity, field: &'static str, value: &str) -> Result<(), RecordError> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(RecordError::unwritable_field(identity.username(), field));
    }
    Ok(())
}

fn check_credentials(identity: &Identity) -> Result<(), RecordError> {
    check_token(identity, "username", identity.username())?;
    check_token(identity, "password", identity.password())
}

/// Student line (with trailing newline), or Ok(None) for other roles.
///
/// Fails when a text field would not read back as a single token.
pub fn format_student_line(identity: &Identity) -> Result<Option<String>, RecordError> {
    let Some(student) = identity.as_student() else {
        return Ok(None);
    };
    check_credentials(identity)?;
    check_token(identity, "course", student.course())?;

    Ok(Some(format!(
        "{} {} {} {} {} {}\n",
        identity.username(),
        identity.password(),
        student.id(),
        student.age(),
        student.course(),
        student.fee_total()
    )))
}

/// Faculty line (with trailing newline), or Ok(None) for other roles.
///
/// Keeps the trailing space after the password that existing files carry.
pub fn format_faculty_line(identity: &Identity) -> Result<Option<String>, RecordError> {
    if identity.as_faculty().is_none() {
        return Ok(None);
    }
    check_credentials(identity)?;
    Ok(Some(format!(
        "{} {} \n",
        identity.username(),
        identity.password()
    )))
}

// ============================================================================
// GATEWAY
// ============================================================================

#[derive(Debug, Clone)]
pub struct FlatFileGateway {
    student_path: PathBuf,
    faculty_path: PathBuf,
}

impl FlatFileGateway {
    pub fn new(student_path: impl Into<PathBuf>, faculty_path: impl Into<PathBuf>) -> Self {
        FlatFileGateway {
            student_path: student_path.into(),
            faculty_path: faculty_path.into(),
        }
    }

    pub fn from_config(config: &RecordsConfig) -> Self {
        Self::new(config.student_path(), config.faculty_path())
    }

    pub fn student_path(&self) -> &Path {
        &self.student_path
    }

    pub fn faculty_path(&self) -> &Path {
        &self.faculty_path
    }

    /// Append every student, then every faculty member, found on disk
    pub fn load(&self, directory: &mut UserDirectory) -> Result<LoadSummary> {
        let (students, student_stop) =
            read_records(&self.student_path, Role::Student, parse_student_line, directory)?;
        let (faculty, faculty_stop) =
            read_records(&self.faculty_path, Role::Faculty, parse_faculty_line, directory)?;

        Ok(LoadSummary {
            students,
            faculty,
            student_stop,
            faculty_stop,
        })
    }

    /// Overwrite both files with the directory's students and faculty
    pub fn save(&self, directory: &UserDirectory) -> Result<SaveSummary> {
        let (students, skipped_students) =
            write_records(&self.student_path, directory, format_student_line)?;
        let (faculty, skipped_faculty) =
            write_records(&self.faculty_path, directory, format_faculty_line)?;
        let skipped = skipped_students + skipped_faculty;

        info!(students, faculty, skipped, "Directory saved");
        Ok(SaveSummary {
            students,
            faculty,
            skipped,
        })
    }
}

fn read_records(
    path: &Path,
    role: Role,
    parse: fn(&str) -> Option<Identity>,
    directory: &mut UserDirectory,
) -> Result<(usize, Option<usize>)> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), %role, "No data file found, starting fresh");
            return Ok((0, None));
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to open {}", path.display()));
        }
    };

    let mut loaded = 0;
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line_number = index + 1;

        let parsed = match line {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => parse(&line),
            Err(e) if e.kind() == ErrorKind::InvalidData => None,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        match parsed {
            Some(identity) => {
                directory.insert(identity);
                loaded += 1;
            }
            None => {
                warn!(
                    path = %path.display(),
                    line = line_number,
                    loaded,
                    "Malformed record, stopping load for this file"
                );
                return Ok((loaded, Some(line_number)));
            }
        }
    }

    info!(path = %path.display(), %role, loaded, "Data loaded");
    Ok((loaded, None))
}

/// Returns (written, skipped)
fn write_records(
    path: &Path,
    directory: &UserDirectory,
    format: fn(&Identity) -> Result<Option<String>, RecordError>,
) -> Result<(usize, usize)> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let mut written = 0;
    let mut skipped = 0;
    for identity in directory.identities() {
        let line = match format(identity) {
            Ok(Some(line)) => line,
            Ok(None) => continue,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Record not saved");
                skipped += 1;
                continue;
            }
        };
        writer
            .write_all(line.as_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written += 1;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    Ok((written, skipped))
}

// ============================================================================
// TESTS
// ============================================================================
