// 👥 User Directory - every Identity known to the running process
//
// The directory is an explicit context object: the persistence layer fills it
// at startup, the menu layer mutates it during a session, and the persistence
// layer writes it back at shutdown. There is no global state.
//
// Insertion order matters: login scans linearly and the first match wins.
// Registration refuses duplicate usernames, but insert() (used by loaders)
// does not, so duplicates read from disk resolve to the earliest entry.

use crate::entities::{
    Course, CourseCatalog, Identity, Role, StudentId, StudentRecord, DEFAULT_COURSE_LABEL,
};
use crate::error::RecordError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDirectory {
    identities: Vec<Identity>,
    catalog: CourseCatalog,
}

fn validate_credential(field: &'static str, value: &str) -> Result<(), RecordError> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(RecordError::InvalidCredential { field });
    }
    Ok(())
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a directory from stored parts (snapshot restore)
    pub fn from_parts(identities: Vec<Identity>, catalog: CourseCatalog) -> Self {
        UserDirectory {
            identities,
            catalog,
        }
    }

    // ========================================================================
    // CREATION
    // ========================================================================

    /// Append an identity as-is (no uniqueness check)
    pub fn insert(&mut self, identity: Identity) {
        self.identities.push(identity);
    }

    fn check_new_credentials(&self, username: &str, password: &str) -> Result<(), RecordError> {
        validate_credential("username", username)?;
        validate_credential("password", password)?;
        if self.contains_username(username) {
            return Err(RecordError::duplicate_username(username));
        }
        Ok(())
    }

    fn push_and_get(&mut self, identity: Identity) -> &mut Identity {
        self.identities.push(identity);
        let last = self.identities.len() - 1;
        &mut self.identities[last]
    }

    /// Register a student from the menu layer.
    ///
    /// `name` is collected by the registration form but not stored; the
    /// course-of-study label starts as "N/A".
    pub fn register_student(
        &mut self,
        name: &str,
        id: StudentId,
        age: i32,
        fee_amount: Decimal,
        username: &str,
        password: &str,
    ) -> Result<&mut Identity, RecordError> {
        self.check_new_credentials(username, password)?;
        let record = StudentRecord::new(id, age, DEFAULT_COURSE_LABEL, fee_amount)?;

        info!(username, name, student_id = id, "Student registered");
        Ok(self.push_and_get(Identity::student(username, password, record)))
    }

    pub fn register_faculty(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<&mut Identity, RecordError> {
        self.check_new_credentials(username, password)?;

        info!(username, "Faculty registered");
        Ok(self.push_and_get(Identity::faculty(username, password)))
    }

    pub fn register_admin(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<&mut Identity, RecordError> {
        self.check_new_credentials(username, password)?;

        info!(username, "Admin registered");
        Ok(self.push_and_get(Identity::admin(username, password)))
    }

    // ========================================================================
    // LOGIN & LOOKUP
    // ========================================================================

    /// First identity whose credentials match, in insertion order
    pub fn login(&self, username: &str, password: &str) -> Option<&Identity> {
        let found = self
            .identities
            .iter()
            .find(|id| id.check_login(username, password));
        if found.is_none() {
            debug!(username, "Login failed");
        }
        found
    }

    /// Mutable variant of [`login`](Self::login) for the session that follows
    pub fn login_mut(&mut self, username: &str, password: &str) -> Option<&mut Identity> {
        self.identities
            .iter_mut()
            .find(|id| id.check_login(username, password))
    }

    pub fn contains_username(&self, username: &str) -> bool {
        self.identities.iter().any(|id| id.username() == username)
    }

    pub fn find(&self, username: &str) -> Option<&Identity> {
        self.identities.iter().find(|id| id.username() == username)
    }

    pub fn find_mut(&mut self, username: &str) -> Option<&mut Identity> {
        self.identities
            .iter_mut()
            .find(|id| id.username() == username)
    }

    /// First student carrying the given numeric id
    pub fn find_student(&self, student_id: StudentId) -> Option<&Identity> {
        self.identities
            .iter()
            .find(|id| id.as_student().is_some_and(|s| s.id() == student_id))
    }

    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }

    pub fn by_role(&self, role: Role) -> impl Iterator<Item = &Identity> {
        self.identities.iter().filter(move |id| id.role() == role)
    }

    pub fn count_by_role(&self, role: Role) -> usize {
        self.by_role(role).count()
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    /// Render the "View All Users" listing
    pub fn user_listing(&self) -> String {
        if self.identities.is_empty() {
            return "No users registered.\n".to_string();
        }
        let mut out = String::from("Registered Users:\n");
        for id in &self.identities {
            out.push_str(&format!("Username: {}, Role: {}\n", id.username(), id.role()));
        }
        out
    }

    // ========================================================================
    // COURSE CATALOG
    // ========================================================================

    pub fn add_catalog_course(&mut self, course: Course) -> Result<(), RecordError> {
        let code = course.code().to_string();
        self.catalog.add(course)?;
        info!(code = %code, "Catalog course added");
        Ok(())
    }

    pub fn find_catalog_course(&self, code: &str) -> Option<&Course> {
        self.catalog.find(code)
    }

    pub fn catalog_courses(&self) -> &[Course] {
        self.catalog.courses()
    }

    pub fn catalog(&self) -> &CourseCatalog {
        &self.catalog
    }
}
