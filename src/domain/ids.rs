//! Domain identifier types with validation
//!
//! Newtype wrappers for the two keys of an import job: the course it targets
//! and the name of the uploaded archive.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Course identifier newtype wrapper
///
/// Opaque to this crate; typically a course key such as
/// `course-v1:edX+DemoX+Demo_Course`.
///
/// # Examples
///
/// ```
/// use course_import::domain::ids::CourseId;
/// use std::str::FromStr;
///
/// let course_id = CourseId::from_str("course-v1:edX+DemoX+Demo_Course").unwrap();
/// assert_eq!(course_id.as_str(), "course-v1:edX+DemoX+Demo_Course");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseId(String);

impl CourseId {
    /// Creates a new CourseId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(CourseId)` if the ID is valid, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Course ID cannot be empty".to_string());
        }
        if id.contains('/') {
            return Err(format!("Course ID cannot contain '/': {id}"));
        }
        Ok(Self(id))
    }

    /// Returns the course ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CourseId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CourseId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CourseId> for String {
    fn from(value: CourseId) -> Self {
        value.0
    }
}

impl AsRef<str> for CourseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Archive file name newtype wrapper
///
/// Status requests are keyed by this name, so it must be a bare file name
/// without any directory component.
///
/// # Examples
///
/// ```
/// use course_import::domain::ids::FileName;
///
/// let name = FileName::new("course.tar.gz").unwrap();
/// assert!(name.has_extension(".tar.gz"));
/// assert!(FileName::new("dir/course.tar.gz").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FileName(String);

impl FileName {
    /// Creates a new FileName from a string
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("File name cannot be empty".to_string());
        }
        if name.contains('/') || name.contains('\\') {
            return Err(format!("File name cannot contain a path separator: {name}"));
        }
        Ok(Self(name))
    }

    /// Returns the file name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Case-insensitive suffix check, e.g. `.tar.gz`
    pub fn has_extension(&self, extension: &str) -> bool {
        self.0
            .to_ascii_lowercase()
            .ends_with(&extension.to_ascii_lowercase())
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FileName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for FileName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FileName> for String {
    fn from(value: FileName) -> Self {
        value.0
    }
}

impl AsRef<str> for FileName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
