use std::fmt;

/// Archive-relative path
///
/// Slash-separated relative path used as the key inside an archive namespace.
/// The empty path means "no prefix": joining a name onto it yields the bare
/// name, never a leading slash.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArchivePath(String);

impl ArchivePath {
    /// Create an archive path, stripping any leading/trailing slashes
    pub fn new<S: AsRef<str>>(path: S) -> Self {
        Self(path.as_ref().trim_matches('/').to_string())
    }

    /// The empty path (no prefix)
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Append one path component
    ///
    /// # Example
    /// ```
    /// use arckit::ArchivePath;
    ///
    /// assert_eq!(ArchivePath::new("a/b").join("c").as_str(), "a/b/c");
    /// assert_eq!(ArchivePath::root().join("c").as_str(), "c");
    /// ```
    pub fn join(&self, name: &str) -> Self {
        let name = name.trim_matches('/');
        if self.0.is_empty() {
            Self(name.to_string())
        } else {
            Self(format!("{}/{}", self.0, name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ArchivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
