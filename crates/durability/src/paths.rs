//! Settings file path composition
//!
//! Platform directory lookup is not done here: callers inject a
//! [`DirectoryResolver`]. This module only joins names and forces the
//! settings extension.
//!
//! ```text
//! <exec dir>/<file_name>.json                         # bare name
//! <scope dir>/<application_name>/<file_name>.json     # scoped
//! ```

use std::path::{Path, PathBuf};

/// Where a scoped settings file lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Per-user application data
    User,
    /// Machine-wide application data
    System,
}

/// Resolves the base directories for each [`Scope`]
pub trait DirectoryResolver {
    /// Per-user application data directory
    fn user_data_dir(&self) -> Option<PathBuf>;

    /// Machine-wide application data directory
    fn system_data_dir(&self) -> Option<PathBuf>;

    /// Directory for `scope`
    fn dir_for(&self, scope: Scope) -> Option<PathBuf> {
        match scope {
            Scope::User => self.user_data_dir(),
            Scope::System => self.system_data_dir(),
        }
    }
}

/// Resolver returning preconfigured directories
#[derive(Debug, Clone, Default)]
pub struct FixedDirectories {
    /// Per-user directory, if any
    pub user: Option<PathBuf>,
    /// Machine-wide directory, if any
    pub system: Option<PathBuf>,
}

impl FixedDirectories {
    /// Resolver with both directories set
    pub fn new(user: impl Into<PathBuf>, system: impl Into<PathBuf>) -> Self {
        FixedDirectories {
            user: Some(user.into()),
            system: Some(system.into()),
        }
    }
}

impl DirectoryResolver for FixedDirectories {
    fn user_data_dir(&self) -> Option<PathBuf> {
        self.user.clone()
    }

    fn system_data_dir(&self) -> Option<PathBuf> {
        self.system.clone()
    }
}

/// `<dir>/<file_name>.<extension>`, or `None` for an empty file name
pub fn file_path_in_dir(dir: &Path, file_name: &str, extension: &str) -> Option<PathBuf> {
    if file_name.is_empty() {
        return None;
    }

    let mut path = dir.join(file_name);
    path.set_extension(extension);
    Some(path)
}

/// Settings path next to the running executable
pub fn exec_dir_file_path(file_name: &str, extension: &str) -> Option<PathBuf> {
    if file_name.is_empty() {
        return None;
    }

    let exe = std::env::current_exe().ok()?;
    let dir = exe.parent()?;
    file_path_in_dir(dir, file_name, extension)
}

/// `<scope dir>/<application_name>/<file_name>.<extension>`
///
/// Returns `None` if either name is empty or the resolver has no directory
/// for `scope`.
pub fn scoped_file_path(
    resolver: &dyn DirectoryResolver,
    scope: Scope,
    application_name: &str,
    file_name: &str,
    extension: &str,
) -> Option<PathBuf> {
    if application_name.is_empty() || file_name.is_empty() {
        return None;
    }

    let base = resolver.dir_for(scope)?;
    if base.as_os_str().is_empty() {
        return None;
    }

    file_path_in_dir(&base.join(application_name), file_name, extension)
}
