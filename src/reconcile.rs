//! Desired-state interface for directory reconciliation.
//!
//! After modules are installed, the sync step deletes anything in the
//! managed directory that the manifest does not claim. That
//! collaborator needs exactly two values: which directory it manages
//! and which entries belong there. It owns the filesystem walk and the
//! deletions; nothing in this crate touches the directory.

use std::path::Path;

use crate::core::puppetfile::Puppetfile;

/// A source of truth for the contents of one managed directory.
pub trait Purgeable {
    /// Directory whose contents are managed.
    fn managed_directory(&self) -> &Path;

    /// Entries that should exist in the managed directory, in install
    /// order. Anything else found there is eligible for deletion.
    fn desired_contents(&self) -> Vec<String>;
}

impl Purgeable for Puppetfile {
    fn managed_directory(&self) -> &Path {
        self.moduledir()
    }

    fn desired_contents(&self) -> Vec<String> {
        Puppetfile::desired_contents(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::args::ModuleArgs;

    #[test]
    fn test_puppetfile_exposes_the_purge_contract() {
        let mut puppetfile = Puppetfile::new("/env");
        puppetfile.add_module("a", ModuleArgs::none());
        puppetfile.add_module("b", ModuleArgs::none());

        let purgeable: &dyn Purgeable = &puppetfile;
        assert_eq!(purgeable.managed_directory(), Path::new("/env/modules"));
        assert_eq!(purgeable.desired_contents(), ["a", "b"]);
    }

    #[test]
    fn test_managed_directory_tracks_moduledir_overrides() {
        let mut puppetfile = Puppetfile::new("/env");
        puppetfile.set_moduledir("/opt/modules");

        let purgeable: &dyn Purgeable = &puppetfile;
        assert_eq!(purgeable.managed_directory(), Path::new("/opt/modules"));
    }
}
