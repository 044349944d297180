//! Module declarations recorded from a manifest.
//!
//! A `ModuleDeclaration` is the unit handed to the fetch/install step:
//! the module's name, the directories in effect when it was declared,
//! and its uninterpreted source arguments.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::args::ModuleArgs;

/// One `mod` entry from a Puppetfile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDeclaration {
    name: String,
    basedir: PathBuf,
    moduledir: PathBuf,
    args: ModuleArgs,
}

impl ModuleDeclaration {
    /// Record a declaration.
    ///
    /// `moduledir` is captured by value: later `moduledir` statements
    /// in the same manifest do not move modules declared before them.
    pub fn new(
        name: impl Into<String>,
        basedir: impl Into<PathBuf>,
        moduledir: impl Into<PathBuf>,
        args: ModuleArgs,
    ) -> Self {
        ModuleDeclaration {
            name: name.into(),
            basedir: basedir.into(),
            moduledir: moduledir.into(),
            args,
        }
    }

    /// The module name as written in the manifest.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The environment root the declaration belongs to.
    pub fn basedir(&self) -> &Path {
        &self.basedir
    }

    /// The installation directory in effect when the module was declared.
    pub fn moduledir(&self) -> &Path {
        &self.moduledir
    }

    /// The uninterpreted source arguments.
    pub fn args(&self) -> &ModuleArgs {
        &self.args
    }

    /// Full path where this module is expected to be installed.
    pub fn install_path(&self) -> PathBuf {
        self.moduledir.join(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::args::ArgValue;

    #[test]
    fn test_install_path_joins_moduledir_and_name() {
        let decl = ModuleDeclaration::new("apache", "/env", "/env/modules", ModuleArgs::none());
        assert_eq!(decl.install_path(), PathBuf::from("/env/modules/apache"));
    }

    #[test]
    fn test_args_are_kept_verbatim() {
        let args = ModuleArgs::from(vec![ArgValue::Str("0.9.0".into())]);
        let decl = ModuleDeclaration::new("stdlib", "/env", "/env/modules", args.clone());

        assert_eq!(decl.args(), &args);
        assert_eq!(decl.name(), "stdlib");
    }
}
