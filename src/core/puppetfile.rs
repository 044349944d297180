//! Puppetfile data model and load orchestration.
//!
//! A `Puppetfile` describes which modules must be present in an
//! environment's module directory, where they come from, and where
//! they install. The struct here is the authoritative in-memory form
//! of one manifest: constructed with defaults, populated by a single
//! `load`, then treated as read-only by the sync and purge steps that
//! consume it.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::args::ModuleArgs;
use crate::core::module::ModuleDeclaration;
use crate::dsl;
use crate::util::{fs, path};

/// Canonical manifest filename, relative to the environment root.
pub const PUPPETFILE_NAME: &str = "Puppetfile";

/// Default module installation directory, relative to the environment root.
pub const MODULEDIR_NAME: &str = "modules";

/// Forge location used when a manifest does not name one.
pub const DEFAULT_FORGE: &str = "forge.puppetlabs.com";

/// Parsed Puppetfile state for one environment.
#[derive(Debug, Clone)]
pub struct Puppetfile {
    /// Environment root; fixed at construction
    basedir: PathBuf,
    /// Path the manifest is loaded from
    puppetfile_path: PathBuf,
    /// Where modules install; the last `moduledir` statement wins
    moduledir: PathBuf,
    /// Forge location; the last `forge` statement wins
    forge: String,
    /// Declarations in manifest order
    modules: Vec<ModuleDeclaration>,
}

impl Puppetfile {
    /// Create a model rooted at `basedir` with the default manifest
    /// path (`{basedir}/Puppetfile`) and module directory
    /// (`{basedir}/modules`).
    pub fn new(basedir: impl Into<PathBuf>) -> Self {
        Self::with_paths(basedir, None, None)
    }

    /// Create a model with explicit overrides for the module directory
    /// and manifest path.
    pub fn with_paths(
        basedir: impl Into<PathBuf>,
        moduledir: Option<PathBuf>,
        puppetfile: Option<PathBuf>,
    ) -> Self {
        let basedir = basedir.into();
        let moduledir = moduledir.unwrap_or_else(|| basedir.join(MODULEDIR_NAME));
        let puppetfile_path = puppetfile.unwrap_or_else(|| basedir.join(PUPPETFILE_NAME));

        Puppetfile {
            basedir,
            puppetfile_path,
            moduledir,
            forge: DEFAULT_FORGE.to_string(),
            modules: Vec::new(),
        }
    }

    /// Load the manifest if one is present.
    ///
    /// A missing or unreadable Puppetfile is not an error: an
    /// environment without a manifest simply declares no modules, so
    /// the model keeps its constructor defaults and only a debug line
    /// is logged. Errors raised while evaluating a readable manifest
    /// propagate unchanged.
    pub fn load(&mut self) -> Result<()> {
        if fs::is_readable(&self.puppetfile_path) {
            self.load_strict()
        } else {
            tracing::debug!(
                "Puppetfile {} missing or unreadable",
                self.puppetfile_path.display()
            );
            Ok(())
        }
    }

    /// Load the manifest, failing if it cannot be read or parsed.
    ///
    /// Statements evaluated before a failing one remain applied to the
    /// model; callers wanting a clean slate construct a fresh model
    /// and load again.
    pub fn load_strict(&mut self) -> Result<()> {
        let contents = fs::read_to_string(&self.puppetfile_path)?;

        if let Err(err) = dsl::evaluate(&contents, self) {
            let name = self.puppetfile_path.display().to_string();
            return Err(err.with_source(name, contents).into());
        }

        tracing::debug!(
            "loaded {} module declaration(s) from {}",
            self.modules.len(),
            self.puppetfile_path.display()
        );
        Ok(())
    }

    /// Point the model at a different forge. Last write wins; the
    /// location is not validated.
    pub fn set_forge(&mut self, forge: impl Into<String>) {
        self.forge = forge.into();
    }

    /// Replace the module installation directory.
    ///
    /// Relative locations are taken relative to `basedir`; absolute
    /// locations are kept as-is.
    pub fn set_moduledir(&mut self, moduledir: impl Into<PathBuf>) {
        self.moduledir = path::resolve_onto(&self.basedir, &moduledir.into());
    }

    /// Append a module declaration.
    ///
    /// The directories in effect at this point in the manifest are
    /// captured by value, so a later `moduledir` statement does not
    /// move modules declared before it. Duplicate names are kept as
    /// duplicate entries.
    pub fn add_module(&mut self, name: impl Into<String>, args: ModuleArgs) {
        self.modules.push(ModuleDeclaration::new(
            name,
            &self.basedir,
            &self.moduledir,
            args,
        ));
    }

    /// The environment root.
    pub fn basedir(&self) -> &Path {
        &self.basedir
    }

    /// The path the manifest is loaded from.
    pub fn puppetfile_path(&self) -> &Path {
        &self.puppetfile_path
    }

    /// The current module installation directory.
    pub fn moduledir(&self) -> &Path {
        &self.moduledir
    }

    /// The current forge location.
    pub fn forge(&self) -> &str {
        &self.forge
    }

    /// Declarations in manifest order.
    pub fn modules(&self) -> &[ModuleDeclaration] {
        &self.modules
    }

    /// List the module names that should exist in the module
    /// directory, in manifest order. Duplicates are preserved.
    pub fn desired_contents(&self) -> Vec<String> {
        self.modules.iter().map(|m| m.name().to_string()).collect()
    }
}
