//! Puppetfile loading for Puppet environment deployment.
//!
//! A Puppetfile declares which modules an environment needs, where
//! they come from, and where they install:
//!
//! ```text
//! forge 'forge.example.com'
//!
//! mod 'puppetlabs/stdlib', '4.1.0'
//! mod 'puppetlabs/apache',
//!   :git => 'https://github.com/puppetlabs/puppetlabs-apache',
//!   :ref => 'docs_experiment'
//! ```
//!
//! This crate owns the in-memory model of that manifest: evaluating
//! the declarative DSL against a [`Puppetfile`], recording each
//! module's name and uninterpreted source arguments, and projecting
//! the desired contents of the module directory for the install and
//! purge steps that consume the model.
//!
//! A missing manifest is not an error — an environment without a
//! Puppetfile simply declares no modules:
//!
//! ```
//! use puppetfile::Puppetfile;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut puppetfile = Puppetfile::new("/etc/puppetlabs/environments/production");
//! puppetfile.load()?;
//! assert!(puppetfile.desired_contents().is_empty());
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod dsl;
pub mod reconcile;
pub mod util;

pub use crate::core::args::{ArgMap, ArgValue, ModuleArgs};
pub use crate::core::module::ModuleDeclaration;
pub use crate::core::puppetfile::{Puppetfile, DEFAULT_FORGE, MODULEDIR_NAME, PUPPETFILE_NAME};
pub use crate::dsl::{ParseError, ParseErrorKind};
pub use crate::reconcile::Purgeable;
