//! Core data structures.
//!
//! This module contains the foundational types of the crate:
//! - The manifest model and its load orchestration (Puppetfile)
//! - Module declarations and their uninterpreted source arguments

pub mod args;
pub mod module;
pub mod puppetfile;

pub use args::{ArgMap, ArgValue, ModuleArgs};
pub use module::ModuleDeclaration;
pub use puppetfile::{Puppetfile, DEFAULT_FORGE, MODULEDIR_NAME, PUPPETFILE_NAME};
