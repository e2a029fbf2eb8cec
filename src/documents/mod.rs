//! The Sefaria Chat documents rendered by the `docx-helper` binary.

pub mod announcement;
pub mod reference;

use std::path::Path;

use crate::assembler::SavedDocument;
use crate::error::Result;

pub use announcement::build as build_announcement;
pub use reference::build as build_reference;

/// Builds both documents under `base_dir`, each with a fresh assembler.
///
/// The flyer is written to `base_dir` and the reference to `base_dir/docs`.
/// The first failure stops the run.
pub fn run_all(base_dir: &Path) -> Result<Vec<SavedDocument>> {
    let announcement = build_announcement(base_dir)?;
    let reference = build_reference(base_dir)?;
    log::info!("All documents generated under {}", base_dir.display());
    Ok(vec![announcement, reference])
}
