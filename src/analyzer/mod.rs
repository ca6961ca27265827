use std::path::Path;

use anyhow::Result;

use crate::models::Project;
use crate::progress::Progress;

pub mod node;

pub trait Analyzer {
    fn analyze(&self, path: &Path, progress: &dyn Progress) -> Result<Project>;
}
