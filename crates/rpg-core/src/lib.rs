pub mod config;
pub mod error;
pub mod ir;
pub mod parse;
pub mod transform;

use indexmap::IndexMap;

pub use error::GeneratorError;

/// A generated file with path and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

impl GeneratedFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Trait for code generators that produce files from an IR spec.
pub trait CodeGenerator {
    type Config;

    fn generate(
        &self,
        ir: &ir::IrSpec,
        config: &Self::Config,
    ) -> Result<Vec<GeneratedFile>, GeneratorError>;
}

/// Ordered set of generated files keyed by relative path.
///
/// Every path may be registered once. A second file for the same path is
/// rejected instead of silently replacing the first one.
#[derive(Debug, Default)]
pub struct FileSet {
    files: IndexMap<String, String>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file: GeneratedFile) -> Result<(), GeneratorError> {
        if self.files.contains_key(&file.path) {
            log::error!("duplicate output path {}", file.path);
            return Err(GeneratorError::DuplicatePath(file.path));
        }
        log::debug!("registered {} ({} bytes)", file.path, file.content.len());
        self.files.insert(file.path, file.content);
        Ok(())
    }

    pub fn extend(
        &mut self,
        files: impl IntoIterator<Item = GeneratedFile>,
    ) -> Result<(), GeneratorError> {
        for file in files {
            self.insert(file)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn into_files(self) -> Vec<GeneratedFile> {
        self.files
            .into_iter()
            .map(|(path, content)| GeneratedFile { path, content })
            .collect()
    }
}
