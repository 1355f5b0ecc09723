use crate::config::Config;
use crate::file_discovery::{source_files, PathFilter};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Supplies the source text that defines a class.
pub trait SourceTextProvider {
    /// Returns `None` when no source for `class_name` can be found, which is
    /// the normal outcome for library and platform classes.
    fn source_for(&self, class_name: &str) -> Option<String>;
}

/// Looks classes up in a source tree: first by file name, then by scanning
/// file contents for the class declaration.
///
/// Nothing is cached; every lookup walks the tree again.
pub struct FileTreeSourceProvider {
    config: Config,
    filter: PathFilter,
}

impl FileTreeSourceProvider {
    pub fn new(config: Config) -> crate::Result<Self> {
        let filter = PathFilter::new(&config)?;
        Ok(Self { config, filter })
    }

    fn find_by_file_name(&self, class_name: &str) -> Option<PathBuf> {
        source_files(&self.config, &self.filter).find(|path| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().trim() == class_name)
                .unwrap_or(false)
        })
    }

    fn find_by_declaration(&self, class_name: &str) -> Option<PathBuf> {
        let declaration = Regex::new(&format!(r"\bclass\s+{}\b", regex::escape(class_name))).ok()?;

        source_files(&self.config, &self.filter).find(|path| match fs::read_to_string(path) {
            Ok(content) => declaration.is_match(&content),
            Err(e) => {
                debug!("Skipping unreadable file {}: {}", path.display(), e);
                false
            }
        })
    }

    fn read(path: &Path) -> Option<String> {
        match fs::read_to_string(path) {
            Ok(content) => Some(content),
            Err(e) => {
                debug!("Could not read {}: {}", path.display(), e);
                None
            }
        }
    }
}

impl SourceTextProvider for FileTreeSourceProvider {
    fn source_for(&self, class_name: &str) -> Option<String> {
        let class_name = class_name.trim();
        if class_name.is_empty() {
            return None;
        }

        let path = self
            .find_by_file_name(class_name)
            .or_else(|| self.find_by_declaration(class_name))?;
        debug!("Resolved class {} to {}", class_name, path.display());
        Self::read(&path)
    }
}

impl<P: SourceTextProvider + ?Sized> SourceTextProvider for &P {
    fn source_for(&self, class_name: &str) -> Option<String> {
        (**self).source_for(class_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn provider_for(root: &Path) -> FileTreeSourceProvider {
        FileTreeSourceProvider::new(Config::for_directory(root)).unwrap()
    }

    #[test]
    fn test_finds_class_by_file_name() {
        let dir = tempdir().unwrap();
        write(dir.path(), "data/UserRepository.kt", "class UserRepository(api: Api)\n");

        let source = provider_for(dir.path()).source_for("UserRepository").unwrap();
        assert!(source.contains("class UserRepository(api: Api)"));
    }

    #[test]
    fn test_falls_back_to_declaration_scan() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "data/Repositories.kt",
            "class UserRepositoryImpl(api: Api)\n\nclass UserRepository(\n    dao: UserDao,\n)\n",
        );

        let source = provider_for(dir.path()).source_for("UserRepository").unwrap();
        assert!(source.contains("dao: UserDao"));
    }

    #[test]
    fn test_declaration_scan_needs_whole_name() {
        let dir = tempdir().unwrap();
        write(dir.path(), "data/Impls.kt", "class UserRepositoryImpl(api: Api)\n");

        assert!(provider_for(dir.path()).source_for("UserRepository").is_none());
    }

    #[test]
    fn test_unknown_class_yields_none() {
        let dir = tempdir().unwrap();
        write(dir.path(), "app/App.kt", "class App()\n");

        let provider = provider_for(dir.path());
        assert!(provider.source_for("OkHttpClient").is_none());
        assert!(provider.source_for("   ").is_none());
    }

    #[test]
    fn test_non_source_files_are_not_consulted() {
        let dir = tempdir().unwrap();
        write(dir.path(), "docs/Api.md", "class Api(client: Client)\n");

        assert!(provider_for(dir.path()).source_for("Api").is_none());
    }
}
