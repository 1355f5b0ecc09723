use crate::config::Config;
use crate::patterns::{join_lines, MODULE_DECLARATION};
use ignore::{DirEntry, WalkBuilder};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path exclusion rules compiled from `Config::ignore_patterns`.
pub(crate) struct PathFilter {
    root: PathBuf,
    names: Vec<String>,
    extension_globs: Vec<String>,
    wildcards: Vec<Regex>,
}

impl PathFilter {
    pub(crate) fn new(config: &Config) -> crate::Result<Self> {
        let mut names = Vec::new();
        let mut extension_globs = Vec::new();
        let mut wildcards = Vec::new();

        for pattern in &config.ignore_patterns {
            if let Some(ext) = pattern.strip_prefix("*.") {
                extension_globs.push(format!(".{}", ext));
            } else if pattern.contains('*') {
                let escaped: Vec<String> = pattern.split('*').map(regex::escape).collect();
                wildcards.push(Regex::new(&format!("^{}$", escaped.join(".*")))?);
            } else {
                names.push(pattern.clone());
            }
        }

        Ok(Self {
            root: config.target_directory.clone(),
            names,
            extension_globs,
            wildcards,
        })
    }

    /// Only components below the walk root are matched, so a root that
    /// happens to live under e.g. `build/` is still scanned.
    pub(crate) fn should_ignore(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);

        if let Some(file_name) = relative.file_name().map(|n| n.to_string_lossy()) {
            if self
                .extension_globs
                .iter()
                .any(|suffix| file_name.ends_with(suffix.as_str()))
            {
                return true;
            }
        }

        relative.components().any(|component| {
            let component = component.as_os_str().to_string_lossy();
            self.names.iter().any(|name| *name == component)
                || self.wildcards.iter().any(|re| re.is_match(&component))
        })
    }
}

/// Lazily walk every source file below `config.target_directory`.
///
/// Nothing is collected up front: the walk advances only as far as the
/// consumer pulls. Entries that cannot be read are skipped.
pub(crate) fn source_files<'a>(
    config: &'a Config,
    filter: &'a PathFilter,
) -> impl Iterator<Item = PathBuf> + 'a {
    let mut walker_builder = WalkBuilder::new(&config.target_directory);
    walker_builder
        .standard_filters(config.respect_gitignore)
        .hidden(false)
        .git_ignore(config.respect_gitignore)
        .git_global(config.respect_gitignore)
        .git_exclude(config.respect_gitignore);

    let max_file_size = config.max_file_size as u64;

    walker_builder
        .build()
        .filter_map(|result| match result {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter(move |entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| config.is_source_extension(ext))
        })
        .filter(move |entry| !filter.should_ignore(entry.path()))
        .filter(move |entry| within_size_limit(entry, max_file_size))
        .map(DirEntry::into_path)
}

fn within_size_limit(entry: &DirEntry, max_file_size: u64) -> bool {
    match entry.metadata() {
        Ok(metadata) if metadata.len() > max_file_size => {
            debug!(
                "Skipping {} ({} bytes exceeds limit)",
                entry.path().display(),
                metadata.len()
            );
            false
        }
        Ok(_) => true,
        Err(e) => {
            debug!("Skipping {}: {}", entry.path().display(), e);
            false
        }
    }
}

/// Finds the files that declare a Koin module.
pub struct ModuleFinder {
    config: Config,
    filter: PathFilter,
    module_declaration: Regex,
}

impl ModuleFinder {
    pub fn new(config: Config) -> crate::Result<Self> {
        let filter = PathFilter::new(&config)?;
        Ok(Self {
            config,
            filter,
            module_declaration: Regex::new(MODULE_DECLARATION)?,
        })
    }

    /// A lazy sequence of candidate module files, in walk order.
    ///
    /// Each call starts a fresh walk of the tree.
    pub fn find_module_files(&self) -> impl Iterator<Item = PathBuf> + '_ {
        source_files(&self.config, &self.filter).filter(move |path| self.is_module_file(path))
    }

    pub fn is_module_file(&self, path: &Path) -> bool {
        match fs::read_to_string(path) {
            Ok(content) => self.module_declaration.is_match(&join_lines(&content)),
            Err(e) => {
                debug!("Skipping unreadable file {}: {}", path.display(), e);
                false
            }
        }
    }
}
