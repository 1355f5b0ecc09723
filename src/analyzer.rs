use crate::{
    config::Config,
    dependency_graph::{DependencyAnalysis, GraphBuilder},
    error::ScanError,
    file_discovery::ModuleFinder,
    model::ScannedModule,
    module_parser::ModuleParser,
    resolver::ConstructorDependencyResolver,
    source_provider::FileTreeSourceProvider,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

type TreeParser = ModuleParser<ConstructorDependencyResolver<FileTreeSourceProvider>>;

/// Runs discovery and parsing over one source tree.
pub struct Analyzer {
    config: Config,
    finder: ModuleFinder,
    parser: TreeParser,
}

impl Analyzer {
    pub fn new(config: Config) -> Result<Self> {
        let finder = ModuleFinder::new(config.clone())?;
        let provider = FileTreeSourceProvider::new(config.clone())?;
        let parser = ModuleParser::new(ConstructorDependencyResolver::new(provider))?;

        Ok(Self {
            config,
            finder,
            parser,
        })
    }

    /// Parse module files one at a time as the caller pulls them.
    ///
    /// A failed file produces an `Err` tagged with its path and the scan
    /// moves on to the next candidate.
    pub fn scan(&self) -> impl Iterator<Item = Result<ScannedModule, ScanError>> + '_ {
        self.finder
            .find_module_files()
            .map(move |path| self.parse_file(path))
    }

    pub fn parse_file(&self, path: PathBuf) -> Result<ScannedModule, ScanError> {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => return Err(ScanError::new(path, e)),
        };

        match self.parser.parse(&content) {
            Ok(module) => Ok(ScannedModule { path, module }),
            Err(e) => Err(ScanError::new(path, e)),
        }
    }

    pub fn analyze_project(&self) -> ProjectAnalysis {
        info!("Scanning {} for Koin modules", self.config.target_directory.display());

        let mut modules = Vec::new();
        let mut failures = Vec::new();

        for outcome in self.scan() {
            match outcome {
                Ok(scanned) => {
                    info!(
                        "Parsed {} ({} components) from {}",
                        scanned.module.name(),
                        scanned.module.components().len(),
                        scanned.path.display()
                    );
                    modules.push(scanned);
                }
                Err(e) => {
                    warn!("{}", e);
                    failures.push(FailedFile {
                        path: e.path.clone(),
                        error: e.kind.to_string(),
                    });
                }
            }
        }

        let mut graph_builder = GraphBuilder::new();
        graph_builder.build_graph(&modules);
        let dependency_analysis = graph_builder.analyze_dependencies();

        ProjectAnalysis {
            target_directory: self.config.target_directory.clone(),
            modules,
            failures,
            dependency_analysis,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectAnalysis {
    pub target_directory: PathBuf,
    pub modules: Vec<ScannedModule>,
    pub failures: Vec<FailedFile>,
    pub dependency_analysis: DependencyAnalysis,
}

impl ProjectAnalysis {
    pub fn print_summary(&self) {
        println!("📊 Koin Graph Summary");
        println!("=====================");

        println!("\n📁 Modules:");
        println!("  Parsed: {}", self.modules.len());
        println!("  Failed: {}", self.failures.len());
        for scanned in &self.modules {
            println!("\n  📦 {} ({})", scanned.module.name(), scanned.path.display());
            for component in scanned.module.components() {
                if component.dependencies().is_empty() {
                    println!("    {} {}", component.kind(), component.name());
                } else {
                    println!(
                        "    {} {} -> {}",
                        component.kind(),
                        component.name(),
                        component.dependencies().join(", ")
                    );
                }
            }
        }

        if !self.failures.is_empty() {
            println!("\n⚠️  Failed files:");
            for failure in &self.failures {
                println!("  ✗ {}: {}", failure.path.display(), failure.error);
            }
        }

        println!("\n🔗 Dependencies:");
        self.dependency_analysis.print_summary();
    }

    pub fn export_to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
