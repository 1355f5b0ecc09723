pub mod analyzer;
pub mod config;
pub mod dependency_graph;
pub mod error;
pub mod file_discovery;
pub mod model;
pub mod module_parser;
mod patterns;
pub mod reporter;
pub mod resolver;
pub mod source_provider;

pub use analyzer::Analyzer;
pub use config::Config;
pub use dependency_graph::GraphBuilder;
pub use error::{ParseError, ScanError};
pub use file_discovery::ModuleFinder;
pub use model::{Component, ComponentKind, Module, ScannedModule};
pub use module_parser::ModuleParser;
pub use reporter::Reporter;
pub use resolver::{ConstructorDependencyResolver, DependencyResolver};
pub use source_provider::{FileTreeSourceProvider, SourceTextProvider};

pub type Result<T> = anyhow::Result<T>;
