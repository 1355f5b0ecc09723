use crate::{
    analyzer::{FailedFile, ProjectAnalysis},
    dependency_graph::DependencyAnalysis,
    model::ScannedModule,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub modules: Vec<ScannedModule>,
    pub failures: Vec<FailedFile>,
    pub dependency_analysis: DependencyAnalysis,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: String,
    pub project_name: String,
    pub target_directory: String,
    pub total_modules: usize,
    pub total_components: usize,
    pub failed_files: usize,
    pub analysis_duration_ms: u128,
    pub version: String,
}

pub struct Reporter;

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter {
    pub fn new() -> Self {
        Self
    }

    pub fn generate_report(&self, analysis: &ProjectAnalysis, duration_ms: u128) -> Report {
        Report {
            metadata: self.create_metadata(analysis, duration_ms),
            modules: analysis.modules.clone(),
            failures: analysis.failures.clone(),
            dependency_analysis: analysis.dependency_analysis.clone(),
        }
    }

    fn create_metadata(&self, analysis: &ProjectAnalysis, duration_ms: u128) -> ReportMetadata {
        let project_name = analysis
            .target_directory
            .canonicalize()
            .ok()
            .as_deref()
            .unwrap_or(analysis.target_directory.as_path())
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        ReportMetadata {
            generated_at: chrono::Utc::now().to_rfc3339(),
            project_name,
            target_directory: analysis.target_directory.display().to_string(),
            total_modules: analysis.modules.len(),
            total_components: analysis
                .modules
                .iter()
                .map(|scanned| scanned.module.components().len())
                .sum(),
            failed_files: analysis.failures.len(),
            analysis_duration_ms: duration_ms,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn to_json(&self, report: &Report) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    pub fn to_markdown(&self, report: &Report) -> String {
        let mut md = format!(
            "# Koin Graph Report\n\n**Project:** {}\n**Generated:** {}\n**Analysis Duration:** {}ms\n\n",
            report.metadata.project_name,
            report.metadata.generated_at,
            report.metadata.analysis_duration_ms
        );

        md.push_str("## Summary\n\n");
        md.push_str(&format!("- **Modules:** {}\n", report.metadata.total_modules));
        md.push_str(&format!("- **Components:** {}\n", report.metadata.total_components));
        md.push_str(&format!(
            "- **Dependency edges:** {}\n",
            report.dependency_analysis.dependency_edges
        ));
        md.push_str(&format!("- **Failed files:** {}\n\n", report.metadata.failed_files));

        md.push_str("## Modules\n\n");
        for scanned in &report.modules {
            md.push_str(&format!(
                "### {}\n\n`{}`\n\n| Kind | Component | Dependencies |\n|------|-----------|--------------|\n",
                scanned.module.name(),
                scanned.path.display()
            ));
            for component in scanned.module.components() {
                let kind = match component.scope_type() {
                    Some(scope) => format!("{} ({})", component.kind(), scope),
                    None => component.kind().to_string(),
                };
                md.push_str(&format!(
                    "| {} | {} | {} |\n",
                    kind,
                    component.name(),
                    component.dependencies().join(", ")
                ));
            }
            md.push('\n');
        }

        if !report.dependency_analysis.external_dependencies.is_empty() {
            md.push_str("## Unregistered Dependencies\n\n");
            for name in &report.dependency_analysis.external_dependencies {
                md.push_str(&format!("- {}\n", name));
            }
            md.push('\n');
        }

        if !report.failures.is_empty() {
            md.push_str("## Failed Files\n\n");
            for failure in &report.failures {
                md.push_str(&format!("- `{}`: {}\n", failure.path.display(), failure.error));
            }
        }

        md
    }
}
