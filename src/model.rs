use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A single named Koin module parsed from one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    name: String,
    components: Vec<Component>,
}

impl Module {
    pub fn new(name: impl Into<String>, components: Vec<Component>) -> Self {
        Self {
            name: name.into(),
            components,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Components in the order they are declared in the module body.
    pub fn components(&self) -> &[Component] {
        &self.components
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Singleton,
    Factory,
    ViewModel,
    Scoped,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 4] = [
        ComponentKind::Singleton,
        ComponentKind::Factory,
        ComponentKind::ViewModel,
        ComponentKind::Scoped,
    ];

    /// The Koin DSL keyword that declares this kind.
    pub fn keyword(self) -> &'static str {
        match self {
            ComponentKind::Singleton => "single",
            ComponentKind::Factory => "factory",
            ComponentKind::ViewModel => "viewModel",
            ComponentKind::Scoped => "scoped",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One registration inside a module. Every variant carries the produced
/// class name and its constructor dependency type names, in parameter order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Component {
    Singleton {
        name: String,
        dependencies: Vec<String>,
    },
    Factory {
        name: String,
        dependencies: Vec<String>,
    },
    ViewModel {
        name: String,
        dependencies: Vec<String>,
    },
    Scoped {
        name: String,
        dependencies: Vec<String>,
        scope_type: String,
    },
}

impl Component {
    pub fn name(&self) -> &str {
        match self {
            Component::Singleton { name, .. }
            | Component::Factory { name, .. }
            | Component::ViewModel { name, .. }
            | Component::Scoped { name, .. } => name,
        }
    }

    pub fn dependencies(&self) -> &[String] {
        match self {
            Component::Singleton { dependencies, .. }
            | Component::Factory { dependencies, .. }
            | Component::ViewModel { dependencies, .. }
            | Component::Scoped { dependencies, .. } => dependencies,
        }
    }

    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Singleton { .. } => ComponentKind::Singleton,
            Component::Factory { .. } => ComponentKind::Factory,
            Component::ViewModel { .. } => ComponentKind::ViewModel,
            Component::Scoped { .. } => ComponentKind::Scoped,
        }
    }

    pub fn scope_type(&self) -> Option<&str> {
        match self {
            Component::Scoped { scope_type, .. } => Some(scope_type),
            _ => None,
        }
    }
}

/// A module together with the file it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedModule {
    pub path: PathBuf,
    pub module: Module,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_cover_every_variant() {
        let scoped = Component::Scoped {
            name: "Presenter".to_string(),
            dependencies: vec!["Repo".to_string()],
            scope_type: "MainActivity".to_string(),
        };
        assert_eq!(scoped.name(), "Presenter");
        assert_eq!(scoped.dependencies(), ["Repo".to_string()]);
        assert_eq!(scoped.kind(), ComponentKind::Scoped);
        assert_eq!(scoped.scope_type(), Some("MainActivity"));

        let single = Component::Singleton {
            name: "Api".to_string(),
            dependencies: Vec::new(),
        };
        assert_eq!(single.kind(), ComponentKind::Singleton);
        assert!(single.dependencies().is_empty());
        assert_eq!(single.scope_type(), None);
    }

    #[test]
    fn test_keywords_map_one_to_one() {
        for kind in ComponentKind::ALL {
            assert_eq!(ComponentKind::from_keyword(kind.keyword()), Some(kind));
        }
        assert_eq!(ComponentKind::from_keyword("worker"), None);
        assert_eq!(ComponentKind::from_keyword("viewmodel"), None);
    }

    #[test]
    fn test_component_serializes_with_kind_tag() {
        let component = Component::ViewModel {
            name: "MainViewModel".to_string(),
            dependencies: vec!["Repo".to_string()],
        };
        let json = serde_json::to_value(&component).unwrap();
        assert_eq!(json["kind"], "view_model");
        assert_eq!(json["name"], "MainViewModel");
    }
}
