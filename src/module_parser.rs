use crate::error::ParseError;
use crate::model::{Component, ComponentKind, Module};
use crate::patterns::{
    join_lines, COMPONENT_BLOCK, CONSTRUCTOR_CALL, LAMBDA_PARAMETERS, MODULE_DECLARATION,
    SCOPE_DECLARATION,
};
use crate::resolver::DependencyResolver;
use regex::{Captures, Regex};
use tracing::debug;

/// Blocks that group registrations rather than register a component.
const GROUPING_KEYWORDS: &[&str] = &["scope"];

/// Kotlin control flow, declarations and stdlib block builders. These open
/// ordinary code blocks inside and around a module.
const LANGUAGE_KEYWORDS: &[&str] = &[
    "if", "else", "when", "try", "catch", "finally", "init", "do", "while", "for", "object",
    "companion", "get", "set", "run", "with", "repeat", "synchronized", "lazy",
];

/// Extracts the first Koin module declared in a file.
///
/// Scanning is pattern based. A component body ends at its first `}` and
/// must not contain `{`; a registration with a nested block is not read at
/// its own keyword. Comments and string literals are not recognized.
pub struct ModuleParser<R> {
    resolver: R,
    module_declaration: Regex,
    component_block: Regex,
    scope_declaration: Regex,
    lambda_parameters: Regex,
    constructor_call: Regex,
}

impl<R: DependencyResolver> ModuleParser<R> {
    pub fn new(resolver: R) -> crate::Result<Self> {
        Ok(Self {
            resolver,
            module_declaration: Regex::new(MODULE_DECLARATION)?,
            component_block: Regex::new(COMPONENT_BLOCK)?,
            scope_declaration: Regex::new(SCOPE_DECLARATION)?,
            lambda_parameters: Regex::new(LAMBDA_PARAMETERS)?,
            constructor_call: Regex::new(CONSTRUCTOR_CALL)?,
        })
    }

    pub fn parse(&self, content: &str) -> Result<Module, ParseError> {
        let content = join_lines(content);

        let anchor = self
            .module_declaration
            .captures(&content)
            .ok_or(ParseError::NoModuleFound)?;
        let name = anchor["name"].to_string();
        let body_start = anchor.get(0).map_or(content.len(), |m| m.end());

        // Anything from a second module declaration on is not part of this module
        let rest = &content[body_start..];
        let body_end = self
            .module_declaration
            .find(rest)
            .map_or(rest.len(), |m| m.start());
        let body = &rest[..body_end];

        let components = self.parse_components(body)?;
        debug!("Parsed module {} with {} components", name, components.len());

        Ok(Module::new(name, components))
    }

    fn parse_components(&self, body: &str) -> Result<Vec<Component>, ParseError> {
        let mut components = Vec::new();

        for block in self.component_block.captures_iter(body) {
            let start = block.get(0).map_or(0, |m| m.start());
            let keyword = &block["keyword"];

            if GROUPING_KEYWORDS.contains(&keyword) || LANGUAGE_KEYWORDS.contains(&keyword) {
                continue;
            }

            let Some(kind) = ComponentKind::from_keyword(keyword) else {
                // `fun provide() { ... }` and the like are not registrations
                if starts_statement(&body[..start]) {
                    return Err(ParseError::UnknownComponentKind(keyword.to_string()));
                }
                continue;
            };

            components.push(self.parse_component(kind, &block, &body[..start])?);
        }

        Ok(components)
    }

    fn parse_component(
        &self,
        kind: ComponentKind,
        block: &Captures<'_>,
        preceding: &str,
    ) -> Result<Component, ParseError> {
        let definition = self.lambda_parameters.replace(&block["body"], "");

        let call = self
            .constructor_call
            .captures(&definition)
            .ok_or_else(|| ParseError::MissingConstructorCall {
                keyword: kind.keyword().to_string(),
            })?;
        let name = call["class"].to_string();
        let arguments = &definition[call.get(0).map_or(0, |m| m.end())..];

        let scope_type = if kind == ComponentKind::Scoped {
            let scope_type = self
                .scope_type(block, preceding)
                .ok_or_else(|| ParseError::UnsupportedScope(name.clone()))?;
            Some(scope_type)
        } else {
            None
        };

        let dependencies = if arguments.trim_start().starts_with(')') {
            Vec::new()
        } else {
            self.resolver.dependency_names(&name)?
        };
        debug!("{} {} -> {:?}", kind, name, dependencies);

        Ok(match kind {
            ComponentKind::Singleton => Component::Singleton { name, dependencies },
            ComponentKind::Factory => Component::Factory { name, dependencies },
            ComponentKind::ViewModel => Component::ViewModel { name, dependencies },
            ComponentKind::Scoped => Component::Scoped {
                name,
                dependencies,
                scope_type: scope_type.unwrap_or_default(),
            },
        })
    }

    /// The block's own `<Type>` annotation, else the innermost `scope<Type>`
    /// block that is still open where the component starts.
    fn scope_type(&self, block: &Captures<'_>, preceding: &str) -> Option<String> {
        block
            .name("generic")
            .map(|m| m.as_str().trim())
            .filter(|generic| !generic.is_empty())
            .map(str::to_string)
            .or_else(|| {
                self.scope_declaration
                    .captures_iter(preceding)
                    .filter(|caps| {
                        caps.get(0)
                            .is_some_and(|m| block_is_open(&preceding[m.end()..]))
                    })
                    .last()
                    .map(|caps| caps["scope"].to_string())
            })
    }
}

fn starts_statement(preceding: &str) -> bool {
    matches!(preceding.trim_end().chars().last(), None | Some('{' | '}' | ';'))
}

/// Whether `inside` (the text after a block's `{`) never closes that block.
fn block_is_open(inside: &str) -> bool {
    let mut depth = 0usize;
    for c in inside.chars() {
        match c {
            '{' => depth += 1,
            '}' if depth == 0 => return false,
            '}' => depth -= 1,
            _ => {}
        }
    }
    true
}
