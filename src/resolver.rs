use crate::error::ParseError;
use crate::patterns::{join_lines, CONSTRUCTOR_DECLARATION};
use crate::source_provider::SourceTextProvider;
use regex::Regex;
use tracing::debug;

pub trait DependencyResolver {
    /// Constructor parameter type names of `class_name`, in declaration order.
    fn dependency_names(&self, class_name: &str) -> Result<Vec<String>, ParseError>;
}

impl<R: DependencyResolver + ?Sized> DependencyResolver for &R {
    fn dependency_names(&self, class_name: &str) -> Result<Vec<String>, ParseError> {
        (**self).dependency_names(class_name)
    }
}

/// Reads a class's primary constructor through a [`SourceTextProvider`].
///
/// The parameter list ends at the first `)` after the opening one, so a
/// default value such as `= listOf()` cuts the list short. Parameters are
/// split on every `,`, including those inside generic arguments.
pub struct ConstructorDependencyResolver<P> {
    provider: P,
}

impl<P: SourceTextProvider> ConstructorDependencyResolver<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

fn declaration_for(class_name: &str) -> Result<Regex, ParseError> {
    let pattern = CONSTRUCTOR_DECLARATION.replace("{name}", &regex::escape(class_name));
    Regex::new(&pattern).map_err(|_| ParseError::MissingConstructorDeclaration(class_name.to_string()))
}

impl<P: SourceTextProvider> DependencyResolver for ConstructorDependencyResolver<P> {
    fn dependency_names(&self, class_name: &str) -> Result<Vec<String>, ParseError> {
        let Some(source) = self.provider.source_for(class_name) else {
            debug!("No source for {}, treating it as external", class_name);
            return Ok(Vec::new());
        };

        let source = join_lines(&source);
        let declaration = declaration_for(class_name)?;
        let missing = || ParseError::MissingConstructorDeclaration(class_name.to_string());

        let open = declaration.find(&source).ok_or_else(missing)?;
        let rest = &source[open.end()..];
        let close = rest.find(')').ok_or_else(missing)?;

        Ok(parameter_types(&rest[..close]))
    }
}

/// Type names of a raw parameter list; untyped parameters are dropped.
pub fn parameter_types(parameters: &str) -> Vec<String> {
    parameters
        .split(',')
        .filter(|fragment| !fragment.trim().is_empty())
        .filter_map(|fragment| fragment.split_once(':'))
        .map(|(_, type_name)| type_name.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeSourceProvider {
        sources: HashMap<String, String>,
        lookups: RefCell<Vec<String>>,
    }

    impl FakeSourceProvider {
        fn with(class_name: &str, source: &str) -> Self {
            let mut provider = Self::default();
            provider
                .sources
                .insert(class_name.to_string(), source.to_string());
            provider
        }
    }

    impl SourceTextProvider for FakeSourceProvider {
        fn source_for(&self, class_name: &str) -> Option<String> {
            self.lookups.borrow_mut().push(class_name.to_string());
            self.sources.get(class_name).cloned()
        }
    }

    fn resolve(provider: &FakeSourceProvider, class_name: &str) -> Result<Vec<String>, ParseError> {
        ConstructorDependencyResolver::new(provider).dependency_names(class_name)
    }

    #[test]
    fn test_missing_source_yields_no_dependencies() {
        let provider = FakeSourceProvider::default();

        assert_eq!(resolve(&provider, "Test").unwrap(), Vec::<String>::new());
        assert_eq!(*provider.lookups.borrow(), vec!["Test".to_string()]);
    }

    #[test]
    fn test_single_dependency() {
        let provider = FakeSourceProvider::with(
            "Test",
            r#"
import org.koin.core.component.KoinComponent

class Test (private val testDependency: TestDependency) {

}
"#,
        );

        assert_eq!(resolve(&provider, "Test").unwrap(), vec!["TestDependency"]);
    }

    #[test]
    fn test_two_typed_parameters_in_order() {
        let provider = FakeSourceProvider::with("Foo", "class Foo(a: A, b: B)");
        assert_eq!(resolve(&provider, "Foo").unwrap(), vec!["A", "B"]);
    }

    #[test]
    fn test_trailing_separator_produces_no_extra_entry() {
        let provider = FakeSourceProvider::with(
            "Test",
            r#"
class Test (
    private val testDependency0: TestDependency0,
    private val testDependency1: TestDependency1,
    private val testDependency2: TestDependency2,
) {
    private val testVal: TestVal = TestVal()

    init {
        for (i in 1..10) {
            println(i)
        }
    }
}
"#,
        );

        assert_eq!(
            resolve(&provider, "Test").unwrap(),
            vec!["TestDependency0", "TestDependency1", "TestDependency2"]
        );
    }

    #[test]
    fn test_untyped_parameter_is_dropped() {
        let provider = FakeSourceProvider::with("Foo", "class Foo(a: A, legacy, c: C)");
        assert_eq!(resolve(&provider, "Foo").unwrap(), vec!["A", "C"]);
    }

    #[test]
    fn test_default_value_with_parenthesis_truncates_list() {
        let provider = FakeSourceProvider::with(
            "Foo",
            "class Foo(a: A, items: List<Item> = listOf(), b: B)",
        );
        assert_eq!(resolve(&provider, "Foo").unwrap(), vec!["A", "List<Item> = listOf("]);
    }

    #[test]
    fn test_inject_constructor_and_type_parameters() {
        let provider = FakeSourceProvider::with(
            "Cache",
            "class Cache<T> @Inject internal constructor(store: Store, clock: Clock)",
        );
        assert_eq!(resolve(&provider, "Cache").unwrap(), vec!["Store", "Clock"]);
    }

    #[test]
    fn test_other_class_in_same_file_is_not_used() {
        let provider = FakeSourceProvider::with(
            "Repo",
            "class RepoImpl(api: Api)\nclass Repo(dao: Dao)",
        );
        assert_eq!(resolve(&provider, "Repo").unwrap(), vec!["Dao"]);
    }

    #[test]
    fn test_source_without_constructor_is_an_error() {
        let provider = FakeSourceProvider::with("Api", "interface Api {\n    fun load()\n}\n");

        let err = resolve(&provider, "Api").unwrap_err();
        assert!(matches!(err, ParseError::MissingConstructorDeclaration(name) if name == "Api"));
    }

    #[test]
    fn test_unclosed_parameter_list_is_an_error() {
        let provider = FakeSourceProvider::with("Api", "class Api(client: Client");
        assert!(matches!(
            resolve(&provider, "Api"),
            Err(ParseError::MissingConstructorDeclaration(_))
        ));
    }

    #[test]
    fn test_parameter_types_trims_whitespace() {
        assert_eq!(
            parameter_types("  val a :  Alpha ,private val b:Beta,   "),
            vec!["Alpha", "Beta"]
        );
        assert!(parameter_types("").is_empty());
    }
}
