//! Pattern sources shared by the scanners. Each scanner compiles its own
//! copy at construction time.

/// `val appModule = module {`, optionally `var`, a `: Module` type or
/// `module(createdAtStart = true) {`.
pub(crate) const MODULE_DECLARATION: &str =
    r"\b(?:val|var)\s+(?P<name>[A-Za-z_]\w*)\s*(?::\s*Module\s*)?=\s*module\s*(?:\([^(){}]*\)\s*)?\{";

/// A DSL block: keyword, optional `<Type>`, optional `(options)`, and a body
/// that ends at the first `}` and may not contain `{`.
pub(crate) const COMPONENT_BLOCK: &str =
    r"\b(?P<keyword>[a-z]\w*)\s*(?:<(?P<generic>[^{}()]*)>\s*)?(?:\([^(){}]*\)\s*)?\{(?P<body>[^{}]*)\}";

/// `scope<MainActivity> {`, the enclosing block of `scoped` registrations.
pub(crate) const SCOPE_DECLARATION: &str = r"\bscope\s*<\s*(?P<scope>[\w.]+)\s*>\s*\{";

/// Leading lambda parameters: `parameters ->`, `(a, b) ->`, `(id: Int) ->`.
pub(crate) const LAMBDA_PARAMETERS: &str =
    r"^\s*\(?\s*\w+(?:\s*:\s*[\w.<>?]+)?(?:\s*,\s*\w+(?:\s*:\s*[\w.<>?]+)?)*\s*\)?\s*->";

/// The first `Name(` in a component body.
pub(crate) const CONSTRUCTOR_CALL: &str = r"(?P<class>[A-Za-z_]\w*)\s*\(";

/// `class Name(`, allowing `<T>` and `@Inject private constructor` before the
/// parameter list. `{name}` is replaced with the escaped class name.
pub(crate) const CONSTRUCTOR_DECLARATION: &str = r"\bclass\s+{name}\s*(?:<[^(){}]*>\s*)?(?:(?:@\w+\s*)*(?:(?:private|protected|internal|public)\s+)?constructor\s*)?\(";

/// Kotlin line breaks are insignificant to every pattern above; scanning
/// works on the text with them removed.
pub(crate) fn join_lines(content: &str) -> String {
    content.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_module_declaration_variants() {
        let re = Regex::new(MODULE_DECLARATION).unwrap();
        for source in [
            "val appModule = module {",
            "private val appModule = module {",
            "val appModule: Module = module {",
            "val                    appModule = module {",
            "val appModule = module(createdAtStart = true) {",
        ] {
            let caps = re.captures(source).unwrap_or_else(|| panic!("no match: {source}"));
            assert_eq!(&caps["name"], "appModule");
        }
        assert!(!re.is_match("fun module() {"));
        assert!(!re.is_match("val appModule = listOf(module)"));
    }

    #[test]
    fn test_join_lines_removes_both_line_endings() {
        assert_eq!(join_lines("a\r\nb\nc"), "abc");
    }
}
