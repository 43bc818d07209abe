//! Line-level call classification.
//!
//! Given one source line and a symbol name, decide which [`CallType`] the
//! line represents. Patterns are tried in a fixed precedence (definition,
//! decorator, instance, class, static, function) and the first hit wins, so
//! a line is never counted under two types. Only a bare `@name` line is a
//! decorator; `@name(...)` is classified by the call patterns.
//!
//! This is a lexical approximation of Python syntax. Scoping, shadowing and
//! dynamic dispatch are not resolved.

use regex::Regex;

use crate::types::CallType;

/// Compiled patterns for a single symbol name.
///
/// Building the regexes is the expensive part of classification, so the
/// usage search compiles one matcher per definition and reuses it for every
/// raw match line.
#[derive(Debug, Clone)]
pub struct CallMatcher {
    name: String,
    qualified: String,
    patterns: Vec<(CallType, Regex)>,
}

impl CallMatcher {
    pub fn new(name: &str) -> Self {
        let escaped = regex::escape(name);

        let sources = [
            (
                CallType::Definition,
                format!(r"^\s*(?:async\s+)?def\s+{escaped}\s*\("),
            ),
            // Bare `@name` or `@pkg.name` only; `@name(...)` falls through
            (
                CallType::Decorator,
                format!(r"^\s*@(?:\w+\.)*{escaped}\s*$"),
            ),
            (CallType::Instance, format!(r"\bself\.{escaped}\s*\(")),
            (CallType::Class, format!(r"\bcls\.{escaped}\s*\(")),
            // Capitalised receiver approximates `ClassName.method(`
            (
                CallType::Static,
                format!(r"\b[A-Z][a-zA-Z0-9_]*\.{escaped}\s*\("),
            ),
            (CallType::Function, format!(r"(?:^|[^\w.]){escaped}\s*\(")),
        ];

        let patterns = sources
            .into_iter()
            // The name is escaped, so every source compiles
            .filter_map(|(ct, src)| Regex::new(&src).ok().map(|re| (ct, re)))
            .collect();

        Self {
            name: name.to_string(),
            qualified: format!(".{name}"),
            patterns,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Classify one line. Returns `None` when no pattern applies.
    pub fn classify(&self, line: &str) -> Option<CallType> {
        if line.trim().starts_with('#') {
            return None;
        }

        // Drop a trailing comment, but only when the code before it still
        // mentions the name. Otherwise the whole line is tested.
        let line = match line.find('#') {
            Some(idx) if line[..idx].contains(self.name.as_str()) => &line[..idx],
            _ => line,
        };

        for (call_type, pattern) in &self.patterns {
            if !pattern.is_match(line) {
                continue;
            }
            if *call_type == CallType::Function && line.contains(self.qualified.as_str()) {
                // A dotted receiver the earlier patterns rejected (`obj.name(`).
                // Function is the last pattern, so the line stays unmatched.
                return None;
            }
            return Some(*call_type);
        }

        None
    }
}

/// Classify `line` as a reference to `name`.
///
/// Convenience wrapper that compiles a fresh [`CallMatcher`]; prefer
/// reusing a matcher when classifying many lines for the same name.
pub fn classify(line: &str, name: &str) -> Option<CallType> {
    CallMatcher::new(name).classify(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition() {
        assert_eq!(classify("def bar():", "bar"), Some(CallType::Definition));
        assert_eq!(classify("    def bar(self, x):", "bar"), Some(CallType::Definition));
        assert_eq!(classify("async def bar():", "bar"), Some(CallType::Definition));
        assert_eq!(classify("def bar (x):", "bar"), Some(CallType::Definition));
    }

    #[test]
    fn test_definition_needs_exact_name() {
        // `def barbaz(` is not a definition of `bar` and has no call either
        assert_eq!(classify("def barbaz():", "bar"), None);
    }

    #[test]
    fn test_instance_call() {
        assert_eq!(classify("self.bar()", "bar"), Some(CallType::Instance));
        assert_eq!(classify("    x = self.bar(1, 2)", "bar"), Some(CallType::Instance));
    }

    #[test]
    fn test_class_call() {
        assert_eq!(classify("return cls.bar()", "bar"), Some(CallType::Class));
    }

    #[test]
    fn test_static_call() {
        assert_eq!(classify("Bar.bar()", "bar"), Some(CallType::Static));
        assert_eq!(classify("x = MyService_2.bar(a)", "bar"), Some(CallType::Static));
    }

    #[test]
    fn test_function_call() {
        assert_eq!(classify("bar()", "bar"), Some(CallType::Function));
        assert_eq!(classify("x = bar(1)", "bar"), Some(CallType::Function));
        assert_eq!(classify("print(bar())", "bar"), Some(CallType::Function));
        assert_eq!(classify("    return bar (x)", "bar"), Some(CallType::Function));
    }

    #[test]
    fn test_lowercase_receiver_is_not_static_nor_function() {
        assert_eq!(classify("obj.bar()", "bar"), None);
        assert_eq!(classify("self.client.bar()", "bar"), None);
    }

    #[test]
    fn test_dotted_name_anywhere_discards_function() {
        // The bare call is dropped because the line also holds `.bar`
        assert_eq!(classify("obj.bar() or bar()", "bar"), None);
    }

    #[test]
    fn test_suffix_of_longer_identifier_is_not_a_call() {
        assert_eq!(classify("foobar()", "bar"), None);
        assert_eq!(classify("bar_baz()", "bar"), None);
    }

    #[test]
    fn test_decorator() {
        assert_eq!(classify("@bar", "bar"), Some(CallType::Decorator));
        assert_eq!(classify("    @app.bar", "bar"), Some(CallType::Decorator));
        assert_eq!(classify("@Registry.bar", "bar"), Some(CallType::Decorator));
    }

    #[test]
    fn test_decorator_with_arguments_is_not_a_decorator() {
        // The argument list moves the line to the call patterns
        assert_eq!(classify("@bar()", "bar"), Some(CallType::Function));
        assert_eq!(classify("@Registry.bar()", "bar"), Some(CallType::Static));
        assert_eq!(classify("@app.bar('/index')", "bar"), None);
    }

    #[test]
    fn test_comment_only_line() {
        assert_eq!(classify("# bar()", "bar"), None);
        assert_eq!(classify("    #self.bar()", "bar"), None);
    }

    #[test]
    fn test_trailing_comment_is_stripped_when_code_mentions_name() {
        assert_eq!(classify("bar()  # call bar", "bar"), Some(CallType::Function));
        // Code part mentions the name but not as a call: comment is dropped
        assert_eq!(classify("x = bar  # bar()", "bar"), None);
    }

    #[test]
    fn test_full_line_kept_when_code_part_lacks_name() {
        // `#` inside a string literal would otherwise hide the call
        assert_eq!(classify(r##"print("#", bar())"##, "bar"), Some(CallType::Function));
        assert_eq!(classify("x = 1  # bar()", "bar"), Some(CallType::Function));
    }

    #[test]
    fn test_precedence_first_match_wins() {
        // Both definition and function patterns match; definition wins
        assert_eq!(classify("def bar(): return bar()", "bar"), Some(CallType::Definition));
        // Instance beats static when both could apply
        assert_eq!(classify("self.bar(); Foo.bar()", "bar"), Some(CallType::Instance));
    }

    #[test]
    fn test_regex_metacharacters_in_name() {
        let matcher = CallMatcher::new("a.b");
        assert_eq!(matcher.classify("axb()"), None);
    }

    #[test]
    fn test_matcher_reuse() {
        let matcher = CallMatcher::new("helper");
        assert_eq!(matcher.name(), "helper");
        assert_eq!(matcher.classify("helper()"), Some(CallType::Function));
        assert_eq!(matcher.classify("self.helper()"), Some(CallType::Instance));
        assert_eq!(matcher.classify("def helper():"), Some(CallType::Definition));
        assert_eq!(matcher.classify("import helper"), None);
    }
}
