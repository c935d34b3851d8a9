/// String-or-callable rules for params filters and ignored user agents
use regex::Regex;

use super::callback::Predicate;
use crate::error::ConfigError;

/// A single entry in `params_filters` or `ignore_user_agent`
#[derive(Debug, Clone)]
pub enum Rule {
    /// Exact string match
    Literal(String),
    /// Regular expression match
    Pattern(Regex),
    /// Arbitrary predicate
    Predicate(Predicate),
}

impl Rule {
    /// Build a rule from its config-file spelling.
    ///
    /// `/.../` is compiled as a regex, anything else is a literal.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.strip_prefix('/').and_then(|s| s.strip_suffix('/')) {
            Some(pattern) => Regex::new(pattern)
                .map(Rule::Pattern)
                .map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                }),
            _ => Ok(Rule::Literal(raw.to_string())),
        }
    }

    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Rule::Predicate(Predicate::new(predicate))
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Rule::Literal(literal) => literal == candidate,
            Rule::Pattern(regex) => regex.is_match(candidate),
            Rule::Predicate(predicate) => predicate.test(candidate),
        }
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Rule::Literal(a), Rule::Literal(b)) => a == b,
            (Rule::Pattern(a), Rule::Pattern(b)) => a.as_str() == b.as_str(),
            (Rule::Predicate(a), Rule::Predicate(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for Rule {
    fn from(value: &str) -> Self {
        Rule::Literal(value.to_string())
    }
}

impl From<String> for Rule {
    fn from(value: String) -> Self {
        Rule::Literal(value)
    }
}

impl From<Regex> for Rule {
    fn from(value: Regex) -> Self {
        Rule::Pattern(value)
    }
}

impl From<Predicate> for Rule {
    fn from(value: Predicate) -> Self {
        Rule::Predicate(value)
    }
}

/// A single value or a sequence, normalized into a `Vec`
///
/// Used by the `*_only` setters so `ignore_only("Foo")` and
/// `ignore_only(["Foo"])` mean the same thing.
#[derive(Debug, Clone, PartialEq)]
pub struct OneOrMany<T>(Vec<T>);

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl From<&str> for OneOrMany<String> {
    fn from(value: &str) -> Self {
        OneOrMany(vec![value.to_string()])
    }
}

impl From<String> for OneOrMany<String> {
    fn from(value: String) -> Self {
        OneOrMany(vec![value])
    }
}

impl From<Vec<String>> for OneOrMany<String> {
    fn from(values: Vec<String>) -> Self {
        OneOrMany(values)
    }
}

impl From<Vec<&str>> for OneOrMany<String> {
    fn from(values: Vec<&str>) -> Self {
        OneOrMany(values.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for OneOrMany<String> {
    fn from(values: [&str; N]) -> Self {
        OneOrMany(values.into_iter().map(str::to_string).collect())
    }
}

impl From<Rule> for OneOrMany<Rule> {
    fn from(value: Rule) -> Self {
        OneOrMany(vec![value])
    }
}

impl From<&str> for OneOrMany<Rule> {
    fn from(value: &str) -> Self {
        OneOrMany(vec![Rule::from(value)])
    }
}

impl From<String> for OneOrMany<Rule> {
    fn from(value: String) -> Self {
        OneOrMany(vec![Rule::from(value)])
    }
}

impl From<Regex> for OneOrMany<Rule> {
    fn from(value: Regex) -> Self {
        OneOrMany(vec![Rule::from(value)])
    }
}

impl From<Vec<Rule>> for OneOrMany<Rule> {
    fn from(values: Vec<Rule>) -> Self {
        OneOrMany(values)
    }
}

impl From<Vec<&str>> for OneOrMany<Rule> {
    fn from(values: Vec<&str>) -> Self {
        OneOrMany(values.into_iter().map(Rule::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for OneOrMany<Rule> {
    fn from(values: [&str; N]) -> Self {
        OneOrMany(values.into_iter().map(Rule::from).collect())
    }
}
