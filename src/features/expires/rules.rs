//! Path and header rules, and the ordered rule set that picks at most one
//! of them per request.

use std::{borrow::Cow, collections::HashMap};

use http::{HeaderMap, HeaderName};
use regex::Regex;

use crate::{errors::ConfigError, utils::{parse_duration, DurationSpan}};

/// Read access to request headers by name, case-insensitively.
pub trait HeaderLookup {
    /// First value stored under `name`, if any.
    fn header_value(&self, name: &HeaderName) -> Option<Cow<'_, str>>;
}

impl HeaderLookup for HeaderMap {
    fn header_value(&self, name: &HeaderName) -> Option<Cow<'_, str>> {
        self.get(name).map(|value| String::from_utf8_lossy(value.as_bytes()))
    }
}

/// Keys that differ only in case resolve to the lowercase key if present,
/// otherwise to the lexicographically smallest one.
impl HeaderLookup for HashMap<String, String> {
    fn header_value(&self, name: &HeaderName) -> Option<Cow<'_, str>> {
        self.get(name.as_str())
            .or_else(|| {
                self.iter()
                    .filter(|(key, _)| key.eq_ignore_ascii_case(name.as_str()))
                    .min_by_key(|(key, _)| key.as_str())
                    .map(|(_, value)| value)
            })
            .map(|value| Cow::Borrowed(value.as_str()))
    }
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        index: 0,
        pattern: pattern.to_string(),
        source,
    })
}

/// Applies `span` to requests whose path contains a match for `pattern`.
#[derive(Debug, Clone)]
pub struct PathRule {
    pattern: Regex,
    span: DurationSpan,
}

impl PathRule {
    pub fn new(pattern: &str, duration: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            pattern: compile(pattern)?,
            span: parse_duration(duration),
        })
    }

    /// Unanchored: a match anywhere in the path counts.
    pub fn matches(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn span(&self) -> DurationSpan {
        self.span
    }
}

/// Applies `span` to requests carrying header `name` whose value contains a
/// match for `pattern`. An absent header never matches.
#[derive(Debug, Clone)]
pub struct HeaderRule {
    name: HeaderName,
    pattern: Regex,
    span: DurationSpan,
}

impl HeaderRule {
    pub fn new(name: &str, pattern: &str, duration: &str) -> Result<Self, ConfigError> {
        let name = HeaderName::try_from(name).map_err(|_| ConfigError::InvalidHeaderName {
            index: 0,
            name: name.to_string(),
        })?;

        Ok(Self {
            name,
            pattern: compile(pattern)?,
            span: parse_duration(duration),
        })
    }

    pub fn matches<H: HeaderLookup + ?Sized>(&self, headers: &H) -> bool {
        headers
            .header_value(&self.name)
            .is_some_and(|value| self.pattern.is_match(&value))
    }

    pub fn name(&self) -> &HeaderName {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn span(&self) -> DurationSpan {
        self.span
    }
}

/// A rule as it comes out of the configuration, not yet compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSpec {
    Path {
        pattern: String,
        duration: String,
    },
    Header {
        name: String,
        pattern: String,
        duration: String,
    },
}

/// The rule that won for a request.
#[derive(Debug, Clone, Copy)]
pub enum MatchedRule<'a> {
    Path(&'a PathRule),
    Header(&'a HeaderRule),
}

impl MatchedRule<'_> {
    pub fn span(&self) -> DurationSpan {
        match self {
            MatchedRule::Path(rule) => rule.span(),
            MatchedRule::Header(rule) => rule.span(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MatchedRule::Path(_) => "path",
            MatchedRule::Header(_) => "header",
        }
    }

    pub fn pattern(&self) -> &str {
        match self {
            MatchedRule::Path(rule) => rule.pattern(),
            MatchedRule::Header(rule) => rule.pattern(),
        }
    }
}

/// Ordered expiry rules. Path rules are always tried before header rules,
/// whatever their relative order in the configuration; within each kind the
/// first match wins. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    path_rules: Vec<PathRule>,
    header_rules: Vec<HeaderRule>,
}

impl RuleSet {
    /// Compiles `specs` in order, stopping at the first invalid one.
    pub fn build<I>(specs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = RuleSpec>,
    {
        let mut rules = RuleSet::default();

        for (position, spec) in specs.into_iter().enumerate() {
            match spec {
                RuleSpec::Path { pattern, duration } => {
                    let rule = PathRule::new(&pattern, &duration).map_err(|e| e.at(position))?;
                    rules.path_rules.push(rule);
                }
                RuleSpec::Header { name, pattern, duration } => {
                    let rule = HeaderRule::new(&name, &pattern, &duration)
                        .map_err(|e| e.at(position))?;
                    rules.header_rules.push(rule);
                }
            }
        }

        Ok(rules)
    }

    pub fn find<H: HeaderLookup + ?Sized>(&self, path: &str, headers: &H) -> Option<MatchedRule<'_>> {
        if let Some(rule) = self.path_rules.iter().find(|r| r.matches(path)) {
            return Some(MatchedRule::Path(rule));
        }

        self.header_rules
            .iter()
            .find(|r| r.matches(headers))
            .map(MatchedRule::Header)
    }

    /// Span of the first applicable rule, or `None` when nothing matches.
    pub fn resolve<H: HeaderLookup + ?Sized>(&self, path: &str, headers: &H) -> Option<DurationSpan> {
        self.find(path, headers).map(|rule| rule.span())
    }

    pub fn path_rules(&self) -> &[PathRule] {
        &self.path_rules
    }

    pub fn header_rules(&self) -> &[HeaderRule] {
        &self.header_rules
    }

    pub fn len(&self) -> usize {
        self.path_rules.len() + self.header_rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn content_type(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::CONTENT_TYPE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_match_path() {
        let rule = PathRule::new(r".*\.jpg", "1y").unwrap();

        assert!(rule.matches("/image.jpg"));
        assert!(rule.matches("/photos/image.jpg?size=large"));
        assert!(!rule.matches("/config.json"));
        assert_eq!(rule.span(), parse_duration("1y"));
    }

    #[test]
    fn test_path_match_is_unanchored() {
        let rule = PathRule::new("static", "1h").unwrap();
        assert!(rule.matches("/assets/static/app.css"));

        let anchored = PathRule::new("^/static", "1h").unwrap();
        assert!(!anchored.matches("/assets/static/app.css"));
    }

    #[test]
    fn test_invalid_path_pattern() {
        let err = PathRule::new("(unclosed", "1d").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
    }

    #[test]
    fn test_malformed_duration_is_not_an_error() {
        let rule = PathRule::new(".*", "soon").unwrap();
        assert!(rule.span().is_zero());
    }

    #[test]
    fn test_match_header() {
        let rule = HeaderRule::new("Content-Type", ".+/.*json", "1y").unwrap();

        assert!(!rule.matches(&HeaderMap::new()), "unset header should not match");
        assert!(rule.matches(&content_type("application/json")));
        assert!(!rule.matches(&content_type("application/javascript")));
    }

    #[test]
    fn test_header_name_is_case_insensitive() {
        let rule = HeaderRule::new("CONTENT-TYPE", "json", "1d").unwrap();
        assert!(rule.matches(&content_type("application/json")));

        let mut map = HashMap::new();
        map.insert("content-type".to_string(), "text/json".to_string());
        assert!(rule.matches(&map));
    }

    #[test]
    fn test_map_lookup_with_case_variants_is_deterministic() {
        let rule = HeaderRule::new("Content-Type", "json", "1d").unwrap();

        for _ in 0..50 {
            let mut map = HashMap::new();
            map.insert("Content-Type".to_string(), "application/json".to_string());
            map.insert("content-type".to_string(), "text/plain".to_string());
            assert!(!rule.matches(&map));
        }

        for _ in 0..50 {
            let mut map = HashMap::new();
            map.insert("Content-Type".to_string(), "application/json".to_string());
            map.insert("CONTENT-TYPE".to_string(), "text/plain".to_string());
            assert!(!rule.matches(&map), "smallest key should win");
        }
    }

    #[test]
    fn test_header_uses_first_value() {
        let rule = HeaderRule::new("Accept", "^text/html", "1d").unwrap();
        let mut headers = HeaderMap::new();
        headers.append(http::header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.append(http::header::ACCEPT, HeaderValue::from_static("text/html"));

        assert!(!rule.matches(&headers));
    }

    #[test]
    fn test_invalid_header_name() {
        let err = HeaderRule::new("Bad Header", "x", "1d").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHeaderName { ref name, .. } if name == "Bad Header"));
    }

    #[test]
    fn test_build_reports_failing_position() {
        let specs = vec![
            RuleSpec::Path { pattern: r".*\.jpg".into(), duration: "1y".into() },
            RuleSpec::Header { name: "Content-Type".into(), pattern: "json".into(), duration: "1d".into() },
            RuleSpec::Path { pattern: "[".into(), duration: "1d".into() },
        ];

        let err = RuleSet::build(specs).unwrap_err();
        assert_eq!(err.index(), 2);
    }

    #[test]
    fn test_path_rules_drain_before_header_rules() {
        // The header rule is declared first but path rules still win.
        let rules = RuleSet::build(vec![
            RuleSpec::Header { name: "Content-Type".into(), pattern: "json".into(), duration: "1d".into() },
            RuleSpec::Path { pattern: "api".into(), duration: "1h".into() },
        ])
        .unwrap();

        let matched = rules.find("/api/data", &content_type("application/json")).unwrap();
        assert_eq!(matched.kind(), "path");
        assert_eq!(matched.span(), parse_duration("1h"));
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_empty_rule_set_never_matches() {
        let rules = RuleSet::default();
        assert!(rules.is_empty());
        assert_eq!(rules.resolve("/anything", &HeaderMap::new()), None);
    }
}
