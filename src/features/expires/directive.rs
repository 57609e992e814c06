//! Tokenized `expires` block lines.
//!
//! ```text
//! match <regex> <duration>
//! match_header <header-name> <regex> <duration>
//! ```

use serde::Deserialize;

use crate::{
    constants::directive::{MATCH, MATCH_ARGS, MATCH_HEADER, MATCH_HEADER_ARGS},
    errors::ConfigError,
    features::expires::rules::{RuleSet, RuleSpec},
};

/// One line of the `expires` block: either a whitespace-separated string or
/// an explicit token list.
///
/// `Line` is split on whitespace only; quotes are not interpreted, so
/// `match "/my files/.*" 1d` yields four tokens and fails the argument count.
/// A pattern containing spaces must use the list form:
///
/// ```yaml
/// expires:
///   - [match, '/my files/.*', 1d]
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Directive {
    Line(String),
    Tokens(Vec<String>),
}

impl Directive {
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            Directive::Line(line) => line.split_whitespace().collect(),
            Directive::Tokens(tokens) => tokens.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for Directive {
    fn from(line: &str) -> Self {
        Directive::Line(line.to_string())
    }
}

fn check_args(index: usize, keyword: &str, args: &[&str], expected: usize) -> Result<(), ConfigError> {
    if args.len() != expected {
        return Err(ConfigError::ArgumentCount {
            index,
            keyword: keyword.to_string(),
            expected,
            found: args.len(),
        });
    }
    Ok(())
}

/// Turns the tokens of directive number `index` into a rule spec.
pub fn parse_directive(index: usize, tokens: &[&str]) -> Result<RuleSpec, ConfigError> {
    let Some((&keyword, args)) = tokens.split_first() else {
        return Err(ConfigError::EmptyDirective { index });
    };

    match keyword {
        MATCH => {
            check_args(index, keyword, args, MATCH_ARGS)?;
            Ok(RuleSpec::Path {
                pattern: args[0].to_string(),
                duration: args[1].to_string(),
            })
        }
        MATCH_HEADER => {
            check_args(index, keyword, args, MATCH_HEADER_ARGS)?;
            Ok(RuleSpec::Header {
                name: args[0].to_string(),
                pattern: args[1].to_string(),
                duration: args[2].to_string(),
            })
        }
        other => Err(ConfigError::UnknownDirective {
            index,
            keyword: other.to_string(),
        }),
    }
}

pub fn parse_directives(directives: &[Directive]) -> Result<Vec<RuleSpec>, ConfigError> {
    directives
        .iter()
        .enumerate()
        .map(|(index, directive)| parse_directive(index, &directive.tokens()))
        .collect()
}

impl RuleSet {
    /// Validates and compiles a whole `expires` block.
    pub fn from_directives(directives: &[Directive]) -> Result<Self, ConfigError> {
        RuleSet::build(parse_directives(directives)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::parse_duration;

    fn block(lines: &[&str]) -> Vec<Directive> {
        lines.iter().map(|line| Directive::from(*line)).collect()
    }

    #[test]
    fn test_parse_block() {
        let directives = block(&[
            r"match .*\.jpg 1y",
            r"match .*\.png 1m",
            r"match .*\.bmp 1d",
            r"match .*\.css 1h",
            r"match .*\.js 1i",
            r"match .*\.txt 1s",
            "match_header Content-Type .*json 1d",
        ]);

        let rules = RuleSet::from_directives(&directives).unwrap();

        assert_eq!(rules.len(), 7);
        assert_eq!(rules.path_rules().len(), 6);
        assert_eq!(rules.header_rules().len(), 1);
        for rule in rules.path_rules() {
            assert!(!rule.span().is_zero(), "zero span for {}", rule.pattern());
        }
        assert_eq!(rules.header_rules()[0].span(), parse_duration("1d"));
    }

    #[test]
    fn test_token_list_keeps_spaces() {
        let directive = Directive::Tokens(vec![
            "match".into(),
            "/my files/.*".into(),
            "1d".into(),
        ]);

        let spec = parse_directive(0, &directive.tokens()).unwrap();
        assert_eq!(
            spec,
            RuleSpec::Path { pattern: "/my files/.*".into(), duration: "1d".into() }
        );
    }

    #[test]
    fn test_quoted_line_is_not_unquoted() {
        let err = RuleSet::from_directives(&block(&[r#"match "/my files/.*" 1d"#])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ArgumentCount { index: 0, expected: 2, found: 3, .. }
        ));
    }

    #[test]
    fn test_wrong_argument_count() {
        let err = RuleSet::from_directives(&block(&[r"match .*\.jpg 1y", r"match .*\.png"])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ArgumentCount { index: 1, expected: 2, found: 1, .. }
        ));

        let err = parse_directive(0, &["match_header", "Content-Type", "json"]).unwrap_err();
        assert!(matches!(err, ConfigError::ArgumentCount { expected: 3, found: 2, .. }));
    }

    #[test]
    fn test_unknown_directive() {
        let err = RuleSet::from_directives(&block(&["expire .* 1d"])).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDirective { index: 0, ref keyword } if keyword == "expire"));
    }

    #[test]
    fn test_empty_directive() {
        let err = RuleSet::from_directives(&block(&["match .* 1d", "   "])).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyDirective { index: 1 }));
    }

    #[test]
    fn test_invalid_regex_identifies_pattern() {
        let err = RuleSet::from_directives(&block(&["match .* 1d", "match_header Accept (json 1d"])).unwrap_err();
        assert_eq!(err.index(), 1);
        assert!(err.to_string().contains("(json"));
    }

    #[test]
    fn test_directives_deserialize_from_yaml() {
        let yaml = r#"
- 'match .*\.jpg 1y'
- [match_header, Content-Type, '.*json', 1d]
"#;
        let directives: Vec<Directive> = serde_yaml::from_str(yaml).unwrap();
        let rules = RuleSet::from_directives(&directives).unwrap();
        assert_eq!(rules.path_rules().len(), 1);
        assert_eq!(rules.header_rules()[0].name().as_str(), "content-type");
    }
}
