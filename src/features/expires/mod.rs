pub mod directive;
pub mod rules;

pub use directive::{parse_directive, parse_directives, Directive};
pub use rules::{HeaderLookup, HeaderRule, MatchedRule, PathRule, RuleSet, RuleSpec};
