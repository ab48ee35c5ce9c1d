//! Exclusion rules that keep types out of discovery

use crate::error::{DiscoveryError, Result};
use globset::{Glob, GlobMatcher};
use regex::Regex;

/// Core runtime types never become components, code elements or dependency targets.
pub const DEFAULT_EXCLUSION: &str = r"^System(\..*)?$";

/// A single pattern over fully qualified type names.
#[derive(Debug, Clone)]
pub enum ExclusionRule {
    Pattern(Regex),
    Glob { pattern: String, matcher: GlobMatcher },
}

impl ExclusionRule {
    pub fn regex(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(ExclusionRule::Pattern)
            .map_err(|source| DiscoveryError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    pub fn glob(pattern: &str) -> Result<Self> {
        let matcher = Glob::new(pattern)
            .map_err(|source| DiscoveryError::InvalidGlob {
                pattern: pattern.to_string(),
                source,
            })?
            .compile_matcher();
        Ok(ExclusionRule::Glob {
            pattern: pattern.to_string(),
            matcher,
        })
    }

    pub fn matches(&self, type_name: &str) -> bool {
        match self {
            ExclusionRule::Pattern(regex) => regex.is_match(type_name),
            ExclusionRule::Glob { matcher, .. } => matcher.is_match(type_name),
        }
    }

    pub fn pattern(&self) -> &str {
        match self {
            ExclusionRule::Pattern(regex) => regex.as_str(),
            ExclusionRule::Glob { pattern, .. } => pattern,
        }
    }
}

/// Ordered set of exclusion rules; a type matching any rule is excluded.
#[derive(Debug, Clone)]
pub struct ExclusionRules {
    rules: Vec<ExclusionRule>,
}

impl ExclusionRules {
    /// A rule set with no rules at all.
    pub fn empty() -> Self {
        ExclusionRules { rules: Vec::new() }
    }

    pub fn add(&mut self, rule: ExclusionRule) {
        tracing::debug!("Excluding types matching {}", rule.pattern());
        self.rules.push(rule);
    }

    pub fn is_excluded(&self, type_name: &str) -> bool {
        let name = crate::metadata::type_names::strip_qualifier(type_name);
        self.rules.iter().any(|rule| rule.matches(name))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExclusionRule> {
        self.rules.iter()
    }
}

impl Default for ExclusionRules {
    fn default() -> Self {
        ExclusionRules {
            rules: vec![ExclusionRule::Pattern(
                Regex::new(DEFAULT_EXCLUSION).expect("default exclusion pattern is valid"),
            )],
        }
    }
}
