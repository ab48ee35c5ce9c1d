//! Non-fatal findings collected while discovering

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    MissingComponent,
    MissingContainer,
    MissingPerson,
    MissingSoftwareSystem,
    UnresolvedType,
    RejectedByModel,
}

impl DiagnosticKind {
    fn label(&self) -> &'static str {
        match self {
            DiagnosticKind::MissingComponent => "component",
            DiagnosticKind::MissingContainer => "container",
            DiagnosticKind::MissingPerson => "person",
            DiagnosticKind::MissingSoftwareSystem => "software system",
            DiagnosticKind::UnresolvedType => "type",
            DiagnosticKind::RejectedByModel => "model change",
        }
    }
}

/// Something that could not be resolved; discovery carried on without it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// The name that could not be found.
    pub missing: String,
    /// The type or component being processed when the problem surfaced.
    pub context: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.kind == DiagnosticKind::RejectedByModel {
            write!(f, "could not apply change for {}: {}", self.context, self.missing)?;
        } else {
            write!(
                f,
                "{} '{}' referenced from {} could not be found",
                self.kind.label(),
                self.missing,
                self.context
            )?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Collector for [`Diagnostic`]s; every entry is also logged as a warning.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, kind: DiagnosticKind, missing: &str, context: &str) {
        self.push(Diagnostic {
            kind,
            missing: missing.to_string(),
            context: context.to_string(),
            suggestion: None,
        });
    }

    /// Report a missing name, suggesting the closest of `candidates`.
    pub fn report_with_candidates<'a>(
        &mut self,
        kind: DiagnosticKind,
        missing: &str,
        context: &str,
        candidates: impl IntoIterator<Item = &'a str>,
    ) {
        self.push(Diagnostic {
            kind,
            missing: missing.to_string(),
            context: context.to_string(),
            suggestion: closest_match(missing, candidates),
        });
    }

    /// Record a diagnostic; exact repeats are dropped.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if self.entries.contains(&diagnostic) {
            return;
        }
        tracing::warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

/// The best fuzzy match for `name` among `candidates`, if any scores at all.
pub fn closest_match<'a>(name: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let matcher = SkimMatcherV2::default();
    candidates
        .into_iter()
        .filter(|candidate| *candidate != name)
        .filter_map(|candidate| {
            matcher
                .fuzzy_match(candidate, name)
                .map(|score| (score, candidate))
        })
        .max_by_key(|(score, _)| *score)
        .map(|(_, candidate)| candidate.to_string())
}
