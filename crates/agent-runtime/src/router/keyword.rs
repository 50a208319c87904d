//! Deterministic keyword/tag router

use super::{Candidate, Planning, Route, Router, Segment, TurnPlan};
use agent_core::Result;
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

static THEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bthen\b").expect("step pattern is valid"));

/// `scheme://...` up to whitespace or `;`, never ending on punctuation
static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z][A-Za-z0-9+.-]*://[^\s;]*[^\s;:,.]").expect("url pattern is valid")
});

/// Routes by matching candidate keywords against the request
///
/// A candidate's keywords are its capability tags plus any keywords added
/// with [`KeywordRouter::with_keywords`]; matching is case-insensitive
/// substring search over the instruction part of a request, i.e. the text
/// before the first `:` that is not part of a URL. Whatever follows the
/// colon is payload and is never matched, so an article mentioning
/// "sentiment" cannot steer the route.
///
/// Planning splits a request into independent segments at `;` or line
/// breaks (until a payload starts) and each segment into chained steps at
/// the word "then".
#[derive(Debug, Clone, Default)]
pub struct KeywordRouter {
    keywords: HashMap<String, Vec<String>>,
}

impl KeywordRouter {
    /// Create a router that only uses capability tags
    pub fn new() -> Self {
        Self::default()
    }

    /// Add keywords for one candidate
    pub fn with_keywords<I, S>(mut self, candidate: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords
            .entry(candidate.into())
            .or_default()
            .extend(keywords.into_iter().map(|k| k.into().to_lowercase()));
        self
    }

    fn keywords_for<'a>(&'a self, candidate: &'a Candidate) -> impl Iterator<Item = String> + 'a {
        candidate
            .tags
            .iter()
            .map(|t| t.to_lowercase())
            .chain(self.keywords.get(&candidate.name).into_iter().flatten().cloned())
    }

    /// Candidates whose keywords occur in `text`, in candidate order
    fn matching(&self, text: &str, candidates: &[Candidate]) -> Vec<String> {
        let text = text.to_lowercase();
        candidates
            .iter()
            .filter(|c| self.keywords_for(c).any(|kw| !kw.is_empty() && text.contains(&kw)))
            .map(|c| c.name.clone())
            .collect()
    }
}

/// Byte offset of the first `:` outside any URL
fn payload_colon(text: &str) -> Option<usize> {
    let urls: Vec<_> = URL.find_iter(text).map(|m| m.range()).collect();
    text.match_indices(':')
        .map(|(i, _)| i)
        .find(|i| !urls.iter().any(|url| url.contains(i)))
}

/// Text before the payload colon
fn instruction_part(text: &str) -> &str {
    payload_colon(text).map_or(text, |i| &text[..i])
}

/// Split at `;` and line breaks until the payload colon
fn split_segments(request: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut rest = request;
    loop {
        let colon = payload_colon(rest);
        match rest.find([';', '\n']) {
            Some(i) if colon.is_none_or(|c| i < c) => {
                segments.push(rest[..i].trim());
                rest = &rest[i + 1..];
            }
            _ => {
                segments.push(rest.trim());
                break;
            }
        }
    }
    segments.retain(|s| !s.is_empty());
    segments
}

/// Split an instruction into chained step phrases at "then"
fn split_steps(instruction: &str) -> Vec<String> {
    let clean = |s: &str| -> String {
        s.trim_matches(|c: char| c.is_whitespace() || c == ',')
            .to_string()
    };

    THEN.split(instruction)
        .map(|step| {
            let step = clean(step);
            match step.strip_suffix(" and") {
                Some(head) => clean(head),
                None => step,
            }
        })
        .filter(|step| !step.is_empty())
        .collect()
}

#[async_trait]
impl Router for KeywordRouter {
    async fn route(&self, intent: &str, candidates: &[Candidate]) -> Result<Route> {
        let matches = self.matching(instruction_part(intent), candidates);
        debug!(?matches, "keyword route");
        Ok(match matches.len() {
            0 => Route::NoMatch,
            1 => Route::Selected(matches.into_iter().next().unwrap_or_default()),
            _ => Route::Ambiguous(matches),
        })
    }

    async fn plan(&self, request: &str, candidates: &[Candidate]) -> Result<Planning> {
        let mut plan = TurnPlan::default();

        for segment in split_segments(request) {
            let mut steps = Vec::new();
            for phrase in split_steps(instruction_part(segment)) {
                match self.route(&phrase, candidates).await? {
                    Route::Selected(name) => steps.push(name),
                    Route::Ambiguous(names) => return Ok(Planning::Clarify(names)),
                    Route::NoMatch => return Ok(Planning::Clarify(Vec::new())),
                }
            }
            if steps.is_empty() {
                return Ok(Planning::Clarify(Vec::new()));
            }
            plan.segments.push(Segment {
                input: segment.to_string(),
                steps,
                arguments: None,
            });
        }

        if plan.segments.is_empty() {
            return Ok(Planning::Clarify(Vec::new()));
        }
        Ok(Planning::Plan(plan))
    }
}
