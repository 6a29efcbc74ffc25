//! Grammar validators, one per syntax category.
//!
//! Each validator takes a candidate argument (absent when the declaration
//! has fewer arguments than the grammar) and the fact context. On success a
//! validator may record mappings in the context; on failure it returns a
//! [`SyntaxError`] whose message is reported verbatim.

use std::sync::LazyLock;

use declapi_foundation::Mapping;
use regex::Regex;
use thiserror::Error;

use crate::facts::FactContext;
use crate::grammar::{ArgSpec, Category};

// Word characters are ASCII only: `:ñame` is not a placeholder.

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":((?-u:\w)+)").expect("placeholder pattern is valid"));

/// `{}` or `{:key value ...}` with whitespace between pairs.
static MAP_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{\s*(?::(?-u:\w)+\s+(?-u:\w)+(?:\s+:(?-u:\w)+\s+(?-u:\w)+)*)?\s*\}$")
        .expect("map literal pattern is valid")
});

static MAP_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r":((?-u:\w)+)\s+((?-u:\w)+)").expect("map pair pattern is valid")
});

/// A validator failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// The argument is not a URL template.
    #[error("The syntax should be a url")]
    NotUrl,
    /// The argument is missing.
    #[error("The syntax should be type/string")]
    NotString,
    /// The argument is not a map literal.
    #[error("The syntax should be a map in clojure way.")]
    NotMap,
    /// The argument is not `selfMappings`.
    #[error("The syntax should be the keyword: selfMappings")]
    NotSelfMappings,
    /// The argument is not `asBody`.
    #[error("The syntax should be the keyword: asBody")]
    NotAsBody,
    /// A URL placeholder has no mapping.
    #[error("The keyword '{0}' is not mapping")]
    Unmapped(String),
    /// A placeholder maps to a field the request does not have.
    #[error("The mapping '{0}' should be exists in the request data.")]
    UnknownTarget(String),
    /// None of the alternatives of a choice matched.
    #[error("The syntax should be one of {}", join_names(.0))]
    NoneOf(&'static [Category]),
}

fn join_names(categories: &[Category]) -> String {
    categories
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(",")
}

/// Validates a candidate against an argument spec.
///
/// For a choice, alternatives are tried in order and the first success
/// wins, keeping whatever facts it recorded.
///
/// # Errors
///
/// Returns the failing category's error, or [`SyntaxError::NoneOf`] when no
/// alternative of a choice matches.
pub fn validate(
    spec: ArgSpec,
    candidate: Option<&str>,
    facts: &mut FactContext,
) -> Result<(), SyntaxError> {
    match spec {
        ArgSpec::One(category) => validate_category(category, candidate, facts),
        ArgSpec::OneOf(categories) => {
            if categories
                .iter()
                .any(|&c| validate_category(c, candidate, facts).is_ok())
            {
                Ok(())
            } else {
                Err(SyntaxError::NoneOf(categories))
            }
        }
    }
}

/// Validates a candidate against a single category.
///
/// # Errors
///
/// Returns the category's [`SyntaxError`] when the candidate does not match.
pub fn validate_category(
    category: Category,
    candidate: Option<&str>,
    facts: &mut FactContext,
) -> Result<(), SyntaxError> {
    match category {
        Category::Url => validate_url(candidate, facts),
        Category::String => candidate.map(|_| ()).ok_or(SyntaxError::NotString),
        Category::Map => {
            let mapping = candidate
                .and_then(parse_map_literal)
                .ok_or(SyntaxError::NotMap)?;
            facts.url_mappings = Some(mapping.clone());
            facts.body_mappings = Some(mapping);
            Ok(())
        }
        Category::SelfMappings => {
            expect_token(candidate, "selfMappings", SyntaxError::NotSelfMappings)?;
            facts.url_mappings = Some(facts.identity());
            Ok(())
        }
        Category::AsBody => {
            expect_token(candidate, "asBody", SyntaxError::NotAsBody)?;
            facts.body_mappings = Some(facts.identity());
            Ok(())
        }
    }
}

fn expect_token(candidate: Option<&str>, token: &str, err: SyntaxError) -> Result<(), SyntaxError> {
    if candidate == Some(token) {
        Ok(())
    } else {
        Err(err)
    }
}

fn validate_url(candidate: Option<&str>, facts: &FactContext) -> Result<(), SyntaxError> {
    let url = candidate.filter(|c| is_url(c)).ok_or(SyntaxError::NotUrl)?;

    for name in placeholders(url) {
        let target = facts
            .url_mappings
            .as_ref()
            .and_then(|m| m.get(name))
            .ok_or_else(|| SyntaxError::Unmapped(name.to_string()))?;
        if !facts.knows_field(target) {
            return Err(SyntaxError::UnknownTarget(target.to_string()));
        }
    }
    Ok(())
}

/// Returns true if `candidate` is a URL template.
///
/// It must start with `/`, and every `&`-separated query segment after the
/// first `?` must be a `:placeholder`.
#[must_use]
pub fn is_url(candidate: &str) -> bool {
    if !candidate.starts_with('/') {
        return false;
    }
    match candidate.split('?').nth(1) {
        None => true,
        Some(query) => query.split('&').all(|segment| segment.starts_with(':')),
    }
}

/// Collects the `:name` placeholders of a URL, first occurrence first,
/// without duplicates.
#[must_use]
pub fn placeholders(url: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(url) {
        if let Some(name) = caps.get(1).map(|m| m.as_str()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Parses a map literal such as `{:id userId :page page}`.
///
/// Returns `None` unless the whole candidate is a well-formed literal.
#[must_use]
pub fn parse_map_literal(candidate: &str) -> Option<Mapping> {
    if !MAP_LITERAL.is_match(candidate) {
        return None;
    }
    Some(
        MAP_PAIR
            .captures_iter(candidate)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
            .collect(),
    )
}
