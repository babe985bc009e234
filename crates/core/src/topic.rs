// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Topics and topic patterns
//!
//! A topic is a `/`-separated hierarchical path such as
//! `org/example/widget/CREATED`. A pattern is either an exact topic or a
//! prefix ending in `/*`, which matches the prefix itself and every
//! descendant. A lone `*` matches every topic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const SEPARATOR: char = '/';
const WILDCARD: &str = "*";

/// Malformed topic or pattern, rejected at construction time
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopicError {
    #[error("topic must not be empty")]
    Empty,
    #[error("empty segment in {input:?}")]
    EmptySegment { input: String },
    #[error("wildcard not allowed in topic {input:?}")]
    Wildcard { input: String },
    #[error("wildcard must be the whole last segment of pattern {input:?}")]
    MisplacedWildcard { input: String },
}

fn split_segments(input: &str) -> Result<Vec<&str>, TopicError> {
    if input.is_empty() {
        return Err(TopicError::Empty);
    }
    let segments: Vec<&str> = input.split(SEPARATOR).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(TopicError::EmptySegment {
            input: input.to_string(),
        });
    }
    Ok(segments)
}

/// A validated, concrete event topic
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Topic(String);

impl Topic {
    pub fn new(topic: &str) -> Result<Self, TopicError> {
        let segments = split_segments(topic)?;
        if segments.iter().any(|s| s.contains('*')) {
            return Err(TopicError::Wildcard {
                input: topic.to_string(),
            });
        }
        Ok(Self(topic.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Topic {
    type Err = TopicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Topic {
    type Error = TopicError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        topic.0
    }
}

/// Pattern for matching topics
/// Supports:
///   - Exact: "org/example/widget/CREATED"
///   - Prefix: "org/example/*" matches "org/example" and everything below it
///   - Everything: "*"
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TopicPattern {
    raw: String,
    kind: PatternKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum PatternKind {
    Exact,
    /// Segments preceding the trailing `*`
    Prefix(Vec<String>),
}

impl TopicPattern {
    pub fn new(pattern: &str) -> Result<Self, TopicError> {
        if pattern == WILDCARD {
            return Ok(Self {
                raw: pattern.to_string(),
                kind: PatternKind::Prefix(Vec::new()),
            });
        }

        let segments = split_segments(pattern)?;
        let (last, head) = match segments.split_last() {
            Some(split) => split,
            None => return Err(TopicError::Empty),
        };

        if head.iter().any(|s| s.contains('*')) || (*last != WILDCARD && last.contains('*')) {
            return Err(TopicError::MisplacedWildcard {
                input: pattern.to_string(),
            });
        }

        let kind = if *last == WILDCARD {
            PatternKind::Prefix(head.iter().map(|s| s.to_string()).collect())
        } else {
            PatternKind::Exact
        };

        Ok(Self {
            raw: pattern.to_string(),
            kind,
        })
    }

    /// Check if this pattern matches a topic
    pub fn matches(&self, topic: &Topic) -> bool {
        match &self.kind {
            PatternKind::Exact => self.raw == topic.as_str(),
            PatternKind::Prefix(prefix) => {
                let mut segments = topic.segments();
                prefix
                    .iter()
                    .all(|p| segments.next().is_some_and(|s| s == p))
            }
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self.kind, PatternKind::Prefix(_))
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for TopicPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for TopicPattern {
    type Err = TopicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TopicPattern {
    type Error = TopicError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<TopicPattern> for String {
    fn from(pattern: TopicPattern) -> Self {
        pattern.raw
    }
}

/// Parse both arguments and match them
pub fn matches(pattern: &str, topic: &str) -> Result<bool, TopicError> {
    let pattern = TopicPattern::new(pattern)?;
    let topic = Topic::new(topic)?;
    Ok(pattern.matches(&topic))
}

/// Parse a list of pattern strings, failing on the first malformed one
pub fn parse_patterns<S: AsRef<str>>(
    patterns: impl IntoIterator<Item = S>,
) -> Result<Vec<TopicPattern>, TopicError> {
    patterns
        .into_iter()
        .map(|p| TopicPattern::new(p.as_ref()))
        .collect()
}

#[cfg(test)]
#[path = "topic_tests.rs"]
mod tests;
