//! Path template matching.
//!
//! # Responsibilities
//! - Compile `{name}` route templates into anchored matchers
//! - Extract named bindings from a concrete path
//!
//! # Design Decisions
//! - Placeholder names are `[A-Za-z0-9]+`; bindings match `[A-Za-z0-9_~-]+`
//! - Literal template text is escaped, never interpreted as regex
//! - A trailing slash is always optional
//! - Templates without placeholders never match (they only exist to extract)
//! - Malformed templates are rejected at compile time, not per request

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Characters a placeholder binding may contain.
const SEGMENT_CLASS: &str = "[A-Za-z0-9_~-]+";

/// Maximum template length in bytes.
const MAX_TEMPLATE_LENGTH: usize = 1024;

/// Maximum compiled regex size.
const MAX_REGEX_SIZE: usize = 1 << 20;

/// Placeholder name to bound path text, in template order.
pub type Bindings = Vec<(String, String)>;

/// Errors raised while compiling a route template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template {template:?} exceeds {max} bytes")]
    TooLong { template: String, max: usize },

    #[error("template {template:?} has an unbalanced brace")]
    UnbalancedBrace { template: String },

    #[error("template {template:?} has invalid placeholder {name:?} (letters and digits only)")]
    InvalidPlaceholder { template: String, name: String },

    #[error("template {template:?} declares placeholder {name:?} twice")]
    DuplicatePlaceholder { template: String, name: String },

    #[error("template {template:?} failed to compile: {reason}")]
    Regex { template: String, reason: String },
}

/// A compiled route template.
#[derive(Debug, Clone)]
pub struct PathPattern {
    template: String,
    /// `None` when the template has no placeholders.
    regex: Option<Regex>,
    names: Vec<String>,
}

impl PathPattern {
    /// Compile a route template such as `/users/{id}/posts/{post}`.
    pub fn compile(template: &str) -> Result<Self, TemplateError> {
        if template.len() > MAX_TEMPLATE_LENGTH {
            return Err(TemplateError::TooLong {
                template: template.to_string(),
                max: MAX_TEMPLATE_LENGTH,
            });
        }

        let mut source = String::from("^");
        let mut names: Vec<String> = Vec::new();
        let mut rest = template;

        while let Some(pos) = rest.find(['{', '}']) {
            let (literal, tail) = rest.split_at(pos);
            let close = match (tail.starts_with('{'), tail.find('}')) {
                (true, Some(close)) => close,
                _ => {
                    return Err(TemplateError::UnbalancedBrace {
                        template: template.to_string(),
                    })
                }
            };

            let name = &tail[1..close];
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(TemplateError::InvalidPlaceholder {
                    template: template.to_string(),
                    name: name.to_string(),
                });
            }
            if names.iter().any(|n| n == name) {
                return Err(TemplateError::DuplicatePlaceholder {
                    template: template.to_string(),
                    name: name.to_string(),
                });
            }

            source.push_str(&regex::escape(literal));
            source.push('(');
            source.push_str(SEGMENT_CLASS);
            source.push(')');
            names.push(name.to_string());
            rest = &tail[close + 1..];
        }

        if names.is_empty() {
            return Ok(Self {
                template: template.to_string(),
                regex: None,
                names,
            });
        }

        // The last slash, written or not, is optional.
        source.push_str(&regex::escape(rest.strip_suffix('/').unwrap_or(rest)));
        source.push_str("/?$");

        let regex = RegexBuilder::new(&source)
            .size_limit(MAX_REGEX_SIZE)
            .build()
            .map_err(|e| TemplateError::Regex {
                template: template.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            template: template.to_string(),
            regex: Some(regex),
            names,
        })
    }

    /// The template this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Placeholder names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether this pattern can ever produce bindings.
    pub fn participates(&self) -> bool {
        self.regex.is_some()
    }

    /// Bindings for `path` if it fully matches, otherwise `None`.
    pub fn matches(&self, path: &str) -> Option<Bindings> {
        let captures = self.regex.as_ref()?.captures(path)?;
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                captures
                    .get(i + 1)
                    .map(|m| (name.clone(), m.as_str().to_string()))
            })
            .collect()
    }
}

/// Try templates in order; the first match wins.
pub fn first_match(patterns: &[PathPattern], path: &str) -> Option<Bindings> {
    patterns.iter().find_map(|p| p.matches(path))
}
