//! Message templates with `{name}` placeholders.
//!
//! `{{` and `}}` render literal braces. Syntax is checked when the template is
//! parsed; which placeholder names are allowed depends on the feature and is
//! checked by [`MessageTemplate::check_placeholders`].

use serde::{Deserialize, Serialize};

use crate::error::{CelebrationsError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl MessageTemplate {
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = raw.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if chars.peek().is_some_and(|(_, n)| *n == '{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek().is_some_and(|(_, n)| *n == '}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(CelebrationsError::template(format!(
                            "unclosed '{{' at byte {pos} in \"{raw}\""
                        )));
                    }
                    let name = name.trim();
                    let valid = name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
                    if name.is_empty() || !valid {
                        return Err(CelebrationsError::template(format!(
                            "invalid placeholder '{{{name}}}' in \"{raw}\""
                        )));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(name.to_string()));
                }
                '}' => {
                    return Err(CelebrationsError::template(format!(
                        "unmatched '}}' at byte {pos} in \"{raw}\""
                    )));
                }
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { raw, segments })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.trim().is_empty()
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Fails on the first placeholder not listed in `allowed`.
    pub fn check_placeholders(&self, allowed: &[&str]) -> Result<()> {
        match self.placeholders().find(|p| !allowed.contains(p)) {
            Some(unknown) => Err(CelebrationsError::template(format!(
                "unknown placeholder '{{{unknown}}}' in \"{}\" (allowed: {})",
                self.raw,
                allowed.join(", ")
            ))),
            None => Ok(()),
        }
    }

    /// Substitute placeholders. Names without a value are rendered verbatim.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    match vars.iter().find(|(key, _)| *key == name.as_str()) {
                        Some((_, value)) => out.push_str(value),
                        None => {
                            out.push('{');
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                }
            }
        }
        out
    }
}

impl TryFrom<String> for MessageTemplate {
    type Error = CelebrationsError;

    fn try_from(raw: String) -> Result<Self> {
        Self::parse(raw)
    }
}

impl From<MessageTemplate> for String {
    fn from(template: MessageTemplate) -> Self {
        template.raw
    }
}
