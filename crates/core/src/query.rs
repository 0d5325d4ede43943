//! Search-bar input and its translation into [`SearchParameters`]

use crate::entities::EntityKind;
use crate::filter::{FilterCondition, PathFilter};
use crate::search_models::SearchParameters;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

/// Kind of a parsed search-bar clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseKind {
    /// `field:value` match
    Field,
    /// Free-text term
    Term,
    /// Anything else the parser may produce; ignored by translation
    #[serde(other)]
    Other,
}

/// One clause of a parsed query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    #[serde(rename = "type")]
    pub kind: ClauseKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default)]
    pub value: Value,
}

impl Clause {
    pub fn field(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            kind: ClauseKind::Field,
            field: Some(field.into()),
            value: value.into(),
        }
    }

    pub fn term(text: impl Into<String>) -> Self {
        Self {
            kind: ClauseKind::Term,
            field: None,
            value: Value::String(text.into()),
        }
    }

    /// Field name and value of a usable field clause
    fn as_field_match(&self) -> Option<(&str, &Value)> {
        if self.kind != ClauseKind::Field {
            return None;
        }
        let field = self.field.as_deref().filter(|f| !f.is_empty())?;
        match &self.value {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            value => Some((field, value)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryAst {
    #[serde(default)]
    pub clauses: Vec<Clause>,
}

/// A parsed query: clause tree plus the free text outside field clauses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ast: Option<QueryAst>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl StructuredQuery {
    pub fn clauses(&self) -> &[Clause] {
        self.ast
            .as_ref()
            .map(|ast| ast.clauses.as_slice())
            .unwrap_or_default()
    }

    /// Free text: explicit `text` when present, otherwise the term clauses
    fn free_text(&self) -> String {
        match &self.text {
            Some(text) => text.trim().to_string(),
            None => self
                .clauses()
                .iter()
                .filter(|c| c.kind == ClauseKind::Term)
                .filter_map(|c| c.value.as_str())
                .collect::<Vec<_>>()
                .join(" ")
                .trim()
                .to_string(),
        }
    }
}

/// Input accepted by the translator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryInput {
    /// The empty search bar; never triggers a backend call
    #[default]
    MatchAll,
    /// A bare string, taken entirely as free text
    Text(String),
    Structured(StructuredQuery),
}

impl QueryInput {
    /// Parse search-bar syntax: whitespace separated tokens, `field:value`
    /// tokens become field clauses, double quotes group words.
    pub fn parse(input: &str) -> Self {
        let tokens = tokenize(input);
        if tokens.is_empty() {
            return Self::MatchAll;
        }

        let mut clauses = Vec::with_capacity(tokens.len());
        let mut terms = Vec::new();
        for token in tokens {
            match token.field_split {
                Some(split) => {
                    let (field, value) = token.text.split_at(split);
                    clauses.push(Clause::field(field, &value[1..]));
                }
                None => {
                    terms.push(token.text.clone());
                    clauses.push(Clause::term(token.text));
                }
            }
        }

        let text = if terms.is_empty() {
            None
        } else {
            Some(terms.join(" "))
        };
        Self::Structured(StructuredQuery {
            ast: Some(QueryAst { clauses }),
            text,
        })
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, Self::MatchAll)
    }
}

/// Translate a search input into backend parameters for `kind`.
///
/// Field clauses become `eq` filters on `<kind>.<field>` in input order;
/// clauses with an empty field or value are dropped.
pub fn translate(input: &QueryInput, kind: EntityKind) -> SearchParameters {
    match input {
        QueryInput::MatchAll => SearchParameters::match_all(kind),
        QueryInput::Text(text) => {
            SearchParameters::new(kind, Some(text.trim().to_string()), Vec::new())
        }
        QueryInput::Structured(query) => {
            let filters: Vec<PathFilter> = query
                .clauses()
                .iter()
                .filter_map(|clause| {
                    let matched = clause.as_field_match();
                    if matched.is_none() && clause.kind == ClauseKind::Field {
                        trace!("Dropping malformed field clause: {clause:?}");
                    }
                    matched
                })
                .map(|(field, value)| {
                    PathFilter::new(
                        format!("{}.{field}", kind.path_prefix()),
                        FilterCondition::eq(value.clone()),
                    )
                })
                .collect();

            SearchParameters::new(kind, Some(query.free_text()), filters)
        }
    }
}

struct Token {
    text: String,
    /// Byte offset of the first unquoted `:` when it follows a non-empty field
    field_split: Option<usize>,
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut field_split = None;
    let mut in_quotes = false;
    let mut had_quotes = false;

    let mut flush = |current: &mut String, field_split: &mut Option<usize>, had_quotes: &mut bool| {
        if !current.is_empty() || *had_quotes {
            tokens.push(Token {
                text: std::mem::take(current),
                field_split: field_split.take(),
            });
        }
        *field_split = None;
        *had_quotes = false;
    };

    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                had_quotes = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                flush(&mut current, &mut field_split, &mut had_quotes);
            }
            ':' if !in_quotes && field_split.is_none() && !current.is_empty() && !had_quotes => {
                field_split = Some(current.len());
                current.push(c);
            }
            c => current.push(c),
        }
    }
    flush(&mut current, &mut field_split, &mut had_quotes);

    tokens.retain(|t| !t.text.is_empty());
    tokens
}
