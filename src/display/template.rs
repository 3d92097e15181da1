//! Literal `### TOKEN ###` substitution over persona records.
//!
//! No loops, conditionals or filters: only the fixed token set below is
//! replaced. Unknown tokens are left in the output untouched.

use super::escape::EscapePolicy;
use crate::api::models::{Field, Record};

const TOKEN_MARK: &str = "###";

/// Token → field resolver table.
pub const TOKENS: [(&str, Field); 10] = [
    ("### ID ###", Field::Id),
    ("### NAME ###", Field::Name),
    ("### SURNAME ###", Field::Surname),
    ("### STREET ###", Field::Street),
    ("### CITY ###", Field::City),
    ("### REGION ###", Field::Region),
    ("### COUNTRY ###", Field::Country),
    ("### YEARS ###", Field::Years),
    ("### APPEARANCES ###", Field::Appearances),
    ("### CATEGORY ###", Field::Category),
];

/// Card shown for a single persona when no custom template is given.
pub const PERSONA_CARD: &str = r####"<div class="persona" title="### ID ###">
<h2>### NAME ### ### SURNAME ###</h2>
<p>### STREET ###, ### CITY ###, ### REGION ###, ### COUNTRY ###</p>
<ul>
<li><b>Category</b>: ### CATEGORY ###</li>
<li><b>World championship years</b>: ### YEARS ###</li>
<li><b>Olympic appearances</b>: ### APPEARANCES ###</li>
</ul>
</div>"####;

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
    escape: EscapePolicy,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            escape: EscapePolicy::default(),
        }
    }

    pub fn with_escape(mut self, escape: EscapePolicy) -> Self {
        self.escape = escape;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Known tokens that occur in this template, in resolver-table order.
    pub fn tokens(&self) -> Vec<&'static str> {
        TOKENS
            .iter()
            .filter(|(token, _)| self.source.contains(token))
            .map(|(token, _)| *token)
            .collect()
    }

    pub fn substitute(&self, record: &Record) -> String {
        substitute_with(&self.source, record, self.escape)
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::new(PERSONA_CARD)
    }
}

/// Replace every known token in `template` with the record's field value.
pub fn substitute(template: &str, record: &Record) -> String {
    substitute_with(template, record, EscapePolicy::Raw)
}

/// Single left-to-right pass, so a field value that itself looks like a
/// token is never substituted a second time.
pub fn substitute_with(template: &str, record: &Record, escape: EscapePolicy) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(TOKEN_MARK) {
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos..];

        match TOKENS.iter().find(|(token, _)| candidate.starts_with(token)) {
            Some((token, field)) => {
                out.push_str(&escape.apply(&record.display(*field)));
                rest = &candidate[token.len()..];
            }
            None => {
                out.push('#');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
