//! The single place where cell and token values are escaped.
//!
//! `Raw` is the default: record fields are inserted verbatim and must be
//! trusted. `Html` escapes the output of every renderer.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscapePolicy {
    #[default]
    Raw,
    Html,
}

impl EscapePolicy {
    pub fn from_flag(escape_html: bool) -> Self {
        if escape_html {
            EscapePolicy::Html
        } else {
            EscapePolicy::Raw
        }
    }

    pub fn apply<'a>(&self, value: &'a str) -> Cow<'a, str> {
        match self {
            EscapePolicy::Raw => Cow::Borrowed(value),
            EscapePolicy::Html => html_escape(value),
        }
    }
}

/// Escape HTML special characters
fn html_escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 16);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_policy_is_identity() {
        let value = "<b>Juan</b> & co";
        assert_eq!(EscapePolicy::Raw.apply(value), value);
    }

    #[test]
    fn test_html_policy_escapes() {
        assert_eq!(
            EscapePolicy::Html.apply(r#"<script>alert("x")</script> & 'y'"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; &#39;y&#39;"
        );
        assert!(matches!(
            EscapePolicy::Html.apply("Pérez"),
            Cow::Borrowed("Pérez")
        ));
    }

    #[test]
    fn test_from_flag() {
        assert_eq!(EscapePolicy::from_flag(true), EscapePolicy::Html);
        assert_eq!(EscapePolicy::from_flag(false), EscapePolicy::Raw);
        assert_eq!(EscapePolicy::default(), EscapePolicy::Raw);
    }
}
