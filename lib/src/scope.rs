//! Rewrites a user selection query into the scope argument of subset
//! validation.
//!
//! This is a textual rewrite, not a Cypher parser. It accepts queries with a
//! single `RETURN` clause projecting a single expression, optionally aliased:
//!
//! ```text
//! MATCH (n:Person) RETURN n AS person
//! MATCH (n:Person) WITH collect(n) AS col
//! ```
//!
//! Anything outside that shape is reported as an error rather than rewritten
//! into a malformed query.

use crate::error::{Error, Result};
use regex::{Match, Regex};
use std::fmt;
use std::ops::Range;
use std::sync::OnceLock;

/// Name the collected scope is bound to.
pub const SCOPE_BINDING: &str = "col";

fn return_keyword() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bRETURN\b").expect("static pattern"))
}

fn trailing_alias() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)^(?P<expr>.*?)\s+AS\s+(?:`[^`]+`|\w+)$").expect("static pattern")
    })
}

fn result_modifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(?:ORDER\s+BY|SKIP|LIMIT)\b").expect("static pattern"))
}

/// A selection query split around its projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeQuery {
    /// Everything before `RETURN`, whitespace included.
    pub head: String,
    /// The projected expression with its alias removed.
    pub expression: String,
}

impl fmt::Display for ScopeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}WITH collect({}) AS {}",
            self.head, self.expression, SCOPE_BINDING
        )
    }
}

pub fn rewrite_scope_query(query: &str) -> Result<ScopeQuery> {
    let matches = keyword_matches(return_keyword(), query);
    let keyword = match matches.as_slice() {
        [] => return Err(Error::MissingReturnClause),
        [only] => only,
        many => return Err(Error::MultipleReturnClauses(many.len())),
    };

    let head = &query[..keyword.start()];
    let tail = query[keyword.end()..]
        .trim()
        .trim_end_matches(';')
        .trim_end();
    let expression = match trailing_alias().captures(tail) {
        Some(caps) => caps.name("expr").map_or("", |m| m.as_str()).trim(),
        None => tail,
    };

    if expression.is_empty() {
        return Err(Error::UnsupportedProjection(
            "the RETURN clause projects nothing".to_string(),
        ));
    }
    if has_top_level_comma(expression) {
        return Err(Error::UnsupportedProjection(format!(
            "more than one projected expression in `{}`",
            expression
        )));
    }
    if !keyword_matches(result_modifier(), expression).is_empty() {
        return Err(Error::UnsupportedProjection(format!(
            "result modifiers cannot be collected in `{}`",
            expression
        )));
    }

    Ok(ScopeQuery {
        head: head.to_string(),
        expression: expression.to_string(),
    })
}

/// Byte ranges of string literals and backticked names, delimiters included.
/// An unterminated quote runs to the end of the text.
fn quoted_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut open: Option<(char, usize)> = None;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        match open {
            Some((q, start)) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' && q != '`' {
                    escaped = true;
                } else if c == q {
                    ranges.push(start..i + c.len_utf8());
                    open = None;
                }
            }
            None if matches!(c, '\'' | '"' | '`') => open = Some((c, i)),
            None => {}
        }
    }
    if let Some((_, start)) = open {
        ranges.push(start..text.len());
    }
    ranges
}

/// Matches of `keyword` that are neither quoted nor a property name after `.`.
fn keyword_matches<'t>(keyword: &Regex, text: &'t str) -> Vec<Match<'t>> {
    let quoted = quoted_ranges(text);
    keyword
        .find_iter(text)
        .filter(|m| !quoted.iter().any(|r| r.contains(&m.start())))
        .filter(|m| !text[..m.start()].trim_end().ends_with('.'))
        .collect()
}

/// True when `expression` contains a comma outside brackets and quotes.
fn has_top_level_comma(expression: &str) -> bool {
    let quoted = quoted_ranges(expression);
    let mut depth = 0usize;
    for (i, c) in expression.char_indices() {
        if quoted.iter().any(|r| r.contains(&i)) {
            continue;
        }
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return true,
            _ => {}
        }
    }
    false
}

const RESULT_COLUMNS: &str = "nodeType AS node_type, \
     n10s.rdf.getIRILocalName(propertyShape) AS property_shape, \
     offendingValue AS offending_value, \
     resultPath AS result_path, \
     n10s.rdf.getIRILocalName(severity) AS severity, \
     resultMessage AS result_message, \
     customMsg AS custom_message";

/// How validation rows are turned into records.
///
/// When the store carries a graph configuration node, `focusNode` already
/// refers to the node. Otherwise it is an internal id that has to be matched
/// back to the node.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResultProjection {
    Direct,
    ResolveInternalId,
}

impl ResultProjection {
    pub fn for_graph_config(present: bool) -> Self {
        if present {
            ResultProjection::Direct
        } else {
            ResultProjection::ResolveInternalId
        }
    }

    /// `YIELD` and `RETURN` clauses appended to a validation procedure call.
    pub fn cypher(&self) -> String {
        let yield_clause = "YIELD focusNode, nodeType, propertyShape, offendingValue, \
                            resultPath, severity, resultMessage, customMsg";
        match self {
            ResultProjection::Direct => format!(
                "{}\nRETURN focusNode AS focus_node, {}",
                yield_clause, RESULT_COLUMNS
            ),
            ResultProjection::ResolveInternalId => format!(
                "{}\nMATCH (focus) WHERE id(focus) = focusNode\nRETURN focus AS focus_node, {}",
                yield_clause, RESULT_COLUMNS
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_the_alias_and_collects_into_col() {
        let scope = rewrite_scope_query("MATCH (n:Person) RETURN n AS person").unwrap();
        assert_eq!(scope.head, "MATCH (n:Person) ");
        assert_eq!(scope.expression, "n");
        assert_eq!(
            scope.to_string(),
            "MATCH (n:Person) WITH collect(n) AS col"
        );
    }

    #[test]
    fn keyword_and_alias_are_case_insensitive() {
        let scope = rewrite_scope_query("match (n) where n.age > 3 return n as `the node`;").unwrap();
        assert_eq!(scope.head, "match (n) where n.age > 3 ");
        assert_eq!(scope.expression, "n");
    }

    #[test]
    fn unaliased_projection_is_kept_whole() {
        let scope = rewrite_scope_query("MATCH (a)-[:KNOWS]->(b)\nRETURN DISTINCT b\n").unwrap();
        assert_eq!(scope.expression, "DISTINCT b");
        assert_eq!(
            scope.to_string(),
            "MATCH (a)-[:KNOWS]->(b)\nWITH collect(DISTINCT b) AS col"
        );
    }

    #[test]
    fn commas_inside_calls_are_not_projections() {
        let scope = rewrite_scope_query("MATCH (n) RETURN coalesce(n, n) AS x").unwrap();
        assert_eq!(scope.expression, "coalesce(n, n)");
    }

    #[test]
    fn returned_identifiers_do_not_count_as_keywords() {
        let scope = rewrite_scope_query("MATCH (returned:Item) RETURN returned").unwrap();
        assert_eq!(scope.head, "MATCH (returned:Item) ");
        assert_eq!(scope.expression, "returned");
    }

    #[test]
    fn quoted_keywords_are_not_clauses() {
        let scope =
            rewrite_scope_query("MATCH (n:Order) WHERE n.note = 'please return' RETURN n AS o")
                .unwrap();
        assert_eq!(scope.head, "MATCH (n:Order) WHERE n.note = 'please return' ");
        assert_eq!(scope.expression, "n");

        let scope = rewrite_scope_query(
            "MATCH (n) WHERE n.`return` = \"it's, RETURN\" RETURN n",
        )
        .unwrap();
        assert_eq!(scope.expression, "n");
    }

    #[test]
    fn property_names_are_not_modifiers() {
        let scope = rewrite_scope_query("MATCH (n:Item) RETURN n.skip AS s").unwrap();
        assert_eq!(scope.expression, "n.skip");
        let scope = rewrite_scope_query("MATCH (n:Item) RETURN n.limit").unwrap();
        assert_eq!(scope.to_string(), "MATCH (n:Item) WITH collect(n.limit) AS col");
        let scope = rewrite_scope_query("MATCH (n) RETURN coalesce(n.name, 'a, b')").unwrap();
        assert_eq!(scope.expression, "coalesce(n.name, 'a, b')");
    }

    #[test]
    fn rejects_queries_outside_the_supported_shape() {
        assert!(matches!(
            rewrite_scope_query("MATCH (n:Person)"),
            Err(Error::MissingReturnClause)
        ));
        assert!(matches!(
            rewrite_scope_query("MATCH (n) RETURN n UNION MATCH (m) RETURN m"),
            Err(Error::MultipleReturnClauses(2))
        ));
        assert!(matches!(
            rewrite_scope_query("MATCH (n) RETURN n, m"),
            Err(Error::UnsupportedProjection(_))
        ));
        assert!(matches!(
            rewrite_scope_query("MATCH (n) RETURN ;"),
            Err(Error::UnsupportedProjection(_))
        ));
        assert!(matches!(
            rewrite_scope_query("MATCH (n) RETURN n LIMIT 10"),
            Err(Error::UnsupportedProjection(_))
        ));
        assert!(matches!(
            rewrite_scope_query("MATCH (n) RETURN n, 'return'"),
            Err(Error::UnsupportedProjection(_))
        ));
    }

    #[test]
    fn projection_depends_only_on_the_config_flag() {
        assert_eq!(
            ResultProjection::for_graph_config(true),
            ResultProjection::Direct
        );
        assert_eq!(
            ResultProjection::for_graph_config(false),
            ResultProjection::ResolveInternalId
        );
        assert!(ResultProjection::ResolveInternalId
            .cypher()
            .contains("MATCH (focus) WHERE id(focus) = focusNode"));
        assert!(!ResultProjection::Direct.cypher().contains("MATCH"));
    }
}
