//! SQL template binding.
//!
//! Templates carry named placeholders written as `:sql_name`. Binding rewrites
//! every placeholder to a native `$N` statement parameter and collects the
//! referenced argument values in marker order, so the driver receives values
//! through its parameter-binding path and never through string interpolation.
//!
//! The rewriter is a small tokenizer rather than a blind find-and-replace:
//! text inside single-quoted literals and double-quoted identifiers is copied
//! verbatim, `::` cast syntax is not a placeholder, and a repeated placeholder
//! reuses its first marker. Literal `%` characters have no meaning to the
//! protocol and pass through byte-for-byte.

use std::fmt::Write as _;

use indexmap::IndexMap;

use crate::error::{AppResult, unbound_placeholder_error};

/// Driver-ready SQL plus the values for its `$N` markers, in marker order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundSql {
    pub sql:    String,
    pub params: Vec<String>
}

/// Rewrite `:name` placeholders in `template` to `$N` markers.
///
/// Placeholder names are the SQL-side names: each resolved argument's logical
/// name is translated through `param_aliases`, falling back to the logical
/// name itself when no alias is declared. A placeholder that matches no
/// argument is an error; arguments that appear nowhere in the template are
/// ignored.
pub fn bind(
    template: &str,
    param_aliases: &IndexMap<String, String>,
    arguments: &IndexMap<String, String>
) -> AppResult<BoundSql> {
    let mut values: IndexMap<&str, &str> = IndexMap::new();
    for (logical, value) in arguments {
        let sql_name = param_aliases.get(logical).unwrap_or(logical);
        values.insert(sql_name.as_str(), value.as_str());
    }

    let mut sql = String::with_capacity(template.len());
    let mut params: Vec<String> = Vec::new();
    let mut markers: IndexMap<&str, usize> = IndexMap::new();
    let mut chars = template.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        match c {
            '\'' | '"' => {
                sql.push(c);
                copy_quoted(&mut sql, &mut chars, c);
            }
            ':' => {
                if matches!(chars.peek(), Some(&(_, ':'))) {
                    // Cast syntax, not a placeholder
                    sql.push_str("::");
                    chars.next();
                    continue;
                }

                match take_identifier(template, &mut chars) {
                    Some(name) => {
                        let Some(value) = values.get(name) else {
                            return Err(unbound_placeholder_error(name));
                        };
                        let marker = *markers.entry(name).or_insert_with(|| {
                            params.push((*value).to_string());
                            params.len()
                        });
                        let _ = write!(sql, "${marker}");
                    }
                    None => sql.push(':')
                }
            }
            _ => sql.push(c)
        }
    }

    Ok(BoundSql {
        sql,
        params
    })
}

/// Copy a quoted run up to and including its closing quote, honoring the
/// doubled-quote escape
fn copy_quoted(
    sql: &mut String,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    quote: char
) {
    while let Some((_, c)) = chars.next() {
        sql.push(c);
        if c == quote {
            if let Some(&(_, next)) = chars.peek()
                && next == quote
            {
                sql.push(next);
                chars.next();
                continue;
            }
            return;
        }
    }
}

/// Consume an identifier after `:`, returning its slice, or None when the
/// next character cannot start one
fn take_identifier<'a>(
    template: &'a str,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'a>>
) -> Option<&'a str> {
    let &(start, first) = chars.peek()?;
    if !first.is_ascii_alphabetic() && first != '_' {
        return None;
    }

    let mut end = start;
    while let Some(&(i, c)) = chars.peek() {
        if c.is_ascii_alphanumeric() || c == '_' {
            end = i + c.len_utf8();
            chars.next();
        } else {
            break;
        }
    }

    Some(&template[start..end])
}
