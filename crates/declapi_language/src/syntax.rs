//! Splitting declarations into a keyword and positional arguments.
//!
//! A declaration is `(keyword arg0 arg1 ...)`. Arguments are separated by
//! whitespace, except that a brace-delimited map literal such as
//! `{:id userId :page page}` is always a single argument.

/// A declaration split into its head and arguments.
///
/// Borrows from the declaration text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Form<'src> {
    /// The operation keyword, e.g. `Rest/get`. Empty for `()`.
    pub keyword: &'src str,
    /// Positional arguments in source order.
    pub args: Vec<&'src str>,
}

impl<'src> Form<'src> {
    /// Returns the argument at `position`, if present.
    #[must_use]
    pub fn arg(&self, position: usize) -> Option<&'src str> {
        self.args.get(position).copied()
    }
}

/// Splits a declaration into keyword and arguments.
///
/// The outer parentheses are optional; a missing closing `)` is tolerated.
/// Tokens past the grammar's last position (a trailing description such as
/// `(Add post of the user)`) are returned like any other argument.
#[must_use]
pub fn split(declaration: &str) -> Form<'_> {
    let mut tokens = tokenize(strip_parens(declaration)).into_iter();
    let keyword = tokens.next().unwrap_or("");
    Form {
        keyword,
        args: tokens.collect(),
    }
}

fn strip_parens(declaration: &str) -> &str {
    let inner = declaration.trim();
    let inner = inner.strip_prefix('(').unwrap_or(inner);
    inner.strip_suffix(')').unwrap_or(inner)
}

/// Splits on whitespace outside of braces.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        match c {
            '{' => {
                depth += 1;
                start.get_or_insert(i);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                start.get_or_insert(i);
            }
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    tokens.push(&text[s..i]);
                }
            }
            _ => {
                start.get_or_insert(i);
            }
        }
    }
    if let Some(s) = start {
        tokens.push(&text[s..]);
    }
    tokens
}
