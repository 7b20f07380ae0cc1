//! Text helpers used by the line tokenizer.
//!
//! All functions borrow from their input; nothing here allocates.

/// Whitespace as understood by the BDL grammar: the ASCII set, including the
/// vertical tab that [`char::is_ascii_whitespace`] leaves out.
fn is_space(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0b'
}

/// Trim leading and trailing whitespace.
pub fn trim_whitespace(s: &str) -> &str {
    s.trim_matches(is_space)
}

/// Split a line into tokens on single ASCII spaces.
///
/// Runs of spaces collapse (empty tokens are dropped).  Tabs are *not*
/// delimiters: `a\tb` is one token.
pub fn split_tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(' ').filter(|tok| !tok.is_empty())
}

/// Strip exactly one leading and one trailing character.
///
/// Used to unquote `.config` values.  The characters are removed whether or
/// not they are quotes.  Returns `None` when `s` has fewer than two chars.
pub fn strip_quotes(s: &str) -> Option<&str> {
    let mut chars = s.chars();
    chars.next()?;
    chars.next_back()?;
    Some(chars.as_str())
}

/// `true` if `token` opens a comment.
pub fn is_comment(token: &str) -> bool {
    token.starts_with(';')
}

/// If `token` is a section declaration (`name:`), return the name.
pub fn section_decl(token: &str) -> Option<&str> {
    token.strip_suffix(':')
}

// ── Tests ─────────────────────────────────────────────────────────────────────
