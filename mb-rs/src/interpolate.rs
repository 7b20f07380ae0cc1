//! Field interpolation.
//!
//! Values may reference other `.config` fields:
//!
//! | Token | Looks up |
//! |-------|----------|
//! | `$(name)` | `<context>/name`, i.e. a field of the calling section |
//! | `$(section/name)` | `.config/section/name` |
//! | `$(.config/section/name)` | as written |
//!
//! A token ends at the first `)`, and a `$(` with no closing paren is plain
//! text.  A token that finds no field is left in the output verbatim, and
//! scanning resumes just inside it, so in `$(basename $(root))` the inner
//! `$(root)` is still substituted.  A referenced value is itself resolved
//! before being spliced in, against the *caller's* context rather than the
//! section the value lives in.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use crate::document::{Document, CONFIG_SECTOR};
use crate::error::ResolveError;
use crate::log::{LogSink, Severity, TracingSink};
use crate::path::join;

/// Deepest reference chain followed before giving up.
pub const MAX_DEPTH: usize = 256;

fn reference_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\(([^)]*)\)").expect("reference pattern is valid"))
}

/// Build the absolute lookup path for the inner text of a `$(…)` token.
pub fn reference_path(inner: &str, context: &str) -> String {
    if inner.contains('/') {
        let prefix = format!("{CONFIG_SECTOR}/");
        if inner.starts_with(&prefix) {
            inner.to_owned()
        } else {
            prefix + inner
        }
    } else {
        format!("{}/{inner}", context.trim_end_matches('/'))
    }
}

/// One substitution: replace `span` of the input with `replacement`.
#[derive(Debug)]
struct Edit {
    span: Range<usize>,
    replacement: String,
}

/// Copy `input`, splicing in each edit.  Edits must be sorted and disjoint.
fn splice(input: &str, edits: &[Edit]) -> String {
    let extra: usize = edits.iter().map(|e| e.replacement.len()).sum();
    let mut out = String::with_capacity(input.len() + extra);
    let mut cursor = 0;
    for edit in edits {
        out.push_str(&input[cursor..edit.span.start]);
        out.push_str(&edit.replacement);
        cursor = edit.span.end;
    }
    out.push_str(&input[cursor..]);
    out
}

// ── Interpolator ──────────────────────────────────────────────────────────────

/// Resolves `$(…)` references against a [`Document`].
///
/// Tracks the paths currently being expanded so that a reference chain
/// leading back to itself fails with [`ResolveError::CyclicReference`]
/// instead of recursing forever.  Chains nested deeper than [`MAX_DEPTH`]
/// fail with [`ResolveError::TooDeep`].
///
/// References that find no field are reported to the sink at
/// [`Severity::Debug`].
#[derive(Debug)]
pub struct Interpolator<'d, S = TracingSink> {
    doc: &'d Document,
    sink: S,
    in_progress: Vec<String>,
}

impl<'d> Interpolator<'d, TracingSink> {
    pub fn new(doc: &'d Document) -> Self {
        Self::with_sink(doc, TracingSink)
    }
}

impl<'d, S: LogSink> Interpolator<'d, S> {
    pub fn with_sink(doc: &'d Document, sink: S) -> Self {
        Self { doc, sink, in_progress: Vec::new() }
    }

    /// Resolve every reference in `input`, with `context` (`sector/section`)
    /// as the root for local references.
    pub fn resolve(&mut self, input: &str, context: &str) -> Result<String, ResolveError> {
        let doc = self.doc;
        let mut edits = Vec::new();
        let mut pos = 0;

        while let Some(caps) = reference_re().captures_at(input, pos) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else { break };
            let path = reference_path(inner.as_str(), context);

            let Some(field) = doc.find_field(&path) else {
                self.sink.emit(Severity::Debug, &format!("unresolved reference {path}"));
                // Skip only the `$(`; an inner token may still resolve.
                pos = whole.start() + 2;
                continue;
            };
            let value = self.enter(path, |this| this.resolve(&field.value, context))?;
            edits.push(Edit { span: whole.range(), replacement: value });
            pos = whole.end();
        }

        if edits.is_empty() {
            return Ok(input.to_owned());
        }
        Ok(splice(input, &edits))
    }

    /// Resolve the value of the field at `sector/section/field`, using the
    /// field's own section as context.  `None` if there is no such field.
    pub fn resolve_field(&mut self, path: &str) -> Result<Option<String>, ResolveError> {
        let doc = self.doc;
        let Some(field) = doc.find_field(path) else { return Ok(None) };
        let context = section_of(path);
        let key = format!("{context}/{}", field.name);
        self.enter(key, |this| this.resolve(&field.value, &context)).map(Some)
    }

    /// Resolve the accumulated text of the section at `sector/section`.
    ///
    /// This is the text a build executor runs; `context` names the `.config`
    /// section its local references resolve against.
    pub fn resolve_section_text(
        &mut self,
        path: &str,
        context: &str,
    ) -> Result<Option<String>, ResolveError> {
        let doc = self.doc;
        let Some(section) = doc.find_section(path) else { return Ok(None) };
        self.resolve(section.lines(), context).map(Some)
    }

    /// Run `f` with `path` marked as in progress.
    fn enter<T>(
        &mut self,
        path: String,
        f: impl FnOnce(&mut Self) -> Result<T, ResolveError>,
    ) -> Result<T, ResolveError> {
        if self.in_progress.contains(&path) {
            return Err(ResolveError::CyclicReference { path });
        }
        if self.in_progress.len() >= MAX_DEPTH {
            return Err(ResolveError::TooDeep { path, limit: MAX_DEPTH });
        }
        self.in_progress.push(path);
        let result = f(self);
        self.in_progress.pop();
        result
    }
}

/// `sector/section` prefix of a field path.
fn section_of(path: &str) -> String {
    join(path.split('/').take(2))
}

/// Resolve `input` against `doc` with a fresh [`Interpolator`].
pub fn resolve_fields(doc: &Document, input: &str, context: &str) -> Result<String, ResolveError> {
    Interpolator::new(doc).resolve(input, context)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
