//! BDL parser.
//!
//! The grammar is line-oriented; each line is one of:
//!
//! | Line | Action |
//! |------|--------|
//! | `sector <name>` | open a sector (further tokens ignored) |
//! | `<name>:` | open a section in the current sector |
//! | `; …` | comment, ignored |
//! | `<name> <value…>` | content line of the current section |
//! | blank | ignored |
//!
//! Content lines in `.config` register a [`Field`](crate::document::Field)
//! whose value is the quoted text with its quotes stripped.  In any other
//! sector they are appended verbatim to the section's text.
//!
//! Parsing is fail-fast: the first bad line aborts with a [`ParseError`]
//! naming its 1-based line number.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use crate::document::Document;
use crate::error::{Error, ErrorKind, ParseError, Result};
use crate::log::{LogSink, Severity, TracingSink};
use crate::text;

// ── Parser ────────────────────────────────────────────────────────────────────

/// Incremental parser building a [`Document`].
///
/// Registration events are reported to the sink at [`Severity::Debug`].
#[derive(Debug)]
pub struct Parser<S = TracingSink> {
    doc: Document,
    sink: S,
}

impl Parser<TracingSink> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_sink(path, TracingSink)
    }
}

impl<S: LogSink> Parser<S> {
    pub fn with_sink(path: impl Into<PathBuf>, sink: S) -> Self {
        Self { doc: Document::new(path), sink }
    }

    /// The document built so far.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    /// Feed the next physical line, advancing the line counter.
    pub fn feed(&mut self, line: &str) -> Result<(), ParseError> {
        let lineno = self.doc.line() + 1;
        self.doc.set_line(lineno);
        self.parse_line(line).map_err(|kind| ParseError {
            line: lineno,
            kind,
            text: text::trim_whitespace(line).to_owned(),
        })
    }

    /// Classify one line and apply it to the document.
    ///
    /// Does not touch the line counter; use [`Parser::feed`] when parsing a
    /// whole source.
    pub fn parse_line(&mut self, line: &str) -> Result<(), ErrorKind> {
        let line = text::trim_whitespace(line);
        let mut tokens = text::split_tokens(line);
        let Some(first) = tokens.next() else { return Ok(()) };

        if first == "sector" {
            let name = tokens.next().ok_or(ErrorKind::MissingRequiredElement)?;
            self.doc.register_sector(name)?;
            self.sink.emit(Severity::Debug, &format!("registered sector {name}"));
            return Ok(());
        }

        if text::is_comment(first) {
            return Ok(());
        }

        if let Some(name) = text::section_decl(first) {
            let sector = self.doc.current_sector_mut().ok_or(ErrorKind::InvalidSyntax)?;
            sector.register_section(name)?;
            self.sink.emit(Severity::Debug, &format!("registered section {name}"));
            return Ok(());
        }

        // Content line.
        let sector = self.doc.current_sector_mut().ok_or(ErrorKind::InvalidSyntax)?;
        let is_config = sector.is_config();
        let section = sector.current_section_mut().ok_or(ErrorKind::InvalidSyntax)?;
        let content = tokens.collect::<Vec<_>>().join(" ");

        if is_config {
            // A field needs a value.
            if content.is_empty() {
                return Err(ErrorKind::InvalidSyntax);
            }
            let value = text::strip_quotes(&content).ok_or(ErrorKind::InvalidSyntax)?;
            section.register_field(first, value)?;
            self.sink.emit(Severity::Debug, &format!("registered field {first}"));
        } else {
            section.append_line(first, &content);
        }
        Ok(())
    }

    /// Parse a whole in-memory source, replacing anything parsed before.
    pub fn parse_str(&mut self, src: &str) -> Result<(), ParseError> {
        self.doc.reset();
        for line in src.lines() {
            self.feed(line)?;
        }
        self.finished();
        Ok(())
    }

    /// Parse the document's source path from disk.
    ///
    /// An unreadable source is reported as [`Error::Io`], distinct from any
    /// parse error.  Lines are read as bytes; invalid UTF-8 is replaced with
    /// U+FFFD and reported at [`Severity::Warning`].
    pub fn parse_file(&mut self) -> Result<()> {
        let path = self.doc.path().to_path_buf();
        let io_err = |source| Error::Io { path: path.clone(), source };

        let file = File::open(&path).map_err(io_err)?;
        self.sink.emit(Severity::Steps, &format!("parsing {}", path.display()));

        self.doc.reset();
        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).map_err(io_err)? == 0 {
                break;
            }
            let raw = buf.strip_suffix(b"\n").unwrap_or(buf.as_slice());
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let line = String::from_utf8_lossy(raw);
            if let Cow::Owned(_) = line {
                self.sink.emit(
                    Severity::Warning,
                    &format!("line {}: invalid UTF-8 replaced", self.doc.line() + 1),
                );
            }
            self.feed(&line)?;
        }
        self.finished();
        Ok(())
    }

    fn finished(&self) {
        self.sink.emit(
            Severity::Steps,
            &format!("parsed {} sectors from {} lines", self.doc.sectors().len(), self.doc.line()),
        );
    }
}

// ── Document shortcuts ────────────────────────────────────────────────────────

impl Document {
    /// Parse `src` with the default (`tracing`) sink.
    pub fn parse_str(src: &str) -> Result<Document, ParseError> {
        let mut parser = Parser::new("");
        parser.parse_str(src)?;
        Ok(parser.into_document())
    }

    /// Read and parse `path` with the default (`tracing`) sink.
    pub fn parse_file(path: impl Into<PathBuf>) -> Result<Document> {
        let mut parser = Parser::new(path);
        parser.parse_file()?;
        Ok(parser.into_document())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
