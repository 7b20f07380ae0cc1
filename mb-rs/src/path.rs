//! Slash-delimited addressing: `sector/section[/field]`.
//!
//! Components are positional: 0 is the sector, 1 the section, 2 the field.
//! Anything past the third component is ignored.  A lookup that finds
//! nothing returns `None`; absence is an ordinary answer, not an error.

use crate::document::{Document, Field, Section, Sector};

/// Component `n` of `path`, or `None` if the path is shorter.
pub fn path_elem(path: &str, n: usize) -> Option<&str> {
    path.split('/').nth(n)
}

/// Join components into a path.
pub fn join<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts.into_iter().collect::<Vec<_>>().join("/")
}

impl Document {
    pub fn find_sector(&self, name: &str) -> Option<&Sector> {
        self.sectors().iter().find(|s| s.name() == name)
    }

    /// Look up `sector/section`.
    pub fn find_section(&self, path: &str) -> Option<&Section> {
        let sector = path_elem(path, 0)?;
        let section = path_elem(path, 1)?;
        self.find_sector(sector)?.section(section)
    }

    /// Look up `sector/section/field`.
    pub fn find_field(&self, path: &str) -> Option<&Field> {
        let field = path_elem(path, 2)?;
        self.find_section(path)?.field(field)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
