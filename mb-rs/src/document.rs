//! The in-memory build description: `Document → Sector → Section → Field`.
//!
//! Every level is an insertion-ordered `Vec`; names are unique among
//! siblings and looked up by linear scan, which is plenty for hand-written
//! build files.  Registration never removes or reorders anything, so an index
//! obtained earlier stays valid, but callers should still address entities by
//! name (see [`crate::path`]) rather than hold references across mutations.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ErrorKind;

/// Name of the sector whose sections hold key/value [`Field`]s.
pub const CONFIG_SECTOR: &str = ".config";

/// Reject names that cannot be stored or addressed.
///
/// An empty name, or one containing the path separator `/`, could never be
/// found again by a path lookup.
fn check_name(name: &str) -> Result<(), ErrorKind> {
    if name.is_empty() || name.contains('/') {
        return Err(ErrorKind::InvalidIdentifier);
    }
    Ok(())
}

// ── Field ─────────────────────────────────────────────────────────────────────

/// A `.config` key/value pair.  `value` may still contain `$(…)` references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: String,
}

// ── Section ───────────────────────────────────────────────────────────────────

/// A named group inside a sector.
///
/// Sections of `.config` hold fields; sections of every other sector
/// accumulate their content lines as raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    fields: Vec<Field>,
    lines: String,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), fields: Vec::new(), lines: String::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Accumulated content lines, each terminated by `\n`.
    pub fn lines(&self) -> &str {
        &self.lines
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Add a field.  Fails with [`ErrorKind::DuplicateField`] if `name` is
    /// already present, leaving the section untouched.
    pub fn register_field(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&Field, ErrorKind> {
        let name = name.into();
        check_name(&name)?;
        if self.field(&name).is_some() {
            return Err(ErrorKind::DuplicateField);
        }
        self.fields.push(Field { name, value: value.into() });
        Ok(&self.fields[self.fields.len() - 1])
    }

    /// Append `<name> <content>\n` to the raw text.
    pub fn append_line(&mut self, name: &str, content: &str) {
        self.lines.reserve(name.len() + content.len() + 2);
        self.lines.push_str(name);
        self.lines.push(' ');
        self.lines.push_str(content);
        self.lines.push('\n');
    }
}

// ── Sector ────────────────────────────────────────────────────────────────────

/// A top-level named group of sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sector {
    name: String,
    sections: Vec<Section>,
}

impl Sector {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), sections: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `true` for the `.config` sector.
    pub fn is_config(&self) -> bool {
        self.name == CONFIG_SECTOR
    }

    /// Sections in declaration order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// The most recently registered section.
    pub fn current_section_mut(&mut self) -> Option<&mut Section> {
        self.sections.last_mut()
    }

    /// Add a section.  Fails with [`ErrorKind::DuplicateSection`] if `name`
    /// is already present, leaving the sector untouched.
    pub fn register_section(&mut self, name: impl Into<String>) -> Result<&mut Section, ErrorKind> {
        let name = name.into();
        check_name(&name)?;
        if self.section(&name).is_some() {
            return Err(ErrorKind::DuplicateSection);
        }
        self.sections.push(Section::new(name));
        let last = self.sections.len() - 1;
        Ok(&mut self.sections[last])
    }
}

// ── Document ──────────────────────────────────────────────────────────────────

/// A parsed build file.
///
/// The document owns everything beneath it; dropping it releases the whole
/// tree, including whatever was registered before a failed parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    path: PathBuf,
    sectors: Vec<Sector>,
    line: usize,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), sectors: Vec::new(), line: 0 }
    }

    /// Source path the document was (or will be) parsed from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of the last line fed to the parser (1-based; 0 before parsing).
    pub fn line(&self) -> usize {
        self.line
    }

    pub(crate) fn set_line(&mut self, line: usize) {
        self.line = line;
    }

    /// Drop all sectors and reset the line counter.
    pub(crate) fn reset(&mut self) {
        self.sectors.clear();
        self.line = 0;
    }

    /// Sectors in declaration order.
    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    /// The most recently registered sector.
    pub fn current_sector_mut(&mut self) -> Option<&mut Sector> {
        self.sectors.last_mut()
    }

    /// Add a sector.  Fails with [`ErrorKind::DuplicateSector`] if `name` is
    /// already present, leaving the document untouched.
    pub fn register_sector(&mut self, name: impl Into<String>) -> Result<&mut Sector, ErrorKind> {
        let name = name.into();
        check_name(&name)?;
        if self.find_sector(&name).is_some() {
            return Err(ErrorKind::DuplicateSector);
        }
        self.sectors.push(Sector::new(name));
        let last = self.sectors.len() - 1;
        Ok(&mut self.sectors[last])
    }
}

/// Serialise back to BDL.  Parsing the output yields an equal tree.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, sector) in self.sectors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "sector {}", sector.name)?;
            for section in &sector.sections {
                writeln!(f, "{}:", section.name)?;
                for field in &section.fields {
                    writeln!(f, "{} \"{}\"", field.name, field.value)?;
                }
                f.write_str(&section.lines)?;
            }
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_preserves_order() {
        let mut doc = Document::new("build.mb");
        for name in [".config", "build", "pre_build"] {
            doc.register_sector(name).unwrap();
        }
        let names: Vec<_> = doc.sectors().iter().map(Sector::name).collect();
        assert_eq!(names, [".config", "build", "pre_build"]);
    }

    #[test]
    fn duplicate_sector_rejected() {
        let mut doc = Document::default();
        doc.register_sector("build").unwrap();
        assert_eq!(doc.register_sector("build").unwrap_err(), ErrorKind::DuplicateSector);
        assert_eq!(doc.sectors().len(), 1);
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut doc = Document::default();
        doc.register_sector("build").unwrap();
        assert!(doc.register_sector("Build").is_ok());
    }

    #[test]
    fn duplicate_section_rejected() {
        let mut sector = Sector::new(".config");
        sector.register_section("paths").unwrap();
        assert_eq!(sector.register_section("paths").unwrap_err(), ErrorKind::DuplicateSection);
        assert_eq!(sector.sections().len(), 1);
    }

    #[test]
    fn duplicate_field_keeps_first_value() {
        let mut section = Section::new("paths");
        section.register_field("root", "/x").unwrap();
        assert_eq!(section.register_field("root", "/y").unwrap_err(), ErrorKind::DuplicateField);
        assert_eq!(section.field("root").unwrap().value, "/x");
        assert_eq!(section.fields().len(), 1);
    }

    #[test]
    fn invalid_names_rejected() {
        let mut doc = Document::default();
        assert_eq!(doc.register_sector("").unwrap_err(), ErrorKind::InvalidIdentifier);
        let sector = doc.register_sector("s").unwrap();
        assert_eq!(sector.register_section("a/b").unwrap_err(), ErrorKind::InvalidIdentifier);
        let section = sector.register_section("ok").unwrap();
        assert_eq!(section.register_field("", "v").unwrap_err(), ErrorKind::InvalidIdentifier);
    }

    #[test]
    fn empty_value_is_allowed() {
        let mut section = Section::new("s");
        assert_eq!(section.register_field("flags", "").unwrap().value, "");
    }

    #[test]
    fn append_line_accumulates() {
        let mut section = Section::new("build");
        section.append_line("a", "1");
        section.append_line("b", "2");
        section.append_line("bare", "");
        assert_eq!(section.lines(), "a 1\nb 2\nbare \n");
    }

    #[test]
    fn display_writes_bdl() {
        let mut doc = Document::default();
        let config = doc.register_sector(CONFIG_SECTOR).unwrap();
        let paths = config.register_section("paths").unwrap();
        paths.register_field("root", "/x y").unwrap();
        let steps = doc.register_sector("steps").unwrap();
        steps.register_section("build").unwrap().append_line("cc", "main.c");

        assert_eq!(
            doc.to_string(),
            "sector .config\npaths:\nroot \"/x y\"\n\nsector steps\nbuild:\ncc main.c\n"
        );
    }

    #[test]
    fn config_sector_flag() {
        assert!(Sector::new(".config").is_config());
        assert!(!Sector::new("config").is_config());
    }
}
