//! `mb` — parser and field interpolator for BDL build-description files.
//!
//! A build file is a tree of sectors, sections and lines:
//!
//! ```text
//! sector .config
//! paths:
//! root "/usr/src/app"
//! obj "$(root)/obj"
//!
//! sector build
//! compile:
//! cc -c main.c -o $(paths/obj)/main.o
//! ```
//!
//! Sections of `.config` hold key/value fields; every other sector keeps its
//! lines as raw text for a build executor to run.  Field values and section
//! text may reference fields with `$(…)`.
//!
//! # Quick start
//!
//! ```rust
//! use mb::{Document, Interpolator};
//!
//! let doc = Document::parse_str(
//!     "sector .config\npaths:\nroot \"/x\"\nobj \"$(root)/obj\"\n",
//! ).unwrap();
//! let obj = Interpolator::new(&doc).resolve_field(".config/paths/obj").unwrap();
//! assert_eq!(obj.as_deref(), Some("/x/obj"));
//! ```

pub mod cli;
pub mod document;
pub mod error;
pub mod interpolate;
pub mod log;
pub mod parse;
pub mod path;
pub mod text;

// Re-exports for convenience.
pub use document::{Document, Field, Section, Sector, CONFIG_SECTOR};
pub use error::{Error, ErrorKind, ParseError, ResolveError, Result};
pub use interpolate::{resolve_fields, Interpolator, MAX_DEPTH};
pub use log::{ConsoleSink, LogSink, NullSink, Severity, TracingSink};
pub use parse::Parser;
