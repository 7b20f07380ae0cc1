/// Parsing build files from disk.

use std::io::Write;

use mb::{Document, Error, ErrorKind, NullSink, Parser};

fn write_temp(src: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().expect("temp file");
    f.write_all(src.as_bytes()).expect("write temp file");
    f
}

#[test]
fn parses_file_from_disk() {
    let f = write_temp(
        "sector .config\n\
         mariebuild:\n\
         default \"debug\"\n\
         \n\
         sector build\n\
         debug:\n\
         cc -g main.c\n",
    );
    let doc = Document::parse_file(f.path()).unwrap();
    assert_eq!(doc.path(), f.path());
    assert_eq!(doc.line(), 7);
    assert_eq!(doc.find_field(".config/mariebuild/default").unwrap().value, "debug");
    assert_eq!(doc.find_section("build/debug").unwrap().lines(), "cc -g main.c\n");
}

#[test]
fn crlf_line_endings() {
    let f = write_temp("sector .config\r\np:\r\nk \"v\"\r\n");
    let doc = Document::parse_file(f.path()).unwrap();
    assert_eq!(doc.find_field(".config/p/k").unwrap().value, "v");
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.mb");
    match Document::parse_file(&path) {
        Err(Error::Io { path: p, source }) => {
            assert_eq!(p, path);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn parse_error_from_file_has_line() {
    let f = write_temp("; first\nsector a\nsector a\n");
    let err = Document::parse_file(f.path()).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::DuplicateSector));
    assert_eq!(err.line(), Some(3));
}

#[test]
fn content_before_sector_names_line() {
    let f = write_temp("\n\nstray line\n");
    let err = Document::parse_file(f.path()).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::InvalidSyntax));
    assert_eq!(err.line(), Some(3));
}

#[test]
fn invalid_utf8_is_replaced_not_rejected() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(b"; caf\xe9 notes\nsector build\nrun:\necho caf\xe9\r\n").unwrap();
    let doc = Document::parse_file(f.path()).unwrap();
    assert_eq!(doc.line(), 4);
    assert_eq!(doc.find_section("build/run").unwrap().lines(), "echo caf\u{FFFD}\n");
}

#[test]
fn invalid_utf8_still_parsed_by_grammar() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(b"sector a\n\xff\xfe\n").unwrap();
    let err = Document::parse_file(f.path()).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::InvalidSyntax));
    assert_eq!(err.line(), Some(2));
}

#[test]
fn parser_keeps_partial_document_after_error() {
    let f = write_temp("sector .config\np:\nk \"v\"\nsector .config\n");
    let mut parser = Parser::with_sink(f.path(), NullSink);
    assert!(parser.parse_file().is_err());
    let doc = parser.document();
    assert_eq!(doc.line(), 4);
    assert_eq!(doc.sectors().len(), 1);
    assert_eq!(doc.find_field(".config/p/k").unwrap().value, "v");
}

#[test]
fn reparsing_same_file_is_identical() {
    let f = write_temp("sector .config\np:\nk \"a b\"\nsector s\nx:\nrun it\n");
    let a = Document::parse_file(f.path()).unwrap();
    let b = Document::parse_file(f.path()).unwrap();
    assert_eq!(a, b);
}
