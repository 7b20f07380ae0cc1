use std::io::IsTerminal;
use std::process::ExitCode;

use mb::cli::{self, CliArgs};
use mb::log::{self as mblog, ConsoleSink, LogSink, Severity};
use mb::path::path_elem;
use mb::{Document, Interpolator, Parser};

fn main() -> ExitCode {
    mblog::init_tracing();

    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("mb: {e}");
            eprintln!("Usage: mb [-f<file>] [-r<path>]... [-c<context>] [-l<level>] [-qd] [<file>]");
            return ExitCode::FAILURE;
        }
    };

    let mut console = ConsoleSink::new(args.threshold());
    console.color = std::io::stderr().is_terminal();

    match run(&args, &console) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            console.emit(Severity::Error, &format!("mb: {e}"));
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs, console: &ConsoleSink) -> mb::Result<()> {
    let path = cli::resolve_build_file(args.file.as_ref());
    let mut parser = Parser::with_sink(path, console);
    parser.parse_file()?;
    let doc = parser.into_document();

    console.emit(Severity::Info, &format!("loaded {}", doc.path().display()));

    if args.dump {
        print!("{doc}");
    }

    let mut interp = Interpolator::with_sink(&doc, console);
    for target in &args.resolve {
        match resolve_target(&doc, &mut interp, target, args.context.as_deref())? {
            Some(value) if value.ends_with('\n') => print!("{value}"),
            Some(value) => println!("{value}"),
            None => console.emit(Severity::Warning, &format!("nothing at {target}")),
        }
    }
    Ok(())
}

/// Resolve a field (`sector/section/field`) or a section's text
/// (`sector/section`).
fn resolve_target(
    doc: &Document,
    interp: &mut Interpolator<'_, &ConsoleSink>,
    target: &str,
    context: Option<&str>,
) -> mb::Result<Option<String>> {
    let resolved = if path_elem(target, 2).is_some() {
        match context {
            Some(ctx) => match doc.find_field(target) {
                Some(field) => Some(interp.resolve(&field.value, ctx)?),
                None => None,
            },
            None => interp.resolve_field(target)?,
        }
    } else {
        interp.resolve_section_text(target, context.unwrap_or(target))?
    };
    Ok(resolved)
}
