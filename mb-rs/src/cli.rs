//! Command-line argument parsing.
//!
//! Usage:
//!   mb [-f<file>] [-r<path>]... [-c<context>] [-l<level>] [-qd] [<file>]

use std::path::PathBuf;

use crate::log::Severity;

/// Build file looked for in the working directory when none is given.
pub const DEFAULT_BUILD_FILE: &str = "build.mb";

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug)]
pub struct CliArgs {
    /// Build file (`-f<file>` or the single positional argument).
    pub file: Option<PathBuf>,
    /// Paths to resolve and print (`-r<path>`, repeatable).
    pub resolve: Vec<String>,
    /// Context for local references in `-r` lookups (`-c<context>`).
    pub context: Option<String>,
    /// Console log threshold (`-l<level>`).
    pub level: Severity,
    /// Only report errors (`-q`).
    pub quiet: bool,
    /// Dump the parsed document as BDL (`-d`).
    pub dump: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            file: None,
            resolve: Vec::new(),
            context: None,
            level: Severity::Steps,
            quiet: false,
            dump: false,
        }
    }
}

impl CliArgs {
    /// Effective console threshold after `-q`.
    pub fn threshold(&self) -> Severity {
        if self.quiet { Severity::Error } else { self.level }
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()` and return [`CliArgs`] or an error message.
pub fn parse_args() -> Result<CliArgs, String> {
    let raw: Vec<String> = std::env::args().collect();
    parse_argv(raw.get(1..).unwrap_or_default())
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, String> {
    let mut args = CliArgs::default();
    let mut positional: Vec<String> = Vec::new();
    let mut i = 0;

    while i < argv.len() {
        let arg = argv[i].as_str();

        // `--` ends flag processing.
        if arg == "--" {
            positional.extend(argv[i + 1..].iter().cloned());
            break;
        }

        if !arg.starts_with('-') || arg == "-" {
            positional.push(arg.to_owned());
            i += 1;
            continue;
        }

        let chars: Vec<char> = arg[1..].chars().collect();
        let mut j = 0;
        while j < chars.len() {
            let flag = chars[j];
            match flag {
                'q' => args.quiet = true,
                'd' => args.dump = true,

                // Flags taking a value: embedded (`-rpath`) or separate (`-r path`).
                'f' | 'r' | 'c' | 'l' => {
                    let value = if j + 1 < chars.len() {
                        let s: String = chars[j + 1..].iter().collect();
                        j = chars.len();
                        s
                    } else if i + 1 < argv.len() {
                        i += 1;
                        argv[i].clone()
                    } else {
                        return Err(format!("-{flag} requires an argument"));
                    };
                    match flag {
                        'f' => args.file = Some(PathBuf::from(value)),
                        'r' => args.resolve.push(value),
                        'c' => args.context = Some(value),
                        _ => args.level = value.parse()?,
                    }
                }

                c => return Err(format!("unknown option: -{c}")),
            }
            j += 1;
        }
        i += 1;
    }

    match positional.len() {
        0 => {}
        1 if args.file.is_none() => args.file = Some(PathBuf::from(positional.remove(0))),
        1 => return Err("build file given twice".to_owned()),
        n => return Err(format!("too many arguments ({n})")),
    }

    Ok(args)
}

// ── Path helpers ──────────────────────────────────────────────────────────────

/// Determine the build file to parse.
///
/// Priority: CLI argument → `MB_FILE` env var → `./build.mb`.
pub fn resolve_build_file(cli_override: Option<&PathBuf>) -> PathBuf {
    if let Some(p) = cli_override {
        return p.clone();
    }
    if let Ok(p) = std::env::var("MB_FILE") {
        if !p.is_empty() {
            return PathBuf::from(p);
        }
    }
    PathBuf::from(DEFAULT_BUILD_FILE)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn empty_args() {
        let a = parse_argv(&argv(&[])).unwrap();
        assert!(a.file.is_none());
        assert!(a.resolve.is_empty());
        assert_eq!(a.threshold(), Severity::Steps);
    }

    #[test]
    fn file_positional() {
        let a = parse_argv(&argv(&["proj.mb"])).unwrap();
        assert_eq!(a.file, Some(PathBuf::from("proj.mb")));
    }

    #[test]
    fn file_embedded_and_separate() {
        let a = parse_argv(&argv(&["-fproj.mb"])).unwrap();
        assert_eq!(a.file, Some(PathBuf::from("proj.mb")));
        let a = parse_argv(&argv(&["-f", "proj.mb"])).unwrap();
        assert_eq!(a.file, Some(PathBuf::from("proj.mb")));
    }

    #[test]
    fn file_twice_is_error() {
        assert!(parse_argv(&argv(&["-f", "a.mb", "b.mb"])).is_err());
    }

    #[test]
    fn resolve_is_repeatable() {
        let a = parse_argv(&argv(&["-r.config/paths/root", "-r", "steps/build"])).unwrap();
        assert_eq!(a.resolve, [".config/paths/root", "steps/build"]);
    }

    #[test]
    fn context_flag() {
        let a = parse_argv(&argv(&["-c", ".config/paths"])).unwrap();
        assert_eq!(a.context.as_deref(), Some(".config/paths"));
    }

    #[test]
    fn level_numeric_and_named() {
        assert_eq!(parse_argv(&argv(&["-l0"])).unwrap().level, Severity::Debug);
        assert_eq!(parse_argv(&argv(&["-l", "warning"])).unwrap().level, Severity::Warning);
        assert!(parse_argv(&argv(&["-l9"])).is_err());
    }

    #[test]
    fn combined_bool_flags() {
        let a = parse_argv(&argv(&["-qd"])).unwrap();
        assert!(a.quiet && a.dump);
        assert_eq!(a.threshold(), Severity::Error);
    }

    #[test]
    fn bool_then_value_flag() {
        let a = parse_argv(&argv(&["-dr.config/p/k"])).unwrap();
        assert!(a.dump);
        assert_eq!(a.resolve, [".config/p/k"]);
    }

    #[test]
    fn missing_value() {
        assert!(parse_argv(&argv(&["-r"])).is_err());
    }

    #[test]
    fn double_dash_ends_flags() {
        let a = parse_argv(&argv(&["--", "-odd.mb"])).unwrap();
        assert_eq!(a.file, Some(PathBuf::from("-odd.mb")));
    }

    #[test]
    fn unknown_flag() {
        assert!(parse_argv(&argv(&["-z"])).is_err());
    }

    #[test]
    fn build_file_override_wins() {
        let p = PathBuf::from("x.mb");
        assert_eq!(resolve_build_file(Some(&p)), p);
    }
}
