//! Global flags may be given anywhere on the command line
//!
//! Constraint arguments are passed through verbatim (scores like `-INFINITY`
//! included), so clap only sees global flags placed before the subcommand.
//! `hoist` moves them there.

const SWITCHES: &[&str] = &["--force", "--autocorrect", "--full"];
const FILE_FLAGS: &[&str] = &["-f", "--file"];

/// Reorder `argv` so every global flag precedes the subcommand
///
/// Everything after a bare `--` is left alone.
pub fn hoist(argv: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut argv = argv.into_iter();
    let mut globals: Vec<String> = argv.next().into_iter().collect();
    let mut rest = Vec::new();

    while let Some(arg) = argv.next() {
        if arg == "--" {
            rest.push(arg);
            rest.extend(argv.by_ref());
            break;
        }
        if SWITCHES.contains(&arg.as_str()) || arg.starts_with("--file=") {
            globals.push(arg);
        } else if FILE_FLAGS.contains(&arg.as_str()) {
            globals.push(arg);
            globals.extend(argv.next());
        } else {
            rest.push(arg);
        }
    }

    globals.extend(rest);
    globals
}
