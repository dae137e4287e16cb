mod debug_report;

use silabex::{
    BaseLayout, Combinator, MIRRORED_INITIALS, MemoryGlyphs, Options, Parser, Resolver, StrokeLayout, build_strokes,
    combinations, load_base_table,
};
use std::io::{self, IsTerminal, Read};

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let palette = debug_report::Palette::new(config.color);
    let code = match config.command {
        Command::Combinations(names) => {
            debug_report::print_combinations(&names, &combinations(&names), &palette);
            0
        }
        Command::Derive { path, resolve } => run_derivation(&path, resolve, &palette),
        Command::Strokes { mirrored } => run_strokes(mirrored, &palette),
    };
    std::process::exit(code);
}

fn run_derivation(path: &str, resolve: bool, palette: &debug_report::Palette) -> i32 {
    let text = match read_source(path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };

    let options = Options::default();
    let (parsed, metrics) = Parser::new(path, &text)
        .with_alphabets(options.alphabets)
        .with_max_reported(options.max_reported_errors)
        .run_with_metrics();
    debug_report::print_parse(path, &parsed, &metrics, palette);

    let Ok(derivation) = parsed else {
        return 1;
    };
    if !resolve {
        return 0;
    }

    // Dry run: every base cluster of the default layout stands in as a
    // placeholder, so only the derivation itself can fail.
    let layout = BaseLayout::default();
    let base = match load_base_table(&MemoryGlyphs::placeholder(&layout), &layout) {
        Ok(base) => base,
        Err(err) => {
            eprintln!("error: {err}");
            return 1;
        }
    };
    let base_len = base.len();
    let resolved = Resolver::new(base).run_with_metrics(&derivation);
    debug_report::print_resolve(base_len, &resolved, palette);
    if resolved.is_ok() { 0 } else { 1 }
}

/// Dry run of the join pipeline over placeholder strokes of the default
/// stroke layout.
fn run_strokes(mirrored: bool, palette: &debug_report::Palette) -> i32 {
    let layout = StrokeLayout::default();
    let mut stages = Combinator::default().stages().to_vec();
    if mirrored {
        stages.push(MIRRORED_INITIALS);
    }

    match build_strokes(&MemoryGlyphs::placeholder_strokes(&layout), &layout, &Combinator::new(stages)) {
        Ok(build) => {
            debug_report::print_strokes(&build, palette);
            0
        }
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}

enum Command {
    Derive { path: String, resolve: bool },
    Combinations(Vec<String>),
    Strokes { mirrored: bool },
}

struct CliConfig {
    command: Command,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut path: Option<String> = None;
    let mut combos: Option<Vec<String>> = None;
    let mut resolve = false;
    let mut strokes = false;
    let mut mirrored = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("silabex {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--resolve" => resolve = true,
            "--strokes" => strokes = true,
            "--mirrored" => mirrored = true,
            "--combinations" | "-c" => {
                let value = args.next().ok_or_else(|| "error: --combinations expects a value".to_string())?;
                combos = Some(parse_names(&value)?);
            }
            _ if arg.starts_with("--combinations=") => {
                combos = Some(parse_names(arg.trim_start_matches("--combinations="))?);
            }
            "-" => set_path(&mut path, arg)?,
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => set_path(&mut path, arg)?,
        }
    }

    if mirrored && !strokes {
        return Err("error: --mirrored only applies to --strokes".to_string());
    }
    if strokes {
        if combos.is_some() || path.is_some() {
            return Err("error: --strokes takes no derivation file or --combinations".to_string());
        }
        return Ok(CliConfig { command: Command::Strokes { mirrored }, color });
    }

    let command = match (combos, path) {
        (Some(_), Some(_)) => return Err("error: --combinations takes no derivation file".to_string()),
        (Some(names), None) => Command::Combinations(names),
        (None, Some(path)) => Command::Derive { path, resolve },
        (None, None) => return Err(format!("error: no derivation file provided\n\n{}", help_text())),
    };

    Ok(CliConfig { command, color })
}

fn set_path(path: &mut Option<String>, value: String) -> Result<(), String> {
    if path.is_some() {
        return Err("error: derivation file provided multiple times".to_string());
    }
    *path = Some(value);
    Ok(())
}

fn parse_names(value: &str) -> Result<Vec<String>, String> {
    let names: Vec<String> = value.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect();
    if names.is_empty() {
        return Err(format!("error: invalid --combinations '{value}' (expected a,b,c)"));
    }
    Ok(names)
}

fn read_source(path: &str) -> Result<String, String> {
    if path == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path).map_err(|err| format!("error: failed to read '{path}': {err}"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "silabex {version}

Syllabary glyph derivation checker.

Usage:
  silabex [OPTIONS] <file>
  silabex --combinations <a,b,c>
  silabex --strokes [--mirrored]

Arguments:
  <file>                     Derivation source to check. Use '-' for stdin.

Options:
  --resolve                  Also resolve the derivation against placeholder
                             base clusters of the default layout.
  -c, --combinations <list>  Print every combination of the comma-separated
                             names in emission order.
  --strokes                  Run the stroke join pipeline over placeholder
                             strokes of the default stroke layout.
  --mirrored                 With --strokes, add the mirrored-initials stage.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  SILABEX_DEBUG_DERIVE=1     Trace parsing and resolution to stderr.

Exit codes:
  0  Success.
  1  The derivation has errors, the file could not be read, or a
     stroke could not be loaded.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
    )
}
