use silabex::{
    Derivation, DerivationError, FontTable, ParseMetrics, ResolveError, ResolveMetrics, Slot, StrokeBuild,
};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
        if self.enabled { format!("{}{}{}", color, s.as_ref(), ansi::RESET) } else { s.as_ref().to_string() }
    }

    fn bold(&self, s: impl AsRef<str>) -> String {
        if self.enabled { format!("{}{}{}", ansi::BOLD, s.as_ref(), ansi::RESET) } else { s.as_ref().to_string() }
    }

    fn dim(&self, s: impl AsRef<str>) -> String {
        if self.enabled { format!("{}{}{}", ansi::DIM, s.as_ref(), ansi::RESET) } else { s.as_ref().to_string() }
    }

    fn rule(&self, title: &str) -> String {
        self.paint(format!("━━━ {title} ━━━"), ansi::GRAY)
    }
}

const SAMPLES: usize = 5;

pub fn print_parse(
    label: &str,
    parsed: &Result<Derivation, DerivationError>,
    metrics: &ParseMetrics,
    palette: &Palette,
) {
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Deriving: \"{label}\""), ansi::CYAN)));

    println!("\n{}", palette.rule("Statements"));
    let counts = [(Slot::Vowel, metrics.vowel), (Slot::Initial, metrics.initial), (Slot::Final, metrics.final_)];
    for (slot, count) in counts {
        let count = if count > 0 {
            palette.paint(format!("✓ {count}"), ansi::GREEN)
        } else {
            palette.dim(format!("✗ {count}"))
        };
        println!("  {} {}", palette.paint(format!("{:<8}", slot.name().to_uppercase()), ansi::BLUE), count);

        if let Ok(derivation) = parsed {
            let statements: Vec<_> = derivation.for_slot(slot).collect();
            for statement in statements.iter().take(SAMPLES) {
                println!("    {} {}", palette.paint(format!("{:>4}", statement.line), ansi::GRAY), statement);
            }
            if statements.len() > SAMPLES {
                println!("    {}", palette.dim(format!("... +{} more", statements.len() - SAMPLES)));
            }
        }
    }

    println!("\n{}", palette.rule("Diagnostics"));
    match parsed {
        Ok(_) => println!("  {}", palette.paint("✓ no errors", ansi::GREEN)),
        Err(err) => {
            for e in err.reported() {
                println!(
                    "  {} {}",
                    palette.paint(format!("{}:{}", err.source, e.line), ansi::YELLOW),
                    palette.paint(e.kind.to_string(), ansi::RED),
                );
            }
            if err.overflow() > 0 {
                println!("  {}", palette.dim(format!("max errors reached, there were {} more errors", err.overflow())));
            }
        }
    }

    println!("\n{}", palette.rule("Timing"));
    println!(
        "  Parse: {}  │  Lines: {}",
        palette.paint(format!("{:?}", metrics.duration), ansi::GREEN),
        palette.dim(metrics.lines.to_string()),
    );
    println!();
}

pub fn print_resolve(base_len: usize, resolved: &Result<(FontTable, ResolveMetrics), ResolveError>, palette: &Palette) {
    println!("{}", palette.rule("Resolution"));
    match resolved {
        Ok((table, metrics)) => {
            println!(
                "  {} {}  {} {}  {} {}",
                palette.dim("base:"),
                palette.paint(base_len.to_string(), ansi::BLUE),
                palette.dim("assigned:"),
                palette.paint(metrics.assigned.to_string(), ansi::GREEN),
                palette.dim("skipped:"),
                palette.paint(metrics.skipped.to_string(), ansi::YELLOW),
            );
            println!(
                "  Total clusters: {}  │  Resolve: {}",
                palette.bold(table.len().to_string()),
                palette.paint(format!("{:?}", metrics.duration), ansi::GREEN),
            );
        }
        Err(err) => println!("  {}", palette.paint(format!("✗ {err}"), ansi::RED)),
    }
    println!();
}

pub fn print_combinations(names: &[String], combos: &[String], palette: &Palette) {
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Combinations of {}", names.join(",")), ansi::CYAN)));
    println!("\n{}", palette.rule(&format!("{} subsets", combos.len())));
    println!("  {}", combos.join(" "));
    println!();
}

pub fn print_strokes(build: &StrokeBuild, palette: &Palette) {
    println!("\n{}", palette.bold(palette.paint("⚙  Joining strokes", ansi::CYAN)));

    println!("\n{}", palette.rule("Stages"));
    for stage in &build.stages {
        let produced = if stage.produced > 0 {
            palette.paint(format!("✓ {} strokes", stage.produced), ansi::GREEN)
        } else {
            palette.dim(format!("✗ {} strokes", stage.produced))
        };
        println!(
            "  {} {}  {}",
            palette.paint(format!("{:<28}", stage.name), ansi::BLUE),
            produced,
            palette.dim(format!("{:?}", stage.duration)),
        );
    }

    println!("\n{}", palette.rule("Clusters"));
    for slot in [Slot::Vowel, Slot::Initial, Slot::Solo] {
        let clusters = build.pool.clusters(slot);
        let names: Vec<&str> = clusters.names().take(SAMPLES).collect();
        let more = clusters.len().saturating_sub(SAMPLES);
        let tail = if more > 0 { palette.dim(format!(" ... +{more} more")) } else { String::new() };
        let label = palette.paint(format!("{:<8}", slot.name().to_uppercase()), ansi::BLUE);
        println!("  {} {}{}", label, names.join(" "), tail);
    }

    println!("\n{}", palette.rule("Timing"));
    println!(
        "  Total: {}  │  Pool: {}",
        palette.paint(format!("{:?}", build.total), ansi::GREEN),
        palette.dim(build.pool.len().to_string()),
    );
    println!();
}
