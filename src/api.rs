use crate::alphabet::Alphabets;
use crate::engine::{self, Derivation, FontTable, ParseMetrics, ResolveMetrics};
use crate::error::{DerivationError, FontError, ResolveError};
use crate::glyphs::{BaseLayout, GlyphSource, StrokeLayout, load_base_table, load_stroke_pool};
use crate::join::{Combinator, StageMetrics, StrokePool};
use std::time::{Duration, Instant};

/// Options that affect parsing.
#[derive(Debug, Clone)]
pub struct Options {
    /// Alphabets cluster names are checked against, per section.
    pub alphabets: Alphabets,
    /// How many line errors a [`DerivationError`] lists before summarising.
    pub max_reported_errors: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options { alphabets: Alphabets::default(), max_reported_errors: DerivationError::DEFAULT_MAX_REPORTED }
    }
}

/// Timings and counts collected by [`build_font`].
#[derive(Debug, Clone)]
pub struct BuildDetails {
    /// Total elapsed time, glyph loading included.
    pub total: Duration,
    pub parse: ParseMetrics,
    pub resolve: ResolveMetrics,
}

/// Result of [`build_font`].
#[derive(Debug, Clone)]
pub struct FontBuild {
    /// The completed table: base clusters plus every derived one.
    pub table: FontTable,
    pub details: BuildDetails,
}

/// Parse a derivation source. `label` is used as the source name in
/// diagnostics.
///
/// # Example
/// ```
/// use silabex::{Options, parse_derivation};
///
/// let derivation = parse_derivation("font.drv", "VOWEL\nAO | A O\n", &Options::default()).unwrap();
/// assert_eq!(derivation.statements[0].target, "AO");
///
/// let err = parse_derivation("font.drv", "VOWEL\nOA | O A\n", &Options::default()).unwrap_err();
/// assert_eq!(err.errors[0].line, 2);
/// ```
pub fn parse_derivation(label: &str, text: &str, options: &Options) -> Result<Derivation, DerivationError> {
    parse_with_metrics(label, text, options).0
}

fn parse_with_metrics(
    label: &str,
    text: &str,
    options: &Options,
) -> (Result<Derivation, DerivationError>, ParseMetrics) {
    engine::Parser::new(label, text)
        .with_alphabets(options.alphabets)
        .with_max_reported(options.max_reported_errors)
        .run_with_metrics()
}

/// Resolve `derivation` against a base table and return the completed table.
pub fn resolve(base: FontTable, derivation: &Derivation) -> Result<FontTable, ResolveError> {
    engine::Resolver::new(base).run(derivation)
}

/// Load the base clusters named by `layout` from `source`, parse `text` and
/// resolve it on top of them.
pub fn build_font(
    source: &impl GlyphSource,
    layout: &BaseLayout,
    label: &str,
    text: &str,
    options: &Options,
) -> Result<FontBuild, FontError> {
    let start = Instant::now();
    let base = load_base_table(source, layout)?;

    let (parsed, parse) = parse_with_metrics(label, text, options);
    let derivation = parsed?;
    let (table, resolve) = engine::Resolver::new(base).run_with_metrics(&derivation)?;

    Ok(FontBuild { table, details: BuildDetails { total: start.elapsed(), parse, resolve } })
}

/// Result of [`build_strokes`].
#[derive(Debug, Clone)]
pub struct StrokeBuild {
    /// Loaded base strokes followed by everything the stages derived.
    pub pool: StrokePool,
    pub stages: Vec<StageMetrics>,
    /// Total elapsed time, glyph loading included.
    pub total: Duration,
}

/// Load the role-tagged strokes named by `layout` from `source` and run
/// `combinator` over them.
pub fn build_strokes(
    source: &impl GlyphSource,
    layout: &StrokeLayout,
    combinator: &Combinator,
) -> Result<StrokeBuild, FontError> {
    let start = Instant::now();
    let pool = load_stroke_pool(source, layout)?;
    let (pool, stages) = combinator.run_with_metrics(pool);
    Ok(StrokeBuild { pool, stages, total: start.elapsed() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyphs::MemoryGlyphs;
    use crate::{SizeClass, Slot};

    const SOURCE: &str = "\
VOWEL
AOE | AO E

INITIAL
# derived consonants
TWH | T WH
KTPH | KT PH.u

FINAL
BP | B P
";

    fn layout() -> BaseLayout {
        let mut layout = BaseLayout::default();
        for (group, names) in [
            (&mut layout.vowel, vec!["A", "AO", "E"]),
            (&mut layout.solo, vec!["T", "WH", "KT", "PH"]),
            (&mut layout.initial, vec!["T", "WH", "KT", "PH"]),
            (&mut layout.final_, vec!["B", "P"]),
        ] {
            for size in &mut group.sizes {
                size.names = names.iter().map(|s| s.to_string()).collect();
            }
        }
        layout
    }

    #[test]
    fn build_font_completes_every_size_class() {
        let layout = layout();
        let source = MemoryGlyphs::placeholder(&layout);
        let build = build_font(&source, &layout, "font.drv", SOURCE, &Options::default()).unwrap();

        assert_eq!(build.details.parse.statements(), 4);
        // Vowel once, initial and solo at three sizes each, final once.
        assert_eq!(build.details.resolve.assigned, 1 + 2 * 3 * 2 + 1);

        for size in SizeClass::ALL {
            for slot in [Slot::Initial, Slot::Solo] {
                let cluster = build.table.cluster(slot, size, "KTPH").unwrap();
                assert_eq!(cluster.strokes.len(), 2, "{size} {slot}");
                assert_eq!(cluster.strokes[1].placement.dy, -140.0);
            }
        }
        let aoe = build.table.cluster(Slot::Vowel, SizeClass::Full, "AOE").unwrap();
        assert_eq!(aoe.strokes.len(), 2);
        assert!(build.table.cluster(Slot::Final, SizeClass::Full, "BP").is_some());
    }

    #[test]
    fn build_font_surfaces_each_failure_kind() {
        let layout = layout();
        let source = MemoryGlyphs::placeholder(&layout);

        let err = build_font(&MemoryGlyphs::new(), &layout, "x", SOURCE, &Options::default()).unwrap_err();
        assert!(matches!(err, FontError::Glyph(_)), "{err:?}");

        let err = build_font(&source, &layout, "x", "INITIAL\nT | T\n", &Options::default()).unwrap_err();
        assert!(matches!(err, FontError::Derivation(_)), "{err:?}");

        let err = build_font(&source, &layout, "x", "VOWEL\nAOEU | AOE U\n", &Options::default()).unwrap_err();
        assert!(matches!(err, FontError::Resolve(_)), "{err:?}");
    }

    #[test]
    fn build_strokes_runs_every_stage_over_loaded_strokes() {
        let layout = StrokeLayout::default();
        let source = MemoryGlyphs::placeholder_strokes(&layout);

        let build = build_strokes(&source, &layout, &Combinator::default()).unwrap();
        let names: Vec<&str> = build.stages.iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["simple-vowels", "complex-vowels", "consonant-heads-and-feet"]);

        let vowels = build.pool.clusters(Slot::Vowel);
        let corners: Vec<&str> = vowels.get("03").unwrap().strokes.iter().map(|s| s.geometry.as_str()).collect();
        assert_eq!(corners, vec!["vowels/0", "vowels/0"]);
        assert_eq!(vowels.get("03").unwrap().strokes[1].placement.dx, 880.0);

        let err = build_strokes(&MemoryGlyphs::new(), &layout, &Combinator::default()).unwrap_err();
        assert!(matches!(err, FontError::Glyph(_)), "{err:?}");
    }

    #[test]
    fn options_cap_reported_errors() {
        let text = "VOWEL\n".to_string() + &"OA | O A\n".repeat(4);
        let options = Options { max_reported_errors: 2, ..Options::default() };

        let err = parse_derivation("font.drv", &text, &options).unwrap_err();
        assert_eq!(err.errors.len(), 4);
        assert_eq!(err.reported().len(), 2);
        assert_eq!(err.overflow(), 2);
        assert!(err.to_string().ends_with("max errors reached, there were 2 more errors"), "{err}");
    }
}
