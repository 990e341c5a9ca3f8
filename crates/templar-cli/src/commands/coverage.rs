//! Coverage command implementation.

use std::collections::BTreeSet;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use clap::Args;
use miette::{miette, IntoDiagnostic, Result};
use serde::Serialize;
use templar::bundle::{bundle_suffix, BundleProvider, DirectoryProvider};
use templar::{Locale, Properties};
use tracing::debug;

use crate::output::table::{chain_label, format_coverage_table, LocaleCoverage};
use crate::output::BundleDiagnostic;

/// Arguments for the coverage command.
#[derive(Debug, Args)]
pub struct CoverageArgs {
    /// Directory containing bundle files
    #[arg(long, env = "TEMPLAR_DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Bundle basename, relative to the directory
    #[arg(long, required = true)]
    pub basename: String,

    /// Source locale whose keys define completeness (`und` for the root bundle)
    #[arg(long, default_value = "und")]
    pub source: String,

    /// Locales to check coverage for (comma-separated).
    #[arg(long, value_delimiter = ',', required = true)]
    pub locale: Vec<String>,

    /// Exit with non-zero code if any locale is missing or inheriting keys.
    #[arg(long)]
    pub strict: bool,

    /// Output results as JSON.
    #[arg(long)]
    pub json: bool,
}

/// JSON output format for coverage data.
#[derive(Debug, Serialize)]
struct CoverageJson {
    locale: String,
    translated: usize,
    total: usize,
    inherited: Vec<String>,
    missing: Vec<String>,
    loaded_from: Vec<String>,
}

/// Run the coverage command.
///
/// Each locale is measured by its own bundle file only. Keys it receives
/// through the fallback chain are reported as inherited, and count as
/// incomplete under `--strict`.
pub fn run_coverage(args: CoverageArgs) -> Result<i32> {
    let provider = DirectoryProvider::new(&args.dir);

    let source_locale = parse_locale(&args.source)?;
    let source_path = provider.bundle_path(&args.basename, &bundle_suffix(&source_locale));
    let source_keys = match read_bundle_file(&source_path)? {
        Some(properties) => properties.keys().map(str::to_string).collect::<BTreeSet<_>>(),
        None => {
            eprintln!("Source bundle {} does not exist", source_path.display());
            return Ok(exitcode::NOINPUT);
        }
    };
    let source_count = source_keys.len();

    let mut coverage_data: Vec<LocaleCoverage> = Vec::new();

    for tag in &args.locale {
        let locale = parse_locale(tag)?;
        let path = provider.bundle_path(&args.basename, &bundle_suffix(&locale));
        let own = read_bundle_file(&path)?.unwrap_or_else(|| {
            debug!(path = %path.display(), "no bundle file for locale");
            Properties::new()
        });
        let chain = match provider.bundle(&args.basename, &locale) {
            Ok(bundle) => Some(bundle),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(miette!("Cannot load bundle for {}: {}", tag, e)),
        };

        let mut translated = 0;
        let mut inherited = Vec::new();
        let mut missing = Vec::new();
        for key in &source_keys {
            if own.contains_key(key) {
                translated += 1;
            } else if chain.as_ref().is_some_and(|bundle| bundle.contains_key(key)) {
                inherited.push(key.clone());
            } else {
                missing.push(key.clone());
            }
        }

        coverage_data.push(LocaleCoverage {
            locale: tag.clone(),
            translated,
            inherited,
            missing,
            loaded_from: chain
                .map(|bundle| bundle.loaded_from().to_vec())
                .unwrap_or_default(),
        });
    }

    let any_incomplete = coverage_data.iter().any(|c| !c.is_complete());

    if args.json {
        let json_data: Vec<CoverageJson> = coverage_data
            .iter()
            .map(|c| CoverageJson {
                locale: c.locale.clone(),
                translated: c.translated,
                total: source_count,
                inherited: c.inherited.clone(),
                missing: c.missing.clone(),
                loaded_from: c.loaded_from.clone(),
            })
            .collect();

        let json_output = serde_json::to_string_pretty(&json_data).into_diagnostic()?;
        println!("{}", json_output);
    } else {
        let table = format_coverage_table(source_count, &coverage_data);
        println!("{}", table);

        for entry in &coverage_data {
            if !entry.missing.is_empty() {
                println!("\nMissing in {}:", entry.locale);
                for key in &entry.missing {
                    println!("  - {}", key);
                }
            }
            if !entry.inherited.is_empty() {
                println!(
                    "\nInherited by {} (via {}):",
                    entry.locale,
                    chain_label(&entry.loaded_from)
                );
                for key in &entry.inherited {
                    println!("  - {}", key);
                }
            }
        }
    }

    if args.strict && any_incomplete {
        Ok(exitcode::DATAERR)
    } else {
        Ok(exitcode::OK)
    }
}

fn parse_locale(tag: &str) -> Result<Locale> {
    tag.parse()
        .map_err(|e| miette!("Invalid locale '{}': {}", tag, e))
}

/// Parse a bundle file, or `None` if it does not exist.
fn read_bundle_file(path: &Path) -> Result<Option<Properties>> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = read_to_string(path)
        .into_diagnostic()
        .map_err(|e| miette!("Failed to read bundle file {:?}: {}", path, e))?;

    match Properties::parse(&content) {
        Ok(properties) => Ok(Some(properties)),
        Err(e) => {
            let diagnostic = BundleDiagnostic::from_parse_error(path, &content, &e);
            Err(diagnostic.into())
        }
    }
}
