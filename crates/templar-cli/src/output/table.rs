//! Table formatting utilities for CLI output.

use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};

/// Coverage data for a single locale.
pub struct LocaleCoverage {
    /// Locale tag (e.g., "de", "fr-CA").
    pub locale: String,
    /// Source keys the locale's own bundle file defines.
    pub translated: usize,
    /// Source keys the locale lacks but receives from a less specific bundle.
    pub inherited: Vec<String>,
    /// Source keys no bundle of the locale's fallback chain defines.
    pub missing: Vec<String>,
    /// Bundle suffixes the locale resolves through, most specific first.
    pub loaded_from: Vec<String>,
}

impl LocaleCoverage {
    /// Whether every source key is defined by the locale's own bundle file.
    pub fn is_complete(&self) -> bool {
        self.inherited.is_empty() && self.missing.is_empty()
    }
}

/// Format coverage data as an ASCII table.
pub fn format_coverage_table(source_count: usize, coverage: &[LocaleCoverage]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Locale", "Coverage", "Inherited", "Missing", "Resolves via"]);

    for entry in coverage {
        table.add_row(vec![
            Cell::new(&entry.locale),
            Cell::new(format!("{}/{}", entry.translated, source_count))
                .set_alignment(CellAlignment::Right),
            Cell::new(entry.inherited.len()).set_alignment(CellAlignment::Right),
            Cell::new(entry.missing.len()).set_alignment(CellAlignment::Right),
            Cell::new(chain_label(&entry.loaded_from)),
        ]);
    }

    table
}

/// Render a fallback chain as `de_AT > de > (root)`; `-` when nothing loads.
pub fn chain_label(suffixes: &[String]) -> String {
    if suffixes.is_empty() {
        return "-".to_string();
    }
    suffixes
        .iter()
        .map(|s| if s.is_empty() { "(root)" } else { s.as_str() })
        .collect::<Vec<_>>()
        .join(" > ")
}
