//! Terminal and CSV rendering of merged guidance.
//!
//! The merged table is printed with Arrow's pretty printer. Conflict groups are
//! rendered as vertical cards, one block per candidate value, so a reviewer can
//! compare them side by side before choosing.

use std::fs::File;
use std::path::Path;

use anyhow::Context;
use arrow::array::{Array, Float64Array, StringArray};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use earnguide_core::{CanonicalKey, MergedItem, guidance};

// ── Card section groupings ──

const VALUE: &[&str] = &["guidance_value_text", "low_end", "high_end", "average", "units"];

const PROVENANCE: &[&str] = &["source", "filing_date", "provenance"];

// ── Public API ──

/// Print merged items as one table.
pub fn print_merged_table(items: &[MergedItem]) -> anyhow::Result<()> {
    if items.is_empty() {
        println!("No structured guidance.");
        return Ok(());
    }
    let batch = guidance::to_record_batch(items)?;
    println!("{}", pretty_format_batches(&[batch])?);
    Ok(())
}

/// Print one card per conflicting canonical key.
pub fn print_conflict_cards<'a>(
    conflicts: impl IntoIterator<Item = &'a (CanonicalKey, Vec<MergedItem>)>,
) -> anyhow::Result<usize> {
    let mut count = 0;
    for (key, items) in conflicts {
        count += 1;
        println!("=== {} ===", key.label());
        println!("key: {}", key.resolution_key());
        println!();

        let batch = guidance::to_record_batch(items)?;
        for (row, item) in items.iter().enumerate() {
            println!("[{row}] {}", option_label(item));
            print_section(&batch, row, "Value", VALUE);
            print_section(&batch, row, "Provenance", PROVENANCE);
        }
    }
    Ok(count)
}

/// Write merged items as CSV.
pub fn write_csv(items: &[MergedItem], path: &Path) -> anyhow::Result<()> {
    let batch = guidance::to_record_batch(items)?;
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = arrow::csv::Writer::new(file);
    writer
        .write(&batch)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// One-line summary of a candidate value: `[source] text  (low–high)`.
pub fn option_label(item: &MergedItem) -> String {
    let range = match (item.low_end, item.high_end) {
        (Some(lo), Some(hi)) if lo != hi => format!("({lo}–{hi})"),
        (Some(lo), _) => format!("({lo})"),
        _ => String::new(),
    };
    format!("[{}] {}  {}", item.source, item.guidance_value_text, range)
        .trim_end()
        .to_string()
}

// ── Section rendering ──

fn print_section(batch: &RecordBatch, row: usize, header: &str, cols: &[&str]) {
    let has_data = cols.iter().any(|&col| {
        batch
            .schema()
            .index_of(col)
            .ok()
            .is_some_and(|i| !batch.column(i).is_null(row))
    });
    if !has_data {
        return;
    }

    println!("  {header}");
    for &col_name in cols {
        if let Some(value) = cell(batch, row, col_name) {
            println!("    {:<22} {}", col_name, value);
        }
    }
}

// ── Helpers ──

/// Render one cell as text. `None` for missing columns, nulls, and empty strings.
fn cell(batch: &RecordBatch, row: usize, col_name: &str) -> Option<String> {
    let idx = batch.schema().index_of(col_name).ok()?;
    let col = batch.column(idx);
    if col.is_null(row) {
        return None;
    }
    if let Some(arr) = col.as_any().downcast_ref::<StringArray>() {
        let v = arr.value(row);
        return (!v.is_empty()).then(|| v.to_string());
    }
    if let Some(arr) = col.as_any().downcast_ref::<Float64Array>() {
        return Some(arr.value(row).to_string());
    }
    None
}
