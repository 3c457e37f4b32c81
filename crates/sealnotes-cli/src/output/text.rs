//! Text and table output formatting for notes.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use sealnotes_core::Note;

const SUMMARY_WIDTH: usize = 40;

/// Print a single note with labelled metadata.
pub fn print_note(note: &Note, quiet: bool) {
    if !quiet {
        println!("ID:          {}", note.id);
        println!("Title:       {}", note.title);
        println!("Encrypted:   {}", if note.is_encrypted { "yes" } else { "no" });
        println!("Created:     {}", note.created_at.to_rfc3339());
        println!("Updated:     {}", note.updated_at.to_rfc3339());
        println!(
            "Sensitivity: {} ({})",
            note.sensitivity.sensitivity_score, note.sensitivity.explanation
        );
        println!();
    }
    println!("{}", note.content);
}

/// Build the table used by `list`.
fn note_table(notes: &[Note]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "UPDATED", "TITLE", "ENC", "SCORE", "CONTENT"]);

    for note in notes {
        table.add_row(vec![
            note.id.clone(),
            note.updated_at.format("%Y-%m-%d %H:%M").to_string(),
            note.title.clone(),
            if note.is_encrypted { "yes" } else { "no" }.to_string(),
            note.sensitivity.sensitivity_score.to_string(),
            summarize(&note.content),
        ]);
    }
    table
}

/// Print a list of notes as a table, or one id per line in quiet mode.
pub fn print_note_list(notes: &[Note], quiet: bool) {
    if quiet {
        for note in notes {
            println!("{}", note.id);
        }
        return;
    }
    if notes.is_empty() {
        println!("No notes.");
        return;
    }
    println!("{}", note_table(notes));
}

fn summarize(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or("");
    if first_line.chars().count() <= SUMMARY_WIDTH {
        return first_line.to_string();
    }
    let truncated: String = first_line.chars().take(SUMMARY_WIDTH - 3).collect();
    format!("{}...", truncated)
}
