//! JSON output formatting for notes.

use sealnotes_core::Note;

/// Convert a note to JSON for output.
pub fn note_json(note: &Note) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::to_value(note)?)
}

/// Convert multiple notes to a JSON array for output.
pub fn notes_json(notes: &[Note]) -> anyhow::Result<serde_json::Value> {
    let values = notes.iter().map(note_json).collect::<anyhow::Result<Vec<_>>>()?;
    Ok(serde_json::Value::Array(values))
}

pub fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
