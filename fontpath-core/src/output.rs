//! Streaming output helpers (made by FontLab https://www.fontlab.com/)

use std::io::Write;

use crate::discovery::FontEntry;

/// Write entries as a prettified JSON array.
pub fn write_json_pretty(entries: &[FontEntry], mut w: impl Write) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut w, entries)?;
    w.write_all(b"\n").map_err(serde_json::Error::io)
}

/// Write entries as newline-delimited JSON (NDJSON).
pub fn write_ndjson(entries: &[FontEntry], mut w: impl Write) -> serde_json::Result<()> {
    for entry in entries {
        serde_json::to_writer(&mut w, entry)?;
        w.write_all(b"\n").map_err(serde_json::Error::io)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontDescriptor;
    use std::path::PathBuf;

    fn sample_entry() -> FontEntry {
        FontEntry {
            descriptor: FontDescriptor::new("Alpha", true, false),
            path: PathBuf::from("/fonts/Alpha-Bold.ttf"),
        }
    }

    #[test]
    fn ndjson_writes_one_line_per_entry() {
        let entries = vec![sample_entry(), sample_entry()];
        let mut buf = Vec::new();

        write_ndjson(&entries, &mut buf).expect("write ndjson");

        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: FontEntry = serde_json::from_str(lines[0]).expect("parse");
        assert_eq!(parsed, sample_entry());
    }

    #[test]
    fn descriptor_fields_are_flattened() {
        let mut buf = Vec::new();
        write_json_pretty(&[sample_entry()], &mut buf).expect("write json");

        let value: serde_json::Value = serde_json::from_slice(&buf).expect("json");
        let first = &value.as_array().expect("array")[0];
        assert_eq!(first["family_name"], "Alpha");
        assert_eq!(first["is_bold"], true);
        assert_eq!(first["path"], "/fonts/Alpha-Bold.ttf");
    }
}
