use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use binq_persistence::{container, ContainerHeader};
use std::path::PathBuf;

/// Prints the header of each container; unreadable files get a row too.
pub fn run(paths: &[PathBuf]) -> anyhow::Result<()> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["File", "Status", "Version", "Source", "Shape", "Packed", "Word Bits", "CRC64"]);

    for path in paths {
        let name = path.display().to_string();
        if !path.exists() {
            table.add_row(vec![name, "MISSING".to_string()]);
            continue;
        }
        match container::read_header(path) {
            Ok(header) => {
                table.add_row(header_row(name, &header));
            }
            Err(e) => {
                table.add_row(vec![name, "CORRUPT".to_string(), e.to_string()]);
            }
        }
    }

    println!("\nContainer Report\n");
    println!("{table}\n");
    Ok(())
}

/// Table row for a readable header.
pub fn header_row(name: String, header: &ContainerHeader) -> Vec<String> {
    let packed = header
        .packed_shape()
        .map(|s| format!("{:?}", s))
        .unwrap_or_else(|e| e.to_string());
    vec![
        name,
        "OK".to_string(),
        header.version.to_string(),
        header.source_dtype.to_string(),
        format!("{:?}", header.shape),
        packed,
        header.word_bits.to_string(),
        format!("{:016x}", header.checksum),
    ]
}
