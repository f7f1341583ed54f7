use binq_persistence::{container, PersistenceError};
use std::path::Path;

pub fn run(path: &Path) -> anyhow::Result<()> {
    // Load without the checksum check so a mismatch can be reported in full.
    let packed = container::read_file_unverified(path)?;
    let stored = packed.header.checksum;
    let computed = container::compute_checksum(&packed.words);

    if computed == stored {
        if let Err(e) = packed.verify() {
            println!("\n❌ MALFORMED\n");
            println!("Reason:        {}", e);
            tracing::warn!("Malformed payload in {}: {}", path.display(), e);
            return Err(e.into());
        }
        println!("\n✅ VERIFIED\n");
        println!("Computed Hash: {:016x}", computed);
        println!("Words:         {}\n", packed.words.len());
        Ok(())
    } else {
        println!("\n❌ CORRUPTED\n");
        println!("Expected Hash: {:016x}", stored);
        println!("Found Hash:    {:016x}", computed);
        tracing::warn!("Checksum mismatch in {}", path.display());
        Err(PersistenceError::ChecksumMismatch {
            expected: stored,
            found: computed,
        }
        .into())
    }
}
