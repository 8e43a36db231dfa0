use crate::index::InvertedIndex;
use anyhow::{Context, Result};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::Path;

/// Serialize the whole index to a single opaque blob at `path`, creating
/// parent directories as needed.
pub fn save_index<P: AsRef<Path>>(path: P, index: &InvertedIndex) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    let bytes = bincode::serialize(index)?;
    let mut f = File::create(path)?;
    f.write_all(&bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "index saved");
    Ok(())
}

/// Load an index blob written by [`save_index`]. A corrupt or
/// incompatible blob fails with a deserialization error; callers must
/// rebuild the index rather than attempt recovery.
pub fn load_index<P: AsRef<Path>>(path: P) -> Result<InvertedIndex> {
    let path = path.as_ref();
    let mut f = File::open(path).with_context(|| format!("open index blob {}", path.display()))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let index: InvertedIndex = bincode::deserialize(&buf)
        .with_context(|| format!("deserialize index blob {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        docs = index.doc_count(),
        vocab = index.vocab_size(),
        "index loaded"
    );
    Ok(index)
}
