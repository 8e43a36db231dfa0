use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use khoj_core::persist::save_index;
use khoj_core::{preprocess, DocId, DocMeta, InvertedIndex, Language};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, EnvFilter};

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Crawler output document. Sources disagree on which field carries the
/// article text, so the schema lists every variant explicitly and
/// [`RawDoc::body_text`] resolves them in a fixed priority order.
#[derive(Debug, Deserialize)]
struct RawDoc {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    article: Option<String>,
    #[serde(default)]
    full_text: Option<String>,
}

impl RawDoc {
    /// Priority: content > text > body > article > full_text.
    fn body_text(&self) -> &str {
        [
            &self.content,
            &self.text,
            &self.body,
            &self.article,
            &self.full_text,
        ]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .map(String::as_str)
        .unwrap_or("")
    }

    fn link(&self) -> Option<String> {
        self.url.clone().or_else(|| self.source.clone())
    }
}

#[derive(Parser)]
#[command(name = "khoj-indexer")]
#[command(about = "Build bilingual BM25 index blobs from crawled documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build per-language and combined index blobs from corpus JSON files
    Build {
        /// English corpus (JSON array of documents)
        #[arg(long)]
        english: PathBuf,
        /// Bangla corpus (JSON array of documents)
        #[arg(long)]
        bangla: PathBuf,
        /// Output directory for index blobs and meta.json
        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(Serialize)]
struct BuildSummary {
    version: u32,
    created_at: String,
    bangla_docs: u32,
    english_docs: u32,
    combined_docs: u32,
    combined_vocab: usize,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { english, bangla, output } => build(&english, &bangla, &output),
    }
}

fn build(english: &Path, bangla: &Path, output: &Path) -> Result<()> {
    let bangla_rows = ingest(bangla, Language::Bangla)?;
    let english_rows = ingest(english, Language::English)?;

    let bangla_index = assemble(&bangla_rows);
    save_index(output.join("bangla_index.bin"), &bangla_index)?;

    let english_index = assemble(&english_rows);
    save_index(output.join("english_index.bin"), &english_index)?;

    // The combined index reuses the token streams carried from the build
    // pass; ids and metadata stay as assigned per language.
    let combined_index = assemble(bangla_rows.iter().chain(english_rows.iter()));
    save_index(output.join("combined_index.bin"), &combined_index)?;

    let summary = BuildSummary {
        version: 1,
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default(),
        bangla_docs: bangla_index.doc_count(),
        english_docs: english_index.doc_count(),
        combined_docs: combined_index.doc_count(),
        combined_vocab: combined_index.vocab_size(),
    };
    let meta = File::create(output.join("meta.json"))?;
    serde_json::to_writer_pretty(meta, &summary)?;

    tracing::info!(
        output = %output.display(),
        combined_docs = summary.combined_docs,
        combined_vocab = summary.combined_vocab,
        "index build complete"
    );
    Ok(())
}

/// One corpus document after preprocessing: id, token stream, metadata.
/// Token streams are kept so the combined index is assembled directly
/// instead of being re-derived from per-language posting lists.
type DocRow = (DocId, Vec<String>, DocMeta);

fn ingest(path: &Path, language: Language) -> Result<Vec<DocRow>> {
    let f = File::open(path).with_context(|| format!("open corpus {}", path.display()))?;
    let docs: Vec<RawDoc> = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse corpus {}", path.display()))?;
    tracing::info!(corpus = %path.display(), docs = docs.len(), lang = %language, "corpus loaded");

    let rows = docs
        .into_iter()
        .enumerate()
        .map(|(i, doc)| {
            let doc_id = format!("{}_{}", language.code(), i);
            let indexed = format!("{} {}", doc.title, doc.body_text());
            let tokens = preprocess(&indexed, Some(language));
            let meta = DocMeta {
                title: doc.title.clone(),
                url: doc.link(),
                language,
            };
            (doc_id, tokens, meta)
        })
        .collect();
    Ok(rows)
}

fn assemble<'a, I>(rows: I) -> InvertedIndex
where
    I: IntoIterator<Item = &'a DocRow>,
{
    let mut index = InvertedIndex::new();
    for (doc_id, tokens, meta) in rows {
        index.add_document(doc_id.clone(), tokens, meta.clone());
    }
    index.finalize();
    index
}
