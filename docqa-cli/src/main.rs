//! docqa command-line interface.
//!
//! Ingest local documents into a persistent collection and ask
//! questions about them. `--offline` swaps the DashScope embedder and
//! chat model for deterministic local stand-ins so the pipeline can be
//! exercised without credentials.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use docqa_agent::{DocumentAgent, QaAgent};
use docqa_extract::ProcessorRegistry;
use docqa_model::{ChatModel, DashScopeChatModel, MockChatModel};
use docqa_rag::{
    DashScopeEmbedder, DocumentStore, EmbeddingProvider, HashEmbedder, SqliteBackend, TextChunker,
};

#[derive(Parser)]
#[command(name = "docqa", version, about = "Local document question answering")]
struct Cli {
    /// Directory holding the persistent collection.
    #[arg(long, default_value = "./docqa-data", global = true)]
    data_dir: PathBuf,

    /// Collection name inside the data directory.
    #[arg(long, default_value = "documents", global = true)]
    collection: String,

    /// Chunk size in characters.
    #[arg(long, default_value_t = 1000, global = true)]
    chunk_size: usize,

    /// Overlap between consecutive chunks in characters.
    #[arg(long, default_value_t = 200, global = true)]
    chunk_overlap: usize,

    /// Number of chunks retrieved per question.
    #[arg(long, default_value_t = 5, global = true)]
    top_k: usize,

    /// Chat model name.
    #[arg(long, default_value = "qwen-max", global = true)]
    model: String,

    /// Tesseract language hint for image OCR.
    #[arg(long, default_value = "chi_sim+eng", global = true)]
    ocr_lang: String,

    /// Model call timeout in seconds.
    #[arg(long, default_value_t = 60, global = true)]
    timeout: u64,

    /// Use the offline embedder and a mock chat model (no API key needed).
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest one or more local files.
    Ingest {
        /// Files to ingest.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Ask a question; starts an interactive session when omitted.
    Ask {
        /// The question. Omit for an interactive loop.
        question: Option<String>,
    },
    /// Show the stored chunk count.
    Status,
    /// Delete every stored chunk.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let backend = Arc::new(
        SqliteBackend::open(&cli.data_dir)
            .await
            .with_context(|| format!("opening data directory {}", cli.data_dir.display()))?,
    );

    // Status and clear never embed; they get the offline embedder so
    // no API key is demanded just to look at or drop the collection.
    let needs_credentials =
        matches!(cli.command, Command::Ingest { .. } | Command::Ask { .. }) && !cli.offline;
    let embedder: Arc<dyn EmbeddingProvider> = if needs_credentials {
        Arc::new(DashScopeEmbedder::from_env()?)
    } else {
        Arc::new(HashEmbedder::new())
    };

    let store = Arc::new(DocumentStore::open(backend, embedder, &cli.collection).await?);

    match &cli.command {
        Command::Ingest { paths } => ingest(&cli, store, paths).await,
        Command::Ask { question } => ask(&cli, store, question.clone()).await,
        Command::Status => status(store).await,
        Command::Clear { yes } => clear(store, *yes).await,
    }
}

async fn ingest(cli: &Cli, store: Arc<DocumentStore>, paths: &[PathBuf]) -> Result<()> {
    let chunker = TextChunker::new(cli.chunk_size, cli.chunk_overlap)?;
    let registry = ProcessorRegistry::new(chunker).with_ocr_language(&cli.ocr_lang);
    let agent = DocumentAgent::new(registry, store);

    let outcomes = agent.ingest_batch(paths).await;
    let mut succeeded = 0;
    for outcome in &outcomes {
        if outcome.success {
            succeeded += 1;
            println!(
                "ok   {} ({} chunks)",
                outcome.file_path,
                outcome.chunk_count.unwrap_or(0)
            );
        } else {
            println!(
                "fail {}: {}",
                outcome.file_path,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
    println!("{succeeded}/{} file(s) ingested", outcomes.len());

    if succeeded == 0 {
        bail!("no files were ingested");
    }
    Ok(())
}

fn build_model(cli: &Cli) -> Result<Arc<dyn ChatModel>> {
    if cli.offline {
        return Ok(Arc::new(MockChatModel::new()));
    }
    Ok(Arc::new(
        DashScopeChatModel::from_env()?
            .with_model(&cli.model)
            .with_timeout(Duration::from_secs(cli.timeout)),
    ))
}

async fn ask(cli: &Cli, store: Arc<DocumentStore>, question: Option<String>) -> Result<()> {
    let qa = QaAgent::new(store, build_model(cli)?).with_top_k(cli.top_k);

    if let Some(question) = question {
        println!("{}", qa.ask(&question).await);
        return Ok(());
    }

    println!("Interactive mode. Type a question, or 'quit' to exit.");
    let mut editor = rustyline::DefaultEditor::new()?;
    loop {
        match editor.readline("question> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line.eq_ignore_ascii_case("quit") {
                    break;
                }
                editor.add_history_entry(line)?;
                println!("{}\n", qa.ask(line).await);
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

async fn status(store: Arc<DocumentStore>) -> Result<()> {
    let info = store.info().await?;
    println!("collection '{}': {} chunk(s) stored", info.name, info.count);
    Ok(())
}

async fn clear(store: Arc<DocumentStore>, yes: bool) -> Result<()> {
    if !yes {
        let mut editor = rustyline::DefaultEditor::new()?;
        let answer = editor.readline(&format!(
            "Delete collection '{}' and all stored chunks? (y/N): ",
            store.collection()
        ))?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    store.delete_collection().await?;
    println!("Storage cleared.");
    Ok(())
}
