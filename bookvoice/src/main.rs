//! bookvoice - Convert DOCX, EPUB, and Markdown documents to audiobooks.

mod audio;
mod config;
mod document;
mod error;
mod segment;
mod text;
mod tts;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::BookvoiceConfig;
use indicatif::{ProgressBar, ProgressStyle};
use log::{LevelFilter, info};
use segment::Chapter;
use std::path::{Path, PathBuf};
use tts::{TtsBackend, TtsOptions};

#[derive(Parser, Debug)]
#[command(name = "bookvoice")]
#[command(about = "Convert DOCX, EPUB, and Markdown documents to audiobooks", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the input document (.docx, .epub, .md)
    input_file: Option<PathBuf>,

    /// Directory for generated audio files
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// TTS voice (default from config, usually "nova")
    #[arg(long)]
    voice: Option<String>,

    /// Maximum characters per synthesis request
    #[arg(long)]
    max_chunk_chars: Option<usize>,

    /// Detect chapters and list them without generating audio
    #[arg(long)]
    dry_run: bool,

    /// Log the exact synthesis input for every chunk to a debug file.
    /// Combined with --dry-run, writes the log without calling the API.
    #[arg(long)]
    debug_synthesis: bool,

    /// Enable detailed debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Show only warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set default voice
    SetVoice {
        /// Voice name (e.g. nova, onyx, shimmer)
        voice: String,
    },
    /// Set maximum characters per synthesis request
    SetChunkSize {
        /// Character count (must be positive)
        chars: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    if let Some(Commands::Config { action }) = &args.command {
        return handle_config_command(action);
    }

    let input_path = args.input_file.clone().ok_or_else(|| {
        anyhow::anyhow!("input file path is required. Run 'bookvoice --help' for usage.")
    })?;
    if !input_path.exists() {
        anyhow::bail!("input file not found: {}", input_path.display());
    }

    let config = BookvoiceConfig::load().context("failed to load configuration")?;

    let voice = args.voice.clone().unwrap_or_else(|| config.voice.clone());
    if !tts::VOICES.contains(&voice.as_str()) {
        anyhow::bail!(
            "unknown voice '{}' (expected one of: {})",
            voice,
            tts::VOICES.join(", ")
        );
    }

    let max_chunk_chars = args.max_chunk_chars.unwrap_or(config.max_chunk_chars);
    if max_chunk_chars == 0 {
        anyhow::bail!("max chunk size must be positive");
    }

    info!("loading {}", input_path.display());
    let document = document::load(&input_path)
        .with_context(|| format!("failed to load {}", input_path.display()))?;
    if let Some(summary) = document.metadata_summary() {
        info!("{}", summary);
    }
    let chapters = segment::segment(&document).context("failed to detect chapters")?;
    info!("detected {} chapters", chapters.len());

    let options = TtsOptions::new().with_voice(voice);

    if args.dry_run {
        print_chapter_listing(&chapters);
        if args.debug_synthesis {
            std::fs::create_dir_all(&args.output_dir)?;
            let log_path =
                write_synthesis_debug_log(&chapters, &options, max_chunk_chars, &args.output_dir)?;
            info!("synthesis debug info logged to {}", log_path.display());
        }
        return Ok(());
    }

    // The key is only needed once we actually synthesize
    let api_key = config.resolve_api_key()?;
    let backend = tts::create_backend(api_key)?;
    info!("using voice: {}", options.voice);

    if !audio::is_ffmpeg_available() {
        anyhow::bail!("ffmpeg not found on PATH; it is required for audio assembly");
    }

    std::fs::create_dir_all(&args.output_dir)?;
    let stem = input_path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let chapters_dir = args.output_dir.join(format!("{}_chapters", stem));
    std::fs::create_dir_all(&chapters_dir)?;

    if args.debug_synthesis {
        let log_path =
            write_synthesis_debug_log(&chapters, &options, max_chunk_chars, &args.output_dir)?;
        info!("synthesis debug info logged to {}", log_path.display());
    }

    let chapter_files = synthesize_chapters(
        &chapters,
        backend.as_ref(),
        &options,
        max_chunk_chars,
        &chapters_dir,
    )
    .await?;

    let combined_path = args.output_dir.join(format!("{}_full.mp3", stem));
    let file_refs: Vec<&Path> = chapter_files.iter().map(|p| p.as_path()).collect();
    audio::concatenate_audio_files(&file_refs, &combined_path)
        .context("failed to combine chapter audio")?;

    eprintln!(
        "Done: {} chapter files in {}, combined audiobook at {}",
        chapter_files.len(),
        chapters_dir.display(),
        combined_path.display()
    );

    Ok(())
}

/// Synthesize every chapter chunk by chunk and assemble one MP3 per chapter.
async fn synthesize_chapters(
    chapters: &[Chapter],
    backend: &dyn TtsBackend,
    options: &TtsOptions,
    max_chunk_chars: usize,
    chapters_dir: &Path,
) -> Result<Vec<PathBuf>> {
    // Chunk everything up front so the progress bar knows the total
    let chunked: Vec<(usize, Vec<text::TextChunk>)> = chapters
        .iter()
        .map(|chapter| {
            let chunks =
                text::chunker::chunk_chapter(chapter.index, &speech_text(chapter), max_chunk_chars);
            (chapter.index, chunks)
        })
        .collect();

    let total_chunks: usize = chunked.iter().map(|(_, chunks)| chunks.len()).sum();
    info!("synthesizing {} chunks", total_chunks);

    let pb = ProgressBar::new(total_chunks as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let scratch = tempfile::TempDir::new()?;
    let mut chapter_files = Vec::with_capacity(chapters.len());

    for (chapter, (chapter_index, chunks)) in chapters.iter().zip(&chunked) {
        pb.set_message(chapter.title.clone());

        let mut chunk_paths = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let bytes = backend
                .synthesize_with_retry(&chunk.text, options, 3)
                .await
                .with_context(|| {
                    format!(
                        "failed to synthesize chapter {} chunk {}",
                        chapter_index, chunk.sequence
                    )
                })?;

            let chunk_path = scratch
                .path()
                .join(format!("ch{:03}_ck{:03}.mp3", chapter_index, chunk.sequence));
            std::fs::write(&chunk_path, &bytes)?;
            chunk_paths.push(chunk_path);
            pb.inc(1);
        }

        let chapter_file = chapters_dir.join(format!(
            "{:03}_{}.mp3",
            chapter_index + 1,
            audio::sanitize_title(&chapter.title)
        ));
        let chunk_refs: Vec<&Path> = chunk_paths.iter().map(|p| p.as_path()).collect();
        audio::concatenate_audio_files(&chunk_refs, &chapter_file)
            .with_context(|| format!("failed to assemble chapter {}", chapter_index))?;
        chapter_files.push(chapter_file);
    }

    pb.finish_with_message("synthesis complete");
    Ok(chapter_files)
}

/// Text actually sent to synthesis for a chapter: the title is read first,
/// with a pause, so listeners hear where they are.
fn speech_text(chapter: &Chapter) -> String {
    format!("{}.\n\n{}", chapter.title, chapter.text)
}

/// Write the exact per-chunk synthesis input to `synthesis_debug.log` in
/// the output directory, so request content can be inspected without (or
/// alongside) API calls.
fn write_synthesis_debug_log(
    chapters: &[Chapter],
    options: &TtsOptions,
    max_chunk_chars: usize,
    output_dir: &Path,
) -> Result<PathBuf> {
    use std::fmt::Write;

    let mut log = String::new();
    writeln!(log, "voice: {}", options.voice)?;
    writeln!(log, "model: {}", options.model)?;
    writeln!(log, "max chunk chars: {}", max_chunk_chars)?;

    for chapter in chapters {
        let chunks = text::chunker::chunk_chapter(chapter.index, &speech_text(chapter), max_chunk_chars);
        for chunk in &chunks {
            writeln!(log)?;
            writeln!(
                log,
                "=== chapter {} ({}) chunk {}/{} [{} chars] ===",
                chapter.index + 1,
                chapter.title,
                chunk.sequence + 1,
                chunks.len(),
                chunk.text.chars().count()
            )?;
            writeln!(log, "{}", chunk.text)?;
        }
    }

    let path = output_dir.join("synthesis_debug.log");
    std::fs::write(&path, log)?;
    Ok(path)
}

/// Print the dry-run chapter listing with short content previews.
fn print_chapter_listing(chapters: &[Chapter]) {
    println!("Detected {} chapters:", chapters.len());
    for chapter in chapters {
        let preview: String = chapter.text.chars().take(100).collect();
        let preview = preview.replace('\n', " ");
        println!("  {}. {} (Preview: {}...)", chapter.index + 1, chapter.title, preview);
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = BookvoiceConfig::load()?;
            println!("Configuration file: {:?}", BookvoiceConfig::config_path()?);
            println!();
            match &config.api_key {
                Some(key) => println!("api_key = \"{}\"", config::mask_api_key(key)),
                None => println!("api_key = (none, using OPENAI_API_KEY)"),
            }
            println!("voice = \"{}\"", config.voice);
            println!("max_chunk_chars = {}", config.max_chunk_chars);
        }
        ConfigAction::SetVoice { voice } => {
            if !tts::VOICES.contains(&voice.as_str()) {
                anyhow::bail!(
                    "unknown voice '{}' (expected one of: {})",
                    voice,
                    tts::VOICES.join(", ")
                );
            }
            let mut config = BookvoiceConfig::load()?;
            config.voice = voice.clone();
            config.save()?;
            println!("Default voice set to: {}", voice);
        }
        ConfigAction::SetChunkSize { chars } => {
            if *chars == 0 {
                anyhow::bail!("chunk size must be positive");
            }
            let mut config = BookvoiceConfig::load()?;
            config.max_chunk_chars = *chars;
            config.save()?;
            println!("Max chunk size set to: {}", chars);
        }
    }
    Ok(())
}
