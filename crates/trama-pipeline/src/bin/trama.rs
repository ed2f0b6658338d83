//! Trama CLI
//!
//! Extract a weighted concept graph from a bilingual (EN/ES) transcript.
//!
//! Usage:
//!   cargo run --bin trama -- lecture.txt
//!   cargo run --bin trama -- lecture.txt --strategy llm --model qwen3:8b
//!   cargo run --bin trama -- lecture.txt --min-freq 1 --output graphs/

use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use trama_core::{defaults, GenerationBackend};
use trama_graph::{to_graphml, to_json_document};
use trama_pipeline::{Pipeline, PipelineConfig, PipelineOutput, Strategy};

#[derive(Debug)]
struct Args {
    transcript: Option<PathBuf>,
    strategy: Strategy,
    backend: String,
    model: Option<String>,
    min_freq: u32,
    max_concepts: usize,
    fuzzy_threshold: u32,
    chunk_chars: usize,
    max_edges: Option<usize>,
    output_dir: PathBuf,
    verbose: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            transcript: None,
            strategy: Strategy::Pattern,
            backend: "ollama".to_string(),
            model: None,
            min_freq: defaults::MIN_FREQ,
            max_concepts: defaults::MAX_CONCEPTS,
            fuzzy_threshold: defaults::FUZZY_THRESHOLD,
            chunk_chars: defaults::CHUNK_CHARS,
            max_edges: None,
            output_dir: PathBuf::from("."),
            verbose: false,
        }
    }
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().collect();
    let mut result = Args::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--strategy" | "-s" => {
                i += 1;
                if i < args.len() {
                    result.strategy = match args[i].parse() {
                        Ok(strategy) => strategy,
                        Err(_) => {
                            eprintln!("Unknown strategy: {}. Using pattern.", args[i]);
                            Strategy::Pattern
                        }
                    };
                }
            }
            "--backend" | "-b" => {
                i += 1;
                if i < args.len() {
                    result.backend = args[i].to_lowercase();
                }
            }
            "--model" | "-m" => {
                i += 1;
                if i < args.len() {
                    result.model = Some(args[i].clone());
                }
            }
            "--min-freq" => {
                i += 1;
                if i < args.len() {
                    result.min_freq = parse_number(&args[i], "--min-freq");
                }
            }
            "--max-concepts" => {
                i += 1;
                if i < args.len() {
                    result.max_concepts = parse_number(&args[i], "--max-concepts");
                }
            }
            "--fuzzy-threshold" => {
                i += 1;
                if i < args.len() {
                    let value: u32 = parse_number(&args[i], "--fuzzy-threshold");
                    if value > 100 {
                        eprintln!("--fuzzy-threshold must be 0-100, got {value}");
                        std::process::exit(2);
                    }
                    result.fuzzy_threshold = value;
                }
            }
            "--chunk-chars" => {
                i += 1;
                if i < args.len() {
                    result.chunk_chars = parse_number(&args[i], "--chunk-chars");
                }
            }
            "--max-edges" => {
                i += 1;
                if i < args.len() {
                    result.max_edges = Some(parse_number(&args[i], "--max-edges"));
                }
            }
            "--output" | "-o" => {
                i += 1;
                if i < args.len() {
                    result.output_dir = PathBuf::from(&args[i]);
                }
            }
            "--verbose" | "-v" => {
                result.verbose = true;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other => {
                if other.starts_with('-') {
                    eprintln!("Unknown option: {other}");
                    print_help();
                    std::process::exit(2);
                }
                result.transcript = Some(PathBuf::from(other));
            }
        }
        i += 1;
    }

    result
}

fn parse_number<T: std::str::FromStr>(value: &str, flag: &str) -> T {
    match value.parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            eprintln!("Invalid value for {flag}: {value}");
            std::process::exit(2);
        }
    }
}

fn print_help() {
    println!(
        r#"
Trama Concept-Graph Extractor

Usage: trama <TRANSCRIPT> [OPTIONS]

Options:
  -s, --strategy <NAME>       Relation strategy: pattern, llm (default: pattern)
  -b, --backend <NAME>        LLM backend: ollama, openai (default: ollama)
  -m, --model <MODEL>         Generation model (default: {gen_model})
      --min-freq <N>          Minimum candidate frequency (default: {min_freq})
      --max-concepts <N>      Maximum canonical concepts (default: {max_concepts})
      --fuzzy-threshold <N>   Merge similarity 0-100 (default: {fuzzy})
      --chunk-chars <N>       Chunk character budget (default: {chunk_chars})
      --max-edges <N>         Keep only the N heaviest edges
  -o, --output <DIR>          Output directory (default: .)
  -v, --verbose               Verbose logging
  -h, --help                  Print help

Outputs:
  concept_graph.json      Node/edge document
  concept_graph.graphml   GraphML for visualization tools
  edges_raw.json          Unmerged per-chunk edges (llm strategy only)

Environment Variables:
  OLLAMA_BASE             Ollama server URL (default: {ollama_url})
  OLLAMA_GEN_MODEL        Ollama model (overridden by --model)
  OPENAI_API_KEY          Required for --backend openai
  OPENAI_BASE             OpenAI-compatible endpoint
  TRAMA_GEN_TIMEOUT_SECS  Per-call timeout (default: {timeout})

Examples:
  trama lecture.txt --min-freq 1
  trama lecture.txt --strategy llm --model qwen3:8b --output graphs/
"#,
        gen_model = defaults::GEN_MODEL,
        min_freq = defaults::MIN_FREQ,
        max_concepts = defaults::MAX_CONCEPTS,
        fuzzy = defaults::FUZZY_THRESHOLD,
        chunk_chars = defaults::CHUNK_CHARS,
        ollama_url = defaults::OLLAMA_URL,
        timeout = defaults::GEN_TIMEOUT_SECS,
    );
}

fn build_backend(args: &Args) -> anyhow::Result<Arc<dyn GenerationBackend>> {
    match args.backend.as_str() {
        "ollama" => build_ollama(args),
        "openai" => build_openai(args),
        other => anyhow::bail!("unknown backend '{other}' (expected 'ollama' or 'openai')"),
    }
}

#[cfg(feature = "ollama")]
fn build_ollama(args: &Args) -> anyhow::Result<Arc<dyn GenerationBackend>> {
    let backend = match &args.model {
        Some(model) => trama_relations::OllamaBackend::from_env_with_model(model.clone()),
        None => trama_relations::OllamaBackend::from_env(),
    };
    Ok(Arc::new(backend))
}

#[cfg(not(feature = "ollama"))]
fn build_ollama(_args: &Args) -> anyhow::Result<Arc<dyn GenerationBackend>> {
    anyhow::bail!("built without the 'ollama' feature")
}

#[cfg(feature = "openai")]
fn build_openai(args: &Args) -> anyhow::Result<Arc<dyn GenerationBackend>> {
    let backend = match &args.model {
        Some(model) => trama_relations::OpenAiBackend::from_env_with_model(model.clone())?,
        None => trama_relations::OpenAiBackend::from_env()?,
    };
    Ok(Arc::new(backend))
}

#[cfg(not(feature = "openai"))]
fn build_openai(_args: &Args) -> anyhow::Result<Arc<dyn GenerationBackend>> {
    anyhow::bail!("built without the 'openai' feature")
}

fn write_outputs(args: &Args, output: &PipelineOutput) -> anyhow::Result<()> {
    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("cannot create output directory {:?}", args.output_dir))?;

    let document = to_json_document(&output.graph, output.strategy);
    let json_path = args.output_dir.join("concept_graph.json");
    fs::write(&json_path, serde_json::to_string_pretty(&document)?)
        .with_context(|| format!("cannot write {json_path:?}"))?;

    let graphml_path = args.output_dir.join("concept_graph.graphml");
    fs::write(&graphml_path, to_graphml(&output.graph))
        .with_context(|| format!("cannot write {graphml_path:?}"))?;

    println!("wrote {}", json_path.display());
    println!("wrote {}", graphml_path.display());

    if output.strategy == "llm" {
        let raw_path = args.output_dir.join("edges_raw.json");
        fs::write(
            &raw_path,
            serde_json::to_string_pretty(&output.observations)?,
        )
        .with_context(|| format!("cannot write {raw_path:?}"))?;
        println!("wrote {}", raw_path.display());
    }

    Ok(())
}

async fn run(args: Args) -> anyhow::Result<()> {
    let transcript_path = args.transcript.clone().ok_or_else(|| {
        anyhow::anyhow!("missing transcript path (run with --help for usage)")
    })?;
    let raw = fs::read_to_string(&transcript_path)
        .with_context(|| format!("cannot read transcript {:?}", transcript_path))?;

    let config = PipelineConfig {
        min_freq: args.min_freq,
        max_concepts: args.max_concepts,
        fuzzy_threshold: args.fuzzy_threshold,
        chunk_chars: args.chunk_chars,
        max_edges: args.max_edges,
    };

    let pipeline = match args.strategy {
        Strategy::Pattern => Pipeline::pattern(config),
        Strategy::Llm => Pipeline::llm(config, build_backend(&args)?),
    };

    let output = pipeline.run(&raw).await?;

    println!(
        "{} chunks, {} concepts, {} observations, {} edges ({} ms)",
        output.stats.chunks,
        output.stats.concepts,
        output.stats.observations,
        output.stats.edges,
        output.stats.duration_ms,
    );
    write_outputs(&args, &output)?;
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = parse_args();

    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Err(error) = run(args).await {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}
