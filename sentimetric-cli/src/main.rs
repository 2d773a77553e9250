//! CLI `sentimetric`: análise de sentimento no terminal

mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sentimetric_core::{
    compare_methods,
    corpus::{labeled_examples, BenchmarkReport},
    remote::DEFAULT_MODEL,
    RemoteAnalyzer, RemoteConfig, SentimentAnalyzer, SentimentResult,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sentimetric", version, about = "Análise de sentimento por léxico, com LLM opcional")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Aumenta a verbosidade dos logs (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analisa um texto
    Analyze {
        /// Texto a analisar (as palavras são unidas por espaço)
        #[arg(required = true)]
        text: Vec<String>,

        /// Também consulta o analisador LLM
        #[arg(long)]
        remote: bool,

        /// Saída em JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        remote_args: RemoteArgs,
    },
    /// Analisa um arquivo com um texto por linha e emite JSON por linha
    Batch {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Usa o analisador LLM (com fallback por regras)
        #[arg(long)]
        remote: bool,

        #[command(flatten)]
        remote_args: RemoteArgs,
    },
    /// Compara regras e LLM para o mesmo texto
    Compare {
        #[arg(required = true)]
        text: Vec<String>,

        #[command(flatten)]
        remote_args: RemoteArgs,
    },
    /// Mede a acurácia sobre o conjunto rotulado
    Benchmark {
        /// Também avalia o analisador LLM
        #[arg(long)]
        remote: bool,

        #[command(flatten)]
        remote_args: RemoteArgs,
    },
}

#[derive(Debug, Clone, Args)]
struct RemoteArgs {
    /// Chave da API do LLM
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Modelo do LLM
    #[arg(long, env = "SENTIMETRIC_MODEL", default_value = DEFAULT_MODEL)]
    model: String,
}

impl RemoteArgs {
    fn config(&self) -> RemoteConfig {
        RemoteConfig {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            ..RemoteConfig::default()
        }
    }

    fn analyzer(&self) -> Result<RemoteAnalyzer> {
        RemoteAnalyzer::new(self.config()).context("análise remota indisponível")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!("Argumentos: {:?}", cli);

    match cli.command {
        Command::Analyze { text, remote, json, remote_args } => {
            analyze(&text.join(" "), remote, json, &remote_args).await
        }
        Command::Batch { file, remote, remote_args } => batch(&file, remote, &remote_args).await,
        Command::Compare { text, remote_args } => {
            let comparison = compare_methods(&text.join(" "), remote_args.config()).await;
            println!("{}", serde_json::to_string_pretty(&comparison)?);
            Ok(())
        }
        Command::Benchmark { remote, remote_args } => benchmark(remote, &remote_args).await,
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

async fn analyze(text: &str, remote: bool, json: bool, remote_args: &RemoteArgs) -> Result<()> {
    let rule_based = SentimentAnalyzer::new().analyze(text);
    let llm = if remote {
        Some(remote_args.analyzer()?.analyze(text).await.into_result())
    } else {
        None
    };

    if json {
        let mut output = serde_json::Map::new();
        output.insert("rule_based".into(), rule_based.to_structured().into());
        if let Some(llm) = &llm {
            output.insert("remote".into(), llm.to_structured().into());
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", report::render_analysis(text, &rule_based, llm.as_ref()));
    }
    Ok(())
}

async fn batch(file: &PathBuf, remote: bool, remote_args: &RemoteArgs) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("falha ao ler {}", file.display()))?;
    let texts: Vec<&str> = content.lines().filter(|line| !line.trim().is_empty()).collect();

    let results: Vec<SentimentResult> = if remote {
        remote_args
            .analyzer()?
            .analyze_batch(&texts)
            .await
            .into_iter()
            .map(|outcome| outcome.into_result())
            .collect()
    } else {
        SentimentAnalyzer::new().analyze_batch(&texts)
    };

    for (text, result) in texts.iter().zip(&results) {
        let mut line = result.to_structured();
        line.insert("text".into(), (*text).into());
        println!("{}", serde_json::to_string(&line)?);
    }
    Ok(())
}

async fn benchmark(remote: bool, remote_args: &RemoteArgs) -> Result<()> {
    let examples = labeled_examples();
    let texts: Vec<&str> = examples.iter().map(|e| e.text.as_str()).collect();

    let rule_results = SentimentAnalyzer::new().analyze_batch(&texts);
    let rule_report = BenchmarkReport::from_results(&examples, &rule_results);
    print!("{}", report::render_benchmark("Rule-Based", &rule_report));

    if !remote {
        return Ok(());
    }

    match remote_args.analyzer() {
        Ok(analyzer) => {
            let remote_results: Vec<SentimentResult> = analyzer
                .analyze_batch(&texts)
                .await
                .into_iter()
                .map(|outcome| outcome.into_result())
                .collect();
            let remote_report = BenchmarkReport::from_results(&examples, &remote_results);
            print!("{}", report::render_benchmark("LLM", &remote_report));
            print!("{}", report::render_comparison(&rule_report, &remote_report));
        }
        Err(e) => warn!("Não foi possível avaliar o LLM: {:#}", e),
    }
    Ok(())
}
