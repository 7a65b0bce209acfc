use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use log::{debug, warn};
use tokio::sync::broadcast;

use studyplan::ai::{GenerateRequest, GenerativeBackend};
use studyplan::config::{default_config_path, load_config_or_default, Config};
use studyplan::report::report_file_name;
use studyplan::session::{screen_uploads, AssumeYes, Confirm};
use studyplan::{
    resolve_api_key, AiError, FileKeyValueStore, FileStatus, GeminiBackend, LogFormat, RawFile,
    Session, SessionDeps, SessionEvent, SessionHandle, TrackedFile,
};

const ROADMAP_FAILED_MESSAGE: &str =
    "Yol haritası oluşturulurken bir hata oluştu. Lütfen tekrar deneyin.";

#[derive(Parser)]
#[command(name = "studyplan", version, about = "AI study assistant for PDF documents")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze PDF files and wait for the results
    Add {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List tracked files, most recent first
    List,
    /// Show the analysis of one file
    Show { id: String },
    /// Stop tracking a file
    Remove { id: String },
    /// Delete every analysis and the roadmap
    Clear {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Print the topics found across all documents
    Topics,
    /// Print the study roadmap, generating it when there is none
    Roadmap {
        /// Build a new roadmap even if one exists
        #[arg(long)]
        regenerate: bool,
    },
    /// Write the offline HTML report
    Export {
        /// Target directory (defaults to the current directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Stands in when no API key is available, so offline commands still work.
struct UnconfiguredBackend {
    reason: String,
}

#[async_trait]
impl GenerativeBackend for UnconfiguredBackend {
    async fn generate(&self, _request: GenerateRequest) -> Result<Option<String>, AiError> {
        Err(AiError::Transport(self.reason.clone()))
    }
}

struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, question: &str) -> bool {
        print!("{} [e/H] ", question);
        let _ = std::io::stdout().flush();

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(
            answer.trim().to_lowercase().as_str(),
            "e" | "evet" | "y" | "yes"
        )
    }
}

fn build_backend(config: &Config, needs_ai: bool) -> anyhow::Result<Arc<dyn GenerativeBackend>> {
    match resolve_api_key(&config.ai) {
        Ok(key) => Ok(Arc::new(GeminiBackend::new(&config.ai, key)?)),
        Err(e) if needs_ai => Err(e).context("An API key is required for this command"),
        Err(e) => {
            debug!("No API key available: {}", e);
            Ok(Arc::new(UnconfiguredBackend {
                reason: e.to_string(),
            }))
        }
    }
}

fn status_label(status: FileStatus) -> &'static str {
    match status {
        FileStatus::Idle => "bekliyor",
        FileStatus::Uploading => "yükleniyor",
        FileStatus::Analyzing => "analiz ediliyor",
        FileStatus::Completed => "tamamlandı",
        FileStatus::Error => "hata",
    }
}

fn print_file_line(file: &TrackedFile) {
    println!(
        "{}  {:<16} {:>8.2} MB  {}",
        file.id,
        status_label(file.status),
        file.size_in_mb(),
        file.file_name
    );
    if let Some(message) = &file.error_message {
        println!("         {}", message);
    }
}

fn print_file_details(file: &TrackedFile) {
    println!("{} ({})", file.file_name, file.id);
    println!("Dosya Boyutu: {:.2} MB", file.size_in_mb());
    println!("Durum: {}", status_label(file.status));
    if let Some(message) = &file.error_message {
        println!("Hata: {}", message);
    }
    let Some(result) = &file.result else {
        return;
    };

    println!();
    println!("Özet:");
    println!("  {}", result.summary);
    println!();
    println!("Ana Konular:");
    for topic in &result.topics {
        println!("  - {}", topic);
    }
    println!();
    println!("Çalışma Planı:");
    for item in &result.study_plan {
        println!("  [{}] {}: {}", item.priority, item.topic, item.action);
    }
}

async fn print_progress(mut events: broadcast::Receiver<SessionEvent>) {
    loop {
        match events.recv().await {
            Ok(SessionEvent::FileStatusChanged {
                file_name,
                status,
                error_message,
                ..
            }) => match error_message {
                Some(message) => eprintln!("{}: {} ({})", file_name, status_label(status), message),
                None => eprintln!("{}: {}", file_name, status_label(status)),
            },
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(_)) => {}
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn add(session: &SessionHandle, config: &Config, paths: Vec<PathBuf>) -> anyhow::Result<()> {
    let mut payloads = Vec::with_capacity(paths.len());
    for path in &paths {
        payloads.push(RawFile::from_path(path)?);
    }

    let (accepted, rejected) = screen_uploads(&config.upload, payloads);
    for rejection in &rejected {
        eprintln!("{}", rejection);
    }
    if accepted.is_empty() {
        bail!("No file accepted for analysis");
    }

    let progress = tokio::spawn(print_progress(session.subscribe()));
    let ids = session.add_files(accepted).await?;
    let snapshot = session.wait_until_settled().await?;
    progress.abort();

    println!();
    for file in snapshot.files.iter().filter(|f| ids.contains(&f.id)) {
        print_file_line(file);
    }
    Ok(())
}

async fn roadmap(session: &SessionHandle, regenerate: bool) -> anyhow::Result<()> {
    let mut steps = session.snapshot().await?.roadmap;

    if steps.is_empty() || regenerate {
        match session.generate_roadmap().await {
            Ok(Some(new_steps)) => steps = new_steps,
            Ok(None) => {
                println!("Yol haritası için önce en az bir dosyanın analizi tamamlanmalı.");
                return Ok(());
            }
            Err(e) => {
                warn!("{}", e);
                bail!(ROADMAP_FAILED_MESSAGE);
            }
        }
    }

    if steps.is_empty() {
        println!("Yol haritası boş.");
    }
    for step in &steps {
        println!("{} - {}", step.step_name, step.title);
        println!("  {}", step.description);
        if !step.topics.is_empty() {
            println!("  Konular: {}", step.topics.join(", "));
        }
        println!();
    }
    Ok(())
}

async fn export(session: &SessionHandle, output: Option<PathBuf>) -> anyhow::Result<()> {
    let now = chrono::Local::now();
    let html = session.render_report(now.naive_local()).await?;

    let directory = output.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&directory)
        .with_context(|| format!("Failed to create {}", directory.display()))?;
    let path = directory.join(report_file_name(now.date_naive()));
    std::fs::write(&path, html).with_context(|| format!("Failed to write {}", path.display()))?;

    println!("{}", path.display());
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = load_config_or_default(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    let needs_ai = matches!(cli.command, Commands::Add { .. } | Commands::Roadmap { .. });
    let deps = SessionDeps {
        backend: build_backend(&config, needs_ai)?,
        store: Arc::new(FileKeyValueStore::new(config.data_directory())),
    };
    let (session, join) = Session::start(deps);

    let outcome = match cli.command {
        Commands::Add { files } => add(&session, &config, files).await,
        Commands::List => {
            let snapshot = session.snapshot().await?;
            if snapshot.files.is_empty() {
                println!("Henüz dosya yok.");
            }
            for file in &snapshot.files {
                print_file_line(file);
            }
            Ok(())
        }
        Commands::Show { id } => {
            let snapshot = session.snapshot().await?;
            match snapshot.files.iter().find(|f| f.id == id) {
                Some(file) => {
                    print_file_details(file);
                    Ok(())
                }
                None => Err(anyhow::anyhow!("No file with id '{}'", id)),
            }
        }
        Commands::Remove { id } => {
            if session.remove_file(&id).await? {
                Ok(())
            } else {
                Err(anyhow::anyhow!("No file with id '{}'", id))
            }
        }
        Commands::Clear { yes } => {
            let cleared = if yes {
                session.clear_all(&AssumeYes).await?
            } else {
                session.clear_all(&StdinConfirm).await?
            };
            if !cleared {
                println!("Vazgeçildi.");
            }
            Ok(())
        }
        Commands::Topics => {
            let index = session.topic_index().await?;
            println!("Kesin Çalışman Gerekenler:");
            for topic in &index.high_priority_topics {
                println!("  - {}", topic);
            }
            println!();
            println!("Tüm Konu Başlıkları:");
            for topic in &index.all_topics {
                println!("  - {}", topic);
            }
            Ok(())
        }
        Commands::Roadmap { regenerate } => roadmap(&session, regenerate).await,
        Commands::Export { output } => export(&session, output).await,
    };

    session.shutdown()?;
    let _ = join.await;
    outcome
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    if let Err(e) = studyplan::init_logging(format) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
