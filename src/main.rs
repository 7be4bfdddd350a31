// src/main.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use recruit_client::workflow::{
    ScreenWorkflow, SearchWorkflow, TailorWorkflow, UploadWorkflow,
};
use recruit_client::{
    Endpoint, ResumeFile, ResumeRegistry, ResumeSource, ServiceClient, StateSink, WorkflowEvent,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "hireflow", about = "Client for the AI-assisted recruiting service")]
struct Cli {
    /// Base URL of the recruiting service (defaults to HIREFLOW_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a resume PDF into the registry
    Upload {
        file: PathBuf,
    },
    /// Search and rank stored candidates against a job description
    Search {
        #[command(flatten)]
        job: JobInput,
    },
    /// Screen one stored resume against a job description
    Screen {
        #[command(flatten)]
        job: JobInput,
        /// Filename of a stored resume
        #[arg(long)]
        resume: String,
    },
    /// Tailor a resume to a job description and export the PDF
    Tailor {
        #[command(flatten)]
        job: JobInput,
        /// Use a stored resume by filename
        #[arg(long, conflicts_with = "file")]
        resume: Option<String>,
        /// Upload a local resume PDF instead
        #[arg(long)]
        file: Option<PathBuf>,
        /// Where to write the tailored PDF
        #[arg(long, default_value = "tailored_resume.pdf")]
        out: PathBuf,
    },
    /// List stored resumes
    Resumes,
    /// Download a stored resume
    Download {
        filename: String,
        /// Where to write the file (defaults to the resume filename)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args)]
struct JobInput {
    /// Job description text
    #[arg(long, conflicts_with = "job_file")]
    job: Option<String>,
    /// Read the job description from a file
    #[arg(long)]
    job_file: Option<PathBuf>,
}

impl JobInput {
    async fn resolve(&self) -> Result<String> {
        match (&self.job, &self.job_file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read job description: {}", path.display())),
            (None, None) => anyhow::bail!("Provide --job or --job-file"),
        }
    }
}

/// Prints workflow notifications to the terminal.
struct ConsoleSink;

impl StateSink for ConsoleSink {
    fn emit(&self, event: WorkflowEvent) {
        match event {
            WorkflowEvent::Notice(message) => println!("✓ {message}"),
            WorkflowEvent::Failure(message) => eprintln!("✗ {message}"),
            WorkflowEvent::Phase(_) => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let endpoint = match &cli.api_url {
        Some(raw) => Endpoint::new(raw),
        None => Endpoint::from_env(),
    };
    let client = Arc::new(ServiceClient::new(endpoint)?);

    match cli.command {
        Command::Upload { file } => run_upload(client, &file).await,
        Command::Search { job } => run_search(client, &job.resolve().await?).await,
        Command::Screen { job, resume } => {
            run_screen(client, &job.resolve().await?, &resume).await
        }
        Command::Tailor {
            job,
            resume,
            file,
            out,
        } => run_tailor(client, &job.resolve().await?, resume, file, &out).await,
        Command::Resumes => run_resumes(client).await,
        Command::Download { filename, out } => run_download(client, &filename, out).await,
    }
}

async fn read_resume_file(path: &Path) -> Result<ResumeFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("resume.pdf")
        .to_string();
    Ok(ResumeFile::new(file_name, bytes))
}

async fn run_upload(client: Arc<ServiceClient>, path: &Path) -> Result<()> {
    let file = read_resume_file(path).await?;

    let workflow = UploadWorkflow::new(client);
    workflow.subscribe(Arc::new(ConsoleSink));
    workflow.submit(file).await;

    let state = workflow.snapshot();
    match state.result {
        Some(result) => {
            println!("{}", result.message);
            Ok(())
        }
        None => anyhow::bail!(state.error.unwrap_or_else(|| "Upload failed".to_string())),
    }
}

async fn run_search(client: Arc<ServiceClient>, job_description: &str) -> Result<()> {
    let workflow = SearchWorkflow::new(client);
    workflow.subscribe(Arc::new(ConsoleSink));
    workflow.submit(job_description).await;

    let state = workflow.snapshot();
    let outcome = match state.outcome {
        Some(outcome) => outcome,
        None => anyhow::bail!(state.error.unwrap_or_else(|| "Search failed".to_string())),
    };

    for candidate in &outcome.candidates {
        println!(
            "#{} {} ({}) - score {}",
            candidate.rank,
            candidate.display_name(),
            candidate.filename,
            candidate.score
        );
        if !candidate.reasoning.is_empty() {
            println!("   {}", candidate.reasoning);
        }
    }
    if let Some(message) = &outcome.message {
        if !outcome.is_empty() {
            println!("{message}");
        }
    }
    Ok(())
}

async fn run_screen(
    client: Arc<ServiceClient>,
    job_description: &str,
    resume: &str,
) -> Result<()> {
    let workflow = ScreenWorkflow::new(client);
    workflow.subscribe(Arc::new(ConsoleSink));
    workflow.submit(job_description, resume).await;

    let state = workflow.snapshot();
    let result = match state.result {
        Some(result) => result,
        None => anyhow::bail!(state.error.unwrap_or_else(|| "Screening failed".to_string())),
    };

    println!("Resume:  {}", result.resume_filename);
    println!("Score:   {}/100 ({})", result.score, result.tier.label());
    println!("Status:  {}", result.match_status);
    if !result.missing_skills.is_empty() {
        println!("Missing: {}", result.missing_skills.join(", "));
    }
    println!("{}", result.reasoning);
    Ok(())
}

async fn run_tailor(
    client: Arc<ServiceClient>,
    job_description: &str,
    resume: Option<String>,
    file: Option<PathBuf>,
    out: &Path,
) -> Result<()> {
    let source = match (resume, file) {
        (Some(filename), None) => ResumeSource::Library(filename),
        (None, Some(path)) => ResumeSource::Upload(read_resume_file(&path).await?),
        _ => anyhow::bail!("Provide exactly one of --resume or --file"),
    };

    let workflow = TailorWorkflow::new(client);
    workflow.subscribe(Arc::new(ConsoleSink));
    workflow.set_job_description(job_description);
    workflow.set_source(Some(source));

    workflow.generate_preview().await;
    let state = workflow.snapshot();
    let draft = match state.draft {
        Some(draft) => draft,
        None => anyhow::bail!(state.error.unwrap_or_else(|| "Tailoring failed".to_string())),
    };
    println!("{}", draft.tailored_text);

    let bytes = match workflow.export_pdf().await {
        Some(bytes) => bytes,
        None => {
            let state = workflow.snapshot();
            anyhow::bail!(state.error.unwrap_or_else(|| "Export failed".to_string()))
        }
    };
    tokio::fs::write(out, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", out.display()))?;
    println!("Wrote {}", out.display());
    Ok(())
}

async fn run_resumes(client: Arc<ServiceClient>) -> Result<()> {
    let registry = ResumeRegistry::new(client);
    let resumes = registry.list().await?;
    if resumes.is_empty() {
        println!("No resumes uploaded yet");
        return Ok(());
    }
    for name in &resumes {
        println!("{name}");
    }
    println!("{} resumes", resumes.len());
    Ok(())
}

async fn run_download(
    client: Arc<ServiceClient>,
    filename: &str,
    out: Option<PathBuf>,
) -> Result<()> {
    let bytes = client.download_resume(filename, None).await?;
    let out = out.unwrap_or_else(|| PathBuf::from(filename));
    tokio::fs::write(&out, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", out.display()))?;
    println!("Wrote {} ({} bytes)", out.display(), bytes.len());
    Ok(())
}
