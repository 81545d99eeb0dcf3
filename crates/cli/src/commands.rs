//! CLI commands

use anyhow::{Context as _, Result, bail};
use bytes::Bytes;
use clap::{Args, Subcommand};
use jobllama_http::client::FileCookieJar;
use jobllama_http::client::resumes::content_type_for;
use jobllama_http::types::{
    AvailabilityField, CoverLetterStatus, CreateJobFlowRequest, GenerateCoverLetterRequest,
    JobFlowSource, JobFlowStatus, JobQueryStatus, ListParams, Pagination, ResumeStatus,
};
use jobllama_http::{AuthenticatedClient, TokenStore};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::{self, CliConfig};
use crate::state_dir::StateDir;

/// Resolved state directory and configuration shared by all commands
pub struct Context {
    state: StateDir,
    config: CliConfig,
    config_path: PathBuf,
}

impl Context {
    /// Load configuration from `config_path`, or the state directory's default file
    pub fn load(state: StateDir, config_path: Option<PathBuf>) -> Result<Self> {
        let (config_path, required) = match config_path {
            Some(path) => (path, true),
            None => (state.config_path(), false),
        };
        let config = CliConfig::load(&config_path, required)?;
        debug!(api_url = %config.api_url, config = %config_path.display(), "Configuration loaded");

        Ok(Self {
            state,
            config,
            config_path,
        })
    }

    fn cookie_path(&self) -> PathBuf {
        self.config.cookie_path(self.state.cookie_path())
    }

    /// Authenticated client whose session lives in the cookie file
    fn client(&self) -> Result<AuthenticatedClient> {
        let tokens = TokenStore::new(FileCookieJar::new(self.cookie_path()));
        let client = self
            .config
            .client_config()
            .builder()?
            .build_authenticated(tokens)?;
        Ok(client)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in, sign up and manage the stored session
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// Manage uploaded résumés
    Resumes {
        #[command(subcommand)]
        command: ResumeCommands,
    },

    /// Manage cover letters
    CoverLetters {
        #[command(subcommand)]
        command: CoverLetterCommands,
    },

    /// Manage job search queries
    JobQueries {
        #[command(subcommand)]
        command: JobQueryCommands,
    },

    /// Manage job flows
    Flows {
        #[command(subcommand)]
        command: FlowCommands,
    },

    /// Show or generate the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in with a username or email
    Signin {
        #[arg(long)]
        login: String,

        #[arg(long, env = "JOBLLAMA_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and sign in
    Signup {
        #[arg(long)]
        email: String,

        #[arg(long)]
        username: String,

        #[arg(long, env = "JOBLLAMA_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Check whether an email or username is still free
    Check {
        /// `email` or `username`
        field: AvailabilityField,

        value: String,
    },

    /// Forget the stored session
    Signout,

    /// Show whether a session is stored
    Status,
}

#[derive(Subcommand)]
pub enum ResumeCommands {
    List {
        #[command(flatten)]
        page: PageArgs,

        /// Only show résumés with this status
        #[arg(long)]
        status: Option<ResumeStatus>,
    },

    /// Download the original file
    Download {
        id: String,

        /// Output file (defaults to resume-<id>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Upload a PDF, DOC or DOCX file
    Upload { file: PathBuf },

    /// Change a résumé's status
    Status { id: String, status: ResumeStatus },

    Delete { id: String },
}

#[derive(Subcommand)]
pub enum CoverLetterCommands {
    List {
        #[command(flatten)]
        page: PageArgs,

        #[arg(long)]
        status: Option<CoverLetterStatus>,
    },

    /// Print a cover letter as JSON
    Show { id: String },

    Status {
        id: String,
        status: CoverLetterStatus,
    },

    Delete { id: String },

    /// Draft one section of a cover letter from a résumé
    Generate {
        #[arg(long)]
        resume_id: String,

        #[arg(long)]
        prompt: String,

        /// Section to draft: introduction, body_part_1, body_part_2 or conclusion
        #[arg(long, default_value = "introduction")]
        section: String,
    },
}

#[derive(Subcommand)]
pub enum JobQueryCommands {
    List {
        #[command(flatten)]
        page: PageArgs,

        #[arg(long)]
        status: Option<JobQueryStatus>,
    },

    /// Print a job query as JSON
    Show { id: String },

    Status { id: String, status: JobQueryStatus },

    Delete { id: String },

    /// Suggest search keywords for a résumé
    Keywords {
        #[arg(long)]
        resume_id: String,
    },
}

#[derive(Subcommand)]
pub enum FlowCommands {
    List {
        #[command(flatten)]
        page: PageArgs,

        #[arg(long)]
        status: Option<JobFlowStatus>,
    },

    /// Tie a résumé, cover letter and job query together
    Create {
        #[arg(long)]
        resume_id: String,

        #[arg(long)]
        cover_letter_id: String,

        #[arg(long)]
        job_query_id: String,

        #[arg(long, default_value = "linkedin")]
        source: JobFlowSource,

        #[arg(long, default_value = "active")]
        status: JobFlowStatus,
    },

    Status { id: String, status: JobFlowStatus },

    Delete { id: String },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Output file path (defaults to the active config path)
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone, Copy)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1)]
    page: u32,

    #[arg(long, default_value_t = 10)]
    per_page: u32,
}

impl PageArgs {
    fn params<S>(self, status: Option<S>) -> ListParams<S> {
        ListParams {
            page: self.page,
            per_page: self.per_page,
            status,
        }
    }
}

impl Commands {
    pub async fn execute(self, context: &Context) -> Result<()> {
        match self {
            Commands::Config { command } => command.execute(context).await,
            Commands::Auth { command } => command.execute(context).await,
            Commands::Resumes { command } => command.execute(&context.client()?).await,
            Commands::CoverLetters { command } => command.execute(&context.client()?).await,
            Commands::JobQueries { command } => command.execute(&context.client()?).await,
            Commands::Flows { command } => command.execute(&context.client()?).await,
        }
    }
}

impl AuthCommands {
    pub async fn execute(self, context: &Context) -> Result<()> {
        let client = context.client()?;

        match self {
            AuthCommands::Signin { login, password } => {
                let response = client.sign_in(&login, &password).await?;
                info!("Signed in as {login}");
                println!("Signed in as {login}");
                if let Some(message) = response.message {
                    println!("{message}");
                }
            }
            AuthCommands::Signup {
                email,
                username,
                password,
            } => {
                client.sign_up(&email, &username, &password).await?;
                info!("Signed up as {username}");
                println!("Account created, signed in as {username}");
            }
            AuthCommands::Check { field, value } => {
                let response = client
                    .to_public()
                    .check_availability(field, &value)
                    .await?;
                let verdict = if response.is_available {
                    "available"
                } else {
                    "taken"
                };
                println!("{field} {value:?} is {verdict}");
                if let Some(message) = response.message {
                    println!("{message}");
                }
            }
            AuthCommands::Signout => {
                client.sign_out()?;
                println!("Signed out");
            }
            AuthCommands::Status => {
                if client.has_session() {
                    println!("Signed in");
                } else {
                    println!("Not signed in");
                }
                println!("Session file: {}", context.cookie_path().display());
            }
        }

        Ok(())
    }
}

impl ResumeCommands {
    pub async fn execute(self, client: &AuthenticatedClient) -> Result<()> {
        match self {
            ResumeCommands::List { page, status } => {
                let page = client.list_resumes(&page.params(status)).await?;
                for resume in &page.list {
                    let score = resume
                        .scoring
                        .map(|scoring| format!("{:.1}", scoring.total))
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{}\t{}\t{}\t{}",
                        resume.id, resume.status, score, resume.filename
                    );
                }
                print_pagination(&page.pagination);
            }
            ResumeCommands::Download { id, output } => {
                let bytes = client.download_resume(&id).await?;
                let output = output.unwrap_or_else(|| PathBuf::from(format!("resume-{id}")));
                tokio::fs::write(&output, &bytes)
                    .await
                    .with_context(|| format!("Failed to write {}", output.display()))?;
                println!("Saved {} bytes to {}", bytes.len(), output.display());
            }
            ResumeCommands::Upload { file } => {
                let (filename, content_type) = upload_metadata(&file)?;
                let contents = tokio::fs::read(&file)
                    .await
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                client
                    .upload_resume(&filename, content_type, Bytes::from(contents))
                    .await?;
                println!("Uploaded {filename}");
            }
            ResumeCommands::Status { id, status } => {
                client.update_resume_status(&id, status).await?;
                println!("Résumé {id} is now {status}");
            }
            ResumeCommands::Delete { id } => {
                client.delete_resume(&id).await?;
                println!("Deleted résumé {id}");
            }
        }
        Ok(())
    }
}

impl CoverLetterCommands {
    pub async fn execute(self, client: &AuthenticatedClient) -> Result<()> {
        match self {
            CoverLetterCommands::List { page, status } => {
                let page = client.list_cover_letters(&page.params(status)).await?;
                for letter in &page.list {
                    println!("{}\t{}\t{}", letter.id, letter.status, letter.name);
                }
                print_pagination(&page.pagination);
            }
            CoverLetterCommands::Show { id } => {
                print_json(&client.get_cover_letter(&id).await?)?;
            }
            CoverLetterCommands::Status { id, status } => {
                client.update_cover_letter_status(&id, status).await?;
                println!("Cover letter {id} is now {status}");
            }
            CoverLetterCommands::Delete { id } => {
                client.delete_cover_letter(&id).await?;
                println!("Deleted cover letter {id}");
            }
            CoverLetterCommands::Generate {
                resume_id,
                prompt,
                section,
            } => {
                let generated = client
                    .generate_cover_letter_text(&GenerateCoverLetterRequest {
                        resume_id,
                        prompt,
                        content_type: section,
                    })
                    .await?;
                println!("{}", generated.text);
            }
        }
        Ok(())
    }
}

impl JobQueryCommands {
    pub async fn execute(self, client: &AuthenticatedClient) -> Result<()> {
        match self {
            JobQueryCommands::List { page, status } => {
                let page = client.list_job_queries(&page.params(status)).await?;
                for query in &page.list {
                    println!("{}\t{}\t{}\t{}", query.id, query.status, query.name, query.query);
                }
                print_pagination(&page.pagination);
            }
            JobQueryCommands::Show { id } => {
                print_json(&client.get_job_query(&id).await?)?;
            }
            JobQueryCommands::Status { id, status } => {
                client.update_job_query_status(&id, status).await?;
                println!("Job query {id} is now {status}");
            }
            JobQueryCommands::Delete { id } => {
                client.delete_job_query(&id).await?;
                println!("Deleted job query {id}");
            }
            JobQueryCommands::Keywords { resume_id } => {
                let response = client.generate_job_query_keywords(&resume_id).await?;
                print_json(&response.keywords)?;
            }
        }
        Ok(())
    }
}

impl FlowCommands {
    pub async fn execute(self, client: &AuthenticatedClient) -> Result<()> {
        match self {
            FlowCommands::List { page, status } => {
                let page = client.list_job_flows(&page.params(status)).await?;
                for flow in &page.list {
                    println!(
                        "{}\t{}\t{}\t{} / {} / {}",
                        flow.id,
                        flow.status,
                        flow.source,
                        flow.resume.filename,
                        flow.cover_letter.name,
                        flow.job_query.name
                    );
                }
                print_pagination(&page.pagination);
            }
            FlowCommands::Create {
                resume_id,
                cover_letter_id,
                job_query_id,
                source,
                status,
            } => {
                let flow = client
                    .create_job_flow(&CreateJobFlowRequest {
                        resume_id,
                        cover_letter_id,
                        job_query_id,
                        source,
                        status,
                    })
                    .await?;
                println!("Created job flow {}", flow.id);
            }
            FlowCommands::Status { id, status } => {
                client.update_job_flow_status(&id, status).await?;
                println!("Job flow {id} is now {status}");
            }
            FlowCommands::Delete { id } => {
                client.delete_job_flow(&id).await?;
                println!("Deleted job flow {id}");
            }
        }
        Ok(())
    }
}

impl ConfigCommands {
    pub async fn execute(self, context: &Context) -> Result<()> {
        match self {
            ConfigCommands::Show => {
                println!("# {}", context.config_path.display());
                print!("{}", context.config.to_toml()?);
                println!("# session file: {}", context.cookie_path().display());
            }
            ConfigCommands::Init { output, force } => {
                let config_path = output.unwrap_or_else(|| context.config_path.clone());
                if config_path.exists() && !force {
                    bail!(
                        "{} already exists, pass --force to overwrite",
                        config_path.display()
                    );
                }

                context.state.create_directories().await?;
                config::generate_default_config(&config_path)?;
                info!("Generated configuration at {}", config_path.display());
                println!("Configuration written to {}", config_path.display());
            }
        }
        Ok(())
    }
}

/// File name and content type for a résumé upload
fn upload_metadata(path: &Path) -> Result<(String, &'static str)> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Not a file path: {}", path.display()))?
        .to_string();
    let Some(content_type) = content_type_for(&filename) else {
        bail!("Only PDF, DOC, and DOCX files are allowed: {filename}");
    };
    Ok((filename, content_type))
}

fn print_pagination(pagination: &Pagination) {
    println!(
        "-- page {}/{} ({} total)",
        pagination.current_page,
        pagination.page_count(),
        pagination.total
    );
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Commands,
    }

    #[test]
    fn test_upload_metadata_detects_content_type() {
        let (filename, content_type) = upload_metadata(Path::new("/tmp/CV.DOCX")).unwrap();
        assert_eq!(filename, "CV.DOCX");
        assert_eq!(
            content_type,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );

        assert!(upload_metadata(Path::new("notes.txt")).is_err());
    }

    #[test]
    fn test_page_args_build_params() {
        let args = PageArgs {
            page: 3,
            per_page: 25,
        };
        let params = args.params(Some(JobFlowStatus::Paused));
        assert_eq!(params.page, 3);
        assert_eq!(params.per_page, 25);
        assert_eq!(params.status, Some(JobFlowStatus::Paused));
    }

    #[test]
    fn test_status_arguments_parse() {
        let cli = TestCli::try_parse_from(["jobllama", "flows", "status", "f-1", "paused"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Flows {
                command: FlowCommands::Status {
                    status: JobFlowStatus::Paused,
                    ..
                }
            }
        ));

        let result = TestCli::try_parse_from(["jobllama", "resumes", "status", "r-1", "shredded"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_parses_field() {
        let cli =
            TestCli::try_parse_from(["jobllama", "auth", "check", "username", "ada"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Auth {
                command: AuthCommands::Check {
                    field: AvailabilityField::Username,
                    ..
                }
            }
        ));
    }
}
