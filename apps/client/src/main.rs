use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shortlister::config::Config;
use shortlister::endpoints::{ai, applications, jobs, profiles};
use shortlister::models::application::{
    find_application_for_job, rank_applications, Application, ApplicationFilter,
    ApplicationStatus, NewApplication,
};
use shortlister::models::job::{
    EmploymentType, ExperienceLevel, Job, JobFilter, JobQuery, JobStatus,
};
use shortlister::models::profile::ResumeUpload;
use shortlister::navigation::TracingNavigator;
use shortlister::session::types::RecordId;
use shortlister::session::{
    Credentials, FileStore, Registration, Rehydration, Role, SessionManager, VerifyOutcome,
};

#[derive(Parser)]
#[command(name = "shortlister", version, about = "Recruitment dashboard client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, value_enum, default_value_t = RoleArg::Applicant)]
        role: RoleArg,
    },
    /// End the session
    Logout,
    /// Show the stored session and check it against the backend
    Whoami,
    #[command(subcommand)]
    Jobs(JobsCommand),
    #[command(subcommand)]
    Applications(ApplicationsCommand),
    #[command(subcommand)]
    Profile(ProfileCommand),
    #[command(subcommand)]
    Ai(AiCommand),
}

#[derive(Subcommand)]
enum JobsCommand {
    /// List job postings
    List(JobListArgs),
    /// Show one posting
    Get { id: String },
    /// Postings created by the signed-in recruiter
    Mine(JobListArgs),
    Close { id: String },
    Open { id: String },
    Delete { id: String },
}

#[derive(Args)]
struct JobListArgs {
    /// Matches title, company or location
    #[arg(long)]
    search: Option<String>,
    #[arg(long, value_enum)]
    status: Option<StatusArg>,
    #[arg(long, value_enum)]
    level: Option<LevelArg>,
    #[arg(long = "type", value_enum)]
    employment_type: Option<TypeArg>,
    #[arg(long)]
    remote: bool,
}

#[derive(Subcommand)]
enum ApplicationsCommand {
    /// Apply to a job
    Apply {
        job_id: String,
        #[arg(long)]
        cover_letter: Option<String>,
    },
    /// The signed-in applicant's applications
    Mine,
    /// Applications received for a job, best match first
    ForJob {
        job_id: String,
        #[arg(long, value_enum)]
        status: Option<AppStatusArg>,
        #[arg(long)]
        search: Option<String>,
    },
    Shortlisted { job_id: String },
    Get { id: String },
    /// Move an application to a new review status
    Status {
        id: String,
        #[arg(value_enum)]
        status: AppStatusArg,
    },
    Withdraw { id: String },
}

#[derive(Subcommand)]
enum ProfileCommand {
    Show,
    /// Upload a PDF or Word resume for parsing
    UploadResume { path: PathBuf },
}

#[derive(Subcommand)]
enum AiCommand {
    /// Score and shortlist every application for a job
    Shortlist { job_id: String },
    /// Analyze a single application
    Analyze { application_id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Applicant,
    Recruiter,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Applicant => Role::Applicant,
            RoleArg::Recruiter => Role::Recruiter,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Open,
    Closed,
    Draft,
}

impl From<StatusArg> for JobStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Open => JobStatus::Open,
            StatusArg::Closed => JobStatus::Closed,
            StatusArg::Draft => JobStatus::Draft,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LevelArg {
    Entry,
    Junior,
    Mid,
    Senior,
    Lead,
    Executive,
}

impl From<LevelArg> for ExperienceLevel {
    fn from(value: LevelArg) -> Self {
        match value {
            LevelArg::Entry => ExperienceLevel::Entry,
            LevelArg::Junior => ExperienceLevel::Junior,
            LevelArg::Mid => ExperienceLevel::Mid,
            LevelArg::Senior => ExperienceLevel::Senior,
            LevelArg::Lead => ExperienceLevel::Lead,
            LevelArg::Executive => ExperienceLevel::Executive,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TypeArg {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl From<TypeArg> for EmploymentType {
    fn from(value: TypeArg) -> Self {
        match value {
            TypeArg::FullTime => EmploymentType::FullTime,
            TypeArg::PartTime => EmploymentType::PartTime,
            TypeArg::Contract => EmploymentType::Contract,
            TypeArg::Internship => EmploymentType::Internship,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum AppStatusArg {
    Pending,
    Reviewed,
    Shortlisted,
    Rejected,
    Hired,
}

impl From<AppStatusArg> for ApplicationStatus {
    fn from(value: AppStatusArg) -> Self {
        match value {
            AppStatusArg::Pending => ApplicationStatus::Pending,
            AppStatusArg::Reviewed => ApplicationStatus::Reviewed,
            AppStatusArg::Shortlisted => ApplicationStatus::Shortlisted,
            AppStatusArg::Rejected => ApplicationStatus::Rejected,
            AppStatusArg::Hired => ApplicationStatus::Hired,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Using backend {}", config.api_url);

    let store = Arc::new(FileStore::open(&config.session_file)?);
    let manager = SessionManager::new(&config, store, Arc::new(TracingNavigator))?;

    match cli.command {
        Command::Login { email, password } => {
            let user = manager.login(&Credentials::new(email, password)).await?;
            println!("Signed in as {} <{}> ({})", user.name, user.email, user.role);
        }
        Command::Register {
            name,
            email,
            password,
            role,
        } => {
            let registration = Registration {
                name,
                email,
                password,
                role: role.into(),
            };
            let user = manager.register(&registration).await?;
            println!("Welcome, {}! Signed in as {}", user.name, user.role);
        }
        Command::Logout => {
            manager.logout().await;
            println!("Signed out");
        }
        Command::Whoami => whoami(&manager).await,
        Command::Jobs(cmd) => run_jobs(&manager, cmd).await?,
        Command::Applications(cmd) => run_applications(&manager, cmd).await?,
        Command::Profile(cmd) => run_profile(&manager, cmd).await?,
        Command::Ai(cmd) => run_ai(&manager, cmd).await?,
    }

    Ok(())
}

async fn whoami(manager: &SessionManager) {
    let Rehydration::Tentative { user, verification } = manager.initialize().await else {
        println!("Not signed in");
        return;
    };
    println!("{} <{}> ({})", user.name, user.email, user.role);

    match verification.outcome().await {
        VerifyOutcome::Confirmed(_) => println!("Session confirmed"),
        VerifyOutcome::Unverified => println!("Backend unreachable, session not verified"),
        VerifyOutcome::Invalidated | VerifyOutcome::Superseded => {
            println!("Session is no longer valid, please sign in again")
        }
    }
}

fn require_session(manager: &SessionManager) -> Result<()> {
    if !manager.is_authenticated() {
        bail!("Not signed in. Run `shortlister login` first.");
    }
    Ok(())
}

async fn run_jobs(manager: &SessionManager, cmd: JobsCommand) -> Result<()> {
    let api = manager.api();
    match cmd {
        JobsCommand::List(args) => {
            let query = JobQuery {
                status: args.status.map(Into::into),
                ..JobQuery::default()
            };
            let all = jobs::list_jobs(api, &query).await?;
            print_jobs(&job_filter(args).apply(&all));
        }
        JobsCommand::Mine(args) => {
            require_session(manager)?;
            let all = jobs::my_jobs(api).await?;
            print_jobs(&job_filter(args).apply(&all));
        }
        JobsCommand::Get { id } => {
            let job = jobs::get_job(api, &RecordId::from(id.as_str())).await?;
            print_jobs(&[&job]);
            if !job.skills.is_empty() {
                println!("  skills: {}", job.skills.join(", "));
            }
            if !job.description.is_empty() {
                println!("\n{}", job.description);
            }
        }
        JobsCommand::Close { id } => {
            require_session(manager)?;
            let job = jobs::set_job_status(api, &RecordId::from(id.as_str()), JobStatus::Closed).await?;
            println!("Closed {}", job.title);
        }
        JobsCommand::Open { id } => {
            require_session(manager)?;
            let job = jobs::set_job_status(api, &RecordId::from(id.as_str()), JobStatus::Open).await?;
            println!("Reopened {}", job.title);
        }
        JobsCommand::Delete { id } => {
            require_session(manager)?;
            jobs::delete_job(api, &RecordId::from(id.as_str())).await?;
            println!("Deleted job {id}");
        }
    }
    Ok(())
}

fn job_filter(args: JobListArgs) -> JobFilter {
    JobFilter {
        search: args.search,
        status: args.status.map(Into::into),
        experience_level: args.level.map(Into::into),
        employment_type: args.employment_type.map(Into::into),
        remote_only: args.remote,
    }
}

fn print_jobs(jobs: &[&Job]) {
    if jobs.is_empty() {
        println!("No jobs found");
        return;
    }
    for job in jobs {
        println!(
            "{}  {} @ {}  [{:?}]  {}{}  {}",
            job.id,
            job.title,
            job.company.name,
            job.status,
            job.location,
            if job.remote { " (remote)" } else { "" },
            job.salary_display()
        );
    }
}

async fn run_applications(manager: &SessionManager, cmd: ApplicationsCommand) -> Result<()> {
    require_session(manager)?;
    let api = manager.api();
    match cmd {
        ApplicationsCommand::Apply {
            job_id,
            cover_letter,
        } => {
            let job_id = RecordId::from(job_id.as_str());
            let existing = applications::my_applications(api).await?;
            if let Some(app) = find_application_for_job(&existing, &job_id) {
                bail!("Already applied (application {}, {})", app.id, app.status.label());
            }
            let application = applications::apply_for_job(api, &job_id, &NewApplication { cover_letter }).await?;
            println!("Applied: application {}", application.id);
        }
        ApplicationsCommand::Mine => {
            let apps = applications::my_applications(api).await?;
            print_applications(&apps.iter().collect::<Vec<_>>());
        }
        ApplicationsCommand::ForJob {
            job_id,
            status,
            search,
        } => {
            let mut apps = applications::job_applications(api, &RecordId::from(job_id.as_str())).await?;
            rank_applications(&mut apps);
            let filter = ApplicationFilter {
                job_id: None,
                status: status.map(Into::into),
                search,
            };
            print_applications(&filter.apply(&apps));
        }
        ApplicationsCommand::Shortlisted { job_id } => {
            let mut apps =
                applications::shortlisted_applications(api, &RecordId::from(job_id.as_str())).await?;
            rank_applications(&mut apps);
            print_applications(&apps.iter().collect::<Vec<_>>());
        }
        ApplicationsCommand::Get { id } => {
            let app = applications::get_application(api, &RecordId::from(id.as_str())).await?;
            print_applications(&[&app]);
            if let Some(letter) = &app.cover_letter {
                println!("\n{letter}");
            }
            if let Some(insights) = &app.ai_insights {
                for s in &insights.strengths {
                    println!("  + {s}");
                }
                for w in &insights.weaknesses {
                    println!("  - {w}");
                }
                if let Some(r) = &insights.recommendations {
                    println!("  > {r}");
                }
            }
        }
        ApplicationsCommand::Status { id, status } => {
            let app =
                applications::update_status(api, &RecordId::from(id.as_str()), status.into()).await?;
            println!("Application {} is now {}", app.id, app.status.label());
        }
        ApplicationsCommand::Withdraw { id } => {
            applications::delete_application(api, &RecordId::from(id.as_str())).await?;
            println!("Withdrew application {id}");
        }
    }
    Ok(())
}

fn print_applications(apps: &[&Application]) {
    if apps.is_empty() {
        println!("No applications found");
        return;
    }
    for app in apps {
        let who = app
            .applicant_record()
            .map(|a| format!("{} <{}>", a.name, a.email))
            .unwrap_or_default();
        let score = app
            .match_score()
            .map(|s| format!("{s}% match"))
            .unwrap_or_else(|| "not scored".to_string());
        println!(
            "{}  {}  {}  {}  {}",
            app.id,
            app.job_title().unwrap_or("-"),
            who,
            app.status.label(),
            score
        );
    }
}

async fn run_profile(manager: &SessionManager, cmd: ProfileCommand) -> Result<()> {
    require_session(manager)?;
    let api = manager.api();
    match cmd {
        ProfileCommand::Show => {
            let profile = profiles::my_profile(api).await?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
            if let Some(name) = profile.resume.and_then(|r| r.original_name) {
                println!("resume: {name}");
            }
        }
        ProfileCommand::UploadResume { path } => {
            let upload = ResumeUpload::from_path(&path)?;
            let profile = profiles::upload_resume(api, upload).await?;
            println!(
                "Resume uploaded. Parsed {} skills, {} experience entries",
                profile.skills.len(),
                profile.experience.len()
            );
        }
    }
    Ok(())
}

async fn run_ai(manager: &SessionManager, cmd: AiCommand) -> Result<()> {
    require_session(manager)?;
    let api = manager.api();
    match cmd {
        AiCommand::Shortlist { job_id } => {
            ai::trigger_shortlisting(api, &RecordId::from(job_id.as_str())).await?;
            println!("Shortlisting started for job {job_id}");
        }
        AiCommand::Analyze { application_id } => {
            ai::analyze_application(api, &RecordId::from(application_id.as_str())).await?;
            println!("Analysis requested for application {application_id}");
        }
    }
    Ok(())
}
