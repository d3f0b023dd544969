use crate::infra::{
    parse_answer, parse_date, parse_esg_category, parse_risk_category, parse_token, print_json,
    CarbonView, ProfileView,
};
use crate::{render, server};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use esg_auditor::assessment::{Answer, AnswerState, DiagnosticStep};
use esg_auditor::carbon::EmissionSource;
use esg_auditor::config::AppConfig;
use esg_auditor::error::AppError;
use esg_auditor::portfolio::{
    rank_risks, snapshot_kpis, ActionDraft, EsgCategory, KpiDraft, RiskCategory, RiskDraft,
};
use esg_auditor::store::JsonFileStore;
use esg_auditor::telemetry;
use esg_auditor::workspace::AuditorWorkspace;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "ESG Auditor",
    about = "Run the ESG self-assessment from the command line or as a local HTTP service",
    version
)]
struct Cli {
    /// JSON file backing the workspace (overrides AUDITOR_STORE_PATH)
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Show, sign in or sign out the company profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
    /// Answer the questionnaire and inspect scores
    Diagnostic {
        #[command(subcommand)]
        command: DiagnosticCommand,
    },
    /// Record activity data and compute the carbon footprint
    Carbon {
        #[command(subcommand)]
        command: CarbonCommand,
    },
    /// Maintain the risk register
    Risk {
        #[command(subcommand)]
        command: RiskCommand,
    },
    /// Maintain KPIs and their targets
    Kpi {
        #[command(subcommand)]
        command: KpiCommand,
    },
    /// Maintain the action plan
    Action {
        #[command(subcommand)]
        command: ActionCommand,
    },
    /// Print the dashboard summary
    Dashboard,
    /// Compose the full report
    Report(ReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    Show,
    SignIn {
        #[arg(long)]
        company: String,
        #[arg(long)]
        email: String,
    },
    /// Clear profile, diagnostic and carbon data; registers are kept
    SignOut,
}

#[derive(Subcommand, Debug)]
enum DiagnosticCommand {
    /// Print section scores, global score, roadmap and completion
    Show,
    /// List every question with its current answer
    Questions,
    Answer {
        question_id: String,
        /// yes, partial or no
        #[arg(value_parser = parse_answer)]
        answer: Answer,
    },
    Clear {
        question_id: String,
    },
    /// Move the diagnostic to the results step
    Finish,
    Reset,
}

#[derive(Subcommand, Debug)]
enum CarbonCommand {
    /// Print inputs, footprint and per-source breakdown
    Show,
    Set {
        /// gasoline, diesel, natural_gas, electricity, short_haul_flights,
        /// long_haul_flights or waste
        #[arg(value_parser = parse_token::<EmissionSource>)]
        source: EmissionSource,
        value: String,
    },
    Calculate,
    Reset,
}

#[derive(Subcommand, Debug)]
enum RiskCommand {
    /// List risks ranked by severity
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, value_parser = parse_risk_category, default_value = "environmental")]
        category: RiskCategory,
        /// Likelihood from 1 to 5
        #[arg(long, default_value_t = 3)]
        probability: u8,
        /// Impact from 1 to 5
        #[arg(long, default_value_t = 3)]
        impact: u8,
        #[arg(long, default_value = "")]
        mitigation: String,
    },
    Remove {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum KpiCommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        unit: String,
        #[arg(long, default_value_t = 0.0)]
        current: f64,
        #[arg(long, default_value_t = 100.0)]
        target: f64,
        #[arg(long, value_parser = parse_esg_category, default_value = "environmental")]
        category: EsgCategory,
    },
    /// Replace the current value of a KPI
    Update {
        id: String,
        current: f64,
    },
    Remove {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum ActionCommand {
    List,
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        responsible: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        due: NaiveDate,
        #[arg(long, value_parser = parse_esg_category, default_value = "environmental")]
        category: EsgCategory,
    },
    /// Set progress; values snap to steps of 10 within 0..=100
    Progress {
        id: String,
        #[arg(allow_negative_numbers = true)]
        progress: i64,
    },
    Remove {
        id: String,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Evaluation date for overdue actions (defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    if let Some(path) = cli.store {
        config.storage.path = path;
    }

    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(config, args).await,
        Command::Profile { command } => run_profile(&open_workspace(&config)?, command),
        Command::Diagnostic { command } => run_diagnostic(&open_workspace(&config)?, command),
        Command::Carbon { command } => run_carbon(&open_workspace(&config)?, command),
        Command::Risk { command } => run_risk(&open_workspace(&config)?, command),
        Command::Kpi { command } => run_kpi(&open_workspace(&config)?, command),
        Command::Action { command } => run_action(&open_workspace(&config)?, command),
        Command::Dashboard => print_json(&open_workspace(&config)?.dashboard()),
        Command::Report(args) => run_report(&open_workspace(&config)?, args),
    }
}

type FileWorkspace = AuditorWorkspace<JsonFileStore>;

fn open_workspace(config: &AppConfig) -> Result<FileWorkspace, AppError> {
    telemetry::init(&config.telemetry)?;
    let store = JsonFileStore::open(&config.storage.path);
    Ok(AuditorWorkspace::new(Arc::new(store)))
}

fn run_report(workspace: &FileWorkspace, args: ReportArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let report = workspace.report(today);
    match args.format {
        ReportFormat::Json => print_json(&report),
        ReportFormat::Text => {
            print!("{}", render::TextReport(&report));
            Ok(())
        }
    }
}

fn run_profile(workspace: &FileWorkspace, command: ProfileCommand) -> Result<(), AppError> {
    match command {
        ProfileCommand::Show => print_json(&ProfileView::from(workspace.profile())),
        ProfileCommand::SignIn { company, email } => {
            print_json(&workspace.sign_in(&company, &email)?)
        }
        ProfileCommand::SignOut => {
            workspace.sign_out()?;
            println!("Signed out; risks, KPIs and action plan were kept.");
            Ok(())
        }
    }
}

fn run_diagnostic(workspace: &FileWorkspace, command: DiagnosticCommand) -> Result<(), AppError> {
    match command {
        DiagnosticCommand::Show => print_json(&workspace.assessment()),
        DiagnosticCommand::Questions => {
            let record = workspace.diagnostic();
            for section in workspace.questionnaire().sections() {
                println!("{} ({})", section.label, section.norm);
                for question in &section.questions {
                    let state = match record.answers.state(&question.id) {
                        AnswerState::Answered(answer) => answer.label(),
                        AnswerState::Unanswered => "-",
                    };
                    println!("  [{:<7}] {} {}", state, question.id, question.prompt);
                }
            }
            Ok(())
        }
        DiagnosticCommand::Answer {
            question_id,
            answer,
        } => {
            workspace.record_answer(&question_id, answer)?;
            print_json(&workspace.assessment().completion)
        }
        DiagnosticCommand::Clear { question_id } => {
            workspace.clear_answer(&question_id)?;
            print_json(&workspace.assessment().completion)
        }
        DiagnosticCommand::Finish => {
            workspace.set_step(DiagnosticStep::Results)?;
            print_json(&workspace.assessment())
        }
        DiagnosticCommand::Reset => {
            workspace.reset_diagnostic()?;
            println!("Diagnostic answers cleared.");
            Ok(())
        }
    }
}

fn run_carbon(workspace: &FileWorkspace, command: CarbonCommand) -> Result<(), AppError> {
    match command {
        CarbonCommand::Show => print_json(&CarbonView::from(workspace.carbon())),
        CarbonCommand::Set { source, value } => {
            let state = workspace.set_carbon_field(source, &value)?;
            print_json(&state.record)
        }
        CarbonCommand::Calculate => {
            workspace.mark_calculated()?;
            print_json(&workspace.footprint().rounded(2))
        }
        CarbonCommand::Reset => {
            workspace.reset_carbon()?;
            println!("Carbon inputs cleared.");
            Ok(())
        }
    }
}

fn run_risk(workspace: &FileWorkspace, command: RiskCommand) -> Result<(), AppError> {
    match command {
        RiskCommand::List => print_json(&rank_risks(&workspace.risks())),
        RiskCommand::Add {
            name,
            category,
            probability,
            impact,
            mitigation,
        } => print_json(&workspace.add_risk(RiskDraft {
            name,
            category,
            probability,
            impact,
            mitigation,
        })?),
        RiskCommand::Remove { id } => {
            workspace.remove_risk(&id)?;
            println!("Removed {id}.");
            Ok(())
        }
    }
}

fn run_kpi(workspace: &FileWorkspace, command: KpiCommand) -> Result<(), AppError> {
    match command {
        KpiCommand::List => print_json(&snapshot_kpis(&workspace.kpis())),
        KpiCommand::Add {
            name,
            unit,
            current,
            target,
            category,
        } => print_json(&workspace.add_kpi(KpiDraft {
            name,
            unit,
            current,
            target,
            category,
        })?),
        KpiCommand::Update { id, current } => {
            print_json(&workspace.update_kpi_current(&id, current)?)
        }
        KpiCommand::Remove { id } => {
            workspace.remove_kpi(&id)?;
            println!("Removed {id}.");
            Ok(())
        }
    }
}

fn run_action(workspace: &FileWorkspace, command: ActionCommand) -> Result<(), AppError> {
    match command {
        ActionCommand::List => {
            let today = Local::now().date_naive();
            let report = workspace.report(today);
            print_json(&json!({
                "completion": report.action_completion,
                "stats": report.action_stats,
                "actions": report.actions,
            }))
        }
        ActionCommand::Add {
            title,
            responsible,
            due,
            category,
        } => print_json(&workspace.add_action(ActionDraft {
            title,
            responsible,
            due_date: Some(due),
            category,
        })?),
        ActionCommand::Progress { id, progress } => {
            print_json(&workspace.update_action_progress(&id, progress)?)
        }
        ActionCommand::Remove { id } => {
            workspace.remove_action(&id)?;
            println!("Removed {id}.");
            Ok(())
        }
    }
}
