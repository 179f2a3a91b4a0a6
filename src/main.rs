//! journal-portal - command-line front end for the Journal Lending Portal

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table as TermTable};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

use journal_portal::{
    config::LoggingConfig,
    models::{
        borrow::CreateBorrowRequest,
        date::parse_date,
        enums::{BorrowStatus, JournalStatus, TeacherStatus},
        journal::{JournalForm, JournalQuery},
        settings::{
            BasicSettings, BorrowSettings, NotificationSettings, ProfileForm, SettingsUpdate,
            SystemSettings, TeacherInfo,
        },
        teacher::{RegistrationForm, TeacherForm, DEFAULT_MAX_BORROW},
    },
    repository::stats::ReportKind,
    services::reports::notice_slip,
    AppConfig, AppError, AppResult, Portal,
};

#[derive(Parser)]
#[command(name = "journal-portal", version, about = "Journal lending portal for teachers and administrators")]
struct Cli {
    /// Override the API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in as administrator or teacher
    #[command(subcommand)]
    Login(LoginCommand),
    Logout,
    /// Teacher self-registration
    Register(RegisterArgs),
    #[command(subcommand)]
    Journals(JournalCommand),
    #[command(subcommand)]
    Teachers(TeacherCommand),
    #[command(subcommand)]
    Borrow(BorrowCommand),
    #[command(subcommand)]
    Overdue(OverdueCommand),
    #[command(subcommand)]
    Stats(StatsCommand),
    /// Download a server-generated spreadsheet report
    Export {
        /// overdue or borrow
        kind: ReportKind,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Overview for whoever is logged in
    Dashboard,
    /// System settings (administrator)
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// The logged-in teacher's profile and password
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Subcommand)]
enum LoginCommand {
    Admin {
        #[arg(long, short)]
        username: String,
        #[arg(long, short)]
        password: String,
    },
    Teacher {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
    },
}

#[derive(Args)]
struct RegisterArgs {
    #[arg(long)]
    id: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    department: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
}

#[derive(Args)]
struct JournalArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    issn: String,
    #[arg(long)]
    category: String,
    #[arg(long)]
    publisher: String,
    /// YYYY-MM-DD
    #[arg(long)]
    publish_date: String,
    #[arg(long)]
    issue_number: Option<String>,
    #[arg(long)]
    total: u32,
    #[arg(long)]
    available: u32,
    #[arg(long, default_value = "available")]
    status: JournalStatus,
    #[arg(long)]
    description: Option<String>,
}

impl JournalArgs {
    fn into_form(self, id: Option<i64>) -> JournalForm {
        JournalForm {
            id,
            name: self.name,
            issn: self.issn,
            category: self.category,
            publisher: self.publisher,
            publish_date: self.publish_date,
            issue_number: self.issue_number,
            total_quantity: self.total,
            available_quantity: self.available,
            status: self.status,
            description: self.description,
        }
    }
}

#[derive(Subcommand)]
enum JournalCommand {
    Search {
        #[arg(long, short)]
        keyword: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        issn: Option<String>,
        #[arg(long)]
        status: Option<JournalStatus>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Show {
        id: i64,
    },
    Add(JournalArgs),
    Update {
        id: i64,
        #[command(flatten)]
        journal: JournalArgs,
    },
    Delete {
        id: i64,
    },
    /// Borrow records of one journal
    Borrows {
        id: i64,
        #[arg(long, value_delimiter = ',')]
        status: Vec<BorrowStatus>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

#[derive(Args)]
struct TeacherArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    department: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long, default_value_t = DEFAULT_MAX_BORROW)]
    max_borrow: u32,
    #[arg(long, default_value = "active")]
    status: TeacherStatus,
}

impl TeacherArgs {
    fn into_form(self, id: Option<i64>) -> TeacherForm {
        TeacherForm {
            id,
            name: self.name,
            department: self.department,
            email: self.email,
            phone: self.phone,
            max_borrow: self.max_borrow,
            status: self.status,
        }
    }
}

#[derive(Subcommand)]
enum TeacherCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Show {
        id: i64,
    },
    Search {
        #[arg(long)]
        phone: String,
    },
    Add(TeacherArgs),
    Update {
        id: i64,
        #[command(flatten)]
        teacher: TeacherArgs,
    },
    Delete {
        id: i64,
    },
    /// Export every teacher to CSV
    Export {
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum BorrowCommand {
    /// Lend a journal to a teacher
    Create {
        #[arg(long)]
        teacher: i64,
        #[arg(long)]
        journal: i64,
        /// Loan length in days
        #[arg(long, conflicts_with_all = ["start", "due"])]
        days: Option<u32>,
        /// Borrow date, YYYY-MM-DD
        #[arg(long, requires = "due")]
        start: Option<String>,
        /// Due date, YYYY-MM-DD
        #[arg(long, requires = "start")]
        due: Option<String>,
    },
    Return {
        borrow_id: i64,
        #[arg(long)]
        teacher: Option<i64>,
    },
    Renew {
        borrow_id: i64,
        #[arg(long)]
        days: Option<u32>,
        #[arg(long)]
        teacher: Option<i64>,
    },
    /// Records still out on loan
    Current {
        #[arg(long)]
        teacher: Option<i64>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    History {
        #[arg(long)]
        teacher: Option<i64>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Admin listing by status
    List {
        #[arg(long, value_delimiter = ',')]
        status: Vec<BorrowStatus>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

#[derive(Subcommand)]
enum OverdueCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Send a notice for one record
    Notify {
        borrow_id: i64,
    },
    /// Send notices for several records in one request
    Batch {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, value_delimiter = ',', required_unless_present = "all")]
        ids: Vec<i64>,
        /// Every record on the page
        #[arg(long)]
        all: bool,
    },
    /// Print notice slips
    Print {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(value_delimiter = ',')]
        ids: Vec<i64>,
    },
    /// Export one page to CSV
    Export {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum StatsCommand {
    Summary,
    Departments,
    Teacher {
        #[arg(long)]
        teacher: Option<i64>,
    },
}

/// Options left out keep their current value
#[derive(Subcommand)]
enum SettingsCommand {
    Show,
    /// System name and contact details
    Basic {
        #[arg(long)]
        system_name: Option<String>,
        #[arg(long)]
        contact_email: Option<String>,
        #[arg(long)]
        contact_phone: Option<String>,
    },
    /// Loan period, quota and overdue fine
    Borrow {
        /// Days
        #[arg(long)]
        duration: Option<u32>,
        #[arg(long)]
        max_borrow: Option<u32>,
        /// Per day
        #[arg(long)]
        fine: Option<f64>,
    },
    /// Overdue reminder schedule
    Notification {
        #[arg(long)]
        enabled: Option<bool>,
        #[arg(long)]
        before_days: Option<u32>,
        /// HH:MM
        #[arg(long)]
        time: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProfileCommand {
    Show,
    /// Options left out keep their current value
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        title: Option<String>,
    },
    /// Change the password; you will need to log in again
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(url) = cli.api_url.clone() {
        config.api.base_url = url;
    }

    let guard = init_tracing(&config.logging)?;
    tracing::debug!("journal-portal v{} using {}", env!("CARGO_PKG_VERSION"), config.api.base_url);

    let portal = Portal::connect(config).await?;
    if let Err(e) = run(&portal, cli.command).await {
        tracing::error!(kind = ?e.kind(), error = %e, "Command failed");
        eprintln!("Error: {}", e.user_message());
        // Flush the file writer before exiting
        drop(guard);
        std::process::exit(1);
    }
    drop(guard);
    Ok(())
}

/// Registry with an env filter, stderr output and an optional log file
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("journal_portal={}", logging.level).into());

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    layers.push(match logging.format.as_str() {
        "json" => fmt::layer().json().with_writer(std::io::stderr).boxed(),
        _ => fmt::layer().with_writer(std::io::stderr).boxed(),
    });

    let mut guard = None;
    if let Some(path) = &logging.file {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| std::path::Path::new("."));
        let name = path
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("invalid log file path {}", path.display()))?;
        std::fs::create_dir_all(dir)?;
        let (writer, worker) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
        layers.push(fmt::layer().with_ansi(false).with_writer(writer).boxed());
        guard = Some(worker);
    }

    tracing_subscriber::registry().with(layers).with(filter).init();
    Ok(guard)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn print_pairs(rows: &[(&str, String)]) {
    let mut table = TermTable::new();
    table.load_preset(UTF8_FULL);
    for (key, value) in rows {
        table.add_row(vec![key.to_string(), value.clone()]);
    }
    println!("{table}");
}

fn parse_day(raw: &str) -> AppResult<NaiveDate> {
    parse_date(raw).ok_or_else(|| AppError::Validation(format!("Invalid date: {}", raw)))
}

fn print_settings(s: &SystemSettings) {
    print_pairs(&[
        ("System name", s.system_name.clone()),
        ("Version", s.system_version.clone()),
        ("Contact email", s.contact_email.clone()),
        ("Contact phone", s.contact_phone.clone()),
        ("Borrow duration", format!("{} days", s.borrow_duration)),
        ("Max borrow count", s.max_borrow_count.to_string()),
        ("Overdue fine", format!("{:.2} per day", s.overdue_fine)),
        ("Overdue notice", if s.enable_overdue_notice { "on" } else { "off" }.to_string()),
        ("Notice before", format!("{} days", s.notice_before_days)),
        ("Notice time", s.notice_time.clone()),
    ]);
}

fn print_teacher_info(info: &TeacherInfo) {
    print_pairs(&[
        ("ID", info.id.to_string()),
        ("Name", info.name.clone()),
        ("Email", info.email.clone().unwrap_or_default()),
        ("Phone", info.phone.clone().unwrap_or_default()),
        ("Department", info.department.clone().unwrap_or_default()),
        ("Title", info.title.clone().unwrap_or_default()),
    ]);
}

/// Explicit `--teacher`, else the logged-in teacher
async fn teacher_id(portal: &Portal, explicit: Option<i64>) -> AppResult<i64> {
    match explicit {
        Some(id) => Ok(id),
        None => Ok(portal.services.auth.require_teacher().await?.id),
    }
}

async fn run(portal: &Portal, command: Command) -> AppResult<()> {
    let services = &portal.services;
    let max_buttons = portal.config.pagination.max_buttons;

    match command {
        Command::Login(LoginCommand::Admin { username, password }) => {
            let profile = services.auth.login_admin(&username, &password).await?;
            println!("Logged in as administrator {}", profile.username);
        }
        Command::Login(LoginCommand::Teacher { id, name, phone }) => {
            let profile = services.auth.login_teacher(&id, &name, &phone).await?;
            println!("Welcome, {}", profile.name);
        }
        Command::Logout => {
            services.auth.logout().await?;
            println!("Logged out");
        }
        Command::Register(args) => {
            services
                .auth
                .register(RegistrationForm {
                    id: args.id,
                    name: args.name,
                    department: args.department,
                    email: args.email,
                    phone: args.phone,
                })
                .await?;
            println!("Registration submitted, you can now log in");
        }

        Command::Journals(cmd) => match cmd {
            JournalCommand::Search {
                keyword,
                category,
                issn,
                status,
                page,
            } => {
                let query = JournalQuery {
                    keyword,
                    category,
                    issn,
                    status,
                    page,
                    page_size: 0,
                };
                let result = services.catalog.search(query).await;
                println!("{}", services.catalog.render().await);
                result?;
                println!("{}", services.catalog.pagination(max_buttons).await);
            }
            JournalCommand::Show { id } => {
                let j = services.catalog.get_journal(id).await?;
                print_pairs(&[
                    ("ID", j.id.to_string()),
                    ("Name", j.name.clone()),
                    ("ISSN", j.issn.clone().unwrap_or_default()),
                    ("Category", j.category.clone().unwrap_or_default()),
                    ("Publisher", j.publisher.clone().unwrap_or_default()),
                    ("Issue", j.issue_number.clone().unwrap_or_default()),
                    (
                        "Copies",
                        format!(
                            "{} available of {}",
                            j.available_quantity.unwrap_or(0),
                            j.total_quantity.unwrap_or(0)
                        ),
                    ),
                    ("Status", j.status.to_string()),
                    ("Description", j.description.clone().unwrap_or_default()),
                ]);
            }
            JournalCommand::Add(args) => {
                services.catalog.create_journal(args.into_form(None)).await?;
                println!("Journal added");
            }
            JournalCommand::Update { id, journal } => {
                services.catalog.update_journal(journal.into_form(Some(id))).await?;
                println!("Journal {} updated", id);
            }
            JournalCommand::Delete { id } => {
                services.catalog.delete_journal(id).await?;
                println!("Journal {} deleted", id);
            }
            JournalCommand::Borrows { id, status, page } => {
                let records = services.borrows.list_for_journal(id, &status).await?;
                let page_size = portal.config.pagination.page_size;
                let (table, pager) = services.borrows.render_admin(records, page_size, page, today());
                println!("{}", table);
                println!("{}", pager.render(max_buttons));
            }
        },

        Command::Teachers(cmd) => match cmd {
            TeacherCommand::List { page } => {
                let result = services.teachers.list(page).await;
                println!("{}", services.teachers.render().await);
                result?;
                println!("{}", services.teachers.pagination(max_buttons).await);
            }
            TeacherCommand::Show { id } => {
                let t = services.teachers.get_teacher(id).await?;
                print_pairs(&[
                    ("ID", t.id.to_string()),
                    ("Name", t.name.clone()),
                    ("Department", t.department.clone().unwrap_or_default()),
                    ("Email", t.email.clone().unwrap_or_default()),
                    ("Phone", t.phone.clone().unwrap_or_default()),
                    ("Borrowed", format!("{}/{}", t.current_borrow(), t.max_borrow())),
                    ("Status", t.status.to_string()),
                ]);
            }
            TeacherCommand::Search { phone } => {
                let found = services.teachers.search_by_phone(&phone).await?;
                if found.is_empty() {
                    println!("No teacher with phone {}", phone);
                }
                for t in found {
                    println!("{}  {}  {}", t.id, t.name, t.department.unwrap_or_default());
                }
            }
            TeacherCommand::Add(args) => {
                services.teachers.create_teacher(args.into_form(None)).await?;
                println!("Teacher added");
            }
            TeacherCommand::Update { id, teacher } => {
                services.teachers.update_teacher(teacher.into_form(Some(id))).await?;
                println!("Teacher {} updated", id);
            }
            TeacherCommand::Delete { id } => {
                services.teachers.delete_teacher(id).await?;
                println!("Teacher {} deleted", id);
            }
            TeacherCommand::Export { output } => {
                let teachers = services.teachers.list_all().await?;
                let path = services
                    .reports
                    .export_teachers(&teachers, today(), output.as_deref())
                    .await?;
                println!("Exported {} teachers to {}", teachers.len(), path.display());
            }
        },

        Command::Borrow(cmd) => match cmd {
            BorrowCommand::Create {
                teacher,
                journal,
                days,
                start,
                due,
            } => {
                match (start, due) {
                    (Some(start), Some(due)) => {
                        let request =
                            CreateBorrowRequest::from_dates(teacher, journal, parse_day(&start)?, parse_day(&due)?)?;
                        services.borrows.create(request).await?;
                    }
                    _ => {
                        let days = days.unwrap_or(portal.config.borrow.default_borrow_days);
                        let teacher = services.teachers.get_teacher(teacher).await?;
                        let journal = services.catalog.get_journal(journal).await?;
                        services.borrows.create_for(&teacher, &journal, days).await?;
                    }
                }
                println!("Borrow created for teacher {}", teacher);
                println!("{}", services.borrows.render_current(today()).await);
            }
            BorrowCommand::Return { borrow_id, teacher } => {
                let teacher = teacher_id(portal, teacher).await?;
                services.borrows.return_borrow(teacher, borrow_id).await?;
                println!("Borrow {} returned", borrow_id);
                println!("{}", services.borrows.render_current(today()).await);
            }
            BorrowCommand::Renew {
                borrow_id,
                days,
                teacher,
            } => {
                let teacher = teacher_id(portal, teacher).await?;
                let days = days.unwrap_or(portal.config.borrow.default_renew_days);
                services.borrows.renew(teacher, borrow_id, days).await?;
                println!("Borrow {} renewed by {} days", borrow_id, days);
                println!("{}", services.borrows.render_current(today()).await);
            }
            BorrowCommand::Current { teacher, page } => {
                let teacher = teacher_id(portal, teacher).await?;
                let result = services.borrows.load_current(teacher).await;
                services.borrows.go_to_current_page(page).await;
                println!("{}", services.borrows.render_current(today()).await);
                result?;
                println!("{}", services.borrows.current_pagination(max_buttons).await);
            }
            BorrowCommand::History { teacher, page } => {
                let teacher = teacher_id(portal, teacher).await?;
                let result = services.borrows.load_history(teacher).await;
                services.borrows.go_to_history_page(page).await;
                println!("{}", services.borrows.render_history(today()).await);
                result?;
                println!("{}", services.borrows.history_pagination(max_buttons).await);
            }
            BorrowCommand::List { status, limit, page } => {
                let records = services.borrows.list_by_status(&status, limit).await?;
                let page_size = portal.config.pagination.page_size;
                let (table, pager) = services.borrows.render_admin(records, page_size, page, today());
                println!("{}", table);
                println!("{}", pager.render(max_buttons));
            }
        },

        Command::Overdue(cmd) => match cmd {
            OverdueCommand::List { page } => {
                let result = services.overdue.load_page(page).await;
                println!("{}", services.overdue.render(today()).await);
                result?;
                println!("{}", services.overdue.pagination(max_buttons).await);
            }
            OverdueCommand::Notify { borrow_id } => {
                let receipt = services.overdue.send_notice(borrow_id).await?;
                let channels = if receipt.channels.is_empty() {
                    "-".to_string()
                } else {
                    receipt.channels.join(", ")
                };
                println!(
                    "Notice sent for borrow {} via {} at {}",
                    borrow_id,
                    channels,
                    receipt.send_time.as_deref().unwrap_or("-")
                );
            }
            OverdueCommand::Batch { page, ids, all } => {
                services.overdue.load_page(page).await?;
                if all {
                    services.overdue.select_all().await;
                } else {
                    for id in services.overdue.select_ids(&ids).await {
                        eprintln!("Borrow {} is not on page {}, skipped", id, page);
                    }
                }
                let report = services.overdue.send_batch().await?;
                println!("{}", report.summary());
            }
            OverdueCommand::Print { page, ids } => {
                services.overdue.load_page(page).await?;
                let records = services.overdue.records().await;
                let picked: Vec<_> = records
                    .iter()
                    .filter(|r| ids.is_empty() || ids.contains(&r.id))
                    .collect();
                if picked.is_empty() {
                    return Err(AppError::Validation("Nothing to print".to_string()));
                }
                let classifier = services.borrows.classifier();
                let stamp = Local::now().format("%Y%m%d%H%M%S");
                let slips: Vec<String> = picked
                    .iter()
                    .enumerate()
                    .map(|(i, r)| notice_slip(r, classifier, today(), &format!("{}-{}", stamp, i + 1)))
                    .collect();
                println!("{}", slips.join("\n\n----------------------------------------\n\n"));
            }
            OverdueCommand::Export { page, output } => {
                services.overdue.load_page(page).await?;
                let records = services.overdue.records().await;
                let path = services
                    .reports
                    .export_overdue(&records, services.borrows.classifier(), today(), output.as_deref())
                    .await?;
                println!("Exported {} records to {}", records.len(), path.display());
            }
        },

        Command::Stats(cmd) => match cmd {
            StatsCommand::Summary => {
                let s = services.stats.admin_summary().await?;
                print_pairs(&[
                    ("Journals", s.total_journals.to_string()),
                    ("Teachers", s.total_teachers.to_string()),
                    ("Overdue items", s.overdue_items.to_string()),
                ]);
            }
            StatsCommand::Departments => {
                let rows = services.stats.department_teachers().await?;
                let pairs: Vec<(&str, String)> =
                    rows.iter().map(|r| (r.name.as_str(), r.count.to_string())).collect();
                print_pairs(&pairs);
            }
            StatsCommand::Teacher { teacher } => {
                let teacher = teacher_id(portal, teacher).await?;
                let s = services.stats.teacher_stats(teacher).await?;
                print_pairs(&[
                    ("Current borrows", s.current_borrow_count.to_string()),
                    ("Overdue", s.overdue_count.to_string()),
                    ("Due soon", s.upcoming_expire_count.to_string()),
                    ("Renewable", s.renewable_count.to_string()),
                    ("Quota", s.max_borrow_count.to_string()),
                ]);
            }
        },

        Command::Export { kind, output } => {
            let path = services
                .reports
                .download_report(kind, today(), output.as_deref())
                .await?;
            println!("Saved {} report to {}", kind, path.display());
        }

        Command::Dashboard => {
            let session = services.auth.current().await?;
            if let Some(admin) = session.admin_user_info {
                println!("Administrator {}", admin.username);
                let s = services.stats.admin_summary().await?;
                print_pairs(&[
                    ("Journals", s.total_journals.to_string()),
                    ("Teachers", s.total_teachers.to_string()),
                    ("Overdue items", s.overdue_items.to_string()),
                ]);
            } else if let Some(teacher) = session.teacher_info {
                println!("{} ({})", teacher.name, teacher.department.unwrap_or_default());
                let s = services.stats.teacher_stats(teacher.id).await?;
                print_pairs(&[
                    ("Current borrows", s.current_borrow_count.to_string()),
                    ("Overdue", s.overdue_count.to_string()),
                    ("Due soon", s.upcoming_expire_count.to_string()),
                    ("Remaining quota", s.remaining_quota().to_string()),
                ]);
                let result = services.borrows.load_current(teacher.id).await;
                println!("{}", services.borrows.render_current(today()).await);
                result?;
            } else {
                return Err(AppError::Session("Please log in first".to_string()));
            }
        }

        Command::Settings(cmd) => {
            services.auth.require_admin().await?;
            let current = services.settings.system_settings().await?;
            let update = match cmd {
                SettingsCommand::Show => {
                    print_settings(&current);
                    return Ok(());
                }
                SettingsCommand::Basic {
                    system_name,
                    contact_email,
                    contact_phone,
                } => SettingsUpdate::Basic(BasicSettings {
                    system_name: system_name.unwrap_or(current.system_name),
                    contact_email: contact_email.unwrap_or(current.contact_email),
                    contact_phone: contact_phone.unwrap_or(current.contact_phone),
                }),
                SettingsCommand::Borrow {
                    duration,
                    max_borrow,
                    fine,
                } => SettingsUpdate::Borrow(BorrowSettings {
                    borrow_duration: duration.unwrap_or(current.borrow_duration),
                    max_borrow_count: max_borrow.unwrap_or(current.max_borrow_count),
                    overdue_fine: fine.unwrap_or(current.overdue_fine),
                }),
                SettingsCommand::Notification {
                    enabled,
                    before_days,
                    time,
                } => SettingsUpdate::Notification(NotificationSettings {
                    enable_overdue_notice: enabled.unwrap_or(current.enable_overdue_notice),
                    notice_before_days: before_days.unwrap_or(current.notice_before_days),
                    notice_time: time.unwrap_or(current.notice_time),
                }),
            };
            let section = update.section();
            let saved = services.settings.update_system_settings(update).await?;
            println!("Saved {} settings", section);
            print_settings(&saved);
        }

        Command::Profile(cmd) => match cmd {
            ProfileCommand::Show => {
                print_teacher_info(&services.settings.teacher_info().await?);
            }
            ProfileCommand::Update {
                name,
                email,
                phone,
                department,
                title,
            } => {
                let form = ProfileForm::from_info(&services.settings.teacher_info().await?);
                let form = ProfileForm {
                    name: name.unwrap_or(form.name),
                    email: email.unwrap_or(form.email),
                    phone: phone.or(form.phone),
                    department: department.or(form.department),
                    title: title.or(form.title),
                    ..form
                };
                let info = services.settings.update_profile(form).await?;
                println!("Profile updated");
                print_teacher_info(&info);
            }
            ProfileCommand::Password {
                current,
                new,
                confirm,
            } => {
                services.settings.change_password(&current, &new, &confirm).await?;
                println!("Password changed, please log in again");
            }
        },
    }
    Ok(())
}
