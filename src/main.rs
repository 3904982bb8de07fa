use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mastery::cli::commands;
use mastery::types::{DeepDiveMode, Level};

#[derive(Parser)]
#[command(name = "mastery")]
#[command(
    version,
    about = "Marketing curriculum tutor with live-streamed AI lessons"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in as the configured learner
    Login {
        username: String,
        #[arg(long, short, help = "Password (prompted when omitted)")]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in learner
    Whoami,

    /// List modules and topics with completion
    Modules {
        #[arg(short = 'f', long, default_value = "text", help = "Output format: text, json")]
        format: String,
    },

    /// Stream a lesson for a topic
    Lesson {
        #[arg(help = "Topic id, e.g. m0-t1")]
        topic: String,
        #[arg(long, short, default_value = "basic")]
        level: Level,
    },

    /// Generate a quiz, or grade answers to one
    Quiz {
        topic: String,
        #[arg(long, short, default_value = "basic")]
        level: Level,
        #[arg(long, value_delimiter = ',', help = "Zero-based answer indices, e.g. 0,2,1,3,0")]
        answers: Vec<usize>,
    },

    /// Explore one lesson section further
    DeepDive {
        topic: String,
        #[arg(long, help = "Section title")]
        section: String,
        #[arg(long, help = "Section content")]
        content: String,
        #[arg(long, short, default_value = "explain", help = "explain, simpler, examples, apply")]
        mode: DeepDiveMode,
    },

    /// Verbal recall practice
    Memorize {
        #[command(subcommand)]
        action: MemorizeAction,
    },

    /// Mark a topic level complete
    Complete {
        topic: String,
        #[arg(long, short)]
        level: Level,
    },

    /// Manage saved notes
    Notes {
        #[command(subcommand)]
        action: NotesAction,
    },

    /// Show score and tier
    Status {
        #[arg(short = 'f', long, default_value = "text", help = "Output format: text, json")]
        format: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum MemorizeAction {
    /// Pick the key concepts to explain
    Keywords {
        topic: String,
        #[arg(long, short, default_value = "basic")]
        level: Level,
    },
    /// Rate a spoken explanation
    Analyze {
        topic: String,
        #[arg(long, short, default_value = "basic")]
        level: Level,
        #[arg(long, short, help = "Transcript text, or - to read stdin")]
        transcript: Option<String>,
        #[arg(long, short, value_delimiter = ',', help = "Keywords to rate (extracted when omitted)")]
        keywords: Vec<String>,
    },
    /// Show the memorize walkthrough
    Onboarding {
        #[arg(long, help = "Show the walkthrough again next time")]
        reset: bool,
    },
}

#[derive(clap::Args)]
struct NoteArgs {
    topic: String,
    #[arg(long, short)]
    level: Level,
    #[arg(long, help = "Section type, e.g. concept, framework")]
    section_type: String,
    #[arg(long)]
    title: String,
    #[arg(long)]
    content: String,
}

impl From<NoteArgs> for commands::notes::NoteInput {
    fn from(args: NoteArgs) -> Self {
        Self {
            topic_id: args.topic,
            level: args.level,
            section_type: args.section_type,
            title: args.title,
            content: args.content,
        }
    }
}

#[derive(Subcommand)]
enum NotesAction {
    /// List saved notes
    List {
        #[arg(long, help = "Only notes for this topic")]
        topic: Option<String>,
        #[arg(short = 'f', long, default_value = "text", help = "Output format: text, json")]
        format: String,
    },
    /// Save a section
    Add(NoteArgs),
    /// Save a section, or remove it if already saved
    Toggle(NoteArgs),
    /// Remove a note by id
    Remove { id: String },
    /// Remove all notes
    Clear,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mmastery encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let rt = Runtime::new()?;

    match cli.command {
        Commands::Login { username, password } => commands::auth::login(&username, password)?,
        Commands::Logout => commands::auth::logout()?,
        Commands::Whoami => commands::auth::whoami()?,
        Commands::Modules { format } => rt.block_on(commands::status::modules(&format))?,
        Commands::Lesson { topic, level } => rt.block_on(commands::lesson::run(&topic, level))?,
        Commands::Quiz {
            topic,
            level,
            answers,
        } => rt.block_on(commands::quiz::run(&topic, level, &answers))?,
        Commands::DeepDive {
            topic,
            section,
            content,
            mode,
        } => rt.block_on(commands::deep_dive::run(&topic, &section, &content, mode))?,
        Commands::Memorize { action } => match action {
            MemorizeAction::Keywords { topic, level } => {
                rt.block_on(commands::memorize::keywords(&topic, level))?
            }
            MemorizeAction::Analyze {
                topic,
                level,
                transcript,
                keywords,
            } => rt.block_on(commands::memorize::analyze(
                &topic, level, transcript, keywords,
            ))?,
            MemorizeAction::Onboarding { reset } => commands::memorize::onboarding(reset)?,
        },
        Commands::Complete { topic, level } => {
            rt.block_on(commands::status::complete(&topic, level))?
        }
        Commands::Notes { action } => match action {
            NotesAction::List { topic, format } => {
                commands::notes::list(topic.as_deref(), &format)?
            }
            NotesAction::Add(args) => rt.block_on(commands::notes::add(args.into()))?,
            NotesAction::Toggle(args) => rt.block_on(commands::notes::toggle(args.into()))?,
            NotesAction::Remove { id } => commands::notes::remove(&id)?,
            NotesAction::Clear => commands::notes::clear()?,
        },
        Commands::Status { format } => rt.block_on(commands::status::status(&format))?,
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => commands::config::show(&format)?,
            ConfigAction::Path => commands::config::path()?,
            ConfigAction::Init { global, force } => {
                if global {
                    commands::config::init_global(force)?;
                } else {
                    commands::config::init_project()?;
                }
            }
        },
    }

    Ok(())
}
