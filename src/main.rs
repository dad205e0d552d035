mod classify;
mod completion;
mod config;
mod deadline;
mod extract;
mod html;
mod logging;
mod models;
mod options;
mod pipeline;
mod present;
mod remaining;
mod store;
mod tui;

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::{
    event::{Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::Config;
use deadline::DEADLINE_FORMAT;
use models::Page;
use options::OptionsUpdate;
use tui::App;

#[derive(Debug, Parser)]
#[command(
    name = "duesort",
    version,
    about = "Sorts, buckets and annotates an LMS assignment-list page by deadline"
)]
struct Cli {
    /// Config file [default: ~/.config/duesort/config.toml]
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Options store [default: <data dir>/duesort/options.json]
    #[arg(long, global = true, value_name = "FILE")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Run the pipeline over a page snapshot and write the result
    Apply {
        /// Page snapshot (JSON)
        page: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Write here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Evaluate deadlines against this time, e.g. "2025.03.10 12:00"
        #[arg(long, value_parser = parse_now)]
        now: Option<NaiveDateTime>,
        /// One-off option override, e.g. splitTable=false (not persisted)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        overrides: Vec<String>,
    },
    /// Browse the transformed page in the terminal
    Preview {
        /// Page snapshot (JSON)
        page: PathBuf,
        #[arg(long, value_parser = parse_now)]
        now: Option<NaiveDateTime>,
    },
    /// Show or update the stored options
    Options {
        #[command(subcommand)]
        action: OptionsAction,
    },
}

#[derive(Debug, Subcommand)]
enum OptionsAction {
    Show,
    /// Merge key=value pairs into the stored options
    Set {
        #[arg(required = true, value_name = "KEY=VALUE")]
        pairs: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Html,
}

fn parse_now(raw: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(raw.trim(), DEADLINE_FORMAT)
        .map_err(|e| format!("expected YYYY.MM.DD HH:MM: {e}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Command::Init { force } = cli.command {
        let target = cli.config.clone().or_else(Config::config_path);
        if let Some(existing) = target.as_deref().filter(|p| p.exists()) {
            if !force {
                bail!("{} already exists (use --force to overwrite)", existing.display());
            }
        }
        let path = Config::generate_default(cli.config.as_deref())?;
        println!("Generated config file at: {}", path.display());
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref()).with_context(|| {
        "Failed to load configuration.\n\
         Run `duesort init --force` to regenerate the config file."
    })?;
    let store_path = cli.store.clone().or_else(store::store_path);

    match cli.command {
        Command::Init { .. } => Ok(()),
        Command::Apply {
            page,
            format,
            output,
            now,
            overrides,
        } => {
            logging::init_stderr(config.log_level.as_deref());
            let overrides = OptionsUpdate::from_pairs(&overrides)?;
            let options = store::current(store_path.as_deref(), config.options).apply(&overrides);
            let now = now.unwrap_or_else(|| chrono::Local::now().naive_local());
            apply(&page, format, output.as_deref(), &options, now, &config.submitted_marker)
        }
        Command::Preview { page, now } => {
            let log_path = logging::init_file(config.log_level.as_deref())?;
            let source = read_page(&page)?;
            let options = store::current(store_path.as_deref(), config.options);
            let app = App::new(source, options, store_path, config.submitted_marker, now);
            run_preview(app)?;
            eprintln!("Log file: {}", log_path.display());
            Ok(())
        }
        Command::Options { action } => {
            logging::init_stderr(config.log_level.as_deref());
            let options = match action {
                OptionsAction::Show => store::current(store_path.as_deref(), config.options),
                OptionsAction::Set { pairs } => {
                    let update = OptionsUpdate::from_pairs(&pairs)?;
                    store::apply_update(store_path.as_deref(), config.options, &update)?
                }
            };
            println!("{options}");
            Ok(())
        }
    }
}

fn read_page(path: &Path) -> Result<Page> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read page snapshot {}", path.display()))?;
    Page::from_json(&contents)
        .with_context(|| format!("Failed to parse page snapshot {}", path.display()))
}

fn apply(
    page_path: &Path,
    format: Format,
    output: Option<&Path>,
    options: &options::Options,
    now: NaiveDateTime,
    submitted_marker: &str,
) -> Result<()> {
    let mut page = read_page(page_path)?;

    match pipeline::run(&mut page, options, now, submitted_marker) {
        Some(report) => eprintln!("{report}"),
        None => eprintln!("No assignment list found; page left as is."),
    }
    if let Some(completion) = pipeline::run_completion(&mut page) {
        eprintln!("Completion: {}", completion.display());
    }

    let rendered = match format {
        Format::Json => page.to_json()?,
        Format::Html => html::render_page(&page).into_string(),
    };
    match output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn run_preview(mut app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = preview_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn preview_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| tui::ui::render(f, app))?;

        if let Some(Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        })) = tui::event::poll_event(Duration::from_millis(250))?
        {
            tui::event::handle_key(app, code, modifiers);
        }

        if !app.running {
            return Ok(());
        }
    }
}
