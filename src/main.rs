//! batchrename - Preview a folder of images and rename them in one batch.
//!
//! Usage:
//!   batchrename list <FOLDER>     List the images that would be offered for renaming
//!   batchrename check <FOLDER>    Validate new names and show the rename plan
//!   batchrename apply <FOLDER>    Rename the images and report per-row status
//!   batchrename --help            Show help
//!
//! New names are read one per line from `--names FILE` or stdin, in the same
//! order as `list` prints the images. Blank lines are ignored.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, bail};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use batchrename_ops::{RenameAction, RenameReport};
use batchrename_session::{
    RenameDecision, RowStatus, Session, SessionConfig, SessionController, SessionUpdate,
    ThumbnailState, ValidationEvent,
};

/// Environment variable holding a tracing filter, e.g. `batchrename_scan=debug`.
const LOG_ENV: &str = "BATCHRENAME_LOG";

#[derive(Parser)]
#[command(
    name = "batchrename",
    version,
    about = "Preview a folder of images and rename them in one batch",
    long_about = "batchrename lists the images of one folder in filename order and \
                  renames them from a list of new base names, one per line. \
                  Extensions are always kept."
)]
struct Cli {
    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the images of a folder
    List {
        #[command(flatten)]
        target: Target,

        /// Decode a thumbnail for every image
        #[arg(short, long)]
        thumbnails: bool,

        /// Thumbnail bounding box side in pixels
        #[arg(long, default_value = "70")]
        thumb_size: u32,
    },

    /// Validate new names and show the rename plan without touching files
    Check {
        #[command(flatten)]
        target: Target,

        #[command(flatten)]
        names: Names,
    },

    /// Rename the images of a folder
    Apply {
        #[command(flatten)]
        target: Target,

        #[command(flatten)]
        names: Names,
    },
}

#[derive(Args)]
struct Target {
    /// Folder containing the images
    folder: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Args)]
struct Names {
    /// File with one new base name per line (defaults to stdin)
    #[arg(short, long)]
    names: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct RowView {
    id: u64,
    name: String,
    candidate: String,
    status: String,
    thumbnail: Option<(u32, u32)>,
}

#[derive(Serialize)]
struct CheckView<'a> {
    rows: Vec<RowView>,
    invalid: Vec<u64>,
    plan: &'a [RenameDecision],
}

#[derive(Serialize)]
struct ApplyView<'a> {
    rows: Vec<RowView>,
    report: &'a RenameReport,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::List {
            target,
            thumbnails,
            thumb_size,
        } => {
            let config = SessionConfig::builder()
                .generate_thumbnails(thumbnails)
                .thumbnail_width(thumb_size)
                .thumbnail_height(thumb_size)
                .build()?;
            run_list(&target, config)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { target, names } => {
            run_check(&target, &names)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Apply { target, names } => run_apply(&target, &names),
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
        .into()
    });

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Load `folder` and drive the controller until every worker has reported.
fn load(folder: &Path, config: SessionConfig) -> Result<SessionController> {
    let mut controller = SessionController::new(config)?;
    controller
        .load_folder(folder)
        .wrap_err_with(|| format!("Cannot load {}", folder.display()))?;

    eprintln!("Scanning {}...", folder.display());

    loop {
        for update in controller.poll() {
            match update {
                SessionUpdate::FolderUnreadable { error } => {
                    return Err(error).wrap_err("Folder could not be read");
                }
                SessionUpdate::ScanIncomplete { discovered, error } => {
                    warn!(discovered, %error, "listing stopped early");
                    eprintln!("Warning: listing stopped after {discovered} image(s): {error}");
                }
                SessionUpdate::ScanFinished { discovered } => {
                    info!(discovered, "listing complete");
                }
                SessionUpdate::EntryDiscovered { .. } | SessionUpdate::ThumbnailReady { .. } => {}
            }
        }
        if controller.is_settled() {
            break;
        }
        std::thread::sleep(controller.poll_interval());
    }

    Ok(controller)
}

/// Read pasted names from a file or stdin.
fn read_names(names: &Names) -> Result<String> {
    match &names.names {
        Some(path) => std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Cannot read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .wrap_err("Cannot read names from stdin")?;
            Ok(text)
        }
    }
}

/// Load the folder and fill candidates from the pasted names.
fn load_with_names(
    target: &Target,
    names: &Names,
) -> Result<(SessionController, Vec<ValidationEvent>)> {
    let text = read_names(names)?;
    let config = SessionConfig::builder().generate_thumbnails(false).build()?;
    let mut controller = load(&target.folder, config)?;

    let events = controller.paste_names(&text);
    let pasted = events.len();
    let rows = controller.session().map_or(0, |s| s.entries().len());
    if pasted < rows {
        eprintln!("Note: {pasted} name(s) for {rows} image(s); the rest are left as is");
    }

    Ok((controller, events))
}

fn session_of(controller: &SessionController) -> Result<&Session> {
    match controller.session() {
        Some(session) => Ok(session),
        None => bail!("No folder loaded"),
    }
}

fn row_views(session: &Session) -> Vec<RowView> {
    session
        .rows()
        .map(|(entry, row)| RowView {
            id: entry.id.0,
            name: entry.current_name.to_string(),
            candidate: row.candidate.clone(),
            status: row.status.to_string(),
            thumbnail: match &row.thumbnail {
                ThumbnailState::Ready(t) => Some((t.width, t.height)),
                ThumbnailState::Pending | ThumbnailState::Unavailable => None,
            },
        })
        .collect()
}

fn run_list(target: &Target, config: SessionConfig) -> Result<()> {
    let controller = load(&target.folder, config)?;
    let session = session_of(&controller)?;
    let rows = row_views(session);

    match target.format {
        OutputFormat::Text => {
            println!();
            println!("{}", "─".repeat(60));
            println!(" {} - {} image(s)", session.folder().display(), rows.len());
            println!(" Scanned in {:.2}s", session.progress().elapsed().as_secs_f64());
            let config = controller.config();
            if config.generate_thumbnails {
                let (width, height) = config.thumbnail_bounds();
                println!(
                    " Thumbnails fit in {width}x{height}, {} could not be decoded",
                    session.progress().thumbnails_failed
                );
            }
            println!("{}", "─".repeat(60));
            println!();

            for row in &rows {
                let thumb = row
                    .thumbnail
                    .map_or_else(|| "-".to_string(), |(w, h)| format!("{w}x{h}"));
                println!(" {:>4}  {:<48} {:>8}", row.id, row.name, thumb);
            }

            if let Some(error) = session.scan_error() {
                println!();
                println!(" Listing incomplete: {error}");
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }

    Ok(())
}

fn run_check(target: &Target, names: &Names) -> Result<()> {
    let (controller, events) = load_with_names(target, names)?;
    let session = session_of(&controller)?;
    let plan = session.plan();
    let invalid: Vec<u64> = events
        .iter()
        .filter(|e| e.invalid)
        .map(|e| e.entry_id.0)
        .collect();

    match target.format {
        OutputFormat::Text => {
            for (entry, row) in session.rows() {
                let action = plan
                    .iter()
                    .find(|d| d.entry_id == entry.id)
                    .map_or_else(String::new, |d| describe(&d.action));
                println!(
                    " {:>4}  {:<32} {:<32} {:<14} {}",
                    entry.id.0,
                    entry.current_name.as_str(),
                    row.candidate,
                    row.status.to_string(),
                    action
                );
            }

            let renames = plan.iter().filter(|d| d.is_rename()).count();
            println!();
            println!(" {renames} rename(s) planned, {} invalid name(s)", invalid.len());
        }
        OutputFormat::Json => {
            let view = CheckView {
                rows: row_views(session),
                invalid,
                plan: &plan,
            };
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }

    Ok(())
}

fn run_apply(target: &Target, names: &Names) -> Result<ExitCode> {
    let (mut controller, _) = load_with_names(target, names)?;
    let Some(report) = controller.rename_all() else {
        bail!("No folder loaded");
    };
    let session = session_of(&controller)?;

    match target.format {
        OutputFormat::Text => {
            for (entry, row) in session.rows() {
                if row.status == RowStatus::Empty {
                    continue;
                }
                let marker = if row.status.is_error() { '!' } else { ' ' };
                println!(
                    "{marker}{:>4}  {:<48} {}",
                    entry.id.0,
                    entry.current_name.as_str(),
                    row.status
                );
            }
            println!();
            println!("{}", report.summary());
        }
        OutputFormat::Json => {
            let view = ApplyView {
                rows: row_views(session),
                report: &report,
            };
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Short description of a planned action.
fn describe(action: &RenameAction) -> String {
    match action {
        RenameAction::Skip => "skip".to_string(),
        RenameAction::Rename { target_name } => format!("-> {target_name}"),
        RenameAction::Reject(reason) => format!("rejected: {reason}"),
    }
}
