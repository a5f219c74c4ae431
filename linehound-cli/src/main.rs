use anyhow::{anyhow, Result};
use clap::Parser;
use colored::Colorize;
use linehound::{QueryResults, Session, SessionConfig};
use std::io::{self, BufRead, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Root directory to search (prompted for when omitted)
    root: Option<PathBuf>,

    /// Run a single search for this query and exit instead of
    /// entering the menu
    #[arg(short, long)]
    query: Option<String>,

    /// Path to a configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of worker threads
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Maximum number of cached queries before the cache is wiped
    #[arg(long)]
    max_cache_entries: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let mut config = SessionConfig::load_from(args.config.as_deref())
        .map_err(|e| anyhow!("Failed to load configuration: {}", e))?;
    if let Some(root) = &args.root {
        config.root_path = Some(root.clone());
    }
    if let Some(threads) = args.threads {
        config.thread_count = threads;
    }
    if let Some(max_entries) = args.max_cache_entries {
        config.max_cache_entries = max_entries;
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }

    if args.no_color {
        colored::control::set_override(false);
    }

    // Diagnostics go to stderr; stdout carries only results and prompts
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    if let Some(query) = &args.query {
        let mut session =
            Session::new(&config).map_err(|e| anyhow!("Cannot start session: {}", e))?;
        let results = session.search(query);
        report_diagnostics(&results);
        print_results(&mut output, &results)?;
        return Ok(());
    }

    let Some(mut session) = establish_session(&config, &mut input, &mut output)? else {
        return Ok(());
    };
    run_menu(&mut session, &mut input, &mut output)
}

/// Reads one line, with the trailing newline stripped.
/// Returns None on end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

/// Builds a session, starting from the configured root when one was given
/// and prompting until a path that exists and is a directory is accepted.
/// Returns None when input runs out before that happens.
fn establish_session<R: BufRead, W: Write>(
    config: &SessionConfig,
    input: &mut R,
    output: &mut W,
) -> Result<Option<Session>> {
    let mut candidate = config.root_path.clone();
    loop {
        let root = match candidate.take() {
            Some(root) => root,
            None => {
                write!(output, "Enter directory to search: ")?;
                output.flush()?;
                match read_line(input)? {
                    Some(line) if !line.is_empty() => PathBuf::from(line),
                    Some(_) => continue,
                    None => return Ok(None),
                }
            }
        };

        let mut session_config = config.clone();
        session_config.root_path = Some(root);
        match Session::new(&session_config) {
            Ok(session) => return Ok(Some(session)),
            Err(err) => eprintln!("{}, enter a new one", err),
        }
    }
}

/// The interactive menu loop: search, change directory, quit.
/// Bad input re-prompts; it never terminates the loop.
fn run_menu<R: BufRead, W: Write>(
    session: &mut Session,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    loop {
        writeln!(output)?;
        writeln!(output, "--- Menu ---")?;
        writeln!(
            output,
            "1. Search current directory ({})",
            session.root().display()
        )?;
        writeln!(output, "2. Change directory")?;
        writeln!(output, "3. Quit")?;
        write!(output, "Choose 1-3: ")?;
        output.flush()?;

        let Some(choice) = read_line(input)? else {
            break;
        };
        match choice.trim() {
            "1" => {
                write!(output, "Search query: ")?;
                output.flush()?;
                let Some(query) = read_line(input)? else {
                    break;
                };
                let results = session.search(&query);
                report_diagnostics(&results);
                print_results(output, &results)?;
            }
            "2" => loop {
                write!(output, "Enter the new directory: ")?;
                output.flush()?;
                let Some(path) = read_line(input)? else {
                    return Ok(());
                };
                match session.change_root(PathBuf::from(path)) {
                    Ok(()) => {
                        writeln!(
                            output,
                            "Directory changed to: {}",
                            session.root().display()
                        )?;
                        break;
                    }
                    Err(err) => eprintln!("{}, enter a new one", err),
                }
            },
            "3" => {
                writeln!(output, "Quit.")?;
                break;
            }
            other => {
                writeln!(output, "Invalid choice {:?}, pick 1-3.", other)?;
            }
        }
    }
    Ok(())
}

fn report_diagnostics(results: &QueryResults) {
    for diagnostic in &results.diagnostics {
        warn!("{}: {}", diagnostic.path.display(), diagnostic.message);
    }
}

fn print_results<W: Write>(output: &mut W, results: &QueryResults) -> io::Result<()> {
    if results.from_cache {
        writeln!(output, "{}", "Results served from cache".yellow())?;
    }

    if results.records.is_empty() {
        writeln!(output, "Nothing found")?;
        return Ok(());
    }

    for record in &results.records {
        writeln!(
            output,
            "File: {}",
            record.path.display().to_string().blue()
        )?;
        writeln!(
            output,
            "Line {}: {}",
            record.line_number.to_string().green(),
            record.line_text
        )?;
        writeln!(output, "----------------------------------------")?;
    }
    writeln!(output, "\nFound {} matches", results.records.len())?;
    Ok(())
}
