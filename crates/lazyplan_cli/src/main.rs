//! Interactive CLI probe for the planner core.
//!
//! # Responsibility
//! - Bind store state to a textual view: every mutation re-renders the
//!   filtered projection.
//! - Keep output deterministic for quick local sanity checks.

use lazyplan_core::storage::open_store;
use lazyplan_core::{Filter, SqliteKvRepository, TaskId, TaskStore};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_DB_FILE_NAME: &str = "lazyplan_tasks.sqlite3";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("lazyplan: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let db_path = resolve_db_path();
    println!("lazyplan core={} store={}", lazyplan_core::core_version(), db_path.display());

    let conn = open_store(&db_path).map_err(|err| format!("store open failed: {err}"))?;
    let repo = SqliteKvRepository::try_new(&conn)
        .map_err(|err| format!("store repo init failed: {err}"))?;
    let mut store = TaskStore::load(repo).map_err(|err| format!("store load failed: {err}"))?;
    let mut filter = Filter::default();

    render(&store, filter);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().map_err(|err| err.to_string())?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Ok(());
        }

        let input = line.trim();
        let (command, rest) = match input.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (input, ""),
        };

        match command {
            "" => continue,
            "quit" | "exit" => return Ok(()),
            "help" => print_help(),
            "list" => render(&store, filter),
            "filter" => {
                match Filter::parse(rest) {
                    Some(parsed) => filter = parsed,
                    None => {
                        eprintln!("unknown filter `{rest}`; expected all|active|completed");
                        continue;
                    }
                }
                render(&store, filter);
            }
            "add" => {
                let (title, description, due_date) = split_add_input(rest);
                match store.add(title, description, due_date) {
                    Ok(Some(_)) => render(&store, filter),
                    Ok(None) => eprintln!("title is empty; nothing added"),
                    Err(err) => eprintln!("add failed: {err}"),
                }
            }
            "toggle" => match resolve_row(&store, filter, rest) {
                Some(id) => {
                    if let Err(err) = store.toggle(id) {
                        eprintln!("toggle failed: {err}");
                    } else {
                        render(&store, filter);
                    }
                }
                None => eprintln!("no task at row `{rest}`"),
            },
            "rm" => match resolve_row(&store, filter, rest) {
                Some(id) => {
                    if let Err(err) = store.remove(id) {
                        eprintln!("rm failed: {err}");
                    } else {
                        render(&store, filter);
                    }
                }
                None => eprintln!("no task at row `{rest}`"),
            },
            other => eprintln!("unknown command `{other}`; try `help`"),
        }
    }
}

fn resolve_db_path() -> PathBuf {
    if let Some(arg) = std::env::args().nth(1) {
        return PathBuf::from(arg);
    }
    if let Ok(raw) = std::env::var("LAZYPLAN_DB_PATH") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}

/// Splits `title | description | due_date` form input; later segments are
/// optional.
fn split_add_input(rest: &str) -> (&str, Option<&str>, Option<&str>) {
    let mut parts = rest.splitn(3, '|');
    let title = parts.next().unwrap_or("").trim();
    let description = parts.next().map(str::trim);
    let due_date = parts.next().map(str::trim);
    (title, description, due_date)
}

/// Maps a 1-based row number of the rendered projection back to a task id.
fn resolve_row<R: lazyplan_core::KvRepository>(
    store: &TaskStore<R>,
    filter: Filter,
    rest: &str,
) -> Option<TaskId> {
    let row: usize = rest.trim().parse().ok()?;
    let projection = store.filtered(filter);
    projection.get(row.checked_sub(1)?).map(|task| task.id)
}

fn render<R: lazyplan_core::KvRepository>(store: &TaskStore<R>, filter: Filter) {
    let projection = store.filtered(filter);
    println!(
        "-- {} ({} of {} task(s)) --",
        filter.as_str(),
        projection.len(),
        store.tasks().len()
    );
    for (row, task) in projection.iter().enumerate() {
        let mark = if task.is_completed { 'x' } else { ' ' };
        let mut line = format!("{:>3}. [{mark}] {}", row + 1, task.title);
        if let Some(due) = &task.due_date {
            line.push_str(&format!(" (due {due})"));
        }
        if let Some(description) = &task.description {
            line.push_str(&format!(" :: {description}"));
        }
        println!("{line}");
    }
}

fn print_help() {
    println!("commands:");
    println!("  add <title> [| description [| due date]]");
    println!("  toggle <row>      flip completion for a rendered row");
    println!("  rm <row>          delete a rendered row");
    println!("  filter all|active|completed");
    println!("  list              re-render the current projection");
    println!("  quit");
}
