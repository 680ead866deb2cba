use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::{Result, eyre};
use std::path::PathBuf;
use todostore::{SqliteKv, StoreError, Todo, TodoStore};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Todo list CLI - persistent todos with add/toggle/remove/search")]
#[command(version)]
struct Cli {
    /// Path to the store directory (default: user data directory)
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new todo
    Add {
        /// Title of the todo
        title: String,
    },

    /// List todos, optionally filtered by a search string
    List {
        /// Case-insensitive substring to filter titles by
        #[arg(short, long, default_value = "")]
        filter: String,
    },

    /// Toggle the completion flag of a todo
    Toggle {
        /// Id of the todo
        id: Uuid,
    },

    /// Remove a todo
    Remove {
        /// Id of the todo
        id: Uuid,
    },
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let store_path = match cli.store_path {
        Some(path) => path,
        None => dirs::data_dir().ok_or_else(|| eyre!("Could not determine user data directory"))?,
    };

    let backend = SqliteKv::open(&store_path)?;
    let mut store = TodoStore::new(backend);

    // Load once at startup; a corrupt blob is reported but not fatal, the
    // list simply starts empty.
    if let Err(e) = store.load() {
        report_storage_error(&e);
    }

    match cli.command {
        Commands::Add { title } => match store.add(&title) {
            Ok(todo) => println!("Added {} ({})", todo.title.bold(), todo.id),
            Err(e @ StoreError::EmptyTitle) => return Err(e.into()),
            Err(e) => report_storage_error(&e),
        },
        Commands::List { filter } => {
            let todos = store.list(&filter);
            if todos.is_empty() {
                println!("No todos yet!");
            }
            for todo in todos {
                print_todo(todo);
            }
        }
        Commands::Toggle { id } => match store.toggle(id) {
            Ok(true) => println!("Toggled {}", id),
            Ok(false) => println!("No todo with id {}", id),
            Err(e) => report_storage_error(&e),
        },
        Commands::Remove { id } => match store.remove(id) {
            Ok(true) => println!("Removed {}", id),
            Ok(false) => println!("No todo with id {}", id),
            Err(e) => report_storage_error(&e),
        },
    }

    Ok(())
}

fn print_todo(todo: &Todo) {
    if todo.is_completed {
        println!("{} {} {}", "[x]".green(), todo.title.strikethrough().dimmed(), todo.id.to_string().dimmed());
    } else {
        println!("[ ] {} {}", todo.title, todo.id.to_string().dimmed());
    }
}

/// Storage failures are surfaced as a notice, never a crash; the in-memory
/// result of the command still stands.
fn report_storage_error(error: &StoreError) {
    eprintln!("{} {}", "warning:".yellow().bold(), error);
}
