use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use treequill::config::Config;
use treequill::document::node::{Map, Value};
use treequill::document::parser::{value_from_json, value_to_json};
use treequill::document::tree::flatten;
use treequill::file::loader::{load_file, load_from_stdin};
use treequill::file::saver::{save_file, serialize};
use treequill::file::Format;
use treequill::path::{KeyColumn, ListOptions, PathEngine, RemoveOptions};

/// TreeQuill - path expressions for JSON and YAML documents
#[derive(Parser)]
#[command(name = "treequill")]
#[command(version)]
#[command(about = "Read and rewrite JSON and YAML documents through path expressions", long_about = None)]
struct Cli {
    /// Separator between path segments (default from config, usually ".")
    #[arg(short, long, global = true)]
    separator: Option<String>,

    /// Output format: json or yaml (default from config)
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Print JSON on a single line
    #[arg(short, long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the value at a path
    Get {
        path: String,
        /// Document to read (omit to read from stdin)
        file: Option<PathBuf>,
        /// JSON value printed when the path does not exist
        #[arg(short, long)]
        default: Option<String>,
    },
    /// Exit with status 0 if the path exists, 1 otherwise
    Has { path: String, file: Option<PathBuf> },
    /// Set the value at a path
    Set {
        path: String,
        /// JSON value to set; anything that is not JSON is set as a string
        value: String,
        file: Option<PathBuf>,
        /// Write the result back to the file
        #[arg(short, long)]
        in_place: bool,
    },
    /// Remove the values at a path
    Remove {
        path: String,
        file: Option<PathBuf>,
        #[arg(short, long)]
        in_place: bool,
        /// Keep maps emptied by the removal
        #[arg(short, long)]
        keep_empty: bool,
    },
    /// Extract columns from a list of rows
    List {
        /// Comma separated columns, e.g. "id,info.name as name" (* for all)
        columns: String,
        file: Option<PathBuf>,
        /// Column or path to key the rows by
        #[arg(short, long, conflicts_with = "preserve_keys")]
        key: Option<String>,
        /// Keep the original row keys
        #[arg(short, long)]
        preserve_keys: bool,
    },
    /// Print the structured form of a path
    Parse { path: String },
    /// Flatten a document into a single level keyed by paths
    Flatten { file: Option<PathBuf> },
    /// Inflate a flattened document
    Unflatten { file: Option<PathBuf> },
}

/// Loads the document from a file or piped stdin.
fn load_input(file: Option<&PathBuf>) -> Result<Map> {
    match file {
        Some(path) => load_file(path),
        None if !io::stdin().is_terminal() => load_from_stdin(),
        None => bail!("No input: pass a file or pipe a document to stdin"),
    }
}

/// Parses a command line value as JSON, falling back to a plain string.
fn parse_value(raw: &str) -> Value {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) => value_from_json(&json),
        Err(_) => Value::from(raw),
    }
}

struct Output {
    format: Format,
    indent_size: Option<usize>,
}

impl Output {
    fn render(&self, value: &Value) -> Result<String> {
        match value {
            Value::Map(map) => serialize(map, self.format, self.indent_size),
            scalar => {
                let json = value_to_json(scalar);
                match self.format {
                    Format::Json => Ok(json.to_string()),
                    Format::Yaml => {
                        serde_yaml::to_string(&json).context("Failed to serialize YAML")
                    }
                }
            }
        }
    }

    fn print(&self, value: &Value) -> Result<()> {
        println!("{}", self.render(value)?.trim_end());
        Ok(())
    }
}

/// Writes a changed document back to its file or prints it.
fn finish(
    tree: Map,
    file: Option<&PathBuf>,
    in_place: bool,
    config: &Config,
    output: &Output,
) -> Result<()> {
    if !in_place {
        return output.print(&Value::Map(tree));
    }
    match file {
        Some(path) => save_file(path, &tree, config)
            .with_context(|| format!("Failed to save {}", path.display())),
        None => bail!("--in-place needs a file"),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = Config::load();
    if let Some(separator) = cli.separator {
        config.separator = separator;
    }
    if let Some(format) = cli.format {
        config.output_format = format;
    }

    let output = Output {
        format: Format::from_name(&config.output_format)?,
        indent_size: if cli.compact { None } else { Some(config.indent_size) },
    };
    let mut engine = PathEngine::from_config(&config);

    match cli.command {
        Command::Get { path, file, default } => {
            let tree = load_input(file.as_ref())?;
            let default = default.as_deref().map(parse_value).unwrap_or_default();
            let value = engine.get_path(&tree, path, default)?;
            output.print(&value)?;
        }
        Command::Has { path, file } => {
            let tree = load_input(file.as_ref())?;
            if !engine.has_path(&tree, path)? {
                std::process::exit(1);
            }
        }
        Command::Set {
            path,
            value,
            file,
            in_place,
        } => {
            let tree = load_input(file.as_ref())?;
            let tree = engine.set_path(tree, path, parse_value(&value))?;
            finish(tree, file.as_ref(), in_place, &config, &output)?;
        }
        Command::Remove {
            path,
            file,
            in_place,
            keep_empty,
        } => {
            let tree = load_input(file.as_ref())?;
            let options = RemoveOptions {
                separator: None,
                keep_empty: keep_empty || config.keep_empty,
            };
            let tree = engine.remove_path(tree, path, &options)?;
            finish(tree, file.as_ref(), in_place, &config, &output)?;
        }
        Command::List {
            columns,
            file,
            key,
            preserve_keys,
        } => {
            let rows = load_input(file.as_ref())?;
            let key_column = if preserve_keys {
                KeyColumn::PreserveRowKey
            } else {
                KeyColumn::from(key.as_deref())
            };
            let list = engine.get_list(&rows, columns, key_column, &ListOptions::default())?;
            output.print(&Value::Map(list))?;
        }
        Command::Parse { path } => {
            let separator = config.separator.clone();
            let parsed = engine.parse_path(path, &separator, false)?;
            output.print(&parsed.to_value())?;
        }
        Command::Flatten { file } => {
            let tree = load_input(file.as_ref())?;
            output.print(&Value::Map(flatten(&tree, &config.separator)))?;
        }
        Command::Unflatten { file } => {
            let tree = load_input(file.as_ref())?;
            output.print(&Value::Map(engine.unflatten(&tree)?))?;
        }
    }

    Ok(())
}
