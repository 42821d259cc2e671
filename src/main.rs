use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use ontograph::graph::{GraphStore, Neo4jClientBuilder, SqliteGraph};
use ontograph::ontology::normalize_to_turtle;
use ontograph::utils::{ensure_database_directory, get_graph_database_path};
use ontograph::{
    ConversionError, ConversionOutcome, ConversionRequest, ConversionService, OntologyError,
    parse_tree_document, preview,
};
use tracing_subscriber::EnvFilter;

/// ontograph - load ontology class hierarchies into a graph database
#[derive(Parser)]
#[command(name = "ontograph")]
#[command(about = "Converts RDF/OWL class hierarchies into property-graph trees")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Build class trees from an ontology and upload (or preview) them
    Convert(ConvertCommand),
    /// Upload trees from a JSON document produced by `convert --preview`
    Upload(UploadCommand),
    /// Rewrite an ontology file (e.g. OWL/RDF-XML) as Turtle
    ToTurtle(ToTurtleCommand),
}

/// Convert an ontology file
#[derive(Parser)]
struct ConvertCommand {
    /// Ontology file (.ttl, .owl, .rdf, .nt)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Label of the class to use as the single root (case-insensitive)
    #[arg(long, value_name = "LABEL")]
    root_label: Option<String>,

    /// Print the trees as JSON without writing to the database
    #[arg(long)]
    preview: bool,

    #[command(flatten)]
    backend: BackendArgs,
}

/// Upload a previously previewed tree document
#[derive(Parser)]
struct UploadCommand {
    /// JSON file with a preview document, an array of trees, or one tree.
    /// Trees nested deeper than about 60 levels exceed the JSON parser's
    /// recursion limit; convert such ontologies directly instead.
    #[arg(value_name = "TREE_JSON")]
    file: PathBuf,

    #[command(flatten)]
    backend: BackendArgs,
}

/// Normalize an ontology to Turtle
#[derive(Parser)]
struct ToTurtleCommand {
    /// Ontology file to convert
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Output path (defaults to stdout)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

/// Target graph database
#[derive(Args)]
struct BackendArgs {
    /// Graph backend to write to
    #[arg(long, value_enum, default_value_t = Backend::Neo4j)]
    backend: Backend,

    /// Neo4j HTTP endpoint (env: NEO4J_URI, default http://localhost:7474)
    #[arg(long, value_name = "URI")]
    neo4j_uri: Option<String>,

    /// Neo4j user (env: NEO4J_USER, default neo4j)
    #[arg(long, value_name = "USER")]
    neo4j_user: Option<String>,

    /// Neo4j password (env: NEO4J_PASSWORD)
    #[arg(long, value_name = "PASSWORD")]
    neo4j_pass: Option<String>,

    /// Neo4j database name (env: NEO4J_DATABASE, default neo4j)
    #[arg(long, value_name = "NAME")]
    neo4j_database: Option<String>,

    /// SQLite graph file for the sqlite backend
    #[arg(long, value_name = "PATH")]
    sqlite_path: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Backend {
    Neo4j,
    Sqlite,
}

fn main() {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Convert(cmd) => handle_convert(cmd),
        Commands::Upload(cmd) => handle_upload(cmd),
        Commands::ToTurtle(cmd) => handle_to_turtle(cmd),
    };

    if let Err(e) = result {
        // Determine exit code based on error type
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Installs the stderr log subscriber, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are problems with the input: unknown root labels, unsupported
/// formats, cyclic hierarchies. Database and I/O failures are internal errors.
fn is_user_error(error: &anyhow::Error) -> bool {
    if let Some(e) = error.downcast_ref::<ConversionError>() {
        return e.is_user_error();
    }
    error
        .downcast_ref::<OntologyError>()
        .is_some_and(OntologyError::is_user_error)
}

/// Handles the convert command.
fn handle_convert(cmd: &ConvertCommand) -> Result<()> {
    let request = ConversionRequest::new(&cmd.file)
        .root_label(cmd.root_label.clone())
        .preview(cmd.preview);

    let outcome = if request.preview {
        preview(&request)?
    } else {
        let store = open_store(&cmd.backend)?;
        ConversionService::new(store).convert(&request)?
    };

    print_outcome(&outcome)
}

/// Handles the upload command.
fn handle_upload(cmd: &UploadCommand) -> Result<()> {
    let json = std::fs::read_to_string(&cmd.file)
        .with_context(|| format!("Failed to read tree document: {}", cmd.file.display()))?;
    let trees = parse_tree_document(&json)
        .with_context(|| format!("Failed to load trees from {}", cmd.file.display()))?;

    let store = open_store(&cmd.backend)?;
    let outcome = ConversionService::new(store).upload_trees(&trees)?;

    print_outcome(&outcome)
}

/// Handles the to-turtle command.
fn handle_to_turtle(cmd: &ToTurtleCommand) -> Result<()> {
    match &cmd.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            let mut writer = normalize_to_turtle(&cmd.file, BufWriter::new(file))?;
            writer.flush().context("Failed to flush Turtle output")?;
        }
        None => {
            let mut writer = normalize_to_turtle(&cmd.file, io::stdout().lock())?;
            writer.flush().context("Failed to flush Turtle output")?;
        }
    }
    Ok(())
}

/// Opens the configured graph backend.
fn open_store(args: &BackendArgs) -> Result<Box<dyn GraphStore>> {
    match args.backend {
        Backend::Neo4j => {
            let mut builder = Neo4jClientBuilder::new();
            if let Some(uri) = &args.neo4j_uri {
                builder = builder.uri(uri);
            }
            if let Some(user) = &args.neo4j_user {
                builder = builder.user(user);
            }
            if let Some(password) = &args.neo4j_pass {
                builder = builder.password(password);
            }
            if let Some(database) = &args.neo4j_database {
                builder = builder.database(database);
            }
            let client = builder.build().context("Failed to configure Neo4j client")?;
            Ok(Box::new(client))
        }
        Backend::Sqlite => {
            let path = match &args.sqlite_path {
                Some(path) => path.clone(),
                None => get_graph_database_path()?,
            };
            ensure_database_directory(&path)?;
            let graph = SqliteGraph::open(&path)
                .with_context(|| format!("Failed to open graph database: {}", path.display()))?;
            Ok(Box::new(graph))
        }
    }
}

/// Prints a conversion outcome as pretty JSON on stdout.
fn print_outcome(outcome: &ConversionOutcome) -> Result<()> {
    let json = serde_json::to_string_pretty(outcome).context("Failed to serialize result")?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn convert_parses_preview_and_root_label() {
        let cli = Cli::try_parse_from([
            "ontograph",
            "convert",
            "zoo.ttl",
            "--root-label",
            "Animal",
            "--preview",
        ])
        .unwrap();

        match cli.command {
            Commands::Convert(cmd) => {
                assert_eq!(cmd.file, PathBuf::from("zoo.ttl"));
                assert_eq!(cmd.root_label.as_deref(), Some("Animal"));
                assert!(cmd.preview);
                assert_eq!(cmd.backend.backend, Backend::Neo4j);
            }
            _ => panic!("expected convert command"),
        }
    }

    #[test]
    fn convert_parses_sqlite_backend() {
        let cli = Cli::try_parse_from([
            "ontograph",
            "convert",
            "pizza.owl",
            "--backend",
            "sqlite",
            "--sqlite-path",
            "/tmp/graph.db",
        ])
        .unwrap();

        match cli.command {
            Commands::Convert(cmd) => {
                assert_eq!(cmd.backend.backend, Backend::Sqlite);
                assert_eq!(cmd.backend.sqlite_path, Some(PathBuf::from("/tmp/graph.db")));
                assert!(!cmd.preview);
            }
            _ => panic!("expected convert command"),
        }
    }

    #[test]
    fn root_not_found_is_a_user_error() {
        let error = anyhow::Error::from(ConversionError::Ontology(OntologyError::RootNotFound {
            label: "Nope".to_string(),
        }));
        assert!(is_user_error(&error));
    }

    #[test]
    fn database_errors_are_internal() {
        let error = anyhow::Error::from(ConversionError::Graph(ontograph::GraphError::Http {
            status: 500,
        }));
        assert!(!is_user_error(&error));
    }

    #[test]
    fn invalid_tree_document_is_a_user_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("summary.json");
        std::fs::write(&file, r#"{"status":"success","nodes_uploaded":2,"trees_uploaded":1}"#)
            .unwrap();
        let cmd = UploadCommand {
            file,
            backend: BackendArgs {
                backend: Backend::Sqlite,
                neo4j_uri: None,
                neo4j_user: None,
                neo4j_pass: None,
                neo4j_database: None,
                sqlite_path: Some(dir.path().join("graph.db")),
            },
        };

        let error = handle_upload(&cmd).unwrap_err();
        assert!(is_user_error(&error));
        assert!(!dir.path().join("graph.db").exists(), "store must not be opened");
    }

    #[test]
    fn missing_source_file_is_internal() {
        let cmd = ConvertCommand {
            file: PathBuf::from("/definitely/not/here.ttl"),
            root_label: None,
            preview: true,
            backend: BackendArgs {
                backend: Backend::Sqlite,
                neo4j_uri: None,
                neo4j_user: None,
                neo4j_pass: None,
                neo4j_database: None,
                sqlite_path: None,
            },
        };

        let error = handle_convert(&cmd).unwrap_err();
        assert!(!is_user_error(&error));
        assert!(error.to_string().contains("/definitely/not/here.ttl"));
    }
}
