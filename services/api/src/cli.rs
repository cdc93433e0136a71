use crate::demo::{run_catalog_list, run_catalog_matrix, run_demo, run_evaluate, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use taxonomy_review::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Taxonomy Review",
    about = "Check projects against sustainable-finance taxonomy activities from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate one self-assessment given as JSON
    Evaluate(EvaluateArgs),
    /// Inspect a taxonomy catalog file
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    /// Walk the reference review scenarios against the built-in sample catalog
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Print the taxonomy, objective, sector and activity hierarchy
    List(CatalogArgs),
    /// Print which environmental objectives each taxonomy covers
    Matrix(CatalogArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured catalog file (CSV or JSON snapshot)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// JSON file with `selection`, `answers` and optional `criteria`; `-` reads stdin
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Catalog used to look up criteria when the input omits them
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Print the outcome as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CatalogArgs {
    /// Catalog file (CSV or JSON snapshot)
    #[arg(long)]
    pub(crate) catalog: PathBuf,
    /// Reject rows whose objective or SC type is outside the canonical lists
    #[arg(long)]
    pub(crate) strict: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args),
        Command::Catalog {
            command: CatalogCommand::List(args),
        } => run_catalog_list(args),
        Command::Catalog {
            command: CatalogCommand::Matrix(args),
        } => run_catalog_matrix(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["taxonomy-review"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn catalog_matrix_requires_a_path() {
        assert!(Cli::try_parse_from(["taxonomy-review", "catalog", "matrix"]).is_err());

        let cli = Cli::try_parse_from([
            "taxonomy-review",
            "catalog",
            "matrix",
            "--catalog",
            "taxonomies.csv",
            "--strict",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Catalog {
                command: CatalogCommand::Matrix(args),
            }) => {
                assert_eq!(args.catalog, PathBuf::from("taxonomies.csv"));
                assert!(args.strict);
            }
            other => panic!("expected catalog matrix, got {other:?}"),
        }
    }
}
