use std::{io::Write, sync::Arc};

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::{
    commands::{
        StoreArgs,
        create::{self, CreateArgs},
        delete::{self, DeleteArgs},
        edit::{self, EditArgs},
        get::{self, GetArgs},
        list::{self, ListArgs},
        upload::{self, UploadArgs},
    },
    configs::{Configs, EditorConfig},
    editor::{SystemEditor, TerminalPrompt},
    workflow::ParameterWorkflow,
};

const VERBOSE_FILTER: &str = "warn,ssm_config_editor=debug";
const DEFAULT_FILTER: &str = "error";

#[derive(Parser, Debug)]
#[command(
    name = "ssm",
    version,
    about = "List, view and edit AWS Systems Manager parameters",
    long_about = None
)]
pub struct Cli {
    /// Log store calls and editor sessions to stderr (RUST_LOG takes precedence)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List SSM parameters
    List(ListArgs),
    /// Print the decrypted value of an SSM parameter
    Get(GetArgs),
    /// Create a new SSM parameter in your editor
    Create(CreateArgs),
    /// Edit an SSM parameter in your editor
    Edit(EditArgs),
    /// Delete an SSM parameter
    Delete(DeleteArgs),
    /// Upload an SSM parameter value from a file
    Upload(UploadArgs),
    /// Print the version
    Version,
}

pub fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER })
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .try_init();
}

async fn interactive_workflow(store: &StoreArgs) -> anyhow::Result<ParameterWorkflow> {
    let store = Arc::new(store.connect().await?);
    let editor_config = EditorConfig::load().await.map_err(|e| anyhow!(e))?;
    debug!(editor = editor_config.program.as_str(), "Using editor");

    Ok(ParameterWorkflow::new(
        store,
        Arc::new(SystemEditor::new(editor_config)),
        Arc::new(TerminalPrompt),
    ))
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();

    match &cli.command {
        Command::List(args) => {
            let store = args.store.connect().await?;
            list::run(args, &store, &mut stdout).await
        }
        Command::Get(args) => {
            let store = args.store.connect().await?;
            get::run(args, &store, &mut stdout).await
        }
        Command::Create(args) => {
            let workflow = interactive_workflow(&args.store).await?;
            create::run(args, &workflow, &mut stdout).await
        }
        Command::Edit(args) => {
            let workflow = interactive_workflow(&args.store).await?;
            edit::run(args, &workflow, &mut stdout).await
        }
        Command::Delete(args) => {
            let store = args.store.connect().await?;
            delete::run(args, &store, &mut stdout).await
        }
        Command::Upload(args) => {
            let store = args.store.connect().await?;
            upload::run(args, &store, &mut stdout).await
        }
        Command::Version => {
            writeln!(stdout, "ssm {}", env!("CARGO_PKG_VERSION"))?;
            Ok(())
        }
    }
}

/// Prints the error chain once. The log line only appears with `--verbose`.
fn report_failure<W: Write>(error: &anyhow::Error, err_out: &mut W) {
    debug!("Command failed: {:?}", error);
    let _ = writeln!(err_out, "Error: {:#}", error);
}

pub async fn start() {
    dotenv().ok();

    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            report_failure(&e, &mut std::io::stderr());
            1
        }
    };

    // A cancelled retry prompt can leave a stdin read parked on a blocking
    // thread, which would stall runtime shutdown.
    std::process::exit(code);
}
