//! Entry point: parse CLI and dispatch to command handlers.

use clap::Parser;
use wnba_ingest::{
    cli::{Commands, WnbaIngest},
    commands::{
        import::{handle_import, ImportParams},
        status::{handle_status, StatusParams},
    },
};

/// Run the CLI.
#[tokio::main]
async fn main() {
    let app = WnbaIngest::parse();

    let result = match app.command {
        Commands::Import {
            force,
            season,
            base_url,
            db_path,
            verbose,
        } => {
            handle_import(ImportParams {
                force,
                season,
                base_url,
                db_path,
                verbose,
            })
            .await
        }

        Commands::Status { db_path, json } => handle_status(StatusParams { db_path, json }),
    };

    if let Err(err) = result {
        // Message plus the cause chain, so automation logs show the full
        // failure context; non-zero exit signals orchestration callers.
        let err = anyhow::Error::from(err);
        eprintln!("error: {err}");
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
        std::process::exit(1);
    }
}
