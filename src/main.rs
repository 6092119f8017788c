//! `prthreads` 바이너리 진입점.

use prthreads::interface::cli::{AppComposition, Cli, CliAction};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let parsed = match Cli::parse_action() {
        Ok(parsed) => parsed,
        Err(msg) => {
            eprintln!("error: {msg}");
            std::process::exit(2);
        }
    };

    let composition = AppComposition::new(parsed.quiet);

    let result = match parsed.action {
        CliAction::InspectConfig => composition
            .inspect_config_usecase()
            .execute()
            .map(|json| println!("{json}")),
        CliAction::Sync(options) => composition
            .sync_usecase()
            .execute(options)
            .await
            .map(|summary| {
                println!(
                    "read {} / in diff {} / already reported {} / posted {} / resolved {}",
                    summary.issues_read,
                    summary.issues_in_diff,
                    summary.already_reported,
                    summary.posted,
                    summary.resolved
                )
            }),
        CliAction::Threads(options) => composition
            .list_threads_usecase()
            .execute(options)
            .await
            .map(|_| ()),
        CliAction::ChangedFiles(options) => composition
            .changed_files_usecase()
            .execute(options)
            .await
            .map(|_| ()),
    };

    if let Err(err) = result {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
