//! Voice Auditor CLI entry point

use std::process::ExitCode;

use clap::Parser;

use voice_auditor::cli::{
    app::{load_merged_config, run_audit, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{AuditOptions, Cli, Commands},
    config_cmd::handle_config_command,
    logging::init_tracing,
    presenter::Presenter,
};
use voice_auditor::domain::audit::UnansweredPolicy;
use voice_auditor::domain::config::{AppConfig, WhisperConfig};
use voice_auditor::domain::recognition::RecognizerKind;
use voice_auditor::domain::timing::Duration;
use voice_auditor::infrastructure::{RecognizerOptions, XdgConfigStore};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let presenter = Presenter::new();

    // Handle subcommands
    if let Some(Commands::Config { action }) = cli.command {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    let (Some(input), Some(output)) = (cli.input.clone(), cli.output.clone()) else {
        presenter.error("Both --input and --output are required");
        return ExitCode::from(EXIT_USAGE_ERROR);
    };

    // Build CLI config from args
    let whisper = (cli.model.is_some() || cli.language.is_some()).then(|| WhisperConfig {
        model: cli.model.as_ref().map(|m| m.to_string_lossy().to_string()),
        language: cli.language.clone(),
    });
    let cli_config = AppConfig {
        recognizer: cli.recognizer.map(|r| RecognizerKind::from(r).to_string()),
        poll_interval: cli.poll_interval.clone(),
        unanswered: cli.unanswered.map(|u| UnansweredPolicy::from(u).to_string()),
        extensions: (!cli.extensions.is_empty()).then(|| cli.extensions.clone()),
        whisper,
    };

    // Merge config
    let config = load_merged_config(cli_config).await;

    // Values from the file or environment are validated here, flags by clap
    let poll_interval = match config.poll_interval.as_ref() {
        Some(s) => match s.parse::<Duration>() {
            Ok(d) => d,
            Err(e) => {
                presenter.error(&format!("Invalid poll interval: {}", e));
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
        },
        None => Duration::default_poll_interval(),
    };

    let recognizer = match config.recognizer.as_ref() {
        Some(s) => match s.parse::<RecognizerKind>() {
            Ok(kind) => kind,
            Err(e) => {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
        },
        None => RecognizerKind::default(),
    };

    let unanswered = match config.unanswered.as_ref() {
        Some(s) => match s.parse::<UnansweredPolicy>() {
            Ok(policy) => policy,
            Err(e) => {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
        },
        None => UnansweredPolicy::default(),
    };

    let options = AuditOptions {
        input,
        output,
        recognizer: RecognizerOptions {
            kind: recognizer,
            model: config.whisper_model(),
            language: config.whisper_language_or_default().to_string(),
        },
        poll_interval,
        unanswered,
        extensions: config.extensions_or_default(),
    };

    run_audit(options).await
}
