//! Main app runner for audit sessions

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::application::ports::ConfigStore;
use crate::application::{AuditCallbacks, AuditConfig, AuditLoop, AuditRoots};
use crate::domain::audit::{Command, FileOutcome};
use crate::domain::config::{AppConfig, WhisperConfig};
use crate::domain::paths::relative_path;
use crate::domain::recognition::{RecognizerKind, Vocabulary};
use crate::infrastructure::{create_recognizer, RodioPlayer, WalkdirScanner, XdgConfigStore};

use super::args::AuditOptions;
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;
pub const EXIT_INTERRUPTED: u8 = 130;

/// Environment variable overriding the recognizer backend
pub const ENV_RECOGNIZER: &str = "VOICE_AUDITOR_RECOGNIZER";
/// Environment variable overriding the Whisper model path
pub const ENV_WHISPER_MODEL: &str = "VOICE_AUDITOR_WHISPER_MODEL";

type SharedPresenter = Arc<Mutex<Presenter>>;

fn lock(presenter: &SharedPresenter) -> MutexGuard<'_, Presenter> {
    presenter.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run one audit session
pub async fn run_audit(options: AuditOptions) -> ExitCode {
    let presenter: SharedPresenter = Arc::new(Mutex::new(Presenter::new()));

    let scanner = WalkdirScanner::new(options.extensions.clone());
    let (roots, queue) = match AuditRoots::prepare(&options.input, &options.output, &scanner) {
        Ok(prepared) => prepared,
        Err(e) => {
            lock(&presenter).error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let recognizer = match create_recognizer(&options.recognizer) {
        Ok(recognizer) => recognizer,
        Err(e) => {
            lock(&presenter).error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let shutdown = ShutdownSignal::new();
    shutdown.setup();

    let vocabulary = Vocabulary::default();
    if !queue.is_empty() {
        let verb = match options.recognizer.kind {
            RecognizerKind::Console => "type",
            RecognizerKind::Whisper => "say",
        };
        lock(&presenter).info(&format!(
            "{} file(s) to audit. While a file plays, {} {}",
            queue.remaining(),
            verb,
            vocabulary.describe()
        ));
    }

    let config = AuditConfig {
        poll_interval: options.poll_interval,
        unanswered: options.unanswered,
        vocabulary: vocabulary.clone(),
    };
    let callbacks = build_callbacks(&presenter, roots.input(), vocabulary.describe());

    let mut audit = AuditLoop::new(RodioPlayer::new(), recognizer, roots.dispatcher(), config)
        .with_shutdown(shutdown.flag());

    let result = audit.run(queue, &callbacks).await;

    let mut presenter = lock(&presenter);
    presenter.stop_spinner();
    match result {
        Ok(report) => {
            presenter.summary(&report);
            if report.interrupted {
                presenter.warn("Interrupted, remaining files left in place");
                ExitCode::from(EXIT_INTERRUPTED)
            } else {
                presenter.success("All files processed");
                ExitCode::from(EXIT_SUCCESS)
            }
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Progress callbacks printing through the shared presenter
fn build_callbacks(presenter: &SharedPresenter, input_root: &Path, expected: String) -> AuditCallbacks {
    let display = {
        let input_root = input_root.to_path_buf();
        move |file: &Path| -> PathBuf { relative_path(&input_root, file) }
    };

    let on_start = {
        let presenter = Arc::clone(presenter);
        let display = display.clone();
        move |file: &Path, remaining: usize| {
            lock(&presenter).now_playing(&display(file), remaining);
        }
    };

    let on_command = {
        let presenter = Arc::clone(presenter);
        move |_: &Path, command: Command| lock(&presenter).heard(command)
    };

    let on_unrecognized = {
        let presenter = Arc::clone(presenter);
        move |phrase: Option<&str>| lock(&presenter).unrecognized(phrase, &expected)
    };

    let on_outcome = {
        let presenter = Arc::clone(presenter);
        move |file: &Path, outcome: &FileOutcome| {
            lock(&presenter).outcome(&display(file), outcome);
        }
    };

    AuditCallbacks {
        on_file_start: Some(Box::new(on_start)),
        on_command: Some(Box::new(on_command)),
        on_unrecognized: Some(Box::new(on_unrecognized)),
        on_outcome: Some(Box::new(on_outcome)),
    }
}

/// Configuration from environment variables
pub fn env_config() -> AppConfig {
    let var = |name: &str| env::var(name).ok().filter(|s| !s.is_empty());

    AppConfig {
        recognizer: var(ENV_RECOGNIZER),
        whisper: var(ENV_WHISPER_MODEL).map(|model| WhisperConfig {
            model: Some(model),
            language: None,
        }),
        ..Default::default()
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable config file");
        AppConfig::empty()
    });

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config())
        .merge(cli_config)
}
