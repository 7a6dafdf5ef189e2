pub mod api;
pub mod duration;
pub mod history;
pub mod models;
pub mod session;
pub mod settings;

pub use api::{ApiClient, FocusApi};
pub use history::HistoryStore;
pub use models::SessionRecord;
pub use session::{ControllerState, Lifecycle, SessionController, StopwatchClock};
pub use settings::Settings;

use std::sync::Arc;

use anyhow::Result;
use log::{debug, info};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Line-driven shell around the controller. Reads one command per line from
/// stdin and prints plain-text state and history; everything else lives in
/// the library modules.
pub async fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("focustrack starting up...");

    let settings = Settings::from_env();
    info!(
        "record-keeping service at {} (user {})",
        settings.base_url, settings.user_id
    );

    let api = Arc::new(ApiClient::new(settings.base_url.clone()));
    let history = HistoryStore::new();
    let controller = SessionController::new(api, history.clone(), settings.user_id);

    // Passive observer on the state channel; the shell prints on demand.
    let mut events = controller.subscribe();
    tokio::spawn(async move {
        while events.changed().await.is_ok() {
            let state = events.borrow_and_update().clone();
            debug!("state changed: {state:?}");
        }
    });

    println!("commands: start | break | resume | end | history | status | quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => {}
            "start" => report(controller.start_focus().await),
            "break" => report(controller.start_break().await),
            "resume" => report(controller.end_break().await),
            "end" => {
                report(controller.end_focus().await);
                print_history(&history).await;
            }
            "history" => match controller.refresh_history().await {
                Ok(_) => print_history(&history).await,
                Err(err) => println!("error: {err:#}"),
            },
            "status" => print_status(&controller.get_state().await),
            "quit" | "exit" => break,
            other => println!("unknown command: {other}"),
        }
    }

    controller.shutdown().await
}

fn report(result: Result<ControllerState>) {
    match result {
        Ok(state) => print_status(&state),
        Err(err) => println!("error: {err:#}"),
    }
}

fn print_status(state: &ControllerState) {
    let mut line = format!(
        "[{}] {}",
        state.lifecycle.as_str(),
        duration::format_elapsed(state.stopwatch_seconds)
    );
    if state.busy {
        line.push_str(" (request in flight)");
    }
    if let Some(message) = &state.last_error {
        line.push_str(&format!("  last error: {message}"));
    }
    println!("{line}");
}

async fn print_history(history: &HistoryStore) {
    let Some(sessions) = history.snapshot().await else {
        println!("history not loaded yet");
        return;
    };

    if sessions.is_empty() {
        println!("no completed sessions yet");
        return;
    }

    for session in &sessions {
        let ended = session
            .end_time
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "#{:<4} {}  {:<19}  focus {}  break {}",
            session.session_id,
            session.start_time.format("%Y-%m-%d %H:%M:%S"),
            ended,
            duration::format_span(session.focus_time.as_deref()),
            duration::format_span(session.break_time.as_deref()),
        );
    }
}
