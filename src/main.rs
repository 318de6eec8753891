use std::sync::Arc;

use occam_chat::{
    session::{FileSessionStorage, MemorySessionStorage, SessionStorage},
    view::{decode_input_line, TerminalView},
    Config, ConversationController, HttpConversationClient, SessionIdentity, SubmitOutcome,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::oneshot,
    task::JoinSet,
};
use tracing_subscriber::EnvFilter;

// One thread keeps submissions starting in the order their lines were read
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they don't interleave with the chat on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("occam_chat=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;

    let identity = SessionIdentity::new(session_storage(&config));
    let client = HttpConversationClient::from_config(&config);
    let controller = ConversationController::new(Arc::new(client), &identity);

    tracing::info!(
        session_id = %controller.session_id(),
        endpoint = %config.conversation_url(),
        "Conversation started"
    );

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let view = tokio::spawn(TerminalView::new(controller.clone(), std::io::stdout()).run(shutdown_rx));

    let mut submissions = JoinSet::new();
    let mut input = BufReader::new(tokio::io::stdin());
    let mut raw = Vec::new();
    loop {
        raw.clear();
        match input.read_until(b'\n', &mut raw).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "Failed to read input");
                break;
            }
        }

        let line = decode_input_line(&raw);
        let controller = controller.clone();
        submissions.spawn(async move {
            let outcome = controller.submit(&line).await;
            if outcome == SubmitOutcome::Busy {
                println!("Still waiting for the last reply...");
            }
            if outcome.accepted() {
                tracing::debug!(outcome = ?outcome, "Submission finished");
            }
        });
    }

    // Input closed: let the in-flight request finish before exiting
    while let Some(result) = submissions.join_next().await {
        if let Err(e) = result {
            tracing::error!(error = %e, "Submission task failed");
        }
    }

    let _ = shutdown_tx.send(());
    view.await??;

    Ok(())
}

/// Picks the session storage, falling back to memory when no profile
/// location is available
fn session_storage(config: &Config) -> Arc<dyn SessionStorage> {
    let storage = match &config.session_file {
        Some(path) => Ok(FileSessionStorage::new(path)),
        None => FileSessionStorage::in_data_dir(),
    };

    match storage {
        Ok(storage) => {
            tracing::debug!(path = %storage.path().display(), "Using file session storage");
            Arc::new(storage)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session will not persist across restarts");
            Arc::new(MemorySessionStorage::new())
        }
    }
}
