//! Terminal survey entry point.
//!
//! Usage: `survey [page-url]`, where the page URL carries the participant ID
//! in its query string. `SURVEY_API_URL` selects the ingest server.

use std::sync::Arc;

use survey_form::{
    Clock, ElapsedTimer, FormController, HttpStudyDataClient, Session, SystemClock, run_terminal,
};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_API_URL: &str = "http://localhost:5000";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Logs go to stderr so they do not interleave with the form on stdout.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let page_url = std::env::args().nth(1).unwrap_or_default();
    let api_url = std::env::var("SURVEY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let session = Session::new(&page_url, clock.as_ref());
    tracing::info!(
        participant_id = session.participant_id(),
        %api_url,
        "survey session started"
    );

    let mut timer = ElapsedTimer::start(session.start_time(), clock.clone());
    let mut controller = FormController::new(session);
    let client = HttpStudyDataClient::new(&api_url);

    let input = BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();

    if let Err(err) = run_terminal(
        &mut controller,
        &mut timer,
        &client,
        clock.as_ref(),
        input,
        &mut output,
    )
    .await
    {
        tracing::error!(error = %err, "terminal session failed");
        std::process::exit(1);
    }
}
