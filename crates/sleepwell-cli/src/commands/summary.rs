use sleepwell_core::summary::summarize_configured;
use sleepwell_core::Config;

use super::open_app;

/// One-shot summary of recent sleep, printed as HTML.
pub fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = open_app(config)?;
    let Some((_, job)) = app.begin_summary() else {
        return Err("a summary is already being generated".into());
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let html = runtime.block_on(summarize_configured(&config.summary, &job.sessions, job.goal_ms));

    app.finish_summary(job.ticket, html.clone());
    println!("{html}");
    Ok(())
}
