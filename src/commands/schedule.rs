use anyhow::{Context, Result};

use newsharvest::config::Config;
use newsharvest::job::CrawlJob;
use newsharvest::scheduler::Scheduler;

/// Run the daily scheduler until Ctrl-C
pub async fn schedule(config: Config) -> Result<()> {
    let job = CrawlJob::new(&config).context("Failed to set up crawl job")?;
    let mut scheduler =
        Scheduler::new(&config.schedule).context("Failed to set up scheduler")?;

    println!(
        "Scheduled daily crawl of '{}' at {} (Ctrl-C to stop)",
        config.site.category_name, config.schedule.run_at
    );

    let runs = scheduler
        .run(|| job.run())
        .await
        .context("Scheduler stopped with an error")?;

    tracing::info!(runs, "Scheduler exited");
    Ok(())
}
