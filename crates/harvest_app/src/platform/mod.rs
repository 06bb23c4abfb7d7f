//! Process-level plumbing: command line, config file, browser session.
pub mod cli;
pub mod config;
pub mod session;

use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::Parser;
use harvest_core::{RunSummary, Timings};
use harvest_engine::{
    AssetFetcher, CdpDocument, DirectorySink, FetchSettings, HarvestSettings, Harvester,
    Locators, PageFetcher, ReqwestFetcher,
};
use harvest_logging::{harvest_info, Phase};

use cli::Cli;
use config::FetchMode;
use session::{BrowserSession, PageChoice};

pub async fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    harvest_logging::initialize(cli.log.into(), cli.log_level(), &cli.log_file);

    let mut config = config::load(&cli.config)?;
    cli.apply_overrides(&mut config);

    if let Some(path) = &cli.dump_config {
        let written = config::save(path, &config)?;
        harvest_info!(Phase::Startup, "Wrote config to {}", written.display());
        return Ok(());
    }

    let target = cli
        .session_target()
        .ok_or_else(|| anyhow!("choose a browser with --connect <WS_URL> or --launch"))?;
    let choice = PageChoice {
        page_match: cli.page_match.clone(),
        url: cli.url.clone(),
    };
    let session = BrowserSession::open(target, &choice).await?;

    let result = harvest(&session, &config).await;
    session.close().await;

    let summary = result?;
    println!("{summary}");
    Ok(())
}

async fn harvest(
    session: &BrowserSession,
    config: &config::HarvestConfig,
) -> anyhow::Result<RunSummary> {
    let sink = DirectorySink::new(config.output_dir.clone())
        .with_context(|| format!("cannot use output directory {:?}", config.output_dir))?;
    harvest_info!(
        Phase::Startup,
        "Saving into {}",
        config.output_dir.display()
    );

    let fetch_settings = FetchSettings::from(&config.fetch);
    let fetcher: Arc<dyn AssetFetcher> = match config.fetch.mode {
        FetchMode::Page => Arc::new(PageFetcher::new(session.page().clone(), fetch_settings)),
        FetchMode::Direct => Arc::new(ReqwestFetcher::new(fetch_settings)),
    };

    let locators = Locators::from(config.locators.clone());
    let settings = HarvestSettings::new(Timings::from(&config.timings), &locators);
    let document = CdpDocument::new(session.page().clone(), locators);
    let harvester = Harvester::new(document, fetcher, Arc::new(sink), settings)?;

    Ok(harvester.run().await?)
}
