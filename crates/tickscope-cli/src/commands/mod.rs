mod fundamentals;
mod summary;
mod technicals;

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tickscope_core::{
    CacheMode, CachedFetcher, FetcherConfig, ReqwestHttpClient, UtcDateTime, YahooAdapter,
};
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::output::{self, Report, ReportMeta, Table};

/// Everything a command needs besides its own arguments.
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub fetcher: CachedFetcher,
    pub mode: CacheMode,
}

impl CommandContext<'_> {
    /// Print `data` (json) or `table` (table format) with the shared metadata.
    pub async fn emit(
        &self,
        command: &'static str,
        round: Option<u32>,
        data: Value,
        table: Table,
    ) -> Result<(), CliError> {
        let (cached_history, cached_fundamentals) = self.fetcher.cached_entries().await;
        let report = Report {
            meta: ReportMeta {
                command,
                source: self.fetcher.source_name(),
                mock: self.cli.mock,
                cache_mode: cache_mode_name(self.mode),
                generated_at: UtcDateTime::now().format_rfc3339(),
                round,
                cached_history,
                cached_fundamentals,
            },
            data,
            table,
        };

        output::render(&report, self.cli.format, self.cli.pretty)
    }
}

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let ctx = CommandContext {
        cli,
        fetcher: build_fetcher(cli)?,
        mode: CacheMode::from(cli.cache),
    };

    match &cli.command {
        Command::Summary(args) => summary::run(args, &ctx).await,
        Command::Technicals(args) => technicals::run(args, &ctx).await,
        Command::Fundamentals(args) => fundamentals::run(args, &ctx).await,
    }
}

fn build_fetcher(cli: &Cli) -> Result<CachedFetcher, CliError> {
    let adapter = if cli.mock {
        YahooAdapter::default()
    } else {
        let client = ReqwestHttpClient::new().map_err(|error| CliError::Command(error.to_string()))?;
        YahooAdapter::with_http_client(Arc::new(client))
    };
    let adapter = adapter.with_timeout_ms(cli.timeout_ms);

    let config = FetcherConfig {
        history_ttl: Duration::from_secs(cli.history_ttl_secs),
        fundamentals_ttl: Duration::from_secs(cli.fundamentals_ttl_secs),
    };
    debug!(
        mock = adapter.is_mock(),
        history_ttl_secs = cli.history_ttl_secs,
        fundamentals_ttl_secs = cli.fundamentals_ttl_secs,
        "building fetcher"
    );

    Ok(CachedFetcher::with_config(Arc::new(adapter), config))
}

const fn cache_mode_name(mode: CacheMode) -> &'static str {
    match mode {
        CacheMode::Use => "use",
        CacheMode::Refresh => "refresh",
        CacheMode::Bypass => "bypass",
    }
}
