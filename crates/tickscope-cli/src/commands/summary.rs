use std::time::Duration;

use tickscope_core::{SummaryWindows, Symbol};
use tracing::info;

use crate::cli::SummaryArgs;
use crate::error::CliError;
use crate::output::Table;

use super::CommandContext;

pub async fn run(args: &SummaryArgs, ctx: &CommandContext<'_>) -> Result<(), CliError> {
    let symbols = args
        .tickers
        .iter()
        .map(|raw| Symbol::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let windows = SummaryWindows {
        daily_period: args.daily_period.clone(),
        daily_interval: args.daily_interval.clone(),
        intraday_period: args.intraday_period.clone(),
        intraday_interval: args.intraday_interval.clone(),
    };

    for round in 1..=args.rounds {
        if round > 1 {
            tokio::time::sleep(Duration::from_secs(args.every_secs)).await;
        }

        let mut rows = Vec::with_capacity(symbols.len());
        for symbol in &symbols {
            rows.push(
                ctx.fetcher
                    .summary_row_with_mode(symbol, &windows, ctx.mode)
                    .await,
            );
        }
        info!(round, tickers = rows.len(), "summary round complete");

        let table = Table::wide(rows.iter().map(|row| row.fields()).collect());
        let data = serde_json::to_value(&rows)?;
        let round = (args.rounds > 1).then_some(round);

        ctx.emit("summary", round, data, table).await?;
    }

    Ok(())
}
