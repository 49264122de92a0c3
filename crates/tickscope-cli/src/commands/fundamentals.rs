use serde_json::json;
use tickscope_core::Symbol;

use crate::cli::FundamentalsArgs;
use crate::error::CliError;
use crate::output::Table;

use super::CommandContext;

pub async fn run(args: &FundamentalsArgs, ctx: &CommandContext<'_>) -> Result<(), CliError> {
    let symbol = Symbol::parse(&args.ticker)?;

    let snapshot = ctx.fetcher.fundamentals_with_mode(&symbol, ctx.mode).await;

    let table = Table::key_value(snapshot.fields());
    let data = json!({
        "ticker": symbol,
        "fundamentals": &*snapshot,
    });

    ctx.emit("fundamentals", None, data, table).await
}
