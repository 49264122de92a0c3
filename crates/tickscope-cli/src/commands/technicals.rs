use serde_json::json;
use tickscope_core::{FieldValue, HistoryRequest, Symbol};

use crate::cli::TechnicalsArgs;
use crate::error::CliError;
use crate::output::Table;

use super::CommandContext;

pub async fn run(args: &TechnicalsArgs, ctx: &CommandContext<'_>) -> Result<(), CliError> {
    let symbol = Symbol::parse(&args.ticker)?;
    let request = HistoryRequest::new(symbol.clone(), &args.period, &args.interval);

    let indicators = ctx.fetcher.technicals_with_mode(request, ctx.mode).await;

    let table = Table::key_value(
        indicators
            .fields()
            .into_iter()
            .map(|(name, value)| (name, value.map(FieldValue::Number)))
            .collect(),
    );
    let data = json!({
        "ticker": symbol,
        "period": args.period,
        "interval": args.interval,
        "indicators": indicators,
    });

    ctx.emit("technicals", None, data, table).await
}
