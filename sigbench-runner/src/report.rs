//! Plain-text rendering of run results and signal notices.
//!
//! Output is meant for a terminal or a chat notification. Nothing here
//! touches I/O.

use std::fmt::Write;

use sigbench_core::domain::PositionSide;
use sigbench_core::signals::LatestSignal;

use crate::runner::BacktestResult;

/// Multi-line summary of one strategy run.
pub fn format_summary(result: &BacktestResult) -> String {
    let m = &result.metrics;
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "=== {} ===", result.strategy);
    let _ = writeln!(out, "Symbol:          {} ({})", result.symbol, result.timeframe);
    let _ = writeln!(
        out,
        "Period:          {} to {}",
        result.start.format("%Y-%m-%d %H:%M"),
        result.end.format("%Y-%m-%d %H:%M")
    );
    let _ = writeln!(out, "Bars:            {}", result.bar_count);
    let _ = writeln!(out, "Signals:         {}", result.signal_count);
    let _ = writeln!(
        out,
        "SL / TP:         {:.2}% / {:.2}%",
        result.config.stop_loss_pct, result.config.take_profit_pct
    );
    let _ = writeln!(out, "Trades:          {}", m.trade_count);
    let _ = writeln!(out, "--- Performance ---");
    let _ = writeln!(out, "Total Return:    {:.2}%", m.total_return);
    let _ = writeln!(out, "Avg Trade:       {:.3}%", m.avg_trade);
    let _ = writeln!(out, "Win Rate:        {:.2}%", m.win_rate);
    let _ = writeln!(out, "Sharpe:          {:.3}", m.sharpe);
    let _ = writeln!(out, "Profit Factor:   {:.2}", m.profit_factor);
    let _ = writeln!(out, "Max Consec Win:  {}", m.max_consecutive_wins);
    let _ = writeln!(out, "Max Consec Loss: {}", m.max_consecutive_losses);
    let _ = writeln!(
        out,
        "Exits SL / TP:   {} / {}",
        m.stop_loss_exits, m.take_profit_exits
    );
    if result.synthetic {
        let _ = writeln!(out, "WARNING: Results based on SYNTHETIC data");
    }
    out
}

/// Notice for a signal on the newest bar, `None` when that bar is flat.
pub fn format_signal_notice(
    strategy: &str,
    symbol: &str,
    timeframe: &str,
    latest: &LatestSignal,
) -> Option<String> {
    let side = match latest.signal.side()? {
        PositionSide::Long => "BUY",
        PositionSide::Short => "SELL",
    };
    Some(format!(
        "New signal\n\
         Strategy:  {strategy}\n\
         Symbol:    {symbol}\n\
         Timeframe: {timeframe}\n\
         Side:      {side}\n\
         Open:      {}\n\
         Close:     {}\n\
         Bar time:  {} UTC",
        latest.open,
        latest.close,
        latest.timestamp.format("%Y-%m-%d %H:%M:%S"),
    ))
}
