use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use tracing::info;

use smc_signals::execution::{
    print_signals, BroadcastSink, Dispatcher, LoggingRouter, SessionSummary, StrategyConfig,
    WebhookForwarder,
};
use smc_signals::streams::{load_events, MarketEvent};
use smc_signals::SmcEngine;

#[derive(Parser, Debug)]
#[command(name = "smc-signals")]
#[command(about = "SMC opening-range confluence signal engine")]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a bar file (.csv) or bar/fill event log (.jsonl) through the engine
    Replay {
        /// Path to the feed file
        #[arg(short, long)]
        feed: PathBuf,

        /// Strategy config (JSON). Defaults are used when omitted
        #[arg(short, long, env = "SMC_CONFIG")]
        config: Option<PathBuf>,

        /// Instrument symbol for signal payloads
        #[arg(short, long)]
        symbol: Option<String>,

        /// Notification relay endpoint (POST /signal). Signals are printed
        /// to stdout when unset
        #[arg(long, env = "SMC_RELAY_URL")]
        webhook_url: Option<String>,

        /// Exchange timezone, e.g. America/Chicago
        #[arg(long)]
        timezone: Option<String>,

        /// Minimum confluence score to trade (1-5)
        #[arg(long)]
        min_score: Option<u8>,

        /// Opening range length in minutes
        #[arg(long)]
        opening_range_minutes: Option<u32>,

        /// Stop loss in ticks
        #[arg(long)]
        stop_loss_ticks: Option<u32>,

        /// Profit target in ticks
        #[arg(long)]
        profit_target_ticks: Option<u32>,

        /// Trailing stop in ticks (0 disables)
        #[arg(long)]
        trail_stop_ticks: Option<u32>,

        /// Max entries per day
        #[arg(long)]
        max_daily_trades: Option<u32>,

        /// Max daily loss in dollars (0 disables)
        #[arg(long)]
        max_daily_loss: Option<f64>,

        /// Cooldown after a stop-out, in minutes
        #[arg(long)]
        cooldown_minutes: Option<u32>,

        /// Bars of history before evaluating
        #[arg(long)]
        warmup_bars: Option<usize>,
    },

    /// Print the default strategy config as JSON
    DefaultConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("smc_signals=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Commands::DefaultConfig => {
            println!("{}", serde_json::to_string_pretty(&StrategyConfig::default())?);
        }
        Commands::Replay {
            feed,
            config,
            symbol,
            webhook_url,
            timezone,
            min_score,
            opening_range_minutes,
            stop_loss_ticks,
            profit_target_ticks,
            trail_stop_ticks,
            max_daily_trades,
            max_daily_loss,
            cooldown_minutes,
            warmup_bars,
        } => {
            let mut cfg = match &config {
                Some(path) => StrategyConfig::load(path)?,
                None => StrategyConfig::default(),
            };

            if let Some(v) = symbol {
                cfg.symbol = v;
            }
            if let Some(tz) = timezone {
                cfg.timezone = tz
                    .parse::<Tz>()
                    .map_err(|e| anyhow!("Unknown timezone '{}': {}", tz, e))?;
            }
            if let Some(v) = min_score {
                cfg.min_score = v;
            }
            if let Some(v) = opening_range_minutes {
                cfg.opening_range_minutes = v;
            }
            if let Some(v) = stop_loss_ticks {
                cfg.stop_loss_ticks = v;
            }
            if let Some(v) = profit_target_ticks {
                cfg.profit_target_ticks = v;
            }
            if let Some(v) = trail_stop_ticks {
                cfg.trail_stop_ticks = v;
            }
            if let Some(v) = max_daily_trades {
                cfg.max_daily_trades = v;
            }
            if let Some(v) = max_daily_loss {
                cfg.max_daily_loss = v;
            }
            if let Some(v) = cooldown_minutes {
                cfg.cooldown_minutes = v;
            }
            if let Some(v) = warmup_bars {
                cfg.warmup_bars = v;
            }
            cfg.validate()?;

            run_replay(feed, cfg, webhook_url).await?;
        }
    }

    Ok(())
}

async fn run_replay(
    feed: PathBuf,
    config: StrategyConfig,
    webhook_url: Option<String>,
) -> Result<()> {
    info!("Replaying {} | symbol={} tz={}", feed.display(), config.symbol, config.timezone);
    let events = load_events(&feed)?;

    // Bar-only feeds never report fills, so intents cannot hold the position
    let signal_only = !events.iter().any(|e| matches!(e, MarketEvent::Fill(_)));
    if signal_only {
        info!("No fills in feed, running signal-only");
    }

    let sink = BroadcastSink::new();
    let rx = sink.subscribe();
    let relayed = match webhook_url {
        Some(url) => {
            info!("Forwarding signals to {}", url);
            let forwarder = WebhookForwarder::new(url)?;
            tokio::spawn(forwarder.run(rx))
        }
        None => tokio::spawn(print_signals(rx)),
    };

    let mut dispatcher = Dispatcher::new(SmcEngine::new(config), LoggingRouter::new(), sink)
        .with_signal_only(signal_only);
    for event in &events {
        dispatcher.handle(event);
    }

    // Dropping the sink closes the channel so the consumer drains and exits
    let (_engine, router, sink, summary) = dispatcher.into_parts();
    drop(sink);
    let relayed = relayed.await?;

    print_summary(&summary, router.submitted(), relayed);
    Ok(())
}

fn print_summary(summary: &SessionSummary, submitted: usize, relayed: u64) {
    eprintln!("\n═══════════════════════════════════════════════════════════");
    eprintln!("                 SMC SIGNAL REPLAY SUMMARY                  ");
    eprintln!("═══════════════════════════════════════════════════════════\n");

    eprintln!("Bars Processed:    {}", summary.bars);
    eprintln!("Fills Processed:   {}", summary.fills);
    eprintln!("Trading Days:      {}", summary.days);
    eprintln!();
    eprintln!(
        "Entries:           {} ({} long / {} short)",
        summary.entries(),
        summary.long_entries,
        summary.short_entries
    );
    eprintln!("Orders Submitted:  {}", submitted);
    eprintln!("Orders Rejected:   {}", summary.rejected_entries);
    eprintln!("Signals Relayed:   {}", relayed);
    eprintln!();
    eprintln!("Closed Trades:     {}", summary.closed_trades);
    eprintln!("Wins:              {} ({:.1}%)", summary.wins, summary.win_rate());
    eprintln!("Losses:            {}", summary.losses);
    eprintln!("Realized P&L:      ${:+.2}", summary.realized_pnl);

    eprintln!("\n═══════════════════════════════════════════════════════════\n");
}
