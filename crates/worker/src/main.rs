use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use radar_core::domain::radar::{Nation, RadarFilters, DEFAULT_MIN_SALES};
use radar_core::ranking::view::{rising_models, RadarStats, RISING_TOP_N};
use radar_core::service::RadarService;
use radar_core::storage::cache::RadarCache;
use radar_core::time::month::{available_months, Month};

mod report;

#[derive(Debug, Parser)]
#[command(name = "radar_worker")]
struct Args {
    /// Reporting month (YYYY-MM). Defaults to the most recent complete month.
    #[arg(long)]
    month: Option<Month>,

    /// Market to rank: domestic or export.
    #[arg(long, default_value = "domestic")]
    nation: Nation,

    /// Drop models that sold fewer units than this in the reporting month.
    #[arg(long, default_value_t = DEFAULT_MIN_SALES)]
    min_sales: u64,

    /// Drop models with no sales in the previous month.
    #[arg(long)]
    exclude_new_entries: bool,

    /// Number of rising models to print.
    #[arg(long, default_value_t = RISING_TOP_N)]
    limit: usize,

    /// Print the full ranked payload as JSON instead of the rising report.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = radar_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let month = resolve_month(args.month)?;
    let source = radar_core::ingest::source_from_settings(&settings)?;
    let service = RadarService::new(source, RadarCache::new());

    let data = match service.compute(month, args.nation).await {
        Ok(data) => data,
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(%month, nation = %args.nation, error = %format!("{err:#}"), "radar run failed");
            return Err(err);
        }
    };

    let stats = RadarStats::from_models(&data.models);
    tracing::info!(
        %month,
        nation = %args.nation,
        source = service.source_name(),
        total = stats.total,
        rising = stats.rising,
        falling = stats.falling,
        "radar computed"
    );

    if args.json {
        let out = serde_json::to_string_pretty(&data).context("serialize radar data failed")?;
        println!("{out}");
        return Ok(());
    }

    let filters = RadarFilters {
        min_sales: args.min_sales,
        exclude_new_entries: args.exclude_new_entries,
    };
    let rising = rising_models(&data.models, &filters, args.limit);
    print!("{}", report::render(&data, &stats, &rising));
    Ok(())
}

fn resolve_month(arg: Option<Month>) -> anyhow::Result<Month> {
    if let Some(m) = arg {
        return Ok(m);
    }
    available_months(chrono::Utc::now().date_naive(), 1)
        .into_iter()
        .next()
        .context("no reporting month available")
}

fn init_sentry(settings: &radar_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "radar_worker",
            "--month",
            "2024-05",
            "--nation",
            "export",
            "--min-sales",
            "0",
            "--exclude-new-entries",
            "--limit",
            "5",
        ])
        .unwrap();
        assert_eq!(args.month.unwrap().to_string(), "2024-05");
        assert_eq!(args.nation, Nation::Export);
        assert_eq!(args.min_sales, 0);
        assert!(args.exclude_new_entries);
        assert_eq!(args.limit, 5);
        assert!(!args.json);
    }

    #[test]
    fn defaults_match_dashboard() {
        let args = Args::try_parse_from(["radar_worker"]).unwrap();
        assert_eq!(args.nation, Nation::Domestic);
        assert_eq!(args.min_sales, 300);
        assert_eq!(args.limit, 20);
        assert!(resolve_month(None).is_ok());
    }

    #[test]
    fn rejects_malformed_month() {
        assert!(Args::try_parse_from(["radar_worker", "--month", "2024-13"]).is_err());
        assert!(Args::try_parse_from(["radar_worker", "--nation", "mars"]).is_err());
    }
}
