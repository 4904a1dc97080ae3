use anyhow::Context as _;

const DEFAULT_FILTER: &str = "info";
const VERBOSE_FILTER: &str = "info,book_nexus=debug";

/// `RUST_LOG` wins when set; otherwise `--verbose` picks the debug filter.
pub fn init(verbose: bool) -> anyhow::Result<()> {
    let fallback = if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(fallback))
        .context("build log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("initialize tracing subscriber: {err}"))?;

    Ok(())
}
