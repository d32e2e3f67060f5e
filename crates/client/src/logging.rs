use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a stderr subscriber filtered by `RUST_LOG` (default `info`).
///
/// Meant for binaries and examples embedding the SDK; the library itself only
/// emits events. Fails if a global subscriber is already set.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_only_once() {
        assert!(init().is_ok());
        assert!(init().is_err());
    }
}
