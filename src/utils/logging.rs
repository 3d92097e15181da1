use log::LevelFilter;

/// Initialise the global logger for the binary.
///
/// `RUST_LOG` always wins; otherwise `verbose` selects `debug` over `warn`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(default_level);
    builder.parse_default_env();
    builder.format_timestamp(None);

    // A second init (e.g. from tests) is harmless.
    let _ = builder.try_init();
}
