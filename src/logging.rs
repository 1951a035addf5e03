/// Installs the logger for the `log` macros.
///
/// Logging stops when the returned handle is dropped, so the binary keeps it
/// alive for its whole run.
pub fn init(level: &str) -> log2::Handle {
    log2::stdout().module(false).level(level).start()
}
