use tracing_subscriber::fmt;

/// Installs the stderr `fmt` subscriber. Only the binary calls this.
pub fn init(verbose: bool) {
    if !verbose {
        return;
    }
    // A second install (tests, embedding hosts) keeps the existing subscriber.
    let _ = fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init();
}
