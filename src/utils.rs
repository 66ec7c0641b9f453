// ###################################
// ->   Error format chain
// ###################################
/// Calls `Error::source()` on a chain of errors and tries to write them to a `Formatter`.
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current_src = e.source();
    while let Some(cause) = current_src {
        write!(f, "Caused by:\n\t{cause}")?;
        current_src = cause.source();
    }

    Ok(())
}

/// Displays an error followed by its whole `source()` chain on one line.
/// Used for log fields where the multi-line `error_chain_fmt` output would be noisy.
pub struct ErrorChain<'a, E>(pub &'a E);

impl<E: std::error::Error> std::fmt::Display for ErrorChain<'_, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)?;
        let mut current_src = self.0.source();
        while let Some(cause) = current_src {
            write!(f, ": {cause}")?;
            current_src = cause.source();
        }
        Ok(())
    }
}
