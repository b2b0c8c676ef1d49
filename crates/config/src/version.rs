//! Version information.

/// The short version information.
pub const SHORT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The long version information.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nedition: ",
    "2024",
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions() {
        assert!(LONG_VERSION.starts_with(SHORT_VERSION));
    }
}
