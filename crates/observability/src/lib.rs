//! Tracing and logging setup shared by PlantStore binaries.

/// Initialize process-wide logging with the default (JSON) format.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::default());
}

/// Tracing configuration (filters, formats).
pub mod tracing;

pub use self::tracing::LogFormat;

#[cfg(test)]
mod tests {
    #[test]
    fn default_init_is_idempotent() {
        super::init();
        super::init();
    }
}
