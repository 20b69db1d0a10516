pub mod error;
pub mod config;
pub mod store;
pub mod types;
pub mod spi;
pub mod handle;
pub mod catalog;
pub mod codec;
pub mod metadata;
pub mod connector;

pub use catalog::CatalogCache;
pub use connector::TellConnector;
pub use error::{ConnectorError, ConnectorResult};
pub use handle::{ColumnHandle, TableHandle, TableLayoutHandle};
pub use metadata::TellMetadata;

// Test-only printing helper: expands to tprintln! during tests and is absent otherwise.
// Usage in tests: tprintln!("debug: {}", value);
#[cfg(any(test, debug_assertions))]
#[macro_export]
macro_rules! tprintln {
    ($($arg:tt)*) => ( eprintln!($($arg)*) );
}

// In non-test builds, provide a no-op tprintln! so calls compile without effect.
#[cfg(not(any(test, debug_assertions)))]
#[macro_export]
macro_rules! tprintln {
    ($($arg:tt)*) => ({
        // Preserve formatting checks in release without producing code
        if false { let _ = format!($($arg)*); }
    });
}
