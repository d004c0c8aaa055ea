//! Profiling support via Tracy.
//!
//! Instrumentation is enabled with the `profiling` Cargo feature. When the
//! feature is off every macro compiles to nothing.
//!
//! ```ignore
//! use trellis_core::{profile_plot, profile_scope};
//!
//! fn propagate() {
//!     profile_scope!("propagate");
//!     // ...
//!     profile_plot!("transform_nodes", node_count);
//! }
//! ```

#[cfg(feature = "profiling")]
pub use tracy_client::{self, Client, plot as tracy_plot, span};

/// Create a profiling span for the current scope.
///
/// The span ends when the scope exits.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_scope {
    ($name:expr) => {
        let _profile_span = $crate::profiling::span!($name);
    };
}

/// Create a profiling span (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_scope {
    ($name:expr) => {};
}

/// Plot a value over time in Tracy.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_plot {
    ($name:expr, $value:expr) => {
        $crate::profiling::tracy_plot!($name, $value as f64)
    };
}

/// Plot a value (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_plot {
    ($name:expr, $value:expr) => {
        let _ = $value;
    };
}
