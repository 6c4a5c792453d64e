//! Guard configuration.

/// Configuration for [`Guard`](crate::Guard).
///
/// ## Default Values
///
/// - `log_caught`: true
/// - `capture_backtrace`: false
///
/// ## Example
///
/// ```rust
/// use wari::{Guard, GuardConfig};
///
/// let config = GuardConfig::builder()
///     .capture_backtrace(true)
///     .build();
/// let guard = Guard::new(config);
///
/// let res = guard.try_catch_with(|| -> u8 { panic!("boom") }, |caught| caught);
/// assert!(res.is_err_and(|caught| caught.backtrace().is_some()));
/// ```
#[derive(Debug, Clone, bon::Builder)]
pub struct GuardConfig {
    /// Whether to emit a `tracing` event for every caught failure.
    ///
    /// Has no effect without the `tracing` feature.
    #[builder(default = true)]
    pub log_caught: bool,

    /// Whether to capture a backtrace where the failure is converted.
    ///
    /// The backtrace shows the guard boundary, not the panic site: by the time
    /// the guard runs, the panicking frames have unwound.
    #[builder(default = false)]
    pub capture_backtrace: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GuardConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration that neither logs nor captures backtraces.
    pub fn quiet() -> Self {
        Self::builder().log_caught(false).build()
    }

    /// Sets whether caught failures are logged.
    #[must_use]
    pub fn with_log_caught(mut self, log_caught: bool) -> Self {
        self.log_caught = log_caught;
        self
    }

    /// Sets whether backtraces are captured.
    #[must_use]
    pub fn with_capture_backtrace(mut self, capture_backtrace: bool) -> Self {
        self.capture_backtrace = capture_backtrace;
        self
    }
}
