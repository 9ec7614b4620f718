use crate::platform::Unwinder;
use crate::render::{Disabled, Renderer, Symbolizer};
use crate::Error;
use lazy_static::lazy_static;
use std::env;
use std::str::FromStr;

/// The environment variable read once at startup to override [Strategy].
pub const STRATEGY_ENV: &str = "STACKTRACE_STRATEGY";

lazy_static! {
    static ref CONFIG: Config = Config::from_env();
}

/// How captured traces are turned into text.
///
/// The strategy is fixed for the whole process, the two symbolizing
/// strategies never run for the same trace.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Resolve each address on its own through a symbolizer that already
    /// demangles (the `backtrace` crate).
    Symbolize,

    /// Resolve the whole trace with `backtrace_symbols(3)` and demangle the
    /// C++ names found in its output.
    Execinfo,

    /// Render nothing at all.
    Disabled,
}

impl Default for Strategy {
    /// `Disabled` on Android. Otherwise `Symbolize` when the `symbolize`
    /// feature is enabled or `<execinfo.h>` is missing, `Execinfo` if not.
    fn default() -> Self {
        if cfg!(target_os = "android") {
            Strategy::Disabled
        } else if cfg!(any(feature = "symbolize", not(has_execinfo))) {
            Strategy::Symbolize
        } else {
            Strategy::Execinfo
        }
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "symbolize" => Ok(Strategy::Symbolize),
            "execinfo" => Ok(Strategy::Execinfo),
            "disabled" | "none" => Ok(Strategy::Disabled),
            _ => Err(Error::UnknownStrategy(s.to_owned())),
        }
    }
}

impl Strategy {
    /// Whether this target can run the strategy at all.
    pub fn is_available(self) -> bool {
        match self {
            Strategy::Execinfo => cfg!(has_execinfo),
            Strategy::Symbolize | Strategy::Disabled => true,
        }
    }

    /// Builds the renderer for this strategy.
    ///
    /// `Execinfo` falls back to [Disabled] where the C library has no
    /// `backtrace_symbols(3)`.
    pub fn renderer(self) -> Box<dyn Renderer + Send + Sync> {
        match self {
            Strategy::Symbolize => Box::new(Symbolizer::new(Unwinder)),
            #[cfg(has_execinfo)]
            Strategy::Execinfo => {
                Box::new(crate::render::Fallback::new(crate::platform::Execinfo, crate::demangle::Itanium))
            }
            #[cfg(not(has_execinfo))]
            Strategy::Execinfo => Box::new(Disabled),
            Strategy::Disabled => Box::new(Disabled),
        }
    }
}

/// Process-wide settings.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    pub strategy: Strategy,
}

impl Config {
    /// Reads [STRATEGY_ENV], keeping the build-time default when it is unset
    /// or not understood.
    pub fn from_env() -> Self {
        match env::var(STRATEGY_ENV) {
            Ok(value) => Self::from_value(&value),
            Err(_) => Self::default(),
        }
    }

    fn from_value(value: &str) -> Self {
        match value.parse::<Strategy>() {
            Ok(strategy) if !strategy.is_available() => {
                warn!(?strategy, "{} names a strategy this target lacks, ignoring it", STRATEGY_ENV);
                Self::default()
            }
            Ok(strategy) => {
                debug!(?strategy, "stack trace strategy set from {}", STRATEGY_ENV);
                Self { strategy }
            }
            Err(err) => {
                warn!(%err, "ignoring {}", STRATEGY_ENV);
                Self::default()
            }
        }
    }

    #[inline]
    pub fn renderer(&self) -> Box<dyn Renderer + Send + Sync> {
        self.strategy.renderer()
    }
}

/// The configuration of this process, read on first use.
#[inline]
pub fn config() -> &'static Config {
    &CONFIG
}
