//! budget — channels, spend vectors, bounds, and the deviation codec.
//!
//! Purpose
//! -------
//! Own every piece of budget configuration the optimizer consumes: the
//! canonical channel order, named absolute-spend budgets, fractional bounds,
//! and the exact-inverse transform between absolute spend and fractional
//! deviations from a baseline.
//!
//! Key behaviors
//! -------------
//! - [`ChannelSet`] fixes the one canonical channel order for a
//!   configuration.
//! - [`Budget`] and [`Bounds`] accept name-keyed input in any order and
//!   store it positionally.
//! - [`codec`] maps budgets to deviation vectors and back.
//! - [`BudgetConfig`] and [`ChannelSetting`] carry host-supplied
//!   configuration.
//!
//! Invariants & assumptions
//! ------------------------
//! - All validation here happens before any solver runs and is reported as
//!   [`ConfigError`].
//! - Baselines are strictly positive; spends are finite and non-negative;
//!   bounds satisfy `-1 < lower <= upper`.
//!
//! Testing notes
//! -------------
//! - Each submodule carries its own unit tests; the codec tests cover the
//!   round-trip and zero-baseline contracts.

pub mod bounds;
pub mod channels;
pub mod codec;
pub mod config;
pub mod errors;
pub mod spend;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::bounds::{Bounds, DEFAULT_SYMMETRIC_BOUND};
pub use self::channels::{Channel, ChannelSet};
pub use self::codec::{BudgetCodec, decode, encode};
pub use self::config::{BudgetConfig, ChannelSetting, assemble_settings};
pub use self::errors::{ConfigError, ConfigResult};
pub use self::spend::Budget;

pub mod prelude {
    pub use super::bounds::Bounds;
    pub use super::channels::{Channel, ChannelSet};
    pub use super::codec::BudgetCodec;
    pub use super::config::{BudgetConfig, ChannelSetting};
    pub use super::errors::{ConfigError, ConfigResult};
    pub use super::spend::Budget;
}
