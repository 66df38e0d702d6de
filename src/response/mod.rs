//! response — spend → outcome models and their datasets.
//!
//! Purpose
//! -------
//! Define the [`ResponseModel`] capability the optimizer maximizes over,
//! the dataset it consumes, and the outputs it produces. Ships one
//! implementation, [`HillTrendModel`], plus the seeded reference
//! configuration in [`reference`].
//!
//! Key behaviors
//! -------------
//! - [`ResponseDataset`] carries a `periods × channels` spend matrix in
//!   canonical channel order plus named covariates; candidate budgets are
//!   applied by scaling each column.
//! - [`Prediction`] reduces to a scalar by summing over periods (optionally
//!   over a period window).
//! - [`ContributionSet`] attributes outcome to channels; it is not required
//!   to sum to the prediction.
//! - Models may expose an analytic spend sensitivity; otherwise the
//!   optimizer differentiates numerically.
//!
//! Conventions
//! -----------
//! - Errors are reported as [`ModelError`]; no method panics on bad input.
//! - This module performs no I/O.

pub mod dataset;
pub mod errors;
pub mod hill_trend;
pub mod reference;
pub mod saturation;
pub mod traits;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::dataset::{Covariates, ResponseDataset};
pub use self::errors::{ModelError, ModelResult};
pub use self::hill_trend::{ChannelCurve, HillTrendModel, TREND_COVARIATE};
pub use self::traits::{ContributionSet, Prediction, ResponseModel};

pub mod prelude {
    pub use super::dataset::ResponseDataset;
    pub use super::errors::{ModelError, ModelResult};
    pub use super::hill_trend::{ChannelCurve, HillTrendModel};
    pub use super::traits::{ContributionSet, Prediction, ResponseModel};
}
