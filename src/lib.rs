//! budget_optimizer — budget-neutral spend reallocation over saturating
//! response models, with optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the host-facing optimizer to Python via the `_budget_optimizer` extension
//! module. When the `python-bindings` feature is enabled, this module defines
//! the Python-facing class and submodule used by the `budget_optimizer`
//! package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`budget`, `response`, `optimization`,
//!   `allocation`) as the public crate surface.
//! - Define the `BudgetOptimizer` `#[pyclass]` over the reference model and
//!   the `#[pymodule]` initializer for the `_budget_optimizer` extension.
//! - Register the `budget_optimizer.allocation` submodule in `sys.modules`
//!   so that dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - The core Rust API does not depend on Python; all PyO3-specific code is
//!   gated behind the `python-bindings` feature.
//! - Input validation happens in the core layers; this module only adapts
//!   Python inputs and maps every error to `ValueError` (or `TypeError` for
//!   malformed shapes).
//!
//! Conventions
//! -----------
//! - Channel-keyed outputs are returned as Python dicts in canonical channel
//!   order; per-period series are returned as 1-D `numpy.ndarray`s.
//! - A failed `optimize` call raises and leaves previously published
//!   results readable.
//!
//! Downstream usage
//! ----------------
//! - Rust callers: `budget_optimizer::allocation::Optimizer` and the module
//!   preludes.
//! - Python callers: `from budget_optimizer.allocation import
//!   BudgetOptimizer`.
pub mod allocation;
pub mod budget;
pub mod optimization;
pub mod response;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::PyValueError,
    prelude::*,
    types::{PyAny, PyDict},
};

#[cfg(feature = "python-bindings")]
use crate::{
    allocation::{optimizer::Optimizer, result::OptimizationResult},
    response::hill_trend::HillTrendModel,
    utils::{contribution_series_to_dict, extract_channel_settings, pairs_to_dict},
};

/// Python handle to an [`Optimizer`] over the reference model.
///
/// Not `Sync`-shared across threads; PyO3's borrow checking serializes
/// `optimize` calls on one instance.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "budget_optimizer.allocation", unsendable)]
pub struct BudgetOptimizer {
    pub inner: Optimizer<HillTrendModel>,
}

#[cfg(feature = "python-bindings")]
impl BudgetOptimizer {
    fn solved(&self) -> PyResult<&OptimizationResult> {
        self.inner
            .last_result()
            .map(|result| result.as_ref())
            .ok_or_else(|| PyValueError::new_err("optimizer has not been run successfully yet"))
    }
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl BudgetOptimizer {
    /// Build the reference optimizer.
    ///
    /// Parameters
    /// ----------
    /// seed : int, optional
    ///     Seed for the synthetic baseline dataset. Defaults to the built-in
    ///     reference seed.
    #[new]
    #[pyo3(signature = (seed = None), text_signature = "(seed=None)")]
    pub fn new(seed: Option<u64>) -> PyResult<Self> {
        let inner = match seed {
            Some(seed) => Optimizer::reference_with_seed(seed)?,
            None => Optimizer::reference()?,
        };
        Ok(BudgetOptimizer { inner })
    }

    /// Channel names in canonical order.
    pub fn get_channels(&self) -> Vec<String> {
        self.inner.channels().to_vec()
    }

    /// Baseline spend per channel, in the order of `get_channels()`.
    pub fn get_initial_budgets(&self) -> Vec<f64> {
        self.inner.initial_budgets()
    }

    /// Reallocate spend and publish the optimum.
    ///
    /// Parameters
    /// ----------
    /// settings : dict[str, dict[str, float]]
    ///     `{channel: {"starting_budget", "lower_bound", "upper_bound"}}`
    ///     for every channel. Bounds are fractional deviations from baseline.
    /// target : float, default 0.0
    ///     Required net change in total spend; 0.0 keeps the total fixed.
    ///
    /// Returns
    /// -------
    /// dict[str, float]
    ///     Optimal spend per channel.
    ///
    /// Raises
    /// ------
    /// ValueError
    ///     On invalid settings, an infeasible constraint set, or solver
    ///     failure. Earlier results stay readable.
    #[pyo3(signature = (settings, target = 0.0), text_signature = "(settings, /, target=0.0)")]
    pub fn optimize<'py>(
        &mut self, py: Python<'py>, settings: &Bound<'py, PyAny>, target: f64,
    ) -> PyResult<Bound<'py, PyDict>> {
        let settings = extract_channel_settings(settings)?;
        let result = self.inner.optimize_settings(&settings, target)?;
        pairs_to_dict(py, result.budget_pairs())
    }

    /// Reallocate from baseline with the default bounds, keeping total spend.
    pub fn optimize_default<'py>(&mut self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let result = self.inner.optimize_default()?;
        pairs_to_dict(py, result.budget_pairs())
    }

    #[getter]
    pub fn is_solved(&self) -> bool {
        self.inner.state().is_solved()
    }

    #[getter]
    pub fn optimal_budget<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        pairs_to_dict(py, self.solved()?.budget_pairs())
    }

    /// Optimal spend as shares of the optimal total.
    #[getter]
    pub fn optimal_shares<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let budget = self.solved()?.optimal_budget();
        let shares = budget.shares(budget.total());
        let pairs = budget.channels().names().iter().cloned().zip(shares.iter().copied()).collect();
        pairs_to_dict(py, pairs)
    }

    /// Total contribution per channel at the optimum.
    #[getter]
    pub fn optimal_contribution<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        pairs_to_dict(py, self.solved()?.contribution_pairs())
    }

    /// Per-period contribution series per channel at the optimum.
    #[getter]
    pub fn optimal_contribution_series<'py>(
        &self, py: Python<'py>,
    ) -> PyResult<Bound<'py, PyDict>> {
        contribution_series_to_dict(py, self.solved()?.optimal_contribution())
    }

    /// Per-period predicted outcome at the optimum.
    #[getter]
    pub fn optimal_prediction<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray1<f64>>> {
        Ok(self.solved()?.optimal_prediction().series().to_vec().into_pyarray(py))
    }

    #[getter]
    pub fn uplift(&self) -> PyResult<f64> {
        Ok(self.solved()?.uplift())
    }

    #[getter]
    pub fn iterations(&self) -> PyResult<usize> {
        Ok(self.solved()?.diagnostics().iterations)
    }

    #[getter]
    pub fn status(&self) -> PyResult<String> {
        Ok(self.solved()?.diagnostics().status.clone())
    }
}

/// Initialize the `_budget_optimizer` extension module.
///
/// Creates the `allocation` submodule, registers `BudgetOptimizer` on it,
/// and inserts it into `sys.modules` as `budget_optimizer.allocation`.
///
/// Errors
/// ------
/// - `PyErr`
///   If creating the submodule or manipulating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _budget_optimizer<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let allocation_mod = PyModule::new(_py, "allocation")?;
    allocation(_py, m, &allocation_mod)?;

    // Manually add the submodule into sys.modules to allow for dot notation.
    _py.import("sys")?
        .getattr("modules")?
        .set_item("budget_optimizer.allocation", allocation_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn allocation<'py>(
    _py: Python, budget_optimizer: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<BudgetOptimizer>()?;
    budget_optimizer.add_submodule(m)?;
    Ok(())
}
