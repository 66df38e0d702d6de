//! Channel identifiers and the canonical channel order.
//!
//! Purpose
//! -------
//! Own the single, stable ordering of spend channels that every vector in the
//! crate (budgets, deviations, bounds, constraint coefficients, dataset
//! columns) is indexed by.
//!
//! Key behaviors
//! -------------
//! - [`ChannelSet`] is built once from configuration order and never
//!   re-sorted; clones share the same backing slice.
//! - Name lookups go through [`ChannelSet::index_of`], so callers never
//!   derive positions on their own.
//! - [`ChannelSet::ensure_same`] rejects cross-vector combinations built over
//!   different channel sets.
//!
//! Invariants & assumptions
//! ------------------------
//! - Non-empty, unique names.
//! - Position `i` means the same channel in every vector built over the same
//!   set.
use std::{collections::HashSet, sync::Arc};

use crate::budget::errors::{ConfigError, ConfigResult};

/// Spend category name.
pub type Channel = String;

/// Ordered, immutable set of channel names.
///
/// Cheap to clone (reference-counted). Equality compares names in order, so
/// two sets with the same names in a different order are *not* equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSet {
    names: Arc<[Channel]>,
}

impl ChannelSet {
    /// Build a channel set in the given order.
    ///
    /// # Errors
    /// - [`ConfigError::EmptyChannelSet`] if `names` is empty.
    /// - [`ConfigError::DuplicateChannel`] for the first repeated name.
    pub fn new<I, S>(names: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Channel>,
    {
        let names: Vec<Channel> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(ConfigError::EmptyChannelSet);
        }
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateChannel { channel: name.clone() });
            }
        }
        Ok(Self { names: names.into() })
    }

    /// Number of channels.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always `false` for a constructed set; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Channel names in canonical order.
    pub fn names(&self) -> &[Channel] {
        &self.names
    }

    /// Iterate names in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Position of `name` in canonical order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Name at canonical position `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Check that `other` has exactly the same channels in the same order.
    ///
    /// # Errors
    /// Returns [`ConfigError::ChannelSetMismatch`] listing both orders.
    pub fn ensure_same(&self, other: &ChannelSet) -> ConfigResult<()> {
        if Arc::ptr_eq(&self.names, &other.names) || self == other {
            return Ok(());
        }
        Err(ConfigError::ChannelSetMismatch {
            expected: self.names.to_vec(),
            found: other.names.to_vec(),
        })
    }

    /// Check that a positional vector has one entry per channel.
    ///
    /// # Errors
    /// Returns [`ConfigError::LengthMismatch`].
    pub fn ensure_len(&self, actual: usize) -> ConfigResult<()> {
        if actual != self.len() {
            return Err(ConfigError::LengthMismatch { expected: self.len(), actual });
        }
        Ok(())
    }
}
