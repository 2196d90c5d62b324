//! Entry-point loaders.
//!
//! A [`Loader`] turns an [`EntryPointRef`] into the implementation it names.
//! Loading is where a backend's own code and dependencies come into play, so
//! it only ever happens for the backend that was actually selected.

use crate::error::{RuntimeError, RuntimeResult};
use crate::reference::EntryPointRef;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Resolves entry-point references into implementations of type `I`.
pub trait Loader<I>: Send + Sync {
    /// Load the implementation behind `reference`.
    ///
    /// Errors are the backend's own and are handed back to the caller
    /// untouched.
    fn load(&self, reference: &EntryPointRef) -> anyhow::Result<I>;
}

type SymbolLoader<I> = Box<dyn Fn() -> anyhow::Result<I> + Send + Sync>;

/// In-process symbol table mapping references to deferred loaders.
///
/// Backends compiled into the host export their constructors under the
/// reference their manifest advertises. Nothing registered here runs until
/// the reference is loaded.
pub struct SymbolTable<I> {
    symbols: HashMap<EntryPointRef, SymbolLoader<I>>,
}

impl<I> SymbolTable<I> {
    /// Create an empty symbol table.
    pub fn new() -> Self {
        Self {
            symbols: HashMap::new(),
        }
    }

    /// Export a fallible loader under `reference`.
    ///
    /// Replaces any loader previously exported under the same reference.
    pub fn export_with<F>(&mut self, reference: &str, loader: F) -> RuntimeResult<()>
    where
        F: Fn() -> anyhow::Result<I> + Send + Sync + 'static,
    {
        let reference = EntryPointRef::parse(reference)?;
        debug!("Exporting symbol {}", reference);
        self.symbols.insert(reference, Box::new(loader));
        Ok(())
    }

    /// Export a ready value under `reference`.
    pub fn export(&mut self, reference: &str, value: I) -> RuntimeResult<()>
    where
        I: Clone + Send + Sync + 'static,
    {
        self.export_with(reference, move || Ok(value.clone()))
    }

    /// Check whether a symbol has been exported under `reference`.
    pub fn contains(&self, reference: &EntryPointRef) -> bool {
        self.symbols.contains_key(reference)
    }

    /// Get the number of exported symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl<I> Default for SymbolTable<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> fmt::Debug for SymbolTable<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut refs: Vec<String> = self.symbols.keys().map(ToString::to_string).collect();
        refs.sort();
        f.debug_struct("SymbolTable").field("symbols", &refs).finish()
    }
}

impl<I> Loader<I> for SymbolTable<I> {
    fn load(&self, reference: &EntryPointRef) -> anyhow::Result<I> {
        let loader = self
            .symbols
            .get(reference)
            .ok_or_else(|| RuntimeError::SymbolNotFound(reference.to_string()))?;
        loader()
    }
}
