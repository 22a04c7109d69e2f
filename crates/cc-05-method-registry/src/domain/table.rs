//! # Method Table
//!
//! Immutable name → [`Method`] map built once at dispatcher construction.
//! Routing filters apply at lookup time from the contract options.

use std::collections::BTreeMap;

use shared_types::ChaincodeOptions;

use super::errors::RegistryError;
use super::method::Method;

/// Entry points switched off by `disableSwaps`.
pub const SWAP_METHODS: [&str; 4] = ["swapBegin", "swapCancel", "swapGet", "swapDone"];

/// Entry points switched off by `disableMultiSwaps`.
pub const MULTI_SWAP_METHODS: [&str; 4] = [
    "multiSwapBegin",
    "multiSwapCancel",
    "multiSwapGet",
    "multiSwapDone",
];

/// Registered methods.
#[derive(Clone, Debug, Default)]
pub struct MethodTable {
    methods: BTreeMap<String, Method>,
}

impl MethodTable {
    pub fn builder() -> MethodTableBuilder {
        MethodTableBuilder::default()
    }

    /// Method by name, ignoring configuration.
    pub fn get(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    /// Registered names, ascending.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Method by name after applying the configured filters.
    pub fn lookup(&self, name: &str, options: &ChaincodeOptions) -> Result<&Method, RegistryError> {
        if !is_enabled(name, options) {
            return Err(RegistryError::MethodNotFound(name.to_string()));
        }
        self.get(name)
            .ok_or_else(|| RegistryError::MethodNotFound(name.to_string()))
    }
}

/// False when `name` is disabled explicitly or through a swap switch.
pub fn is_enabled(name: &str, options: &ChaincodeOptions) -> bool {
    if options.disabled_functions.iter().any(|f| f == name) {
        return false;
    }
    if options.disable_swaps && SWAP_METHODS.contains(&name) {
        return false;
    }
    if options.disable_multi_swaps && MULTI_SWAP_METHODS.contains(&name) {
        return false;
    }
    true
}

/// Collects methods; duplicates fail at [`build`](Self::build).
#[derive(Default)]
pub struct MethodTableBuilder {
    methods: BTreeMap<String, Method>,
    duplicate: Option<String>,
}

impl MethodTableBuilder {
    pub fn method(mut self, method: Method) -> Self {
        let name = method.name().to_string();
        if self.methods.insert(name.clone(), method).is_some() && self.duplicate.is_none() {
            self.duplicate = Some(name);
        }
        self
    }

    pub fn methods(self, methods: impl IntoIterator<Item = Method>) -> Self {
        methods.into_iter().fold(self, Self::method)
    }

    pub fn build(self) -> Result<MethodTable, RegistryError> {
        if let Some(name) = self.duplicate {
            return Err(RegistryError::DuplicateMethod(name));
        }
        Ok(MethodTable {
            methods: self.methods,
        })
    }
}
