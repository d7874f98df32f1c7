//! Option registry.
//!
//! Declaration happens on a [`RegistryBuilder`]. Once every option is declared
//! the builder is frozen into a [`Registry`], which is read-only and can be
//! shared between threads that match independent argument sequences.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::compiler::compile;
use crate::config::{Config, InputMode};
use crate::descriptor::Descriptor;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
struct Table {
    descriptors: Vec<Descriptor>,
    by_name: BTreeMap<String, usize>,
    by_handle: HashMap<String, usize>,
}

impl Table {
    fn handle_key(config: &Config, handle: &str) -> String {
        if config.case_sensitive {
            handle.to_string()
        } else {
            handle.to_lowercase()
        }
    }

    fn get(&self, config: &Config, handle: &str) -> Option<&Descriptor> {
        let idx = if config.case_sensitive {
            self.by_handle.get(handle)
        } else {
            self.by_handle.get(&handle.to_lowercase())
        };
        idx.map(|&idx| &self.descriptors[idx])
    }

    fn descriptor(&self, name: &str) -> Option<&Descriptor> {
        self.by_name.get(name).map(|&idx| &self.descriptors[idx])
    }

    fn iter(&self) -> impl Iterator<Item = &Descriptor> {
        self.by_name.values().map(|&idx| &self.descriptors[idx])
    }

    fn handle_has_name(&self, config: &Config, handle: &str, name: &str) -> bool {
        self.get(config, handle).is_some_and(|d| d.name() == name)
    }

    /// Check every handle before touching the maps so that a rejected
    /// declaration leaves the table unchanged.
    fn check_handles(&self, config: &Config, handles: &[String]) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let mut keys = Vec::with_capacity(handles.len());
        for handle in handles {
            let key = Self::handle_key(config, handle);
            if self.by_handle.contains_key(&key) || !seen.insert(key.clone()) {
                return Err(Error::spec(format!("handle repeated: {handle}")));
            }
            keys.push(key);
        }
        Ok(keys)
    }

    fn insert(&mut self, config: &Config, compiled: Descriptor) -> Result<usize> {
        match self.by_name.get(compiled.name()).copied() {
            None => {
                let keys = self.check_handles(config, compiled.handles())?;
                let idx = self.descriptors.len();
                for key in keys {
                    self.by_handle.insert(key, idx);
                }
                self.by_name.insert(compiled.name().to_string(), idx);
                self.descriptors.push(compiled);
                Ok(idx)
            }
            Some(idx) => {
                let existing = &self.descriptors[idx];
                if !existing.compatible(&compiled) {
                    return Err(Error::spec(format!(
                        "incompatible redeclaration of '{}': cardinality, assignment, \
                         collection and value type must match",
                        compiled.name()
                    )));
                }
                let keys = self.check_handles(config, compiled.handles())?;
                for key in keys {
                    self.by_handle.insert(key, idx);
                }
                self.descriptors[idx].handles.extend(compiled.handles);
                Ok(idx)
            }
        }
    }
}

/// Mutable registry used while options are being declared.
///
/// The configuration is chosen up front with [`RegistryBuilder::with_config`]
/// and cannot change afterwards.
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    config: Config,
    table: Table,
}

impl RegistryBuilder {
    /// Create an empty builder with the default [`Config`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            table: Table::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Declare an option, deriving its name from the last handle.
    ///
    /// Returns the registered descriptor, which already includes handles
    /// merged from earlier compatible declarations of the same name.
    pub fn option(&mut self, spec: &str) -> Result<&Descriptor> {
        self.option_named(spec, "")
    }

    /// Declare an option under an explicit canonical name.
    ///
    /// An empty `name` behaves like [`RegistryBuilder::option`].
    pub fn option_named(&mut self, spec: &str, name: &str) -> Result<&Descriptor> {
        let compiled = compile(spec, name, self.config.input_mode)?;
        let idx = self.table.insert(&self.config, compiled)?;
        let descriptor = &self.table.descriptors[idx];
        tracing::debug!(
            spec,
            name = descriptor.name(),
            handles = ?descriptor.handles(),
            "declared option"
        );
        Ok(descriptor)
    }

    pub fn is_empty(&self) -> bool {
        self.table.by_name.is_empty()
    }

    /// Number of distinct option names declared.
    pub fn len(&self) -> usize {
        self.table.by_name.len()
    }

    /// Forget every declared option. The configuration is kept, and may be
    /// replaced with [`RegistryBuilder::set_config`] afterwards.
    pub fn clear(&mut self) {
        self.table = Table::default();
    }

    /// Replace the configuration. Only allowed while no option is declared,
    /// since handle keys and `[&]` depend on it.
    pub fn set_config(&mut self, config: Config) -> Result<()> {
        if !self.is_empty() {
            return Err(Error::spec("configuration cannot change once options are declared"));
        }
        self.config = config;
        Ok(())
    }

    pub fn get(&self, handle: &str) -> Option<&Descriptor> {
        self.table.get(&self.config, handle)
    }

    pub fn descriptor(&self, name: &str) -> Option<&Descriptor> {
        self.table.descriptor(name)
    }

    /// Whether `handle` resolves to the option named `name`.
    pub fn handle_has_name(&self, handle: &str, name: &str) -> bool {
        self.table.handle_has_name(&self.config, handle, name)
    }

    /// Descriptors in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Descriptor> {
        self.table.iter()
    }

    /// End the declaration phase.
    ///
    /// Subcommand mode needs at least one `[&]` option to match against.
    pub fn freeze(self) -> Result<Registry> {
        let subcommands = self
            .table
            .descriptors
            .iter()
            .filter(|d| d.is_subcommand())
            .count();
        if self.config.input_mode == InputMode::Subcommand && subcommands == 0 {
            return Err(Error::spec("no subcommands declared"));
        }
        tracing::debug!(
            options = self.len(),
            subcommands,
            mode = ?self.config.input_mode,
            "registry frozen"
        );
        Ok(Registry {
            config: self.config,
            table: self.table,
            subcommands,
        })
    }
}

/// Frozen set of declared options.
///
/// Obtained from [`RegistryBuilder::freeze`]; matching only needs `&self`.
#[derive(Debug, Clone)]
pub struct Registry {
    config: Config,
    table: Table,
    subcommands: usize,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve a handle, folding case when the registry is case-insensitive.
    pub fn get(&self, handle: &str) -> Option<&Descriptor> {
        self.table.get(&self.config, handle)
    }

    pub fn descriptor(&self, name: &str) -> Option<&Descriptor> {
        self.table.descriptor(name)
    }

    pub fn handle_has_name(&self, handle: &str, name: &str) -> bool {
        self.table.handle_has_name(&self.config, handle, name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Descriptor> {
        self.table.iter()
    }

    pub fn len(&self) -> usize {
        self.table.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.by_name.is_empty()
    }

    pub fn subcommand_count(&self) -> usize {
        self.subcommands
    }

    /// Reopen the registry for further declarations.
    pub fn into_builder(self) -> RegistryBuilder {
        RegistryBuilder {
            config: self.config,
            table: self.table,
        }
    }
}
