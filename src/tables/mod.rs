//! Supplementary data tables
//!
//! Tables are registered under a label either as realized data or as a
//! producer that is only run when an error page is actually rendered.

use std::fmt;
use std::sync::Arc;

use crate::core::{PageError, Result, Table, Value};
use tracing::{debug, warn};

/// Deferred table source. Anything other than `Ok(Value::Array(..))` renders
/// as an empty table.
pub type ProducerFn = Arc<dyn Fn() -> anyhow::Result<Value> + Send + Sync>;

#[derive(Clone)]
pub enum TableEntry {
    Table(Table),
    Producer(ProducerFn),
}

impl TableEntry {
    /// Realize the entry. Producer failures and non-tabular results are
    /// absorbed into an empty table.
    pub fn evaluate(&self, label: &str) -> Table {
        let producer = match self {
            Self::Table(table) => return table.clone(),
            Self::Producer(producer) => producer,
        };

        match producer() {
            Ok(value) => {
                let type_tag = value.type_tag();
                Table::from_value(value).unwrap_or_else(|| {
                    warn!(label, %type_tag, "table producer returned a non-tabular value");
                    Table::new()
                })
            }
            Err(err) => {
                warn!(label, error = %err, "table producer failed");
                Table::new()
            }
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Producer(_))
    }
}

impl fmt::Debug for TableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table(table) => f.debug_tuple("Table").field(table).finish(),
            Self::Producer(_) => write!(f, "Producer(<fn>)"),
        }
    }
}

/// Label → table registry, in first-registration order
#[derive(Debug, Clone, Default)]
pub struct DataTableRegistry {
    entries: Vec<(String, TableEntry)>,
}

impl DataTableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a realized table. An existing label is overwritten.
    pub fn add_table(&mut self, label: impl Into<String>, table: Table) -> Result<()> {
        self.upsert(label.into(), TableEntry::Table(table))
    }

    /// Add a table produced lazily when the page renders. An existing label
    /// is overwritten.
    pub fn add_table_producer<F>(&mut self, label: impl Into<String>, producer: F) -> Result<()>
    where
        F: Fn() -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.upsert(label.into(), TableEntry::Producer(Arc::new(producer)))
    }

    fn upsert(&mut self, label: String, entry: TableEntry) -> Result<()> {
        if label.trim().is_empty() {
            return Err(PageError::Configuration(
                "Data table label must not be empty".into(),
            ));
        }

        debug!(label = %label, deferred = entry.is_deferred(), "registered data table");
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(slot) => slot.1 = entry,
            None => self.entries.push((label, entry)),
        }
        Ok(())
    }

    /// The entry registered under `label`, producers left unforced
    pub fn get_tables(&self, label: &str) -> Option<&TableEntry> {
        self.entries.iter().find(|(l, _)| l == label).map(|(_, e)| e)
    }

    /// Every registered entry, producers left unforced
    pub fn entries(&self) -> &[(String, TableEntry)] {
        &self.entries
    }

    /// Realized table for a single label; unknown labels give an empty table.
    pub fn evaluate_one(&self, label: &str) -> Table {
        self.get_tables(label)
            .map(|entry| entry.evaluate(label))
            .unwrap_or_default()
    }

    /// Force every producer once and return the realized tables.
    pub fn evaluate(&self) -> Vec<(String, Table)> {
        self.entries
            .iter()
            .map(|(label, entry)| (label.clone(), entry.evaluate(label)))
            .collect()
    }

    /// Evaluate the registry and merge it over the built-in tables.
    ///
    /// Registered tables come first and replace built-ins with the same label.
    pub fn merged_with(&self, builtin: Vec<(String, Table)>) -> Vec<(String, Table)> {
        let mut tables = self.evaluate();
        for (label, table) in builtin {
            if !tables.iter().any(|(l, _)| *l == label) {
                tables.push((label, table));
            }
        }
        tables
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
