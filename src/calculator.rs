//! # Molar mass calculator service
//!
//! Glues the formula core with its collaborators: the atomic mass table loaded at startup,
//! the PubChem property lookup and the calculation history.
//! Formula errors are returned to the caller untouched; PubChem and history failures are not
//! fatal for a calculation.
//!
//! ```rust, ignore
//! let config = ConfigManager::new()?.get_config().clone();
//! let mut calculator = MolarMassCalculator::from_config(config)?;
//! let response = calculator.molar_mass("Mg(OH)2", None)?;
//! println!("{} {}", response.molar_mass, response.unit);
//! ```
use log::info;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use crate::Formula::evaluator::{composition, evaluate, hill_formula, round_mass};
use crate::Formula::formula_error::FormulaError;
use crate::Formula::mass_table::{AtomicMassTable, TableError};
use crate::Formula::parser::parse;
use crate::Formula::validator::validate;
use crate::History::history_service::{HistoryError, HistoryRecord, HistoryStore};
use crate::PubChem::pubchem_api::{CompoundProperties, HttpClient, PubChemClient};
use crate::settings::AppConfig;

/// startup failures: without the mass table or the history the calculator cannot run
#[derive(Debug, Error)]
pub enum CalculatorError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    History(#[from] HistoryError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaResponse {
    pub formula: String,
    /// rounded to 4 decimal digits
    pub molar_mass: f64,
    pub unit: String,
    pub hill_formula: String,
    pub elements: BTreeMap<String, u64>,
    #[serde(flatten)]
    pub properties: CompoundProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

pub struct MolarMassCalculator<C: HttpClient = Client> {
    table: Arc<AtomicMassTable>,
    config: AppConfig,
    pubchem: Option<PubChemClient<C>>,
    history: HistoryStore,
}

impl MolarMassCalculator<Client> {
    /// Loads the mass table (built-in one if no file is configured), opens the history and
    /// creates the PubChem client if lookups are enabled.
    pub fn from_config(config: AppConfig) -> Result<Self, CalculatorError> {
        let table = match &config.atomic_masses_path {
            Some(path) => AtomicMassTable::from_file(path)?,
            None => AtomicMassTable::builtin(),
        };
        info!("Atomic masses table with {} elements is ready", table.len());
        let history = HistoryStore::open(&config.history_path)?;
        let pubchem = config
            .pubchem_enabled
            .then(|| PubChemClient::from_config(&config));
        Ok(Self::new(Arc::new(table), config, pubchem, history))
    }
}

impl<C: HttpClient> MolarMassCalculator<C> {
    pub fn new(
        table: Arc<AtomicMassTable>,
        config: AppConfig,
        pubchem: Option<PubChemClient<C>>,
        history: HistoryStore,
    ) -> Self {
        Self {
            table,
            config,
            pubchem,
            history,
        }
    }

    pub fn table(&self) -> Arc<AtomicMassTable> {
        Arc::clone(&self.table)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Calculates the molar mass of a formula, looks up the compound in PubChem and stores
    /// the result in the history.
    pub fn molar_mass(
        &mut self,
        formula: &str,
        user: Option<&str>,
    ) -> Result<FormulaResponse, FormulaError> {
        let formula = validate(formula)?;
        let pairs = parse(formula)?;
        let molar_mass = evaluate(&pairs, &self.table)?;

        let properties = match &self.pubchem {
            Some(client) => client.get_chemical_properties(formula),
            None => CompoundProperties::default(),
        };
        self.history.save(formula, molar_mass, &properties, user);

        Ok(FormulaResponse {
            formula: formula.to_string(),
            molar_mass: round_mass(molar_mass),
            unit: self.config.mass_unit.clone(),
            hill_formula: hill_formula(&pairs),
            elements: composition(&pairs),
            properties,
        })
    }

    /// newest records first; None means the configured default limit
    pub fn history(&self, limit: Option<usize>) -> Vec<HistoryRecord> {
        self.history
            .list(limit.unwrap_or(self.config.history_limit_default))
    }

    pub fn update_history(
        &mut self,
        id: u64,
        new_formula: &str,
    ) -> Result<HistoryRecord, HistoryError> {
        self.history.update(id, new_formula, &self.table)
    }

    pub fn delete_history(&mut self, id: u64) -> Result<String, HistoryError> {
        self.history.delete(id)
    }

    pub fn health_check(&self) -> HealthStatus {
        HealthStatus {
            status: "alive".to_string(),
            message: format!("{} is running", self.config.api_title),
        }
    }
}
