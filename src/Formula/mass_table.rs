//! # Atomic mass table
//!
//! Immutable mapping from element symbols to standard atomic weights. Loaded once,
//! then only read, so a single table can be shared between threads behind an `Arc`.
//! A symbol missing from the table is not a loading problem: it is reported when a formula
//! containing it is evaluated.
use crate::Utils::load_from_file::{load_atomic_masses_from_file, parse_atomic_masses};
use std::collections::HashMap;
use thiserror::Error;

/// errors of building an atomic mass table
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TableError {
    #[error("Failed to load atomic masses: {0}")]
    Load(String),
    #[error("Invalid element symbol in atomic masses table: '{0}'")]
    InvalidSymbol(String),
    #[error("Invalid atomic mass {mass} for element {symbol}")]
    InvalidMass { symbol: String, mass: f64 },
}

// standard atomic weights, g/mol
const ELEMENTS: &[(&str, f64)] = &[
    ("H", 1.008),
    ("He", 4.0026),
    ("Li", 6.94),
    ("Be", 9.0122),
    ("B", 10.81),
    ("C", 12.011),
    ("N", 14.007),
    ("O", 15.999),
    ("F", 18.998),
    ("Ne", 20.18),
    ("Na", 22.99),
    ("Mg", 24.305),
    ("Al", 26.982),
    ("Si", 28.085),
    ("P", 30.974),
    ("S", 32.06),
    ("Cl", 35.45),
    ("Ar", 39.948),
    ("K", 39.098),
    ("Ca", 40.078),
    ("Sc", 44.956),
    ("Ti", 47.867),
    ("V", 50.942),
    ("Cr", 51.996),
    ("Mn", 54.938),
    ("Fe", 55.845),
    ("Co", 58.933),
    ("Ni", 58.693),
    ("Cu", 63.546),
    ("Zn", 65.38),
    ("Ga", 69.723),
    ("Ge", 72.63),
    ("As", 74.922),
    ("Se", 78.971),
    ("Br", 79.904),
    ("Kr", 83.798),
    ("Rb", 85.468),
    ("Sr", 87.62),
    ("Y", 88.906),
    ("Zr", 91.224),
    ("Nb", 92.906),
    ("Mo", 95.95),
    ("Tc", 98.0),
    ("Ru", 101.07),
    ("Rh", 102.91),
    ("Pd", 106.42),
    ("Ag", 107.87),
    ("Cd", 112.41),
    ("In", 114.82),
    ("Sn", 118.71),
    ("Sb", 121.76),
    ("Te", 127.6),
    ("I", 126.9),
    ("Xe", 131.29),
    ("Cs", 132.91),
    ("Ba", 137.33),
    ("La", 138.91),
    ("Ce", 140.12),
    ("Pr", 140.91),
    ("Nd", 144.24),
    ("Pm", 145.0),
    ("Sm", 150.36),
    ("Eu", 151.96),
    ("Gd", 157.25),
    ("Tb", 158.93),
    ("Dy", 162.5),
    ("Ho", 164.93),
    ("Er", 167.26),
    ("Tm", 168.93),
    ("Yb", 173.05),
    ("Lu", 174.97),
    ("Hf", 178.49),
    ("Ta", 180.95),
    ("W", 183.84),
    ("Re", 186.21),
    ("Os", 190.23),
    ("Ir", 192.22),
    ("Pt", 195.08),
    ("Au", 196.97),
    ("Hg", 200.59),
    ("Tl", 204.38),
    ("Pb", 207.2),
    ("Bi", 208.98),
    ("Po", 209.0),
    ("At", 210.0),
    ("Rn", 222.0),
    ("Fr", 223.0),
    ("Ra", 226.0),
    ("Ac", 227.0),
    ("Th", 232.04),
    ("Pa", 231.04),
    ("U", 238.03),
    ("Np", 237.0),
    ("Pu", 244.0),
    ("Am", 243.0),
    ("Cm", 247.0),
    ("Bk", 247.0),
    ("Cf", 251.0),
    ("Es", 252.0),
    ("Fm", 257.0),
    ("Md", 258.0),
    ("No", 259.0),
    ("Lr", 262.0),
    ("Rf", 267.0),
    ("Db", 270.0),
    ("Sg", 269.0),
    ("Bh", 270.0),
    ("Hs", 270.0),
    ("Mt", 278.0),
    ("Ds", 281.0),
    ("Rg", 281.0),
    ("Cn", 285.0),
    ("Nh", 286.0),
    ("Fl", 289.0),
    ("Mc", 289.0),
    ("Lv", 293.0),
    ("Ts", 293.0),
    ("Og", 294.0),
];

fn is_element_symbol(symbol: &str) -> bool {
    let mut chars = symbol.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(first), None, None) => first.is_ascii_uppercase(),
        (Some(first), Some(second), None) => {
            first.is_ascii_uppercase() && second.is_ascii_lowercase()
        }
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AtomicMassTable {
    masses: HashMap<String, f64>,
}

impl AtomicMassTable {
    /// table of all elements from H to Og
    pub fn builtin() -> Self {
        let masses = ELEMENTS
            .iter()
            .map(|(symbol, mass)| (symbol.to_string(), *mass))
            .collect();
        AtomicMassTable { masses }
    }

    /// every symbol must look like an element symbol and every mass must be finite and positive
    pub fn from_map(masses: HashMap<String, f64>) -> Result<Self, TableError> {
        for (symbol, &mass) in masses.iter() {
            if !is_element_symbol(symbol) {
                return Err(TableError::InvalidSymbol(symbol.clone()));
            }
            if !mass.is_finite() || mass <= 0.0 {
                return Err(TableError::InvalidMass {
                    symbol: symbol.clone(),
                    mass,
                });
            }
        }
        Ok(AtomicMassTable { masses })
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let masses = pairs
            .into_iter()
            .map(|(symbol, mass)| (symbol.to_string(), mass))
            .collect();
        Self::from_map(masses)
    }

    pub fn from_json_str(content: &str) -> Result<Self, TableError> {
        let masses = parse_atomic_masses(content, "<string>").map_err(TableError::Load)?;
        Self::from_map(masses)
    }

    pub fn from_file(file_name: &str) -> Result<Self, TableError> {
        let masses = load_atomic_masses_from_file(file_name).map_err(TableError::Load)?;
        Self::from_map(masses)
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.masses.get(symbol).copied()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.masses.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    /// symbols in alphabetical order
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.masses.keys().map(|s| s.as_str()).collect();
        symbols.sort_unstable();
        symbols
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_table() {
        let table = AtomicMassTable::builtin();
        assert_eq!(table.len(), 118);
        assert_relative_eq!(table.get("H").unwrap(), 1.008);
        assert_relative_eq!(table.get("O").unwrap(), 15.999);
        assert_relative_eq!(table.get("Cl").unwrap(), 35.45);
        assert!(table.contains("Og"));
        assert!(!table.contains("Xx"));
        // symbols are case-sensitive
        assert!(!table.contains("CL"));
        assert!(table.get("h").is_none());
    }

    #[test]
    fn test_bundled_resource_matches_builtin() {
        let content = include_str!("../../data/atomic_masses.json");
        let table = AtomicMassTable::from_json_str(content).unwrap();
        let builtin = AtomicMassTable::builtin();
        assert_eq!(table.symbols(), builtin.symbols());
        for symbol in builtin.symbols() {
            assert_relative_eq!(
                table.get(symbol).unwrap(),
                builtin.get(symbol).unwrap(),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_from_pairs_validation() {
        let table = AtomicMassTable::from_pairs([("H", 1.008), ("O", 15.999)]).unwrap();
        assert_eq!(table.symbols(), vec!["H", "O"]);

        assert_eq!(
            AtomicMassTable::from_pairs([("Hyd", 1.0)]),
            Err(TableError::InvalidSymbol("Hyd".to_string()))
        );
        assert_eq!(
            AtomicMassTable::from_pairs([("o", 16.0)]),
            Err(TableError::InvalidSymbol("o".to_string()))
        );
        assert_eq!(
            AtomicMassTable::from_pairs([("H", -1.0)]),
            Err(TableError::InvalidMass {
                symbol: "H".to_string(),
                mass: -1.0
            })
        );
        assert!(matches!(
            AtomicMassTable::from_pairs([("H", 0.0)]),
            Err(TableError::InvalidMass { .. })
        ));
    }

    #[test]
    fn test_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "{{\"Na\": 22.99, \"Cl\": 35.45}}").unwrap();
        let table = AtomicMassTable::from_file(temp_file.path().to_str().unwrap()).unwrap();
        assert_eq!(table.len(), 2);
        assert_relative_eq!(table.get("Na").unwrap(), 22.99);

        assert!(matches!(
            AtomicMassTable::from_file("missing_masses.json"),
            Err(TableError::Load(_))
        ));
    }

    #[test]
    fn test_empty_table_is_allowed() {
        let table = AtomicMassTable::from_json_str("{}").unwrap();
        assert!(table.is_empty());
    }
}
