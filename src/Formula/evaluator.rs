use crate::Formula::formula_error::{FormulaError, MassError};
use crate::Formula::mass_table::AtomicMassTable;
use crate::Formula::parser::{ElementCount, parse};
use crate::Formula::validator::validate;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Sum of mass * count over the pairs in their order. Stops at the first symbol missing
/// from the table. The result is not rounded.
pub fn evaluate(pairs: &[ElementCount], table: &AtomicMassTable) -> Result<f64, MassError> {
    let mut molar_mass = 0.0;
    for pair in pairs {
        let mass = table
            .get(&pair.symbol)
            .ok_or_else(|| MassError::UnknownElement(pair.symbol.clone()))?;
        molar_mass += mass * pair.count as f64;
    }
    Ok(molar_mass)
}

/// validate -> parse -> evaluate
pub fn calculate_molar_mass(formula: &str, table: &AtomicMassTable) -> Result<f64, FormulaError> {
    let formula = validate(formula)?;
    let pairs = parse(formula)?;
    Ok(evaluate(&pairs, table)?)
}

/// molar masses of several formulae, one result per formula in the same order
pub fn calculate_molar_mass_of_vector_of_subs(
    vec_of_formulae: &[&str],
    table: &AtomicMassTable,
) -> Vec<Result<f64, FormulaError>> {
    vec_of_formulae
        .iter()
        .map(|formula| calculate_molar_mass(formula, table))
        .collect()
}

/// rounding to 4 decimal digits used for presentation and storage
pub fn round_mass(mass: f64) -> f64 {
    (mass * 1e4).round() / 1e4
}

/// atomic composition: counts of repeated symbols are summed
pub fn composition(pairs: &[ElementCount]) -> BTreeMap<String, u64> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for pair in pairs {
        let entry = counts.entry(pair.symbol.clone()).or_insert(0);
        *entry = entry.saturating_add(pair.count);
    }
    counts
}

/// Formula in the Hill system: C first, then H, then the rest alphabetically.
/// Without carbon every element goes alphabetically. Elements with zero atoms are dropped.
pub fn hill_formula(pairs: &[ElementCount]) -> String {
    let mut counts = composition(pairs);
    counts.retain(|_, count| *count > 0);

    let mut result = String::new();
    if let Some(c) = counts.remove("C") {
        append_element(&mut result, "C", c);
        if let Some(h) = counts.remove("H") {
            append_element(&mut result, "H", h);
        }
    }
    for (symbol, count) in &counts {
        append_element(&mut result, symbol, *count);
    }
    result
}

fn append_element(buf: &mut String, symbol: &str, count: u64) {
    buf.push_str(symbol);
    if count > 1 {
        let _ = write!(buf, "{count}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Formula::formula_error::FormatError;
    use approx::assert_relative_eq;

    fn water_table() -> AtomicMassTable {
        AtomicMassTable::from_pairs([("H", 1.008), ("O", 15.999)]).unwrap()
    }

    #[test]
    fn test_evaluate() {
        let pairs = vec![ElementCount::new("H", 2), ElementCount::new("O", 1)];
        assert_relative_eq!(
            evaluate(&pairs, &water_table()).unwrap(),
            18.015,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_evaluate_empty_and_zero_counts() {
        assert_eq!(evaluate(&[], &water_table()), Ok(0.0));
        let pairs = vec![ElementCount::new("H", 0)];
        assert_eq!(evaluate(&pairs, &water_table()), Ok(0.0));
    }

    #[test]
    fn test_first_unknown_element_wins() {
        let pairs = vec![
            ElementCount::new("H", 2),
            ElementCount::new("Xx", 1),
            ElementCount::new("Yy", 1),
        ];
        assert_eq!(
            evaluate(&pairs, &water_table()),
            Err(MassError::UnknownElement("Xx".to_string()))
        );
    }

    #[test]
    fn test_calculate_molar_mass() {
        let table = AtomicMassTable::builtin();
        let expected = [
            ("H2O", 18.01528),
            ("NaCl", 58.44),
            ("C6H8O6", 176.12),
            ("Ca(NO3)2", 164.093),
        ];
        for (formula, expected_molar_mass) in expected {
            let molar_mass = calculate_molar_mass(formula, &table).unwrap();
            assert!(
                (molar_mass - expected_molar_mass).abs() < 1e-2,
                "{} -> {}",
                formula,
                molar_mass
            );
        }
    }

    #[test]
    fn test_calculate_molar_mass_errors() {
        let table = AtomicMassTable::builtin();
        assert_eq!(
            calculate_molar_mass("", &table),
            Err(FormulaError::Format(FormatError::EmptyInput))
        );
        assert!(matches!(
            calculate_molar_mass("NaCl!", &table),
            Err(FormulaError::Format(FormatError::IllegalCharacter { .. }))
        ));
        assert_eq!(
            calculate_molar_mass("Xx2", &table),
            Err(FormulaError::Mass(MassError::UnknownElement(
                "Xx".to_string()
            )))
        );
    }

    #[test]
    fn test_calculate_molar_mass_of_vector_of_substances() {
        let table = AtomicMassTable::builtin();
        let results =
            calculate_molar_mass_of_vector_of_subs(&["H2O", "H2(O", "NaCl"], &table);
        assert_eq!(results.len(), 3);
        assert_relative_eq!(*results[0].as_ref().unwrap(), 18.015, epsilon = 1e-3);
        assert!(results[1].is_err());
        assert_relative_eq!(*results[2].as_ref().unwrap(), 58.44, epsilon = 1e-3);
    }

    #[test]
    fn test_round_mass() {
        assert_eq!(round_mass(18.01528), 18.0153);
        assert_eq!(round_mass(58.319), 58.319);
        assert_eq!(round_mass(0.0), 0.0);
    }

    #[test]
    fn test_composition_sums_duplicates() {
        let pairs = parse("CH3COOH").unwrap();
        let counts = composition(&pairs);
        assert_eq!(counts.len(), 3);
        assert_eq!(counts["C"], 2);
        assert_eq!(counts["H"], 4);
        assert_eq!(counts["O"], 2);
    }

    #[test]
    fn test_hill_formula() {
        assert_eq!(hill_formula(&parse("CH3COOH").unwrap()), "C2H4O2");
        assert_eq!(hill_formula(&parse("H2O").unwrap()), "H2O");
        assert_eq!(hill_formula(&parse("NaCl").unwrap()), "ClNa");
        assert_eq!(hill_formula(&parse("Mg(OH)2").unwrap()), "H2MgO2");
        assert_eq!(hill_formula(&parse("OC").unwrap()), "CO");
        assert_eq!(hill_formula(&parse("H0O").unwrap()), "O");
        assert_eq!(hill_formula(&parse("()").unwrap()), "");
    }
}
