use super::cli_history::history_menu;
use crate::PubChem::pubchem_api::HttpClient;
use crate::calculator::{FormulaResponse, MolarMassCalculator};
use std::io::{self, Write};

pub fn run_interactive_menu<C: HttpClient>(calculator: &mut MolarMassCalculator<C>) {
    loop {
        show_main_menu(&calculator.config().api_title);
        let choice = get_user_input();

        match choice.trim() {
            "1" => calculate_menu(calculator),
            "2" => history_menu(calculator),
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

/// Calculates every formula from the command line. Returns false if any of them failed.
pub fn run_one_shot<C: HttpClient>(
    calculator: &mut MolarMassCalculator<C>,
    formulae: &[String],
) -> bool {
    let mut all_ok = true;
    for formula in formulae {
        match calculator.molar_mass(formula, None) {
            Ok(response) => println!("{}", format_response(&response)),
            Err(e) => {
                all_ok = false;
                eprintln!("{}: {}", formula, e);
            }
        }
    }
    all_ok
}

/* colors
Blue (\x1b[34m) - header text
Yellow (\x1b[33m) - menu options
Cyan (\x1b[36m) - "Enter your choice:" prompt
Reset (\x1b[0m) - back to normal color
*/
fn show_main_menu(title: &str) {
    println!("\x1b[34m\n {} \n\x1b[0m", title);
    println!("\x1b[33m1. Calculate molar mass\x1b[0m");
    println!("\x1b[33m2. History\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    let _ = io::stdout().flush();
}

fn calculate_menu<C: HttpClient>(calculator: &mut MolarMassCalculator<C>) {
    print!("\x1b[36mEnter formula (e.g. Mg(OH)2): \x1b[0m");
    let _ = io::stdout().flush();
    let formula = get_user_input();
    // the formula itself is never trimmed, only the line ending is dropped
    let formula = formula.trim_end_matches(['\n', '\r']);
    match calculator.molar_mass(formula, None) {
        Ok(response) => {
            println!("{}", format_response(&response));
            println!("Composition: {}", response.hill_formula);
            if !response.properties.is_empty() {
                response.properties.pretty_print();
            }
        }
        Err(e) => println!("\x1b[31mError: {}\x1b[0m", e),
    }
}

pub fn format_response(response: &FormulaResponse) -> String {
    format!(
        "{}: {:.4} {}",
        response.formula, response.molar_mass, response.unit
    )
}

pub(crate) fn get_user_input() -> String {
    let mut input = String::new();
    if let Err(e) = io::stdin().read_line(&mut input) {
        println!("Failed to read input: {}", e);
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PubChem::pubchem_api::CompoundProperties;
    use std::collections::BTreeMap;

    #[test]
    fn test_format_response() {
        let response = FormulaResponse {
            formula: "H2O".to_string(),
            molar_mass: 18.015,
            unit: "g/mol".to_string(),
            hill_formula: "H2O".to_string(),
            elements: BTreeMap::from([("H".to_string(), 2), ("O".to_string(), 1)]),
            properties: CompoundProperties::default(),
        };
        assert_eq!(format_response(&response), "H2O: 18.0150 g/mol");
    }
}
