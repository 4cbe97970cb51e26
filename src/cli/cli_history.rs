use super::cli_main::get_user_input;
use crate::History::history_service::HistoryRecord;
use crate::PubChem::pubchem_api::HttpClient;
use crate::calculator::MolarMassCalculator;
use prettytable::{Table, row};
use std::io::{self, Write};

pub fn history_menu<C: HttpClient>(calculator: &mut MolarMassCalculator<C>) {
    loop {
        println!("\n=== History ===");
        println!("1. Show recent calculations");
        println!("2. Change formula of a record");
        println!("3. Delete a record");
        println!("0. Back to main menu");
        print!("Enter your choice: ");
        let _ = io::stdout().flush();

        let choice = get_user_input();
        match choice.trim() {
            "1" => {
                let limit = prompt("How many records (empty for default): ");
                let limit = limit.trim().parse::<usize>().ok();
                history_table(&calculator.history(limit)).printstd();
            }
            "2" => {
                let Some(id) = parse_id(&prompt("Record ID: ")) else {
                    println!("Invalid ID");
                    continue;
                };
                let formula = prompt("New formula: ");
                match calculator.update_history(id, formula.trim_end_matches(['\n', '\r'])) {
                    Ok(record) => {
                        history_table(&[record]).printstd();
                    }
                    Err(e) => println!("\x1b[31mError: {}\x1b[0m", e),
                }
            }
            "3" => {
                let Some(id) = parse_id(&prompt("Record ID: ")) else {
                    println!("Invalid ID");
                    continue;
                };
                match calculator.delete_history(id) {
                    Ok(message) => println!("{}", message),
                    Err(e) => println!("\x1b[31mError: {}\x1b[0m", e),
                }
            }
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

fn prompt(text: &str) -> String {
    print!("{}", text);
    let _ = io::stdout().flush();
    get_user_input()
}

pub fn parse_id(input: &str) -> Option<u64> {
    input.trim().parse::<u64>().ok()
}

pub fn history_table(records: &[HistoryRecord]) -> Table {
    let mut table = Table::new();
    table.add_row(row!["ID", "Formula", "Molar mass", "Timestamp", "IUPAC name"]);
    for record in records {
        table.add_row(row![
            record.id,
            record.formula,
            format!("{:.4}", record.molar_mass),
            record.timestamp,
            record.properties.iupac_name.as_deref().unwrap_or("-")
        ]);
    }
    table
}
