use MolarCalc::calculator::MolarMassCalculator;
use MolarCalc::cli::cli_main::{run_interactive_menu, run_one_shot};
use MolarCalc::settings::ConfigManager;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::process;

pub fn main() {
    let config = match ConfigManager::new() {
        Ok(manager) => manager.get_config().clone(),
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };
    let level = config.level_filter().unwrap_or_else(|e| {
        eprintln!("{}, using info", e);
        LevelFilter::Info
    });
    if let Err(e) = TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    // the atomic masses table and the history are required, stop here if they can't be loaded
    let mut calculator = match MolarMassCalculator::from_config(config) {
        Ok(calculator) => calculator,
        Err(e) => {
            log::error!("Startup failed: {}", e);
            eprintln!("Startup failed: {}", e);
            process::exit(1);
        }
    };

    let formulae: Vec<String> = env::args().skip(1).collect();
    if formulae.is_empty() {
        run_interactive_menu(&mut calculator);
    } else if !run_one_shot(&mut calculator, &formulae) {
        process::exit(1);
    }
}
