/// interactive menu and command line mode of the calculator
pub mod cli_main;
/// history submenu: listing, changing and deleting stored calculations
pub mod cli_history;
