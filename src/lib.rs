#[allow(non_snake_case)]
pub mod Formula;
#[allow(non_snake_case)]
pub mod History;
#[allow(non_snake_case)]
pub mod PubChem;
#[allow(non_snake_case)]
pub mod Utils;
pub mod calculator;
pub mod cli;
pub mod settings;
