/// error kinds of the formula pipeline: syntax errors (FormatError) and evaluation errors (MassError)
pub mod formula_error;
/// Checks that a formula is non-empty, uses only latin letters, digits and round brackets,
/// and has balanced brackets.
/// # Examples
/// ```
/// use MolarCalc::Formula::validator::validate;
/// assert_eq!(validate("Na(Cl)2"), Ok("Na(Cl)2"));
/// assert!(validate("H2(O").is_err());
/// assert!(validate("NaCl!").is_err());
/// ```
pub mod validator;
/// splitting a formula into element symbols, integers and brackets
pub mod tokenizer;
/// Turns a formula into an ordered sequence of (element, count) pairs, distributing
/// multipliers of nested groups over their contents.
/// # Examples
/// ```
/// use MolarCalc::Formula::parser::parse;
/// let pairs = parse("K4(Fe(CN)6)").unwrap();
/// for pair in &pairs {
///     println!("{}", pair);
/// }
/// assert_eq!(pairs.len(), 4);
/// ```
pub mod parser;
/// element -> atomic mass lookup table
pub mod mass_table;
/// Module to calculate the molar mass and the atomic composition of a chemical formula
///
///  # Examples
/// ```
/// use MolarCalc::Formula::evaluator::{calculate_molar_mass, composition, hill_formula, round_mass};
/// use MolarCalc::Formula::mass_table::AtomicMassTable;
/// use MolarCalc::Formula::parser::parse;
/// let table = AtomicMassTable::builtin();
/// let molar_mass = calculate_molar_mass("C6H12O6", &table).unwrap();
/// println!("Molar mass: {:?} g/mol", round_mass(molar_mass));
/// let pairs = parse("CH3COOH").unwrap();
/// println!("Element counts: {:?}", composition(&pairs));
/// assert_eq!(hill_formula(&pairs), "C2H4O2");
/// ```
pub mod evaluator;
