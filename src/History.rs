/// Calculation history stored in a JSON file
///
/// # Examples
/// ```
/// use MolarCalc::Formula::mass_table::AtomicMassTable;
/// use MolarCalc::History::history_service::HistoryStore;
/// use MolarCalc::PubChem::pubchem_api::CompoundProperties;
/// let mut history = HistoryStore::in_memory();
/// let id = history.save("H2O", 18.01528, &CompoundProperties::default(), None).unwrap();
/// let record = history.update(id, "D2O", &AtomicMassTable::builtin());
/// assert!(record.is_err()); // D is not in the table
/// for record in history.list(10) {
///     println!("{} {} {}", record.id, record.formula, record.molar_mass);
/// }
/// ```
pub mod history_service;
