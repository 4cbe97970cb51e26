/// Physical and chemical properties of a compound from the PubChem database, searched by formula.
/// The HTTP client can be replaced (trait HttpClient), so the lookup is testable offline.
///
/// # Examples
/// ```no_run
/// use MolarCalc::PubChem::pubchem_api::PubChemClient;
/// let client = PubChemClient::new();
/// let properties = client.get_chemical_properties("C6H12O6");
/// println!("IUPAC name: {:?}", properties.iupac_name);
/// println!("melting point: {:?}", properties.melting_point);
/// ```
pub mod pubchem_api;
