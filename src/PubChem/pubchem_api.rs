//! # PubChem compound properties
//!
//! ## Aim
//! Looks up a compound by its molecular formula in PubChem (https://pubchem.ncbi.nlm.nih.gov)
//! and collects IUPAC name, links to structure images and the experimental physical properties
//! found in the full compound record.
//!
//! ## Logic
//! 1) search CIDs by formula, the first CID is taken
//! 2) property table of the CID gives the IUPAC name
//! 3) structure image urls and the compound page url are built from the CID
//! 4) the pug_view record is walked through: sections about physical/chemical/experimental
//! properties provide boiling point, melting point, density, physical state and hazards
//!
//! The lookup never fails as a whole: whatever was collected before a failure is returned,
//! and the failure is logged. The HTTP client is a trait so tests run without the network.
//!
//! ## Usage
//! ```rust, ignore
//! let client = PubChemClient::new();
//! let properties = client.get_chemical_properties("C6H12O6");
//! properties.pretty_print();
//! ```
use log::{debug, info, warn};
use prettytable::{Cell, Row, Table};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::settings::AppConfig;

const PUG_REST: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug";
const PUG_VIEW: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug_view";
const COMPOUND_PAGE: &str = "https://pubchem.ncbi.nlm.nih.gov/compound";
// headings of the record sections worth descending into
const PROPERTY_SECTIONS: [&str; 3] = ["physical", "chemical", "experimental"];

#[derive(Debug, Error)]
pub enum PubChemError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),
    #[error("HTTP status {status} for {url}")]
    HttpStatus { status: u16, url: String },
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("No compound found for formula {0}")]
    CompoundNotFound(String),
}

/// HTTP client trait for dependency injection
pub trait HttpClient {
    fn get_text(&self, url: &str, timeout: Duration) -> Result<String, PubChemError>;
}

impl HttpClient for Client {
    fn get_text(&self, url: &str, timeout: Duration) -> Result<String, PubChemError> {
        let response = self.get(url).timeout(timeout).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(PubChemError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text()?)
    }
}

/// physical and chemical properties of a compound, every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompoundProperties {
    pub boiling_point: Option<String>,
    pub melting_point: Option<String>,
    pub density: Option<String>,
    pub state_at_room_temp: Option<String>,
    pub iupac_name: Option<String>,
    pub hazard_classification: Option<String>,
    pub structure_image_url: Option<String>,
    pub structure_image_svg_url: Option<String>,
    pub compound_url: Option<String>,
}

impl CompoundProperties {
    pub fn is_empty(&self) -> bool {
        *self == CompoundProperties::default()
    }

    pub fn pretty_print(&self) {
        let mut table = Table::new();
        table.add_row(Row::new(vec![Cell::new("Property"), Cell::new("Value")]));
        let rows = [
            ("IUPAC name", &self.iupac_name),
            ("Boiling point", &self.boiling_point),
            ("Melting point", &self.melting_point),
            ("Density", &self.density),
            ("State at room temperature", &self.state_at_room_temp),
            ("Hazards", &self.hazard_classification),
            ("Structure (PNG)", &self.structure_image_url),
            ("Structure (SVG)", &self.structure_image_svg_url),
            ("PubChem page", &self.compound_url),
        ];
        for (name, value) in rows {
            if let Some(value) = value {
                table.add_row(Row::new(vec![Cell::new(name), Cell::new(value)]));
            }
        }
        table.printstd();
    }
}

pub struct PubChemClient<C: HttpClient> {
    client: C,
    timeout: Duration,
    record_timeout: Duration,
    delay: Duration,
}

impl PubChemClient<Client> {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_client(Client::new())
            .with_timeouts(config.pubchem_timeout(), config.pubchem_record_timeout())
            .with_delay(config.pubchem_delay())
    }
}

impl<C: HttpClient> PubChemClient<C> {
    pub fn with_client(client: C) -> Self {
        Self {
            client,
            timeout: Duration::from_secs(10),
            record_timeout: Duration::from_secs(15),
            delay: Duration::from_millis(100),
        }
    }

    pub fn with_timeouts(mut self, timeout: Duration, record_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.record_timeout = record_timeout;
        self
    }

    /// pause between consecutive requests to PubChem
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Collects the properties of the compound with the given formula. Never fails: on error
    /// the properties gathered so far are returned (all None at worst).
    pub fn get_chemical_properties(&self, formula: &str) -> CompoundProperties {
        let mut properties = CompoundProperties::default();
        match self.fill_properties(formula, &mut properties) {
            Ok(cid) => info!(
                "Successfully fetched properties for {} (CID: {})",
                formula, cid
            ),
            Err(PubChemError::CompoundNotFound(_)) => {
                info!("No compound found for formula {}", formula)
            }
            Err(e) => warn!("PubChem lookup failed for formula {}: {}", formula, e),
        }
        properties
    }

    fn fill_properties(
        &self,
        formula: &str,
        properties: &mut CompoundProperties,
    ) -> Result<u64, PubChemError> {
        let cid = self.search_cid(formula)?;
        debug!("formula {} -> CID {}", formula, cid);

        self.pause();
        match self.fetch_iupac_name(cid) {
            Ok(name) => properties.iupac_name = name,
            Err(e) => warn!("Failed to fetch IUPAC name of CID {}: {}", cid, e),
        }

        properties.structure_image_url = Some(format!("{}/compound/cid/{}/PNG", PUG_REST, cid));
        properties.structure_image_svg_url =
            Some(format!("{}/compound/cid/{}/SVG", PUG_REST, cid));
        properties.compound_url = Some(format!("{}/{}", COMPOUND_PAGE, cid));

        self.pause();
        match self.fetch_record(cid) {
            Ok(record) => extract_properties_from_record(&record, properties),
            Err(e) => warn!("Error fetching experimental data for {}: {}", formula, e),
        }
        Ok(cid)
    }

    fn pause(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }

    pub fn search_url(&self, formula: &str) -> Result<Url, PubChemError> {
        Ok(Url::parse(&format!(
            "{}/compound/formula/{}/cids/JSON",
            PUG_REST, formula
        ))?)
    }

    /// first CID found for the formula
    pub fn search_cid(&self, formula: &str) -> Result<u64, PubChemError> {
        let url = self.search_url(formula)?;
        let text = self.client.get_text(url.as_str(), self.timeout)?;
        let data: Value = serde_json::from_str(&text)?;
        data.get("IdentifierList")
            .and_then(|list| list.get("CID"))
            .and_then(Value::as_array)
            .and_then(|cids| cids.first())
            .and_then(Value::as_u64)
            .ok_or_else(|| PubChemError::CompoundNotFound(formula.to_string()))
    }

    fn fetch_iupac_name(&self, cid: u64) -> Result<Option<String>, PubChemError> {
        let url = Url::parse(&format!(
            "{}/compound/cid/{}/property/MolecularFormula,MolecularWeight,IUPACName/JSON",
            PUG_REST, cid
        ))?;
        let text = self.client.get_text(url.as_str(), self.timeout)?;
        let data: Value = serde_json::from_str(&text)?;
        Ok(data
            .get("PropertyTable")
            .and_then(|t| t.get("Properties"))
            .and_then(Value::as_array)
            .and_then(|props| props.first())
            .and_then(|prop| prop.get("IUPACName"))
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn fetch_record(&self, cid: u64) -> Result<Value, PubChemError> {
        let url = Url::parse(&format!("{}/data/compound/{}/JSON", PUG_VIEW, cid))?;
        let text = self.client.get_text(url.as_str(), self.record_timeout)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// walks all top level sections of a pug_view record
pub fn extract_properties_from_record(record: &Value, properties: &mut CompoundProperties) {
    if let Some(sections) = record
        .get("Record")
        .and_then(|r| r.get("Section"))
        .and_then(Value::as_array)
    {
        for section in sections {
            extract_properties_from_section(section, properties);
        }
    }
}

/// Descends only into sections whose heading mentions physical, chemical or experimental data.
/// Later matches overwrite earlier ones.
pub fn extract_properties_from_section(section: &Value, properties: &mut CompoundProperties) {
    let Some(heading) = section.get("TOCHeading").and_then(Value::as_str) else {
        return;
    };
    let heading = heading.to_lowercase();
    if !PROPERTY_SECTIONS.iter().any(|k| heading.contains(k)) {
        return;
    }

    if let Some(subsections) = section.get("Section").and_then(Value::as_array) {
        for subsection in subsections {
            extract_properties_from_section(subsection, properties);
            extract_named_section(subsection, properties);
        }
    }

    if let Some(information) = section.get("Information").and_then(Value::as_array) {
        for info in information {
            let name = info.get("Name").and_then(Value::as_str);
            let value = info.get("Value").and_then(extract_value_string);
            if let (Some(name), Some(value)) = (name, value) {
                assign_property(&name.to_lowercase(), value, properties);
            }
        }
    }
}

// sections like "Boiling Point" carry the property name in the heading, not in Information.Name
fn extract_named_section(section: &Value, properties: &mut CompoundProperties) {
    let Some(heading) = section.get("TOCHeading").and_then(Value::as_str) else {
        return;
    };
    let value = section
        .get("Information")
        .and_then(Value::as_array)
        .and_then(|information| {
            information
                .iter()
                .filter_map(|info| info.get("Value").and_then(extract_value_string))
                .next()
        });
    if let Some(value) = value {
        assign_property(&heading.to_lowercase(), value, properties);
    }
}

fn assign_property(name: &str, value: String, properties: &mut CompoundProperties) {
    if name.contains("boiling point") {
        properties.boiling_point = Some(value);
    } else if name.contains("melting point") {
        properties.melting_point = Some(value);
    } else if name.contains("density") {
        properties.density = Some(value);
    } else if name.contains("physical state") || name.contains("state") {
        properties.state_at_room_temp = Some(value);
    } else if name.contains("hazard") || name.contains("safety") || name.contains("toxicity") {
        properties.hazard_classification = Some(value);
    }
}

/// Text of a pug_view Value: the first StringWithMarkup string, otherwise the first number.
pub fn extract_value_string(value: &Value) -> Option<String> {
    match value {
        Value::Object(obj) => {
            if let Some(markup) = obj.get("StringWithMarkup") {
                markup.as_array().and_then(|items| {
                    items
                        .iter()
                        .find_map(|item| item.get("String").and_then(Value::as_str))
                        .map(str::to_string)
                })
            } else if let Some(number) = obj.get("Number") {
                match number {
                    Value::Array(numbers) => numbers.first().map(|n| n.to_string()),
                    other => Some(other.to_string()),
                }
            } else {
                None
            }
        }
        Value::Array(items) => items.iter().find_map(extract_value_string),
        _ => None,
    }
}
