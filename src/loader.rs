//! Loading ontology documents and configuration.
//!
//! Both are JSON. Ontologies can also be fetched over HTTP(S).

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::LoadError;
use crate::ontology::OntologyDocument;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_json_str(&content)
}

fn load_json_str<T: DeserializeOwned>(content: &str) -> Result<T, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

/// Load an ontology document from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if it isn't a valid ontology document.
pub fn load_ontology(path: &Path) -> Result<OntologyDocument, LoadError> {
    let ontology: OntologyDocument = load_json_file(path)?;
    log::debug!(
        "loaded {} ({} classes) from {}",
        ontology.iri,
        ontology.classes.len(),
        path.display()
    );
    Ok(ontology)
}

/// Load an ontology document from a JSON string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't a valid ontology
/// document.
pub fn load_ontology_str(content: &str) -> Result<OntologyDocument, LoadError> {
    load_json_str(content)
}

/// Load an ontology document from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails or the response
/// isn't a valid ontology document.
#[cfg(feature = "remote")]
pub fn load_ontology_url(url: &str) -> Result<OntologyDocument, LoadError> {
    let network_error = |source| LoadError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network_error)?;

    // HTTP errors are reported before the body is parsed
    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(network_error)?;

    let ontology: OntologyDocument = response.json().map_err(network_error)?;
    log::debug!("fetched {} from {}", ontology.iri, url);
    Ok(ontology)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load an ontology from a file path or URL.
///
/// URL loading requires the `remote` feature.
///
/// # Errors
///
/// Returns appropriate errors based on the source type.
pub fn load_ontology_auto(source: &str) -> Result<OntologyDocument, LoadError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_ontology_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(LoadError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_ontology(Path::new(source))
    }
}

/// Load a compiler configuration from a file path.
///
/// Missing fields take their defaults.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if it isn't a valid configuration.
pub fn load_config(path: &Path) -> Result<Config, LoadError> {
    load_json_file(path)
}

/// Load a compiler configuration from a JSON string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't a valid
/// configuration.
pub fn load_config_str(content: &str) -> Result<Config, LoadError> {
    load_json_str(content)
}
