use serde::{Deserialize, Serialize};

use crate::dates::Period;

/// A municipality returned by the search call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "codigo")]
    pub code: u32,
    #[serde(rename = "municipio")]
    pub name: String,
    #[serde(rename = "uf")]
    pub region: String,
}

impl Candidate {
    pub fn new(code: u32, name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
            region: region.into(),
        }
    }

    /// Label written into the search field once the candidate is picked.
    pub fn label(&self) -> String {
        format!("{} - {}", self.name, self.region)
    }
}

/// Body of the lookup call.
///
/// Only built from a bound selection, see [`crate::selection::Selection::request_for`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupRequest {
    codigo: u32,
    nome: String,
    uf: String,
    data_inicio: String,
    data_fim: String,
}

impl LookupRequest {
    pub(crate) fn new(candidate: &Candidate, period: &Period) -> Self {
        Self {
            codigo: candidate.code,
            nome: candidate.name.clone(),
            uf: candidate.region.clone(),
            data_inicio: period.wire_start(),
            data_fim: period.wire_end(),
        }
    }

    pub fn code(&self) -> u32 {
        self.codigo
    }

    pub fn name(&self) -> &str {
        &self.nome
    }

    pub fn region(&self) -> &str {
        &self.uf
    }

    pub fn start(&self) -> &str {
        &self.data_inicio
    }

    pub fn end(&self) -> &str {
        &self.data_fim
    }
}

/// Response of the lookup call. Also the stored form of a history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    #[serde(rename = "municipio")]
    pub entity_label: String,
    #[serde(rename = "periodo")]
    pub period_label: String,
    pub fpm: f64,
    pub royalties: f64,
    pub todos: f64,
}

impl LookupResult {
    /// One-line summary used by the history list.
    pub fn summary(&self) -> String {
        format!("{} | {}", self.entity_label, self.period_label)
    }
}
