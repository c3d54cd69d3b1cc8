//! Blocking REST client oracle.
//!
//! Talks to a remote concept service over a small JSON GET protocol. Every
//! transport or decode failure surfaces as an [`OracleError`]; the solving
//! contract treats those as fatal, so there is no retry logic here.

use serde::Deserialize;

use crate::error::OracleError;

use super::{Oracle, RelationKind};

/// Remote knowledge-graph service client.
pub struct HttpOracle {
    agent: ureq::Agent,
    base_url: String,
}

#[derive(Deserialize)]
struct ExistsResponse {
    exists: bool,
}

#[derive(Deserialize)]
struct DegreeResponse {
    degree: u64,
}

#[derive(Deserialize)]
struct LinkwordResponse {
    linkword: bool,
}

#[derive(Deserialize)]
struct ConnectedResponse {
    connected: bool,
}

#[derive(Deserialize)]
struct PathResponse {
    length: Option<u32>,
}

#[derive(Deserialize)]
struct RelatedResponse {
    related: Vec<String>,
}

#[derive(Deserialize)]
struct DefinitionsResponse {
    definitions: Option<String>,
}

impl HttpOracle {
    /// Connect to a concept service, verifying it answers at all.
    pub fn connect(base_url: &str) -> Result<Self, OracleError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let agent = ureq::Agent::new();
        agent
            .get(&base_url)
            .call()
            .map_err(|source| OracleError::Http {
                url: base_url.clone(),
                source: Box::new(source),
            })?;
        tracing::info!(url = %base_url, "connected to graph service");
        Ok(Self { agent, base_url })
    }

    fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, OracleError> {
        let url = format!("{}/{endpoint}", self.base_url);
        let mut request = self.agent.get(&url);
        for (name, value) in params {
            request = request.query(name, value);
        }
        let response = request.call().map_err(|source| OracleError::Http {
            url: url.clone(),
            source: Box::new(source),
        })?;
        response.into_json().map_err(|e| OracleError::Decode {
            url,
            message: e.to_string(),
        })
    }
}

impl Oracle for HttpOracle {
    fn exists(&self, key: &str) -> Result<bool, OracleError> {
        let r: ExistsResponse = self.get("exists", &[("key", key)])?;
        Ok(r.exists)
    }

    fn degree(&self, key: &str) -> Result<u64, OracleError> {
        let r: DegreeResponse = self.get("degree", &[("key", key)])?;
        Ok(r.degree)
    }

    fn is_linkword(&self, key: &str) -> Result<bool, OracleError> {
        let r: LinkwordResponse = self.get("linkword", &[("key", key)])?;
        Ok(r.linkword)
    }

    fn connected(&self, a: &str, b: &str, relation: RelationKind) -> Result<bool, OracleError> {
        let r: ConnectedResponse = self.get(
            "connected",
            &[("a", a), ("b", b), ("rel", relation.label())],
        )?;
        Ok(r.connected)
    }

    fn shortest_path_len(&self, a: &str, b: &str) -> Result<Option<u32>, OracleError> {
        let r: PathResponse = self.get("path", &[("a", a), ("b", b)])?;
        Ok(r.length)
    }

    fn related_by_property(
        &self,
        key: &str,
        property: &str,
    ) -> Result<Vec<String>, OracleError> {
        let r: RelatedResponse = self.get("related", &[("key", key), ("property", property)])?;
        Ok(r.related)
    }

    fn definitions(&self, key: &str) -> Result<Option<String>, OracleError> {
        let r: DefinitionsResponse = self.get("definitions", &[("key", key)])?;
        Ok(r.definitions)
    }
}
