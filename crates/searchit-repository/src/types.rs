//! Engine-backed searchable type repository.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use searchit_core::{Error, Result, SearchableType, strip_index_prefix};
use searchit_gateway::response::Acknowledged;
use searchit_gateway::{Operation, Request, Response, SearchGateway, decode};

use crate::exchange::Exchange;
use crate::mapping::{mapping_body, types_from_mappings, validate_type};
use crate::repository::TypeRepository;

/// Searchable types stored as mappings of one engine index.
#[derive(Debug, Clone)]
pub struct ElasticTypeRepository {
    exchange: Exchange,
    index: String,
}

impl ElasticTypeRepository {
    /// Create a repository over `index`.
    pub fn new(gateway: Arc<dyn SearchGateway>, index: impl Into<String>) -> Self {
        Self {
            exchange: Exchange::new(gateway),
            index: index.into(),
        }
    }

    /// Apply a deadline to every engine call.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.exchange.set_timeout(timeout);
        self
    }

    /// Index holding the types.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Per-call deadline, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.exchange.timeout()
    }

    /// Create the index if it does not exist. Returns `true` if it was created.
    pub async fn ensure_index(&self) -> Result<bool> {
        let exists = self
            .exchange
            .probe(Request::IndexExists {
                index: self.index.clone(),
            })
            .await?;
        if exists {
            return Ok(false);
        }

        let body = self
            .exchange
            .body(Request::CreateIndex {
                index: self.index.clone(),
            })
            .await?;
        let ack: Acknowledged = decode(Operation::CreateIndex, body.clone())?;
        if !ack.acknowledged {
            return Err(Error::transport_with_response(
                format!("creation of index {} was not acknowledged", self.index),
                body,
            ));
        }

        log::info!("Created index {}", self.index);
        Ok(true)
    }

    /// Fetch and translate every mapping of the index.
    async fn load(&self) -> Result<Vec<SearchableType>> {
        let request = Request::GetMapping {
            index: self.index.clone(),
        };
        match self.exchange.send(request).await? {
            Response::Body(body) => types_from_mappings(&self.index, &body),
            Response::NotFound(_) => {
                log::debug!("Index {} does not exist, no searchable types", self.index);
                Ok(Vec::new())
            }
            other => Err(other.unexpected(Operation::GetMapping)),
        }
    }

    fn normalize<'a>(&self, identifier: &'a str) -> &'a str {
        strip_index_prefix(identifier, &self.index)
    }
}

#[async_trait]
impl TypeRepository for ElasticTypeRepository {
    async fn insert(&self, mut ty: SearchableType) -> Result<SearchableType> {
        ty.identifier = self.normalize(&ty.identifier).to_string();
        validate_type(&ty)?;

        let exists = self
            .exchange
            .probe(Request::TypeExists {
                index: self.index.clone(),
                doc_type: ty.identifier.clone(),
            })
            .await?;
        if exists {
            return Err(Error::schema_exists(ty.identifier));
        }

        let request = Request::PutMapping {
            index: self.index.clone(),
            doc_type: ty.identifier.clone(),
            body: mapping_body(&ty),
        };
        match self.exchange.send(request).await? {
            Response::Body(body) => {
                let ack: Acknowledged = decode(Operation::PutMapping, body.clone())?;
                if !ack.acknowledged {
                    return Err(Error::transport_with_response(
                        format!("mapping for {} was not acknowledged", ty.identifier),
                        body,
                    ));
                }
            }
            Response::Conflict(_) => return Err(Error::schema_exists(ty.identifier)),
            Response::NotFound(body) => {
                return Err(Error::transport_with_response(
                    format!("index {} does not exist", self.index),
                    body,
                ));
            }
            other => return Err(other.unexpected(Operation::PutMapping)),
        }

        log::info!(
            "Created searchable type {} with {} fields (autocomplete: {})",
            ty.identifier,
            ty.searchable_fields.len(),
            ty.autocomplete
        );
        Ok(ty)
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<SearchableType> {
        self.find_by_name(self.normalize(identifier)).await
    }

    async fn find_by_name(&self, name: &str) -> Result<SearchableType> {
        self.load()
            .await?
            .into_iter()
            .find(|ty| ty.identifier == name)
            .ok_or_else(|| Error::schema_missing(name))
    }

    async fn find_all(&self) -> Result<Vec<SearchableType>> {
        self.load().await
    }

    async fn find_many_by_identifiers(&self, identifiers: &[&str]) -> Result<Vec<SearchableType>> {
        let names: Vec<&str> = identifiers.iter().map(|id| self.normalize(id)).collect();
        self.find_many_by_names(&names).await
    }

    async fn find_many_by_names(&self, names: &[&str]) -> Result<Vec<SearchableType>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let all = self.load().await?;
        let mut found = Vec::with_capacity(names.len());
        for name in names {
            match all.iter().find(|ty| ty.identifier == *name) {
                Some(ty) => found.push(ty.clone()),
                None => log::warn!("Searchable type {name} not found in {}", self.index),
            }
        }
        Ok(found)
    }

    async fn delete_by_identifier(&self, identifier: &str) -> Result<()> {
        log::warn!("Rejected deletion of searchable type {identifier}");
        Err(Error::unsupported("delete searchable type"))
    }
}

// ============================================================================
// Tests
// ============================================================================
