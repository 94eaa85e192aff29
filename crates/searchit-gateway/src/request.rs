//! Typed gateway requests.
//!
//! Each [`Request`] variant is one engine operation and carries exactly the
//! data that operation needs. Bodies stay as JSON values: their structure
//! is built by the repositories, the gateway only routes them.

use std::fmt;

use serde_json::{Map, Value};

/// Kind of engine operation, independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Probe whether an index exists.
    IndexExists,
    /// Create an empty index.
    CreateIndex,
    /// Fetch every mapping of an index.
    GetMapping,
    /// Create (or extend) one mapping type.
    PutMapping,
    /// Probe whether a mapping type exists.
    TypeExists,
    /// Probe whether a document exists.
    DocumentExists,
    /// Fetch one document.
    GetDocument,
    /// Write one document.
    IndexDocument,
    /// Partially update one document.
    UpdateDocument,
    /// Delete one document.
    DeleteDocument,
    /// Write many documents in one request.
    BulkWrite,
    /// Run one query.
    Search,
    /// Run several queries in one request.
    MultiSearch,
    /// Run a completion suggester.
    Suggest,
}

impl Operation {
    /// Kebab-case operation name, used in logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IndexExists => "index-exists",
            Self::CreateIndex => "create-index",
            Self::GetMapping => "get-mapping",
            Self::PutMapping => "put-mapping",
            Self::TypeExists => "type-exists",
            Self::DocumentExists => "document-exists",
            Self::GetDocument => "get-document",
            Self::IndexDocument => "index-document",
            Self::UpdateDocument => "update-document",
            Self::DeleteDocument => "delete-document",
            Self::BulkWrite => "bulk-write",
            Self::Search => "search",
            Self::MultiSearch => "multi-search",
            Self::Suggest => "suggest",
        }
    }

    /// Returns `true` for operations answered by an existence probe.
    pub fn is_probe(&self) -> bool {
        matches!(
            self,
            Self::IndexExists | Self::TypeExists | Self::DocumentExists
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a document write treats an existing document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Fail with a conflict if the document already exists.
    #[default]
    Create,
    /// Create or fully replace the document.
    Index,
}

/// Address of a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    /// Index name.
    pub index: String,
    /// Mapping type name.
    pub doc_type: String,
    /// Document identifier.
    pub id: String,
}

impl DocumentRef {
    /// Create a document reference.
    pub fn new(
        index: impl Into<String>,
        doc_type: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            index: index.into(),
            doc_type: doc_type.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.index, self.doc_type, self.id)
    }
}

/// One document write inside a bulk request.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkItem {
    /// Target document.
    pub target: DocumentRef,
    /// Document body.
    pub body: Map<String, Value>,
}

/// One query inside a multi-search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSpec {
    /// Index name.
    pub index: String,
    /// Mapping types to search; empty means all types.
    pub doc_types: Vec<String>,
    /// Query body (`size`, `from`, `query`, `aggs`, ...).
    pub body: Value,
}

impl SearchSpec {
    /// Create a query scoped to one mapping type.
    pub fn for_type(index: impl Into<String>, doc_type: impl Into<String>, body: Value) -> Self {
        Self {
            index: index.into(),
            doc_types: vec![doc_type.into()],
            body,
        }
    }
}

/// A structured engine request.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// Probe whether an index exists.
    IndexExists {
        /// Index name.
        index: String,
    },
    /// Create an empty index.
    CreateIndex {
        /// Index name.
        index: String,
    },
    /// Fetch every mapping of an index.
    GetMapping {
        /// Index name.
        index: String,
    },
    /// Create (or extend) one mapping type.
    PutMapping {
        /// Index name.
        index: String,
        /// Mapping type name.
        doc_type: String,
        /// Mapping body, keyed by the type name.
        body: Value,
    },
    /// Probe whether a mapping type exists.
    TypeExists {
        /// Index name.
        index: String,
        /// Mapping type name.
        doc_type: String,
    },
    /// Probe whether a document exists.
    DocumentExists(DocumentRef),
    /// Fetch one document.
    GetDocument(DocumentRef),
    /// Write one document.
    IndexDocument {
        /// Target document.
        target: DocumentRef,
        /// Document body.
        body: Map<String, Value>,
        /// Create-only or create-or-replace.
        mode: WriteMode,
    },
    /// Partially update one document.
    UpdateDocument {
        /// Target document.
        target: DocumentRef,
        /// Fields to merge into the stored document.
        doc: Map<String, Value>,
    },
    /// Delete one document.
    DeleteDocument(DocumentRef),
    /// Write many documents in one request.
    Bulk {
        /// Writes, in order.
        items: Vec<BulkItem>,
    },
    /// Run one query.
    Search(SearchSpec),
    /// Run several queries in one request.
    MultiSearch {
        /// Queries, in order; responses come back in the same order.
        searches: Vec<SearchSpec>,
    },
    /// Run a completion suggester.
    Suggest {
        /// Index name.
        index: String,
        /// Body with a `suggest` section.
        body: Value,
    },
}

impl Request {
    /// Operation kind of this request.
    pub fn operation(&self) -> Operation {
        match self {
            Self::IndexExists { .. } => Operation::IndexExists,
            Self::CreateIndex { .. } => Operation::CreateIndex,
            Self::GetMapping { .. } => Operation::GetMapping,
            Self::PutMapping { .. } => Operation::PutMapping,
            Self::TypeExists { .. } => Operation::TypeExists,
            Self::DocumentExists(_) => Operation::DocumentExists,
            Self::GetDocument(_) => Operation::GetDocument,
            Self::IndexDocument { .. } => Operation::IndexDocument,
            Self::UpdateDocument { .. } => Operation::UpdateDocument,
            Self::DeleteDocument(_) => Operation::DeleteDocument,
            Self::Bulk { .. } => Operation::BulkWrite,
            Self::Search(_) => Operation::Search,
            Self::MultiSearch { .. } => Operation::MultiSearch,
            Self::Suggest { .. } => Operation::Suggest,
        }
    }

    /// Short description of the request target, for logs.
    pub fn target(&self) -> String {
        match self {
            Self::IndexExists { index }
            | Self::CreateIndex { index }
            | Self::GetMapping { index }
            | Self::Suggest { index, .. } => index.clone(),
            Self::PutMapping {
                index, doc_type, ..
            }
            | Self::TypeExists { index, doc_type } => format!("{index}/{doc_type}"),
            Self::DocumentExists(target)
            | Self::GetDocument(target)
            | Self::DeleteDocument(target)
            | Self::IndexDocument { target, .. }
            | Self::UpdateDocument { target, .. } => target.to_string(),
            Self::Bulk { items } => format!("{} documents", items.len()),
            Self::Search(spec) => format!("{}/{}", spec.index, spec.doc_types.join(",")),
            Self::MultiSearch { searches } => format!("{} queries", searches.len()),
        }
    }
}
