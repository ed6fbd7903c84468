//! Wikidata facts for a Wikipedia article.
//!
//! Two phases, both against `wbgetentities`:
//!
//! 1. **Claims** -- fetch the entity linked to the article's site/title pair and
//!    reduce every statement to a plain value by datatype. Entity-valued
//!    statements are kept as QIDs.
//! 2. **Labels** -- resolve English labels for every property id and every
//!    referenced QID, in chunks of at most [`LABEL_CHUNK_SIZE`] ids.
//!
//! Facts are then emitted as `(property label, value)` pairs, with QIDs
//! replaced by their labels.

use crate::config::{LABEL_CHUNK_SIZE, LABEL_LANGUAGE, WIKIDATA_CLAIMS_API, WIKIDATA_LABELS_API};
use crate::error::{non_empty, LookupError, LookupResult};
use crate::models::MultiValueMode;
use crate::query::ApiQuery;
use crate::reference::Reference;
use crate::transport::Transport;
use indexmap::IndexMap;
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// A statement value reduced to something printable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimValue {
    Literal(String),
    Time(String),
    Quantity(String),
    /// `Q<numeric-id>`, shown through its label
    Entity(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub property: String,
    pub values: Vec<ClaimValue>,
}

/// Outcome of a label lookup for one id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    Found(String),
    /// Looked up, but the entity has no label in [`LABEL_LANGUAGE`]
    Missing,
}

/// Labels by property or entity id. An absent id was never looked up.
#[derive(Debug, Clone, Default)]
pub struct LabelMap {
    labels: HashMap<String, Label>,
}

impl LabelMap {
    pub fn get(&self, id: &str) -> Option<&Label> {
        self.labels.get(id)
    }

    /// The label text, if one was found.
    pub fn text(&self, id: &str) -> Option<&str> {
        match self.labels.get(id) {
            Some(Label::Found(text)) => Some(text),
            _ => None,
        }
    }

    pub fn insert(&mut self, id: impl Into<String>, label: Label) {
        self.labels.insert(id.into(), label);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    pub property: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
struct EntitiesResponse {
    #[serde(default)]
    entities: IndexMap<String, Entity>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize)]
struct Entity {
    #[serde(default)]
    missing: Option<String>,
    #[serde(default, deserialize_with = "object_or_empty_array")]
    claims: IndexMap<String, Vec<Statement>>,
    #[serde(default, deserialize_with = "object_or_empty_array")]
    labels: HashMap<String, LabelValue>,
}

#[derive(Debug, Deserialize)]
struct Statement {
    #[serde(default)]
    mainsnak: Option<Snak>,
}

#[derive(Debug, Deserialize)]
struct Snak {
    #[serde(default)]
    datatype: Option<String>,
    #[serde(default)]
    datavalue: Option<DataValue>,
}

#[derive(Debug, Deserialize)]
struct DataValue {
    value: Value,
}

#[derive(Debug, Deserialize)]
struct LabelValue {
    #[serde(default)]
    value: String,
}

/// Wikibase serializes an empty map as `[]`.
fn object_or_empty_array<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) if items.is_empty() => Ok(T::default()),
        Value::Null => Ok(T::default()),
        other => serde_json::from_value(other).map_err(serde::de::Error::custom),
    }
}

fn fetch_entities<T: Transport>(transport: &T, request: &ApiQuery) -> LookupResult<EntitiesResponse> {
    let body = transport.get(&request.url())?;
    let response: EntitiesResponse = serde_json::from_str(&body)?;
    if let Some(error) = response.error {
        return Err(LookupError::Api {
            code: error.code,
            info: error.info,
        });
    }
    Ok(response)
}

/// Reduces one statement by datatype; unknown datatypes and valueless snaks give `None`.
fn simplify_statement(statement: &Statement) -> Option<ClaimValue> {
    let snak = statement.mainsnak.as_ref()?;
    let value = &snak.datavalue.as_ref()?.value;

    match snak.datatype.as_deref()? {
        "string" | "commonsMedia" | "url" | "math" | "external-id" => {
            value.as_str().map(|s| ClaimValue::Literal(s.to_string()))
        }
        "monolingualtext" => value["text"].as_str().map(|s| ClaimValue::Literal(s.to_string())),
        "wikibase-item" => value["numeric-id"]
            .as_u64()
            .map(|id| ClaimValue::Entity(format!("Q{}", id))),
        "time" => value["time"].as_str().map(|s| ClaimValue::Time(s.to_string())),
        "quantity" => value["amount"].as_str().map(|s| ClaimValue::Quantity(s.to_string())),
        _ => None,
    }
}

/// Claims of the entity behind a Wikipedia article, in API order.
pub fn claims<T: Transport>(transport: &T, reference: &Reference) -> LookupResult<Vec<Claim>> {
    let request = ApiQuery::new(WIKIDATA_CLAIMS_API)
        .param("action", "wbgetentities")
        .param("sites", &format!("{}wiki", reference.language))
        .param("format", "json")
        .param("props", "claims")
        .title("titles", &reference.title);

    let response = fetch_entities(transport, &request)?;
    let (id, entity) = response.entities.into_iter().next().ok_or(LookupError::NoData)?;
    if entity.missing.is_some() {
        debug!(reference = %reference, "no Wikidata entity");
        return Err(LookupError::NoData);
    }

    let claims: Vec<Claim> = entity
        .claims
        .into_iter()
        .map(|(property, statements)| Claim {
            property,
            values: statements.iter().filter_map(simplify_statement).collect(),
        })
        .collect();
    debug!(entity = %id, claims = claims.len(), "claims simplified");
    Ok(claims)
}

/// Property ids first, then referenced entities, each id once.
pub fn label_ids(claims: &[Claim]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    let mut push = |id: &str| {
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
    };
    for claim in claims {
        push(&claim.property);
    }
    for claim in claims {
        for value in &claim.values {
            if let ClaimValue::Entity(qid) = value {
                push(qid);
            }
        }
    }
    ids
}

/// Resolves labels one chunk at a time; every requested id ends up in the map.
pub fn labels<T: Transport>(transport: &T, ids: &[String]) -> LookupResult<LabelMap> {
    let mut labels = LabelMap::default();

    for chunk in ids.chunks(LABEL_CHUNK_SIZE) {
        let request = ApiQuery::new(WIKIDATA_LABELS_API)
            .param("action", "wbgetentities")
            .param("languages", LABEL_LANGUAGE)
            .param("format", "json")
            .param("props", "labels")
            .param("ids", &chunk.join("|"));
        let mut response = fetch_entities(transport, &request)?;

        for id in chunk {
            let label = response
                .entities
                .swap_remove(id)
                .and_then(|mut entity| entity.labels.remove(LABEL_LANGUAGE))
                .map(|l| l.value)
                .filter(|v| !v.is_empty())
                .map_or(Label::Missing, Label::Found);
            labels.insert(id.clone(), label);
        }
        debug!(chunk = chunk.len(), "labels resolved");
    }

    Ok(labels)
}

/// Turns simplified claims into labelled facts.
///
/// A single-valued claim always yields a row. Multi-valued claims yield rows
/// only in [`MultiValueMode::First`] (first value) or [`MultiValueMode::All`].
/// Rows whose property or value has no label are dropped.
pub fn facts_from(claims: &[Claim], labels: &LabelMap, mode: MultiValueMode) -> Vec<Fact> {
    let mut facts = Vec::new();

    for claim in claims {
        let selected: &[ClaimValue] = match (claim.values.len(), mode) {
            (1, _) => claim.values.as_slice(),
            (n, MultiValueMode::First) if n > 1 => &claim.values[..1],
            (n, MultiValueMode::All) if n > 1 => claim.values.as_slice(),
            _ => continue,
        };

        let Some(property) = labels.text(&claim.property) else {
            continue;
        };
        for value in selected {
            let text = match value {
                ClaimValue::Entity(qid) => labels.text(qid),
                ClaimValue::Literal(s) | ClaimValue::Time(s) | ClaimValue::Quantity(s) => {
                    Some(s.as_str())
                }
            };
            if let Some(text) = text.filter(|t| !t.is_empty()) {
                facts.push(Fact {
                    property: property.to_string(),
                    value: text.to_string(),
                });
            }
        }
    }

    facts
}

/// Labelled facts for an article.
pub fn facts<T: Transport>(
    transport: &T,
    reference: &Reference,
    mode: MultiValueMode,
) -> LookupResult<Vec<Fact>> {
    let claims = claims(transport, reference)?;
    let ids = label_ids(&claims);
    let labels = labels(transport, &ids)?;
    non_empty(facts_from(&claims, &labels, mode))
}
