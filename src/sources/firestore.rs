//! Cloud Firestore REST source (`documents:runQuery`)

use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use super::{RecordQuery, RecordSource};
use crate::config::FirebaseConfig;
use crate::types::{ProdtrackError, ProductionRecord, Result};

/// Fields mapped onto `ProductionRecord`'s named members
const CORE_FIELDS: [&str; 6] = [
    "date",
    "productName",
    "productCode",
    "packageType",
    "quantity",
    "createdAt",
];

/// One element of the `runQuery` response array.
/// Elements without `document` only carry progress metadata.
#[derive(Debug, Deserialize)]
struct RunQueryItem {
    #[serde(default)]
    document: Option<Document>,
}

#[derive(Debug, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: HashMap<String, FieldValue>,
}

/// Firestore typed value. Exactly one member is set; map/array/reference
/// values are not used by this collection and are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldValue {
    string_value: Option<String>,
    /// int64 encoded as a decimal string
    integer_value: Option<String>,
    double_value: Option<f64>,
    boolean_value: Option<bool>,
    timestamp_value: Option<String>,
}

impl FieldValue {
    fn as_str(&self) -> Option<&str> {
        self.string_value.as_deref()
    }

    /// Non-negative whole quantity. `None` value → 0.
    fn as_quantity(&self) -> std::result::Result<u64, String> {
        if let Some(s) = &self.integer_value {
            return s
                .parse::<u64>()
                .map_err(|_| format!("quantity {:?} is not a non-negative integer", s));
        }
        if let Some(d) = self.double_value {
            if d.is_finite() && d >= 0.0 && d.fract() == 0.0 && d <= u64::MAX as f64 {
                return Ok(d as u64);
            }
            return Err(format!("quantity {} is not a non-negative integer", d));
        }
        if let Some(s) = &self.string_value {
            return s
                .trim()
                .parse::<u64>()
                .map_err(|_| format!("quantity {:?} is not a non-negative integer", s));
        }
        Ok(0)
    }

    /// Plain JSON form, for `createdAt` and schema-extension fields
    fn to_json(&self) -> Option<Value> {
        if let Some(s) = &self.string_value {
            return Some(Value::String(s.clone()));
        }
        if let Some(s) = &self.integer_value {
            return Some(
                s.parse::<i64>()
                    .map(Value::from)
                    .unwrap_or_else(|_| Value::String(s.clone())),
            );
        }
        if let Some(d) = self.double_value {
            return serde_json::Number::from_f64(d).map(Value::Number);
        }
        if let Some(b) = self.boolean_value {
            return Some(Value::Bool(b));
        }
        self.timestamp_value.clone().map(Value::String)
    }
}

/// Decode one stored document into a record.
///
/// `date` is required; missing name/code/package become empty strings and
/// a missing quantity becomes 0.
fn decode_document(doc: &Document) -> std::result::Result<ProductionRecord, String> {
    let text = |field: &str| -> String {
        doc.fields
            .get(field)
            .and_then(FieldValue::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let date = doc
        .fields
        .get("date")
        .and_then(FieldValue::as_str)
        .ok_or_else(|| "missing string field `date`".to_string())?
        .to_string();

    let quantity = match doc.fields.get("quantity") {
        Some(v) => v.as_quantity()?,
        None => 0,
    };

    let extra: BTreeMap<String, Value> = doc
        .fields
        .iter()
        .filter(|(name, _)| !CORE_FIELDS.contains(&name.as_str()))
        .filter_map(|(name, v)| v.to_json().map(|json| (name.clone(), json)))
        .collect();

    Ok(ProductionRecord {
        date,
        product_name: text("productName"),
        product_code: text("productCode"),
        package_type: text("packageType"),
        quantity,
        created_at: doc.fields.get("createdAt").and_then(FieldValue::to_json),
        extra,
    })
}

/// Parse a `runQuery` response body, skipping undecodable documents
fn parse_run_query_response(body: &str) -> Result<Vec<ProductionRecord>> {
    let items: Vec<RunQueryItem> = serde_json::from_str(body)
        .map_err(|e| ProdtrackError::Parse(format!("invalid runQuery response: {}", e)))?;

    let mut records = Vec::with_capacity(items.len());
    for doc in items.iter().filter_map(|item| item.document.as_ref()) {
        match decode_document(doc) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!(document = %doc.name, "skipping document: {}", e),
        }
    }
    Ok(records)
}

/// Pull the human-readable message out of a Firestore error body
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }
    #[derive(Deserialize)]
    struct ErrorDetail {
        #[serde(default)]
        status: String,
        #[serde(default)]
        message: String,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.error.status.is_empty() => {
            format!("{}: {}", parsed.error.status, parsed.error.message)
        }
        Ok(parsed) => parsed.error.message,
        Err(_) => body.trim().to_string(),
    }
}

/// Firestore source using the REST API with an optional web API key
pub struct FirestoreSource {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: Option<String>,
    collection: String,
}

impl FirestoreSource {
    pub fn new(config: &FirebaseConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProdtrackError::Source(format!("HTTP client error: {}", e)))?;

        let endpoint = format!(
            "{}/projects/{}/databases/{}/documents:runQuery",
            config.base_url.trim_end_matches('/'),
            config.project_id,
            config.database
        );

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            collection: config.collection.clone(),
        })
    }

    /// `runQuery` request body for `query`
    fn structured_query(&self, query: &RecordQuery) -> Value {
        let field_filter = |op: &str, value: &str| {
            json!({
                "fieldFilter": {
                    "field": { "fieldPath": "date" },
                    "op": op,
                    "value": { "stringValue": value },
                }
            })
        };

        let (start, end) = query.bounds();
        let filter = match query {
            RecordQuery::Day(_) => field_filter("EQUAL", &start),
            RecordQuery::Month { .. } | RecordQuery::Year(_) => json!({
                "compositeFilter": {
                    "op": "AND",
                    "filters": [
                        field_filter("GREATER_THAN_OR_EQUAL", &start),
                        field_filter("LESS_THAN_OR_EQUAL", &end),
                    ],
                }
            }),
        };

        json!({
            "structuredQuery": {
                "from": [{ "collectionId": self.collection }],
                "where": filter,
                "orderBy": [{
                    "field": { "fieldPath": query.order_by().field() },
                    "direction": "ASCENDING",
                }],
            }
        })
    }
}

impl RecordSource for FirestoreSource {
    fn name(&self) -> &str {
        "firestore"
    }

    fn fetch(&self, query: &RecordQuery) -> Result<Vec<ProductionRecord>> {
        tracing::debug!(query = %query.label(), endpoint = %self.endpoint, "running Firestore query");

        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&self.structured_query(query));
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request
            .send()
            .map_err(|e| ProdtrackError::Source(format!("HTTP request failed: {}", e)))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ProdtrackError::Source(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(ProdtrackError::Source(format!(
                "Firestore returned {}: {}",
                status,
                error_message(&body)
            )));
        }

        let records = parse_run_query_response(&body)?;
        tracing::debug!(count = records.len(), "fetched production records");
        Ok(records)
    }
}
