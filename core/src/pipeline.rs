//! Request payload pipeline.
//!
//! Instead of mutating a shared request object, each stage consumes a
//! [`RequestPayload`] and hands back a new one. Stages are composed into a
//! [`Pipeline`] that runs them in order:
//!
//! ```
//! use request_trim_core::pipeline::{Pipeline, RequestPayload, TrimStage};
//! use serde_json::json;
//!
//! let pipeline = Pipeline::new().with_stage(TrimStage::all());
//!
//! let payload = RequestPayload::new(
//!     Some(json!({ "email": " bob@example.com " })),
//!     Some(json!({ "page": " 2 " })),
//! );
//!
//! let out = pipeline.run(payload);
//! assert_eq!(out.body, Some(json!({ "email": "bob@example.com" })));
//! assert_eq!(out.query, Some(json!({ "page": "2" })));
//! ```

use crate::trim::trim_in_place;
use serde_json::Value;

/// Body and query data carried by one inbound request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestPayload {
    /// Parsed request body, if any.
    pub body: Option<Value>,
    /// Parsed query parameters, if any.
    pub query: Option<Value>,
    /// Modification counters accumulated by the stages that ran.
    pub stats: PayloadStats,
}

/// Counters describing what the pipeline changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PayloadStats {
    /// String fields rewritten in the body.
    pub body_fields: usize,
    /// String fields rewritten in the query.
    pub query_fields: usize,
}

impl PayloadStats {
    /// Total number of rewritten fields.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.body_fields + self.query_fields
    }
}

impl RequestPayload {
    /// Creates a payload with empty statistics.
    #[must_use]
    pub fn new(body: Option<Value>, query: Option<Value>) -> Self {
        Self {
            body,
            query,
            stats: PayloadStats::default(),
        }
    }

    /// A payload with neither body nor query.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

/// One step of payload processing.
///
/// A stage takes ownership of the payload and returns the payload the next
/// stage should see. Implementations must not fail: anything a stage cannot
/// handle is passed on untouched.
pub trait PayloadStage: Send + Sync {
    /// Transforms the payload.
    fn apply(&self, payload: RequestPayload) -> RequestPayload;

    /// Short name used in log output.
    fn name(&self) -> &'static str;
}

/// Stage that trims every string in mapping-typed body and query payloads.
///
/// Payloads that are absent, or present but not a mapping, are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimStage {
    body: bool,
    query: bool,
}

impl TrimStage {
    /// Trims both body and query.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            body: true,
            query: true,
        }
    }

    /// Chooses which payloads to trim.
    #[must_use]
    pub const fn new(body: bool, query: bool) -> Self {
        Self { body, query }
    }
}

impl Default for TrimStage {
    fn default() -> Self {
        Self::all()
    }
}

/// Trims `slot` if it holds a mapping and returns how many leaves changed.
///
/// The value inside the slot is owned by this payload, so it can be
/// rewritten without affecting any other holder of the original request.
fn trim_mapping(slot: &mut Option<Value>) -> usize {
    match slot {
        Some(value @ Value::Object(_)) => trim_in_place(value),
        _ => 0,
    }
}

impl PayloadStage for TrimStage {
    fn apply(&self, mut payload: RequestPayload) -> RequestPayload {
        if self.body {
            payload.stats.body_fields += trim_mapping(&mut payload.body);
        }
        if self.query {
            payload.stats.query_fields += trim_mapping(&mut payload.query);
        }
        payload
    }

    fn name(&self) -> &'static str {
        "trim"
    }
}

/// Ordered list of stages.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn PayloadStage>>,
}

impl Pipeline {
    /// Creates an empty pipeline (the identity transform).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage.
    #[must_use]
    pub fn with_stage(mut self, stage: impl PayloadStage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` if the pipeline has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage names, in execution order.
    pub fn stage_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.stages.iter().map(|stage| stage.name())
    }

    /// Runs the payload through every stage in order.
    #[must_use]
    pub fn run(&self, payload: RequestPayload) -> RequestPayload {
        self.stages
            .iter()
            .fold(payload, |payload, stage| stage.apply(payload))
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.stage_names()).finish()
    }
}
