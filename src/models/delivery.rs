use std::fmt::{Display, Formatter, Result};

use serde::Serialize;

/// Where a single recipient's delivery stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStage {
    UserLookup,
    DirectChannel,
    Post,
}

impl Display for DeliveryStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            DeliveryStage::UserLookup => write!(f, "user_lookup"),
            DeliveryStage::DirectChannel => write!(f, "direct_channel"),
            DeliveryStage::Post => write!(f, "post"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DeliveryOutcome {
    Delivered { post_id: String },
    Skipped { stage: DeliveryStage, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryResult {
    pub username: String,

    #[serde(flatten)]
    pub outcome: DeliveryOutcome,
}

impl DeliveryResult {
    pub fn delivered(username: String, post_id: String) -> Self {
        Self {
            username,
            outcome: DeliveryOutcome::Delivered { post_id },
        }
    }

    pub fn skipped(username: String, stage: DeliveryStage, reason: String) -> Self {
        Self {
            username,
            outcome: DeliveryOutcome::Skipped { stage, reason },
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self.outcome, DeliveryOutcome::Delivered { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub results: Vec<DeliveryResult>,
}

impl DispatchReport {
    pub fn delivered(&self) -> usize {
        self.results.iter().filter(|r| r.is_delivered()).count()
    }

    pub fn skipped(&self) -> usize {
        self.results.len() - self.delivered()
    }

    pub fn result_for(&self, username: &str) -> Option<&DeliveryResult> {
        self.results.iter().find(|r| r.username == username)
    }
}

/// Summary of one webhook delivery, returned to the caller and logged.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingReport {
    pub trace_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignored_reason: Option<String>,

    pub recipients: Vec<String>,
    pub delivered: usize,
    pub skipped: usize,
    pub results: Vec<DeliveryResult>,
}

impl ProcessingReport {
    pub fn ignored(trace_id: String, kind: Option<String>, reason: String) -> Self {
        Self {
            trace_id,
            kind,
            ignored_reason: Some(reason),
            recipients: Vec::new(),
            delivered: 0,
            skipped: 0,
            results: Vec::new(),
        }
    }

    pub fn completed(
        trace_id: String,
        kind: String,
        recipients: Vec<String>,
        report: DispatchReport,
    ) -> Self {
        Self {
            trace_id,
            kind: Some(kind),
            ignored_reason: None,
            recipients,
            delivered: report.delivered(),
            skipped: report.skipped(),
            results: report.results,
        }
    }
}
