// ABOUTME: Value records exchanged between the HTTP surface, the prompt builder, and the normalizer.
// ABOUTME: Also defines the Validate trait that enforces numeric and cardinality invariants after parsing.

use serde::{Deserialize, Serialize};

/// An operational problem identified in a company description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemRecord {
    pub title: String,
    pub description: String,
    pub impact: String,
    pub cost_per_month: f64,
}

/// A proposed AI agent targeting one problem. `target_problem` holds the
/// title of a [`ProblemRecord`] by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub name: String,
    pub description: String,
    pub capabilities: Vec<String>,
    pub target_problem: String,
}

/// One before/after comparison in an impact simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub metric_name: String,
    pub before: String,
    pub after: String,
    pub improvement_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub problems: Vec<ProblemRecord>,
    pub company_summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentGenerationResult {
    pub agents: Vec<AgentRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub metrics: Vec<MetricRecord>,
    pub total_monthly_savings: f64,
    pub roi_description: String,
}

/// Request body for `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub description: String,
    #[serde(default)]
    pub file_contents: Vec<String>,
}

impl AnalyzeRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            file_contents: Vec::new(),
        }
    }
}

/// Request body for `POST /simulate`. Both sequences default to empty when
/// the caller omits them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulateRequest {
    #[serde(default)]
    pub problems: Vec<ProblemRecord>,
    #[serde(default)]
    pub agents: Vec<AgentRecord>,
}

/// Public company facts returned by the enrichment lookup. Every field is
/// optional; absent fields are left out when serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyFacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CompanyFacts {
    /// True when no field carries data.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.website.is_none()
            && self.industry.is_none()
            && self.employee_count.is_none()
            && self.revenue.is_none()
            && self.description.is_none()
    }
}

/// Invariants that serde's structural checks cannot express. Run by the
/// normalizer after a successful coercion; an `Err` rejects the whole result.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

fn non_negative(field: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() {
        return Err(format!("{} must be a finite number", field));
    }
    if value < 0.0 {
        return Err(format!("{} must not be negative (got {})", field, value));
    }
    Ok(())
}

impl Validate for ProblemRecord {
    fn validate(&self) -> Result<(), String> {
        non_negative("cost_per_month", self.cost_per_month)
            .map_err(|e| format!("problem '{}': {}", self.title, e))
    }
}

impl Validate for AgentRecord {
    fn validate(&self) -> Result<(), String> {
        if self.capabilities.is_empty() {
            return Err(format!("agent '{}' has no capabilities", self.name));
        }
        Ok(())
    }
}

impl Validate for MetricRecord {
    fn validate(&self) -> Result<(), String> {
        // Negative values and values above 100 are legitimate.
        if !self.improvement_percent.is_finite() {
            return Err(format!(
                "metric '{}': improvement_percent must be a finite number",
                self.metric_name
            ));
        }
        Ok(())
    }
}

impl Validate for AnalysisResult {
    fn validate(&self) -> Result<(), String> {
        self.problems.iter().try_for_each(Validate::validate)
    }
}

impl Validate for AgentGenerationResult {
    fn validate(&self) -> Result<(), String> {
        self.agents.iter().try_for_each(Validate::validate)
    }
}

impl Validate for SimulationResult {
    fn validate(&self) -> Result<(), String> {
        self.metrics.iter().try_for_each(Validate::validate)?;
        non_negative("total_monthly_savings", self.total_monthly_savings)
    }
}
