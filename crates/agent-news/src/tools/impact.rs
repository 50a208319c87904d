//! Business impact reports

use agent_tools::{ParameterSpec, Result, Tool, ToolDescriptor, ToolError, ValueType};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

/// One business area affected by a news event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactedArea {
    pub area_name: String,
    pub impact_level: String,
    pub summary: String,
}

/// A filed impact report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactReport {
    pub report_id: Uuid,
    pub status: String,
    pub impacted_areas: Vec<ImpactedArea>,
}

impl ImpactReport {
    /// File a report under a fresh id
    pub fn create(impacted_areas: Vec<ImpactedArea>) -> Self {
        Self {
            report_id: Uuid::new_v4(),
            status: "created".to_string(),
            impacted_areas,
        }
    }
}

/// Files a business impact report for a list of affected areas
pub struct AnalyzeImpactTool {
    descriptor: ToolDescriptor,
}

impl Default for AnalyzeImpactTool {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyzeImpactTool {
    pub fn new() -> Self {
        Self {
            descriptor: ToolDescriptor::new(
                "analyze_impact",
                "Creates a business impact report from the areas a news event affects.",
            )
            .param(ParameterSpec::required(
                "impacted_areas",
                ValueType::Array,
                "Affected areas, each with area_name, impact_level and summary",
            ))
            .returns(ValueType::String),
        }
    }
}

#[async_trait]
impl Tool for AnalyzeImpactTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<Value> {
        let raw = args.get("impacted_areas").cloned().unwrap_or_default();
        let areas: Vec<ImpactedArea> = serde_json::from_value(raw)
            .map_err(|e| ToolError::invalid(&self.descriptor.name, e.to_string()))?;

        let report = ImpactReport::create(areas);
        info!(report_id = %report.report_id, areas = report.impacted_areas.len(), "impact report created");

        let body = serde_json::to_string(&report)
            .map_err(|e| ToolError::execution(&self.descriptor.name, e.to_string()))?;
        Ok(Value::String(format!("Report {body} has been created")))
    }
}
