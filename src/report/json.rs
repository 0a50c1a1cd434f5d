use serde::Serialize;

use super::{ReportContext, ReportRenderer};
use crate::error::Result;
use crate::types::{ComparisonResult, CumulativeSummary};

/// Machine-readable report carrying the same structure as the text variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

#[derive(Serialize)]
struct JsonReport<'a> {
    title: String,
    base: &'a str,
    feature: &'a str,
    generated_at: String,
    repositories: &'a [&'a ComparisonResult],
    cumulative: Option<&'a CumulativeSummary>,
}

impl ReportRenderer for JsonRenderer {
    fn render(
        &self,
        context: &ReportContext,
        results: &[&ComparisonResult],
        cumulative: Option<&CumulativeSummary>,
    ) -> Result<String> {
        let report = JsonReport {
            title: context.title(),
            base: &context.branches.base,
            feature: &context.branches.feature,
            generated_at: context.timestamp()?,
            repositories: results,
            cumulative,
        };
        let mut json = serde_json::to_string_pretty(&report)?;
        json.push('\n');
        Ok(json)
    }
}
