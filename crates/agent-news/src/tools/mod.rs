//! News tools

pub mod article;
pub mod impact;
pub mod news;
pub mod summarize;

pub use article::GetNewsArticleTool;
pub use impact::{AnalyzeImpactTool, ImpactReport, ImpactedArea};
pub use news::GetNewsTool;
pub use summarize::{SummarizeArticleTool, summarize};
