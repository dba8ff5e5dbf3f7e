//! Report generation port trait.

use std::path::Path;

use crate::domain::assistant::{AssistantConfig, Assessment};
use crate::domain::error::TacticalError;

/// Port for writing an assessment (signal, backtest and enriched series).
pub trait ReportPort {
    fn write(
        &self,
        assessment: &Assessment,
        config: &AssistantConfig,
        output_path: &Path,
    ) -> Result<(), TacticalError>;
}
