//! Integrity command implementation.

use super::Session;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the integrity command.
///
/// Reports duplicate identifiers plus every anomaly the costs and the
/// in-progress classification skipped.
pub fn execute_integrity(session: &mut Session, formatter: &Formatter) -> Result<String> {
    let inputs = session.inputs()?;

    let mut anomalies = (*session.views().integrity(&inputs)).clone();
    anomalies.extend(session.views().event_costs(&inputs).all_anomalies());
    if inputs.at().is_some() {
        anomalies.extend(session.views().in_progress(&inputs)?.anomalies.clone());
    }

    formatter.format_anomalies(&anomalies)
}
