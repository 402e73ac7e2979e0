//! In-progress command implementation.

use super::Session;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the in-progress command.
pub fn execute_in_progress(session: &mut Session, formatter: &Formatter) -> Result<String> {
    let inputs = session.inputs()?;
    let live = session.views().in_progress(&inputs)?;
    formatter.format_classification(&live, inputs.snapshot())
}
