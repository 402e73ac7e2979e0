//! Costs command implementation.

use super::Session;
use crate::cli::CostsArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use eventboard_domain::EventId;

/// Execute the costs command.
pub fn execute_costs(args: CostsArgs, session: &mut Session, formatter: &Formatter) -> Result<String> {
    let inputs = session.inputs()?;
    let event = args.event.map(EventId::new);

    if let Some(id) = event {
        if !inputs.snapshot().has_event(id) {
            return Err(CliError::InvalidInput(format!("Event {} not found", id)));
        }
    }

    let costs = session.views().event_costs(&inputs);
    formatter.format_costs(&costs, inputs.snapshot(), event)
}
