//! Rating command implementation.

use super::Session;
use crate::cli::RatingArgs;
use crate::error::Result;
use crate::output::Formatter;
use eventboard_domain::{EventId, SupplierId};
use std::slice;

/// Execute the rating command.
pub fn execute_rating(args: RatingArgs, session: &mut Session, formatter: &Formatter) -> Result<String> {
    let inputs = session.inputs()?;
    let event_id = EventId::new(args.event);

    match args.supplier.map(SupplierId::new) {
        Some(supplier_id) => {
            let summary = session.views().supplier_rating(&inputs, supplier_id, event_id);
            formatter.format_ratings(slice::from_ref(&*summary), inputs.snapshot())
        }
        None => {
            let summaries = session.views().supplier_ratings(&inputs, event_id);
            formatter.format_ratings(&summaries, inputs.snapshot())
        }
    }
}
