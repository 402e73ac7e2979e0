//! Classify command implementation.

use super::Session;
use crate::cli::ClassifyArgs;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the classify command.
///
/// Without a class name, every registered class is shown.
pub fn execute_classify(args: ClassifyArgs, session: &mut Session, formatter: &Formatter) -> Result<String> {
    let inputs = session.inputs()?;

    match args.class {
        Some(name) => {
            let classification = session.views().classification(&inputs, &name)?;
            formatter.format_classification(&classification, inputs.snapshot())
        }
        None => {
            let partition = session.views().partition(&inputs)?;
            formatter.format_partition(&partition, inputs.snapshot())
        }
    }
}
