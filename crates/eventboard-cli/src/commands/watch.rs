//! Watch command implementation.

use super::Session;
use crate::cli::WatchArgs;
use crate::error::Result;
use crate::output::{format_instant, Formatter};
use eventboard_views::{DashboardViews, RefreshWorker, ViewInputs};

/// Render one dashboard frame.
pub fn render_frame(views: &mut DashboardViews, inputs: &ViewInputs, formatter: &Formatter) -> Result<String> {
    let live = views.in_progress(inputs)?;
    let costs = views.event_costs(inputs);

    let mut frame = Vec::new();
    if let Some(at) = inputs.at() {
        frame.push(formatter.info(&format!("Dashboard at {}", format_instant(at))));
    }
    frame.push(formatter.format_classification(&live, inputs.snapshot())?);
    frame.push(formatter.format_costs(&costs, inputs.snapshot(), None)?);
    Ok(frame.join("\n\n"))
}

/// Execute the watch command.
///
/// Runs until Ctrl+C, or for `--cycles` refreshes.
pub async fn execute_watch(args: WatchArgs, session: Session, formatter: &Formatter) -> Result<()> {
    let (views, source, clock) = session.into_parts();
    let mut worker = RefreshWorker::with_views(views, source, clock);

    let on_tick = |views: &mut DashboardViews, inputs: &ViewInputs| {
        match render_frame(views, inputs, formatter) {
            Ok(frame) => println!("{}\n", frame),
            Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
        }
    };

    match args.cycles {
        Some(cycles) => worker.run_cycles(cycles, on_tick).await?,
        None => worker.run(on_tick).await?,
    }

    Ok(())
}
