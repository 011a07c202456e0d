use std::path::PathBuf;

use log::info;

use crate::assoc_tools::range::{span, IndexRange};
use crate::assoc_tools::{associate, AssocParams};
use crate::datasets::{EXT_TRIGS, LIGHT_EVENT, REQUIRED};
use crate::errors::Error;
use crate::output::{ContainerWriter, Layout, OutputStrategy};
use crate::parsers::charge::charge_timestamps;
use crate::parsers::light::light_timestamps;
use crate::Timestamps;

/// Everything needed for one association run.
#[derive(Debug, Clone)]
pub struct RunParams {
    pub light_event_filename: PathBuf,
    pub charge_event_filename: PathBuf,
    /// Must not exist yet.
    pub output_filename: PathBuf,
    pub strategy: OutputStrategy,
    pub assoc: AssocParams,
}

/// What a run found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub light_events: usize,
    pub charge_events: usize,
    pub light_range: Option<IndexRange>,
    pub charge_range: Option<IndexRange>,
    pub n_matches: usize,
}

/// Links (or copies) both event files into a new output archive and adds the
/// association table between the charge external triggers and the light events.
///
/// The output is only written once everything succeeded. Zero matches is not an
/// error: the output then holds the source datasets but no `event_assoc`.
pub fn run(params: &RunParams) -> Result<RunSummary, Error> {
    let output = params.output_filename.as_path();
    if output.exists() {
        return Err(Error::OutputExists(output.display().to_string()));
    }
    params.assoc.validate()?;

    let mut layout = Layout::from_sources(&[
        params.light_event_filename.as_path(),
        params.charge_event_filename.as_path(),
    ])?;
    layout.require(&REQUIRED)?;

    let mut container = ContainerWriter::create(output, params.strategy)?;
    params.strategy.stage(&layout, &mut container)?;

    info!("fetching timestamps...");
    let light = light_timestamps(&mut layout)?;
    let charge = charge_timestamps(&mut layout)?;
    log_stream("light", &light);
    log_stream("charge", &charge);

    let association = associate(&charge, &light, &params.assoc)?;
    let n_matches = association.table.len();
    if n_matches > 0 {
        container.write_association(&association.table, EXT_TRIGS, LIGHT_EVENT)?;
    }
    container.persist(output)?;
    info!("matched {} events", n_matches);

    Ok(RunSummary {
        light_events: light.len(),
        charge_events: charge.len(),
        light_range: association.light_range,
        charge_range: association.charge_range,
        n_matches,
    })
}

fn log_stream(label: &str, ts: &Timestamps) {
    match span(ts.coarse()) {
        Some((start, end)) => info!(
            "{} data: {} events, unix time {} to {}",
            label,
            ts.len(),
            start,
            end
        ),
        None => info!("{} data: no events", label),
    }
}
