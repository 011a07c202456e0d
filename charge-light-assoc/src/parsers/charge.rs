use std::convert::TryFrom;

use ndarray::Array1;

use crate::datasets::{EVENTS_UNIX_TS, EXT_TRIGS_EVENT_REF, EXT_TRIGS_TS};
use crate::errors::Error;
use crate::parsers::to_1d;
use crate::{DatasetSource, Timestamps};

/// Reads the charge external trigger stream.
///
/// Triggers carry only a fine timestamp. The coarse unix timestamp belongs to the
/// event each trigger was recorded in and is looked up through `event_ref`.
pub fn charge_timestamps<S: DatasetSource + ?Sized>(source: &mut S) -> Result<Timestamps, Error> {
    let fine = to_1d(EXT_TRIGS_TS, source.read_ints(EXT_TRIGS_TS)?)?;
    let event_ref = to_1d(EXT_TRIGS_EVENT_REF, source.read_ints(EXT_TRIGS_EVENT_REF)?)?;
    let unix_ts = to_1d(EVENTS_UNIX_TS, source.read_ints(EVENTS_UNIX_TS)?)?;

    if event_ref.len() != fine.len() {
        return Err(Error::InvalidShape(format!(
            "{} has {} entries but {} has {}",
            EXT_TRIGS_TS,
            fine.len(),
            EXT_TRIGS_EVENT_REF,
            event_ref.len()
        )));
    }

    let coarse = event_ref
        .iter()
        .enumerate()
        .map(|(trig, &r)| {
            usize::try_from(r)
                .ok()
                .and_then(|idx| unix_ts.get(idx).copied())
                .ok_or_else(|| {
                    Error::InvalidReference(format!(
                        "trigger {} refers to event {} but {} has {} entries",
                        trig,
                        r,
                        EVENTS_UNIX_TS,
                        unix_ts.len()
                    ))
                })
        })
        .collect::<Result<Array1<i64>, Error>>()?;

    Timestamps::new(coarse, fine)
}
