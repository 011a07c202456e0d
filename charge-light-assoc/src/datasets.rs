//! Dataset names shared by the input parsers and the output container.

/// Charge system external triggers.
pub const EXT_TRIGS: &str = "ext_trigs";
pub const EXT_TRIGS_TS: &str = "ext_trigs/ts";
pub const EXT_TRIGS_EVENT_REF: &str = "ext_trigs/event_ref";
/// Per event unix timestamps, indexed by `ext_trigs/event_ref`.
pub const EVENTS_UNIX_TS: &str = "events/unix_ts";

/// Light system events.
pub const LIGHT_EVENT: &str = "light_event";
pub const LIGHT_EVENT_TAI_NS: &str = "light_event/tai_ns";
pub const LIGHT_EVENT_UTIME_MS: &str = "light_event/utime_ms";

/// Association table written to the output.
pub const EVENT_ASSOC: &str = "event_assoc";
/// Attribute on `event_assoc` naming the charge and light datasets, in that order.
pub const ASSOC_DSET_REF: &str = "assoc_dset_ref";

/// Datasets that must be exposed by the output before association runs.
pub const REQUIRED: [&str; 5] = [
    EXT_TRIGS_TS,
    EXT_TRIGS_EVENT_REF,
    EVENTS_UNIX_TS,
    LIGHT_EVENT_TAI_NS,
    LIGHT_EVENT_UTIME_MS,
];

/// Archive entry extension used by numpy for arrays.
pub(crate) const NPY_EXT: &str = ".npy";

/// Strips the `.npy` extension from an archive entry name.
pub(crate) fn dataset_name(entry: &str) -> &str {
    entry.strip_suffix(NPY_EXT).unwrap_or(entry)
}
