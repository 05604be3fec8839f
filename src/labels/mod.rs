//! Label taxonomy: parsing raw labels and keeping the remote label set canonical.

pub mod codec;
pub mod sync;

pub use codec::{ClassifiedLabel, LabelSpec, build_label, canonical_labels, parse_label};
pub use sync::{LabelSynchronizer, SyncAction, SyncReport, plan_sync};
