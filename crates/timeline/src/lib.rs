#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/rewind-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod rewind;
pub use rewind::reconstruct;

mod reconstructor;
pub use reconstructor::Reconstructor;

mod config;
pub use config::{MissingJoinerPolicy, ReconstructionConfig};

mod error;
pub use error::TimelineError;

/// Re-export commonly used types.
pub mod prelude {
    pub use rewind_primitives::{ChangeEvent, ChangeKind, Date, MembershipSnapshot, Timeline};
    pub use rewind_traits::MembershipSource;

    pub use super::{ReconstructionConfig, Reconstructor, TimelineError, reconstruct};
}
