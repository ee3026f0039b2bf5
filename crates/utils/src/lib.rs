#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/rewind-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod frames;
pub use frames::{
    CHANGE_COL, CONSTITUENT_COL, DATE_COL, events_from_frame, snapshot_from_frame,
    timeline_to_frame,
};

mod source;
pub use source::FrameSource;

mod error;
pub use error::UtilsError;
