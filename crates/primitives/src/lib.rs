#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/rewind-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod instrument;
pub use instrument::{IndexCode, InstrumentId};

mod event;
pub use event::{ChangeEvent, ChangeKind, InvalidEventKind};

mod calendar;
pub use calendar::{fetch_window, month_end, previous_month_end};

mod state;
pub use state::{MembershipSnapshot, MonthlyState, Timeline, WindowChanges};

/// Re-export common date type.
pub type Date = chrono::NaiveDate;
