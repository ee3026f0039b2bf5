//! # rewind
//!
//! Point-in-time index constituent reconstruction.
//!
//! This crate provides a unified interface to the rewind ecosystem.
//! Individual components can be enabled via feature flags.
//!
//! ## Features
//!
//! - `full` (default): Enables all components
//! - `primitives`: Core type definitions
//! - `traits`: Data source abstractions
//! - `timeline`: Membership reconstruction
//! - `utils`: Polars adapters
//! - `cli`: The `reconstruct` binary
//!
//! ## Example
//!
//! ```rust,ignore
//! use rewind::primitives::{ChangeEvent, Date, InstrumentId, MembershipSnapshot};
//! use rewind::timeline::reconstruct;
//!
//! let current: MembershipSnapshot = ["B.N", "C.N", "D.N"].into_iter().map(InstrumentId::from).collect();
//! let events = vec![ChangeEvent::joiner(Date::from_ymd_opt(2024, 2, 15).unwrap(), "D.N")];
//! let timeline = reconstruct(&current, &events, Date::from_ymd_opt(2024, 2, 29).unwrap(), 13)?;
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use rewind_primitives as primitives;
#[cfg(feature = "traits")]
#[doc(inline)]
pub use rewind_traits as traits;
#[cfg(feature = "timeline")]
#[doc(inline)]
pub use rewind_timeline as timeline;
#[cfg(feature = "utils")]
#[doc(inline)]
pub use rewind_utils as utils;
