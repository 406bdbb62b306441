#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Cascading filter and aggregation engine.
//!
//! Every function here is a pure function of a [`Dataset`] and a
//! [`FilterState`] snapshot:
//!
//! * [`options`] derives the option lists for each filter widget, with the
//!   country list narrowed by the selected regions.
//! * [`filter`] applies every active predicate to produce the matching
//!   subset in dataset order.
//! * [`aggregate`] reduces a subset to [`Statistics`].
//! * [`dashboard`] chains the three into one recomputation pass and owns
//!   the current state between edits.
//!
//! There is no error type: the engine is total over well-formed input and
//! normalizes out-of-range year selections instead of rejecting them.
//!
//! [`Dataset`]: terror_map_incident_models::Dataset
//! [`FilterState`]: terror_map_filter_models::FilterState
//! [`Statistics`]: terror_map_filter_models::Statistics

pub mod aggregate;
pub mod dashboard;
pub mod filter;
pub mod options;
