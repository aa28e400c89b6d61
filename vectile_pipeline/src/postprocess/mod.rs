//! Layer post-processors (§4.4): cross-feature operations over one or more
//! [`FeatureLayer`](crate::feature::FeatureLayer)s.

mod boundaries;
mod cutter;
mod dedupe;
mod filters;
mod intercut;
mod label;

pub use boundaries::{admin_boundaries, exterior_boundaries};
pub use cutter::{cut_feature, cut_feature_opts, dimensionality, CutterBucket, IntersectFunc};
pub use dedupe::{normalize_and_merge_duplicate_stations, remove_duplicate_features};
pub use filters::{drop_features_where, keep_n_features, numeric_min_filter, rank_features};
pub use intercut::{intercut, intracut, overlap};
pub use label::{generate_address_points, generate_label_features};
