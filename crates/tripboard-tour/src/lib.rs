//! Client and normalization layer for the Korea tourism data API.
//!
//! The upstream returns content-type-specific "intro" records whose field
//! names differ for the same concept across the eight content types.
//! [`normalize`] folds any of them into one [`NormalizedIntroRecord`] keyed by
//! [`CanonicalField`]; [`fetch_place_detail`] assembles the full display
//! record around it.

pub mod canonical;
pub mod client;
pub mod content_type;
pub mod detail;
pub mod display;
pub mod error;
pub mod intro;
pub mod normalize;
pub mod raw;
pub(crate) mod retry;
pub mod types;

pub use canonical::{CanonicalField, DisplayRow, NormalizedIntroRecord};
pub use client::TourApiClient;
pub use content_type::ContentType;
pub use detail::{fetch_place_detail, DetailPart, PartFailure, PlaceDetail};
pub use error::TourApiError;
pub use intro::{field_mappings, FieldMapping, IntroRecord};
pub use normalize::normalize;
pub use raw::RawIntroRecord;
pub use types::{CategoryCode, ClassificationTag, CommonInfo, CourseStepRecord};
