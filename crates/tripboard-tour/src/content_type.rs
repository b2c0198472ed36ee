use serde::{Deserialize, Serialize};

/// The eight content types the tourism API classifies places into.
///
/// Each one carries its own intro schema. The wire identifier is the numeric
/// code returned by [`ContentType::code`]; anything else is an unknown type
/// and is handled by the caller, not rejected here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Attraction,
    CultureFacility,
    Event,
    Course,
    Recreation,
    Accommodation,
    Shopping,
    Restaurant,
}

impl ContentType {
    pub const ALL: [ContentType; 8] = [
        ContentType::Attraction,
        ContentType::CultureFacility,
        ContentType::Event,
        ContentType::Course,
        ContentType::Recreation,
        ContentType::Accommodation,
        ContentType::Shopping,
        ContentType::Restaurant,
    ];

    /// The upstream `contentTypeId` for this type.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            ContentType::Attraction => "12",
            ContentType::CultureFacility => "14",
            ContentType::Event => "15",
            ContentType::Course => "25",
            ContentType::Recreation => "28",
            ContentType::Accommodation => "32",
            ContentType::Shopping => "38",
            ContentType::Restaurant => "39",
        }
    }

    /// Korean display name used by the upstream catalogue.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ContentType::Attraction => "관광지",
            ContentType::CultureFacility => "문화시설",
            ContentType::Event => "축제공연행사",
            ContentType::Course => "여행코스",
            ContentType::Recreation => "레포츠",
            ContentType::Accommodation => "숙박",
            ContentType::Shopping => "쇼핑",
            ContentType::Restaurant => "음식점",
        }
    }

    /// Resolves an upstream `contentTypeId`. Surrounding whitespace is ignored.
    ///
    /// Returns `None` for codes outside the known set.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL.into_iter().find(|ct| ct.code() == code)
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ContentType::Attraction => "attraction",
            ContentType::CultureFacility => "culture_facility",
            ContentType::Event => "event",
            ContentType::Course => "course",
            ContentType::Recreation => "recreation",
            ContentType::Accommodation => "accommodation",
            ContentType::Shopping => "shopping",
            ContentType::Restaurant => "restaurant",
        };
        write!(f, "{name}")
    }
}
