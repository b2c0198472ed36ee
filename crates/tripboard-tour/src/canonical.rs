//! Canonical intro fields and the unified record built from them.
//!
//! The camelCase names are a stable protocol: the display layer keys its
//! label table on them, so renaming one is a breaking change.

use std::collections::BTreeMap;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Declares [`CanonicalField`] with its wire name and Korean display label.
///
/// Declaration order is canonical order: it drives iteration, serialization
/// and display-row ordering.
macro_rules! canonical_fields {
    ($($variant:ident => $name:literal, $label:literal;)+) => {
        /// A content-type-independent intro field.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum CanonicalField {
            $($variant,)+
        }

        impl CanonicalField {
            /// Every canonical field, in canonical order.
            pub const ALL: &'static [CanonicalField] = &[$(CanonicalField::$variant,)+];

            /// The camelCase wire name.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(CanonicalField::$variant => $name,)+
                }
            }

            /// Korean label shown next to the value.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(CanonicalField::$variant => $label,)+
                }
            }
        }
    };
}

canonical_fields! {
    // Shared across content types.
    UsageTime => "usageTime", "이용시간";
    RestDate => "restDate", "쉬는날";
    InfoCenter => "infoCenter", "문의 및 안내";
    Capacity => "capacity", "수용인원";
    ParkingFacility => "parkingFacility", "주차시설";
    ParkingFee => "parkingFee", "주차요금";
    CreditCardAccepted => "creditCardAccepted", "신용카드 가능 여부";
    StrollerRental => "strollerRental", "유모차 대여 여부";
    PetFriendly => "petFriendly", "반려동물 동반 가능 여부";
    AgeLimit => "ageLimit", "이용 가능 연령";
    Scale => "scale", "규모";
    DiscountInfo => "discountInfo", "할인정보";
    ReservationInfo => "reservationInfo", "예약안내";
    EntranceFee => "entranceFee", "이용요금";
    OpenDate => "openDate", "개장일";
    SpendTime => "spendTime", "소요시간";
    // Attraction.
    UseSeason => "useSeason", "이용시기";
    ExperienceGuide => "experienceGuide", "체험안내";
    Heritage1 => "heritage1", "세계문화유산 유무";
    Heritage2 => "heritage2", "세계자연유산 유무";
    Heritage3 => "heritage3", "세계기록유산 유무";
    // Recreation.
    OpenPeriod => "openPeriod", "개장기간";
    // Event.
    EventPlace => "eventPlace", "행사장소";
    EventProgram => "eventProgram", "행사 프로그램";
    Sponsor1 => "sponsor1", "주최자 정보";
    Sponsor1Tel => "sponsor1Tel", "주최자 연락처";
    Sponsor2 => "sponsor2", "주관사 정보";
    Sponsor2Tel => "sponsor2Tel", "주관사 연락처";
    EventStartDate => "eventStartDate", "행사 시작일";
    EventEndDate => "eventEndDate", "행사 종료일";
    FestivalGrade => "festivalGrade", "축제 등급";
    EventLocationInfo => "eventLocationInfo", "행사장 위치안내";
    SubEvent => "subEvent", "부대행사";
    BookingPlace => "bookingPlace", "예매처";
    EventHomepage => "eventHomepage", "행사 홈페이지";
    // Course.
    CourseDistance => "courseDistance", "코스 총거리";
    CourseSchedule => "courseSchedule", "코스 일정";
    CourseTheme => "courseTheme", "코스 테마";
    // Accommodation.
    CheckinTime => "checkinTime", "입실 시간";
    CheckoutTime => "checkoutTime", "퇴실 시간";
    RoomCount => "roomCount", "객실 수";
    RoomType => "roomType", "객실 유형";
    ReservationUrl => "reservationUrl", "예약 안내 홈페이지";
    RefundRegulation => "refundRegulation", "환불 규정";
    PickupService => "pickupService", "픽업 서비스";
    CookingAllowed => "cookingAllowed", "객실 내 취사 여부";
    FoodPlace => "foodPlace", "식음료장";
    Amenities => "amenities", "부대시설";
    Barbecue => "barbecue", "바비큐장";
    Beauty => "beauty", "뷰티시설";
    Beverage => "beverage", "식음료장 여부";
    Bicycle => "bicycle", "자전거 대여";
    Campfire => "campfire", "캠프파이어";
    Fitness => "fitness", "휘트니스 센터";
    Karaoke => "karaoke", "노래방";
    PublicBath => "publicBath", "공용 샤워실";
    PublicPc => "publicPc", "공용 PC실";
    Sauna => "sauna", "사우나실";
    Seminar => "seminar", "세미나실";
    Sports => "sports", "스포츠 시설";
    BenikiaCertified => "benikiaCertified", "베니키아 여부";
    GoodStayCertified => "goodStayCertified", "굿스테이 여부";
    HanokCertified => "hanokCertified", "한옥 여부";
    // Shopping.
    SaleItems => "saleItems", "판매 품목";
    SaleItemCost => "saleItemCost", "판매 품목별 가격";
    ShopGuide => "shopGuide", "매장 안내";
    CultureCenterLink => "cultureCenterLink", "문화센터 바로가기";
    MarketFairDay => "marketFairDay", "장서는 날";
    RestroomInfo => "restroomInfo", "화장실 설명";
    // Restaurant.
    FirstMenu => "firstMenu", "대표 메뉴";
    MainTreatMenu => "mainTreatMenu", "취급 메뉴";
    LicenseNo => "licenseNo", "인허가번호";
    SeatCount => "seatCount", "좌석수";
    SmokingAllowed => "smokingAllowed", "금연/흡연 여부";
    PackagingAvailable => "packagingAvailable", "포장 가능";
    KidsFacility => "kidsFacility", "어린이 놀이방 여부";
}

impl CanonicalField {
    /// Looks up a field by its camelCase wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_str() == name)
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CanonicalField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CanonicalField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::from_name(&name)
            .ok_or_else(|| de::Error::custom(format!("unknown canonical field '{name}'")))
    }
}

/// The unified intro record.
///
/// A field is either absent (not declared by the content type's mapping) or
/// present. Present fields whose source was missing hold `""`, never a
/// placeholder, so consumers test "non-blank" without a separate absence
/// check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedIntroRecord {
    fields: BTreeMap<CanonicalField, String>,
}

/// One labelled row for the display layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub field: CanonicalField,
    pub label: &'static str,
    pub value: String,
}

impl NormalizedIntroRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a declared slot, substituting `""` for a missing source value.
    pub(crate) fn fill(&mut self, field: CanonicalField, value: Option<String>) {
        self.fields.insert(field, value.unwrap_or_default());
    }

    #[must_use]
    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: CanonicalField) -> bool {
        self.fields.contains_key(&field)
    }

    /// Number of populated slots (including `""` ones).
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Populated slots in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> + '_ {
        self.fields.iter().map(|(f, v)| (*f, v.as_str()))
    }

    /// Rows worth rendering: values that are non-empty after trimming.
    #[must_use]
    pub fn display_rows(&self) -> Vec<DisplayRow> {
        self.iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(field, value)| DisplayRow {
                field,
                label: field.label(),
                value: value.to_string(),
            })
            .collect()
    }
}

impl Serialize for NormalizedIntroRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, value) in &self.fields {
            map.serialize_entry(field.as_str(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NormalizedIntroRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Option<String>>::deserialize(deserializer)?;
        let mut fields = BTreeMap::new();
        for (name, value) in raw {
            let field = CanonicalField::from_name(&name)
                .ok_or_else(|| de::Error::custom(format!("unknown canonical field '{name}'")))?;
            // `null` means the slot was never declared.
            if let Some(value) = value {
                fields.insert(field, value);
            }
        }
        Ok(Self { fields })
    }
}
