//! Typed intro schemas, one per content type.
//!
//! Each struct's fields are exactly the upstream source names for that content
//! type. Every `into_normalized` destructures its struct without `..`, so a
//! source field added to a struct fails to compile until it is mapped.

use serde::{Deserialize, Serialize};

use crate::canonical::CanonicalField as F;
use crate::canonical::{CanonicalField, NormalizedIntroRecord};
use crate::content_type::ContentType;
use crate::raw::RawIntroRecord;

/// Intro schema for attractions (`12`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttractionIntro {
    pub accomcount: Option<String>,
    pub chkbabycarriage: Option<String>,
    pub chkcreditcard: Option<String>,
    pub chkpet: Option<String>,
    pub expagerange: Option<String>,
    pub expguide: Option<String>,
    pub heritage1: Option<String>,
    pub heritage2: Option<String>,
    pub heritage3: Option<String>,
    pub infocenter: Option<String>,
    pub opendate: Option<String>,
    pub parking: Option<String>,
    pub restdate: Option<String>,
    pub useseason: Option<String>,
    pub usetime: Option<String>,
}

/// Intro schema for culture facilities (`14`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CultureIntro {
    pub accomcountculture: Option<String>,
    pub chkbabycarriageculture: Option<String>,
    pub chkcreditcardculture: Option<String>,
    pub chkpetculture: Option<String>,
    pub discountinfo: Option<String>,
    pub infocenterculture: Option<String>,
    pub parkingculture: Option<String>,
    pub parkingfee: Option<String>,
    pub restdateculture: Option<String>,
    pub usefee: Option<String>,
    pub usetimeculture: Option<String>,
    pub scale: Option<String>,
    pub spendtime: Option<String>,
}

/// Intro schema for events, festivals and performances (`15`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventIntro {
    pub agelimit: Option<String>,
    pub bookingplace: Option<String>,
    pub discountinfofestival: Option<String>,
    pub eventenddate: Option<String>,
    pub eventhomepage: Option<String>,
    pub eventplace: Option<String>,
    pub eventstartdate: Option<String>,
    pub festivalgrade: Option<String>,
    pub placeinfo: Option<String>,
    pub playtime: Option<String>,
    pub program: Option<String>,
    pub spendtimefestival: Option<String>,
    pub sponsor1: Option<String>,
    pub sponsor1tel: Option<String>,
    pub sponsor2: Option<String>,
    pub sponsor2tel: Option<String>,
    pub subevent: Option<String>,
    /// Despite the name, the upstream puts the admission fee here.
    pub usetimefestival: Option<String>,
}

/// Intro schema for travel courses (`25`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseIntro {
    pub distance: Option<String>,
    pub infocentertourcourse: Option<String>,
    pub schedule: Option<String>,
    pub taketime: Option<String>,
    pub theme: Option<String>,
}

/// Intro schema for recreation and leisure sports (`28`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecreationIntro {
    pub accomcountleports: Option<String>,
    pub chkbabycarriageleports: Option<String>,
    pub chkcreditcardleports: Option<String>,
    pub chkpetleports: Option<String>,
    pub expagerangeleports: Option<String>,
    pub infocenterleports: Option<String>,
    pub openperiod: Option<String>,
    pub parkingfeeleports: Option<String>,
    pub parkingleports: Option<String>,
    pub reservation: Option<String>,
    pub restdateleports: Option<String>,
    pub scaleleports: Option<String>,
    pub usefeeleports: Option<String>,
    pub usetimeleports: Option<String>,
}

/// Intro schema for accommodation (`32`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccommodationIntro {
    pub accomcountlodging: Option<String>,
    pub benikia: Option<String>,
    pub checkintime: Option<String>,
    pub checkouttime: Option<String>,
    pub chkcooking: Option<String>,
    pub foodplace: Option<String>,
    pub goodstay: Option<String>,
    pub hanok: Option<String>,
    pub infocenterlodging: Option<String>,
    pub parkinglodging: Option<String>,
    pub pickup: Option<String>,
    pub roomcount: Option<String>,
    pub reservationlodging: Option<String>,
    pub reservationurl: Option<String>,
    pub roomtype: Option<String>,
    pub scalelodging: Option<String>,
    pub subfacility: Option<String>,
    pub barbecue: Option<String>,
    pub beauty: Option<String>,
    pub beverage: Option<String>,
    pub bicycle: Option<String>,
    pub campfire: Option<String>,
    pub fitness: Option<String>,
    pub karaoke: Option<String>,
    pub publicbath: Option<String>,
    pub publicpc: Option<String>,
    pub sauna: Option<String>,
    pub seminar: Option<String>,
    pub sports: Option<String>,
    pub refundregulation: Option<String>,
}

/// Intro schema for shopping (`38`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShoppingIntro {
    pub chkbabycarriageshopping: Option<String>,
    pub chkcreditcardshopping: Option<String>,
    pub chkpetshopping: Option<String>,
    pub culturecenter: Option<String>,
    pub fairday: Option<String>,
    pub infocentershopping: Option<String>,
    pub opendateshopping: Option<String>,
    pub opentime: Option<String>,
    pub parkingshopping: Option<String>,
    pub restdateshopping: Option<String>,
    pub restroom: Option<String>,
    pub saleitem: Option<String>,
    pub saleitemcost: Option<String>,
    pub scaleshopping: Option<String>,
    pub shopguide: Option<String>,
}

/// Intro schema for restaurants (`39`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestaurantIntro {
    pub chkcreditcardfood: Option<String>,
    pub discountinfofood: Option<String>,
    pub firstmenu: Option<String>,
    pub infocenterfood: Option<String>,
    pub kidsfacility: Option<String>,
    pub opendatefood: Option<String>,
    pub opentimefood: Option<String>,
    pub packing: Option<String>,
    pub parkingfood: Option<String>,
    pub reservationfood: Option<String>,
    pub restdatefood: Option<String>,
    pub scalefood: Option<String>,
    pub seat: Option<String>,
    pub smoking: Option<String>,
    pub treatmenu: Option<String>,
    pub lcnsno: Option<String>,
}

impl AttractionIntro {
    fn into_normalized(self) -> NormalizedIntroRecord {
        let Self {
            accomcount,
            chkbabycarriage,
            chkcreditcard,
            chkpet,
            expagerange,
            expguide,
            heritage1,
            heritage2,
            heritage3,
            infocenter,
            opendate,
            parking,
            restdate,
            useseason,
            usetime,
        } = self;

        let mut out = NormalizedIntroRecord::new();
        out.fill(F::Capacity, accomcount);
        out.fill(F::StrollerRental, chkbabycarriage);
        out.fill(F::CreditCardAccepted, chkcreditcard);
        out.fill(F::PetFriendly, chkpet);
        out.fill(F::AgeLimit, expagerange);
        out.fill(F::ExperienceGuide, expguide);
        out.fill(F::Heritage1, heritage1);
        out.fill(F::Heritage2, heritage2);
        out.fill(F::Heritage3, heritage3);
        out.fill(F::InfoCenter, infocenter);
        out.fill(F::OpenDate, opendate);
        out.fill(F::ParkingFacility, parking);
        out.fill(F::RestDate, restdate);
        out.fill(F::UseSeason, useseason);
        out.fill(F::UsageTime, usetime);
        out
    }
}

impl CultureIntro {
    fn into_normalized(self) -> NormalizedIntroRecord {
        let Self {
            accomcountculture,
            chkbabycarriageculture,
            chkcreditcardculture,
            chkpetculture,
            discountinfo,
            infocenterculture,
            parkingculture,
            parkingfee,
            restdateculture,
            usefee,
            usetimeculture,
            scale,
            spendtime,
        } = self;

        let mut out = NormalizedIntroRecord::new();
        out.fill(F::Capacity, accomcountculture);
        out.fill(F::StrollerRental, chkbabycarriageculture);
        out.fill(F::CreditCardAccepted, chkcreditcardculture);
        out.fill(F::PetFriendly, chkpetculture);
        out.fill(F::DiscountInfo, discountinfo);
        out.fill(F::InfoCenter, infocenterculture);
        out.fill(F::ParkingFacility, parkingculture);
        out.fill(F::ParkingFee, parkingfee);
        out.fill(F::RestDate, restdateculture);
        out.fill(F::EntranceFee, usefee);
        out.fill(F::UsageTime, usetimeculture);
        out.fill(F::Scale, scale);
        out.fill(F::SpendTime, spendtime);
        out
    }
}

impl EventIntro {
    fn into_normalized(self) -> NormalizedIntroRecord {
        let Self {
            agelimit,
            bookingplace,
            discountinfofestival,
            eventenddate,
            eventhomepage,
            eventplace,
            eventstartdate,
            festivalgrade,
            placeinfo,
            playtime,
            program,
            spendtimefestival,
            sponsor1,
            sponsor1tel,
            sponsor2,
            sponsor2tel,
            subevent,
            usetimefestival,
        } = self;

        let mut out = NormalizedIntroRecord::new();
        out.fill(F::AgeLimit, agelimit);
        out.fill(F::BookingPlace, bookingplace);
        out.fill(F::DiscountInfo, discountinfofestival);
        out.fill(F::EventEndDate, eventenddate);
        out.fill(F::EventHomepage, eventhomepage);
        out.fill(F::EventPlace, eventplace);
        out.fill(F::EventStartDate, eventstartdate);
        out.fill(F::FestivalGrade, festivalgrade);
        out.fill(F::EventLocationInfo, placeinfo);
        out.fill(F::UsageTime, playtime);
        out.fill(F::EventProgram, program);
        out.fill(F::SpendTime, spendtimefestival);
        out.fill(F::Sponsor1, sponsor1);
        out.fill(F::Sponsor1Tel, sponsor1tel);
        out.fill(F::Sponsor2, sponsor2);
        out.fill(F::Sponsor2Tel, sponsor2tel);
        out.fill(F::SubEvent, subevent);
        out.fill(F::EntranceFee, usetimefestival);
        out
    }
}

impl CourseIntro {
    fn into_normalized(self) -> NormalizedIntroRecord {
        let Self {
            distance,
            infocentertourcourse,
            schedule,
            taketime,
            theme,
        } = self;

        let mut out = NormalizedIntroRecord::new();
        out.fill(F::CourseDistance, distance);
        out.fill(F::InfoCenter, infocentertourcourse);
        out.fill(F::CourseSchedule, schedule);
        out.fill(F::SpendTime, taketime);
        out.fill(F::CourseTheme, theme);
        out
    }
}

impl RecreationIntro {
    fn into_normalized(self) -> NormalizedIntroRecord {
        let Self {
            accomcountleports,
            chkbabycarriageleports,
            chkcreditcardleports,
            chkpetleports,
            expagerangeleports,
            infocenterleports,
            openperiod,
            parkingfeeleports,
            parkingleports,
            reservation,
            restdateleports,
            scaleleports,
            usefeeleports,
            usetimeleports,
        } = self;

        let mut out = NormalizedIntroRecord::new();
        out.fill(F::Capacity, accomcountleports);
        out.fill(F::StrollerRental, chkbabycarriageleports);
        out.fill(F::CreditCardAccepted, chkcreditcardleports);
        out.fill(F::PetFriendly, chkpetleports);
        out.fill(F::AgeLimit, expagerangeleports);
        out.fill(F::InfoCenter, infocenterleports);
        out.fill(F::OpenPeriod, openperiod);
        out.fill(F::ParkingFee, parkingfeeleports);
        out.fill(F::ParkingFacility, parkingleports);
        out.fill(F::ReservationInfo, reservation);
        out.fill(F::RestDate, restdateleports);
        out.fill(F::Scale, scaleleports);
        out.fill(F::EntranceFee, usefeeleports);
        out.fill(F::UsageTime, usetimeleports);
        out
    }
}

impl AccommodationIntro {
    fn into_normalized(self) -> NormalizedIntroRecord {
        let Self {
            accomcountlodging,
            benikia,
            checkintime,
            checkouttime,
            chkcooking,
            foodplace,
            goodstay,
            hanok,
            infocenterlodging,
            parkinglodging,
            pickup,
            roomcount,
            reservationlodging,
            reservationurl,
            roomtype,
            scalelodging,
            subfacility,
            barbecue,
            beauty,
            beverage,
            bicycle,
            campfire,
            fitness,
            karaoke,
            publicbath,
            publicpc,
            sauna,
            seminar,
            sports,
            refundregulation,
        } = self;

        let mut out = NormalizedIntroRecord::new();
        out.fill(F::Capacity, accomcountlodging);
        out.fill(F::BenikiaCertified, benikia);
        out.fill(F::CheckinTime, checkintime);
        out.fill(F::CheckoutTime, checkouttime);
        out.fill(F::CookingAllowed, chkcooking);
        out.fill(F::FoodPlace, foodplace);
        out.fill(F::GoodStayCertified, goodstay);
        out.fill(F::HanokCertified, hanok);
        out.fill(F::InfoCenter, infocenterlodging);
        out.fill(F::ParkingFacility, parkinglodging);
        out.fill(F::PickupService, pickup);
        out.fill(F::RoomCount, roomcount);
        out.fill(F::ReservationInfo, reservationlodging);
        out.fill(F::ReservationUrl, reservationurl);
        out.fill(F::RoomType, roomtype);
        out.fill(F::Scale, scalelodging);
        out.fill(F::Amenities, subfacility);
        out.fill(F::Barbecue, barbecue);
        out.fill(F::Beauty, beauty);
        out.fill(F::Beverage, beverage);
        out.fill(F::Bicycle, bicycle);
        out.fill(F::Campfire, campfire);
        out.fill(F::Fitness, fitness);
        out.fill(F::Karaoke, karaoke);
        out.fill(F::PublicBath, publicbath);
        out.fill(F::PublicPc, publicpc);
        out.fill(F::Sauna, sauna);
        out.fill(F::Seminar, seminar);
        out.fill(F::Sports, sports);
        out.fill(F::RefundRegulation, refundregulation);
        out
    }
}

impl ShoppingIntro {
    fn into_normalized(self) -> NormalizedIntroRecord {
        let Self {
            chkbabycarriageshopping,
            chkcreditcardshopping,
            chkpetshopping,
            culturecenter,
            fairday,
            infocentershopping,
            opendateshopping,
            opentime,
            parkingshopping,
            restdateshopping,
            restroom,
            saleitem,
            saleitemcost,
            scaleshopping,
            shopguide,
        } = self;

        let mut out = NormalizedIntroRecord::new();
        out.fill(F::StrollerRental, chkbabycarriageshopping);
        out.fill(F::CreditCardAccepted, chkcreditcardshopping);
        out.fill(F::PetFriendly, chkpetshopping);
        out.fill(F::CultureCenterLink, culturecenter);
        out.fill(F::MarketFairDay, fairday);
        out.fill(F::InfoCenter, infocentershopping);
        out.fill(F::OpenDate, opendateshopping);
        out.fill(F::UsageTime, opentime);
        out.fill(F::ParkingFacility, parkingshopping);
        out.fill(F::RestDate, restdateshopping);
        out.fill(F::RestroomInfo, restroom);
        out.fill(F::SaleItems, saleitem);
        out.fill(F::SaleItemCost, saleitemcost);
        out.fill(F::Scale, scaleshopping);
        out.fill(F::ShopGuide, shopguide);
        out
    }
}

impl RestaurantIntro {
    fn into_normalized(self) -> NormalizedIntroRecord {
        let Self {
            chkcreditcardfood,
            discountinfofood,
            firstmenu,
            infocenterfood,
            kidsfacility,
            opendatefood,
            opentimefood,
            packing,
            parkingfood,
            reservationfood,
            restdatefood,
            scalefood,
            seat,
            smoking,
            treatmenu,
            lcnsno,
        } = self;

        let mut out = NormalizedIntroRecord::new();
        out.fill(F::CreditCardAccepted, chkcreditcardfood);
        out.fill(F::DiscountInfo, discountinfofood);
        out.fill(F::FirstMenu, firstmenu);
        out.fill(F::InfoCenter, infocenterfood);
        out.fill(F::KidsFacility, kidsfacility);
        out.fill(F::OpenDate, opendatefood);
        out.fill(F::UsageTime, opentimefood);
        out.fill(F::PackagingAvailable, packing);
        out.fill(F::ParkingFacility, parkingfood);
        out.fill(F::ReservationInfo, reservationfood);
        out.fill(F::RestDate, restdatefood);
        out.fill(F::Scale, scalefood);
        out.fill(F::SeatCount, seat);
        out.fill(F::SmokingAllowed, smoking);
        out.fill(F::MainTreatMenu, treatmenu);
        out.fill(F::LicenseNo, lcnsno);
        out
    }
}

/// An intro record resolved to its content type's schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntroRecord {
    Attraction(AttractionIntro),
    Culture(CultureIntro),
    Event(EventIntro),
    Course(CourseIntro),
    Recreation(RecreationIntro),
    Accommodation(AccommodationIntro),
    Shopping(ShoppingIntro),
    Restaurant(RestaurantIntro),
    /// A `contentTypeId` outside the known set, kept for diagnostics.
    Unknown(String),
}

impl IntroRecord {
    /// Resolves `raw` against the schema named by `content_type_id`.
    #[must_use]
    pub fn parse(raw: &RawIntroRecord, content_type_id: &str) -> Self {
        match ContentType::from_code(content_type_id) {
            Some(content_type) => Self::from_raw(content_type, raw),
            None => Self::Unknown(content_type_id.to_string()),
        }
    }

    /// Resolves `raw` against a known content type's schema.
    ///
    /// Fields that belong to other schemas are ignored.
    #[must_use]
    pub fn from_raw(content_type: ContentType, raw: &RawIntroRecord) -> Self {
        let json = raw.to_json();
        match content_type {
            ContentType::Attraction => Self::Attraction(typed(content_type, json)),
            ContentType::CultureFacility => Self::Culture(typed(content_type, json)),
            ContentType::Event => Self::Event(typed(content_type, json)),
            ContentType::Course => Self::Course(typed(content_type, json)),
            ContentType::Recreation => Self::Recreation(typed(content_type, json)),
            ContentType::Accommodation => Self::Accommodation(typed(content_type, json)),
            ContentType::Shopping => Self::Shopping(typed(content_type, json)),
            ContentType::Restaurant => Self::Restaurant(typed(content_type, json)),
        }
    }

    /// The content type this record was resolved against, if known.
    #[must_use]
    pub fn content_type(&self) -> Option<ContentType> {
        match self {
            Self::Attraction(_) => Some(ContentType::Attraction),
            Self::Culture(_) => Some(ContentType::CultureFacility),
            Self::Event(_) => Some(ContentType::Event),
            Self::Course(_) => Some(ContentType::Course),
            Self::Recreation(_) => Some(ContentType::Recreation),
            Self::Accommodation(_) => Some(ContentType::Accommodation),
            Self::Shopping(_) => Some(ContentType::Shopping),
            Self::Restaurant(_) => Some(ContentType::Restaurant),
            Self::Unknown(_) => None,
        }
    }

    /// Maps the record onto the canonical field set.
    ///
    /// Unknown content types produce an empty record and a warning.
    #[must_use]
    pub fn into_normalized(self) -> NormalizedIntroRecord {
        match self {
            Self::Attraction(intro) => intro.into_normalized(),
            Self::Culture(intro) => intro.into_normalized(),
            Self::Event(intro) => intro.into_normalized(),
            Self::Course(intro) => intro.into_normalized(),
            Self::Recreation(intro) => intro.into_normalized(),
            Self::Accommodation(intro) => intro.into_normalized(),
            Self::Shopping(intro) => intro.into_normalized(),
            Self::Restaurant(intro) => intro.into_normalized(),
            Self::Unknown(content_type_id) => {
                tracing::warn!(
                    content_type_id = %content_type_id,
                    "unknown content type; intro record left empty"
                );
                NormalizedIntroRecord::new()
            }
        }
    }
}

/// Deserializes a typed schema from the JSON form of a raw record.
///
/// Every schema field is an optional string and the raw values are strings or
/// `null`, so this only fails on a schema/record mismatch that cannot occur
/// in practice. It still degrades to the all-absent schema instead of
/// panicking.
fn typed<T>(content_type: ContentType, json: serde_json::Value) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    serde_json::from_value(json).unwrap_or_else(|e| {
        tracing::warn!(
            content_type = %content_type,
            error = %e,
            "intro record did not match its schema; treating every field as missing"
        );
        T::default()
    })
}

/// One (source field → canonical field) pair of a content type's table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMapping {
    pub source: String,
    pub canonical: CanonicalField,
}

/// The mapping table for `content_type`, in source-name order.
///
/// Derived from the typed schema itself: each source field is fed its own
/// name as a value and traced through the normalizer.
#[must_use]
pub fn field_mappings(content_type: ContentType) -> Vec<FieldMapping> {
    let sample: RawIntroRecord = source_fields(content_type)
        .into_iter()
        .map(|name| (name.clone(), name))
        .collect();

    let normalized = IntroRecord::from_raw(content_type, &sample).into_normalized();
    let mut mappings: Vec<FieldMapping> = normalized
        .iter()
        .map(|(canonical, source)| FieldMapping {
            source: source.to_string(),
            canonical,
        })
        .collect();
    mappings.sort_by(|a, b| a.source.cmp(&b.source));
    mappings
}

/// Upstream source field names declared by `content_type`'s schema.
#[must_use]
pub fn source_fields(content_type: ContentType) -> Vec<String> {
    let schema = match content_type {
        ContentType::Attraction => serde_json::to_value(AttractionIntro::default()),
        ContentType::CultureFacility => serde_json::to_value(CultureIntro::default()),
        ContentType::Event => serde_json::to_value(EventIntro::default()),
        ContentType::Course => serde_json::to_value(CourseIntro::default()),
        ContentType::Recreation => serde_json::to_value(RecreationIntro::default()),
        ContentType::Accommodation => serde_json::to_value(AccommodationIntro::default()),
        ContentType::Shopping => serde_json::to_value(ShoppingIntro::default()),
        ContentType::Restaurant => serde_json::to_value(RestaurantIntro::default()),
    };

    match schema {
        Ok(serde_json::Value::Object(map)) => map.keys().cloned().collect(),
        _ => Vec::new(),
    }
}
