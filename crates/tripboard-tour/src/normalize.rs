//! Normalization of content-type-specific intro records.

use crate::canonical::NormalizedIntroRecord;
use crate::intro::IntroRecord;
use crate::raw::RawIntroRecord;

/// Maps a raw intro record onto the canonical field set.
///
/// Every slot declared by the content type's table is present in the result,
/// holding `""` when the source field is absent or null. Slots declared only
/// by other content types stay absent.
///
/// Total over any `content_type_id`: an unknown id yields an empty record
/// and a warning instead of an error, so callers can still render a "no
/// additional info" state. `raw` must already be a record; callers turn
/// fetch or parse failures into [`RawIntroRecord::new`] before calling.
#[must_use]
pub fn normalize(raw: &RawIntroRecord, content_type_id: &str) -> NormalizedIntroRecord {
    IntroRecord::parse(raw, content_type_id).into_normalized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::CanonicalField;
    use crate::content_type::ContentType;
    use crate::intro::field_mappings;

    fn raw(pairs: &[(&str, &str)]) -> RawIntroRecord {
        pairs.iter().copied().collect()
    }

    fn declared(ct: ContentType) -> Vec<CanonicalField> {
        field_mappings(ct).into_iter().map(|m| m.canonical).collect()
    }

    #[test]
    fn total_for_every_known_type_with_empty_and_populated_input() {
        let populated = raw(&[("usetime", "09:00"), ("checkintime", "15:00"), ("seat", "40")]);
        for ct in ContentType::ALL {
            let empty = normalize(&RawIntroRecord::new(), ct.code());
            assert!(!empty.is_empty(), "{ct} should declare fields");
            let full = normalize(&populated, ct.code());
            assert_eq!(empty.len(), full.len(), "{ct}: slot set must not depend on input");
        }
    }

    #[test]
    fn unknown_type_yields_empty_record() {
        let input = raw(&[("usetime", "09:00"), ("checkintime", "15:00")]);
        assert!(normalize(&input, "999").is_empty());
        assert!(normalize(&RawIntroRecord::new(), "").is_empty());
        assert!(normalize(&input, "restaurant").is_empty());
    }

    #[test]
    fn repeated_calls_are_equal() {
        let input = raw(&[("eventplace", "시청광장"), ("playtime", "19:00")]);
        assert_eq!(normalize(&input, "15"), normalize(&input, "15"));
    }

    #[test]
    fn accommodation_maps_check_in_and_out() {
        let input = raw(&[("checkintime", "15:00"), ("checkouttime", "11:00")]);
        let result = normalize(&input, "32");

        assert_eq!(result.get(CanonicalField::CheckinTime), Some("15:00"));
        assert_eq!(result.get(CanonicalField::CheckoutTime), Some("11:00"));
        for field in [
            CanonicalField::FirstMenu,
            CanonicalField::MainTreatMenu,
            CanonicalField::SeatCount,
            CanonicalField::KidsFacility,
        ] {
            assert_eq!(result.get(field), None, "{field} is restaurant-only");
        }
    }

    #[test]
    fn usage_time_converges_across_types() {
        let attraction = normalize(&raw(&[("usetime", "09:00-18:00")]), "12");
        let culture = normalize(&raw(&[("usetimeculture", "09:00-18:00")]), "14");

        assert_eq!(attraction.get(CanonicalField::UsageTime), Some("09:00-18:00"));
        assert_eq!(culture.get(CanonicalField::UsageTime), Some("09:00-18:00"));
    }

    #[test]
    fn empty_restaurant_input_fills_every_slot_with_empty_string() {
        let result = normalize(&RawIntroRecord::new(), "39");
        let fields = declared(ContentType::Restaurant);

        assert_eq!(result.len(), fields.len());
        for field in fields {
            assert_eq!(result.get(field), Some(""), "{field} should be present and empty");
        }
        assert!(result.display_rows().is_empty());
    }

    #[test]
    fn event_scenario_end_to_end() {
        let input = raw(&[
            ("eventplace", "시청광장"),
            ("eventstartdate", "20240101"),
            ("eventenddate", "20240103"),
            ("festivalgrade", "국가대표축제"),
        ]);
        let result = normalize(&input, "15");

        assert_eq!(result.get(CanonicalField::EventPlace), Some("시청광장"));
        assert_eq!(result.get(CanonicalField::EventStartDate), Some("20240101"));
        assert_eq!(result.get(CanonicalField::EventEndDate), Some("20240103"));
        assert_eq!(result.get(CanonicalField::FestivalGrade), Some("국가대표축제"));

        for field in declared(ContentType::Accommodation)
            .into_iter()
            .chain(declared(ContentType::Restaurant))
        {
            // Shared concepts (e.g. discountInfo) are legitimately declared by events too.
            if declared(ContentType::Event).contains(&field) {
                continue;
            }
            assert_eq!(result.get(field), None, "{field} should not be populated");
        }
    }

    #[test]
    fn null_source_values_become_empty_strings() {
        let mut input = RawIntroRecord::new();
        input.insert("restdateculture", None);
        input.insert("parkingfee", Some("무료".to_string()));
        let result = normalize(&input, "14");

        assert_eq!(result.get(CanonicalField::RestDate), Some(""));
        assert_eq!(result.get(CanonicalField::ParkingFee), Some("무료"));
    }

    #[test]
    fn shared_slots_are_fed_by_type_specific_sources() {
        let cases = [
            ("12", "restdate", CanonicalField::RestDate),
            ("14", "restdateculture", CanonicalField::RestDate),
            ("28", "restdateleports", CanonicalField::RestDate),
            ("38", "restdateshopping", CanonicalField::RestDate),
            ("39", "restdatefood", CanonicalField::RestDate),
            ("25", "infocentertourcourse", CanonicalField::InfoCenter),
            ("32", "infocenterlodging", CanonicalField::InfoCenter),
            ("32", "accomcountlodging", CanonicalField::Capacity),
            ("28", "accomcountleports", CanonicalField::Capacity),
            ("39", "parkingfood", CanonicalField::ParkingFacility),
            ("28", "parkingfeeleports", CanonicalField::ParkingFee),
            ("38", "chkcreditcardshopping", CanonicalField::CreditCardAccepted),
            ("14", "chkbabycarriageculture", CanonicalField::StrollerRental),
            ("28", "chkpetleports", CanonicalField::PetFriendly),
            ("15", "agelimit", CanonicalField::AgeLimit),
            ("32", "scalelodging", CanonicalField::Scale),
            ("15", "discountinfofestival", CanonicalField::DiscountInfo),
            ("39", "reservationfood", CanonicalField::ReservationInfo),
            ("28", "usefeeleports", CanonicalField::EntranceFee),
        ];

        for (type_id, source, field) in cases {
            let result = normalize(&raw(&[(source, "value")]), type_id);
            assert_eq!(result.get(field), Some("value"), "{type_id}/{source} -> {field}");
        }
    }

    #[test]
    fn source_field_of_another_type_is_not_picked_up() {
        // `usetime` is the attraction name; culture facilities use `usetimeculture`.
        let result = normalize(&raw(&[("usetime", "09:00")]), "14");
        assert_eq!(result.get(CanonicalField::UsageTime), Some(""));
    }

    #[test]
    fn content_type_id_with_whitespace_is_accepted() {
        let result = normalize(&raw(&[("seat", "80")]), " 39 ");
        assert_eq!(result.get(CanonicalField::SeatCount), Some("80"));
    }
}
