use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use vet_cell::models::{Appointment, AvailabilityQuery, Veterinarian};
use vet_cell::services::{compute_window, AvailabilityService, ConflictFilter};
use vet_cell::store::InMemoryVetStore;

fn vet(first_name: &str, last_name: &str, specialization: &str) -> Veterinarian {
    Veterinarian {
        id: Uuid::new_v4(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        specialization: specialization.to_string(),
        photo_id: None,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32, s: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, s).unwrap()
}

fn book(store: &InMemoryVetStore, vet: &Veterinarian, on: NaiveDate, at: NaiveTime) {
    store.insert_appointment(Appointment {
        veterinarian_id: vet.id,
        appointment_date: on,
        appointment_time: at,
    });
}

fn search(specialization: Option<&str>, on: Option<NaiveDate>, at: Option<NaiveTime>) -> AvailabilityQuery {
    AvailabilityQuery {
        specialization: specialization.map(String::from),
        date: on,
        time: at,
    }
}

#[tokio::test]
async fn test_vet_booked_inside_window_is_excluded() {
    let store = Arc::new(InMemoryVetStore::new());
    let w = vet("Walter", "White", "Surgery");
    let free = vet("Fiona", "Free", "Surgery");
    store.insert_veterinarian(w.clone());
    store.insert_veterinarian(free.clone());
    book(&store, &w, date(2024, 6, 10), time(10, 30, 0));

    let service = AvailabilityService::from_store(store);
    let result = service
        .find_available_vets(&search(None, Some(date(2024, 6, 10)), Some(time(9, 0, 0))))
        .await
        .unwrap();

    let ids: Vec<Uuid> = result.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![free.id]);
}

#[tokio::test]
async fn test_bookings_on_window_bounds_do_not_conflict() {
    let store = Arc::new(InMemoryVetStore::new());
    let on_min = vet("Min", "Alpha", "Surgery");
    let on_max = vet("Max", "Beta", "Surgery");
    let inside = vet("In", "Gamma", "Surgery");
    for v in [&on_min, &on_max, &inside] {
        store.insert_veterinarian(v.clone());
    }

    let day = date(2024, 6, 10);
    let window = compute_window(time(9, 0, 0));
    book(&store, &on_min, day, window.min_time);
    book(&store, &on_max, day, window.max_time);
    book(&store, &inside, day, time(6, 20, 1));

    let service = AvailabilityService::from_store(store);
    let result = service
        .find_available_vets(&search(None, Some(day), Some(time(9, 0, 0))))
        .await
        .unwrap();

    let ids: Vec<Uuid> = result.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![on_min.id, on_max.id]);
}

#[tokio::test]
async fn test_bookings_on_other_days_are_ignored() {
    let store = Arc::new(InMemoryVetStore::new());
    let v = vet("Other", "Day", "Dentistry");
    store.insert_veterinarian(v.clone());
    book(&store, &v, date(2024, 6, 11), time(9, 0, 0));

    let service = AvailabilityService::from_store(store);
    let result = service
        .find_available_vets(&search(None, Some(date(2024, 6, 10)), Some(time(9, 0, 0))))
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, v.id);
}

#[tokio::test]
async fn test_specialization_filter_applies_to_availability() {
    let store = Arc::new(InMemoryVetStore::new());
    let surgeon = vet("Sam", "Surgeon", "Surgery");
    let dentist = vet("Dana", "Dentist", "Dentistry");
    store.insert_veterinarian(surgeon.clone());
    store.insert_veterinarian(dentist.clone());

    let service = AvailabilityService::from_store(store);
    let result = service
        .find_available_vets(&search(Some("Dentistry"), Some(date(2024, 6, 10)), Some(time(9, 0, 0))))
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, dentist.id);
}

#[tokio::test]
async fn test_unknown_specialization_availability_is_empty_not_error() {
    let store = Arc::new(InMemoryVetStore::new());
    store.insert_veterinarian(vet("Sam", "Surgeon", "Surgery"));

    let service = AvailabilityService::from_store(store);

    let timed = service
        .find_available_vets(&search(Some("Dermatology"), Some(date(2024, 6, 10)), Some(time(9, 0, 0))))
        .await
        .unwrap();
    assert!(timed.is_empty());

    let untimed = service
        .find_available_vets(&search(Some("Dermatology"), None, None))
        .await
        .unwrap();
    assert!(untimed.is_empty());
}

#[tokio::test]
async fn test_missing_time_falls_back_to_plain_listing() {
    let store = Arc::new(InMemoryVetStore::new());
    let busy = vet("Busy", "Bee", "Surgery");
    let dentist = vet("Dana", "Dentist", "Dentistry");
    store.insert_veterinarian(busy.clone());
    store.insert_veterinarian(dentist.clone());
    book(&store, &busy, date(2024, 6, 10), time(10, 30, 0));

    let service = AvailabilityService::from_store(store);

    // Date without time: no time filtering at all
    let all = service
        .find_available_vets(&search(None, Some(date(2024, 6, 10)), None))
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let surgeons = service
        .find_available_vets(&search(Some("Surgery"), None, Some(time(9, 0, 0))))
        .await
        .unwrap();
    assert_eq!(surgeons.len(), 1);
    assert_eq!(surgeons[0].id, busy.id);
}

#[tokio::test]
async fn test_early_request_clamps_window_to_midnight() {
    let store = Arc::new(InMemoryVetStore::new());
    let at_midnight = vet("Mid", "Night", "Surgery");
    let just_after = vet("Just", "After", "Surgery");
    store.insert_veterinarian(at_midnight.clone());
    store.insert_veterinarian(just_after.clone());

    let day = date(2024, 6, 10);
    // Window for 01:00 is (00:00, 04:00): midnight itself is on the bound
    book(&store, &at_midnight, day, time(0, 0, 0));
    book(&store, &just_after, day, time(0, 0, 1));

    let service = AvailabilityService::from_store(store);
    let result = service
        .find_available_vets(&search(None, Some(day), Some(time(1, 0, 0))))
        .await
        .unwrap();

    let ids: Vec<Uuid> = result.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![at_midnight.id]);
}

#[tokio::test]
async fn test_late_request_clamps_window_to_end_of_day() {
    let store = Arc::new(InMemoryVetStore::new());
    let late = vet("Late", "Owl", "Surgery");
    store.insert_veterinarian(late.clone());

    let day = date(2024, 6, 10);
    book(&store, &late, day, time(23, 59, 59));

    let service = AvailabilityService::from_store(store);
    let result = service
        .find_available_vets(&search(None, Some(day), Some(time(23, 0, 0))))
        .await
        .unwrap();

    assert!(result.is_empty());
}

#[tokio::test]
async fn test_conflict_filter_is_idempotent() {
    let store = Arc::new(InMemoryVetStore::new());
    for i in 0..5 {
        let v = vet(&format!("Vet{}", i), "Repeat", "Surgery");
        store.insert_veterinarian(v.clone());
        if i % 2 == 0 {
            book(&store, &v, date(2024, 6, 10), time(10, 0, 0));
        }
    }

    let filter = ConflictFilter::new(store);
    let window = compute_window(time(9, 0, 0));

    let first = filter.find_available(date(2024, 6, 10), &window, None).await.unwrap();
    let second = filter.find_available(date(2024, 6, 10), &window, None).await.unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_available_vets_carry_review_stats() {
    let store = Arc::new(InMemoryVetStore::new());
    let rated = vet("Rita", "Rated", "Surgery");
    let unrated = vet("Ursula", "Unrated", "Surgery");
    store.insert_veterinarian(rated.clone());
    store.insert_veterinarian(unrated.clone());
    for rating in [4, 5, 3] {
        store.insert_review(rated.id, rating);
    }

    let service = AvailabilityService::from_store(store);
    let result = service
        .find_available_vets(&search(None, Some(date(2024, 6, 10)), Some(time(9, 0, 0))))
        .await
        .unwrap();

    let rated_summary = result.iter().find(|s| s.id == rated.id).unwrap();
    assert_eq!(rated_summary.total_reviewers, 3);
    assert_eq!(rated_summary.average_rating, 4.0);

    let unrated_summary = result.iter().find(|s| s.id == unrated.id).unwrap();
    assert_eq!(unrated_summary.total_reviewers, 0);
    assert_eq!(unrated_summary.average_rating, 0.0);
}
