// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::TestRepository;
use crate::{CoreError, StayTracker};
use cardperks_domain::DomainError;
use time::macros::date;

#[test]
fn test_add_and_delete_stays_flush_each_time() {
    let mut tracker: StayTracker<TestRepository> = StayTracker::new(TestRepository::default());

    tracker
        .add_stay("Park Hyatt Kyoto", date!(2026 - 04 - 01), date!(2026 - 04 - 04))
        .unwrap();
    tracker
        .add_stay("Hyatt Centric", date!(2026 - 05 - 10), date!(2026 - 05 - 11))
        .unwrap();
    tracker.delete_stay(0).unwrap();

    assert_eq!(tracker.log().stays().len(), 1);
    assert_eq!(tracker.log().stays()[0].name, "Hyatt Centric");
    assert_eq!(tracker.into_repository().flushes, 3);
}

#[test]
fn test_guest_nights_are_independent_of_stays() {
    let mut tracker: StayTracker<TestRepository> = StayTracker::new(TestRepository::default());
    tracker
        .add_stay("Andaz Maui", date!(2026 - 06 - 01), date!(2026 - 06 - 03))
        .unwrap();
    tracker.add_guest_night("Jordan", date!(2026 - 06 - 15)).unwrap();

    tracker.delete_guest_night(0).unwrap();

    assert!(tracker.log().guest_nights().is_empty());
    assert_eq!(tracker.log().stays().len(), 1);
}

#[test]
fn test_rejected_input_does_not_flush() {
    let mut tracker: StayTracker<TestRepository> = StayTracker::new(TestRepository::default());

    assert!(matches!(
        tracker.add_stay("", date!(2026 - 04 - 01), date!(2026 - 04 - 02)),
        Err(CoreError::DomainViolation(DomainError::InvalidStay(_)))
    ));
    assert!(matches!(
        tracker.add_guest_night("  ", date!(2026 - 04 - 01)),
        Err(CoreError::DomainViolation(DomainError::InvalidGuestNight(_)))
    ));
    assert_eq!(
        tracker.delete_stay(2).unwrap_err(),
        CoreError::DomainViolation(DomainError::StayIndexOutOfRange { index: 2, len: 0 })
    );
    assert_eq!(
        tracker.delete_guest_night(0).unwrap_err(),
        CoreError::DomainViolation(DomainError::GuestNightIndexOutOfRange { index: 0, len: 0 })
    );

    assert_eq!(tracker.into_repository().flushes, 0);
}

#[test]
fn test_flush_failure_is_reported() {
    let mut tracker: StayTracker<TestRepository> = StayTracker::new(TestRepository::failing());

    let err: CoreError = tracker
        .add_stay("Hyatt House", date!(2026 - 04 - 01), date!(2026 - 04 - 02))
        .unwrap_err();

    assert_eq!(err, CoreError::StateFlushFailed(String::from("disk full")));
    assert!(tracker.log().stays().is_empty());
}

#[test]
fn test_flush_failure_keeps_previous_log() {
    let mut repository: TestRepository = TestRepository::failing();
    repository
        .stay_log
        .add_stay("Andaz Tokyo", date!(2026 - 01 - 05), date!(2026 - 01 - 07))
        .unwrap();
    let mut tracker: StayTracker<TestRepository> = StayTracker::new(repository);

    assert!(tracker.delete_stay(0).is_err());
    assert!(tracker.add_guest_night("Sam", date!(2026 - 02 - 14)).is_err());

    assert_eq!(tracker.log().stays().len(), 1);
    assert_eq!(tracker.log().stays()[0].name, "Andaz Tokyo");
    assert!(tracker.log().guest_nights().is_empty());
}
