use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use careslot_core::{
    errors::{BookingError, BookingResult},
    models::booking::{
        ActorRole, Booking, BookingFilter, BookingKind, BookingResponse, BookingStatus,
        NewBooking, StatusChange,
    },
    store::BookingStore,
};
use careslot_db::mock::repositories::{MockBookingRepo, MockNotifier};
use careslot_db::MemoryBookingStore;
use chrono::NaiveDate;
use fake::{faker::name::en::Name, Fake};
use mockall::predicate;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::test_utils::{
    hm, role_header, subject_header, value, TestContext, CARDIOLOGIST, LAB, LAST_MONDAY, MONDAY,
};

async fn book(ctx: &TestContext, start_time: &str, subject_id: &str) -> axum_test::TestResponse {
    ctx.server
        .post("/book")
        .json(&json!({
            "providerId": CARDIOLOGIST,
            "date": MONDAY,
            "startTime": start_time,
            "subjectId": subject_id,
        }))
        .await
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn test_book_slot() {
    let ctx = TestContext::new();
    let patient: String = Name().fake();

    let response = book(&ctx, "10:30", &patient).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let BookingResponse { booking } = response.json();
    assert_eq!(booking.provider_id, CARDIOLOGIST);
    assert_eq!(booking.date, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
    assert_eq!(booking.start_time, hm(10, 30));
    assert_eq!(booking.subject_id, patient);
    assert_eq!(booking.kind, BookingKind::InPerson);
    assert_eq!(booking.status, BookingStatus::Booked);
}

#[tokio::test]
async fn test_double_booking_conflicts() {
    let ctx = TestContext::new();
    assert_eq!(book(&ctx, "10:00", "patient-1").await.status_code(), StatusCode::CREATED);

    let response = book(&ctx, "10:00", "patient-2").await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(error_code(&response.json()), "conflict");
}

#[tokio::test]
async fn test_time_off_the_grid_is_invalid() {
    let ctx = TestContext::new();

    let response = book(&ctx, "10:15", "patient-1").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response.json()), "invalid_slot");
}

#[tokio::test]
async fn test_past_slot_is_rejected() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/book")
        .json(&json!({
            "providerId": CARDIOLOGIST,
            "date": LAST_MONDAY,
            "startTime": "10:00",
            "subjectId": "patient-1",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response.json()), "past_date");
}

#[tokio::test]
async fn test_unknown_provider() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/book")
        .json(&json!({
            "providerId": "dr-nobody",
            "date": MONDAY,
            "startTime": "10:00",
            "subjectId": "patient-1",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(error_code(&response.json()), "not_found");
}

#[tokio::test]
async fn test_malformed_requests_are_validation_errors() {
    let ctx = TestContext::new();

    for body in [
        json!({ "providerId": CARDIOLOGIST, "date": "02/06/2025", "startTime": "10:00", "subjectId": "p" }),
        json!({ "providerId": CARDIOLOGIST, "date": MONDAY, "startTime": "ten", "subjectId": "p" }),
        json!({ "providerId": CARDIOLOGIST, "date": MONDAY, "startTime": "10:00" }),
        json!({ "date": MONDAY, "startTime": "10:00", "subjectId": "p" }),
    ] {
        let response = ctx.server.post("/book").json(&body).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(error_code(&response.json()), "validation");
    }
}

#[tokio::test]
async fn test_subject_falls_back_to_identity_header() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/book")
        .add_header(role_header(), value("patient"))
        .add_header(subject_header(), value("patient-9"))
        .json(&json!({
            "providerId": LAB,
            "date": MONDAY,
            "startTime": "07:45",
            "kind": "remote",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let BookingResponse { booking } = response.json();
    assert_eq!(booking.subject_id, "patient-9");
    assert_eq!(booking.kind, BookingKind::Remote);
}

#[tokio::test]
async fn test_get_and_list_bookings() {
    let ctx = TestContext::new();
    let BookingResponse { booking: first } = book(&ctx, "10:00", "patient-1").await.json();
    let BookingResponse { booking: second } = book(&ctx, "11:00", "patient-2").await.json();

    let fetched: Booking = ctx.server.get(&format!("/bookings/{}", first.id)).await.json();
    assert_eq!(fetched, first);

    let mine: Vec<Booking> = ctx.server.get("/bookings?subjectId=patient-2").await.json();
    assert_eq!(mine, vec![second.clone()]);

    let all: Vec<Booking> = ctx
        .server
        .get(&format!("/bookings?providerId={}&date={}", CARDIOLOGIST, MONDAY))
        .await
        .json();
    assert_eq!(all, vec![first, second]);
}

#[tokio::test]
async fn test_get_missing_booking() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get(&format!("/bookings/{}", uuid::Uuid::new_v4()))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = ctx.server.get("/bookings/not-a-uuid").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_booking_lifecycle() {
    let ctx = TestContext::new();
    let BookingResponse { booking } = book(&ctx, "11:30", "patient-1").await.json();
    let url = format!("/bookings/{}/status", booking.id);

    let response = ctx
        .server
        .patch(&url)
        .add_header(role_header(), value("patient"))
        .json(&json!({ "status": "confirmed" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&response.json()), "invalid_transition");

    let response = ctx
        .server
        .patch(&url)
        .add_header(role_header(), value("doctor"))
        .json(&json!({ "status": "confirmed" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Booking>().status, BookingStatus::Confirmed);

    let response = ctx
        .server
        .patch(&url)
        .add_header(role_header(), value("provider"))
        .json(&json!({ "status": "completed" }))
        .await;
    assert_eq!(response.json::<Booking>().status, BookingStatus::Completed);

    let response = ctx
        .server
        .patch(&url)
        .add_header(role_header(), value("provider"))
        .json(&json!({ "status": "cancelled" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_cancel_frees_the_slot() {
    let ctx = TestContext::new();
    let BookingResponse { booking } = book(&ctx, "10:00", "patient-1").await.json();

    let response = ctx
        .server
        .patch(&format!("/bookings/{}/status", booking.id))
        .add_header(role_header(), value("patient"))
        .json(&json!({ "status": "cancelled" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let availability: Value = ctx
        .server
        .get(&format!("/availability?providerId={}&date={}", CARDIOLOGIST, MONDAY))
        .await
        .json();
    assert_eq!(availability["slots"][0], json!({ "time": "10:00", "available": true }));

    assert_eq!(book(&ctx, "10:00", "patient-2").await.status_code(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_status_update_requires_role() {
    let ctx = TestContext::new();
    let BookingResponse { booking } = book(&ctx, "10:00", "patient-1").await.json();
    let url = format!("/bookings/{}/status", booking.id);

    let response = ctx
        .server
        .patch(&url)
        .json(&json!({ "status": "cancelled" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = ctx
        .server
        .patch(&url)
        .add_header(role_header(), value("janitor"))
        .json(&json!({ "status": "cancelled" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_commit_one_booking() {
    let ctx = TestContext::new();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let state = Arc::clone(&ctx.state);
            tokio::spawn(async move {
                state
                    .bookings
                    .book(NewBooking {
                        provider_id: CARDIOLOGIST.to_string(),
                        date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
                        start_time: hm(11, 0),
                        subject_id: format!("patient-{i}"),
                        kind: BookingKind::InPerson,
                    })
                    .await
            })
        })
        .collect();

    let mut committed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => committed += 1,
            Err(err) => assert!(matches!(err, BookingError::Conflict(_)), "{err}"),
        }
    }
    assert_eq!(committed, 1);
}

/// In-memory store whose reads lag, so concurrent transitions all see the same status.
struct LaggingReads(MemoryBookingStore);

#[async_trait]
impl BookingStore for LaggingReads {
    async fn find_by_provider_and_date(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> BookingResult<Vec<Booking>> {
        self.0.find_by_provider_and_date(provider_id, date).await
    }

    async fn append(&self, booking: Booking) -> BookingResult<Booking> {
        self.0.append(booking).await
    }

    async fn update_status(&self, change: StatusChange) -> BookingResult<Booking> {
        // Let the cancel land first when both writers are in flight.
        if change.next == BookingStatus::Confirmed {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        self.0.update_status(change).await
    }

    async fn get(&self, booking_id: Uuid) -> BookingResult<Option<Booking>> {
        let found = self.0.get(booking_id).await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        found
    }

    async fn list(&self, filter: &BookingFilter) -> BookingResult<Vec<Booking>> {
        self.0.list(filter).await
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_confirm_does_not_overwrite_a_concurrent_cancel() {
    let ctx = TestContext::with_store(Arc::new(LaggingReads(MemoryBookingStore::default())));
    let BookingResponse { booking } = book(&ctx, "10:00", "patient-1").await.json();

    let cancel = {
        let state = Arc::clone(&ctx.state);
        tokio::spawn(async move {
            state
                .bookings
                .update_status(booking.id, ActorRole::Patient, BookingStatus::Cancelled)
                .await
        })
    };
    let confirm = {
        let state = Arc::clone(&ctx.state);
        tokio::spawn(async move {
            state
                .bookings
                .update_status(booking.id, ActorRole::Provider, BookingStatus::Confirmed)
                .await
        })
    };

    let cancelled = cancel.await.unwrap().unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    let err = confirm.await.unwrap().unwrap_err();
    assert!(matches!(err, BookingError::InvalidTransition(_)), "{err}");

    let stored = ctx.state.bookings.get(booking.id).await.unwrap();
    assert_eq!(stored.status, BookingStatus::Cancelled);
    assert_eq!(book(&ctx, "10:00", "patient-2").await.status_code(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_commit_notifies_the_booking_id() {
    let (tx, mut notified) = mpsc::unbounded_channel();
    let mut notifier = MockNotifier::new();
    notifier.expect_notify().times(1).returning(move |booking_id| {
        tx.send(booking_id).ok();
        Ok(())
    });
    let ctx = TestContext::with_notifier(Arc::new(notifier));

    let response = book(&ctx, "10:00", "patient-1").await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let BookingResponse { booking } = response.json();
    assert_eq!(notified.recv().await, Some(booking.id));
}

#[test_log::test(tokio::test)]
async fn test_failed_notification_does_not_fail_the_booking() {
    let (tx, mut notified) = mpsc::unbounded_channel();
    let mut notifier = MockNotifier::new();
    notifier.expect_notify().times(1).returning(move |booking_id| {
        tx.send(booking_id).ok();
        Err(eyre::eyre!("mail relay unreachable"))
    });
    let ctx = TestContext::with_notifier(Arc::new(notifier));

    let response = book(&ctx, "10:00", "patient-1").await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let BookingResponse { booking } = response.json();
    assert_eq!(notified.recv().await, Some(booking.id));
    let stored = ctx.state.bookings.get(booking.id).await.unwrap();
    assert_eq!(stored.status, BookingStatus::Booked);
}

#[tokio::test]
async fn test_store_timeout_maps_to_service_unavailable() {
    let mut repo = MockBookingRepo::new();
    repo.expect_append()
        .with(predicate::function(|b: &Booking| b.provider_id == CARDIOLOGIST))
        .times(1)
        .returning(|_| Err(BookingError::Timeout("lock busy".to_string())));
    let ctx = TestContext::with_store(Arc::new(repo));

    let response = book(&ctx, "10:00", "patient-1").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(error_code(&response.json()), "timeout");
}

#[test_log::test(tokio::test)]
async fn test_storage_failure_is_not_leaked() {
    let mut repo = MockBookingRepo::new();
    repo.expect_append()
        .returning(|_| Err(BookingError::Storage(eyre::eyre!("connection refused by 10.0.0.5"))));
    let ctx = TestContext::with_store(Arc::new(repo));

    let response = book(&ctx, "10:00", "patient-1").await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json();
    assert_eq!(error_code(&body), "storage");
    assert_eq!(body["error"]["message"], "An internal error occurred");
}
