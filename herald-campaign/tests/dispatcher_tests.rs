//! Submission, deferral, cancellation, and status queries.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use herald_campaign::{
    CampaignDispatcher, CampaignError, CampaignId, JobKind, JobState, SubmitOutcome,
};
use herald_common::{MessageTemplate, Recipient};
use herald_transport::TestTransport;

fn dispatcher_with(transport: &TestTransport) -> CampaignDispatcher {
    CampaignDispatcher::new(Arc::new(transport.clone()), MessageTemplate::default())
}

#[tokio::test]
async fn immediate_single_sends_once() {
    let transport = TestTransport::new();
    let dispatcher = dispatcher_with(&transport);

    let outcome = dispatcher
        .submit_single(Recipient::new("ada@example.com", "Analytical Engines"), None)
        .await
        .expect("submission should be accepted");

    let SubmitOutcome::Completed { summary, .. } = outcome else {
        panic!("immediate submission should complete inline");
    };
    assert_eq!(summary.sent, 1);
    assert_eq!(summary.failed, 0);

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].message.to, "ada@example.com");
    assert!(sent[0].message.subject.contains("Analytical Engines"));
}

#[tokio::test]
async fn past_schedule_is_rejected_and_nothing_registered() {
    let transport = TestTransport::new();
    let dispatcher = dispatcher_with(&transport);

    let result = dispatcher
        .submit_single(
            Recipient::new("ada@example.com", "Acme"),
            Some(Utc::now() - chrono::Duration::seconds(60)),
        )
        .await;

    assert!(matches!(result, Err(CampaignError::InvalidSchedule(_))));
    assert!(dispatcher.list().is_empty());
    assert_eq!(transport.sent_count(), 0);
}

#[tokio::test]
async fn bulk_with_no_valid_recipients_is_rejected() {
    let transport = TestTransport::new();
    let dispatcher = dispatcher_with(&transport);

    let result = dispatcher
        .submit_bulk(
            vec![
                Recipient::new("", "Acme"),
                Recipient::new("   ", "Globex"),
                Recipient::new("a@b.com", ""),
            ],
            None,
            None,
        )
        .await;

    assert!(matches!(result, Err(CampaignError::EmptyRecipientSet)));
    assert!(dispatcher.list().is_empty());
}

#[tokio::test]
async fn invalid_recipients_are_dropped_from_bulk() {
    let transport = TestTransport::new();
    let dispatcher = dispatcher_with(&transport);

    let outcome = dispatcher
        .submit_bulk(
            vec![
                Recipient::new("good@example.com", "Acme"),
                Recipient::new("", "Blank"),
                Recipient::new("  also-good@example.com  ", "Globex"),
            ],
            None,
            Some(herald_campaign::Pacing {
                interval_ms: 0,
                batch_size: 10,
            }),
        )
        .await
        .expect("submission should be accepted");

    let SubmitOutcome::Completed { summary, .. } = outcome else {
        panic!("immediate submission should complete inline");
    };
    assert_eq!(summary.sent, 2);

    let sent = transport.sent();
    assert_eq!(sent[0].message.to, "good@example.com");
    assert_eq!(sent[1].message.to, "also-good@example.com");
}

#[tokio::test(start_paused = true)]
async fn deferred_job_fires_at_schedule_and_completes() {
    let transport = TestTransport::new();
    let dispatcher = dispatcher_with(&transport);

    let outcome = dispatcher
        .submit_single(
            Recipient::new("ada@example.com", "Acme"),
            Some(Utc::now() + chrono::Duration::seconds(60)),
        )
        .await
        .expect("submission should be accepted");

    let SubmitOutcome::Scheduled { id, .. } = outcome else {
        panic!("deferred submission should return an acknowledgment");
    };

    // Armed and visible until the fire instant
    let job = dispatcher.status(&id).expect("job should be registered");
    assert_eq!(job.state, JobState::Armed);
    assert_eq!(job.kind, JobKind::Single);
    assert_eq!(transport.sent_count(), 0);

    tokio::time::sleep(Duration::from_secs(61)).await;
    transport
        .wait_for_count(1, Duration::from_secs(5))
        .await
        .expect("the deferred send should have fired");

    // Completed jobs are removed promptly
    assert!(dispatcher.status(&id).is_none());
    assert!(dispatcher.list().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancelled_job_never_fires() {
    let transport = TestTransport::new();
    let dispatcher = dispatcher_with(&transport);

    let outcome = dispatcher
        .submit_single(
            Recipient::new("ada@example.com", "Acme"),
            Some(Utc::now() + chrono::Duration::seconds(60)),
        )
        .await
        .expect("submission should be accepted");
    let SubmitOutcome::Scheduled { id, .. } = outcome else {
        panic!("deferred submission should return an acknowledgment");
    };

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(dispatcher.cancel(&id));
    assert!(dispatcher.status(&id).is_none());
    assert!(dispatcher.list().is_empty());

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(transport.sent_count(), 0);

    // A second cancel reports not-found
    assert!(!dispatcher.cancel(&id));
}

#[tokio::test]
async fn cancel_unknown_id_reports_not_found() {
    let transport = TestTransport::new();
    let dispatcher = dispatcher_with(&transport);

    assert!(!dispatcher.cancel(&CampaignId::generate()));
}

#[tokio::test(start_paused = true)]
async fn distinct_jobs_run_independently() {
    let transport = TestTransport::new();
    let dispatcher = Arc::new(dispatcher_with(&transport));

    let first = dispatcher
        .submit_single(
            Recipient::new("first@example.com", "Acme"),
            Some(Utc::now() + chrono::Duration::seconds(30)),
        )
        .await
        .expect("submission should be accepted");
    let second = dispatcher
        .submit_single(
            Recipient::new("second@example.com", "Globex"),
            Some(Utc::now() + chrono::Duration::seconds(90)),
        )
        .await
        .expect("submission should be accepted");

    assert_eq!(dispatcher.list().len(), 2);

    let SubmitOutcome::Scheduled { id: first_id, .. } = first else {
        panic!("deferred submission should return an acknowledgment");
    };
    let SubmitOutcome::Scheduled { id: second_id, .. } = second else {
        panic!("deferred submission should return an acknowledgment");
    };

    // Cancel the second before it fires; the first is unaffected
    assert!(dispatcher.cancel(&second_id));

    tokio::time::sleep(Duration::from_secs(120)).await;
    transport
        .wait_for_count(1, Duration::from_secs(5))
        .await
        .expect("the first campaign should have fired");

    assert_eq!(transport.sent_count(), 1);
    assert_eq!(transport.sent()[0].message.to, "first@example.com");
    assert!(dispatcher.status(&first_id).is_none());
}

#[tokio::test(start_paused = true)]
async fn deferred_bulk_lists_schedule_and_state() {
    let transport = TestTransport::new();
    let dispatcher = dispatcher_with(&transport);

    let scheduled_at = Utc::now() + chrono::Duration::seconds(300);
    let outcome = dispatcher
        .submit_bulk(
            vec![
                Recipient::new("a@example.com", "Acme"),
                Recipient::new("b@example.com", "Globex"),
            ],
            Some(scheduled_at),
            None,
        )
        .await
        .expect("submission should be accepted");

    let SubmitOutcome::Scheduled { id, .. } = outcome else {
        panic!("deferred submission should return an acknowledgment");
    };

    let listed = dispatcher.list();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].kind, JobKind::Bulk);
    assert_eq!(listed[0].state, JobState::Armed);
    assert_eq!(listed[0].recipient_count, 2);
    assert_eq!(listed[0].scheduled_at, Some(scheduled_at));
}

#[tokio::test]
async fn transport_verification_passes_through() {
    let transport = TestTransport::new();
    let dispatcher = dispatcher_with(&transport);

    dispatcher
        .verify_transport()
        .await
        .expect("test transport always verifies");
}
