//! Engine transitions observed through the shared bus.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use crate::integration::harness::Harness;
    use escrow_engine::EscrowApi;
    use rust_decimal_macros::dec;
    use shared_bus::{EscrowEvent, EventFilter, EventPublisher, EventTopic};

    async fn next(sub: &mut shared_bus::Subscription) -> EscrowEvent {
        timeout(Duration::from_millis(200), sub.recv())
            .await
            .expect("timed out waiting for event")
            .expect("bus closed")
    }

    #[tokio::test]
    async fn every_transition_publishes_its_event() {
        let h = Harness::new();
        let mut sub = h.bus.subscribe(EventFilter::all());

        let m = h.create(10, dec!(3000)).unwrap();
        assert!(matches!(
            next(&mut sub).await,
            EscrowEvent::MilestoneCreated { sequence: 1, .. }
        ));

        h.pay(m.id).unwrap();
        match next(&mut sub).await {
            EscrowEvent::MilestoneFunded { amount, .. } => assert_eq!(amount, dec!(3000)),
            other => panic!("expected MilestoneFunded, got {other:?}"),
        }

        h.submit_url(m.id, "https://example.com/v1").unwrap();
        assert!(matches!(
            next(&mut sub).await,
            EscrowEvent::SubmissionReceived {
                is_document: false,
                ..
            }
        ));

        h.review(m.id, false, Some("needs polish")).unwrap();
        match next(&mut sub).await {
            EscrowEvent::SubmissionRejected { remark, .. } => {
                assert_eq!(remark, "needs polish");
            }
            other => panic!("expected SubmissionRejected, got {other:?}"),
        }

        h.submit_url(m.id, "https://example.com/v2").unwrap();
        next(&mut sub).await;

        h.review(m.id, true, None).unwrap();
        match next(&mut sub).await {
            EscrowEvent::MilestoneCompleted { amount, .. } => assert_eq!(amount, dec!(3000)),
            other => panic!("expected MilestoneCompleted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn idempotent_payment_retry_publishes_nothing() {
        let h = Harness::new();
        let m = h.create(10, dec!(3000)).unwrap();
        h.pay(m.id).unwrap();

        let published_before = h.bus.events_published();
        h.pay(m.id).unwrap();
        h.pay(m.id).unwrap();
        assert_eq!(h.bus.events_published(), published_before);
    }

    #[tokio::test]
    async fn rejection_event_carries_the_feedback() {
        let h = Harness::new();
        let mut sub = h
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Milestones]));

        let m = h.create(10, dec!(3000)).unwrap();
        next(&mut sub).await; // MilestoneCreated

        h.reject(m.id, "split the work").unwrap();
        match next(&mut sub).await {
            EscrowEvent::MilestoneRejected { feedback, .. } => {
                assert_eq!(feedback, "split the work");
            }
            other => panic!("expected MilestoneRejected, got {other:?}"),
        }

        // Rework lands back in PROPOSED and re-notifies the client.
        h.update(m.id, 8, dec!(2500)).unwrap();
        match next(&mut sub).await {
            EscrowEvent::MilestoneCreated { amount, .. } => assert_eq!(amount, dec!(2500)),
            other => panic!("expected MilestoneCreated, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn contract_filter_isolates_tenants() {
        let h = Harness::new();
        let (other_id, _, other_freelancer) = h.add_contract(dec!(5000));
        let mut sub = h.bus.subscribe(EventFilter::contract(h.contract_id));

        // Activity on the other contract first; it must not surface.
        h.engine
            .create_milestone(escrow_engine::CreateMilestone {
                contract_id: other_id,
                actor: other_freelancer,
                draft: Harness::draft(5, dec!(500)),
            })
            .unwrap();
        h.create(10, dec!(3000)).unwrap();

        let event = next(&mut sub).await;
        assert_eq!(event.contract_id(), h.contract_id);
        assert!(sub.try_recv().unwrap().is_none());
    }

    #[tokio::test]
    async fn event_stream_yields_in_publication_order() {
        use tokio_stream::StreamExt;

        let h = Harness::new();
        let mut stream = h.bus.event_stream(EventFilter::all());

        let m = h.create(10, dec!(3000)).unwrap();
        h.pay(m.id).unwrap();

        let first = timeout(Duration::from_millis(200), stream.next())
            .await
            .expect("timed out")
            .expect("stream closed");
        let second = timeout(Duration::from_millis(200), stream.next())
            .await
            .expect("timed out")
            .expect("stream closed");
        assert!(matches!(first, EscrowEvent::MilestoneCreated { .. }));
        assert!(matches!(second, EscrowEvent::MilestoneFunded { .. }));
    }

    #[tokio::test]
    async fn payment_topic_sees_funding_and_completion_only() {
        let h = Harness::new();
        let mut sub = h
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Payments]));

        let m = h.create(10, dec!(3000)).unwrap();
        h.pay(m.id).unwrap();
        h.submit_url(m.id, "https://example.com/work").unwrap();
        h.review(m.id, true, None).unwrap();

        assert!(matches!(
            next(&mut sub).await,
            EscrowEvent::MilestoneFunded { .. }
        ));
        assert!(matches!(
            next(&mut sub).await,
            EscrowEvent::MilestoneCompleted { .. }
        ));
        assert!(sub.try_recv().unwrap().is_none());
    }
}
