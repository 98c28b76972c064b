//! End-to-end lifecycle flows through the public engine API.

#[cfg(test)]
mod tests {
    use crate::integration::harness::Harness;
    use escrow_engine::{
        EscrowApi, EscrowError, PaymentStatus, RawSubmissionPayload, SubmissionPayload,
        SubmitWork, VerificationStatus,
    };
    use rust_decimal_macros::dec;

    #[test]
    fn proposal_funding_delivery_verification() {
        let h = Harness::new();

        // Freelancer proposes 3000 over 10 days against the 9000 budget.
        let m = h.create(10, dec!(3000)).unwrap();
        assert_eq!(m.display_status(), "PENDING");
        assert_eq!(m.payment_status(), PaymentStatus::NotPaid);

        // Client approves: 3000 leaves escrow immediately.
        let m = h.pay(m.id).unwrap();
        assert_eq!(m.display_status(), "PAYMENT COMPLETED");
        let view = h.engine.get_escrow_view(h.contract_id, h.client).unwrap();
        assert_eq!(view.funds_in_escrow, dec!(6000));
        assert_eq!(view.released_to_milestones, dec!(3000));
        assert_eq!(view.completed_payout, dec!(0));

        // Freelancer delivers a URL; client accepts.
        h.submit_url(m.id, "https://example.com/deliverable").unwrap();
        let m = h.review(m.id, true, None).unwrap();
        assert!(m.is_verified());
        assert_eq!(m.display_status(), "COMPLETED");

        let view = h.engine.get_escrow_view(h.contract_id, h.client).unwrap();
        assert_eq!(view.completed_payout, dec!(3000));
        assert_eq!(view.progress_percent, 100);
    }

    #[test]
    fn payment_precedes_work_never_the_reverse() {
        let h = Harness::new();
        let m = h.create(10, dec!(3000)).unwrap();

        let err = h.submit_url(m.id, "https://example.com/early").unwrap_err();
        assert!(matches!(err, EscrowError::NotFunded { .. }));
    }

    #[test]
    fn reject_feedback_update_repropose_cycle() {
        let h = Harness::new();
        let m = h.create(10, dec!(3000)).unwrap();

        // Feedback is mandatory on rejection.
        let err = h.reject(m.id, "   ").unwrap_err();
        assert!(matches!(err, EscrowError::InvalidPayload { .. }));

        let m = h.reject(m.id, "split the design work out").unwrap();
        assert_eq!(m.display_status(), "REJECTED");
        assert_eq!(m.verification_status(), VerificationStatus::ChangesRequested);
        assert_eq!(m.client_feedback(), Some("split the design work out"));
        // Rejection never touches money.
        assert_eq!(m.payment_status(), PaymentStatus::NotPaid);

        // A rejected proposal cannot be paid as-is.
        let err = h.pay(m.id).unwrap_err();
        assert!(matches!(err, EscrowError::IllegalStateTransition { .. }));

        // Rework clears the feedback and re-proposes; approval then works.
        let m = h.update(m.id, 8, dec!(2500)).unwrap();
        assert_eq!(m.display_status(), "PENDING");
        assert_eq!(m.client_feedback(), None);
        h.pay(m.id).unwrap();
    }

    #[test]
    fn submission_review_reject_resubmit_accept() {
        let h = Harness::new();
        let m = h.create(10, dec!(3000)).unwrap();
        h.pay(m.id).unwrap();
        h.submit_url(m.id, "https://example.com/v1").unwrap();

        // Remark is mandatory when rejecting a submission.
        let err = h.review(m.id, false, None).unwrap_err();
        assert!(matches!(err, EscrowError::InvalidPayload { .. }));

        let m = h.review(m.id, false, Some("demo link is broken")).unwrap();
        // Milestone stays paid and in progress; the remark is readable.
        assert_eq!(m.payment_status(), PaymentStatus::Paid);
        assert!(!m.is_verified());
        assert_eq!(
            m.submission().unwrap().client_remark.as_deref(),
            Some("demo link is broken")
        );

        // Resubmission replaces the payload and retains the remark until
        // the next decision.
        let m = h.submit_url(m.id, "https://example.com/v2").unwrap();
        let submission = m.submission().unwrap();
        assert!(submission.is_pending_review());
        assert_eq!(submission.client_remark.as_deref(), Some("demo link is broken"));
        assert_eq!(
            submission.payload,
            SubmissionPayload::Url("https://example.com/v2".into())
        );

        let m = h.review(m.id, true, None).unwrap();
        assert!(m.is_verified());
        assert_eq!(m.submission().unwrap().client_remark, None);
    }

    #[test]
    fn duplicate_submission_while_pending_is_refused() {
        let h = Harness::new();
        let m = h.create(10, dec!(3000)).unwrap();
        h.pay(m.id).unwrap();
        h.submit_url(m.id, "https://example.com/v1").unwrap();

        let err = h.submit_url(m.id, "https://example.com/v2").unwrap_err();
        assert!(matches!(err, EscrowError::DuplicateSubmission { .. }));
    }

    #[test]
    fn verified_is_terminal() {
        let h = Harness::new();
        let m = h.verified_milestone(10, dec!(3000));

        assert!(matches!(
            h.submit_url(m.id, "https://example.com/late"),
            Err(EscrowError::IllegalStateTransition { .. })
        ));
        assert!(matches!(
            h.review(m.id, false, Some("changed my mind")),
            Err(EscrowError::IllegalStateTransition { .. })
        ));
        assert!(matches!(
            h.reject(m.id, "undo"),
            Err(EscrowError::IllegalStateTransition { .. })
        ));
        assert!(matches!(
            h.update(m.id, 5, dec!(100)),
            Err(EscrowError::IllegalStateTransition { .. })
        ));
        // Payment retry stays a harmless no-op.
        h.pay(m.id).unwrap();
    }

    #[test]
    fn document_submission_flows_through_the_attachment_store() {
        use escrow_engine::AttachmentStore;

        let h = Harness::new();
        let m = h.create(10, dec!(3000)).unwrap();
        h.pay(m.id).unwrap();

        let reference = h.attachments.store("final-report.pdf", b"%PDF-1.7").unwrap();
        let m = h
            .engine
            .submit_work(SubmitWork {
                contract_id: h.contract_id,
                milestone_id: m.id,
                actor: h.freelancer,
                payload: RawSubmissionPayload::document(reference.clone()),
                notes: "report attached".into(),
            })
            .unwrap();

        let submission = m.submission().unwrap();
        assert!(submission.payload.is_document());
        assert_eq!(submission.notes, "report attached");
        assert_eq!(h.attachments.fetch(&reference).as_deref(), Some(&b"%PDF-1.7"[..]));
    }

    #[test]
    fn payload_must_be_document_or_url_not_both() {
        let h = Harness::new();
        let m = h.create(10, dec!(3000)).unwrap();
        h.pay(m.id).unwrap();

        let reference = {
            use escrow_engine::AttachmentStore;
            h.attachments.store("work.zip", b"zip").unwrap()
        };
        let mut both = RawSubmissionPayload::document(reference);
        both.file_url = Some("https://example.com/also".into());

        let err = h
            .engine
            .submit_work(SubmitWork {
                contract_id: h.contract_id,
                milestone_id: m.id,
                actor: h.freelancer,
                payload: both,
                notes: String::new(),
            })
            .unwrap_err();
        assert!(matches!(err, EscrowError::InvalidPayload { .. }));
    }

    #[test]
    fn idempotent_payment_retries_release_once() {
        let h = Harness::new();
        let m = h.create(10, dec!(3000)).unwrap();

        for _ in 0..5 {
            h.pay(m.id).unwrap();
        }
        let view = h.engine.get_escrow_view(h.contract_id, h.client).unwrap();
        assert_eq!(view.released_to_milestones, dec!(3000));
        assert_eq!(view.funds_in_escrow, dec!(6000));
    }
}
