//! Wire shapes: the JSON a gateway or audit trail would see.

#[cfg(test)]
mod tests {
    use crate::integration::harness::Harness;
    use escrow_engine::EscrowApi;
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};

    #[test]
    fn milestone_state_serializes_as_tagged_enum() {
        let h = Harness::new();
        let m = h.create(10, dec!(3000)).unwrap();

        let v: Value = serde_json::to_value(&m).unwrap();
        assert_eq!(v["state"]["state"], json!("PROPOSED"));
        assert_eq!(v["sequence"], json!(1));
        assert_eq!(v["due_date"], json!("2025-03-11"));

        let m = h.reject(m.id, "rescope").unwrap();
        let v: Value = serde_json::to_value(&m).unwrap();
        assert_eq!(v["state"]["state"], json!("CHANGES_REQUESTED"));
        assert_eq!(v["state"]["feedback"], json!("rescope"));
    }

    #[test]
    fn verified_milestone_carries_its_approved_submission() {
        let h = Harness::new();
        let m = h.verified_milestone(10, dec!(3000));

        let v: Value = serde_json::to_value(&m).unwrap();
        assert_eq!(v["state"]["state"], json!("VERIFIED"));
        assert_eq!(v["state"]["submission"]["status"], json!("APPROVED"));
        assert_eq!(
            v["state"]["submission"]["payload"],
            json!({ "url": "https://example.com/work" })
        );
    }

    #[test]
    fn milestone_round_trips_through_json() {
        let h = Harness::new();
        let m = h.create(10, dec!(3000)).unwrap();
        let m = h.pay(m.id).unwrap();

        let text = serde_json::to_string(&m).unwrap();
        let back: escrow_engine::Milestone = serde_json::from_str(&text).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn escrow_view_exposes_plain_decimal_figures() {
        let h = Harness::new();
        let m = h.create(10, dec!(3000)).unwrap();
        h.pay(m.id).unwrap();

        let view = h.engine.get_escrow_view(h.contract_id, h.client).unwrap();
        let v: Value = serde_json::to_value(&view).unwrap();
        assert_eq!(v["budget"], json!("9000"));
        assert_eq!(v["funds_in_escrow"], json!("6000"));
        assert_eq!(v["released_to_milestones"], json!("3000"));
        assert_eq!(v["progress_percent"], json!(0));
    }
}
