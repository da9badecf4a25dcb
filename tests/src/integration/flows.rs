//! # Integration Test Flows
//!
//! Scan ingestion, the subscription hub and the query service wired together
//! over in-memory stores.
//!
//! ## Flow Tested
//!
//! 1. **Ingestion → Log**: a scan commits exactly one event
//! 2. **Ingestion → Hub**: a committed event reaches every observer
//! 3. **Query**: `GetTags` and `GetEntries` see what was committed

#[cfg(test)]
mod tests {
    use pl_02_event_log::{EventLogStore, InMemoryEventLog};
    use pl_04_ingestion::{IngestError, ScanRequest, UnauthorizedReason};
    use pl_05_subscription_hub::Frame;
    use serde_json::Value;
    use shared_types::{Action, Direction, IdentityId, TAG_MODIFIED};

    use crate::integration::fixtures::{in_memory, Node, ALICE, BOB, DEVICE};

    fn parse(frame: &Frame) -> Value {
        serde_json::from_str(frame).unwrap()
    }

    fn tags_json(node: &Node<InMemoryEventLog>) -> Value {
        let frame = node.query.execute(Action::GetTags).to_frame().unwrap();
        serde_json::from_str(&frame).unwrap()
    }

    fn current_dir(tags: &Value, name: &str) -> Option<String> {
        tags["Payload"]
            .as_array()
            .unwrap()
            .iter()
            .find(|t| t["Name"] == name)
            .and_then(|t| t.get("CurrentDir"))
            .map(|e| e["Dir"].as_str().unwrap().to_string())
    }

    // =========================================================================
    // GetTags reflects alternation
    // =========================================================================

    #[test]
    fn test_get_tags_alternates_in_out_in() {
        let node = in_memory();
        assert_eq!(current_dir(&tags_json(&node), "Alice"), None);

        let mut seen = Vec::new();
        for _ in 0..3 {
            node.ingestion
                .ingest(&ScanRequest::new(DEVICE, ALICE))
                .unwrap();
            seen.push(current_dir(&tags_json(&node), "Alice").unwrap());
        }

        assert_eq!(seen, vec!["IN", "OUT", "IN"]);
        // Bob was never scanned.
        assert_eq!(current_dir(&tags_json(&node), "Bob"), None);
    }

    #[test]
    fn test_identities_alternate_independently() {
        let node = in_memory();
        let scan = |token: &str| {
            node.ingestion
                .ingest(&ScanRequest::new(DEVICE, token))
                .unwrap()
                .direction
        };

        assert_eq!(scan(ALICE), Direction::Entry);
        assert_eq!(scan(BOB), Direction::Entry);
        assert_eq!(scan(ALICE), Direction::Exit);
        assert_eq!(scan(BOB), Direction::Exit);
        assert_eq!(scan(BOB), Direction::Entry);
    }

    #[test]
    fn test_token_whitespace_is_ignored() {
        let node = in_memory();
        let event = node
            .ingestion
            .ingest(&ScanRequest::new(DEVICE, "  123456\n"))
            .unwrap();
        assert_eq!(event.identity_id, IdentityId::Numeric(1));
    }

    // =========================================================================
    // Broadcast iff commit
    // =========================================================================

    #[test]
    fn test_every_commit_is_broadcast_to_every_observer() {
        let node = in_memory();
        let mut first = node.hub.subscribe().unwrap();
        let mut second = node.hub.subscribe().unwrap();

        let committed = node
            .ingestion
            .ingest(&ScanRequest::new(DEVICE, ALICE))
            .unwrap();

        for sub in [&mut first, &mut second] {
            let frame = parse(&sub.frames.try_recv().unwrap());
            assert_eq!(frame["Success"], true);
            assert_eq!(frame["Context"]["Action"], TAG_MODIFIED);
            assert_eq!(frame["Payload"]["Dir"], "IN");
            assert_eq!(frame["Payload"]["Time"], committed.timestamp);
            assert!(sub.frames.try_recv().is_err());
        }
    }

    #[test]
    fn test_failed_append_is_not_broadcast() {
        let node = in_memory();
        let mut sub = node.hub.subscribe().unwrap();
        node.log.set_unavailable(true);

        let err = node
            .ingestion
            .ingest(&ScanRequest::new(DEVICE, ALICE))
            .unwrap_err();
        assert!(matches!(err, IngestError::StorageFailure(_)));
        assert!(sub.frames.try_recv().is_err());

        // Queries report the failure instead of an empty log.
        let response = node.query.execute(Action::GetEntries);
        assert!(!response.success);
        assert!(response.error.is_some());
    }

    #[test]
    fn test_rejected_scans_leave_no_trace() {
        let node = in_memory();
        let mut sub = node.hub.subscribe().unwrap();

        let unregistered = node
            .ingestion
            .ingest(&ScanRequest::new(DEVICE, "999999"))
            .unwrap_err();
        assert!(matches!(unregistered, IngestError::NotRegistered { .. }));
        assert_eq!(unregistered.status_code(), 404);

        let missing_token = node
            .ingestion
            .ingest(&ScanRequest {
                device_claim: Some(DEVICE.into()),
                token: None,
            })
            .unwrap_err();
        assert!(matches!(
            missing_token,
            IngestError::Unauthorized(UnauthorizedReason::MissingToken)
        ));
        assert_eq!(missing_token.status_code(), 401);

        let wrong_device = node
            .ingestion
            .ingest(&ScanRequest::new("000000", ALICE))
            .unwrap_err();
        assert_eq!(wrong_device.status_code(), 401);

        assert!(node.log.history().unwrap().is_empty());
        assert!(sub.frames.try_recv().is_err());
    }

    // =========================================================================
    // GetEntries ordering
    // =========================================================================

    #[test]
    fn test_get_entries_in_append_order() {
        let node = in_memory();
        for (token, advance) in [(ALICE, 10), (BOB, 10), (ALICE, 10)] {
            node.clock.advance(advance);
            node.ingestion
                .ingest(&ScanRequest::new(DEVICE, token))
                .unwrap();
        }
        node.clock.advance(5);
        let fresh = node
            .ingestion
            .ingest(&ScanRequest::new(DEVICE, BOB))
            .unwrap();

        let frame = node
            .query
            .handle_request(r#"{"Action":"GetEntries"}"#)
            .to_frame()
            .unwrap();
        let response: Value = serde_json::from_str(&frame).unwrap();
        let entries = response["Payload"].as_array().unwrap();

        assert_eq!(entries.len(), 4);
        let dirs: Vec<&str> = entries.iter().map(|e| e["Dir"].as_str().unwrap()).collect();
        assert_eq!(dirs, vec!["IN", "IN", "OUT", "OUT"]);
        assert_eq!(entries[3]["Time"], fresh.timestamp);
        assert_eq!(entries[3]["TagId"], "badge-2");
    }

    #[test]
    fn test_protocol_errors() {
        let node = in_memory();

        let unknown = node.query.handle_request(r#"{"Action":"DeleteAll"}"#);
        assert!(!unknown.success);
        assert_eq!(unknown.action(), "DeleteAll");
        assert_eq!(unknown.error.as_deref(), Some("Action not found"));

        let malformed = node.query.handle_request("not json");
        assert!(!malformed.success);
        assert!(malformed
            .error
            .as_deref()
            .unwrap()
            .starts_with("Malformed request"));
    }
}
