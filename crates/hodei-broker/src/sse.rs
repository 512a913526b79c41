use kernel::ChangeEvent;

/// Frames a `ChangeEvent` as an SSE wire message:
/// `event: <type>\ndata: <json>\n\n`.
pub fn format_sse_event(event: &ChangeEvent) -> String {
    let type_name = match event.kind {
        kernel::ChangeKind::PolicyUpdated => "policy_updated",
        kernel::ChangeKind::EntityUpdated => "entity_updated",
        kernel::ChangeKind::BackendApproved => "backend_approved",
        kernel::ChangeKind::BackendRejected => "backend_rejected",
        kernel::ChangeKind::BackendSuspended => "backend_suspended",
        kernel::ChangeKind::BackendUnsuspended => "backend_unsuspended",
        kernel::ChangeKind::Connected => "connected",
        kernel::ChangeKind::Heartbeat => "heartbeat",
    };
    let payload = serde_json::json!({
        "type": type_name,
        "app_id": event.application_id,
        "subject_id": event.subject_id,
        "timestamp": event.occurred_at,
    });
    format!("event: {type_name}\ndata: {payload}\n\n")
}
