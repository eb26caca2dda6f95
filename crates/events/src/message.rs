//! Notification messages and payloads.
//!
//! Message bodies are in Chinese, matching the front desk's language.

use gatepass_db::models::visitor::Visitor;
use serde_json::{json, Value};

/// Text sent to the host when a visitor registers.
pub fn host_message(visitor: &Visitor) -> String {
    format!(
        "有新的访客预约:\n姓名: {}\n电话: {}\n单位: {}\n\n请确认是否同意接待，访问ID: {}",
        visitor.name, visitor.phone, visitor.company, visitor.id
    )
}

/// Text sent to security when a visit is decided.
pub fn security_message(visitor: &Visitor) -> String {
    format!(
        "访客状态更新:\n访客姓名: {}\n访客电话: {}\n访客单位: {}\n被拜访人: {}\n状态: {}\n访客ID: {}",
        visitor.name, visitor.phone, visitor.company, visitor.host_name, visitor.status, visitor.id
    )
}

/// Text-message body accepted by WeChat Work and DingTalk group robots.
pub fn chat_payload(content: &str) -> Value {
    json!({
        "msgtype": "text",
        "text": { "content": content },
    })
}

/// Generic webhook body for the host direction.
pub fn host_webhook_payload(visitor: &Visitor) -> Value {
    json!({
        "text": host_message(visitor),
        "visitor_id": visitor.id,
        "visitor_name": visitor.name,
        "visitor_phone": visitor.phone,
        "visitor_company": visitor.company,
        "host_name": visitor.host_name,
        "host_company": visitor.host_company,
        "host_phone": visitor.host_phone,
    })
}

/// Body for the security webhook and for security log entries.
pub fn security_payload(visitor: &Visitor) -> Value {
    json!({
        "visitor_name": visitor.name,
        "visitor_phone": visitor.phone,
        "visitor_company": visitor.company,
        "host_name": visitor.host_name,
        "visit_time": visitor.visit_time,
        "status": visitor.status,
        "visitor_id": visitor.id,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use gatepass_core::status::VisitStatus;

    use super::*;

    fn visitor() -> Visitor {
        Visitor {
            id: 7,
            name: "张三".into(),
            phone: "13800138000".into(),
            company: "ABC公司".into(),
            host_name: "李四".into(),
            host_company: "XYZ公司".into(),
            host_phone: "13900139000".into(),
            visit_time: chrono::Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap(),
            status: VisitStatus::Approved,
        }
    }

    #[test]
    fn host_message_embeds_visitor_and_id() {
        let msg = host_message(&visitor());
        assert!(msg.starts_with("有新的访客预约:"));
        assert!(msg.contains("姓名: 张三"));
        assert!(msg.contains("电话: 13800138000"));
        assert!(msg.contains("单位: ABC公司"));
        assert!(msg.ends_with("访问ID: 7"));
    }

    #[test]
    fn security_message_includes_host_and_status() {
        let msg = security_message(&visitor());
        assert!(msg.contains("被拜访人: 李四"));
        assert!(msg.contains("状态: approved"));
        assert!(msg.ends_with("访客ID: 7"));
    }

    #[test]
    fn chat_payload_shape() {
        let payload = chat_payload("hello");
        assert_eq!(payload["msgtype"], "text");
        assert_eq!(payload["text"]["content"], "hello");
    }

    #[test]
    fn host_webhook_payload_carries_all_fields() {
        let payload = host_webhook_payload(&visitor());
        assert_eq!(payload["visitor_id"], 7);
        assert_eq!(payload["visitor_name"], "张三");
        assert_eq!(payload["host_company"], "XYZ公司");
        assert_eq!(payload["host_phone"], "13900139000");
        assert!(payload["text"].as_str().unwrap().contains("张三"));
    }

    #[test]
    fn security_payload_carries_status_and_time() {
        let payload = security_payload(&visitor());
        assert_eq!(payload["status"], "approved");
        assert_eq!(payload["visitor_id"], 7);
        assert_eq!(payload["visit_time"], "2026-03-01T09:30:00Z");
    }
}
