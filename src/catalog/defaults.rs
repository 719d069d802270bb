use super::entry::{NodeCatalogEntry, NodeRole};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Pass-through template used by the generic code node.
pub const PASS_THROUGH_CODE: &str = r#"// Process the input data
const items = $input.all();

// Your code here
const processedItems = items.map(item => {
  return {
    json: {
      // Transform your data
      ...item.json
    }
  };
});

return processedItems;"#;

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Builds the standard catalog table.
///
/// Each line reads `key => (node type, display name, role)` followed by
/// optional `version`, `params`, `required`, `credential`, `outputs` and
/// `flags` clauses, in that order.
macro_rules! catalog_entries {
    ( $(
        $key:literal => ($node_type:literal, $name:literal, $role:ident)
        $(, version: $version:literal)?
        $(, params: $params:tt)?
        $(, required: [$($field:literal),* $(,)?])?
        $(, credential: $credential:literal)?
        $(, outputs: $outputs:literal)?
        $(, flags: [$($flag:ident),* $(,)?])?
    );* $(;)? ) => {{
        let mut entries = BTreeMap::new();
        $(
            #[allow(unused_mut)]
            let mut entry = NodeCatalogEntry::new($node_type, $name, NodeRole::$role);
            $( entry.type_version = $version as f64; )?
            $( entry.default_parameters = object(json!($params)); )?
            $( entry.required_fields = vec![$($field.to_string()),*]; )?
            $( entry.credential_type = Some($credential.to_string()); )?
            $( entry.outputs = $outputs; )?
            $( $( entry.$flag = true; )* )?
            entries.insert($key.to_string(), entry);
        )*
        entries
    }};
}

/// The n8n-oriented catalog shipped as the default configuration.
pub fn standard_entries() -> BTreeMap<String, NodeCatalogEntry> {
    catalog_entries! {
        // Triggers
        "schedule" => ("n8n-nodes-base.cron", "Schedule Trigger", Trigger),
            params: { "triggerTimes": { "item": [{ "mode": "everyDay" }] } },
            required: ["triggerTimes"];
        "webhook" => ("n8n-nodes-base.webhook", "Webhook", Trigger), version: 2,
            params: { "httpMethod": "POST", "path": "/webhook", "responseMode": "onReceived" },
            required: ["httpMethod", "path"];
        "email" => ("n8n-nodes-base.emailTrigger", "Email Trigger", Trigger),
            params: { "mailbox": "INBOX", "postProcessAction": "read" },
            required: ["mailbox"],
            credential: "imap";
        "form" => ("n8n-nodes-base.formTrigger", "Form Trigger", Trigger), version: 2,
            params: { "formTitle": "Submission Form" },
            required: ["formTitle"];
        "manual" => ("n8n-nodes-base.manualTrigger", "Manual Trigger", Trigger);

        // Actions
        "send_email" => ("n8n-nodes-base.emailSend", "Send Email", Action), version: 2,
            params: { "subject": "Workflow notification", "emailFormat": "text" },
            required: ["toEmail", "subject"],
            credential: "smtp",
            flags: [may_fail, error_output];
        "http_request" => ("n8n-nodes-base.httpRequest", "HTTP Request", Action), version: 4,
            params: { "requestMethod": "GET", "timeout": 10000, "followRedirect": true },
            required: ["url", "requestMethod"],
            flags: [may_fail, error_output];
        "database" => ("n8n-nodes-base.postgres", "Postgres", Action), version: 2,
            params: { "operation": "executeQuery" },
            required: ["query"],
            credential: "postgres",
            flags: [may_fail, error_output];
        "slack" => ("n8n-nodes-base.slack", "Slack", Action), version: 2,
            params: { "resource": "message", "operation": "post" },
            required: ["channel", "text"],
            credential: "slackApi",
            flags: [may_fail, error_output];
        "discord" => ("n8n-nodes-base.discord", "Discord", Action), version: 2,
            required: ["text"],
            credential: "discordWebhookApi",
            flags: [may_fail, error_output];
        "openai" => ("n8n-nodes-base.openAi", "OpenAI", Action),
            params: {
                "resource": "complete",
                "model": "gpt-3.5-turbo",
                "maxTokens": 1000,
                "temperature": 0.7
            },
            required: ["model", "prompt"],
            credential: "openAiApi",
            flags: [may_fail, error_output];
        "code" => ("n8n-nodes-base.code", "Code", Action), version: 2,
            params: {
                "language": "javascript",
                "mode": "runOnceForAllItems",
                "jsCode": PASS_THROUGH_CODE
            };

        // Conditions
        "condition" => ("n8n-nodes-base.if", "If", Condition), version: 2,
            params: {
                "conditions": { "string": [{ "value1": "={{$json.data}}", "operation": "isNotEmpty" }] }
            },
            required: ["conditions"],
            outputs: 2;
        "filter" => ("n8n-nodes-base.filter", "Filter", Condition), version: 2,
            params: {
                "conditions": { "string": [{ "value1": "={{$json.data}}", "operation": "isNotEmpty" }] }
            },
            required: ["conditions"];
        "switch" => ("n8n-nodes-base.switch", "Switch", Condition), version: 3,
            params: { "mode": "rules" },
            outputs: 4;

        // Data operations
        "transform" => ("n8n-nodes-base.set", "Transform Data", DataOp), version: 3,
            params: { "mode": "manual", "includeOtherFields": true };
        "map" => ("n8n-nodes-base.set", "Map Fields", DataOp), version: 3,
            params: { "mode": "manual", "includeOtherFields": false };
        "format" => ("n8n-nodes-base.set", "Format Data", DataOp), version: 3,
            params: { "mode": "manual", "includeOtherFields": true };
        "merge" => ("n8n-nodes-base.merge", "Merge", DataOp), version: 3,
            params: { "mode": "append" };
        "split" => ("n8n-nodes-base.splitInBatches", "Split In Batches", DataOp), version: 3,
            params: { "batchSize": 5 };
        "aggregate" => ("n8n-nodes-base.aggregate", "Aggregate", DataOp),
            params: { "aggregate": "aggregateAllItemData" };
    }
}
