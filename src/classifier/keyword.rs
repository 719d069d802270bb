use super::{
    ActionMention, ClassificationResult, Classifier, Entities, ScheduleHint, ScheduleInterval,
};
use crate::taxonomy::{KeywordCategory, Taxonomy, TriggerType};
use tracing::debug;

/// Keyword and regex based classifier.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    taxonomy: Taxonomy,
}

/// Lower-cases the text and splits it on every non-alphanumeric character.
pub(crate) fn tokenize(description: &str) -> Vec<String> {
    description
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

impl KeywordClassifier {
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// First pattern that matches wins; no match selects the default trigger.
    pub fn detect_trigger(&self, description: &str) -> TriggerType {
        self.taxonomy
            .trigger_patterns()
            .iter()
            .find(|p| p.matches(description))
            .map(|p| p.trigger)
            .unwrap_or_else(|| self.taxonomy.default_trigger())
    }

    /// Scans the priority list in order and returns the first whole-token hit.
    pub fn primary_action(&self, tokens: &[String]) -> String {
        self.taxonomy
            .action_priority()
            .iter()
            .find(|action| tokens.contains(action))
            .cloned()
            .unwrap_or_else(|| self.taxonomy.default_action().to_string())
    }

    fn found(&self, category: KeywordCategory, tokens: &[String]) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        for token in tokens {
            if self.taxonomy.is_keyword(category, token) && !found.contains(token) {
                found.push(token.clone());
            }
        }
        found
    }

    fn action_mentions(&self, tokens: &[String]) -> Vec<ActionMention> {
        let verb_positions: Vec<usize> = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| self.taxonomy.is_keyword(KeywordCategory::Action, t))
            .map(|(i, _)| i)
            .collect();

        let mut mentions: Vec<ActionMention> = Vec::new();
        for (n, &start) in verb_positions.iter().enumerate() {
            let end = verb_positions.get(n + 1).copied().unwrap_or(tokens.len());
            let service = tokens[start + 1..end]
                .iter()
                .find_map(|t| self.taxonomy.service_key(t).map(|key| (t.clone(), key)));

            let mention = ActionMention {
                verb: tokens[start].clone(),
                service: service.as_ref().map(|(token, _)| token.clone()),
                service_key: service.map(|(_, key)| key.to_string()),
            };
            let duplicate = mentions
                .iter()
                .any(|m| m.verb == mention.verb && m.service_key == mention.service_key);
            if !duplicate {
                mentions.push(mention);
            }
        }
        mentions
    }

    fn schedule_hint(&self, description: &str, tokens: &[String]) -> ScheduleHint {
        let every = |unit: &str| {
            tokens
                .windows(2)
                .any(|pair| pair[0] == "every" && pair[1] == unit)
        };
        let has = |word: &str| tokens.iter().any(|t| t == word);

        let interval = if has("hourly") || every("hour") {
            ScheduleInterval::EveryHour
        } else if has("weekly") || every("week") {
            ScheduleInterval::EveryWeek
        } else if has("monthly") || every("month") {
            ScheduleInterval::EveryMonth
        } else {
            ScheduleInterval::EveryDay
        };

        let (hour, minute) = self.clock_time(description).unzip();
        ScheduleHint {
            interval,
            hour,
            minute,
        }
    }

    /// Reads `at 9am`, `at 5 pm` or `at 17:30`. A bare `at 9` is ignored.
    fn clock_time(&self, description: &str) -> Option<(u32, u32)> {
        self.taxonomy
            .time_regex()
            .captures_iter(description)
            .find_map(|caps| {
                let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
                let minute = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
                let meridiem = caps.get(3).map(|m| m.as_str().to_lowercase());
                if minute.is_none() && meridiem.is_none() {
                    return None;
                }
                let hour = match meridiem.as_deref() {
                    Some("am") if hour == 12 => 0,
                    Some("pm") if hour < 12 => hour + 12,
                    Some(_) if hour > 12 => return None,
                    _ => hour,
                };
                let minute = minute.unwrap_or(0);
                (hour < 24 && minute < 60).then_some((hour, minute))
            })
    }

    fn entities(&self, description: &str) -> Entities {
        let collect = |regex: &regex::Regex| -> Vec<String> {
            let mut out: Vec<String> = Vec::new();
            for m in regex.find_iter(description) {
                let value = m.as_str().to_string();
                if !out.contains(&value) {
                    out.push(value);
                }
            }
            out
        };
        Entities {
            urls: collect(self.taxonomy.url_regex()),
            emails: collect(self.taxonomy.email_regex()),
        }
    }
}

impl Classifier for KeywordClassifier {
    fn classify(&self, description: &str) -> ClassificationResult {
        let tokens = tokenize(description);
        let trigger = self.detect_trigger(description);
        let schedule =
            (trigger == TriggerType::Schedule).then(|| self.schedule_hint(description, &tokens));

        let result = ClassificationResult {
            trigger,
            primary_action: self.primary_action(&tokens),
            actions: self.action_mentions(&tokens),
            trigger_keywords: self.found(KeywordCategory::Trigger, &tokens),
            conditions: self.found(KeywordCategory::Condition, &tokens),
            data_ops: self.found(KeywordCategory::DataOp, &tokens),
            schedule,
            entities: self.entities(description),
        };

        debug!(
            trigger = %result.trigger,
            primary_action = %result.primary_action,
            actions = result.actions.len(),
            conditions = ?result.conditions,
            data_ops = ?result.data_ops,
            "classified description"
        );
        result
    }
}
