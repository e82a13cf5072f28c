//! In-memory storage for profiles, quiz results and chat history

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use digiskill_core::{Error, Result};

use crate::scoring::QuizResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub age: i64,
    pub goal: String,
    pub experience: String,
}

/// One question and answer of a chat conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatExchange {
    pub user_message: String,
    pub bot_response: String,
    pub timestamp: String,
}

impl ChatExchange {
    /// Create an exchange stamped with the current time (RFC 3339)
    pub fn new(user_message: impl Into<String>, bot_response: impl Into<String>) -> Self {
        Self {
            user_message: user_message.into(),
            bot_response: bot_response.into(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Process-lifetime store; nothing is persisted
#[derive(Default)]
pub struct AssessmentStore {
    profiles: RwLock<HashMap<String, UserProfile>>,
    results: RwLock<HashMap<String, QuizResult>>,
    chats: RwLock<HashMap<String, Vec<ChatExchange>>>,
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>> {
    lock.read().map_err(|e| Error::Storage(format!("Lock error: {}", e)))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>> {
    lock.write().map_err(|e| Error::Storage(format!("Lock error: {}", e)))
}

impl AssessmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a profile under the next sequential id (`user_1`, `user_2`, ...)
    pub fn save_profile(&self, profile: UserProfile) -> Result<String> {
        let mut profiles = write(&self.profiles)?;
        let user_id = format!("user_{}", profiles.len() + 1);
        profiles.insert(user_id.clone(), profile);
        Ok(user_id)
    }

    pub fn profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        Ok(read(&self.profiles)?.get(user_id).cloned())
    }

    pub fn has_profile(&self, user_id: &str) -> Result<bool> {
        Ok(read(&self.profiles)?.contains_key(user_id))
    }

    /// Record a quiz result, replacing any earlier attempt
    pub fn record_result(&self, user_id: &str, result: QuizResult) -> Result<()> {
        write(&self.results)?.insert(user_id.to_string(), result);
        Ok(())
    }

    pub fn result(&self, user_id: &str) -> Result<Option<QuizResult>> {
        Ok(read(&self.results)?.get(user_id).cloned())
    }

    pub fn append_chat(&self, user_id: &str, exchange: ChatExchange) -> Result<()> {
        write(&self.chats)?
            .entry(user_id.to_string())
            .or_default()
            .push(exchange);
        Ok(())
    }

    /// Chat history in insertion order; empty for unknown users
    pub fn chat_history(&self, user_id: &str) -> Result<Vec<ChatExchange>> {
        Ok(read(&self.chats)?.get(user_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{QuizAnswer, QuizSubmission, score_submission};

    fn profile(name: &str) -> UserProfile {
        UserProfile {
            name: name.to_string(),
            age: 30,
            goal: "Learn online safety".to_string(),
            experience: "beginner".to_string(),
        }
    }

    #[test]
    fn test_sequential_user_ids() {
        let store = AssessmentStore::new();
        assert_eq!(store.save_profile(profile("Asha")).unwrap(), "user_1");
        assert_eq!(store.save_profile(profile("Ravi")).unwrap(), "user_2");

        assert_eq!(store.profile("user_2").unwrap().unwrap().name, "Ravi");
        assert!(store.has_profile("user_1").unwrap());
        assert!(!store.has_profile("user_3").unwrap());
        assert!(store.profile("user_3").unwrap().is_none());
    }

    #[test]
    fn test_profile_age_accepts_any_integer() {
        for age in [-3_i64, 3_000_000_000] {
            let raw = format!(r#"{{"name": "Asha", "age": {age}, "goal": "Email", "experience": "none"}}"#);
            let profile: UserProfile = serde_json::from_str(&raw).unwrap();
            assert_eq!(profile.age, age);
        }
    }

    #[test]
    fn test_result_is_overwritten() {
        let store = AssessmentStore::new();
        let attempt = |selected: i64| {
            let submission = QuizSubmission {
                user_id: "user_1".to_string(),
                answers: vec![QuizAnswer { question_id: 1, selected_answer: selected, time_taken: 2.5 }],
                total_time: 2.5,
            };
            score_submission(&submission).unwrap()
        };

        store.record_result("user_1", attempt(0)).unwrap();
        store.record_result("user_1", attempt(1)).unwrap();

        let stored = store.result("user_1").unwrap().unwrap();
        assert_eq!(stored.summary.score, 1);
        assert!(store.result("user_2").unwrap().is_none());
    }

    #[test]
    fn test_chat_history() {
        let store = AssessmentStore::new();
        assert!(store.chat_history("anonymous").unwrap().is_empty());

        store.append_chat("anonymous", ChatExchange::new("hi", "hello")).unwrap();
        store.append_chat("anonymous", ChatExchange::new("what is a VPN?", "A virtual private network.")).unwrap();
        store.append_chat("user_1", ChatExchange::new("hey", "hello")).unwrap();

        let history = store.chat_history("anonymous").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].user_message, "what is a VPN?");
        assert!(chrono::DateTime::parse_from_rfc3339(&history[0].timestamp).is_ok());
    }
}
