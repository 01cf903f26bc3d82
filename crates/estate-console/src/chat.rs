//! Local, single-session chat model. Nothing here is persisted or delivered
//! anywhere; the conversation opener is scripted and replies are appended
//! only by the signed-in user.

use chrono::{DateTime, Local};

use crate::catalog::domain::{find_agent_by_email, Agent};

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: u32,
    pub sender_name: String,
    pub sender_email: String,
    pub body: String,
    pub timestamp: String,
    pub is_own: bool,
}

/// One in-memory conversation between the signed-in user and a chat partner
/// identified by email.
#[derive(Debug, Clone)]
pub struct ChatSession {
    own_name: String,
    own_email: String,
    partner_email: String,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Seed the scripted opener addressed to the user's first name.
    pub fn scripted(own_name: &str, own_email: &str, partner_email: &str) -> Self {
        let greeting_name = if own_name.trim().is_empty() {
            "there"
        } else {
            own_name
        };

        let script: [(&str, bool); 5] = [
            (
                "Hi {name}! I have a client interested in the Windermere property. Are you available for a showing this week?",
                false,
            ),
            (
                "Absolutely! I can do Tuesday or Wednesday afternoon. What's your client's budget range?",
                true,
            ),
            (
                "Great! Their budget is around $1.5 million. They loved the photos and are eager to see it in person.",
                false,
            ),
            (
                "Perfect, I can show it Tuesday at 3 PM. Does that work for them?",
                true,
            ),
            (
                "Yes, that works! I'll confirm with them and send you the details.",
                false,
            ),
        ];
        let opener_times = ["2:30 PM", "2:32 PM", "2:35 PM", "2:37 PM", "2:40 PM"];

        let messages = script
            .iter()
            .zip(opener_times)
            .enumerate()
            .map(|(index, ((body, is_own), timestamp))| ChatMessage {
                id: index as u32 + 1,
                sender_name: if *is_own { "You" } else { "Agent" }.to_string(),
                sender_email: if *is_own { own_email } else { partner_email }.to_string(),
                body: body.replace("{name}", greeting_name),
                timestamp: timestamp.to_string(),
                is_own: *is_own,
            })
            .collect();

        Self {
            own_name: own_name.to_string(),
            own_email: own_email.to_string(),
            partner_email: partner_email.to_string(),
            messages,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn own_name(&self) -> &str {
        &self.own_name
    }

    pub fn partner_email(&self) -> &str {
        &self.partner_email
    }

    /// Append an own-message. Blank bodies are dropped, mirroring the send
    /// button being a no-op on empty input.
    pub fn send(&mut self, body: &str, now: DateTime<Local>) -> Option<&ChatMessage> {
        let body = body.trim();
        if body.is_empty() {
            return None;
        }

        let message = ChatMessage {
            id: self.messages.len() as u32 + 1,
            sender_name: "You".to_string(),
            sender_email: self.own_email.clone(),
            body: body.to_string(),
            timestamp: now.format("%l:%M %p").to_string().trim().to_string(),
            is_own: true,
        };
        self.messages.push(message);
        self.messages.last()
    }

    /// Resolve the partner's agent record, matching email case-insensitively.
    pub fn partner<'a>(&self, agents: &'a [Agent]) -> Option<&'a Agent> {
        find_agent_by_email(agents, &self.partner_email)
    }
}
