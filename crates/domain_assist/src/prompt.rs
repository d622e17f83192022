//! Prompt assembly
//!
//! Every AI operation sends the same rendered case context followed by an
//! operation-specific instruction.

use std::fmt::Write;

use chrono::Utc;

use domain_cases::Case;

use crate::client::ChatMessage;

/// Most recent notes and communications included in the context
pub const RECENT_ENTRIES: usize = 5;

/// Chat turns kept from the conversation history
pub const MAX_HISTORY_TURNS: usize = 20;

const SYSTEM_PROMPT: &str = "You are an experienced return-to-work case management assistant \
for Australian workers' compensation (WorkCover) claims. You give practical, safe guidance to \
case managers. Never invent medical restrictions that are not supported by the case details; \
say when information is missing.";

const PLAN_INSTRUCTIONS: &str = "Draft a return-to-work plan for this worker. Use exactly these \
headings, each on its own line, with dash bullets underneath:

Suitable duties and tasks:
Duties to avoid:
Restrictions:
Hours schedule:
Review and next steps:

Under \"Hours schedule\" state the recommended starting hours per day as a number \
(for example \"4 hours per day\").";

const INSIGHTS_INSTRUCTIONS: &str = "Give a short summary of where this case stands, then list \
the key risks and recommended next actions as dash bullets.";

/// Plain-text rendering of the parts of a case the model should see
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseContext(String);

impl CaseContext {
    pub fn from_case(case: &Case) -> Self {
        let mut out = String::new();
        let today = Utc::now().date_naive();

        // Writing into a String cannot fail
        let _ = writeln!(out, "Claim number: {}", case.claim_number);
        let _ = writeln!(out, "Status: {} (priority {:?})", case.status.as_str(), case.priority);
        let _ = writeln!(out, "Worker: {}", case.worker.full_name());
        if let Some(occupation) = &case.worker.occupation {
            let _ = writeln!(out, "Occupation: {occupation}");
        }
        let _ = writeln!(out, "Employer: {}", case.employer.name);

        let injury = &case.injury;
        let _ = writeln!(
            out,
            "Injury: {} on {} ({} weeks ago)",
            injury.description,
            injury.date,
            case.weeks_since_injury(today)
        );
        if let Some(body_part) = &injury.body_part {
            let _ = writeln!(out, "Body part: {body_part}");
        }
        if let Some(mechanism) = &injury.mechanism {
            let _ = writeln!(out, "Mechanism: {mechanism}");
        }

        if let Some(piawe) = case.compensation.piawe {
            let _ = writeln!(out, "PIAWE: ${piawe}");
        }

        if let Some(plan) = &case.rtw_plan {
            let _ = writeln!(out, "\nCurrent RTW plan ({:?}):", plan.status);
            if !plan.goal.is_empty() {
                let _ = writeln!(out, "Goal: {}", plan.goal);
            }
            write_list(&mut out, "Suitable duties", &plan.suitable_duties);
            write_list(&mut out, "Restrictions", &plan.restrictions);
        }

        let mut notes: Vec<_> = case.notes.iter().collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if !notes.is_empty() {
            let _ = writeln!(out, "\nRecent notes:");
            for note in notes.into_iter().take(RECENT_ENTRIES) {
                let _ = writeln!(out, "- [{}] {}", note.created_at.date_naive(), note.body);
            }
        }

        let mut comms: Vec<_> = case.communications.iter().collect();
        comms.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        if !comms.is_empty() {
            let _ = writeln!(out, "\nRecent communications:");
            for comm in comms.into_iter().take(RECENT_ENTRIES) {
                let _ = writeln!(
                    out,
                    "- [{}] {:?} with {}: {} - {}",
                    comm.occurred_at.date_naive(),
                    comm.channel,
                    comm.contact,
                    comm.subject,
                    comm.summary
                );
            }
        }

        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn write_list(out: &mut String, label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "{label}:");
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
}

fn with_context(case: &Case, instructions: &str) -> Vec<ChatMessage> {
    let context = CaseContext::from_case(case);
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(format!("Case details:\n{}\n{}", context.as_str(), instructions)),
    ]
}

pub fn plan_prompt(case: &Case) -> Vec<ChatMessage> {
    with_context(case, PLAN_INSTRUCTIONS)
}

pub fn insights_prompt(case: &Case) -> Vec<ChatMessage> {
    with_context(case, INSIGHTS_INSTRUCTIONS)
}

/// System prompt with case context, the last `MAX_HISTORY_TURNS` of
/// history, then the new question
pub fn chat_messages(case: &Case, history: &[ChatMessage], question: &str) -> Vec<ChatMessage> {
    let context = CaseContext::from_case(case);
    let skip = history.len().saturating_sub(MAX_HISTORY_TURNS);

    let mut messages = Vec::with_capacity(history.len() - skip + 2);
    messages.push(ChatMessage::system(format!(
        "{SYSTEM_PROMPT}\n\nYou are answering questions about this case:\n{}",
        context.as_str()
    )));
    messages.extend(
        history[skip..]
            .iter()
            .filter(|m| m.role != crate::client::ChatRole::System)
            .cloned(),
    );
    messages.push(ChatMessage::user(question));
    messages
}
