//! Terminal output formatter

use super::SubjectRow;
use studyroot_core::{AskResponse, HistoryEntry};

pub fn format_response(response: &AskResponse) -> String {
    let mut output = String::new();

    match response {
        AskResponse::Answered {
            answer,
            deep_explanation,
            cached,
            source,
            classification,
        } => {
            output.push_str(answer);
            output.push('\n');

            if let Some(explanation) = deep_explanation {
                output.push_str("\nIn other words:\n");
                output.push_str(explanation);
                output.push('\n');
            }

            let mut footer = format!("\n[source: {}", source.as_str());
            if *cached {
                footer.push_str(", cached");
            }
            if let Some(classification) = classification {
                footer.push_str(&format!(", type: {}", classification));
            }
            footer.push_str("]\n");
            output.push_str(&footer);
        }
        AskResponse::DeepExplanationFailed { answer, error, .. } => {
            output.push_str(answer);
            output.push_str(&format!("\n\n{}\n", error));
        }
        AskResponse::Failed { error, .. } => {
            output.push_str(&format!("{}\n", error));
        }
    }

    output
}

pub fn format_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No history\n".to_string();
    }

    let mut output = String::new();
    for entry in entries {
        output.push_str(&format!(
            "#{} {} [{}]\nQ: {}\n",
            entry.id, entry.created_at, entry.subject, entry.question
        ));
        for line in entry.answer.lines().take(3) {
            output.push_str(&format!("  {}\n", line));
        }
        if entry.answer.lines().count() > 3 {
            output.push_str("  ...\n");
        }
        output.push('\n');
    }

    output
}

pub fn format_subjects(subjects: &[SubjectRow]) -> String {
    let mut output = String::new();
    for subject in subjects {
        let status = if subject.exists { "" } else { " (missing)" };
        output.push_str(&format!("{:<8} {}{}\n", subject.key, subject.path.display(), status));
        if !subject.aliases.is_empty() {
            output.push_str(&format!("         aliases: {}\n", subject.aliases.join(", ")));
        }
    }
    output
}
