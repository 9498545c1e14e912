//! Tutor panel navigation commands
//!
//! Two forms move the player: a user typing `go to step N` anywhere in a
//! message (any case), and a model reply carrying `[[STEP]]N[[/STEP]]`.
//! Step numbers are 1-based; out-of-range numbers clamp through the player.
//! Other questions go to the model with a short summary of the current step.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use crate::trace::{ProblemTrace, Step};

const USER_PHRASE: &str = "go to step";
const STEP_OPEN: &str = "[[STEP]]";
const STEP_CLOSE: &str = "[[/STEP]]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorCommand {
    /// Jump to a 1-based step number
    GoToStep(u64),
}

impl TutorCommand {
    /// Command typed by the user
    pub fn from_user_message(text: &str) -> Option<Self> {
        // ASCII lowering keeps byte offsets valid in `text`
        let lowered = text.to_ascii_lowercase();
        lowered
            .match_indices(USER_PHRASE)
            .find_map(|(at, phrase)| {
                let rest = lowered[at + phrase.len()..].strip_prefix(' ')?;
                leading_number(rest).map(|(number, _)| Self::GoToStep(number))
            })
    }

    /// Command embedded in a model reply
    pub fn from_reply(text: &str) -> Option<Self> {
        text.match_indices(STEP_OPEN).find_map(|(at, open)| {
            let (number, tail) = leading_number(&text[at + open.len()..])?;
            tail.starts_with(STEP_CLOSE)
                .then_some(Self::GoToStep(number))
        })
    }

    /// Whether a user message asks for navigation at all, even unparseably
    pub fn is_navigation_request(text: &str) -> bool {
        text.to_ascii_lowercase().contains(USER_PHRASE)
    }

    /// Zero-based index handed to `go_to`; step 0 maps to -1 and clamps
    pub fn target_index(self) -> isize {
        match self {
            Self::GoToStep(number) => isize::try_from(number)
                .unwrap_or(isize::MAX)
                .saturating_sub(1),
        }
    }
}

/// Leading ASCII digits of `text` and the remainder; overlong numbers saturate
fn leading_number(text: &str) -> Option<(u64, &str)> {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    if end == 0 {
        return None;
    }
    let number = text[..end].parse().unwrap_or(u64::MAX);
    Some((number, &text[end..]))
}

/// Reply shown after a navigation command lands on `index`
pub fn step_change_message(index: usize, step: Option<&Step>) -> String {
    let description = step
        .map(|s| s.description.as_str())
        .filter(|d| !d.is_empty())
        .unwrap_or("No description available");
    format!("Moving to step {}: {description}", index + 1)
}

/// Question for the model, prefixed with where the user is in `trace`
pub fn tutor_prompt(trace: &ProblemTrace, index: usize, message: &str) -> String {
    let description = trace
        .steps
        .get(index)
        .map(|s| s.description.as_str())
        .filter(|d| !d.is_empty())
        .unwrap_or("None");
    let complexity = serde_json::to_string(&trace.time_complexity).unwrap_or_default();
    [
        format!("Current Algorithm: {}", trace.title),
        format!("Current Step: {} of {}", index + 1, trace.step_count()),
        format!("Step Description: {description}"),
        format!("Time Complexity: {complexity}"),
        format!("User Query: {message}"),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_command_any_case() {
        assert_eq!(
            TutorCommand::from_user_message("Please GO TO STEP 4 now"),
            Some(TutorCommand::GoToStep(4))
        );
        assert_eq!(
            TutorCommand::from_user_message("go to step 12"),
            Some(TutorCommand::GoToStep(12))
        );
    }

    #[test]
    fn test_user_command_needs_number() {
        assert_eq!(TutorCommand::from_user_message("go to step two"), None);
        assert_eq!(TutorCommand::from_user_message("go to step"), None);
        assert!(TutorCommand::is_navigation_request("Go to step two"));
        assert!(!TutorCommand::is_navigation_request("what is a pivot?"));
    }

    #[test]
    fn test_later_match_used_when_first_incomplete() {
        assert_eq!(
            TutorCommand::from_user_message("go to step x, no, go to step 3"),
            Some(TutorCommand::GoToStep(3))
        );
    }

    #[test]
    fn test_reply_command() {
        assert_eq!(
            TutorCommand::from_reply("Let's look at [[STEP]]2[[/STEP]] together."),
            Some(TutorCommand::GoToStep(2))
        );
        assert_eq!(TutorCommand::from_reply("[[STEP]]2"), None);
        assert_eq!(TutorCommand::from_reply("[[STEP]][[/STEP]]"), None);
        assert_eq!(TutorCommand::from_reply("step 2"), None);
    }

    #[test]
    fn test_target_index() {
        assert_eq!(TutorCommand::GoToStep(1).target_index(), 0);
        assert_eq!(TutorCommand::GoToStep(0).target_index(), -1);
        let huge = TutorCommand::from_reply("[[STEP]]99999999999999999999999[[/STEP]]").unwrap();
        assert_eq!(huge, TutorCommand::GoToStep(u64::MAX));
        assert!(huge.target_index() > 0);
    }

    #[test]
    fn test_step_change_message() {
        assert_eq!(
            step_change_message(0, None),
            "Moving to step 1: No description available"
        );
    }

    #[test]
    fn test_tutor_prompt_describes_position() {
        let trace = ProblemTrace::from_json_str(
            r#"{
                "title": "Bubble Sort",
                "timeComplexity": {"best": "O(n)", "worst": "O(n^2)"},
                "steps": [
                    {"description": "compare", "visualElements": []},
                    {"visualElements": []}
                ]
            }"#,
        )
        .unwrap();

        let prompt = tutor_prompt(&trace, 1, "why?");
        let lines: Vec<_> = prompt.lines().collect();
        assert_eq!(lines[0], "Current Algorithm: Bubble Sort");
        assert_eq!(lines[1], "Current Step: 2 of 2");
        assert_eq!(lines[2], "Step Description: None");
        assert!(lines[3].starts_with("Time Complexity: {\"best\":\"O(n)\""));
        assert_eq!(lines[4], "User Query: why?");
        assert!(tutor_prompt(&trace, 0, "x").contains("Step Description: compare"));
    }
}
