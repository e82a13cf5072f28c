//! Quiz scoring

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use digiskill_core::{Error, Result};

use crate::questions::{Difficulty, find_question};

/// One answered question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAnswer {
    pub question_id: i64,
    pub selected_answer: i64,
    #[serde(default)]
    pub time_taken: f64,
}

/// A full quiz attempt as sent by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSubmission {
    pub user_id: String,
    pub answers: Vec<QuizAnswer>,
    pub total_time: f64,
}

/// Correct answers out of total for one skill or difficulty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub correct: u32,
    pub total: u32,
    pub percentage: u32,
}

impl Breakdown {
    fn record(&mut self, is_correct: bool) {
        self.total += 1;
        if is_correct {
            self.correct += 1;
        }
    }

    fn finish(&mut self) {
        self.percentage = percentage(self.correct as usize, self.total as usize);
    }
}

/// Score and analysis returned to the client after a submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
    pub skill_analysis: BTreeMap<String, Breakdown>,
    pub difficulty_analysis: BTreeMap<Difficulty, Breakdown>,
    pub time_taken: f64,
}

/// A stored quiz result: the summary plus the submitted answers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResult {
    #[serde(flatten)]
    pub summary: ScoreSummary,
    pub answers: Vec<QuizAnswer>,
}

/// Percentage rounded half to even, so 12.5 becomes 12 and 13.5 becomes 14
pub fn percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (correct as f64 / total as f64 * 100.0).round_ties_even() as u32
}

/// Score a submission against the question bank.
///
/// Answers to unknown questions are left out of the score and the analysis
/// but still count toward the total.
pub fn score_submission(submission: &QuizSubmission) -> Result<QuizResult> {
    if submission.answers.is_empty() {
        return Err(Error::InvalidInput("Quiz submission has no answers".to_string()));
    }

    let mut score = 0;
    let mut skill_analysis: BTreeMap<String, Breakdown> = BTreeMap::new();
    let mut difficulty_analysis: BTreeMap<Difficulty, Breakdown> = BTreeMap::new();

    for answer in &submission.answers {
        let Some(question) = find_question(answer.question_id) else {
            continue;
        };

        let is_correct = usize::try_from(answer.selected_answer).is_ok_and(|selected| selected == question.correct);
        if is_correct {
            score += 1;
        }

        skill_analysis.entry(question.skill.to_string()).or_default().record(is_correct);
        difficulty_analysis.entry(question.difficulty).or_default().record(is_correct);
    }

    skill_analysis.values_mut().for_each(Breakdown::finish);
    difficulty_analysis.values_mut().for_each(Breakdown::finish);

    let total = submission.answers.len();
    Ok(QuizResult {
        summary: ScoreSummary {
            score,
            total,
            percentage: percentage(score, total),
            skill_analysis,
            difficulty_analysis,
            time_taken: submission.total_time,
        },
        answers: submission.answers.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::question_bank;

    fn answer(question_id: i64, selected_answer: i64) -> QuizAnswer {
        QuizAnswer {
            question_id,
            selected_answer,
            time_taken: 0.0,
        }
    }

    fn submission(answers: Vec<QuizAnswer>) -> QuizSubmission {
        QuizSubmission {
            user_id: "user_1".to_string(),
            answers,
            total_time: 30.0,
        }
    }

    #[test]
    fn test_percentage_rounds_half_to_even() {
        assert_eq!(percentage(1, 8), 12);
        assert_eq!(percentage(5, 8), 62);
        assert_eq!(percentage(3, 8), 38);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn test_all_correct() {
        let answers = question_bank()
            .iter()
            .map(|q| answer(i64::from(q.id), q.correct as i64))
            .collect();
        let result = score_submission(&submission(answers)).unwrap();

        assert_eq!(result.summary.score, 10);
        assert_eq!(result.summary.total, 10);
        assert_eq!(result.summary.percentage, 100);
        assert_eq!(result.summary.skill_analysis["Cybersecurity"].total, 7);
        assert_eq!(result.summary.skill_analysis["Web Fundamentals"].total, 3);
        assert_eq!(result.summary.difficulty_analysis[&Difficulty::Advanced].correct, 2);
        assert_eq!(result.answers.len(), 10);
    }

    #[test]
    fn test_unknown_questions_count_toward_total() {
        let result = score_submission(&submission(vec![answer(1, 1), answer(99, 0)])).unwrap();

        assert_eq!(result.summary.score, 1);
        assert_eq!(result.summary.total, 2);
        assert_eq!(result.summary.percentage, 50);
        assert_eq!(result.summary.skill_analysis.len(), 1);
        assert_eq!(result.summary.skill_analysis["Web Fundamentals"].percentage, 100);
    }

    #[test]
    fn test_ids_outside_the_bank_range() {
        let result = score_submission(&submission(vec![
            answer(1, 1),
            answer(-5, 0),
            answer(i64::from(u32::MAX) + 1, 0),
        ]))
        .unwrap();

        assert_eq!(result.summary.score, 1);
        assert_eq!(result.summary.total, 3);
        assert_eq!(result.summary.percentage, 33);
        assert_eq!(result.answers[1].question_id, -5);
    }

    #[test]
    fn test_out_of_range_answers_are_wrong() {
        let result = score_submission(&submission(vec![answer(2, -1), answer(3, 7)])).unwrap();
        assert_eq!(result.summary.score, 0);
        assert_eq!(result.summary.difficulty_analysis[&Difficulty::Intermediate].total, 2);
    }

    #[test]
    fn test_empty_submission_is_rejected() {
        let err = score_submission(&submission(Vec::new())).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_missing_time_taken_defaults_to_zero() {
        let answer: QuizAnswer = serde_json::from_str(r#"{"question_id": 3, "selected_answer": 1}"#).unwrap();
        assert_eq!(answer.time_taken, 0.0);
    }
}
