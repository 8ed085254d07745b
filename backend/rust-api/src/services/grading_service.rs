use std::collections::HashMap;

use crate::models::course::LessonQuestion;
use crate::models::exam::ExamDefinition;
use crate::models::result::WrongAnswer;

/// Recorded in place of a blank submission.
pub const NO_ANSWER_PLACEHOLDER: &str = "No answer given";

#[derive(Debug, Clone)]
pub struct GradingOutcome {
    pub correct_count: usize,
    pub total_questions: usize,
    /// 0-10, two decimals; 0 for an exam with no questions.
    pub score: f64,
    pub wrong_answers: Vec<WrongAnswer>,
}

/// The option label before the first period, used by exercise grading.
/// Lesson exercises accept any answer carrying the right letter ("A. Paris"
/// and "a" both pick option A), case-insensitively.
pub fn answer_token(text: &str) -> String {
    text.split('.')
        .next()
        .unwrap_or("")
        .trim()
        .to_uppercase()
}

fn matches_token(submitted: &str, correct: &str) -> bool {
    let submitted_token = answer_token(submitted);
    let correct_token = answer_token(correct);
    !submitted_token.is_empty() && !correct_token.is_empty() && submitted_token == correct_token
}

/// Exams compare the whole trimmed answer text against the key, ignoring
/// case. The label alone is not enough: "A. London" against the key
/// "A. Paris" is a wrong answer, not a pick of option A.
fn matches_exam_key(submitted: &str, correct: &str) -> bool {
    let submitted = submitted.trim();
    let correct = correct.trim();
    !submitted.is_empty() && !correct.is_empty() && submitted.to_lowercase() == correct.to_lowercase()
}

/// Grade a full exam submission. `answers` maps question id (stringified)
/// to the submitted text. Mismatches come back in question order with
/// everything the review screen needs.
pub fn grade_exam(exam: &ExamDefinition, answers: &HashMap<String, String>) -> GradingOutcome {
    let total_questions = exam.questions.len();
    let mut correct_count = 0;
    let mut wrong_answers = Vec::new();

    for question in &exam.questions {
        let submitted = answers
            .get(&question.id.to_string())
            .map(|s| s.trim())
            .unwrap_or("");

        if !submitted.is_empty() && matches_exam_key(submitted, &question.correct_answer) {
            correct_count += 1;
        } else {
            wrong_answers.push(WrongAnswer {
                question_number: question.number,
                question_text: question.question.clone(),
                user_answer: if submitted.is_empty() {
                    NO_ANSWER_PLACEHOLDER.to_string()
                } else {
                    submitted.to_string()
                },
                correct_answer: question.correct_answer.trim().to_string(),
                explanation: question.explanation.clone(),
            });
        }
    }

    let score = if total_questions > 0 {
        round2(correct_count as f64 / total_questions as f64 * 10.0)
    } else {
        0.0
    };

    GradingOutcome {
        correct_count,
        total_questions,
        score,
        wrong_answers,
    }
}

/// Grade a lesson exercise block. `answers` is keyed by question index.
/// Exercises report on a 0-100 scale with one decimal; the distinction from
/// the exam scale is deliberate.
pub fn grade_exercise(
    questions: &[LessonQuestion],
    answers: &HashMap<String, String>,
) -> (usize, usize, f64) {
    let total = questions.len();
    let mut correct = 0;

    for (index, question) in questions.iter().enumerate() {
        let submitted = answers
            .get(&index.to_string())
            .map(|s| s.trim())
            .unwrap_or("");
        if !submitted.is_empty() && matches_token(submitted, &question.correct_answer) {
            correct += 1;
        }
    }

    let score = if total > 0 {
        round1(correct as f64 / total as f64 * 100.0)
    } else {
        0.0
    };

    (correct, total, score)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
