use crate::error::{PodTrustError, Result};
use crate::types::config::QuizSettings;
use crate::verification::question_bank::{Question, QuizLanguage, SkillLanguageTable};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Correct answers needed to pass: ceil(pass_percent% of total).
pub fn required_correct(total: usize, pass_percent: u32) -> usize {
    let pass_percent = pass_percent as usize;
    (total * pass_percent + 99) / 100
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    pub skill: String,
    pub language: QuizLanguage,
    pub seed: u64,
    pub questions: Vec<&'static Question>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: &'static str,
    pub prompt: &'static str,
    pub options: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOutcome {
    pub passed: bool,
    pub score: usize,
    pub total: usize,
    pub required: usize,
}

impl QuizSession {
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Questions without their answer keys.
    pub fn views(&self) -> Vec<QuestionView> {
        self.questions
            .iter()
            .map(|question| QuestionView {
                id: question.id,
                prompt: question.prompt,
                options: question.options,
            })
            .collect()
    }
}

fn ordering_key(seed: u64, question: &Question) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(question.id.as_bytes());
    let mut key = [0u8; 32];
    key.copy_from_slice(&hasher.finalize());
    key
}

/// Picks the quiz for `skill`. The same seed always yields the same
/// questions in the same order, so a submission can be graded later.
pub fn select_questions(
    skill: &str,
    seed: u64,
    table: &SkillLanguageTable,
    settings: &QuizSettings,
) -> Result<QuizSession> {
    if settings.max_questions < settings.min_questions {
        return Err(PodTrustError::Validation(format!(
            "quiz size limits are inverted: max_questions {} is below min_questions {}",
            settings.max_questions, settings.min_questions
        )));
    }

    let language = table.resolve(skill);
    let bank = language.questions();
    if bank.len() < settings.min_questions {
        return Err(PodTrustError::Validation(format!(
            "{language} question bank has {} questions; at least {} are required",
            bank.len(),
            settings.min_questions
        )));
    }

    let mut ordered = bank.iter().collect::<Vec<_>>();
    ordered.sort_by_cached_key(|question| ordering_key(seed, question));
    ordered.truncate(settings.max_questions);

    Ok(QuizSession {
        skill: skill.trim().to_string(),
        language,
        seed,
        questions: ordered,
    })
}

/// Grades one attempt. Unanswered trailing questions count as wrong.
pub fn grade(session: &QuizSession, answers: &[usize], settings: &QuizSettings) -> Result<QuizOutcome> {
    let total = session.total();
    if answers.len() > total {
        return Err(PodTrustError::Validation(format!(
            "received {} answers for a {total}-question quiz",
            answers.len()
        )));
    }

    let score = session
        .questions
        .iter()
        .zip(answers)
        .filter(|(question, answer)| question.answer == **answer)
        .count();
    let required = required_correct(total, settings.pass_percent);

    Ok(QuizOutcome {
        passed: score >= required,
        score,
        total,
        required,
    })
}
