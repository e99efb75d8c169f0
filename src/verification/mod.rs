//! Per-(user, skill) verification progress.
//!
//! Two alternative tracks lead to a trusted skill: quiz (level 1) followed
//! by a coding test (level 2), or a reviewed certificate. Both end in the
//! same completion transition, and only a completed record lets a new
//! skill be written into the user's profile.

pub mod certificate;
pub mod coding;
pub mod question_bank;
pub mod quiz;

use crate::analysis::{ContentAnalyzer, ImageAttachment};
use crate::clock::Clock;
use crate::error::{PodTrustError, Result};
use crate::types::config::{CodingSettings, QuizSettings};
use crate::types::verification::{SkillVerificationRecord, VerificationMethod, VerificationState};
use certificate::CertificateVerdict;
use chrono::{DateTime, NaiveDate, Utc};
use coding::{CodingTestOutcome, SnippetRunner};
use question_bank::SkillLanguageTable;
use quiz::{QuizOutcome, QuizSession};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationEvent {
    QuizGraded { passed: bool, score: u32 },
    CodingTestEvaluated { passed: bool },
    CertificateReviewed { verified: bool },
}

impl VerificationEvent {
    pub fn method(self) -> VerificationMethod {
        match self {
            Self::QuizGraded { .. } | Self::CodingTestEvaluated { .. } => VerificationMethod::Quiz,
            Self::CertificateReviewed { .. } => VerificationMethod::Certificate,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::QuizGraded { .. } => "quiz graded",
            Self::CodingTestEvaluated { .. } => "coding test evaluated",
            Self::CertificateReviewed { .. } => "certificate reviewed",
        }
    }
}

/// Applies one event to a record. Completed records are left untouched.
pub fn apply_event(
    record: &mut SkillVerificationRecord,
    event: VerificationEvent,
    now: DateTime<Utc>,
) -> Result<()> {
    if record.level3_complete() {
        debug!(skill = %record.skill, event = event.label(), "skill already verified; event ignored");
        return Ok(());
    }

    let before = record.state;
    match event {
        VerificationEvent::QuizGraded { passed, score } => {
            record.score = Some(score);
            if passed {
                record.level1_quiz_passed = true;
            }
            if matches!(
                record.state,
                VerificationState::NotVerified
                    | VerificationState::QuizAttempted
                    | VerificationState::CertificateSubmitted
            ) {
                record.state = if record.level1_quiz_passed {
                    VerificationState::QuizPassed
                } else {
                    VerificationState::QuizAttempted
                };
            }
        }
        VerificationEvent::CodingTestEvaluated { passed } => {
            if !record.level1_quiz_passed {
                return Err(PodTrustError::InvalidTransition {
                    from: record.state.to_string(),
                    event: event.label().to_string(),
                });
            }
            if passed {
                record.level2_coding_test_passed = true;
                record.state = VerificationState::CodingTestPassed;
            } else {
                record.state = VerificationState::CodingTestSubmitted;
            }
        }
        VerificationEvent::CertificateReviewed { verified } => {
            if verified {
                record.certificate_verified = true;
                record.state = VerificationState::CertificateVerified;
            } else if record.state == VerificationState::NotVerified {
                record.state = VerificationState::CertificateSubmitted;
            }
        }
    }

    record.method = Some(event.method());
    record.updated_at = now;
    if before != record.state {
        info!(
            user = %record.user_id,
            skill = %record.skill,
            from = %before,
            to = %record.state,
            "verification state changed"
        );
    }
    Ok(())
}

pub trait VerificationStore {
    fn load(&self, user_id: &str, skill: &str) -> Result<Option<SkillVerificationRecord>>;
    fn save(&mut self, record: &SkillVerificationRecord) -> Result<()>;
    /// Increments and returns the attempt count for `(user, date)`.
    fn bump_attempts(&mut self, user_id: &str, date: NaiveDate) -> Result<u32>;
}

fn skill_key(skill: &str) -> String {
    skill.trim().to_lowercase()
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryVerificationStore {
    records: HashMap<(String, String), SkillVerificationRecord>,
    attempts: HashMap<(String, NaiveDate), u32>,
}

impl VerificationStore for InMemoryVerificationStore {
    fn load(&self, user_id: &str, skill: &str) -> Result<Option<SkillVerificationRecord>> {
        Ok(self
            .records
            .get(&(user_id.to_string(), skill_key(skill)))
            .cloned())
    }

    fn save(&mut self, record: &SkillVerificationRecord) -> Result<()> {
        self.records.insert(
            (record.user_id.clone(), skill_key(&record.skill)),
            record.clone(),
        );
        Ok(())
    }

    fn bump_attempts(&mut self, user_id: &str, date: NaiveDate) -> Result<u32> {
        let count = self
            .attempts
            .entry((user_id.to_string(), date))
            .or_insert(0);
        *count += 1;
        Ok(*count)
    }
}

/// Outcome of one verification attempt plus the record's resulting state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptReport<T> {
    #[serde(flatten)]
    pub outcome: T,
    pub state: VerificationState,
    pub skill_verified: bool,
    pub attempts_today: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillUnlock {
    /// Skills that may be written into the profile's tech stack.
    pub persist: Vec<String>,
    /// New skills still missing a completed verification track.
    pub pending: Vec<String>,
}

pub struct SkillVerifier<S, C> {
    store: S,
    clock: C,
    table: SkillLanguageTable,
    settings: QuizSettings,
    coding: CodingSettings,
}

impl<S: VerificationStore, C: Clock> SkillVerifier<S, C> {
    pub fn new(store: S, clock: C, settings: QuizSettings) -> Self {
        let table = SkillLanguageTable::new(settings.skill_languages.clone());
        Self {
            store,
            clock,
            table,
            settings,
            coding: CodingSettings::default(),
        }
    }

    pub fn with_coding_settings(mut self, coding: CodingSettings) -> Self {
        self.coding = coding;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn record(&self, user_id: &str, skill: &str) -> Result<Option<SkillVerificationRecord>> {
        self.store.load(user_id, skill)
    }

    pub fn start_quiz(&self, skill: &str, seed: u64) -> Result<QuizSession> {
        quiz::select_questions(skill, seed, &self.table, &self.settings)
    }

    fn load_or_new(&self, user_id: &str, skill: &str) -> Result<SkillVerificationRecord> {
        Ok(self
            .store
            .load(user_id, skill)?
            .unwrap_or_else(|| SkillVerificationRecord::new(user_id, skill, self.clock.now())))
    }

    fn commit<T>(
        &mut self,
        mut record: SkillVerificationRecord,
        event: VerificationEvent,
        outcome: T,
    ) -> Result<AttemptReport<T>> {
        apply_event(&mut record, event, self.clock.now())?;
        self.store.save(&record)?;
        let attempts_today = self.store.bump_attempts(&record.user_id, self.clock.today())?;
        Ok(AttemptReport {
            outcome,
            state: record.state,
            skill_verified: record.level3_complete(),
            attempts_today,
        })
    }

    pub fn submit_quiz(
        &mut self,
        user_id: &str,
        session: &QuizSession,
        answers: &[usize],
    ) -> Result<AttemptReport<QuizOutcome>> {
        let outcome = quiz::grade(session, answers, &self.settings)?;
        let record = self.load_or_new(user_id, &session.skill)?;
        let event = VerificationEvent::QuizGraded {
            passed: outcome.passed,
            score: outcome.score as u32,
        };
        self.commit(record, event, outcome)
    }

    pub async fn submit_coding_test(
        &mut self,
        user_id: &str,
        skill: &str,
        code: &str,
        language: &str,
        runner: &dyn SnippetRunner,
    ) -> Result<AttemptReport<CodingTestOutcome>> {
        let record = self.load_or_new(user_id, skill)?;
        if !record.level1_quiz_passed && !record.level3_complete() {
            return Err(PodTrustError::InvalidTransition {
                from: record.state.to_string(),
                event: "coding test submitted".to_string(),
            });
        }
        let outcome = coding::evaluate_submission(code, language, runner, &self.coding).await?;
        let event = VerificationEvent::CodingTestEvaluated {
            passed: outcome.passed,
        };
        self.commit(record, event, outcome)
    }

    /// Reviews a certificate and records the verdict for every requested skill.
    pub async fn submit_certificate(
        &mut self,
        user_id: &str,
        skills: &[String],
        image: &ImageAttachment,
        analyzer: &dyn ContentAnalyzer,
        timeout: Duration,
    ) -> Result<CertificateVerdict> {
        let verdict = certificate::review_certificate(analyzer, skills, image, timeout).await?;
        let now = self.clock.now();
        for skill in skills.iter().filter(|skill| !skill.trim().is_empty()) {
            let mut record = self.load_or_new(user_id, skill)?;
            apply_event(
                &mut record,
                VerificationEvent::CertificateReviewed {
                    verified: verdict.verifies(skill),
                },
                now,
            )?;
            self.store.save(&record)?;
        }
        Ok(verdict)
    }

    /// Splits `requested` into skills that may be persisted and skills still
    /// awaiting a completed track. Previously verified skills pass through.
    pub fn unlock_skills(
        &self,
        user_id: &str,
        previously_verified: &[String],
        requested: &[String],
    ) -> Result<SkillUnlock> {
        let known = previously_verified
            .iter()
            .map(|skill| skill_key(skill))
            .collect::<Vec<_>>();
        let mut unlock = SkillUnlock::default();
        for skill in requested {
            if skill.trim().is_empty() {
                continue;
            }
            let complete = known.contains(&skill_key(skill))
                || self
                    .store
                    .load(user_id, skill)?
                    .is_some_and(|record| record.level3_complete());
            if complete {
                unlock.persist.push(skill.trim().to_string());
            } else {
                unlock.pending.push(skill.trim().to_string());
            }
        }
        Ok(unlock)
    }
}
