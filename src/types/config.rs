use crate::error::PodTrustError;
use crate::verification::question_bank::QuizLanguage;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PodTrustConfig {
    pub matching: Option<MatchingConfig>,
    pub verification: Option<VerificationConfig>,
    pub contribution: Option<ContributionConfig>,
    pub analysis: Option<AnalysisConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    pub location_weight: Option<f64>,
    pub tech_weight: Option<f64>,
    pub neutral_tech_score: Option<u8>,
    pub city_match_score: Option<u8>,
    pub city_mismatch_score: Option<u8>,
    pub beyond_score: Option<u8>,
    pub bands: Option<Vec<DistanceBand>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DistanceBand {
    pub max_km: f64,
    pub score: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerificationConfig {
    pub pass_percent: Option<u32>,
    pub max_questions: Option<usize>,
    pub min_questions: Option<usize>,
    pub run_timeout_secs: Option<u64>,
    #[serde(default)]
    pub skill_languages: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContributionConfig {
    pub min_content_chars: Option<usize>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    pub api_base: Option<String>,
    pub model: Option<String>,
    pub api_key_env: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchSettings {
    pub location_weight: f64,
    pub tech_weight: f64,
    pub neutral_tech_score: u8,
    pub city_match_score: u8,
    pub city_mismatch_score: u8,
    pub beyond_score: u8,
    pub bands: Vec<DistanceBand>,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            location_weight: 0.6,
            tech_weight: 0.4,
            neutral_tech_score: 50,
            city_match_score: 100,
            city_mismatch_score: 30,
            beyond_score: 20,
            bands: vec![
                DistanceBand {
                    max_km: 10.0,
                    score: 100,
                },
                DistanceBand {
                    max_km: 50.0,
                    score: 80,
                },
                DistanceBand {
                    max_km: 100.0,
                    score: 60,
                },
                DistanceBand {
                    max_km: 200.0,
                    score: 40,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizSettings {
    pub pass_percent: u32,
    pub max_questions: usize,
    pub min_questions: usize,
    /// Extra skill label -> quiz language aliases, merged over the built-in table.
    pub skill_languages: HashMap<String, QuizLanguage>,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            pass_percent: 70,
            max_questions: 7,
            min_questions: 4,
            skill_languages: HashMap::new(),
        }
    }
}

/// Limits for executed coding-test submissions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodingSettings {
    pub run_timeout: Duration,
}

impl Default for CodingSettings {
    fn default() -> Self {
        Self {
            run_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContributionSettings {
    pub min_content_chars: usize,
    pub timeout: Duration,
}

impl Default for ContributionSettings {
    fn default() -> Self {
        Self {
            min_content_chars: 20,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub api_base: String,
    pub model: String,
    pub api_key_env: String,
    pub timeout: Duration,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "PODTRUST_ANALYSIS_KEY".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl PodTrustConfig {
    pub fn match_settings(&self) -> MatchSettings {
        let defaults = MatchSettings::default();
        match &self.matching {
            Some(matching) => MatchSettings {
                location_weight: matching
                    .location_weight
                    .unwrap_or(defaults.location_weight),
                tech_weight: matching.tech_weight.unwrap_or(defaults.tech_weight),
                neutral_tech_score: matching
                    .neutral_tech_score
                    .unwrap_or(defaults.neutral_tech_score),
                city_match_score: matching
                    .city_match_score
                    .unwrap_or(defaults.city_match_score),
                city_mismatch_score: matching
                    .city_mismatch_score
                    .unwrap_or(defaults.city_mismatch_score),
                beyond_score: matching.beyond_score.unwrap_or(defaults.beyond_score),
                bands: matching.bands.clone().unwrap_or(defaults.bands),
            },
            None => defaults,
        }
    }

    /// Resolved quiz settings. Unknown language names are skipped here and
    /// reported by [`PodTrustConfig::validate`].
    pub fn quiz_settings(&self) -> QuizSettings {
        let defaults = QuizSettings::default();
        match &self.verification {
            Some(verification) => QuizSettings {
                pass_percent: verification.pass_percent.unwrap_or(defaults.pass_percent),
                max_questions: verification.max_questions.unwrap_or(defaults.max_questions),
                min_questions: verification.min_questions.unwrap_or(defaults.min_questions),
                skill_languages: verification
                    .skill_languages
                    .iter()
                    .filter_map(|(skill, language)| {
                        QuizLanguage::from_name(language)
                            .map(|language| (skill.trim().to_lowercase(), language))
                    })
                    .collect(),
            },
            None => defaults,
        }
    }

    pub fn coding_settings(&self) -> CodingSettings {
        let defaults = CodingSettings::default();
        CodingSettings {
            run_timeout: self
                .verification
                .as_ref()
                .and_then(|verification| verification.run_timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(defaults.run_timeout),
        }
    }

    pub fn contribution_settings(&self) -> ContributionSettings {
        let defaults = ContributionSettings::default();
        match &self.contribution {
            Some(contribution) => ContributionSettings {
                min_content_chars: contribution
                    .min_content_chars
                    .unwrap_or(defaults.min_content_chars),
                timeout: contribution
                    .timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.timeout),
            },
            None => defaults,
        }
    }

    pub fn analysis_settings(&self) -> AnalysisSettings {
        let defaults = AnalysisSettings::default();
        match &self.analysis {
            Some(analysis) => AnalysisSettings {
                api_base: analysis.api_base.clone().unwrap_or(defaults.api_base),
                model: analysis.model.clone().unwrap_or(defaults.model),
                api_key_env: analysis.api_key_env.clone().unwrap_or(defaults.api_key_env),
                timeout: analysis
                    .timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.timeout),
            },
            None => defaults,
        }
    }

    pub fn validate(&self) -> Result<(), PodTrustError> {
        validate_match_settings(&self.match_settings())?;

        if let Some(verification) = &self.verification {
            let unknown = verification
                .skill_languages
                .iter()
                .filter(|(_, language)| QuizLanguage::from_name(language).is_none())
                .map(|(skill, language)| format!("{skill} = {language}"))
                .collect::<Vec<_>>();
            if !unknown.is_empty() {
                return Err(PodTrustError::ConfigParse(format!(
                    "verification.skill_languages maps to unknown quiz language(s): {}",
                    unknown.join(", ")
                )));
            }
        }

        let quiz = self.quiz_settings();
        if !(1..=100).contains(&quiz.pass_percent) {
            return Err(PodTrustError::ConfigParse(
                "verification.pass_percent must be between 1 and 100".to_string(),
            ));
        }
        if quiz.min_questions == 0 {
            return Err(PodTrustError::ConfigParse(
                "verification.min_questions must be greater than 0".to_string(),
            ));
        }
        if quiz.min_questions > quiz.max_questions {
            return Err(PodTrustError::ConfigParse(format!(
                "verification.min_questions ({}) cannot exceed verification.max_questions ({})",
                quiz.min_questions, quiz.max_questions
            )));
        }

        if self.coding_settings().run_timeout.is_zero() {
            return Err(PodTrustError::ConfigParse(
                "verification.run_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.contribution_settings().timeout.is_zero() {
            return Err(PodTrustError::ConfigParse(
                "contribution.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.analysis_settings().timeout.is_zero() {
            return Err(PodTrustError::ConfigParse(
                "analysis.timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_match_settings(settings: &MatchSettings) -> Result<(), PodTrustError> {
    for (key, weight) in [
        ("location_weight", settings.location_weight),
        ("tech_weight", settings.tech_weight),
    ] {
        if !(0.0..=1.0).contains(&weight) {
            return Err(PodTrustError::ConfigParse(format!(
                "matching.{key} must be between 0.0 and 1.0"
            )));
        }
    }
    let weight_sum = settings.location_weight + settings.tech_weight;
    if (weight_sum - 1.0).abs() > 0.001 {
        return Err(PodTrustError::ConfigParse(format!(
            "matching weights must sum to 1.0 (found {:.3})",
            weight_sum
        )));
    }

    for (key, score) in [
        ("neutral_tech_score", settings.neutral_tech_score),
        ("city_match_score", settings.city_match_score),
        ("city_mismatch_score", settings.city_mismatch_score),
        ("beyond_score", settings.beyond_score),
    ] {
        if score > 100 {
            return Err(PodTrustError::ConfigParse(format!(
                "matching.{key} must be between 0 and 100"
            )));
        }
    }

    let mut previous: Option<DistanceBand> = None;
    for band in &settings.bands {
        if !band.max_km.is_finite() || band.max_km < 0.0 {
            return Err(PodTrustError::ConfigParse(
                "matching.bands max_km must be a non-negative number".to_string(),
            ));
        }
        if band.score > 100 {
            return Err(PodTrustError::ConfigParse(
                "matching.bands score must be between 0 and 100".to_string(),
            ));
        }
        if let Some(prev) = previous {
            if band.max_km <= prev.max_km {
                return Err(PodTrustError::ConfigParse(
                    "matching.bands must be sorted by strictly ascending max_km".to_string(),
                ));
            }
            if band.score > prev.score {
                return Err(PodTrustError::ConfigParse(format!(
                    "matching.bands score rises from {} to {} at {} km; scores must not increase with distance",
                    prev.score, band.score, band.max_km
                )));
            }
        }
        previous = Some(*band);
    }
    if let Some(last) = previous {
        if settings.beyond_score > last.score {
            return Err(PodTrustError::ConfigParse(
                "matching.beyond_score cannot exceed the last band score".to_string(),
            ));
        }
    }

    Ok(())
}
