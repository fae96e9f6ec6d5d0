//! Advice composer: generated career advice with a deterministic template fallback

use crate::config::AnalysisConfig;
use crate::llm::generator::TextGenerator;
use crate::llm::prompts::{JobSummary, PromptParams, PromptTemplates};
use crate::processing::ranking::Opportunity;
use crate::processing::relevance::SkillProfile;
use crate::processing::skill_gap::{KeywordFilter, SkillGapAnalyzer};
use crate::processing::text_processor::title_case;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Section headings every piece of advice covers.
pub const ADVICE_SECTIONS: [&str; 4] = [
    "RESUME OPTIMIZATION TIPS",
    "APPLICATION STRATEGY",
    "SKILL DEVELOPMENT PLAN",
    "INDUSTRY INSIGHTS",
];

pub const NO_OPPORTUNITIES_MESSAGE: &str = "No job opportunities found to analyze.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdviceOrigin {
    Generated { model: String },
    Fallback { reason: String },
    NoOpportunities,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub text: String,
    pub origin: AdviceOrigin,
}

impl Advice {
    pub fn is_generated(&self) -> bool {
        matches!(self.origin, AdviceOrigin::Generated { .. })
    }
}

pub struct AdviceComposer {
    generator: Option<Box<dyn TextGenerator>>,
    templates: PromptTemplates,
    analyzer: SkillGapAnalyzer,
    top_n: usize,
    keyword_window: usize,
}

impl AdviceComposer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            generator: None,
            templates: PromptTemplates::default(),
            analyzer: SkillGapAnalyzer::new(config),
            top_n: config.advice_top_n,
            keyword_window: config.frequent_window,
        }
    }

    pub fn with_generator(mut self, generator: Box<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Advice for the best `top_n` opportunities. Never fails: any problem with
    /// the generation service falls back to the local template.
    pub fn compose(
        &self,
        opportunities: &[Opportunity],
        profile: &SkillProfile,
        experience_level: &str,
    ) -> Advice {
        if opportunities.is_empty() {
            return Advice {
                text: NO_OPPORTUNITIES_MESSAGE.to_string(),
                origin: AdviceOrigin::NoOpportunities,
            };
        }

        let top = &opportunities[..opportunities.len().min(self.top_n.max(1))];
        let jobs = JobSummary::from_opportunities(top);

        let reason = match &self.generator {
            Some(generator) => {
                let params = PromptParams {
                    user_skills: profile.raw().to_string(),
                    experience_level: experience_level.to_string(),
                    jobs: jobs.clone(),
                };
                let prompt = self.templates.render_career_advice(&params);

                match generator.generate(&prompt) {
                    Ok(generation) if !generation.text.trim().is_empty() => {
                        return Advice {
                            text: generation.text,
                            origin: AdviceOrigin::Generated {
                                model: generation.model,
                            },
                        };
                    }
                    Ok(generation) => format!("{} returned empty text", generation.model),
                    Err(e) => {
                        warn!("Error generating recommendations: {}", e);
                        e.to_string()
                    }
                }
            }
            None => "no text generation service configured".to_string(),
        };

        debug!("Using template advice: {}", reason);
        Advice {
            text: self.fallback_advice(&jobs, profile, experience_level),
            origin: AdviceOrigin::Fallback { reason },
        }
    }

    /// Template advice driven by keyword frequency in the job descriptions.
    pub fn fallback_advice(
        &self,
        jobs: &[JobSummary],
        profile: &SkillProfile,
        experience_level: &str,
    ) -> String {
        let descriptions: Vec<&str> = jobs.iter().map(|job| job.description.as_str()).collect();
        let filter = KeywordFilter {
            window: self.keyword_window,
            min_frequency: 1,
            min_length: 3,
            limit: usize::MAX,
        };
        let missing: Vec<String> = self
            .analyzer
            .missing_keywords(&descriptions, profile, filter)
            .into_iter()
            .map(|skill| skill.term)
            .collect();

        let keyword_list = if missing.is_empty() {
            "the skills listed in these postings".to_string()
        } else {
            missing.iter().take(5).cloned().collect::<Vec<_>>().join(", ")
        };
        let first = missing.first().map(String::as_str).unwrap_or("relevant skills");
        let second = missing.get(1).map(String::as_str).unwrap_or("technical skills");
        let skills = if profile.raw().is_empty() {
            "your current skills"
        } else {
            profile.raw()
        };
        let level = if experience_level.trim().is_empty() {
            "Entry".to_string()
        } else {
            title_case(experience_level.trim())
        };

        format!(
            r#"1. {resume}:
   - Emphasize these keywords in your resume: {keywords}
   - Highlight your experience with: {skills}
   - Use action verbs like "developed", "implemented", "managed"
   - Keep resume to 1-2 pages and use ATS-friendly format

2. {strategy}:
   - Apply to jobs with match scores above 70% first
   - Tailor your resume for each application
   - Write compelling cover letters mentioning specific company names
   - Follow up after 1 week if no response

3. {development}:
   Priority skills to learn: {keywords}

   Recommended courses:
   - Coursera: Search for courses on {first}
   - Udemy: Practical tutorials on {second}
   - edX: Professional certificates in your field
   - YouTube: Free tutorials for quick learning

4. {insights}:
   - {level} level positions are in demand
   - Remote work opportunities are increasing
   - Focus on continuous learning and certifications
   - Network with professionals in your target companies

Next Steps:
1. Update your resume with suggested keywords
2. Start learning the top 2 missing skills
3. Apply to the highest-matching jobs first
4. Set up job alerts for similar positions
"#,
            resume = ADVICE_SECTIONS[0],
            strategy = ADVICE_SECTIONS[1],
            development = ADVICE_SECTIONS[2],
            insights = ADVICE_SECTIONS[3],
            keywords = keyword_list,
            skills = skills,
            first = first,
            second = second,
            level = level,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{JobScoutError, Result};
    use crate::input::Posting;
    use crate::llm::generator::Generation;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FixedGenerator(&'static str);

    impl TextGenerator for FixedGenerator {
        fn generate(&self, _prompt: &str) -> Result<Generation> {
            Ok(Generation {
                model: "fixed".to_string(),
                text: self.0.to_string(),
            })
        }
    }

    struct FailingGenerator;

    impl TextGenerator for FailingGenerator {
        fn generate(&self, _prompt: &str) -> Result<Generation> {
            Err(JobScoutError::GenerationServiceUnavailable { attempts: Vec::new() })
        }
    }

    struct RecordingGenerator(Rc<RefCell<Vec<String>>>);

    impl TextGenerator for RecordingGenerator {
        fn generate(&self, prompt: &str) -> Result<Generation> {
            self.0.borrow_mut().push(prompt.to_string());
            Ok(Generation {
                model: "recorder".to_string(),
                text: "ok".to_string(),
            })
        }
    }

    fn opportunities(n: usize) -> Vec<Opportunity> {
        (0..n)
            .map(|i| Opportunity {
                index: i,
                posting: Posting::new(
                    format!("Role {}", i),
                    "Kubernetes and Terraform on AWS. Kubernetes operators.",
                ),
                match_score: 0.5,
                skill_relevance: 50.0,
            })
            .collect()
    }

    fn assert_all_sections(text: &str) {
        for section in ADVICE_SECTIONS {
            assert!(text.contains(section), "missing section {}", section);
        }
    }

    #[test]
    fn test_no_opportunities_message() {
        let composer = AdviceComposer::new(&AnalysisConfig::default())
            .with_generator(Box::new(FixedGenerator("never used")));
        let advice = composer.compose(&[], &SkillProfile::parse("python"), "entry");

        assert_eq!(advice.text, NO_OPPORTUNITIES_MESSAGE);
        assert_eq!(advice.origin, AdviceOrigin::NoOpportunities);
    }

    #[test]
    fn test_generated_advice_is_used() {
        let composer = AdviceComposer::new(&AnalysisConfig::default())
            .with_generator(Box::new(FixedGenerator("Learn Kubernetes.")));
        let advice = composer.compose(&opportunities(2), &SkillProfile::parse("python"), "mid");

        assert!(advice.is_generated());
        assert_eq!(advice.text, "Learn Kubernetes.");
    }

    #[test]
    fn test_failure_falls_back_to_template() {
        let composer = AdviceComposer::new(&AnalysisConfig::default())
            .with_generator(Box::new(FailingGenerator));
        let advice = composer.compose(&opportunities(1), &SkillProfile::parse("python"), "senior");

        assert!(matches!(advice.origin, AdviceOrigin::Fallback { .. }));
        assert_all_sections(&advice.text);
        assert!(advice.text.contains("Kubernetes"));
        assert!(advice.text.contains("Senior level positions"));
    }

    #[test]
    fn test_empty_generation_falls_back() {
        let composer = AdviceComposer::new(&AnalysisConfig::default())
            .with_generator(Box::new(FixedGenerator("  ")));
        let advice = composer.compose(&opportunities(1), &SkillProfile::parse("python"), "entry");
        assert!(!advice.is_generated());
        assert_all_sections(&advice.text);
    }

    #[test]
    fn test_fallback_without_missing_skills_uses_placeholders() {
        let composer = AdviceComposer::new(&AnalysisConfig::default());
        let opps = vec![Opportunity {
            index: 0,
            posting: Posting::new("Dev", "Go"),
            match_score: 0.1,
            skill_relevance: 0.0,
        }];
        let advice = composer.compose(&opps, &SkillProfile::parse(""), "");

        assert!(!advice.text.is_empty());
        assert_all_sections(&advice.text);
        assert!(advice.text.contains("Coursera: Search for courses on relevant skills"));
        assert!(advice.text.contains("Udemy: Practical tutorials on technical skills"));
        assert!(advice.text.contains("Entry level positions"));
    }

    #[test]
    fn test_prompt_limited_to_top_n() {
        let prompts = Rc::new(RefCell::new(Vec::new()));
        let composer = AdviceComposer::new(&AnalysisConfig::default())
            .with_generator(Box::new(RecordingGenerator(prompts.clone())));
        composer.compose(&opportunities(8), &SkillProfile::parse("python"), "entry");

        let recorded = prompts.borrow();
        assert_eq!(recorded.len(), 1);
        assert!(recorded[0].contains("5. Role 4 at"));
        assert!(!recorded[0].contains("Role 5"));
    }
}
