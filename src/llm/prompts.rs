//! Career-advice prompt built from the top-ranked opportunities

use crate::processing::ranking::Opportunity;
use crate::processing::text_processor::truncate_graphemes;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Characters of each description included in the prompt.
pub const PROMPT_DESCRIPTION_CHARS: usize = 300;

pub const SYSTEM_PROMPT: &str = "You are an expert career coach and resume advisor helping job seekers improve their prospects. Provide practical, actionable advice.";

/// The slice of an opportunity the advice prompt talks about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub position: usize,
    pub title: String,
    pub company: String,
    pub description: String,
    pub match_score: f32,
    pub skill_relevance: f32,
}

impl JobSummary {
    pub fn from_opportunities(opportunities: &[Opportunity]) -> Vec<JobSummary> {
        opportunities
            .iter()
            .enumerate()
            .map(|(i, opp)| JobSummary {
                position: i + 1,
                title: opp.posting.title.clone(),
                company: opp.posting.company.clone(),
                description: truncate_graphemes(&opp.posting.description, PROMPT_DESCRIPTION_CHARS)
                    .to_string(),
                match_score: opp.match_score,
                skill_relevance: opp.skill_relevance,
            })
            .collect()
    }
}

/// Parameters for prompt template substitution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptParams {
    pub user_skills: String,
    pub experience_level: String,
    pub jobs: Vec<JobSummary>,
}

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub career_advice: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            career_advice: CAREER_ADVICE_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplates {
    /// Full prompt text, system instruction first.
    pub fn render_career_advice(&self, params: &PromptParams) -> String {
        static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();
        let placeholder_re = PLACEHOLDER_RE
            .get_or_init(|| Regex::new(r"\{(skills|experience|jobs)\}").expect("valid placeholder regex"));

        let jobs = render_jobs(&params.jobs);
        // single pass: substituted text is never scanned for placeholders again
        let body = placeholder_re.replace_all(&self.career_advice, |caps: &Captures| match &caps[1] {
            "skills" => params.user_skills.clone(),
            "experience" => params.experience_level.clone(),
            _ => jobs.clone(),
        });

        format!("{}\n\n{}", SYSTEM_PROMPT, body)
    }
}

fn render_jobs(jobs: &[JobSummary]) -> String {
    let mut text = String::new();
    for job in jobs {
        text.push_str(&format!("\n{}. {} at {}\n", job.position, job.title, job.company));
        text.push_str(&format!("   Match Score: {:.1}%\n", job.match_score * 100.0));
        text.push_str(&format!("   Skill Relevance: {:.1}%\n", job.skill_relevance));
        text.push_str(&format!("   Description: {}\n", job.description));
    }
    text
}

const CAREER_ADVICE_TEMPLATE: &str = r#"Analyze the following job opportunities and provide personalized recommendations.

USER PROFILE:
- Current Skills: {skills}
- Experience Level: {experience}

TOP JOB OPPORTUNITIES:
{jobs}

Please provide:

1. RESUME OPTIMIZATION TIPS:
   - What keywords should be emphasized in the resume
   - How to highlight relevant experience
   - What skills to prioritize in the skills section
   - Suggestions for resume formatting and structure

2. APPLICATION STRATEGY:
   - Which jobs to prioritize based on match scores
   - How to tailor applications for each role
   - Key points to emphasize in cover letters
   - Interview preparation tips

3. SKILL DEVELOPMENT PLAN:
   - Missing skills that appear frequently in job descriptions
   - Priority order for learning new skills
   - Specific course recommendations with platforms
   - Timeline for skill development

4. INDUSTRY INSIGHTS:
   - Current market trends in these roles
   - Salary negotiation tips
   - Career growth opportunities

Keep the advice practical, actionable, and encouraging. Focus on immediate steps the user can take to improve their job prospects."#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Posting;

    fn opportunity(description: &str) -> Opportunity {
        Opportunity {
            index: 0,
            posting: Posting::new("Data Engineer", description).with_company("Initech"),
            match_score: 0.625,
            skill_relevance: 50.0,
        }
    }

    #[test]
    fn test_summary_truncates_description() {
        let long = "x".repeat(500);
        let summaries = JobSummary::from_opportunities(&[opportunity(&long)]);
        assert_eq!(summaries[0].description.len(), PROMPT_DESCRIPTION_CHARS);
        assert_eq!(summaries[0].position, 1);
    }

    #[test]
    fn test_career_advice_rendering() {
        let params = PromptParams {
            user_skills: "python, sql".to_string(),
            experience_level: "entry".to_string(),
            jobs: JobSummary::from_opportunities(&[opportunity("Build pipelines")]),
        };

        let prompt = PromptTemplates::default().render_career_advice(&params);

        assert!(prompt.starts_with(SYSTEM_PROMPT));
        assert!(prompt.contains("Current Skills: python, sql"));
        assert!(prompt.contains("Experience Level: entry"));
        assert!(prompt.contains("1. Data Engineer at Initech"));
        assert!(prompt.contains("Match Score: 62.5%"));
        assert!(prompt.contains("Description: Build pipelines"));
        for section in [
            "RESUME OPTIMIZATION TIPS",
            "APPLICATION STRATEGY",
            "SKILL DEVELOPMENT PLAN",
            "INDUSTRY INSIGHTS",
        ] {
            assert!(prompt.contains(section));
        }
        assert!(!prompt.contains("{jobs}"));
    }

    #[test]
    fn test_placeholders_in_user_text_are_kept_verbatim() {
        let params = PromptParams {
            user_skills: "rust {experience} {jobs}".to_string(),
            experience_level: "entry".to_string(),
            jobs: JobSummary::from_opportunities(&[opportunity("Mentions {skills} literally")]),
        };

        let prompt = PromptTemplates::default().render_career_advice(&params);

        assert!(prompt.contains("- Current Skills: rust {experience} {jobs}\n"));
        assert!(prompt.contains("- Experience Level: entry\n"));
        assert!(prompt.contains("Description: Mentions {skills} literally"));
    }
}
