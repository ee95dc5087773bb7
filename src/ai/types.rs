use serde::{Deserialize, Serialize};

/// Structured career recommendation payload produced by the generative model.
/// Parsed strictly: a payload that misses required fields never becomes a
/// partially-filled value, it fails deserialization outright.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerAnalysis {
    pub career_paths: Vec<CareerPath>,
    pub personality_type: String,
    pub personality_description: String,
    pub strengths: Vec<String>,
    pub interests: Vec<String>,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerPath {
    pub title: String,
    /// Compatibility percentage, 0-100.
    #[serde(rename = "match")]
    pub match_score: u8,
    pub description: String,
    pub salary: String,
    pub education: String,
    pub growth: String,
    pub skills: Vec<String>,
}

impl CareerAnalysis {
    /// Shape checks beyond what serde enforces. The prompt is a best-effort
    /// contract, so out-of-range values from the model are treated as a
    /// malformed response, not stored.
    pub fn validate(&self) -> Result<(), String> {
        if self.career_paths.is_empty() {
            return Err("analysis contains no career paths".into());
        }
        for path in &self.career_paths {
            if path.match_score > 100 {
                return Err(format!(
                    "career path {:?} has match score {} out of range",
                    path.title, path.match_score
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    MultipleChoice,
    Scale,
    Text,
}

/// One survey question generated by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub question: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Education,
    Experience,
    Skill,
    Certification,
}

/// One step of a personalized career roadmap, ordered beginner-to-advanced
/// by the prompt contract. `completed` always starts false server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapStep {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub timeframe: String,
    #[serde(rename = "type")]
    pub kind: StepKind,
    #[serde(default)]
    pub completed: bool,
}

/// Canned analysis used across test modules.
#[cfg(test)]
pub fn test_analysis() -> CareerAnalysis {
    CareerAnalysis {
        career_paths: vec![CareerPath {
            title: "Software Engineer".into(),
            match_score: 92,
            description: "Design and develop software systems".into(),
            salary: "$95,000 - $150,000".into(),
            education: "Bachelor's degree in Computer Science".into(),
            growth: "22% (much faster than average)".into(),
            skills: vec!["Programming".into(), "Problem solving".into()],
        }],
        personality_type: "Analytical Innovator".into(),
        personality_description: "Combines analysis with creative problem solving".into(),
        strengths: vec!["Analytical thinking".into()],
        interests: vec!["Technology".into()],
        values: vec!["Growth".into()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_parses_model_shaped_json() {
        let json = r#"{
            "careerPaths": [{
                "title": "Data Scientist",
                "match": 87,
                "description": "Analyze complex data",
                "salary": "$100,000 - $165,000",
                "education": "Bachelor's in Statistics",
                "growth": "35%",
                "skills": ["Statistics", "Python"]
            }],
            "personalityType": "INTJ",
            "personalityDescription": "Strategic thinker",
            "strengths": ["Analysis"],
            "interests": ["Data"],
            "values": ["Impact"]
        }"#;
        let analysis: CareerAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.career_paths[0].match_score, 87);
        assert!(analysis.validate().is_ok());
    }

    #[test]
    fn analysis_missing_field_fails_to_parse() {
        let json = r#"{"careerPaths": [], "personalityType": "INTJ"}"#;
        assert!(serde_json::from_str::<CareerAnalysis>(json).is_err());
    }

    #[test]
    fn validate_rejects_empty_paths_and_out_of_range_match() {
        let mut analysis = test_analysis();
        analysis.career_paths[0].match_score = 100;
        assert!(analysis.validate().is_ok());
        analysis.career_paths[0].match_score = 101;
        assert!(analysis.validate().is_err());
        analysis.career_paths.clear();
        assert!(analysis.validate().is_err());
    }

    #[test]
    fn question_kind_uses_kebab_case_wire_form() {
        let json = r#"{
            "id": 1,
            "question": "What motivates you?",
            "type": "multiple-choice",
            "options": ["Solving problems", "Helping others"],
            "category": "motivation"
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.kind, QuestionKind::MultipleChoice);

        let scale = r#"{"id": 2, "question": "Rate it", "type": "scale", "category": "skills"}"#;
        let q: Question = serde_json::from_str(scale).unwrap();
        assert_eq!(q.kind, QuestionKind::Scale);
        assert!(q.options.is_none());
    }

    #[test]
    fn roadmap_step_defaults_completed_to_false() {
        let json = r#"{
            "id": 1,
            "title": "Learn fundamentals",
            "description": "Master the basics",
            "timeframe": "3-6 months",
            "type": "education"
        }"#;
        let step: RoadmapStep = serde_json::from_str(json).unwrap();
        assert_eq!(step.kind, StepKind::Education);
        assert!(!step.completed);
    }
}
