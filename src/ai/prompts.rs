//! Prompt builders for the three gateway operations. The JSON shapes spelled
//! out here are the contract the response parsers in `types.rs` expect.

use crate::store::SurveyResponse;

/// How many previous answers the question prompt carries as context.
const QUESTION_CONTEXT_WINDOW: usize = 3;

fn to_json(value: &impl serde::Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "[]".into())
}

pub fn career_analysis(responses: &[SurveyResponse]) -> String {
    format!(
        r#"You are an expert career counselor and psychologist. Analyze these career assessment responses and provide comprehensive career recommendations.

User Responses:
{responses}

Based on these responses, provide a detailed career analysis. Return ONLY valid JSON with this exact structure:

{{
  "careerPaths": [
    {{
      "title": "Software Engineer",
      "match": 95,
      "description": "Design and develop software applications...",
      "salary": "$75,000 - $150,000",
      "education": "Bachelor's in Computer Science or equivalent",
      "growth": "22% growth (much faster than average)",
      "skills": ["Programming", "Problem solving", "Analytical thinking"]
    }}
  ],
  "personalityType": "INTJ",
  "personalityDescription": "Innovative and strategic thinker...",
  "strengths": ["Analytical thinking", "Problem solving", "Attention to detail"],
  "interests": ["Technology", "Innovation", "Problem solving"],
  "values": ["Growth", "Challenge", "Impact"]
}}

Requirements:
- Provide 3-5 career matches ranked by compatibility
- Match percentages should be realistic (60-95%)
- Include diverse career options that truly fit the responses
- Personality type should be based on responses
- All arrays should have 3-5 relevant items
- Be specific and actionable in descriptions"#,
        responses = to_json(&responses),
    )
}

pub fn career_questions(previous_answers: &[SurveyResponse]) -> String {
    let context = if previous_answers.is_empty() {
        "Generate initial career assessment questions.".to_string()
    } else {
        // Only the most recent answers go in, to keep the prompt bounded and
        // steer the model away from repeating earlier questions.
        let start = previous_answers.len().saturating_sub(QUESTION_CONTEXT_WINDOW);
        format!(
            "Based on previous answers: {}, generate follow-up questions.",
            to_json(&&previous_answers[start..]),
        )
    };

    format!(
        r#"You are a career counselor AI. Generate 5 comprehensive career assessment questions that help determine someone's ideal career path.

{context}

Requirements:
- Questions should cover different aspects: personality, interests, values, skills, work preferences
- Mix of question types: multiple-choice, rating scales, and open-ended
- Be specific and insightful
- Avoid repetitive questions if previous answers are provided

Return ONLY a valid JSON array with this exact structure:
[
  {{
    "id": 1,
    "question": "What motivates you most in a work environment?",
    "type": "multiple-choice",
    "options": ["Solving complex problems", "Helping others", "Creating something new", "Leading teams"],
    "category": "motivation"
  }},
  {{
    "id": 2,
    "question": "Rate your comfort level with public speaking (1-5 scale)",
    "type": "scale",
    "category": "skills"
  }}
]"#
    )
}

pub fn career_roadmap(career_title: &str, profile: &serde_json::Value) -> String {
    format!(
        r#"Create a detailed career roadmap for becoming a {career_title}.

User Profile Context:
{profile}

Generate a comprehensive step-by-step roadmap with 6-10 actionable steps. Return ONLY valid JSON array:

[
  {{
    "id": 1,
    "title": "Learn Programming Fundamentals",
    "description": "Master basics of programming with Python/JavaScript...",
    "timeframe": "3-6 months",
    "type": "education",
    "completed": false
  }}
]

Types: "education", "experience", "skill", "certification"
Timeframes should be realistic
Order steps logically from beginner to advanced"#,
        profile = to_json(profile),
    )
}
