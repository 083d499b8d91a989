//! Prompt construction for the three model operations.
//!
//! Pure functions: same inputs, same prompt, no I/O. The embedded JSON
//! shapes are the response contract the parser expects back — change them
//! together with the record types in `types`.

use super::types::RedFlag;

/// Characters of each contract kept in a comparison prompt. Longer
/// contracts lose content silently; this bounds prompt size.
pub(crate) const COMPARE_EXCERPT_CHARS: usize = 3000;

/// Red flags embedded in a counter-proposal prompt.
pub(crate) const COUNTER_PROPOSAL_FLAG_LIMIT: usize = 5;

const ANALYSIS_INTRO: &str = "\
You are an expert legal analyst specializing in consumer contract protection.
Your goal is to help ordinary people understand contracts and identify potential problems.";

const ANALYSIS_INSTRUCTIONS: &str = r#"Analyze the following contract carefully and provide a comprehensive assessment.

**CRITICAL RED FLAGS TO LOOK FOR:**
1. Hidden or excessive fees
2. One-sided termination rights (they can terminate easily, you cannot)
3. Automatic renewal clauses without clear opt-out
4. Unreasonable liability waivers or indemnification
5. Waiver of legal rights (arbitration clauses, class action waivers)
6. Excessive penalties or damages
7. Unfair modification rights
8. Lack of termination rights for the consumer
9. Unreasonable restrictions on the consumer
10. Missing standard consumer protections

**YELLOW FLAGS (Concerning but not critical):**
1. Vague or ambiguous language
2. Missing definitions for key terms
3. Unusual or non-standard clauses
4. Overly complex legal language
5. Short notice periods
6. Restricted dispute resolution options

**ANALYSIS INSTRUCTIONS:**
1. Read the entire contract carefully
2. Identify ALL red flags and yellow flags
3. For each flag, quote the EXACT problematic clause
4. Explain the risk in simple, plain English (8th-grade reading level)
5. Suggest specific questions the person should ask before signing
6. Provide an overall risk score (1-10, where 10 is extremely risky)
7. Give a clear recommendation: SIGN, NEGOTIATE, or AVOID

**OUTPUT FORMAT:**
Return your analysis as a JSON object with this EXACT structure:

{
  "risk_score": 7,
  "recommendation": "NEGOTIATE",
  "overall_summary": "Brief summary of main concerns in 2-3 sentences",
  "contract_type_detected": "rental/employment/nda/service/other",

  "red_flags": [
    {
      "category": "Hidden Fees",
      "severity": "HIGH",
      "clause_text": "Exact quote from contract",
      "location": "Section/Page reference if available",
      "explanation": "Plain English explanation of why this is problematic",
      "impact": "What could happen to you because of this clause",
      "questions_to_ask": ["Question 1", "Question 2"]
    }
  ],

  "yellow_flags": [
    {
      "category": "Vague Language",
      "severity": "MEDIUM",
      "clause_text": "Exact quote",
      "location": "Section/Page reference",
      "explanation": "Why this is concerning",
      "suggestion": "What should be clarified"
    }
  ],

  "missing_protections": [
    "Standard protection that should be included but isn't"
  ],

  "positive_aspects": [
    "Good clauses or protections that ARE present"
  ],

  "key_questions_before_signing": [
    "Question 1",
    "Question 2",
    "Question 3"
  ],

  "negotiation_tips": [
    "Specific thing to try to negotiate"
  ]
}

**IMPORTANT:**
- Be thorough but concise
- Use friendly, accessible language
- Focus on practical implications
- If you find a particularly egregious clause, emphasize it strongly
- If the contract is actually fair, say so clearly"#;

/// Build the contract-analysis prompt.
pub fn analysis_prompt(contract_text: &str, contract_type: Option<&str>) -> String {
    let type_context = contract_type
        .map(|t| format!("\nContract Type: {}\n", t.to_uppercase()))
        .unwrap_or_default();

    format!(
        "{intro}\n{type_context}\n{instructions}\n\nCONTRACT TEXT:\n{contract_text}\n\n\
         Now analyze this contract and return ONLY the JSON object, with no additional text before or after.",
        intro = ANALYSIS_INTRO,
        type_context = type_context,
        instructions = ANALYSIS_INSTRUCTIONS,
        contract_text = contract_text,
    )
}

/// Build the contract-comparison prompt.
///
/// Each contract is hard truncated to its first 3000 characters before
/// embedding.
pub fn comparison_prompt(original: &str, revised: &str, user_side: &str) -> String {
    let original = excerpt(original, COMPARE_EXCERPT_CHARS);
    let revised = excerpt(revised, COMPARE_EXCERPT_CHARS);

    format!(
        r#"You are a contract comparison expert helping a {user_side}.

Compare these two versions of a contract and provide detailed analysis:

**ANALYSIS REQUIREMENTS:**

1. **IDENTIFY ALL CHANGES**: Every clause that was added, removed, or modified
2. **WINNER ANALYSIS**: For each change, determine who benefits:
   - Benefits {user_side}
   - Benefits other party
   - Neutral or unclear
3. **CONCERNS ADDRESSED**: What red flags from original were fixed
4. **NEW PROBLEMS**: Any new concerning issues introduced
5. **CONCERNS IGNORED**: What major problems remain unfixed
6. **OVERALL VERDICT**: Should the {user_side} accept this revision?

ORIGINAL CONTRACT:
{original}...

---

REVISED CONTRACT:
{revised}...

Return ONLY valid JSON with this structure:
{{
  "summary": "2-3 sentence overview of the revision",
  "total_changes": 5,
  "changes_favoring_user": 2,
  "changes_favoring_other": 2,
  "neutral_changes": 1,
  "overall_verdict": "ACCEPT/NEGOTIATE_MORE/REJECT",
  "verdict_explanation": "Why you should accept/negotiate/reject",

  "changes": [
    {{
      "section": "Section 3.2 - Security Deposit",
      "change_type": "modified/added/removed",
      "original_text": "Quote from original (if applicable)",
      "revised_text": "Quote from revision (if applicable)",
      "who_benefits": "{user_side}/other_party/neutral",
      "benefit_level": "major/minor",
      "explanation": "Clear explanation of what changed and why it matters",
      "impact": "positive/negative/neutral"
    }}
  ],

  "addressed_concerns": [
    "Security deposit is now refundable",
    "Late fee reduced from $150 to $50"
  ],

  "ignored_concerns": [
    "Automatic renewal clause still present",
    "One-sided termination rights unchanged"
  ],

  "new_issues": [
    "Added mandatory arbitration clause",
    "Increased monthly maintenance fee"
  ],

  "recommendation": "Detailed 2-3 sentence advice on what the {user_side} should do next",

  "next_steps": [
    "Ask about the new arbitration clause",
    "Request removal of automatic renewal",
    "Confirm security deposit refund process in writing"
  ]
}}"#,
        user_side = user_side,
        original = original,
        revised = revised,
    )
}

const COUNTER_PROPOSAL_SHAPE: &str = r#"Return ONLY valid JSON:
{
  "revised_clauses": [
    {
      "issue": "Security Deposit",
      "original_clause": "The problematic clause text",
      "revised_clause": "Professionally written fair replacement clause",
      "justification": "Why this change is reasonable and fair",
      "legal_basis": "Relevant laws, industry standards, or common practices",
      "priority": "high/medium/low"
    }
  ],

  "email_template": {
    "subject": "Contract Review - Proposed Amendments",
    "greeting": "Dear [Other Party Name],",
    "body": "Professional, friendly email body covering: appreciation for the opportunity, clear statement of concerns, specific proposed changes, explanation of fairness, openness to discussion, professional close",
    "tone": "professional_friendly",
    "estimated_response_time": "2-5 business days"
  },

  "talking_points": [
    {
      "issue": "Security Deposit Refundability",
      "your_position": "Security deposit should be refundable",
      "key_argument": "This is standard practice and legally required in [jurisdiction]",
      "supporting_evidence": "State law citation, market standards, fairness principle",
      "response_to_objections": "If they say it's their policy, respond with..."
    }
  ],

  "compromise_options": [
    {
      "if_they_say": "We can't change our standard contract",
      "you_respond": "I understand. Would you consider...",
      "middle_ground": "Specific compromise that's still acceptable",
      "likelihood_of_success": "high/medium/low"
    }
  ],

  "negotiation_strategy": {
    "approach": "collaborative/firm/flexible",
    "key_principles": ["Principle 1", "Principle 2"],
    "things_to_avoid": ["Don't be aggressive", "Don't accept first offer"],
    "timeline": "Suggested negotiation timeline",
    "when_to_walk_away": "Conditions under which to decline the contract"
  },

  "success_probability": {
    "overall_estimate": "high/medium/low",
    "reasoning": "Why this negotiation is likely to succeed or fail",
    "factors_in_your_favor": ["Factor 1", "Factor 2"],
    "challenges": ["Challenge 1", "Challenge 2"]
  }
}"#;

/// Build the counter-proposal prompt from the analysis's worst red flags.
///
/// Only the first 5 flags are embedded, in the order they appear in the
/// analysis.
pub fn counter_proposal_prompt(
    red_flags: &[RedFlag],
    contract_type: &str,
    user_role: &str,
) -> String {
    let top: Vec<&RedFlag> = red_flags
        .iter()
        .take(COUNTER_PROPOSAL_FLAG_LIMIT)
        .collect();
    let flags_json =
        serde_json::to_string_pretty(&top).expect("red flags should serialize to JSON");

    format!(
        "You are a professional contract negotiation consultant helping a {user_role}.\n\n\
         Based on the red flags identified, create a comprehensive counter-proposal package.\n\n\
         **RED FLAGS TO ADDRESS:**\n{flags_json}\n\n\
         **CONTRACT TYPE:** {contract_type}\n\
         **USER ROLE:** {user_role}\n\n\
         Generate a complete negotiation package with:\n\n\
         1. **REVISED CLAUSES**: Professional, fair replacements for each problematic clause\n\
         2. **EMAIL TEMPLATE**: Ready-to-send professional email\n\
         3. **TALKING POINTS**: Strong arguments with legal/practical backing\n\
         4. **COMPROMISE OPTIONS**: Fallback positions if they resist\n\n\
         {shape}",
        user_role = user_role,
        flags_json = flags_json,
        contract_type = contract_type,
        shape = COUNTER_PROPOSAL_SHAPE,
    )
}

/// First `limit` characters of `text` (character-based, not bytes).
fn excerpt(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
