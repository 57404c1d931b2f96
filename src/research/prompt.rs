//! Research prompt construction.

use std::fmt::Write;

use crate::austlii::CaseRecord;
use crate::config::Jurisdiction;

/// Characters of attached context included in the prompt.
const CONTEXT_PROMPT_CHARS: usize = 1_000;

/// Cases listed at the end of the prompt.
const PROMPT_CASES: usize = 8;

/// Build the research prompt sent to the LLM.
///
/// The prompt asks for a fixed report layout (legislation, recent cases, precedents,
/// penalties table, strategy, advice) and lists the AustLII cases that were found.
pub fn build_prompt(jurisdiction: &Jurisdiction, query: &str, context: &str, cases: &[CaseRecord]) -> String {
    let name = jurisdiction.name;
    let acts = &jurisdiction.acts;
    let context: String = if context.is_empty() {
        "No additional context".to_string()
    } else {
        context.chars().take(CONTEXT_PROMPT_CHARS).collect()
    };

    let mut prompt = format!(
        r#"# Legal Eagle: {name} Legal Research Summary

Act as Legal Eagle for {name} legal research.

**Query Analysis**: {query}
Context from files: {context}

The query involves: {query}

CRITICAL INSTRUCTIONS - Format your response EXACTLY like this example:

## Summarized Legislation
Key provisions from {name} statutes relevant to {query}. These often result in compounded charges, leading to disqualification, fines, or imprisonment.

List the specific sections from these acts:
- {crimes}
- {traffic}
- {sentencing}

For EACH relevant section provide:
- **[Act Name], s [Number] ([Section Title])**: [What it prohibits]. Penalties: [Specific penalties]. *Relevance and Parity*: [Why this applies to the query, how it's been applied in similar cases, severity level].

## Recent Cases (Past 2 Years)
Searched AustLII for {name} Magistrates/Supreme Court decisions from 2022-2024 involving {query}. Focus on high-parity cases with similar facts.

For EACH case provide in this format:
- **Case Name [Year] Court Citation (Court Name, decided Year)**: [Facts of case - defendant did X with Y result]. Convicted of [specific charges under sections]. Sentence: [exact sentence]. *Relevance and Parity*: [Why this case matches the query, how it's persuasive for defense or prosecution, specific similarities].

Include at least 4 recent cases with full details.

## Common Law Precedents
Key older precedents (pre-2022) from AustLII searches, establishing principles for {query} in {name}. These set sentencing guidelines and are binding/persuasive.

For EACH precedent:
- **Case Name (Year) Citation (Court)**: [Key facts]. Convicted under [sections]; sentence: [outcome]. Precedent: [What principle this established]. *Relevance and Parity*: [How this applies to current query, whether it supports harsher or lenient sentencing].

Include at least 3 established precedents.

## Penalties Table
Create a comparison table:
| Offense | Section | Minimum Penalty | Maximum Penalty | Typical First Offense | Typical Repeat Offense |
|---------|---------|-----------------|-----------------|----------------------|------------------------|
| [offense] | s[num] | [penalty] | [penalty] | [outcome] | [outcome] |

## Strategic Recommendations
Based on the legislation and cases:
1. **Immediate Actions**: [Specific steps with timeframes]
2. **Evidence Required**: [List with importance ratings]
3. **Mitigation Strategies**: [e.g., early guilty plea for discounts up to 40% under Sentencing Act]
4. **Risk Assessment**: [Likelihood of custodial sentence, disqualification periods]

## Overall Advice
These elements suggest potential for [summarize likely penalties based on precedents]. Recommend [specific strategy]. For court use, cite high-parity cases to argue sentencing bands.

**Important Note**: Consult a qualified {name} lawyer for tailored advice; this is not legal advice.

Cases found in search:
"#,
        crimes = acts.crimes,
        traffic = acts.traffic,
        sentencing = acts.sentencing,
    );

    for (i, case) in cases.iter().take(PROMPT_CASES).enumerate() {
        let _ = write!(prompt, "\n{}. {}", i + 1, case.title);
        if !case.citation.is_empty() {
            let _ = write!(prompt, " {}", case.citation);
        }
        if !case.url.is_empty() {
            let _ = write!(prompt, " - Link: {}", case.url);
        }
    }

    let _ = write!(
        prompt,
        r#"

REMEMBER:
- Use REAL case names and citations (not "Demo Case" or placeholders)
- Include specific section numbers (e.g., s 77, s 45)
- Provide actual penalties from the legislation
- Focus on {name} law specifically
- Match the format of the example EXACTLY"#
    );

    prompt
}
