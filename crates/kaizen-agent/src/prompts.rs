// ABOUTME: Prompt builders for problem analysis, agent generation, and impact simulation.
// ABOUTME: Each builder is pure and embeds the exact JSON shape the response normalizer will accept.

use kaizen_core::{AgentRecord, CompanyFacts, ProblemRecord};

/// Maximum number of uploaded file excerpts folded into the analysis prompt.
pub const MAX_FILE_EXCERPTS: usize = 3;

/// Output shape requested from the analysis prompt. Must deserialize into
/// `AnalysisResult`.
pub const ANALYSIS_SCHEMA_EXAMPLE: &str = r#"{
    "company_summary": "brief summary here",
    "problems": [
        {
            "title": "Problem Title",
            "description": "Detailed description",
            "impact": "Business impact explanation",
            "cost_per_month": 1200.00
        }
    ]
}"#;

/// Output shape requested from the agent prompt. Must deserialize into
/// `AgentGenerationResult`.
pub const AGENT_SCHEMA_EXAMPLE: &str = r#"{
    "agents": [
        {
            "name": "AgentName",
            "description": "What this agent does",
            "capabilities": ["capability 1", "capability 2", "capability 3"],
            "target_problem": "Problem Title it solves"
        }
    ]
}"#;

/// Output shape requested from the simulation prompt. Must deserialize into
/// `SimulationResult`.
pub const SIMULATION_SCHEMA_EXAMPLE: &str = r#"{
    "metrics": [
        {
            "metric_name": "Planning Time",
            "before": "3 hours/day",
            "after": "15 minutes/day",
            "improvement_percent": 91.7
        }
    ],
    "total_monthly_savings": 4500.00,
    "roi_description": "Brief explanation of overall ROI and payback period"
}"#;

const ANALYSIS_SYSTEM: &str = "You are an expert business operations analyst. Your job is to identify \
operational inefficiencies, bottlenecks, and improvement opportunities in companies.";

const AGENT_SYSTEM: &str = "You are an AI architect that designs custom AI agents. For each business \
problem, you create a specialized agent with specific capabilities to solve that problem.";

const SIMULATION_SYSTEM: &str = "You are a business impact analyst. You calculate the measurable \
improvements that AI agents would bring to business operations.";

/// A system instruction plus the user-facing prompt text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

fn json_instruction(schema: &str) -> String {
    format!(
        "Respond in this EXACT JSON format (no markdown, just raw JSON):\n{}",
        schema
    )
}

/// Build the problem-analysis prompt.
///
/// The description comes first, then the enrichment facts (when present and
/// non-empty), then at most [`MAX_FILE_EXCERPTS`] uploaded file excerpts
/// separated by blank lines.
pub fn build_analysis_prompt(
    description: &str,
    enrichment: Option<&CompanyFacts>,
    file_excerpts: &[String],
) -> Prompt {
    let mut company = description.to_string();

    if let Some(facts) = enrichment.filter(|f| !f.is_empty()) {
        let rendered = serde_json::to_string_pretty(facts).unwrap_or_default();
        company.push_str("\n\nAdditional Company Data:\n");
        company.push_str(&rendered);
    }

    let excerpts: Vec<&str> = file_excerpts
        .iter()
        .take(MAX_FILE_EXCERPTS)
        .map(String::as_str)
        .collect();
    if !excerpts.is_empty() {
        company.push_str("\n\nAdditional Context from Uploaded Files:\n");
        company.push_str(&excerpts.join("\n\n"));
    }

    let user = format!(
        "Analyze this company description and identify 2-4 specific operational problems \
that could be improved with AI automation or optimization.

Company Description:
{company}

For each problem, provide:
1. A clear title
2. Detailed description of the issue
3. Business impact explanation
4. Estimated monthly cost (in dollars)

Also provide a brief company summary.

{instruction}",
        company = company,
        instruction = json_instruction(ANALYSIS_SCHEMA_EXAMPLE),
    );

    Prompt {
        system: ANALYSIS_SYSTEM.to_string(),
        user,
    }
}

/// Build the agent-generation prompt: one agent per problem.
pub fn build_agent_prompt(problems: &[ProblemRecord]) -> Prompt {
    let problems_text = problems
        .iter()
        .enumerate()
        .map(|(i, p)| {
            format!(
                "Problem {}: {}\n{}\nImpact: {}",
                i + 1,
                p.title,
                p.description,
                p.impact
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let user = format!(
        "Design custom AI agents to solve these business problems. Each agent should be \
specifically tailored to its target problem.

PROBLEMS:
{problems_text}

For each problem, create exactly one specialized agent with:
1. A descriptive name (e.g., \"RouteOptimizer\", \"InventoryPredictor\")
2. Clear description of what it does
3. 3-5 specific capabilities
4. Which problem it targets (use the problem title exactly as written above)

{instruction}",
        problems_text = problems_text,
        instruction = json_instruction(AGENT_SCHEMA_EXAMPLE),
    );

    Prompt {
        system: AGENT_SYSTEM.to_string(),
        user,
    }
}

/// Build the impact-simulation prompt from problems and the agents that
/// address them.
pub fn build_simulation_prompt(problems: &[ProblemRecord], agents: &[AgentRecord]) -> Prompt {
    let problems_text = problems
        .iter()
        .map(|p| format!("- {}: {}", p.title, p.impact))
        .collect::<Vec<_>>()
        .join("\n");
    let agents_text = agents
        .iter()
        .map(|a| format!("- {}: {}", a.name, a.description))
        .collect::<Vec<_>>()
        .join("\n");

    let user = format!(
        "Calculate the business impact of implementing these AI agents to solve the problems.

PROBLEMS:
{problems_text}

AGENTS:
{agents_text}

Provide:
1. 3-5 key metrics showing before/after comparison
2. Percentage improvement for each
3. Total monthly savings estimate
4. ROI description

{instruction}",
        problems_text = problems_text,
        agents_text = agents_text,
        instruction = json_instruction(SIMULATION_SCHEMA_EXAMPLE),
    );

    Prompt {
        system: SIMULATION_SYSTEM.to_string(),
        user,
    }
}
