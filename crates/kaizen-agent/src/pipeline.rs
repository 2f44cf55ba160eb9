// ABOUTME: Endpoint orchestrators chaining prompt building, the provider chain, and normalization.
// ABOUTME: Analyze, agent generation, and simulation each make exactly one chained provider call.

use std::sync::Arc;

use kaizen_core::{
    AgentGenerationResult, AnalysisResult, AnalyzeRequest, PipelineError, SimulateRequest,
    SimulationResult, Validate,
};
use serde::de::DeserializeOwned;
use tracing::Instrument;
use ulid::Ulid;

use crate::client::ProviderChain;
use crate::enrich::Enricher;
use crate::normalize::normalize;
use crate::prompts::{self, Prompt};

/// Stateless orchestrator shared by all requests.
#[derive(Clone, Default)]
pub struct Pipeline {
    chain: Arc<ProviderChain>,
    enricher: Option<Enricher>,
}

impl Pipeline {
    pub fn new(chain: ProviderChain) -> Self {
        Self {
            chain: Arc::new(chain),
            enricher: None,
        }
    }

    /// Enable best-effort enrichment of analysis prompts.
    pub fn with_enricher(mut self, enricher: Enricher) -> Self {
        self.enricher = Some(enricher);
        self
    }

    /// Names of the configured providers, in attempt order.
    pub fn providers(&self) -> Vec<&str> {
        self.chain.provider_names()
    }

    pub fn has_enricher(&self) -> bool {
        self.enricher.is_some()
    }

    /// Identify operational problems in a company description.
    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResult, PipelineError> {
        let span = tracing::info_span!("analyze", request_id = %Ulid::new());
        async {
            let enrichment = match &self.enricher {
                Some(enricher) => enricher.enrich(&request.description).await,
                None => None,
            };
            let prompt = prompts::build_analysis_prompt(
                &request.description,
                enrichment.as_ref(),
                &request.file_contents,
            );

            let result: AnalysisResult = self.run("analyze", prompt).await?;

            if !(2..=4).contains(&result.problems.len()) {
                tracing::warn!(count = result.problems.len(), "expected 2-4 problems");
            }
            Ok(result)
        }
        .instrument(span)
        .await
    }

    /// Propose one agent per problem in `analysis`.
    pub async fn generate_agents(
        &self,
        analysis: &AnalysisResult,
    ) -> Result<AgentGenerationResult, PipelineError> {
        let span = tracing::info_span!(
            "generate_agents",
            request_id = %Ulid::new(),
            problems = analysis.problems.len()
        );
        async {
            let prompt = prompts::build_agent_prompt(&analysis.problems);
            let result: AgentGenerationResult = self.run("generate_agents", prompt).await?;

            if result.agents.len() != analysis.problems.len() {
                tracing::warn!(
                    agents = result.agents.len(),
                    problems = analysis.problems.len(),
                    "expected one agent per problem"
                );
            }
            for agent in &result.agents {
                if !analysis.problems.iter().any(|p| p.title == agent.target_problem) {
                    tracing::warn!(
                        agent = %agent.name,
                        target_problem = %agent.target_problem,
                        "agent targets an unknown problem title"
                    );
                }
            }
            Ok(result)
        }
        .instrument(span)
        .await
    }

    /// Estimate the impact of deploying `request.agents` against
    /// `request.problems`. Empty inputs are passed through to the provider.
    pub async fn simulate(
        &self,
        request: &SimulateRequest,
    ) -> Result<SimulationResult, PipelineError> {
        let span = tracing::info_span!(
            "simulate",
            request_id = %Ulid::new(),
            problems = request.problems.len(),
            agents = request.agents.len()
        );
        async {
            let prompt = prompts::build_simulation_prompt(&request.problems, &request.agents);
            let result: SimulationResult = self.run("simulate", prompt).await?;

            if !(3..=5).contains(&result.metrics.len()) {
                tracing::warn!(count = result.metrics.len(), "expected 3-5 metrics");
            }
            Ok(result)
        }
        .instrument(span)
        .await
    }

    async fn run<T>(&self, step: &'static str, prompt: Prompt) -> Result<T, PipelineError>
    where
        T: DeserializeOwned + Validate,
    {
        let outcome = match self.chain.generate(&prompt.user, &prompt.system).await {
            Ok(raw) => normalize::<T>(&raw),
            Err(e) => Err(e),
        };

        match &outcome {
            Ok(_) => tracing::info!(step, "pipeline step completed"),
            Err(e) => tracing::error!(step, kind = e.kind(), error = %e, "pipeline step failed"),
        }
        outcome
    }
}
