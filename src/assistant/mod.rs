//! Conversational assistant for city planners.
//!
//! Questions are answered either by an OpenAI-compatible chat completions
//! API or, without network access, by a deterministic offline backend that
//! only restates the supplied metrics.

#[cfg(feature = "api")]
mod openai;

use serde_json::Value;

use crate::config::AssistantConfig;

#[cfg(feature = "api")]
pub use openai::OpenAiClient;

/// Base instructions sent with every conversation.
pub const SYSTEM_PROMPT: &str = "You are RegeneraX, an AI assistant specialized in urban planning \
and regenerative city design. You help users understand city data, interpret simulations, \
and make informed decisions about sustainable interventions.";

/// Reply used when the upstream model returns no content.
pub const FALLBACK_REPLY: &str = "I apologize, but I couldn't process that request.";

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("environment variable `{0}` is not set")]
    MissingApiKey(String),
    #[error("unknown assistant backend \"{0}\"")]
    UnknownBackend(String),
    #[error("assistant backend \"{0}\" is not compiled in (enable the `api` feature)")]
    Unsupported(String),
    #[cfg(feature = "api")]
    #[error("assistant request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Builds the system prompt, appending the metrics snapshot if present.
pub fn system_prompt(metrics: Option<&Value>) -> String {
    let mut prompt = SYSTEM_PROMPT.to_string();
    if let Some(metrics) = metrics {
        let pretty = serde_json::to_string_pretty(metrics).unwrap_or_else(|_| metrics.to_string());
        prompt.push_str("\n\nCurrent city metrics:\n");
        prompt.push_str(&pretty);
        prompt.push_str(
            "\n\nIMPORTANT: Use ONLY the provided metrics in your responses. \
             Do not invent or hallucinate numbers.",
        );
    }
    prompt
}

#[derive(Debug, Clone)]
enum Backend {
    Offline,
    #[cfg(feature = "api")]
    OpenAi(OpenAiClient),
}

/// Front door for chat requests; dispatches to the configured backend.
#[derive(Debug, Clone)]
pub struct Assistant {
    backend: Backend,
}

impl Assistant {
    /// Assistant that never leaves the process.
    pub fn offline() -> Self {
        Self {
            backend: Backend::Offline,
        }
    }

    /// Builds the backend named in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::MissingApiKey`] when the `openai` backend's
    /// key variable is unset, [`AssistantError::UnknownBackend`] for an
    /// unrecognised name, and [`AssistantError::Unsupported`] when the
    /// `openai` backend is requested without the `api` feature.
    pub fn from_config(config: &AssistantConfig) -> Result<Self, AssistantError> {
        match config.backend.as_str() {
            "offline" => Ok(Self::offline()),
            #[cfg(feature = "api")]
            "openai" => {
                let api_key = std::env::var(&config.api_key_env)
                    .ok()
                    .filter(|k| !k.trim().is_empty())
                    .ok_or_else(|| AssistantError::MissingApiKey(config.api_key_env.clone()))?;
                Ok(Self {
                    backend: Backend::OpenAi(OpenAiClient::new(config, api_key)?),
                })
            }
            #[cfg(not(feature = "api"))]
            "openai" => Err(AssistantError::Unsupported(config.backend.clone())),
            other => Err(AssistantError::UnknownBackend(other.to_string())),
        }
    }

    /// Short backend label for logs.
    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Offline => "offline",
            #[cfg(feature = "api")]
            Backend::OpenAi(_) => "openai",
        }
    }

    /// Answers `message`, grounding the answer in `metrics` when given.
    ///
    /// # Errors
    ///
    /// Returns an [`AssistantError`] if the upstream request fails.
    pub async fn reply(
        &self,
        message: &str,
        metrics: Option<&Value>,
    ) -> Result<String, AssistantError> {
        match &self.backend {
            Backend::Offline => Ok(offline_reply(message, metrics)),
            #[cfg(feature = "api")]
            Backend::OpenAi(client) => {
                let content = client.complete(&system_prompt(metrics), message).await?;
                Ok(content
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| FALLBACK_REPLY.to_string()))
            }
        }
    }
}

/// Metric keys the offline backend knows how to phrase, with the words
/// that select them.
const KNOWN_METRICS: [(&str, &str, &str); 4] = [
    ("totalEnergy", "energy", "total energy demand is {} kWh/day"),
    ("totalWater", "water", "total water demand is {} L/day"),
    ("totalMaterials", "material", "material flow is {} kg"),
    ("averageStress", "stress", "average stress level is {}"),
];

/// Deterministic answer built only from the metrics snapshot.
///
/// Metrics whose keyword appears in the question are reported; if none
/// match, every known metric is reported.
pub fn offline_reply(message: &str, metrics: Option<&Value>) -> String {
    let Some(metrics) = metrics else {
        return "I don't have simulation metrics for this city yet. \
                Run a simulation and ask again."
            .to_string();
    };

    let question = message.to_lowercase();
    let available: Vec<(&str, &str, f64)> = KNOWN_METRICS
        .iter()
        .filter_map(|&(key, keyword, template)| {
            metrics
                .get(key)
                .and_then(Value::as_f64)
                .map(|v| (keyword, template, v))
        })
        .collect();

    if available.is_empty() {
        return "The supplied metrics don't include any figures I can report on.".to_string();
    }

    let asked: Vec<&(&str, &str, f64)> = available
        .iter()
        .filter(|(keyword, _, _)| question.contains(keyword))
        .collect();
    let selected: Vec<&(&str, &str, f64)> = if asked.is_empty() {
        available.iter().collect()
    } else {
        asked
    };

    let facts: Vec<String> = selected
        .iter()
        .map(|(_, template, v)| template.replacen("{}", &v.to_string(), 1))
        .collect();
    let mut reply = format!("Based on the latest metrics, {}.", facts.join("; "));

    if let Some(stress) = metrics.get("averageStress").and_then(Value::as_f64) {
        reply.push(' ');
        reply.push_str(stress_advice(stress));
    }
    reply
}

fn stress_advice(stress: f64) -> &'static str {
    if stress >= 0.7 {
        "Stress is high: prioritise passive cooling and green roofs on the most loaded buildings."
    } else if stress >= 0.4 {
        "Stress is moderate: rainwater harvesting and solar panels offer the quickest returns."
    } else {
        "Stress is low: focus on maintaining current performance."
    }
}
