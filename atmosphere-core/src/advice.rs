//! Short natural-language tips generated from the current reading.
//!
//! Advice is decoration: [`AdviceRequester::get_advice`] never fails, it falls
//! back to fixed text instead.

use crate::{
    advice::gemini::GeminiClient, config::AdvisorConfig, interpretation, model::WeatherReading,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod gemini;

pub const ADVISOR_UNAVAILABLE: &str = "AI advisor currently unavailable.";
pub const EMPTY_ADVICE: &str = "Enjoy your day, whatever the weather!";
pub const FAILED_ADVICE: &str = "The stars are cloudy, but you're doing great. Stay comfortable!";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub temperature: f64,
    pub top_p: f64,
}

impl Default for Sampling {
    fn default() -> Self {
        Self { temperature: 0.7, top_p: 0.9 }
    }
}

#[async_trait]
pub trait LanguageModel: Send + Sync + Debug {
    /// Complete `prompt`. `Ok(None)` means the model answered with no text.
    async fn generate(&self, prompt: &str, sampling: Sampling) -> anyhow::Result<Option<String>>;
}

#[derive(Debug)]
pub struct AdviceRequester {
    model: Option<Box<dyn LanguageModel>>,
    sampling: Sampling,
}

impl AdviceRequester {
    /// An advisor with no credential; always answers [`ADVISOR_UNAVAILABLE`].
    pub fn disabled() -> Self {
        Self { model: None, sampling: Sampling::default() }
    }

    pub fn with_model(model: Box<dyn LanguageModel>) -> Self {
        Self { model: Some(model), sampling: Sampling::default() }
    }

    pub fn is_enabled(&self) -> bool {
        self.model.is_some()
    }

    pub async fn get_advice(&self, reading: &WeatherReading) -> String {
        let Some(model) = &self.model else {
            return ADVISOR_UNAVAILABLE.to_string();
        };

        let prompt = build_prompt(reading);

        match model.generate(&prompt, self.sampling).await {
            Ok(Some(text)) => text,
            Ok(None) => EMPTY_ADVICE.to_string(),
            Err(err) => {
                tracing::error!(error = %format!("{err:#}"), "advice request failed");
                FAILED_ADVICE.to_string()
            }
        }
    }
}

/// Build the advisor from config. A missing or blank key disables it.
pub fn advice_from_config(config: &AdvisorConfig) -> AdviceRequester {
    match config.api_key() {
        Some(key) => AdviceRequester::with_model(Box::new(GeminiClient::new(
            key.to_string(),
            config.model.clone(),
            config.endpoint.clone(),
        ))),
        None => AdviceRequester::disabled(),
    }
}

pub fn build_prompt(reading: &WeatherReading) -> String {
    format!(
        "You are Atmosphere AI, a witty and helpful weather assistant.\n\
         Current conditions:\n\
         - Temperature: {temp}°C\n\
         - Condition: {condition}\n\
         - Wind: {wind} km/h\n\
         - Period: {period}\n\
         \n\
         In at most two sentences, give the user friendly, practical advice for today: \
         what to wear or something to do. Keep it short and stylish.",
        temp = reading.temperature_c,
        condition = interpretation::label_or_unknown(reading.weather_code),
        wind = reading.wind_speed_kmh,
        period = reading.period(),
    )
}
