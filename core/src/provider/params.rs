//! Typed parameter shapes, one per adapter family.
//!
//! Every optional field is left as `None` here; the adapter owning the struct
//! decides its own default. Keys are camelCase on the wire, snake_case accepted.

use serde::{Deserialize, Serialize};

/// Stability image generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageParams {
    #[serde(default)]
    pub prompt: String,
    #[serde(default, alias = "negative_prompt")]
    pub negative_prompt: Option<String>,
    #[serde(default, alias = "aspect_ratio")]
    pub aspect_ratio: Option<String>,
    #[serde(default, alias = "output_format")]
    pub output_format: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Luma Dream Machine video generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LumaParams {
    #[serde(default)]
    pub prompt: String,
    #[serde(default, alias = "aspect_ratio")]
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, rename = "loop")]
    pub loop_video: Option<bool>,
}

/// Runway image-to-video generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunwayParams {
    #[serde(default, alias = "promptText")]
    pub prompt: String,
    #[serde(default, alias = "prompt_image", alias = "imageUrl", alias = "image_url")]
    pub prompt_image: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub ratio: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>,
}

/// ElevenLabs text-to-speech.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechParams {
    #[serde(default, alias = "prompt")]
    pub text: String,
    #[serde(default, alias = "voice_id")]
    pub voice_id: Option<String>,
    #[serde(default, alias = "model_id", alias = "model")]
    pub model_id: Option<String>,
    #[serde(default)]
    pub stability: Option<f32>,
    #[serde(default, alias = "similarity_boost")]
    pub similarity_boost: Option<f32>,
}

/// Chat-style text generation shared by the LLM adapters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextParams {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, alias = "system_prompt", alias = "system")]
    pub system_prompt: Option<String>,
    #[serde(default, alias = "max_tokens")]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_params_accepts_both_casings() {
        let camel: ImageParams =
            serde_json::from_str(r#"{"prompt":"cat","aspectRatio":"1:1"}"#).unwrap();
        let snake: ImageParams =
            serde_json::from_str(r#"{"prompt":"cat","aspect_ratio":"1:1"}"#).unwrap();
        assert_eq!(camel, snake);
        assert_eq!(camel.aspect_ratio.as_deref(), Some("1:1"));
    }

    #[test]
    fn test_missing_fields_stay_unset() {
        let params: TextParams = serde_json::from_str(r#"{"prompt":"hi"}"#).unwrap();
        assert_eq!(params.prompt, "hi");
        assert!(params.model.is_none());
        assert!(params.max_tokens.is_none());
    }

    #[test]
    fn test_speech_accepts_prompt_as_text() {
        let params: SpeechParams =
            serde_json::from_str(r#"{"prompt":"read me","voiceId":"v1"}"#).unwrap();
        assert_eq!(params.text, "read me");
        assert_eq!(params.voice_id.as_deref(), Some("v1"));
    }

    #[test]
    fn test_luma_loop_field() {
        let params: LumaParams = serde_json::from_str(r#"{"prompt":"p","loop":true}"#).unwrap();
        assert_eq!(params.loop_video, Some(true));
    }
}
