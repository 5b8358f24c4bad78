use base64::Engine as _;
use conductor_core::api::{Credentials, Provider, ProviderError, SpeechParams, TaskPayload};
use serde::Serialize;
use serde_json::Value;

use super::http::{non_empty, require_key, ProviderClient};

const DEFAULT_VOICE: &str = "21m00Tcm4TlvDq8ikWAM";
const DEFAULT_MODEL: &str = "eleven_multilingual_v2";
const DEFAULT_STABILITY: f32 = 0.5;
const DEFAULT_SIMILARITY: f32 = 0.75;
const AUDIO_FORMAT: &str = "mp3";

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

fn path(voice_id: &str) -> String {
    format!("/v1/text-to-speech/{}", voice_id)
}

pub(super) async fn synthesize(
    client: &ProviderClient,
    params: &SpeechParams,
    credentials: &Credentials,
) -> Result<TaskPayload, ProviderError> {
    let key = require_key(Provider::ElevenLabs, credentials)?;
    let voice_id = params.voice_id.as_deref().unwrap_or(DEFAULT_VOICE);
    let body = SpeechRequest {
        text: &params.text,
        model_id: params.model_id.as_deref().unwrap_or(DEFAULT_MODEL),
        voice_settings: VoiceSettings {
            stability: params.stability.unwrap_or(DEFAULT_STABILITY),
            similarity_boost: params.similarity_boost.unwrap_or(DEFAULT_SIMILARITY),
        },
    };

    let req = client
        .http()
        .post(client.endpoint(Provider::ElevenLabs, &path(voice_id)))
        .header("xi-api-key", key)
        .header("accept", "audio/mpeg")
        .json(&body);

    let audio = client
        .send_bytes(Provider::ElevenLabs, req, error_message)
        .await?;

    Ok(TaskPayload::Audio {
        data: base64::engine::general_purpose::STANDARD.encode(&audio),
        format: AUDIO_FORMAT.to_string(),
    })
}

/// `{"detail": {"message": "..."}}` or `{"detail": "..."}`
fn error_message(envelope: &Value) -> Option<String> {
    non_empty(envelope.pointer("/detail/message")).or_else(|| non_empty(envelope.get("detail")))
}
