// ABOUTME: Extracts the structured JSON object from free-form model output
// ABOUTME: Accepts fenced ```json blocks, bare JSON, or the outermost brace span
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::warn;

use crate::errors::{AppError, AppResult, ErrorCode};

/// Fenced code block, optionally tagged `json`
static FENCED_JSON: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json|JSON)?\s*\n?(.*?)```").ok());

/// Find the JSON document inside a model response
///
/// # Errors
///
/// Returns `ExternalResponseInvalid` when no candidate parses as JSON
pub fn extract_json(response: &str, agent: &str) -> AppResult<Value> {
    let trimmed = response.trim();

    // First try: a fenced block
    if let Some(pattern) = FENCED_JSON.as_ref() {
        for captures in pattern.captures_iter(trimmed) {
            if let Some(body) = captures.get(1) {
                if let Ok(value) = serde_json::from_str::<Value>(body.as_str().trim()) {
                    return Ok(value);
                }
            }
        }
    }

    // Second try: the whole response
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    // Third try: outermost object span
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<Value>(&trimmed[start..=end]) {
                return Ok(value);
            }
        }
    }

    warn!(
        agent,
        response_len = response.len(),
        "Model response contained no parsable JSON"
    );
    Err(AppError::external_response_invalid(
        agent,
        "Could not extract valid JSON from model response",
    ))
}

/// Extract and deserialize the model output into `T`
///
/// # Errors
///
/// Returns `ExternalResponseInvalid` when the JSON is missing or does not match `T`
pub fn parse_structured<T: DeserializeOwned>(response: &str, agent: &str) -> AppResult<T> {
    let value = extract_json(response, agent)?;
    serde_json::from_value(value).map_err(|e| {
        warn!(agent, "Model JSON did not match the expected shape: {e}");
        AppError::new(
            ErrorCode::ExternalResponseInvalid,
            format!("{agent}: response did not match the expected schema: {e}"),
        )
        .with_source(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        text: String,
    }

    #[test]
    fn test_fenced_block_with_prose() {
        let raw = "여기 결과입니다.\n```json\n{\"text\": \"안녕\"}\n```\n좋은 하루 보내세요!";
        let sample: Sample = parse_structured(raw, "coach").unwrap();
        assert_eq!(sample.text, "안녕");
    }

    #[test]
    fn test_untagged_fence() {
        let raw = "```\n{\"text\": \"plain\"}\n```";
        let sample: Sample = parse_structured(raw, "coach").unwrap();
        assert_eq!(sample.text, "plain");
    }

    #[test]
    fn test_bare_json() {
        let sample: Sample = parse_structured("  {\"text\": \"bare\"}  ", "coach").unwrap();
        assert_eq!(sample.text, "bare");
    }

    #[test]
    fn test_outermost_braces() {
        let raw = "Sure! {\"text\": \"nested {braces}\"} hope that helps";
        let sample: Sample = parse_structured(raw, "coach").unwrap();
        assert_eq!(sample.text, "nested {braces}");
    }

    #[test]
    fn test_no_json_is_invalid_response() {
        let err = extract_json("죄송하지만 도와드릴 수 없어요.", "planner").unwrap_err();
        assert_eq!(err.code, ErrorCode::ExternalResponseInvalid);
    }

    #[test]
    fn test_shape_mismatch_is_invalid_response() {
        let err = parse_structured::<Sample>("{\"other\": 1}", "coach").unwrap_err();
        assert_eq!(err.code, ErrorCode::ExternalResponseInvalid);
    }
}
