//! Client for the backend analysis service.

use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::components::er_diagram::AnalysisResponse;

/// Analysis endpoint, relative to the page origin.
pub const ANALYZE_ENDPOINT: &str = "/analyze";
/// Prefix of generated file downloads.
pub const DOWNLOAD_PREFIX: &str = "/download/";

/// Ways an analysis request can fail.
#[derive(Debug, Error)]
pub enum ApiError {
	/// The request never got a response.
	#[error("request failed: {0}")]
	Request(String),
	/// Non-success HTTP status with the server's explanation.
	#[error("server responded with {0}: {1}")]
	Status(u16, String),
	/// The body was not a valid analysis response.
	#[error("invalid response: {0}")]
	Decode(#[from] serde_json::Error),
	/// The backend reported a failed analysis.
	#[error("{0}")]
	Backend(String),
}

impl From<JsValue> for ApiError {
	fn from(value: JsValue) -> Self {
		ApiError::Request(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
	directory_path: &'a str,
}

/// Link to a generated file.
pub fn download_url(file: &str) -> String {
	format!("{DOWNLOAD_PREFIX}{file}")
}

/// Turns a raw `/analyze` reply into a result. Non-2xx replies and replies
/// with `success: false` become errors carrying the backend's message.
pub fn interpret_response(status: u16, body: &str) -> Result<AnalysisResponse, ApiError> {
	if !(200..300).contains(&status) {
		let message = serde_json::from_str::<AnalysisResponse>(body)
			.ok()
			.and_then(|r| r.error)
			.unwrap_or_else(|| body.trim().to_string());
		return Err(ApiError::Status(status, message));
	}
	let response: AnalysisResponse = serde_json::from_str(body)?;
	if !response.success {
		let message = response
			.error
			.clone()
			.filter(|e| !e.is_empty())
			.unwrap_or_else(|| response.message.clone());
		return Err(ApiError::Backend(message));
	}
	Ok(response)
}

/// Asks the backend to analyze the mapper files under `directory_path`.
pub async fn analyze(directory_path: &str) -> Result<AnalysisResponse, ApiError> {
	let window = web_sys::window().ok_or_else(|| ApiError::Request("no window".into()))?;
	let body = serde_json::to_string(&AnalyzeRequest { directory_path })?;

	let init = RequestInit::new();
	init.set_method("POST");
	init.set_body(&JsValue::from_str(&body));
	let request = Request::new_with_str_and_init(ANALYZE_ENDPOINT, &init)?;
	request.headers().set("Content-Type", "application/json")?;

	log::info!("analyzing {directory_path}");
	let reply = JsFuture::from(window.fetch_with_request(&request)).await?;
	let response: Response = reply
		.dyn_into()
		.map_err(|_| ApiError::Request("fetch did not return a Response".into()))?;
	let text = JsFuture::from(response.text()?).await?.as_string().unwrap_or_default();

	let result = interpret_response(response.status(), &text);
	match &result {
		Ok(r) => log::info!("analysis found {} relationships", r.relationships.len()),
		Err(err) => log::warn!("analysis failed: {err}"),
	}
	result
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn request_body_shape() {
		let body = serde_json::to_string(&AnalyzeRequest { directory_path: "/src/mappers" }).unwrap();
		assert_eq!(body, r#"{"directory_path":"/src/mappers"}"#);
	}

	#[test]
	fn success_reply_is_decoded() {
		let r = interpret_response(200, r#"{"success":true,"message":"ok","relationships":[]}"#).unwrap();
		assert_eq!(r.message, "ok");
	}

	#[test]
	fn failed_analysis_surfaces_backend_error() {
		let err = interpret_response(200, r#"{"success":false,"error":"Directory not found"}"#).unwrap_err();
		assert_eq!(err.to_string(), "Directory not found");
	}

	#[test]
	fn http_error_keeps_status() {
		let err = interpret_response(500, r#"{"success":false,"error":"boom"}"#).unwrap_err();
		assert!(matches!(err, ApiError::Status(500, ref m) if m == "boom"));
	}

	#[test]
	fn garbage_is_a_decode_error() {
		assert!(matches!(interpret_response(200, "<html>"), Err(ApiError::Decode(_))));
	}

	#[test]
	fn download_links() {
		assert_eq!(download_url("er.puml"), "/download/er.puml");
	}
}
