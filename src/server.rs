//! HTTP surface: routing, request/response shapes, and the mapping from
//! [`LanguageError`] to status codes and localized messages.
//!
//! Authentication itself lives upstream; an auth layer resolves the session
//! and installs the caller's id in the `x-user-id` header. Requests without
//! a usable id are rejected here with 401.

use crate::config::Config;
use crate::db::Database;
use crate::delivery::{Channel, EmailChannel, SmsChannel};
use crate::i18n::strings;
use crate::language::{ChangeRequested, LanguageError, LanguageService};
use crate::otp::OtpGenerator;
use crate::translate::Translator;
use anyhow::Result;
use axum::{
    async_trait,
    extract::{FromRequestParts, Query, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::error;

/// Shared application state.
pub struct AppState {
    pub service: LanguageService,
    pub translator: Translator,
}

impl AppState {
    /// Wire the service and its collaborators from configuration.
    pub fn from_config(config: &Config, db: Database) -> Result<Arc<Self>> {
        let otp = OtpGenerator::new(&config.otp_secret)?;
        let email = EmailChannel::new(
            config.mail_api_base.clone(),
            config.mail_api_token.clone(),
            config.mail_from.clone(),
        );
        let sms = SmsChannel::new(
            config.twilio_api_base.clone(),
            config.twilio_account_sid.clone(),
            config.twilio_auth_token.clone(),
            config.twilio_from.clone(),
        );

        Ok(Arc::new(Self {
            service: LanguageService::new(db, otp, email, sms),
            translator: Translator::new(config.translation_api_base.clone()),
        }))
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/language/request-change", post(request_change))
        .route("/language/verify-change", post(verify_change))
        .route("/language/translate", get(translate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

// ==================== Auth ====================

/// Caller identity, resolved by the upstream auth layer.
pub struct AuthenticatedUser(pub i64);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthenticatedUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .map(AuthenticatedUser)
            .ok_or_else(|| message_response(StatusCode::UNAUTHORIZED, strings::UNAUTHORIZED))
    }
}

// ==================== Request/Response Shapes ====================

#[derive(Debug, Deserialize)]
struct RequestChangeBody {
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VerifyChangeBody {
    otp: Option<String>,
}

#[derive(Debug, Serialize)]
struct MessageBody {
    message: String,
}

#[derive(Debug, Serialize)]
struct RequestChangeReply {
    message: String,
    #[serde(rename = "otpType", skip_serializing_if = "Option::is_none")]
    otp_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct VerifyChangeReply {
    message: String,
    language: &'static str,
}

fn message_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(MessageBody {
            message: message.into(),
        }),
    )
        .into_response()
}

// ==================== Error Mapping ====================

fn error_response(err: LanguageError) -> Response {
    // Transport and storage details stay in the logs; the client gets a
    // generic message.
    match &err {
        LanguageError::Cooldown => {
            message_response(StatusCode::TOO_MANY_REQUESTS, err.to_string())
        }
        LanguageError::UserNotFound => message_response(StatusCode::NOT_FOUND, err.to_string()),
        LanguageError::Delivery(inner) => {
            error!("Delivery failure: {}", inner);
            message_response(StatusCode::BAD_GATEWAY, strings::DELIVERY_FAILED)
        }
        LanguageError::Storage(inner) => {
            error!("Storage failure: {}", inner);
            message_response(StatusCode::INTERNAL_SERVER_ERROR, strings::INTERNAL_ERROR)
        }
        _ => message_response(StatusCode::BAD_REQUEST, err.to_string()),
    }
}

// ==================== Handlers ====================

async fn request_change(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Json(body): Json<RequestChangeBody>,
) -> Response {
    let Some(target) = body.language.filter(|l| !l.is_empty()) else {
        return message_response(StatusCode::BAD_REQUEST, strings::LANGUAGE_REQUIRED);
    };

    match state.service.request_change(user_id, &target).await {
        Ok(ChangeRequested::Committed { language }) => (
            StatusCode::OK,
            Json(RequestChangeReply {
                message: strings::strings_for(language)
                    .language_switch_success
                    .to_string(),
                otp_type: None,
                language: Some(language.code()),
            }),
        )
            .into_response(),
        Ok(ChangeRequested::CodeSent { channel, language }) => {
            let localized = strings::strings_for(language);
            let message = match channel {
                Channel::Email => localized.otp_sent_email,
                Channel::Sms => localized.otp_sent_sms,
            };
            (
                StatusCode::OK,
                Json(RequestChangeReply {
                    message: message.to_string(),
                    otp_type: Some(channel.as_str()),
                    language: None,
                }),
            )
                .into_response()
        }
        Err(err) => error_response(err),
    }
}

async fn verify_change(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Json(body): Json<VerifyChangeBody>,
) -> Response {
    let Some(otp) = body.otp.filter(|o| !o.is_empty()) else {
        return message_response(StatusCode::BAD_REQUEST, strings::OTP_REQUIRED);
    };

    match state.service.verify_change(user_id, &otp).await {
        Ok(language) => (
            StatusCode::OK,
            Json(VerifyChangeReply {
                message: strings::strings_for(language)
                    .language_switch_success
                    .to_string(),
                language: language.code(),
            }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

#[derive(Debug, Deserialize)]
struct TranslateParams {
    text: Option<String>,
    to: Option<String>,
    from: Option<String>,
}

#[derive(Debug, Serialize)]
struct TranslateReply {
    message: String,
    translation: String,
}

async fn translate(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TranslateParams>,
) -> Response {
    let (Some(text), Some(to)) = (params.text, params.to) else {
        return message_response(StatusCode::BAD_REQUEST, "Missing text or target language.");
    };
    let from = params.from.unwrap_or_else(|| "en".to_string());

    match state.translator.translate(&text, &to, &from).await {
        Ok(translation) => (
            StatusCode::OK,
            Json(TranslateReply {
                message: "Successfully translated.".to_string(),
                translation,
            }),
        )
            .into_response(),
        Err(err) => {
            error!("Translation passthrough failed: {}", err);
            message_response(StatusCode::BAD_GATEWAY, err.to_string())
        }
    }
}
