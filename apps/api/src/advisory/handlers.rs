//! Axum route handlers for the Profile Form page and the Advisory API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Form, Json,
};
use maud::Markup;

use crate::advisory::profile::Profile;
use crate::advisory::submission::{run_submission, SubmissionOutcome};
use crate::errors::AppError;
use crate::render::html::{render_page, Notice, PageView};
use crate::render::RenderedAdvisory;
use crate::state::AppState;

/// GET /
///
/// The empty Profile Form, with the configuration banner when the key is missing.
pub async fn handle_form_page(State(state): State<AppState>) -> Markup {
    let config_error = state.config.configuration_error();

    render_page(&PageView {
        profile: &Profile::default(),
        config_error: config_error.as_deref(),
        notice: None,
    })
}

/// POST /advisory
///
/// Form submission. Always answers with the page: prefilled fields plus the
/// warning, the rendered advisory, or the error.
pub async fn handle_form_submit(
    State(state): State<AppState>,
    Form(profile): Form<Profile>,
) -> (StatusCode, Markup) {
    let outcome = run_submission(state.generator.as_ref(), &state.gate, &profile).await;
    let config_error = state.config.configuration_error();

    let error_message;
    let (status, notice) = match &outcome {
        SubmissionOutcome::Rejected(warning) => (StatusCode::OK, Notice::Warning(warning)),
        SubmissionOutcome::Rendered(advisory) => (StatusCode::OK, Notice::Advisory(advisory)),
        SubmissionOutcome::Errored(err) => {
            error_message = format!("An error occurred: {}", err.user_message());
            let status = match err {
                AppError::Busy => StatusCode::CONFLICT,
                _ => StatusCode::OK,
            };
            (status, Notice::Error(&error_message))
        }
    };

    let page = render_page(&PageView {
        profile: &profile,
        config_error: config_error.as_deref(),
        notice: Some(notice),
    });

    (status, page)
}

/// POST /api/v1/advisory
///
/// JSON variant of the form submission. A partially rendered advisory is
/// reported as a shape error. A body that does not decode as a profile is a
/// validation error.
pub async fn handle_api_advisory(
    State(state): State<AppState>,
    payload: Result<Json<Profile>, JsonRejection>,
) -> Result<Json<RenderedAdvisory>, AppError> {
    let Json(profile) =
        payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    match run_submission(state.generator.as_ref(), &state.gate, &profile).await {
        SubmissionOutcome::Rejected(warning) => Err(AppError::Validation(warning)),
        SubmissionOutcome::Errored(err) => Err(err),
        SubmissionOutcome::Rendered(advisory) => match advisory.shape_error {
            Some(message) => Err(AppError::Shape(message)),
            None => Ok(Json(advisory)),
        },
    }
}
