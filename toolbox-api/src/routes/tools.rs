/// Tool catalog, simulator and favorite endpoints
///
/// # Endpoints
///
/// Public:
/// - `GET /api/tools` - Catalog and categories
/// - `GET /api/tools/:tool_id` - One catalog entry
///
/// Bearer token required:
/// - `POST /api/tools/:tool_id/generate` - text-generator, image-generator, code-assistant
/// - `POST /api/tools/:tool_id/translate` - translation
/// - `POST /api/tools/:tool_id/favorite` - Add to favorites
/// - `DELETE /api/tools/:tool_id/favorite` - Remove from favorites
///
/// Running a tool validates the body first, then records one use, then waits
/// for the simulator. A rejected body is never counted.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{auth::MessageResponse, parse_body},
};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;
use serde_json::Value as JsonValue;
use toolbox_shared::{
    auth::middleware::Principal,
    models::{favorite::Favorite, tool_usage::ToolUsage},
    tools::{self, CodeAssistant, ImageGenerator, TextGenerator, Tool, ToolSimulator, Translator},
};

/// Catalog response
#[derive(Debug, Serialize)]
pub struct ToolListResponse {
    pub tools: &'static [Tool],
    pub categories: Vec<&'static str>,
}

/// Simulator response
#[derive(Debug, Serialize)]
pub struct ToolRunResponse<T> {
    pub success: bool,
    pub result: T,
}

/// Lists the whole catalog
pub async fn list_tools() -> Json<ToolListResponse> {
    Json(ToolListResponse {
        tools: tools::CATALOG,
        categories: tools::categories(),
    })
}

/// Returns one catalog entry
///
/// # Errors
///
/// - `404 Not Found`: Unknown tool ID
pub async fn get_tool(Path(tool_id): Path<String>) -> ApiResult<Json<&'static Tool>> {
    Ok(Json(tools::require(&tool_id)?))
}

async fn run_simulator<S: ToolSimulator>(
    state: &AppState,
    principal: &Principal,
    simulator: S,
    body: JsonValue,
) -> ApiResult<Response> {
    let input: S::Input = parse_body(body)?;
    let request = simulator.validate(input)?;

    ToolUsage::record(&state.store, principal.user_id, S::TOOL_ID).await?;

    let result = simulator
        .run(request, state.config.tools.simulate_latency)
        .await;

    Ok(Json(ToolRunResponse {
        success: true,
        result,
    })
    .into_response())
}

/// Runs one of the generator tools
///
/// # Errors
///
/// - `400 Bad Request`: Required input missing
/// - `404 Not Found`: Tool has no generator
pub async fn generate(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(tool_id): Path<String>,
    Json(body): Json<JsonValue>,
) -> ApiResult<Response> {
    if tool_id == TextGenerator::TOOL_ID {
        run_simulator(&state, &principal, TextGenerator, body).await
    } else if tool_id == ImageGenerator::TOOL_ID {
        run_simulator(&state, &principal, ImageGenerator, body).await
    } else if tool_id == CodeAssistant::TOOL_ID {
        run_simulator(&state, &principal, CodeAssistant, body).await
    } else {
        Err(ApiError::NotFound("Tool not found".to_string()))
    }
}

/// Runs the translator
///
/// # Errors
///
/// - `400 Bad Request`: No text given
/// - `404 Not Found`: Tool is not the translator
pub async fn translate(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(tool_id): Path<String>,
    Json(body): Json<JsonValue>,
) -> ApiResult<Response> {
    if tool_id != Translator::TOOL_ID {
        return Err(ApiError::NotFound("Tool not found".to_string()));
    }

    run_simulator(&state, &principal, Translator, body).await
}

/// Adds a catalog tool to the caller's favorites
///
/// Adding twice is not an error; the second call reports it.
///
/// # Errors
///
/// - `404 Not Found`: Unknown tool ID
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(tool_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let tool = tools::require(&tool_id)?;

    let added = Favorite::add(&state.store, principal.user_id, tool.id).await?;
    let message = if added {
        "Added to favorites"
    } else {
        "Already in favorites"
    };

    Ok(Json(MessageResponse {
        message: message.to_string(),
    }))
}

/// Removes a tool from the caller's favorites
///
/// # Errors
///
/// - `404 Not Found`: No such favorite
pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(tool_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let removed = Favorite::remove(&state.store, principal.user_id, &tool_id).await?;
    if !removed {
        return Err(ApiError::NotFound("Favorite not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Removed from favorites".to_string(),
    }))
}
