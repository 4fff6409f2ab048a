//! User listing and counting through the core.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SuperTokensError, SuperTokensResult};
use crate::normalise::NormalisedUrlPath;
use crate::querier::Querier;

const USERS_PATH: &str = "/users";
const USER_COUNT_PATH: &str = "/users/count";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeJoinedOrder {
    Asc,
    Desc,
}

impl TimeJoinedOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeJoinedOrder::Asc => "ASC",
            TimeJoinedOrder::Desc => "DESC",
        }
    }
}

/// One user together with the recipe that owns it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEntry {
    pub recipe_id: String,
    pub user: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPaginationResult {
    #[serde(default)]
    pub users: Vec<UserEntry>,
    #[serde(default)]
    pub next_pagination_token: Option<String>,
}

fn core_path(path: &str) -> SuperTokensResult<NormalisedUrlPath> {
    NormalisedUrlPath::new(path).map_err(|e| SuperTokensError::General(e.to_string()))
}

fn recipe_filter(params: &mut HashMap<String, String>, include_recipe_ids: Option<&[String]>) {
    if let Some(ids) = include_recipe_ids {
        params.insert("includeRecipeIds".to_string(), ids.join(","));
    }
}

/// One page of users in join order.
pub async fn get_users(
    querier: &dyn Querier,
    order: TimeJoinedOrder,
    limit: Option<u32>,
    pagination_token: Option<&str>,
    include_recipe_ids: Option<&[String]>,
) -> SuperTokensResult<UserPaginationResult> {
    let mut params = HashMap::new();
    params.insert("timeJoinedOrder".to_string(), order.as_str().to_string());
    if let Some(limit) = limit {
        params.insert("limit".to_string(), limit.to_string());
    }
    if let Some(token) = pagination_token {
        params.insert("paginationToken".to_string(), token.to_string());
    }
    recipe_filter(&mut params, include_recipe_ids);

    let response = querier.send_get(&core_path(USERS_PATH)?, &params).await?;
    Ok(serde_json::from_value(response)?)
}

pub async fn get_user_count(
    querier: &dyn Querier,
    include_recipe_ids: Option<&[String]>,
) -> SuperTokensResult<u64> {
    let mut params = HashMap::new();
    recipe_filter(&mut params, include_recipe_ids);

    let response = querier
        .send_get(&core_path(USER_COUNT_PATH)?, &params)
        .await?;
    response
        .get("count")
        .and_then(Value::as_u64)
        .ok_or_else(|| SuperTokensError::General("core user count response has no count".to_string()))
}
