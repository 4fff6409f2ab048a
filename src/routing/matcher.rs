//! Recipe ownership resolution.
//!
//! # Responsibilities
//! - Find the recipe named by the `rid` header
//! - Otherwise scan recipes in registration order
//! - Report why nothing claimed a request
//!
//! # Design Decisions
//! - Pure over the recipe list: no I/O, no response writing
//! - An error from any recipe's check aborts resolution
//! - With duplicate recipe ids the first registered one is used

use std::sync::Arc;

use axum::http::Method;

use crate::error::SuperTokensResult;
use crate::normalise::NormalisedUrlPath;
use crate::recipe::{ApiId, RecipeModule};

/// Why a request inside the API base path is still not ours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unclaimed {
    /// `rid` names a recipe that is not registered.
    UnknownRecipe,
    /// The recipe named by `rid` does not serve this path and method.
    NotServedByRid,
    /// No registered recipe serves this path and method.
    NoMatch,
}

impl Unclaimed {
    pub fn as_str(self) -> &'static str {
        match self {
            Unclaimed::UnknownRecipe => "unknown_recipe",
            Unclaimed::NotServedByRid => "not_served_by_rid",
            Unclaimed::NoMatch => "no_match",
        }
    }
}

/// Outcome of resolving a request against the recipe list.
pub enum Resolution {
    Claimed {
        recipe: Arc<dyn RecipeModule>,
        api_id: ApiId,
    },
    Unclaimed(Unclaimed),
}

impl std::fmt::Debug for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::Claimed { recipe, api_id } => f
                .debug_struct("Claimed")
                .field("recipe", &recipe.recipe_id())
                .field("api_id", api_id)
                .finish(),
            Resolution::Unclaimed(reason) => f.debug_tuple("Unclaimed").field(reason).finish(),
        }
    }
}

/// Decide which recipe, if any, owns `method path`.
///
/// `path` must already carry the gateway prefix.
pub fn resolve(
    recipes: &[Arc<dyn RecipeModule>],
    rid: Option<&str>,
    path: &NormalisedUrlPath,
    method: &Method,
) -> SuperTokensResult<Resolution> {
    if let Some(rid) = rid {
        let Some(recipe) = recipes.iter().find(|r| r.recipe_id() == rid) else {
            return Ok(Resolution::Unclaimed(Unclaimed::UnknownRecipe));
        };
        return Ok(match recipe.return_api_id_if_can_handle_request(path, method)? {
            Some(api_id) => Resolution::Claimed {
                recipe: recipe.clone(),
                api_id,
            },
            None => Resolution::Unclaimed(Unclaimed::NotServedByRid),
        });
    }

    for recipe in recipes {
        if let Some(api_id) = recipe.return_api_id_if_can_handle_request(path, method)? {
            return Ok(Resolution::Claimed {
                recipe: recipe.clone(),
                api_id,
            });
        }
    }
    Ok(Resolution::Unclaimed(Unclaimed::NoMatch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SuperTokensError;
    use crate::http::Fallback;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use axum::response::Response;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Claims one path, or fails every check.
    struct Probe {
        id: &'static str,
        claims: Option<&'static str>,
        fails: bool,
        checks: AtomicUsize,
    }

    impl Probe {
        fn new(id: &'static str, claims: Option<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                id,
                claims,
                fails: false,
                checks: AtomicUsize::new(0),
            })
        }

        fn failing(id: &'static str) -> Arc<Self> {
            Arc::new(Self {
                id,
                claims: None,
                fails: true,
                checks: AtomicUsize::new(0),
            })
        }

        fn checks(&self) -> usize {
            self.checks.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RecipeModule for Probe {
        fn recipe_id(&self) -> &str {
            self.id
        }

        fn return_api_id_if_can_handle_request(
            &self,
            path: &NormalisedUrlPath,
            _method: &Method,
        ) -> SuperTokensResult<Option<ApiId>> {
            self.checks.fetch_add(1, Ordering::SeqCst);
            if self.fails {
                return Err(SuperTokensError::General(format!("{} exploded", self.id)));
            }
            Ok(self
                .claims
                .filter(|claimed| path.as_str() == *claimed)
                .map(|_| ApiId::new(format!("{}-api", self.id))))
        }

        async fn handle_api_request(
            &self,
            _id: &ApiId,
            _req: Request<Body>,
            _fallback: Fallback,
            _path: &NormalisedUrlPath,
            _method: &Method,
        ) -> SuperTokensResult<Response> {
            unreachable!("resolution never handles requests")
        }

        fn all_cors_headers(&self) -> Vec<String> {
            Vec::new()
        }
    }

    fn path(p: &str) -> NormalisedUrlPath {
        NormalisedUrlPath::new(p).unwrap()
    }

    fn claimed_by(resolution: Resolution) -> Option<String> {
        match resolution {
            Resolution::Claimed { recipe, .. } => Some(recipe.recipe_id().to_string()),
            Resolution::Unclaimed(_) => None,
        }
    }

    #[test]
    fn test_first_match_wins() {
        let a = Probe::new("a", Some("/auth/x"));
        let b = Probe::new("b", Some("/auth/x"));
        let recipes: Vec<Arc<dyn RecipeModule>> = vec![a.clone(), b.clone()];

        let resolution = resolve(&recipes, None, &path("/auth/x"), &Method::GET).unwrap();
        assert_eq!(claimed_by(resolution).as_deref(), Some("a"));
        assert_eq!(a.checks(), 1);
        assert_eq!(b.checks(), 0);
    }

    #[test]
    fn test_rid_consults_only_named_recipe() {
        let a = Probe::new("a", Some("/auth/x"));
        let b = Probe::new("b", Some("/auth/x"));
        let recipes: Vec<Arc<dyn RecipeModule>> = vec![a.clone(), b.clone()];

        let resolution = resolve(&recipes, Some("b"), &path("/auth/x"), &Method::GET).unwrap();
        assert_eq!(claimed_by(resolution).as_deref(), Some("b"));
        assert_eq!(a.checks(), 0);
        assert_eq!(b.checks(), 1);
    }

    #[test]
    fn test_rid_unknown_or_not_served() {
        let a = Probe::new("a", Some("/auth/x"));
        let recipes: Vec<Arc<dyn RecipeModule>> = vec![a.clone()];

        let resolution = resolve(&recipes, Some("zzz"), &path("/auth/x"), &Method::GET).unwrap();
        assert!(matches!(resolution, Resolution::Unclaimed(Unclaimed::UnknownRecipe)));
        assert_eq!(a.checks(), 0);

        let resolution = resolve(&recipes, Some("a"), &path("/auth/y"), &Method::GET).unwrap();
        assert!(matches!(resolution, Resolution::Unclaimed(Unclaimed::NotServedByRid)));
    }

    #[test]
    fn test_error_aborts_scan() {
        let a = Probe::failing("a");
        let b = Probe::new("b", Some("/auth/x"));
        let recipes: Vec<Arc<dyn RecipeModule>> = vec![a.clone(), b.clone()];

        let err = resolve(&recipes, None, &path("/auth/x"), &Method::GET).unwrap_err();
        assert_eq!(err.to_string(), "a exploded");
        assert_eq!(b.checks(), 0);
    }

    #[test]
    fn test_no_match() {
        let recipes: Vec<Arc<dyn RecipeModule>> = vec![Probe::new("a", Some("/auth/x"))];
        let resolution = resolve(&recipes, None, &path("/auth/none"), &Method::GET).unwrap();
        assert!(matches!(resolution, Resolution::Unclaimed(Unclaimed::NoMatch)));
    }

    #[test]
    fn test_duplicate_ids_use_first() {
        let first = Probe::new("dup", None);
        let second = Probe::new("dup", Some("/auth/x"));
        let recipes: Vec<Arc<dyn RecipeModule>> = vec![first.clone(), second.clone()];

        let resolution = resolve(&recipes, Some("dup"), &path("/auth/x"), &Method::GET).unwrap();
        assert!(matches!(resolution, Resolution::Unclaimed(Unclaimed::NotServedByRid)));
        assert_eq!(second.checks(), 0);
    }
}
