//! Path-to-view resolution for the admin interface.
//!
//! Unauthenticated sessions see only the login view whatever the path.
//! Unknown paths redirect to the dashboard.

use crate::domain::EntityId;

/// Path every unknown route redirects to.
pub const HOME_PATH: &str = "/";

/// A view the router can render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Credential entry; the only view before authentication.
    Login,
    /// Overview with entity counts.
    Dashboard,
    /// Category listing and editing.
    Categories,
    /// Ingredient listing with add/update/delete.
    Ingredients,
    /// One ingredient.
    IngredientDetails {
        /// Ingredient shown.
        ingredient_id: EntityId,
    },
    /// Dish listing, optionally scoped to one category.
    Dishes {
        /// Category the listing is scoped to.
        category_id: Option<EntityId>,
    },
    /// One dish within a category.
    DishDetails {
        /// Category the dish is listed under.
        category_id: EntityId,
        /// Dish shown.
        dish_id: EntityId,
    },
}

impl View {
    /// Canonical path for this view. Login has no path of its own.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Login | Self::Dashboard => HOME_PATH.to_owned(),
            Self::Categories => "/categories".to_owned(),
            Self::Ingredients => "/ingredients".to_owned(),
            Self::IngredientDetails { ingredient_id } => format!("/ingredients/{ingredient_id}"),
            Self::Dishes { category_id: None } => "/dishes".to_owned(),
            Self::Dishes {
                category_id: Some(category_id),
            } => format!("/dishes/{category_id}"),
            Self::DishDetails {
                category_id,
                dish_id,
            } => format!("/dishes/{category_id}/{dish_id}"),
        }
    }
}

/// Outcome of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Render this view.
    Render(View),
    /// Navigate to this path instead.
    Redirect(&'static str),
}

/// Resolve `path` for a session in the given authentication state.
///
/// # Examples
/// ```
/// use menu_admin::domain::EntityId;
/// use menu_admin::inbound::{Navigation, View, resolve};
///
/// assert_eq!(resolve("/ingredients", false), Navigation::Render(View::Login));
/// assert_eq!(
///     resolve("/ingredients/4", true),
///     Navigation::Render(View::IngredientDetails { ingredient_id: EntityId::from(4) })
/// );
/// assert_eq!(resolve("/nowhere", true), Navigation::Redirect("/"));
/// ```
#[must_use]
pub fn resolve(path: &str, authenticated: bool) -> Navigation {
    if !authenticated {
        return Navigation::Render(View::Login);
    }

    let route = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = route.split('/').filter(|segment| !segment.is_empty()).collect();
    let view = match segments.as_slice() {
        [] => View::Dashboard,
        ["categories"] => View::Categories,
        ["ingredients"] => View::Ingredients,
        ["ingredients", id] => View::IngredientDetails {
            ingredient_id: EntityId::from_segment(id),
        },
        ["dishes"] => View::Dishes { category_id: None },
        ["dishes", category] => View::Dishes {
            category_id: Some(EntityId::from_segment(category)),
        },
        ["dishes", category, dish] => View::DishDetails {
            category_id: EntityId::from_segment(category),
            dish_id: EntityId::from_segment(dish),
        },
        _ => return Navigation::Redirect(HOME_PATH),
    };
    Navigation::Render(view)
}
