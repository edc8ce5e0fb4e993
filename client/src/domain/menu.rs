//! Menu aggregate, its entities, and the locally cached snapshot.
//!
//! The aggregate is the single unit of storage: the store only ever reads
//! or replaces it whole. Fields the client does not model are kept in
//! `extra` maps so a read-modify-write cycle never drops server data.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Identity of an ingredient, category, or dish.
///
/// The backend may use integers or strings. Both are kept as received so
/// the written document matches what was read; `1` and `"1"` are distinct.
///
/// # Examples
/// ```
/// use menu_admin::domain::EntityId;
///
/// assert_eq!(EntityId::from_segment("42"), EntityId::from(42));
/// assert_eq!(EntityId::from_segment("salt"), EntityId::from("salt"));
/// assert_ne!(EntityId::from(1), EntityId::from("1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    /// Numeric identifier.
    Number(i64),
    /// Textual identifier.
    Text(String),
}

impl EntityId {
    /// Parse a path segment, treating all-digit segments as numbers.
    #[must_use]
    pub fn from_segment(segment: &str) -> Self {
        if !segment.is_empty() && segment.bytes().all(|byte| byte.is_ascii_digit()) {
            if let Ok(value) = segment.parse::<i64>() {
                return Self::Number(value);
            }
        }
        Self::Text(segment.to_owned())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Adds the shared accessors for fields the client does not model.
macro_rules! impl_attributes {
    ($($entity:ident),+ $(,)?) => {
        $(
            impl $entity {
                /// Raw value of a field kept verbatim from the document.
                #[must_use]
                pub fn attribute(&self, key: &str) -> Option<&Value> {
                    self.extra.get(key)
                }

                /// Set a field that is written back verbatim.
                #[must_use]
                pub fn with_attribute(
                    mut self,
                    key: impl Into<String>,
                    value: impl Into<Value>,
                ) -> Self {
                    self.extra.insert(key.into(), value.into());
                    self
                }
            }
        )+
    };
}

/// Stock item referenced by dishes.
///
/// Only `id` and `name` are typed. Everything else, including `unit` and
/// `quantity`, stays in `extra` exactly as the backend sent it, so a string
/// quantity or an explicit `null` is written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Identity within the ingredient collection.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Fields not modelled by the client.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Ingredient {
    /// Build an ingredient with only an id and a name.
    #[must_use]
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra: Map::new(),
        }
    }

    /// Unit of measure, e.g. `kg`, when the backend sent a string.
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.attribute("unit").and_then(Value::as_str)
    }

    /// Quantity in stock, in whatever JSON form the backend uses.
    #[must_use]
    pub fn quantity(&self) -> Option<&Value> {
        self.attribute("quantity")
    }
}

/// Grouping that scopes the dish listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Identity within the category collection.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Fields not modelled by the client.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Category {
    /// Build a category with only an id and a name.
    #[must_use]
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra: Map::new(),
        }
    }

    /// Optional blurb, when the backend sent a string.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.attribute("description").and_then(Value::as_str)
    }
}

/// Menu item belonging to exactly one category, by reference.
///
/// The category does not own the dish: deleting a category leaves its
/// dishes in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    /// Identity within the dish collection.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Owning category.
    pub category_id: EntityId,
    /// Fields not modelled by the client.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dish {
    /// Build a dish with an id, a name, and its category.
    #[must_use]
    pub fn new(
        id: impl Into<EntityId>,
        name: impl Into<String>,
        category_id: impl Into<EntityId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category_id: category_id.into(),
            extra: Map::new(),
        }
    }

    /// Price, in whatever JSON form the backend uses.
    #[must_use]
    pub fn price(&self) -> Option<&Value> {
        self.attribute("price")
    }

    /// Ingredient references, in whatever JSON form the backend uses.
    #[must_use]
    pub fn ingredients(&self) -> Option<&Value> {
        self.attribute("ingredients")
    }
}

impl_attributes!(Ingredient, Category, Dish);

/// How a list-valued key appeared in the document that was read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum KeyForm {
    #[default]
    Absent,
    Null,
    Present,
}

/// The whole remote menu document exchanged by `GET`/`PUT`.
///
/// ## Invariants
/// - `ingredients` and `categories` must be present when decoding.
/// - `dishes` defaults to empty. While it stays empty it is written in the
///   form it was read: absent, `null`, or `[]`.
/// - Unknown top-level fields are written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MenuDocument", into = "MenuDocument")]
pub struct MenuAggregate {
    /// Ingredient collection, in server order.
    pub ingredients: Vec<Ingredient>,
    /// Category collection, in server order.
    pub categories: Vec<Category>,
    /// Dish collection, in server order.
    pub dishes: Vec<Dish>,
    /// Top-level fields not modelled by the client.
    pub extra: Map<String, Value>,
    dishes_key: KeyForm,
}

impl MenuAggregate {
    /// Build an aggregate from its two required collections.
    #[must_use]
    pub fn new(ingredients: Vec<Ingredient>, categories: Vec<Category>) -> Self {
        Self {
            ingredients,
            categories,
            ..Self::default()
        }
    }

    /// Replace the dish collection.
    #[must_use]
    pub fn with_dishes(mut self, dishes: Vec<Dish>) -> Self {
        self.dishes = dishes;
        self
    }
}

/// Wire form of [`MenuAggregate`].
///
/// `dishes` is `None` when the key is absent and `Some(None)` when it is
/// `null`.
#[derive(Serialize, Deserialize)]
struct MenuDocument {
    ingredients: Vec<Ingredient>,
    categories: Vec<Category>,
    #[serde(
        default,
        deserialize_with = "present_key",
        skip_serializing_if = "Option::is_none"
    )]
    dishes: Option<Option<Vec<Dish>>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn present_key<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl From<MenuDocument> for MenuAggregate {
    fn from(document: MenuDocument) -> Self {
        let (dishes, dishes_key) = match document.dishes {
            None => (Vec::new(), KeyForm::Absent),
            Some(None) => (Vec::new(), KeyForm::Null),
            Some(Some(dishes)) => (dishes, KeyForm::Present),
        };
        Self {
            ingredients: document.ingredients,
            categories: document.categories,
            dishes,
            extra: document.extra,
            dishes_key,
        }
    }
}

impl From<MenuAggregate> for MenuDocument {
    fn from(menu: MenuAggregate) -> Self {
        let dishes = match (menu.dishes.is_empty(), menu.dishes_key) {
            (false, _) | (true, KeyForm::Present) => Some(Some(menu.dishes)),
            (true, KeyForm::Null) => Some(None),
            (true, KeyForm::Absent) => None,
        };
        Self {
            ingredients: menu.ingredients,
            categories: menu.categories,
            dishes,
            extra: menu.extra,
        }
    }
}

/// Locally cached copy of the menu collections exposed to views.
///
/// Not authoritative: it reflects the last successful load or write and is
/// never used as the base of the next mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuSnapshot {
    /// Ingredients as of the last load or ingredient write.
    pub ingredients: Vec<Ingredient>,
    /// Categories as of the last load or category write.
    pub categories: Vec<Category>,
    /// Dishes as of the last load or dish write.
    pub dishes: Vec<Dish>,
}

/// Entity counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuSummary {
    /// Number of ingredients.
    pub ingredients: usize,
    /// Number of categories.
    pub categories: usize,
    /// Number of dishes.
    pub dishes: usize,
}

impl MenuSnapshot {
    /// Copy the collections out of a freshly read aggregate.
    #[must_use]
    pub fn from_aggregate(menu: &MenuAggregate) -> Self {
        Self {
            ingredients: menu.ingredients.clone(),
            categories: menu.categories.clone(),
            dishes: menu.dishes.clone(),
        }
    }

    /// Find an ingredient by id.
    #[must_use]
    pub fn ingredient(&self, id: &EntityId) -> Option<&Ingredient> {
        self.ingredients.iter().find(|ingredient| &ingredient.id == id)
    }

    /// Find a category by id.
    #[must_use]
    pub fn category(&self, id: &EntityId) -> Option<&Category> {
        self.categories.iter().find(|category| &category.id == id)
    }

    /// Find a dish by id.
    #[must_use]
    pub fn dish(&self, id: &EntityId) -> Option<&Dish> {
        self.dishes.iter().find(|dish| &dish.id == id)
    }

    /// List the dishes referencing a category, in snapshot order.
    pub fn dishes_in_category<'a>(
        &'a self,
        category_id: &'a EntityId,
    ) -> impl Iterator<Item = &'a Dish> + 'a {
        self.dishes
            .iter()
            .filter(move |dish| &dish.category_id == category_id)
    }

    /// Count the entities in each collection.
    #[must_use]
    pub const fn summary(&self) -> MenuSummary {
        MenuSummary {
            ingredients: self.ingredients.len(),
            categories: self.categories.len(),
            dishes: self.dishes.len(),
        }
    }
}
