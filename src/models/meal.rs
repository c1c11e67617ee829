use serde::{Deserialize, Serialize};

/// A meal with its per-ingredient and total energy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meal {
    pub id: String,
    pub name: String,
    pub kcal: i64,
    pub ingredients: Vec<MealIngredient>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealIngredient {
    pub id: String,
    pub name: String,
    /// Amount used in the meal, e.g. `150g`.
    pub quantity: String,
    pub kcal: i64,
}
