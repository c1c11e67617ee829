//! Bundled meal catalog.
//!
//! Ingredient energy is given per portion (e.g. 372 kcal per `100g`); a meal
//! lists ingredient references with the quantity used.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use crate::models::{Meal, MealIngredient};

const INGREDIENTS_JSON: &str = include_str!("../data/ingredients.json");
const MEALS_JSON: &str = include_str!("../data/meals.json");

#[derive(Debug, Error)]
pub enum FoodError {
    #[error("Unknown ingredient: {0}")]
    UnknownIngredient(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Invalid food data: {0}")]
    Data(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub energy: Energy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Energy {
    pub kcal: f64,
    pub portion: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MealRecipe {
    pub id: String,
    pub name: String,
    pub ingredients: Vec<IngredientRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngredientRef {
    pub id: String,
    pub quantity: String,
}

/// All bundled meals with their calories worked out.
pub fn get_meals() -> Result<Vec<Meal>, FoodError> {
    let ingredients: Vec<Ingredient> = serde_json::from_str(INGREDIENTS_JSON)?;
    let recipes: Vec<MealRecipe> = serde_json::from_str(MEALS_JSON)?;
    compute_meals(&ingredients, &recipes)
}

pub fn compute_meals(
    ingredients: &[Ingredient],
    recipes: &[MealRecipe],
) -> Result<Vec<Meal>, FoodError> {
    let by_id: HashMap<&str, &Ingredient> =
        ingredients.iter().map(|i| (i.id.as_str(), i)).collect();

    recipes
        .iter()
        .map(|recipe| {
            let ingredients = recipe
                .ingredients
                .iter()
                .map(|reference| {
                    let ingredient = by_id
                        .get(reference.id.as_str())
                        .ok_or_else(|| FoodError::UnknownIngredient(reference.id.clone()))?;

                    let quantity = grams(&reference.quantity)?;
                    let portion = grams(&ingredient.energy.portion)?;

                    Ok(MealIngredient {
                        id: ingredient.id.clone(),
                        name: ingredient.name.clone(),
                        quantity: reference.quantity.clone(),
                        kcal: (ingredient.energy.kcal * quantity / portion).round() as i64,
                    })
                })
                .collect::<Result<Vec<_>, FoodError>>()?;

            Ok(Meal {
                id: recipe.id.clone(),
                name: recipe.name.clone(),
                kcal: ingredients.iter().map(|i| i.kcal).sum(),
                ingredients,
            })
        })
        .collect()
}

/// `150g` -> 150.0
fn grams(quantity: &str) -> Result<f64, FoodError> {
    quantity
        .trim()
        .trim_end_matches('g')
        .parse::<f64>()
        .ok()
        .filter(|grams| *grams > 0.0)
        .ok_or_else(|| FoodError::InvalidQuantity(quantity.to_string()))
}
