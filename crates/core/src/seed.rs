//! Sample recipes offered to a fresh account.

use crate::recipe::RecipeFields;

fn recipe(title: &str, category: &str, ingredient: &str, steps: &[&str]) -> RecipeFields {
    RecipeFields {
        title: title.to_string(),
        ingredient: ingredient.to_string(),
        directions: steps.iter().map(|s| s.to_string()).collect(),
        image: None,
        category: Some(category.to_string()),
    }
}

/// The bundled sample recipes, one or more per default category.
pub fn default_recipes() -> Vec<RecipeFields> {
    vec![
        recipe(
            "Garlic Bread",
            "Appetizer",
            "1 baguette, 4 cloves garlic, 60 g butter, parsley",
            &[
                "Preheat the oven to 200°C.",
                "Mash the garlic into the softened butter with the parsley.",
                "Slice the baguette, spread the butter and bake for 10 minutes.",
            ],
        ),
        recipe(
            "Spaghetti Aglio e Olio",
            "Main Course",
            "200 g spaghetti, 3 cloves garlic, olive oil, chili flakes",
            &[
                "Cook the spaghetti in salted water until al dente.",
                "Gently fry sliced garlic and chili in olive oil.",
                "Toss the pasta with the oil and a splash of cooking water.",
            ],
        ),
        recipe(
            "Chocolate Mug Cake",
            "Dessert",
            "4 tbsp flour, 2 tbsp cocoa, 3 tbsp sugar, 3 tbsp milk, 1 egg",
            &[
                "Whisk everything together in a large mug.",
                "Microwave for 90 seconds.",
                "Let it rest for a minute before eating.",
            ],
        ),
    ]
}
