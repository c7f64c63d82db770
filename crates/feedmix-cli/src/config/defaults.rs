use feedmix::core::models::nutrient::NutrientTargets;

pub struct DefaultsConfig {
    pub weight: f64,
    pub protein: f64,
    pub fat: f64,
    pub fiber: f64,
    pub lysine: f64,
    pub price_optimization: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let targets = NutrientTargets::default();
        Self {
            weight: targets.total_weight,
            protein: targets.profile.protein,
            fat: targets.profile.fat,
            fiber: targets.profile.fiber,
            lysine: targets.profile.lysine,
            price_optimization: false,
        }
    }
}
