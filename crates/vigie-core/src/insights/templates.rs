use crate::classify::outcome::{AquaticToxicityLevel, EndocrineRiskLevel};
use crate::model::{Category, RiskTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Insight,
    Warning,
    Recommendation,
}

/// Score bracket, same break points as the grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Bracket {
    pub fn for_score(score: u8) -> Bracket {
        match score {
            80.. => Bracket::Excellent,
            60..=79 => Bracket::Good,
            40..=59 => Bracket::Fair,
            _ => Bracket::Poor,
        }
    }
}

/// Fact a template depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Always,
    NovaAtMost(u8),
    NovaIs(u8),
    AdditivesOfTier(RiskTier),
    UnclassifiedAdditives,
    NutritionConcerns,
    NutritionPositives,
    FoodAllergens,
    EndocrineAtLeast(EndocrineRiskLevel),
    /// Endocrine level LOW or MODERATE.
    MildEndocrineRisk,
    NoDisruptors,
    FragranceAllergens,
    NaturalnessAtLeast(u8),
    NaturalnessAtMost(u8),
    SkinCompatibilityAtMost(u8),
    ToxicityAtLeast(AquaticToxicityLevel),
    ToxicityIs(AquaticToxicityLevel),
    BiodegradabilityAtLeast(u8),
    BiodegradabilityAtMost(u8),
    EcoLabels,
    NoEcoLabel,
    Group(&'static str),
}

/// A static message. Placeholders in `text` are filled from the classification:
/// `{score}`, `{nova}`, `{count}`, `{additives}`, `{concerns}`, `{positives}`,
/// `{allergens}`, `{disruptors}`, `{naturalness}`, `{skin}`, `{toxicants}`,
/// `{bio}`, `{labels}`.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub kind: Kind,
    pub category: Option<Category>,
    pub bracket: Option<Bracket>,
    pub condition: Condition,
    pub text: &'static str,
}

const fn t(
    kind: Kind,
    category: Option<Category>,
    bracket: Option<Bracket>,
    condition: Condition,
    text: &'static str,
) -> Template {
    Template {
        kind,
        category,
        bracket,
        condition,
        text,
    }
}

use Bracket::*;
use Category::{Cosmetics as C, Detergents as D, Food as F};
use Condition::*;
use Kind::{Insight as I, Recommendation as R, Warning as W};

/// All templates, in output order.
#[rustfmt::skip]
pub static TEMPLATES: &[Template] = &[
    // Overall bracket
    t(I, None, Some(Excellent), Always, "Excellent profil : {score}/100."),
    t(I, None, Some(Good), Always, "Bon profil dans l'ensemble : {score}/100."),
    t(I, None, Some(Fair), Always, "Profil moyen : {score}/100, plusieurs points à surveiller."),
    t(I, None, Some(Poor), Always, "Profil préoccupant : {score}/100."),
    // Food
    t(I, Some(F), None, NovaAtMost(1), "Produit brut ou peu transformé (NOVA 1)."),
    t(I, Some(F), None, NovaIs(2), "Ingrédients culinaires simples (NOVA 2)."),
    t(I, Some(F), None, NovaIs(3), "Produit transformé (NOVA 3)."),
    t(W, Some(F), None, NovaIs(4), "Produit ultra-transformé (NOVA 4)."),
    t(W, Some(F), None, AdditivesOfTier(RiskTier::High), "Additifs à risque élevé : {additives}."),
    t(W, Some(F), None, AdditivesOfTier(RiskTier::Medium), "Additifs controversés : {additives}."),
    t(I, Some(F), None, UnclassifiedAdditives, "{count} additif(s) sans évaluation connue."),
    t(W, Some(F), None, NutritionConcerns, "Teneur élevée en {concerns}."),
    t(I, Some(F), None, NutritionPositives, "Bonne source de {positives}."),
    t(W, Some(F), None, FoodAllergens, "Contient des allergènes : {allergens}."),
    t(R, Some(F), Some(Poor), NovaIs(4), "Privilégiez une alternative moins transformée, aux ingrédients reconnaissables."),
    t(R, Some(F), Some(Fair), NovaIs(4), "À consommer occasionnellement."),
    t(R, Some(F), None, AdditivesOfTier(RiskTier::High), "Évitez les produits contenant {additives}, en particulier pour les enfants."),
    t(R, Some(F), None, NutritionConcerns, "Limitez les portions et complétez avec des aliments moins riches en {concerns}."),
    t(R, Some(F), Some(Excellent), Always, "Un bon choix pour une consommation régulière."),
    // Cosmetics
    t(W, Some(C), None, EndocrineAtLeast(EndocrineRiskLevel::High), "Perturbateurs endocriniens : {disruptors}."),
    t(W, Some(C), None, MildEndocrineRisk, "Perturbateurs endocriniens suspectés : {disruptors}."),
    t(I, Some(C), None, NoDisruptors, "Aucun perturbateur endocrinien connu détecté."),
    t(W, Some(C), None, FragranceAllergens, "Allergènes parfumants à déclaration obligatoire : {allergens}."),
    t(W, Some(C), None, Group("microplastics"), "Contient des microplastiques."),
    t(I, Some(C), None, NaturalnessAtLeast(8), "Formule majoritairement d'origine naturelle ({naturalness}/10)."),
    t(I, Some(C), None, NaturalnessAtMost(3), "Formule majoritairement synthétique ({naturalness}/10)."),
    t(W, Some(C), None, SkinCompatibilityAtMost(5), "Tolérance cutanée faible ({skin}/10)."),
    t(R, Some(C), None, EndocrineAtLeast(EndocrineRiskLevel::High), "Évitez ce produit pendant la grossesse et pour les enfants."),
    t(R, Some(C), None, FragranceAllergens, "Préférez une version sans parfum si vous avez la peau sensible."),
    t(R, Some(C), Some(Poor), Always, "Choisissez un produit certifié bio (Cosmos, Ecocert)."),
    t(R, Some(C), None, SkinCompatibilityAtMost(5), "Testez le produit sur une petite zone avant usage."),
    // Detergents
    t(W, Some(D), None, ToxicityAtLeast(AquaticToxicityLevel::High), "Toxique pour la vie aquatique : {toxicants}."),
    t(I, Some(D), None, ToxicityIs(AquaticToxicityLevel::Moderate), "Impact modéré sur les milieux aquatiques : {toxicants}."),
    t(I, Some(D), None, ToxicityIs(AquaticToxicityLevel::Low), "Aucun toxique aquatique majeur détecté."),
    t(I, Some(D), None, BiodegradabilityAtLeast(7), "Bonne biodégradabilité ({bio}/10)."),
    t(W, Some(D), None, BiodegradabilityAtMost(3), "Biodégradabilité faible ({bio}/10)."),
    t(I, Some(D), None, EcoLabels, "Écolabel reconnu : {labels}."),
    t(W, Some(D), None, Group("isothiazolinones"), "Contient des isothiazolinones, allergènes de contact."),
    t(W, Some(D), None, Group("microplastics"), "Contient des polymères synthétiques non biodégradables."),
    t(R, Some(D), None, ToxicityAtLeast(AquaticToxicityLevel::High), "Préférez une formule sans phosphates ni chlore."),
    t(R, Some(D), None, NoEcoLabel, "Recherchez l'Écolabel européen ou Ecocert."),
    t(R, Some(D), None, Group("fragrance"), "Optez pour une version sans parfum."),
    t(R, Some(D), Some(Poor), Always, "Réduisez les doses et rincez abondamment."),
];
