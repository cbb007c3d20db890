use super::options::{self, GameOptions, OptionSpec};
use super::{AroundTheClock, Cricket, GameRules, X01};
use crate::error::{DartsError, DartsResult};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum KnownVariant {
    X01,
    Cricket,
    AroundTheClock,
}

impl KnownVariant {
    pub fn schema(&self) -> Vec<OptionSpec> {
        match self {
            Self::X01 => X01::schema(),
            Self::Cricket => Cricket::schema(),
            Self::AroundTheClock => AroundTheClock::schema(),
        }
    }

    pub fn factory(&self) -> RulesFactory {
        match self {
            Self::X01 => Box::new(X01::from_options),
            Self::Cricket => Box::new(Cricket::from_options),
            Self::AroundTheClock => Box::new(AroundTheClock::from_options),
        }
    }
}

pub type RulesFactory = Box<dyn Fn(&GameOptions) -> DartsResult<Box<dyn GameRules>> + Send + Sync>;

struct VariantEntry {
    schema: Vec<OptionSpec>,
    factory: RulesFactory,
}

/// Name -> (options schema, rules factory). New variants register here
/// without touching the orchestrator.
pub struct VariantRegistry {
    variants: BTreeMap<String, VariantEntry>,
}

impl VariantRegistry {
    pub fn empty() -> Self {
        Self {
            variants: BTreeMap::new(),
        }
    }

    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for variant in KnownVariant::iter() {
            registry.register(variant.to_string(), variant.schema(), variant.factory());
        }
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, schema: Vec<OptionSpec>, factory: RulesFactory) {
        self.variants
            .insert(name.into(), VariantEntry { schema, factory });
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variants.contains_key(name)
    }

    /// Variant options followed by the options every game has.
    pub fn schema(&self, name: &str) -> DartsResult<Vec<OptionSpec>> {
        let entry = self.entry(name)?;
        let mut schema = entry.schema.clone();
        schema.extend(options::match_options());
        Ok(schema)
    }

    pub fn resolve_options(&self, name: &str, given: &GameOptions) -> DartsResult<GameOptions> {
        options::resolve(&self.schema(name)?, given)
    }

    /// Fresh rules instance for a game; `options` should already be resolved.
    pub fn build(&self, name: &str, options: &GameOptions) -> DartsResult<Box<dyn GameRules>> {
        (self.entry(name)?.factory)(options)
    }

    fn entry(&self, name: &str) -> DartsResult<&VariantEntry> {
        self.variants
            .get(name)
            .ok_or_else(|| DartsError::UnknownVariant(name.to_string()))
    }
}

impl Default for VariantRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::options::OptionValue;

    #[test]
    fn standard_variants_are_registered() {
        let registry = VariantRegistry::standard();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["around_the_clock", "cricket", "x01"]);
    }

    #[test]
    fn unknown_variant_is_an_error() {
        let registry = VariantRegistry::standard();
        assert!(matches!(
            registry.build("shanghai", &GameOptions::new()),
            Err(DartsError::UnknownVariant(_))
        ));
    }

    #[test]
    fn match_options_are_part_of_every_schema() {
        let registry = VariantRegistry::standard();
        let resolved = registry
            .resolve_options("cricket", &GameOptions::new())
            .unwrap();
        assert_eq!(resolved["legs_to_set"], OptionValue::Int(3));
        assert_eq!(resolved["cut_throat"], OptionValue::Bool(false));
    }

    #[test]
    fn custom_variants_can_be_added() {
        let mut registry = VariantRegistry::standard();
        registry.register(
            "quick_clock",
            Vec::new(),
            Box::new(|_: &GameOptions| Ok(Box::new(AroundTheClock::new()) as Box<dyn GameRules>)),
        );
        let rules = registry.build("quick_clock", &GameOptions::new()).unwrap();
        assert_eq!(rules.name(), "around_the_clock");
    }
}
