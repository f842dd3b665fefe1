use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::defs::AgeBracket;
use crate::error::{Error, Result};
use crate::survey::data::candies;

// every key is optional; whatever is missing falls back to the
// compiled-in survey layout
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    age_field: Option<String>,
    candies: Option<BTreeMap<String, String>>,
    age_brackets: Option<Vec<AgeBracket>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurveyConfig {
    pub age_field: String,
    // (csv column, display name)
    pub candies: Vec<(String, String)>,
    pub age_brackets: Vec<AgeBracket>,
}

impl Default for SurveyConfig {
    fn default() -> SurveyConfig {
        SurveyConfig {
            age_field: candies::AGE_FIELD.to_string(),
            candies: candies::CANDY_NAMES_BY_FIELD
                .iter()
                .map(|(field, name)| (field.to_string(), name.to_string()))
                .collect(),
            age_brackets: candies::default_age_brackets(),
        }
    }
}

impl SurveyConfig {
    pub fn bracket_for(&self, age: i64) -> Option<&AgeBracket> {
        self.age_brackets.iter().find(|bracket| bracket.contains(age))
    }

    // brackets have to tile the whole number line with no gaps or
    // overlaps, otherwise a valid age could land in zero or two buckets
    pub fn validate(&self) -> Result<()> {
        if self.candies.is_empty() {
            return Err(Error::InvalidConfig("no candies configured".to_string()));
        }
        let first = match self.age_brackets.first() {
            Some(b) => b,
            None => return Err(Error::InvalidConfig("no age brackets configured".to_string())),
        };
        if first.minimum.is_some() {
            return Err(Error::InvalidConfig(format!(
                "first age bracket {:?} must have no minimum",
                first.name
            )));
        }
        let last = &self.age_brackets[self.age_brackets.len() - 1];
        if last.maximum.is_some() {
            return Err(Error::InvalidConfig(format!(
                "last age bracket {:?} must have no maximum",
                last.name
            )));
        }

        let mut seen = HashSet::new();
        for bracket in &self.age_brackets {
            if !seen.insert(bracket.name.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "age bracket {:?} appears twice",
                    bracket.name
                )));
            }
            if let (Some(minimum), Some(maximum)) = (bracket.minimum, bracket.maximum) {
                if minimum >= maximum {
                    return Err(Error::InvalidConfig(format!(
                        "age bracket {:?} is empty",
                        bracket.name
                    )));
                }
            }
        }
        for pair in self.age_brackets.windows(2) {
            match (pair[0].maximum, pair[1].minimum) {
                (Some(maximum), Some(minimum)) if maximum == minimum => {}
                _ => {
                    return Err(Error::InvalidConfig(format!(
                        "age brackets {:?} and {:?} are not contiguous",
                        pair[0].name, pair[1].name
                    )))
                }
            }
        }
        Ok(())
    }
}

pub fn config_from_str(contents: &str, source: &str) -> Result<SurveyConfig> {
    let file: ConfigFile = match toml::from_str(contents) {
        Ok(c) => c,
        Err(e) => {
            return Err(Error::Config {
                path: source.to_string(),
                source: e,
            })
        }
    };

    let mut config = SurveyConfig::default();
    if let Some(age_field) = file.age_field {
        config.age_field = age_field;
    }
    if let Some(candies) = file.candies {
        config.candies = candies.into_iter().collect();
    }
    if let Some(age_brackets) = file.age_brackets {
        config.age_brackets = age_brackets;
    }
    config.validate()?;
    Ok(config)
}

pub fn read_config<P: AsRef<Path>>(input_file: P) -> Result<SurveyConfig> {
    let path = input_file.as_ref();
    let mut fd = File::open(path)?;
    let mut buf = String::new();
    fd.read_to_string(&mut buf)?;
    config_from_str(&buf, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SurveyConfig::default();
        config.validate().unwrap();
        assert_eq!(config.age_field, "Q3_AGE");
        assert_eq!(config.candies.len(), candies::CANDY_NAMES_BY_FIELD.len());
        assert_eq!(config.age_brackets.len(), 4);
    }

    #[test]
    fn bracket_edges() {
        let config = SurveyConfig::default();
        let name = |age| config.bracket_for(age).unwrap().name.clone();
        assert_eq!(name(-5), "29 or younger");
        assert_eq!(name(29), "29 or younger");
        assert_eq!(name(30), "30 to 39");
        assert_eq!(name(39), "30 to 39");
        assert_eq!(name(40), "40 to 49");
        assert_eq!(name(49), "40 to 49");
        assert_eq!(name(50), "51 or older");
        assert_eq!(name(120), "51 or older");
    }

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(config_from_str("", "test").unwrap(), SurveyConfig::default());
    }

    #[test]
    fn overrides_replace_tables() {
        let config = config_from_str(
            r#"
age_field = "AGE"

[candies]
Twix_col = "Twix"

[[age_brackets]]
name = "kids"
maximum = 18

[[age_brackets]]
name = "adults"
minimum = 18
"#,
            "test",
        )
        .unwrap();
        assert_eq!(config.age_field, "AGE");
        assert_eq!(config.candies, vec![("Twix_col".to_string(), "Twix".to_string())]);
        assert_eq!(config.bracket_for(17).unwrap().name, "kids");
        assert_eq!(config.bracket_for(18).unwrap().name, "adults");
    }

    #[test]
    fn gaps_between_brackets_are_rejected() {
        let result = config_from_str(
            r#"
[[age_brackets]]
name = "kids"
maximum = 18

[[age_brackets]]
name = "adults"
minimum = 21
"#,
            "test",
        );
        match result {
            Err(Error::InvalidConfig(msg)) => assert!(msg.contains("not contiguous")),
            other => panic!("expected invalid config, got {:?}", other),
        }
    }

    #[test]
    fn bounded_ends_are_rejected() {
        let result = config_from_str(
            r#"
[[age_brackets]]
name = "adults"
minimum = 18
"#,
            "test",
        );
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            config_from_str("colour = \"red\"", "test"),
            Err(Error::Config { .. })
        ));
    }
}
